//! Estimates how an intersection intervention copes with a steady stream of
//! traffic, one simulated minute at a time.

pub use catalog::{Catalog, InterventionAttributes, InterventionSpec};
pub use error::{Error, Result};
pub use params::ModelParams;
pub use simulation::{
    aggregate, compare, cost_projection, run, run_with_observer, Simulation, SimulationInput,
    SimulationResult, SimulationStep,
};
pub use util::Interval;
pub use weather::{ConstantWeather, RandomWeather, ReplayWeather, WeatherSource};

mod catalog;
mod error;
pub mod params;
pub mod report;
mod simulation;
mod util;
pub mod weather;
