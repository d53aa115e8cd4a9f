use crate::catalog::{Catalog, InterventionSpec};
use crate::error::{Error, Result};
use crate::params::ModelParams;
use crate::weather::WeatherSource;
use log::{debug, info, warn};

#[cfg(feature = "serde")]
use serde::Serialize;

/// The inputs of a single simulation run.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SimulationInput<'a> {
    /// The intervention being simulated.
    pub intervention: &'a InterventionSpec,
    /// The number of vehicles arriving each minute.
    pub arrival_rate_per_minute: u32,
    /// The number of minutes to simulate.
    pub horizon_minutes: u32,
    /// Whether efficiency degrades during the recurring peak-hour window.
    pub peak_hour_enabled: bool,
}

/// The outcome of one simulated minute.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SimulationStep {
    /// The 0-based index of the minute.
    pub minute_index: u32,
    /// The number of vehicles processed during the minute.
    pub throughput: f64,
    /// The average wait in seconds experienced during the minute.
    pub wait_seconds: f64,
}

/// The series produced by a completed run, plus its summary statistics.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SimulationResult {
    /// One step per minute, in chronological order.
    pub series: Vec<SimulationStep>,
    /// The total throughput, truncated to a whole number of vehicles.
    pub total_vehicles: u64,
    /// The mean wait over all minutes.
    pub average_wait_seconds: f64,
}

/// A simulation run in progress.
///
/// Each call to [step](Self::step) simulates one minute. The stepper holds
/// no resources other than the borrowed weather source, so it may be dropped
/// part way through a run.
pub struct Simulation<'a, W: ?Sized> {
    /// The run inputs.
    input: SimulationInput<'a>,
    /// The model parameters.
    params: ModelParams,
    /// The source of weather factors.
    weather: &'a mut W,
    /// The next minute to simulate.
    minute: u32,
    /// Set once a step has failed; no further steps are produced.
    failed: bool,
}

impl<'a, W: WeatherSource + ?Sized> Simulation<'a, W> {
    /// Prepares a run with the default model parameters.
    pub fn new(input: SimulationInput<'a>, weather: &'a mut W) -> Result<Self> {
        Self::with_params(input, ModelParams::default(), weather)
    }

    /// Prepares a run with custom model parameters.
    ///
    /// Fails if the arrival rate or horizon is zero, or the parameters are invalid.
    pub fn with_params(
        input: SimulationInput<'a>,
        params: ModelParams,
        weather: &'a mut W,
    ) -> Result<Self> {
        if input.arrival_rate_per_minute == 0 {
            return Err(Error::invalid("arrival rate", "must be a positive number of vehicles"));
        }
        if input.horizon_minutes == 0 {
            return Err(Error::invalid("horizon", "must be a positive number of minutes"));
        }
        params.validate()?;
        Ok(Self {
            input,
            params,
            weather,
            minute: 0,
            failed: false,
        })
    }

    /// Simulates the next minute, or returns `None` if the horizon has been reached.
    pub fn step(&mut self) -> Option<Result<SimulationStep>> {
        if self.failed || self.minute >= self.input.horizon_minutes {
            return None;
        }
        let minute = self.minute;
        self.minute += 1;

        let spec = self.input.intervention;
        let demand = self.input.arrival_rate_per_minute as f64;

        let mut efficiency = spec.efficiency();
        if self.input.peak_hour_enabled && self.params.is_peak_minute(minute) {
            efficiency *= self.params.peak_factor;
        }

        // Drawn every minute, even if the result is degenerate
        let weather = self.weather.next_factor();
        let throughput = demand * efficiency * weather;

        if !(throughput.is_finite() && throughput > 0.0) {
            warn!(
                "Degenerate throughput {} at minute {} (weather factor {})",
                throughput, minute, weather
            );
            self.failed = true;
            return Some(Err(Error::DegenerateStep { minute }));
        }

        let wait_seconds = spec.base_wait_seconds() * (demand / throughput);

        Some(Ok(SimulationStep {
            minute_index: minute,
            throughput,
            wait_seconds,
        }))
    }

    /// Gets the index of the next minute to be simulated.
    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Gets the fraction of the horizon simulated so far, between 0 and 1.
    pub fn progress(&self) -> f64 {
        self.minute as f64 / self.input.horizon_minutes as f64
    }

    /// Gets the run inputs.
    pub fn input(&self) -> &SimulationInput<'a> {
        &self.input
    }

    /// Simulates the remaining minutes, calling `observer` after each one,
    /// then aggregates the full series.
    pub fn finish(
        mut self,
        mut observer: impl FnMut(&SimulationStep, f64),
    ) -> Result<SimulationResult> {
        let mut series = Vec::with_capacity((self.input.horizon_minutes - self.minute) as usize);
        while let Some(step) = self.step() {
            let step = step?;
            observer(&step, self.progress());
            series.push(step);
        }
        let (total_vehicles, average_wait_seconds) = aggregate(&series)?;
        Ok(SimulationResult {
            series,
            total_vehicles,
            average_wait_seconds,
        })
    }
}

impl<'a, W: WeatherSource + ?Sized> Iterator for Simulation<'a, W> {
    type Item = Result<SimulationStep>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

/// Simulates every minute of the horizon and returns the full series.
pub fn run<W: WeatherSource + ?Sized>(
    input: SimulationInput,
    weather: &mut W,
) -> Result<SimulationResult> {
    run_with_observer(input, weather, |_, _| {})
}

/// Like [run], but calls `observer` with each step and the completed fraction
/// of the run as soon as the step has been simulated.
pub fn run_with_observer<W: WeatherSource + ?Sized>(
    input: SimulationInput,
    weather: &mut W,
    observer: impl FnMut(&SimulationStep, f64),
) -> Result<SimulationResult> {
    debug!(
        "Simulating '{}' for {} min at {} veh/min (peak hour: {})",
        input.intervention.name(),
        input.horizon_minutes,
        input.arrival_rate_per_minute,
        input.peak_hour_enabled
    );
    let result = Simulation::new(input, weather)?.finish(observer)?;
    info!(
        "'{}': {} vehicles, {:.1} s average wait",
        input.intervention.name(),
        result.total_vehicles,
        result.average_wait_seconds
    );
    Ok(result)
}

/// Runs every intervention in the catalog with the same demand and shared weather source,
/// in catalog order. Each result is paired with the intervention that produced it.
pub fn compare<'c, W: WeatherSource + ?Sized>(
    catalog: &'c Catalog,
    arrival_rate_per_minute: u32,
    horizon_minutes: u32,
    peak_hour_enabled: bool,
    weather: &mut W,
) -> Result<Vec<(&'c InterventionSpec, SimulationResult)>> {
    catalog
        .iter()
        .map(|intervention| {
            let input = SimulationInput {
                intervention,
                arrival_rate_per_minute,
                horizon_minutes,
                peak_hour_enabled,
            };
            run(input, &mut *weather).map(|result| (intervention, result))
        })
        .collect()
}

/// Reduces a series to its total throughput (truncated) and mean wait.
///
/// Negative throughputs count as zero towards the total.
pub fn aggregate(series: &[SimulationStep]) -> Result<(u64, f64)> {
    if series.is_empty() {
        return Err(Error::EmptySeries);
    }
    let total: f64 = series.iter().map(|step| f64::max(step.throughput, 0.0)).sum();
    let wait: f64 = series.iter().map(|step| step.wait_seconds).sum();
    Ok((total as u64, wait / series.len() as f64))
}

/// Computes the cost of implementing an intervention and maintaining it for `years`.
pub fn cost_projection(spec: &InterventionSpec, years: f64) -> f64 {
    spec.implementation_cost() + spec.annual_maintenance_cost() * years
}
