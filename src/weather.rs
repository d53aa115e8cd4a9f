//! Sources of the per-minute weather factor.
//!
//! The engine never draws random numbers itself. Every run is handed a
//! [WeatherSource], which is advanced exactly once per simulated minute,
//! so that a run can be replayed by replaying its weather.

use crate::error::{Error, Result};
use crate::params::ModelParams;
use crate::util::Interval;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

/// A generator of multiplicative weather factors.
pub trait WeatherSource {
    /// Draws the weather factor for the next minute.
    fn next_factor(&mut self) -> f64;
}

impl<W: WeatherSource + ?Sized> WeatherSource for &mut W {
    fn next_factor(&mut self) -> f64 {
        (**self).next_factor()
    }
}

/// Weather factors sampled uniformly from a range.
#[derive(Clone, Debug)]
pub struct RandomWeather<R> {
    rng: R,
    distr: Uniform<f64>,
}

impl<R: Rng> RandomWeather<R> {
    /// Creates a weather source sampling from `range` using the given generator.
    pub fn new(rng: R, range: Interval<f64>) -> Result<Self> {
        if !(range.is_ordered() && range.min.is_finite() && range.max.is_finite()) {
            return Err(Error::invalid(
                "weather range",
                format!("{:?} is not a finite range", range),
            ));
        }
        Ok(Self {
            rng,
            distr: Uniform::new_inclusive(range.min, range.max),
        })
    }

    /// Creates a weather source sampling from the weather range of a model.
    pub fn from_params(rng: R, params: &ModelParams) -> Result<Self> {
        params.validate()?;
        Self::new(rng, params.weather_range)
    }
}

impl RandomWeather<StdRng> {
    /// Creates a reproducible weather source over the default range.
    pub fn seeded(seed: u64) -> Self {
        Self::with_default_range(StdRng::seed_from_u64(seed))
    }

    /// Creates a weather source over the default range, seeded from the OS.
    pub fn from_entropy() -> Self {
        Self::with_default_range(StdRng::from_entropy())
    }

    fn with_default_range(rng: StdRng) -> Self {
        let range = ModelParams::default().weather_range;
        Self {
            rng,
            distr: Uniform::new_inclusive(range.min, range.max),
        }
    }
}

impl<R: Rng> WeatherSource for RandomWeather<R> {
    fn next_factor(&mut self) -> f64 {
        self.distr.sample(&mut self.rng)
    }
}

/// The same weather every minute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantWeather(pub f64);

impl WeatherSource for ConstantWeather {
    fn next_factor(&mut self) -> f64 {
        self.0
    }
}

/// A fixed sequence of weather factors, repeated once exhausted.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplayWeather {
    factors: Vec<f64>,
    next: usize,
}

impl ReplayWeather {
    pub fn new(factors: Vec<f64>) -> Result<Self> {
        if factors.is_empty() {
            return Err(Error::invalid("weather sequence", "must not be empty"));
        }
        Ok(Self { factors, next: 0 })
    }

    /// Records `count` factors drawn from another source.
    pub fn record(source: &mut impl WeatherSource, count: usize) -> Result<Self> {
        Self::new((0..count).map(|_| source.next_factor()).collect())
    }

    /// Restarts the sequence from its first factor.
    pub fn rewind(&mut self) {
        self.next = 0;
    }
}

impl WeatherSource for ReplayWeather {
    fn next_factor(&mut self) -> f64 {
        let factor = self.factors[self.next];
        self.next = (self.next + 1) % self.factors.len();
        factor
    }
}
