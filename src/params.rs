use crate::error::{Error, Result};
use crate::util::Interval;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The number of simulated minutes in an hour.
pub const MINUTES_PER_HOUR: u32 = 60;

/// The minutes of each hour during which peak-hour traffic applies.
pub const PEAK_WINDOW: Interval<u32> = Interval::new(15, 45);

/// The efficiency multiplier applied during the peak-hour window.
pub const PEAK_FACTOR: f64 = 0.7;

/// The range of the per-minute weather factor.
pub const WEATHER_RANGE: Interval<f64> = Interval::new(0.8, 1.2);

/// The parameters of the throughput model.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModelParams {
    /// The length of the recurring cycle in minutes.
    pub minutes_per_hour: u32,
    /// The minutes within each cycle which are degraded, inclusive.
    pub peak_window: Interval<u32>,
    /// The efficiency multiplier within the peak window.
    pub peak_factor: f64,
    /// The range that [RandomWeather::from_params](crate::RandomWeather::from_params)
    /// samples weather factors from.
    pub weather_range: Interval<f64>,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            minutes_per_hour: MINUTES_PER_HOUR,
            peak_window: PEAK_WINDOW,
            peak_factor: PEAK_FACTOR,
            weather_range: WEATHER_RANGE,
        }
    }
}

impl ModelParams {
    /// Checks that the parameters describe a usable model.
    pub fn validate(&self) -> Result<()> {
        if self.minutes_per_hour == 0 {
            return Err(Error::invalid("hour length", "must be positive"));
        }
        if !self.peak_window.is_ordered() || self.peak_window.max >= self.minutes_per_hour {
            return Err(Error::invalid(
                "peak window",
                format!(
                    "{:?} does not fit within a {} minute hour",
                    self.peak_window, self.minutes_per_hour
                ),
            ));
        }
        if !(self.peak_factor.is_finite() && self.peak_factor > 0.0) {
            return Err(Error::invalid(
                "peak factor",
                format!("must be positive, got {}", self.peak_factor),
            ));
        }
        let range = self.weather_range;
        if !(range.is_ordered() && range.min > 0.0 && range.max.is_finite()) {
            return Err(Error::invalid(
                "weather range",
                format!("{:?} must be a positive, finite range", range),
            ));
        }
        Ok(())
    }

    /// Whether the given absolute minute falls within the peak-hour window.
    pub fn is_peak_minute(&self, minute: u32) -> bool {
        self.peak_window.contains(minute % self.minutes_per_hour)
    }
}
