//! Display values derived from a run, for front ends.

use crate::catalog::InterventionSpec;
use crate::params::MINUTES_PER_HOUR;
use crate::simulation::{cost_projection, SimulationResult, SimulationStep};
use itertools::Itertools;
use std::fmt;

/// The currency symbol used when formatting costs.
pub const CURRENCY: &str = "₱";

/// The number of years used for the headline cost projection.
pub const PROJECTION_YEARS: f64 = 5.0;

/// A wait time, in seconds, which is considered fully congested.
const CONGESTED_WAIT: f64 = 60.0; // s

/// A summary of one completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary<'a> {
    pub intervention: &'a InterventionSpec,
    pub total_vehicles: u64,
    pub average_wait_seconds: f64,
    /// The implementation cost plus five years of maintenance.
    pub projected_cost: f64,
}

impl<'a> Summary<'a> {
    pub fn new(intervention: &'a InterventionSpec, result: &SimulationResult) -> Self {
        Self {
            intervention,
            total_vehicles: result.total_vehicles,
            average_wait_seconds: result.average_wait_seconds,
            projected_cost: cost_projection(intervention, PROJECTION_YEARS),
        }
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec = self.intervention;
        writeln!(f, "SIMULATION RESULTS")?;
        writeln!(f, "==================")?;
        writeln!(f, "Solution: {}", spec.name())?;
        writeln!(
            f,
            "Total vehicles processed: {}",
            group_thousands(&self.total_vehicles.to_string())
        )?;
        writeln!(f, "Average wait time: {:.1} seconds", self.average_wait_seconds)?;
        writeln!(f)?;
        writeln!(f, "COST ANALYSIS")?;
        writeln!(f, "==================")?;
        writeln!(f, "Implementation cost: {}", format_money(spec.implementation_cost()))?;
        writeln!(f, "Yearly maintenance: {}", format_money(spec.annual_maintenance_cost()))?;
        write!(
            f,
            "{}-year total cost: {}",
            PROJECTION_YEARS,
            format_money(self.projected_cost)
        )
    }
}

impl SimulationStep {
    /// The simulated time of day as `HH:MM`.
    pub fn clock(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.minute_index / MINUTES_PER_HOUR,
            self.minute_index % MINUTES_PER_HOUR
        )
    }
}

/// Maps a wait time onto a congestion level between 0 and 1.
pub fn congestion_level(wait_seconds: f64) -> f64 {
    (wait_seconds / CONGESTED_WAIT).clamp(0.0, 1.0)
}

/// The intervention's efficiency as a percentage of the baseline.
pub fn efficiency_percent(spec: &InterventionSpec) -> f64 {
    spec.efficiency() * 100.0
}

/// Formats an amount of money with two decimals and thousands separators, e.g. `₱1,250.00`.
pub fn format_money(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}{}.{}", sign, CURRENCY, group_thousands(whole), cents)
}

/// Inserts a comma between every group of three digits.
fn group_thousands(digits: &str) -> String {
    digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(String::from_utf8_lossy)
        .join(",")
}

/// Renders one line of a comparison table.
pub fn comparison_row(spec: &InterventionSpec, result: &SimulationResult) -> String {
    format!(
        "{:<20} {:>5.0}% {:>10} veh {:>7.1} s {:>20}",
        spec.name(),
        efficiency_percent(spec),
        group_thousands(&result.total_vehicles.to_string()),
        result.average_wait_seconds,
        format_money(cost_projection(spec, PROJECTION_YEARS)),
    )
}
