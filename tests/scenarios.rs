//! Tests that run whole simulations against known outcomes.

use assert_approx_eq::assert_approx_eq;
use intersection_sim::{
    aggregate, cost_projection, run, Catalog, ConstantWeather, Error, InterventionAttributes,
    InterventionSpec, RandomWeather, ReplayWeather, SimulationInput,
};

fn roundabout() -> InterventionSpec {
    InterventionSpec::new(&InterventionAttributes {
        id: "roundabout",
        name: "Roundabout",
        efficiency: 1.0,
        base_wait_seconds: 20.0,
        implementation_cost: 10_000_000.0,
        annual_maintenance_cost: 300_000.0,
        description: "Modern roundabout with yield signs and proper lighting",
    })
    .unwrap()
}

fn input(spec: &InterventionSpec, arrival: u32, horizon: u32, peak: bool) -> SimulationInput<'_> {
    SimulationInput {
        intervention: spec,
        arrival_rate_per_minute: arrival,
        horizon_minutes: horizon,
        peak_hour_enabled: peak,
    }
}

/// A single off-peak minute in neutral weather passes exactly the demand.
#[test]
fn one_minute_off_peak() {
    let spec = roundabout();
    let result = run(input(&spec, 60, 1, false), &mut ConstantWeather(1.0)).unwrap();
    assert_eq!(result.series.len(), 1);
    assert_eq!(result.series[0].minute_index, 0);
    assert_eq!(result.series[0].throughput, 60.0);
    assert_eq!(result.series[0].wait_seconds, 20.0);
    assert_eq!(result.total_vehicles, 60);
    assert_eq!(result.average_wait_seconds, 20.0);
}

/// Minutes 15 to 45 of an hour run at reduced efficiency when peak hour is on.
#[test]
fn one_hour_with_peak() {
    let spec = roundabout();
    let result = run(input(&spec, 60, 60, true), &mut ConstantWeather(1.0)).unwrap();
    assert_eq!(result.series.len(), 60);
    for step in &result.series {
        if (15..=45).contains(&step.minute_index) {
            assert_approx_eq!(step.throughput, 42.0);
            assert_approx_eq!(step.wait_seconds, 20.0 * 60.0 / 42.0);
            assert_approx_eq!(step.wait_seconds, 28.571, 1e-3);
        } else {
            assert_eq!(step.throughput, 60.0);
            assert_eq!(step.wait_seconds, 20.0);
        }
    }
    // 29 minutes at 60 and 31 minutes at (about) 42
    assert!((3041..=3042).contains(&result.total_vehicles));
}

/// The peak window recurs every hour for any efficiency.
#[test]
fn peak_recurs_hourly() {
    for spec in Catalog::builtin().iter() {
        let result = run(input(spec, 25, 200, true), &mut ConstantWeather(1.0)).unwrap();
        for step in &result.series {
            let expected = if (15..=45).contains(&(step.minute_index % 60)) {
                25.0 * spec.efficiency() * 0.7
            } else {
                25.0 * spec.efficiency()
            };
            assert_approx_eq!(step.throughput, expected);
        }
    }
}

#[test]
fn five_year_cost() {
    assert_eq!(cost_projection(&roundabout(), 5.0), 11_500_000.0);
}

/// Replaying the same weather produces an identical result.
#[test]
fn reproducible_under_replayed_weather() {
    let spec = roundabout();
    let mut weather = ReplayWeather::record(&mut RandomWeather::seeded(2024), 500).unwrap();
    let first = run(input(&spec, 40, 500, true), &mut weather).unwrap();
    weather.rewind();
    let second = run(input(&spec, 40, 500, true), &mut weather).unwrap();
    assert_eq!(first, second);

    let third = run(input(&spec, 40, 500, true), &mut RandomWeather::seeded(2024)).unwrap();
    assert_eq!(first, third);
}

/// Random weather keeps every minute within 80% to 120% of nominal throughput.
#[test]
fn random_weather_bounds() {
    let spec = roundabout();
    let result = run(input(&spec, 50, 1000, false), &mut RandomWeather::seeded(11)).unwrap();
    for step in &result.series {
        assert!(step.throughput >= 40.0 && step.throughput <= 60.0);
        assert!(step.wait_seconds >= 20.0 / 1.2 - 1e-9 && step.wait_seconds <= 25.0 + 1e-9);
    }
}

/// A more efficient intervention always waits less in the same conditions.
#[test]
fn wait_decreases_with_efficiency() {
    let catalog = Catalog::builtin();
    let mut specs = catalog.iter().collect::<Vec<_>>();
    specs.sort_by(|a, b| a.efficiency().partial_cmp(&b.efficiency()).unwrap());

    let with_efficiency = |efficiency: f64| {
        InterventionSpec::new(&InterventionAttributes {
            id: "probe",
            name: "Probe",
            efficiency,
            base_wait_seconds: 30.0,
            implementation_cost: 0.0,
            annual_maintenance_cost: 0.0,
            description: "",
        })
        .unwrap()
    };

    let mut last_wait = f64::INFINITY;
    for spec in specs {
        let probe = with_efficiency(spec.efficiency());
        let mut weather = ReplayWeather::new(vec![0.9, 1.1, 1.0]).unwrap();
        let result = run(input(&probe, 30, 3, true), &mut weather).unwrap();
        let wait = result.series[1].wait_seconds;
        assert!(wait < last_wait);
        last_wait = wait;
    }
}

#[test]
fn invalid_inputs_produce_no_series() {
    let spec = roundabout();
    let mut weather = ConstantWeather(1.0);
    assert!(matches!(
        run(input(&spec, 60, 0, false), &mut weather),
        Err(Error::InvalidParameter { .. })
    ));
    assert!(matches!(
        run(input(&spec, 0, 60, false), &mut weather),
        Err(Error::InvalidParameter { .. })
    ));
}

#[test]
fn zero_weather_is_degenerate() {
    let spec = roundabout();
    assert_eq!(
        run(input(&spec, 60, 10, false), &mut ConstantWeather(0.0)),
        Err(Error::DegenerateStep { minute: 0 })
    );
}

#[test]
fn aggregate_matches_result() {
    let spec = roundabout();
    let result = run(input(&spec, 33, 240, true), &mut RandomWeather::seeded(5)).unwrap();
    let (total, average) = aggregate(&result.series).unwrap();
    assert_eq!(total, result.total_vehicles);
    assert_eq!(average, result.average_wait_seconds);

    let sum: f64 = result.series.iter().map(|s| s.throughput).sum();
    assert_eq!(total, sum as u64);
    let mean = result.series.iter().map(|s| s.wait_seconds).sum::<f64>() / 240.0;
    assert_approx_eq!(average, mean);

    assert_eq!(aggregate(&[]), Err(Error::EmptySeries));
}
