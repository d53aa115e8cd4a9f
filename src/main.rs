use intersection_sim::report::{comparison_row, congestion_level, Summary};
use intersection_sim::{
    compare, run_with_observer, Catalog, Error, InterventionSpec, RandomWeather, SimulationInput,
};
use log::{debug, LevelFilter};
use simple_logger::SimpleLogger;
use std::env;
use std::process::exit;

use crate::args::{Args, Options};

mod args;

fn main() {
    let args = match Args::new(env::args().collect()) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            exit(2);
        }
    };

    let catalog = Catalog::builtin();
    let outcome = match args {
        Args::List => {
            list(catalog);
            Ok(())
        }
        Args::Run {
            intervention,
            vehicles_per_minute,
            minutes,
            options,
        } => {
            init_logger(&options);
            simulate(catalog, &intervention, vehicles_per_minute, minutes, &options)
        }
        Args::Compare {
            vehicles_per_minute,
            minutes,
            options,
        } => {
            init_logger(&options);
            compare_all(catalog, vehicles_per_minute, minutes, &options)
        }
    };

    if let Err(err) = outcome {
        eprintln!("{}", describe(&err, catalog));
        exit(1);
    }
}

fn init_logger(options: &Options) {
    let level = if options.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(err) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Could not initialise logging: {}", err);
    }
}

fn list(catalog: &Catalog) {
    for spec in catalog.iter() {
        println!("{:<18} {:<20} {}", spec.id(), spec.name(), spec.description());
    }
}

fn weather(options: &Options) -> RandomWeather<rand::rngs::StdRng> {
    match options.seed {
        Some(seed) => RandomWeather::seeded(seed),
        None => RandomWeather::from_entropy(),
    }
}

fn find<'c>(catalog: &'c Catalog, key: &str) -> Result<&'c InterventionSpec, Error> {
    catalog.lookup_id(key).or_else(|_| catalog.lookup(key))
}

fn simulate(
    catalog: &Catalog,
    key: &str,
    vehicles_per_minute: u32,
    minutes: u32,
    options: &Options,
) -> Result<(), Error> {
    let intervention = find(catalog, key)?;
    let input = SimulationInput {
        intervention,
        arrival_rate_per_minute: vehicles_per_minute,
        horizon_minutes: minutes,
        peak_hour_enabled: options.peak_hour,
    };

    let result = run_with_observer(input, &mut weather(options), |step, progress| {
        debug!(
            "[{:>3.0}%] {} {:.1} veh/min, {:.1} s wait, congestion {:.0}%",
            progress * 100.0,
            step.clock(),
            step.throughput,
            step.wait_seconds,
            congestion_level(step.wait_seconds) * 100.0
        );
    })?;

    if options.json {
        print_json(&result);
    } else {
        println!("{}", Summary::new(intervention, &result));
    }
    Ok(())
}

fn compare_all(
    catalog: &Catalog,
    vehicles_per_minute: u32,
    minutes: u32,
    options: &Options,
) -> Result<(), Error> {
    let results = compare(
        catalog,
        vehicles_per_minute,
        minutes,
        options.peak_hour,
        &mut weather(options),
    )?;
    for (spec, result) in &results {
        println!("{}", comparison_row(spec, result));
    }
    Ok(())
}

#[cfg(feature = "serde")]
fn print_json(result: &intersection_sim::SimulationResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(err) => {
            eprintln!("Could not serialise result: {}", err);
            exit(1);
        }
    }
}

#[cfg(not(feature = "serde"))]
fn print_json(_result: &intersection_sim::SimulationResult) {
    eprintln!("JSON output requires the `serde` feature");
    exit(2);
}

/// Turns an error into a message the user can act on.
fn describe(err: &Error, catalog: &Catalog) -> String {
    match err {
        Error::NotFound { name } => format!(
            "Unknown traffic solution '{}'. Choose one of: {}",
            name,
            catalog.iter().map(|spec| spec.id()).collect::<Vec<_>>().join(", ")
        ),
        Error::InvalidParameter { .. } => format!("Please enter positive numbers! ({})", err),
        Error::DegenerateStep { .. } => format!("The simulation broke down: {}", err),
        Error::EmptySeries | Error::DuplicateName { .. } => format!("An error occurred: {}", err),
    }
}
