pub enum Args {
    List,
    Run {
        intervention: String,
        vehicles_per_minute: u32,
        minutes: u32,
        options: Options,
    },
    Compare {
        vehicles_per_minute: u32,
        minutes: u32,
        options: Options,
    },
}

#[derive(Default)]
pub struct Options {
    pub peak_hour: bool,
    pub seed: Option<u64>,
    pub verbose: bool,
    pub json: bool,
}

const USAGE: &str = "usage: intersection-sim <intervention-id> <vehicles/min> <minutes> [-p] [--seed N] [-v] [--json]
       intersection-sim --compare <vehicles/min> <minutes> [-p] [--seed N] [-v]
       intersection-sim --list";

impl Args {
    pub fn new(args: Vec<String>) -> Result<Args, String> {
        let mut options = Options::default();
        let mut positional = vec![];
        let mut compare = false;

        let mut iter = args.into_iter().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--list" => return Ok(Args::List),
                "--compare" => compare = true,
                "-p" | "--peak" => options.peak_hour = true,
                "-v" | "--verbose" => options.verbose = true,
                "--json" => options.json = true,
                "--seed" => {
                    let seed = iter.next().ok_or("--seed requires a value")?;
                    options.seed = Some(
                        seed.parse()
                            .map_err(|_| format!("Invalid seed '{}'", seed))?,
                    );
                }
                _ if arg.starts_with('-') => return Err(format!("Unknown option '{}'\n{}", arg, USAGE)),
                _ => positional.push(arg),
            }
        }

        if options.json && compare {
            return Err("--json is only supported for a single run".to_string());
        }
        if options.json && !cfg!(feature = "serde") {
            return Err("--json requires building with the `serde` feature".to_string());
        }

        match (compare, positional.as_slice()) {
            (false, [intervention, vehicles, minutes]) => Ok(Args::Run {
                intervention: intervention.clone(),
                vehicles_per_minute: parse_positive("vehicles per minute", vehicles)?,
                minutes: parse_positive("simulation time", minutes)?,
                options,
            }),
            (true, [vehicles, minutes]) => Ok(Args::Compare {
                vehicles_per_minute: parse_positive("vehicles per minute", vehicles)?,
                minutes: parse_positive("simulation time", minutes)?,
                options,
            }),
            _ => Err(USAGE.to_string()),
        }
    }
}

fn parse_positive(what: &str, value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!(
            "Please enter a positive whole number for {} (got '{}')",
            what, value
        )),
    }
}
