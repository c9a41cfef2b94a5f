use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use scanfix_array::{chunk_value, uniq_value, Statistics};
use scanfix_retry::{CallOutcome, RetryPolicy, RetryPolicyConfig, RetryingCaller, SeededJitter};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod remote;

use remote::SimulatedRemote;

fn cli() -> Command {
    Command::new("scanfix")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Array utilities and a retrying caller over a simulated remote")
        .subcommand_required(true)
        .subcommand(
            Command::new("chunk")
                .about("Split items into groups of a fixed size")
                .arg(
                    Arg::new("size")
                        .long("size")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i64))
                        .help("Maximum group size (must be at least 1)"),
                )
                .arg(items_arg()),
        )
        .subcommand(
            Command::new("uniq")
                .about("Remove duplicate items, keeping first occurrences")
                .arg(items_arg()),
        )
        .subcommand(
            Command::new("stats")
                .about("Print min, max and average of numbers")
                .arg(
                    Arg::new("numbers")
                        .num_args(0..)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64))
                        .help("Numbers to summarise"),
                ),
        )
        .subcommand(
            Command::new("flaky")
                .about("Call a simulated remote that fails a fixed number of times")
                .arg(
                    Arg::new("fail-times")
                        .long("fail-times")
                        .default_value("2")
                        .value_parser(value_parser!(u32))
                        .help("Number of calls that fail before the remote recovers"),
                )
                .arg(
                    Arg::new("latency-ms")
                        .long("latency-ms")
                        .default_value("10")
                        .value_parser(value_parser!(u64))
                        .help("Simulated latency of each call"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML file with retry policy values"),
                )
                .arg(override_arg("max-attempts", "Maximum number of attempts"))
                .arg(override_arg("initial-delay-ms", "Backoff before the second attempt"))
                .arg(override_arg("max-delay-ms", "Cap on the exponential backoff"))
                .arg(override_arg("jitter-ceiling-ms", "Upper bound of the random jitter"))
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Seed for reproducible jitter"),
                )
                .arg(
                    Arg::new("quiet")
                        .long("quiet")
                        .action(ArgAction::SetTrue)
                        .help("Only print the final result"),
                ),
        )
}

fn items_arg() -> Arg {
    Arg::new("items")
        .num_args(0..)
        .allow_negative_numbers(true)
        .help("Items; JSON literals are parsed, anything else is a string")
}

fn override_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_parser(value_parser!(u64))
        .help(help)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Parse a command-line item as JSON, falling back to a plain string
fn parse_item(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

fn collect_items(args: &ArgMatches) -> Value {
    let items = args
        .get_many::<String>("items")
        .into_iter()
        .flatten()
        .map(|raw| parse_item(raw))
        .collect();
    Value::Array(items)
}

/// Values given on the command line that replace config file values
#[derive(Debug, Default, Clone, Copy)]
struct PolicyOverrides {
    max_attempts: Option<u64>,
    initial_delay_ms: Option<u64>,
    max_delay_ms: Option<u64>,
    jitter_ceiling_ms: Option<u64>,
}

impl PolicyOverrides {
    fn from_args(args: &ArgMatches) -> Self {
        let get = |name: &str| args.get_one::<u64>(name).copied();
        Self {
            max_attempts: get("max-attempts"),
            initial_delay_ms: get("initial-delay-ms"),
            max_delay_ms: get("max-delay-ms"),
            jitter_ceiling_ms: get("jitter-ceiling-ms"),
        }
    }

    fn apply(self, mut config: RetryPolicyConfig) -> Result<RetryPolicyConfig> {
        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts =
                u32::try_from(max_attempts).context("--max-attempts is out of range")?;
        }
        if let Some(ms) = self.initial_delay_ms {
            config.initial_delay_ms = ms;
        }
        if let Some(ms) = self.max_delay_ms {
            config.max_delay_ms = ms;
        }
        if let Some(ms) = self.jitter_ceiling_ms {
            config.jitter_ceiling_ms = ms;
        }
        Ok(config)
    }
}

/// Resolve the policy: defaults, then the config file, then flags
fn build_policy(config: Option<&PathBuf>, overrides: PolicyOverrides) -> Result<RetryPolicy> {
    let base = match config {
        Some(path) => RetryPolicyConfig::load(path)
            .with_context(|| format!("loading retry policy from {}", path.display()))?,
        None => RetryPolicyConfig::default(),
    };
    let policy = RetryPolicy::try_from(overrides.apply(base)?).context("invalid retry policy")?;
    Ok(policy)
}

async fn run_flaky(args: &ArgMatches) -> Result<bool> {
    let fail_times = *args.get_one::<u32>("fail-times").unwrap_or(&2);
    let latency = Duration::from_millis(*args.get_one::<u64>("latency-ms").unwrap_or(&10));
    let quiet = args.get_flag("quiet");
    let policy = build_policy(
        args.get_one::<PathBuf>("config"),
        PolicyOverrides::from_args(args),
    )?;

    let mut caller = RetryingCaller::new(policy);
    if let Some(seed) = args.get_one::<u64>("seed") {
        caller = caller.with_jitter(SeededJitter::new(*seed));
    }

    if !quiet {
        println!("Max attempts: {}", policy.max_attempts());
        println!("Initial delay: {:?}", policy.initial_delay());
        println!("Max delay: {:?}", policy.max_delay());
        println!("Jitter ceiling: {:?}", policy.jitter_ceiling());
        println!("Failing calls: {fail_times}");
        println!();
    }

    let remote = SimulatedRemote::new(fail_times, latency);
    let outcome = caller.call(|| remote.call()).await;
    tracing::debug!(calls = remote.calls(), "remote call sequence finished");

    match outcome {
        CallOutcome::Success { value, attempts } => {
            println!("Success after {attempts} attempt(s): {value}");
            Ok(true)
        }
        CallOutcome::Failure(err) => {
            println!("Failure: {err}");
            Ok(false)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("chunk", args)) => {
            let size = *args.get_one::<i64>("size").context("--size is required")?;
            let groups = chunk_value(&collect_items(args), size)?;
            println!("{}", serde_json::to_string(&groups)?);
        }
        Some(("uniq", args)) => {
            let unique = uniq_value(&collect_items(args))?;
            println!("{}", serde_json::to_string(&unique)?);
        }
        Some(("stats", args)) => {
            let numbers: Vec<f64> = args
                .get_many::<f64>("numbers")
                .into_iter()
                .flatten()
                .copied()
                .collect();
            if let Some(stats) = Statistics::of(&numbers) {
                println!("- Min: {}", stats.min);
                println!("- Max: {}", stats.max);
                println!("- Average: {}", stats.average);
            }
        }
        Some(("flaky", args)) => {
            let succeeded = run_flaky(args).await?;
            std::process::exit(if succeeded { 0 } else { 1 });
        }
        _ => {}
    }
    Ok(())
}
