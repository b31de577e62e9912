use clap::{Args, Parser, Subcommand};
use phase_stepping_fit::config::{
    DEFAULT_AVERAGE, DEFAULT_NOISE, DEFAULT_PHASE, DEFAULT_STEPS, DEFAULT_VISIBILITY,
};
use phase_stepping_fit::{
    ComparisonConfig, DEFAULT_NOISE_REGISTRY, TrialConfig, run_comparison, run_configured_trial,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Compare the least squares fit with the fourier component analysis"
)]
struct Cli {
    /// Enable tracing output, filtered by RUST_LOG
    #[clap(long, global = true)]
    trace: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit a single phase stepping curve with both methods
    Fit(FitArgs),
    /// Run the fits many times with random parameters and summarize the differences
    Compare(CompareArgs),
}

#[derive(Args, Debug)]
struct FitArgs {
    /// Average number of photons in the phase stepping curve
    #[clap(short = 'c', long, default_value_t = DEFAULT_AVERAGE)]
    constant: f64,

    /// Phase shift
    #[clap(short, long, default_value_t = DEFAULT_PHASE, allow_hyphen_values = true)]
    phase: f64,

    /// Visibility of the system (must be between 0 and 1)
    #[clap(short, long, default_value_t = DEFAULT_VISIBILITY)]
    visibility: f64,

    /// Number of phase steps
    #[clap(short = 'n', long, default_value_t = DEFAULT_STEPS)]
    steps: usize,

    /// Noise added to the phase steps
    #[clap(long, default_value = DEFAULT_NOISE)]
    noise: String,

    /// Seed of the noise generator
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Print the result as JSON
    #[clap(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Number of comparisons [default: 10000]
    #[clap(short = 'n', long)]
    trials: Option<usize>,

    /// Noise added to the phase steps [default: zero]
    #[clap(long)]
    noise: Option<String>,

    /// Seed of the trial generators [default: 0]
    #[clap(long)]
    seed: Option<u64>,

    /// JSON comparison configuration, command line options override it
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the JSON schema of the comparison configuration and exit
    #[clap(long)]
    print_schema: bool,

    /// Print the discrepancy of every trial, one per line
    #[clap(long)]
    series: bool,
}

fn fit(args: FitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = TrialConfig {
        average: args.constant,
        phase: args.phase,
        visibility: args.visibility,
        steps: args.steps,
        noise: args.noise,
    };
    let mut rng = StdRng::seed_from_u64(args.seed);
    let result = run_configured_trial(&config, &DEFAULT_NOISE_REGISTRY, &mut rng)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("original parameters: {:?}", result.original.to_array());
        println!("least squares fit: {:?}", result.least_squares.to_array());
        println!("fourier analysis: {:?}", result.fourier.to_array());
    }
    Ok(())
}

fn compare(args: CompareArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.print_schema {
        let schema = schemars::schema_for!(ComparisonConfig);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let mut config: ComparisonConfig = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => ComparisonConfig::default(),
    };
    if let Some(trials) = args.trials {
        config.trials = trials;
    }
    if let Some(noise) = args.noise {
        config.noise = noise;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let comparison = run_comparison(&config, &DEFAULT_NOISE_REGISTRY)?;
    if args.series {
        for discrepancy in comparison.discrepancies() {
            println!("{discrepancy:e}");
        }
    }
    if let Some(summary) = comparison.summary() {
        eprintln!(
            "{} trials, lst - fourier: mean {:e}, min {:e}, max {:e} (trial {})",
            summary.trials, summary.mean, summary.min, summary.max, summary.argmax,
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("phase_stepping_fit=debug".parse()?),
            )
            .with_target(false)
            .init();
    }

    match cli.command {
        Command::Fit(args) => fit(args),
        Command::Compare(args) => compare(args),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
