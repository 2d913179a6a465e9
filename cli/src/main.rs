use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use elegant_cli_core::{Engine, Outcome, TypeRegistry, USAGE_EXIT_CODE};
use elegant_cli_loader::{LoaderError, load_engine};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod render;

/// Output format for resolved namespaces.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "elegant-cli")]
#[command(about = "Validate declarative CLI schemas and resolve command lines against them")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load a schema document and report every defect in it.
    Validate(SchemaArgs),
    /// Resolve a command line against a schema and print the result.
    Resolve(ResolveArgs),
    /// Print help for a command of a schema.
    Describe(DescribeArgs),
}

#[derive(Debug, Args)]
struct SchemaArgs {
    /// Schema document (.json, .yaml or .yml).
    #[arg(long)]
    schema: PathBuf,
    /// Program name for the root command (default: the file stem).
    #[arg(long)]
    prog: Option<String>,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    #[command(flatten)]
    schema: SchemaArgs,
    /// Output format for the resolved namespace.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Tokens to resolve, after `--`.
    #[arg(last = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    #[command(flatten)]
    schema: SchemaArgs,
    /// Command words below the root, e.g. `scan deep`.
    path: Vec<String>,
}

/// Why a subcommand failed; decides the exit status.
#[derive(Debug)]
enum Failure {
    /// Unreadable or invalid schema.
    Setup(String),
    /// The resolved command line was wrong; carries the rendered report.
    Usage(String),
}

impl Failure {
    fn exit_code(&self) -> i32 {
        match self {
            Self::Setup(_) => 1,
            Self::Usage(_) => USAGE_EXIT_CODE,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Setup(message) | Self::Usage(message) => message,
        }
    }
}

impl From<LoaderError> for Failure {
    fn from(err: LoaderError) -> Self {
        Self::Setup(err.to_string())
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Resolve(args) => run_resolve(args),
        Command::Describe(args) => run_describe(args),
    };

    if let Err(err) = result {
        eprintln!("error: {}", err.message());
        std::process::exit(err.exit_code());
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load(args: &SchemaArgs) -> Result<Engine, Failure> {
    debug!(schema = %args.schema.display(), "Loading engine");
    Ok(load_engine(
        &args.schema,
        args.prog.as_deref(),
        TypeRegistry::builtin(),
    )?)
}

fn run_validate(args: SchemaArgs) -> Result<(), Failure> {
    let engine = load(&args)?;
    let root = engine.root();
    println!(
        "ok: {} ({} top-level command(s), {} root parameter(s))",
        root.name,
        root.children.len(),
        root.params.len()
    );
    Ok(())
}

fn run_resolve(args: ResolveArgs) -> Result<(), Failure> {
    let engine = load(&args.schema)?;

    match engine.run(&args.tokens) {
        Ok(Outcome::Resolved(ns)) => {
            let text = match args.format {
                CliOutputFormat::Json => serde_json::to_string_pretty(&ns)
                    .map_err(|e| Failure::Setup(e.to_string()))?,
                CliOutputFormat::Yaml => {
                    serde_yaml::to_string(&ns).map_err(|e| Failure::Setup(e.to_string()))?
                }
            };
            println!("{}", text.trim_end());
            Ok(())
        }
        Ok(Outcome::Help(request)) => print_help(&engine, &request.path),
        Err(err) => {
            let usage = engine
                .describe::<&str>(&[])
                .map(|node| render::usage(&node))
                .unwrap_or_default();
            Err(Failure::Usage(format!("{err}\n{usage}")))
        }
    }
}

fn run_describe(args: DescribeArgs) -> Result<(), Failure> {
    let engine = load(&args.schema)?;
    print_help(&engine, &args.path)
}

fn print_help(engine: &Engine, path: &[String]) -> Result<(), Failure> {
    let node = engine
        .describe(path)
        .ok_or_else(|| Failure::Usage(format!("unknown command path: {}", path.join(" "))))?;
    print!("{}", render::help(&node));
    Ok(())
}
