//! CML CLI

mod manifest;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cml_model::{
    check_references, compute_derivation_score, normalize, to_notation, type_of_model, Domain,
    Environment, Type, TypeMappings,
};
use miette::{miette, IntoDiagnostic, Report, Result, WrapErr};
use tracing_subscriber::EnvFilter;

use manifest::Manifest;

#[derive(Parser)]
#[command(name = "cml")]
#[command(version)]
#[command(about = "Inspect CML environments and types")]
struct Cli {
    /// Environment manifest (JSON)
    #[arg(long, global = true)]
    env: Option<PathBuf>,

    /// Do not add the builtin domain to the environment
    #[arg(long, global = true)]
    no_builtins: bool,

    /// Raise log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that every attribute type references a declared model
    Check,
    /// Resolve a model name to its qualified name
    Resolve {
        name: String,
        /// Domain to resolve relative names from
        #[arg(long)]
        context: Option<String>,
    },
    /// Print the canonical notation of a type
    Normalize {
        #[arg(value_name = "TYPE")]
        ty: String,
        /// Domain to resolve relative names from
        #[arg(long)]
        context: Option<String>,
    },
    /// Print the most generic type of a model
    Model {
        /// Fully qualified model name
        name: String,
    },
    /// Print the derivation score of one type against another
    Score { derived: String, generic: String },
    /// Find the mapping target for a type
    Map {
        #[arg(value_name = "TYPE")]
        ty: String,
        /// Type mapping file (JSON)
        #[arg(long)]
        mappings: PathBuf,
        /// Domain to resolve relative names from
        #[arg(long)]
        context: Option<String>,
    },
}

fn main() -> ExitCode {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{:?}", report);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // RUST_LOG overrides the flag-derived default.
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let options = EnvOptions {
        path: cli.env,
        builtins: !cli.no_builtins,
    };

    match cli.command {
        Command::Check => cmd_check(&options.load()?),
        Command::Resolve { name, context } => cmd_resolve(&options.load()?, &name, context.as_deref()),
        Command::Normalize { ty, context } => {
            cmd_normalize(&options.load()?, &ty, context.as_deref())
        }
        Command::Model { name } => cmd_model(&options.load()?, &name),
        Command::Score { derived, generic } => cmd_score(&derived, &generic),
        Command::Map { ty, mappings, context } => {
            cmd_map(&options.load()?, &ty, &mappings, context.as_deref())
        }
    }
}

struct EnvOptions {
    path: Option<PathBuf>,
    builtins: bool,
}

impl EnvOptions {
    /// Without `--env` the environment holds only the builtin domain.
    fn load(&self) -> Result<Environment> {
        let manifest = match &self.path {
            Some(path) => Manifest::load(path)?,
            None => Manifest::default(),
        };
        manifest.into_environment(self.builtins)
    }
}

fn context<'a>(env: &'a Environment, name: Option<&str>) -> Result<Option<&'a Domain>> {
    match name {
        None => Ok(None),
        Some(name) => env
            .resolve_domain(name)
            .map(Some)
            .ok_or_else(|| miette!("domain '{}' not found", name)),
    }
}

fn parse_type(text: &str) -> Result<Type> {
    cml_model::parse_notation(text).wrap_err_with(|| format!("cannot parse type '{}'", text))
}

fn cmd_check(env: &Environment) -> Result<()> {
    match check_references(env) {
        Ok(()) => {
            println!(
                "OK: {} domains, {} models",
                env.domains().count(),
                env.model_count()
            );
            Ok(())
        }
        Err(errors) => {
            let count = errors.len();
            for error in errors {
                eprintln!("{:?}", Report::new(error));
            }
            Err(miette!("reference check failed with {} error(s)", count))
        }
    }
}

fn cmd_resolve(env: &Environment, name: &str, context_name: Option<&str>) -> Result<()> {
    let context = context(env, context_name)?;
    let (domain, model) = env
        .resolve_model(name, context)
        .ok_or_else(|| miette!("model '{}' not found", name))?;

    println!("{}", cml_model::qualified_name(domain, model));
    Ok(())
}

fn cmd_normalize(env: &Environment, text: &str, context_name: Option<&str>) -> Result<()> {
    let context = context(env, context_name)?;
    let ty = parse_type(text)?;

    println!("{}", to_notation(&ty, env, context)?);
    Ok(())
}

fn cmd_model(env: &Environment, name: &str) -> Result<()> {
    let (domain, model) = env
        .resolve_qualified(name)
        .ok_or_else(|| miette!("model '{}' not found", name))?;

    println!("{}", type_of_model(env, domain, model)?);
    Ok(())
}

fn cmd_score(derived: &str, generic: &str) -> Result<()> {
    let derived = parse_type(derived)?;
    let generic = parse_type(generic)?;

    println!("{}", compute_derivation_score(&derived, &generic));
    Ok(())
}

fn cmd_map(
    env: &Environment,
    text: &str,
    mappings_path: &Path,
    context_name: Option<&str>,
) -> Result<()> {
    let context = context(env, context_name)?;
    let ty = normalize(&parse_type(text)?, env, context)?;

    let source = std::fs::read_to_string(mappings_path)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot read mapping file {}", mappings_path.display()))?;
    let mappings: TypeMappings<serde_json::Value> = TypeMappings::from_json(&source)?.canonicalize(env)?;

    let found = mappings
        .best_match(&ty)
        .ok_or_else(|| miette!("no mapping applies to {}", ty))?;

    match found.target {
        serde_json::Value::String(target) => println!("{}", target),
        target => println!("{}", target),
    }
    println!("matched {} with score {}", found.cml_type, found.score);
    Ok(())
}
