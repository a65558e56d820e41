//! pdispatch Binary
//!
//! Run with: `pdispatch [OPTIONS] <COMMAND>`

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use pdispatch_cli::{parse_argument, Manifest, Session, EXAMPLE_MANIFEST};

#[derive(Parser)]
#[command(name = "pdispatch")]
#[command(about = "Call predicate-dispatched generic functions declared in a manifest")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Manifest declaring the generic functions
    #[arg(short, long, global = true, default_value = "dispatch.toml", env = "PDISPATCH_MANIFEST")]
    manifest: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Call a generic function with JSON arguments
    Call {
        /// Name of the generic function
        function: String,

        /// Arguments, parsed as JSON (bare words become strings)
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Load the manifest and list its generic functions
    Check,

    /// Print the dispatch tree of a generic function
    Tree {
        /// Name of the generic function
        function: String,
    },

    /// Print an example manifest
    Manifest,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Commands::Call { function, args } => {
            let session = load_session(&cli)?;
            let args: Vec<_> = args.iter().map(|raw| parse_argument(raw)).collect();
            debug!("Calling {} with {} arguments", function, args.len());
            match session.call(function, &args) {
                Ok(value) => println!("{}", value),
                Err(e) => {
                    error!("{}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Check => {
            let session = load_session(&cli)?;
            for entry in session.entries() {
                let generic = &entry.generic;
                println!(
                    "{} (arity {}): {} handlers, default: {}",
                    display_name(generic.name()),
                    generic.arity(),
                    generic.table().len(),
                    entry.default.as_deref().unwrap_or("none"),
                );
                for registration in &entry.registrations {
                    println!("  [{}] => {}", registration.predicates.join(", "), registration.handler);
                }
            }
        }
        Commands::Tree { function } => {
            let session = load_session(&cli)?;
            let tree = session
                .render_tree(function)
                .with_context(|| format!("Unknown generic function: {}", function))?;
            print!("{}", tree);
        }
        Commands::Manifest => {
            print!("{}", EXAMPLE_MANIFEST);
        }
    }

    Ok(())
}

fn load_session(cli: &Cli) -> Result<Session> {
    let manifest = Manifest::load(&cli.manifest)
        .with_context(|| format!("Failed to load manifest: {}", cli.manifest.display()))?;
    Session::from_manifest(&manifest)
        .with_context(|| format!("Failed to build generic functions from {}", cli.manifest.display()))
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "<anonymous>"
    } else {
        name
    }
}
