use crate::binding::{self, Binding};
use crate::{SecretKey, TYPE, bindings};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Main CLI structure for the service-bindings application.
///
/// Discovers the bindings projected into this container and prints what they
/// declare.
#[derive(Parser, Debug)]
#[command(name = "service-bindings")]
#[command(about = "Inspect Kubernetes service bindings projected into a container", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory bindings are projected under
    #[arg(short, long, global = true, env = "SERVICE_BINDING_ROOT")]
    root: Option<PathBuf>,
    /// Log discovery and lookups to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    /// The subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands for the service-bindings CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List every binding with its type and provider
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the value of one entry of a binding
    Get {
        /// Name of the binding (case-insensitive)
        binding: String,
        /// Key of the entry
        key: SecretKey,
    },
    /// List the bindings with a given type and/or provider
    Filter {
        /// Type of binding to match (case-insensitive)
        #[arg(short = 't', long = "type")]
        binding_type: Option<String>,
        /// Provider of binding to match (case-insensitive)
        #[arg(short, long)]
        provider: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// What the CLI reports about a single binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub binding_type: Option<String>,
    pub provider: Option<String>,
}

impl BindingSummary {
    /// Reads the name, type and provider of a binding.
    ///
    /// Unlike [`binding::get_type`], a missing type is reported as `None`.
    pub fn from_binding<B: Binding + ?Sized>(b: &B) -> crate::Result<Self> {
        Ok(Self {
            name: b.name().to_string(),
            binding_type: binding::get(b, TYPE)?,
            provider: binding::get_provider(b)?,
        })
    }
}

/// Renders summaries as an aligned table with a header row.
///
/// Absent attributes are shown as `-`.
pub fn render_table(summaries: &[BindingSummary]) -> String {
    let rows: Vec<[&str; 3]> = summaries
        .iter()
        .map(|s| {
            [
                s.name.as_str(),
                s.binding_type.as_deref().unwrap_or("-"),
                s.provider.as_deref().unwrap_or("-"),
            ]
        })
        .collect();

    let header = ["NAME", "TYPE", "PROVIDER"];
    let name_width = rows.iter().map(|r| r[0].len()).fold(header[0].len(), usize::max);
    let type_width = rows.iter().map(|r| r[1].len()).fold(header[1].len(), usize::max);

    let mut output = String::new();
    for row in std::iter::once(header).chain(rows) {
        output.push_str(&format!(
            "{:<name_width$}  {:<type_width$}  {}\n",
            row[0], row[1], row[2]
        ));
    }
    output
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn discover(root: Option<&PathBuf>) -> Result<Vec<Arc<dyn Binding>>> {
    let discovered = match root {
        Some(root) => bindings::from_path(root)
            .wrap_err_with(|| format!("Failed to read bindings from {}", root.display()))?,
        None => bindings::from_service_binding_root()
            .wrap_err("Failed to read bindings from $SERVICE_BINDING_ROOT")?,
    };

    Ok(bindings::cached(&discovered))
}

fn summarize(bindings: &[Arc<dyn Binding>]) -> Result<Vec<BindingSummary>> {
    bindings
        .iter()
        .map(|b| {
            BindingSummary::from_binding(b)
                .wrap_err_with(|| format!("Failed to read binding '{}'", b.name()))
        })
        .collect()
}

fn print_summaries(out: &mut dyn Write, summaries: &[BindingSummary], json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(summaries)?)?;
        return Ok(());
    }

    if summaries.is_empty() {
        writeln!(out, "No bindings found")?;
        return Ok(());
    }

    let table = render_table(summaries);
    let mut lines = table.lines();
    if let Some(header) = lines.next() {
        writeln!(out, "{}", header.bold())?;
    }
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Runs a parsed command against an already discovered set of bindings.
fn execute(command: Commands, bindings: &[Arc<dyn Binding>], out: &mut dyn Write) -> Result<()> {
    match command {
        // Show every binding with its declared type and provider
        Commands::List { json } => print_summaries(out, &summarize(bindings)?, json),
        // Print a single trimmed entry value
        Commands::Get { binding: name, key } => {
            let b = bindings::find(bindings, &name)
                .ok_or_else(|| eyre!("Binding '{}' not found", name))?;
            let value = binding::get(b, &key)
                .wrap_err_with(|| format!("Failed to read '{}' from binding '{}'", key, name))?
                .ok_or_else(|| eyre!("Binding '{}' has no entry '{}'", b.name(), key))?;
            writeln!(out, "{}", value)?;
            Ok(())
        }
        // Narrow the bindings by type and provider
        Commands::Filter {
            binding_type,
            provider,
            json,
        } => {
            let matched = bindings::filter(bindings, binding_type.as_deref(), provider.as_deref())
                .wrap_err("Failed to filter bindings")?;
            print_summaries(out, &summarize(&matched)?, json)
        }
    }
}

/// Main entry point for the service-bindings CLI application.
///
/// Parses command-line arguments, discovers bindings from `--root` (or
/// `$SERVICE_BINDING_ROOT`) and executes the requested command.
pub fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let bindings = discover(cli.root.as_ref())?;
    let stdout = io::stdout();
    execute(cli.command, &bindings, &mut stdout.lock())
}
