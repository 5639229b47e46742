use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use nf_ast::{ConvertOptions, SubstitutionTable};
use nf_batch::{concat_results, convert_batch, convert_file};
use nf_parser::{locate_define, parse_script};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nodefy", about = "nodefy - rewrite AMD modules as CommonJS")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single file.
    Convert {
        /// Input .js file.
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Convert every file matched by a glob pattern.
    Batch {
        /// Glob pattern, e.g. `src/**/*.js`.
        pattern: String,
        /// Output directory mirroring the matched layout (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the per-file records as JSON instead of the concatenated output.
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Parse the file and report syntax or define() errors.
    Check { input: PathBuf },
    /// Dump the located define() call as JSON.
    Inspect {
        input: PathBuf,
        /// Dump the full SWC script AST instead.
        #[arg(long)]
        ast: bool,
    },
}

#[derive(Args)]
struct OptionArgs {
    /// JSON file with `map`, `paths`, `baseDir`, `relDir` and `moduleId`.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Substitute a dependency id, `from=to`. Repeatable.
    #[arg(long = "map", value_name = "FROM=TO", value_parser = parse_pair)]
    map: Vec<(String, String)>,
    /// Path table entry, `prefix=dir`. Repeatable.
    #[arg(long = "path", value_name = "PREFIX=DIR", value_parser = parse_pair)]
    paths: Vec<(String, String)>,
    #[arg(long)]
    base_dir: Option<PathBuf>,
    #[arg(long)]
    rel_dir: Option<PathBuf>,
}

impl OptionArgs {
    fn into_options(self) -> Result<ConvertOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str::<ConvertOptions>(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => ConvertOptions::default(),
        };

        if !self.map.is_empty() {
            let map = options.map.get_or_insert_with(SubstitutionTable::new);
            for (from, to) in self.map {
                map.insert(from, to);
            }
        }
        if !self.paths.is_empty() {
            options
                .paths
                .get_or_insert_with(BTreeMap::new)
                .extend(self.paths);
        }
        if self.base_dir.is_some() {
            options.base_dir = self.base_dir;
        }
        if self.rel_dir.is_some() {
            options.rel_dir = self.rel_dir;
        }
        tracing::debug!(?options, "conversion options");
        Ok(options)
    }
}

fn parse_pair(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((from, to)) if !from.is_empty() => Ok((from.to_string(), to.to_string())),
        _ => bail!("expected KEY=VALUE, got `{arg}`"),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert {
            input,
            output,
            options,
        } => {
            let options = options.into_options()?;
            let converted = convert_file(&input, output.as_deref(), &options)?;
            if output.is_none() {
                print!("{converted}");
            }
        }
        Commands::Batch {
            pattern,
            output,
            json,
            options,
        } => {
            let options = options.into_options()?;
            let records = convert_batch(&pattern, output.as_deref(), &options)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if output.is_none() {
                print!("{}", concat_results(&records));
            } else {
                eprintln!("Converted {} file(s)", records.len());
            }
        }
        Commands::Check { input } => {
            let source = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let filename = input.display().to_string();

            let parsed = parse_script(&source, &filename)?;
            match locate_define(&parsed, &source)? {
                Some(_) => eprintln!("OK: {filename} (define call found)"),
                None => eprintln!("OK: {filename} (no define call, left unchanged)"),
            }
        }
        Commands::Inspect { input, ast } => {
            let source = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let filename = input.display().to_string();

            let parsed = parse_script(&source, &filename)?;
            let json = if ast {
                serde_json::to_string_pretty(&parsed.script)?
            } else {
                serde_json::to_string_pretty(&locate_define(&parsed, &source)?)?
            };
            println!("{json}");
        }
    }

    Ok(())
}
