//! Cantis CLI - Generate a glossary from your source code.

use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use cantis::builder::Cantis;
use cantis::errors::{exit_code, CantisError};
use cantis::output::Format;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `CANTIS_LOG=debug`.
const LOG_ENV: &str = "CANTIS_LOG";

#[derive(Parser)]
#[command(name = "cantis")]
#[command(about = "Generate a glossary from your source code")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a glossary from your source code
    Generate {
        /// The root directory of the source code
        #[arg(default_value = ".")]
        source: PathBuf,

        /// Path to output file (default: stdout; blank also means stdout)
        #[arg(short, long)]
        target: Option<String>,

        /// Output format (options: plain, json)
        #[arg(short, long, default_value = "plain")]
        format: String,

        /// Sort entries by term
        #[arg(long)]
        sort: bool,

        /// Include hidden files and directories
        #[arg(long)]
        include_hidden: bool,

        /// Maximum directory depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Scan files that .gitignore would exclude
        #[arg(long)]
        no_gitignore: bool,

        /// Descend into symlinked directories
        #[arg(long)]
        follow_symlinks: bool,

        /// Additional gitignore-style file of paths to skip (repeatable)
        #[arg(long = "ignore-file", value_name = "PATH")]
        ignore_files: Vec<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            source,
            target,
            format,
            sort,
            include_hidden,
            max_depth,
            no_gitignore,
            follow_symlinks,
            ignore_files,
        } => run_generate(GenerateArgs {
            source,
            target,
            format,
            sort,
            include_hidden,
            max_depth,
            no_gitignore,
            follow_symlinks,
            ignore_files,
        }),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "cantis", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(exit_code(&e));
    }
}

/// Log to stderr so stdout only ever carries the glossary.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// --- Generate command ---

struct GenerateArgs {
    source: PathBuf,
    target: Option<String>,
    format: String,
    sort: bool,
    include_hidden: bool,
    max_depth: Option<usize>,
    no_gitignore: bool,
    follow_symlinks: bool,
    ignore_files: Vec<PathBuf>,
}

fn run_generate(args: GenerateArgs) -> Result<(), CantisError> {
    // Validate configuration before touching the file system.
    let format: Format = args.format.parse()?;

    let target = args
        .target
        .filter(|t| !t.trim().is_empty())
        .map(PathBuf::from);

    let mut cantis = Cantis::new(args.source)
        .format(format)
        .sorted(args.sort)
        .target(target)
        .include_hidden(args.include_hidden)
        .respect_gitignore(!args.no_gitignore)
        .follow_symlinks(args.follow_symlinks);

    if let Some(depth) = args.max_depth {
        cantis = cantis.max_depth(depth);
    }

    for ignore_file in args.ignore_files {
        cantis = cantis.ignore_file(ignore_file);
    }

    cantis.print()
}
