use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Scaffold documentation sections and keep the root summary in sync.
#[derive(Parser, Debug)]
#[command(name = "docscaffold", version, about = "Documentation tree scaffolding")]
pub struct Cli {
    /// Base directory that relative paths are resolved against.
    #[arg(short = 'C', long = "chdir", global = true)]
    pub chdir: Option<PathBuf>,
    /// Explicit config file instead of the discovered `.docscaffold.toml`.
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,
    #[arg(short = 'n', long = "dry-run", global = true)]
    pub dry_run: bool,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Defaults to `sync` on the current directory.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the subsection names declared in the section index.
    List(ListArgs),
    /// Create missing subsection directories and placeholders.
    Scaffold(SectionArgs),
    /// Scaffold subsections, then update the root summary.
    Sync(SummaryArgs),
    /// Update the root summary only.
    Toc(SummaryArgs),
    /// Configuration display, template generation, and edits.
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommand>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SectionArgs {
    /// Section directory holding the index document.
    #[arg(default_value = ".")]
    pub section_dir: PathBuf,
}

impl Default for SectionArgs {
    fn default() -> Self {
        Self {
            section_dir: PathBuf::from("."),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub section: SectionArgs,
    /// Emit a JSON array instead of one name per line.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub section: SectionArgs,
    /// Summary document, relative to the section's parent directory.
    #[arg(long = "summary")]
    pub summary: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    Show,
    Path,
    Generate {
        #[arg()]
        path: Option<PathBuf>,
        #[arg(long = "force", default_value_t = false)]
        force: bool,
    },
    Set {
        key: String,
        value: String,
    },
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}
