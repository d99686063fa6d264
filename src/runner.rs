use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};

use crate::cli::{Cli, Command, ConfigCommand, ListArgs, SectionArgs, SummaryArgs};
use crate::config::{self, ConfigSource, DocsConfig, ResolvedConfig};
use crate::lister;
use crate::scaffold::{self, ScaffoldOptions, ScaffoldReport};
use crate::section::Section;
use crate::toc::{self, MergeOutcome, TocLayout};

pub fn run(cli: Cli) -> Result<()> {
    let ctx = CliContext::from(&cli);

    match cli.command {
        Some(Command::Config { command }) => handle_config(&ctx, command),
        Some(Command::List(args)) => handle_list(&ctx, &args),
        Some(Command::Scaffold(args)) => handle_scaffold(&ctx, &args).map(|_| ()),
        Some(Command::Toc(args)) => handle_toc(&ctx, &args).map(|_| ()),
        Some(Command::Sync(args)) => handle_sync(&ctx, &args).map(|_| ()),
        None => handle_sync(&ctx, &SummaryArgs::default()).map(|_| ()),
    }
}

fn handle_list(ctx: &CliContext, args: &ListArgs) -> Result<()> {
    let state = AppState::new(ctx, &args.section)?;
    let names = state.list()?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&names).context("encoding names as JSON")?;
        println!("{}", rendered);
        return Ok(());
    }

    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn handle_scaffold(ctx: &CliContext, args: &SectionArgs) -> Result<ScaffoldReport> {
    let state = AppState::new(ctx, args)?;
    let names = state.list()?;
    let report = state.scaffold(&names)?;
    println!("[*] Scaffolding complete");
    Ok(report)
}

fn handle_toc(ctx: &CliContext, args: &SummaryArgs) -> Result<MergeOutcome> {
    let state = AppState::new(ctx, &args.section)?;
    let names = state.list()?;
    let outcome = state.merge_summary(&names, args.summary.as_deref())?;
    println!("[*] Summary update complete");
    Ok(outcome)
}

fn handle_sync(ctx: &CliContext, args: &SummaryArgs) -> Result<(ScaffoldReport, MergeOutcome)> {
    let state = AppState::new(ctx, &args.section)?;
    let names = state.list()?;
    let report = state.scaffold(&names)?;
    let outcome = state.merge_summary(&names, args.summary.as_deref())?;
    println!("[*] Sync complete");
    Ok((report, outcome))
}

fn handle_config(ctx: &CliContext, command: Option<ConfigCommand>) -> Result<()> {
    let base = ctx.base_dir()?;
    let explicit = ctx.explicit_config(&base)?;

    match command.unwrap_or(ConfigCommand::Show) {
        ConfigCommand::Show => {
            let resolved = config::resolve(explicit.as_deref(), &base)?;
            print!("{}", config::format_summary(&resolved));
        }
        ConfigCommand::Path => {
            let resolved = config::resolve(explicit.as_deref(), &base)?;
            match &resolved.path {
                Some(path) => println!("{} ({})", path, resolved.source.as_str()),
                None => println!(
                    "No config file found; using {}.",
                    ConfigSource::Defaults.as_str()
                ),
            }
        }
        ConfigCommand::Generate { path, force } => {
            let target = match path {
                Some(path) => resolve_against(&base, path)?,
                None => base.join(config::PROJECT_CONFIG),
            };
            if ctx.dry_run {
                println!("[dry-run] would write example config to {}", target);
                return Ok(());
            }
            config::write_example_config(&target, force)?;
            println!("Wrote example config to {}", target);
        }
        ConfigCommand::Set { key, value } => {
            let target = match explicit {
                Some(path) => path,
                None => config::resolve(None, &base)?
                    .path
                    .unwrap_or_else(|| base.join(config::PROJECT_CONFIG)),
            };
            if ctx.dry_run {
                println!("[dry-run] would set {} = {} in {}", key, value, target);
                return Ok(());
            }
            config::set_value(&target, &key, &value)?;
            println!("Set {} = {} in {}", key, value, target);
        }
    }
    Ok(())
}

#[derive(Clone, Debug)]
struct CliContext {
    chdir: Option<PathBuf>,
    file: Option<PathBuf>,
    dry_run: bool,
}

impl From<&Cli> for CliContext {
    fn from(cli: &Cli) -> Self {
        Self {
            chdir: cli.chdir.clone(),
            file: cli.file.clone(),
            dry_run: cli.dry_run,
        }
    }
}

impl CliContext {
    /// Directory that every relative path is resolved against.
    fn base_dir(&self) -> Result<Utf8PathBuf> {
        let cwd = current_working_dir()?;
        match &self.chdir {
            Some(path) => resolve_against(&cwd, path.clone()),
            None => Ok(cwd),
        }
    }

    fn explicit_config(&self, base: &Utf8Path) -> Result<Option<Utf8PathBuf>> {
        self.file
            .clone()
            .map(|path| resolve_against(base, path))
            .transpose()
    }
}

struct AppState {
    dry_run: bool,
    section: Section,
    config: DocsConfig,
}

impl AppState {
    fn new(ctx: &CliContext, args: &SectionArgs) -> Result<Self> {
        let base = ctx.base_dir()?;
        let section_path = Utf8PathBuf::from_path_buf(args.section_dir.clone())
            .map_err(|_| anyhow!("section directory must be valid UTF-8"))?;
        let section = Section::locate(&base, &section_path)
            .with_context(|| format!("locating section directory {}", section_path))?;

        let explicit = ctx.explicit_config(&base)?;
        let resolved: ResolvedConfig = config::resolve(explicit.as_deref(), &section.dir)?;
        tracing::debug!(source = resolved.source.as_str(), "loaded config");

        Ok(Self {
            dry_run: ctx.dry_run,
            section,
            config: resolved.config,
        })
    }

    fn list(&self) -> Result<Vec<String>> {
        let index = self.section.index_path(&self.config.index_file);
        lister::list_subsections(&index, &self.config.bullet)
            .with_context(|| format!("reading index for section `{}`", self.section.name))
    }

    fn scaffold(&self, names: &[String]) -> Result<ScaffoldReport> {
        println!(
            "[*] Ensuring {} subsection(s) in {}",
            names.len(),
            self.section.dir
        );
        let opts = ScaffoldOptions::from_config(&self.config, self.dry_run);
        let report = scaffold::scaffold_all(&self.section.dir, names, &opts)
            .with_context(|| format!("scaffolding section `{}`", self.section.name))?;
        if report.writes() == 0 {
            println!("    all {} subsection(s) already scaffolded", report.unchanged);
        } else {
            println!(
                "    {} created, {} restored, {} unchanged",
                report.created, report.restored, report.unchanged
            );
        }
        Ok(report)
    }

    fn merge_summary(&self, names: &[String], summary: Option<&Path>) -> Result<MergeOutcome> {
        let path = match summary {
            Some(path) => resolve_against(&self.section.root, path.to_path_buf())?,
            None => self.section.root.join(&self.config.summary_file),
        };
        println!("[*] Updating {}", path);

        let layout = TocLayout::from_config(&self.config);
        let outcome = toc::merge(&path, &self.section.name, names, &layout, self.dry_run)
            .with_context(|| format!("merging section `{}` into {}", self.section.name, path))?;

        if outcome.is_unchanged() {
            println!("    already up to date");
        }
        let prefix = if self.dry_run { "[dry-run] would append" } else { "appended" };
        for line in &outcome.appended {
            println!("    {}: {}", prefix, line.trim_end());
        }
        Ok(outcome)
    }
}

fn resolve_against(base: &Utf8Path, path: PathBuf) -> Result<Utf8PathBuf> {
    let path =
        Utf8PathBuf::from_path_buf(path).map_err(|_| anyhow!("path must be valid UTF-8"))?;
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(base.join(path))
    }
}

fn current_working_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("determining current directory")?;
    Utf8PathBuf::from_path_buf(cwd).map_err(|_| anyhow!("current directory is not valid UTF-8"))
}
