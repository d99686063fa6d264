use std::fmt::Write as _;
use std::fs;

use anyhow::{Context, Result, anyhow, bail};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use toml_edit::{DocumentMut, value};

use crate::templates;

/// Per-project file name looked up from the starting directory upwards.
pub const PROJECT_CONFIG: &str = ".docscaffold.toml";
const USER_CONFIG_DIR: &str = "docscaffold";
const USER_CONFIG_FILE: &str = "config.toml";

/// Settings for one documentation tree, loaded from `.docscaffold.toml`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    /// Index document read in every section directory.
    pub index_file: String,
    /// Placeholder written into each new subsection directory.
    pub placeholder_file: String,
    /// Table of contents in the parent of the section directory.
    pub summary_file: String,
    pub bullet: String,
    /// Spaces before each subsection link in the summary.
    pub indent: usize,
    pub missing_placeholder: MissingPlaceholder,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            index_file: "readme.md".to_owned(),
            placeholder_file: "readme.md".to_owned(),
            summary_file: "SUMMARY.md".to_owned(),
            bullet: "*".to_owned(),
            indent: 4,
            missing_placeholder: MissingPlaceholder::Create,
        }
    }
}

/// What to do with a subsection directory that exists without its placeholder.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingPlaceholder {
    /// Write only the missing placeholder.
    #[default]
    Create,
    /// Refuse, reporting the directory as already existing.
    Fail,
}

impl MissingPlaceholder {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingPlaceholder::Create => "create",
            MissingPlaceholder::Fail => "fail",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSource {
    Explicit,
    Discovered,
    User,
    Defaults,
}

impl ConfigSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::Explicit => "explicit",
            ConfigSource::Discovered => "discovered",
            ConfigSource::User => "user",
            ConfigSource::Defaults => "built-in defaults",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    /// `None` only when falling back to defaults.
    pub path: Option<Utf8PathBuf>,
    pub source: ConfigSource,
    pub config: DocsConfig,
}

/// Pick the config file for `start`: explicit path, nearest project file,
/// user config dir, then built-in defaults.
pub fn resolve(explicit: Option<&Utf8Path>, start: &Utf8Path) -> Result<ResolvedConfig> {
    if let Some(path) = explicit {
        let config = load_from_path(path)?;
        return Ok(ResolvedConfig {
            path: Some(path.to_owned()),
            source: ConfigSource::Explicit,
            config,
        });
    }

    if let Some(path) = discover(start) {
        let config = load_from_path(&path)?;
        return Ok(ResolvedConfig {
            path: Some(path),
            source: ConfigSource::Discovered,
            config,
        });
    }

    if let Some(path) = user_config_path()?.filter(|path| path.exists()) {
        let config = load_from_path(&path)?;
        return Ok(ResolvedConfig {
            path: Some(path),
            source: ConfigSource::User,
            config,
        });
    }

    Ok(ResolvedConfig {
        path: None,
        source: ConfigSource::Defaults,
        config: DocsConfig::default(),
    })
}

fn discover(start: &Utf8Path) -> Option<Utf8PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(PROJECT_CONFIG);
        if candidate.exists() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

fn user_config_path() -> Result<Option<Utf8PathBuf>> {
    let Some(mut dir) = dirs::config_dir() else {
        return Ok(None);
    };
    dir.push(USER_CONFIG_DIR);
    dir.push(USER_CONFIG_FILE);
    let path = Utf8PathBuf::from_path_buf(dir)
        .map_err(|_| anyhow!("user config directory is not valid UTF-8"))?;
    Ok(Some(path))
}

/// Load a configuration file from disk and deserialize it.
pub fn load_from_path(path: &Utf8Path) -> Result<DocsConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    let config: DocsConfig =
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path))?;
    config.validate().with_context(|| format!("validating config {}", path))?;
    Ok(config)
}

impl DocsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bullet.trim().is_empty() {
            bail!("`bullet` must not be empty");
        }
        for (key, name) in [
            ("index_file", &self.index_file),
            ("placeholder_file", &self.placeholder_file),
            ("summary_file", &self.summary_file),
        ] {
            if name.is_empty() || name.contains(['/', '\\']) {
                bail!("`{key}` must be a plain file name, got `{name}`");
            }
        }
        Ok(())
    }
}

pub fn write_example_config(path: &Utf8Path, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        bail!("{} already exists; rerun with --force to overwrite", path);
    }

    templates::write_template(path, "config.toml")
}

/// Update one key in place, keeping the rest of the document untouched.
pub fn set_value(path: &Utf8Path, key: &str, raw: &str) -> Result<()> {
    let mut doc: DocumentMut = if path.exists() {
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
        contents
            .parse()
            .with_context(|| format!("parsing config {}", path))?
    } else {
        DocumentMut::new()
    };

    match key {
        "index_file" | "placeholder_file" | "summary_file" | "bullet" => {
            doc[key] = value(raw);
        }
        "indent" => {
            let indent: i64 = raw
                .parse()
                .with_context(|| format!("`indent` expects a number, got `{raw}`"))?;
            if indent < 0 {
                bail!("`indent` must not be negative");
            }
            doc[key] = value(indent);
        }
        "missing_placeholder" => {
            if raw != "create" && raw != "fail" {
                bail!("`missing_placeholder` must be `create` or `fail`, got `{raw}`");
            }
            doc[key] = value(raw);
        }
        other => bail!("unknown config key `{other}`"),
    }

    let rendered = doc.to_string();
    let parsed: DocsConfig =
        toml::from_str(&rendered).with_context(|| format!("re-reading updated {}", path))?;
    parsed.validate()?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating directory {}", parent))?;
    }
    fs::write(path, rendered).with_context(|| format!("writing config {}", path))
}

pub fn format_summary(resolved: &ResolvedConfig) -> String {
    let mut out = String::new();
    let config = &resolved.config;
    let location = resolved
        .path
        .as_ref()
        .map(|p| p.as_str())
        .unwrap_or("<none>");

    let _ = writeln!(out, "Config: {} ({})", location, resolved.source.as_str());
    let _ = writeln!(out, "Index file: {}", config.index_file);
    let _ = writeln!(out, "Placeholder file: {}", config.placeholder_file);
    let _ = writeln!(out, "Summary file: {}", config.summary_file);
    let _ = writeln!(out, "Bullet marker: {}", config.bullet);
    let _ = writeln!(out, "Link indent: {}", config.indent);
    let _ = writeln!(
        out,
        "Missing placeholder: {}",
        config.missing_placeholder.as_str()
    );
    out
}
