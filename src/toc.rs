//! Append-only maintenance of the root `SUMMARY.md`.
//!
//! The summary is a sequence of blocks, one per section:
//!
//! ```text
//! * [ch5](ch5/readme.md)
//!     * [read a file](ch5/read a file/readme.md)
//! ```
//!
//! A merge locates the first line mentioning the section, then walks the rest
//! of the file checking the wanted lines off in order. Whatever is still
//! pending at end of file is appended; existing lines are never rewritten.

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write;

use camino::Utf8Path;
use tracing::{debug, info, instrument};

use crate::config::DocsConfig;
use crate::error::{DocError, Result};

/// File names and indentation used to render summary lines.
#[derive(Clone, Debug)]
pub struct TocLayout {
    pub index_file: String,
    pub placeholder_file: String,
    pub indent: usize,
}

impl TocLayout {
    pub fn from_config(config: &DocsConfig) -> Self {
        Self {
            index_file: config.index_file.clone(),
            placeholder_file: config.placeholder_file.clone(),
            indent: config.indent,
        }
    }

    pub fn heading(&self, section: &str) -> String {
        format!("* [{section}]({section}/{})\n", self.index_file)
    }

    pub fn link(&self, section: &str, name: &str) -> String {
        format!(
            "{}* [{name}]({section}/{name}/{})\n",
            " ".repeat(self.indent),
            self.placeholder_file
        )
    }

    /// Heading followed by one link per subsection, in order.
    pub fn wanted_lines(&self, section: &str, names: &[String]) -> Vec<String> {
        let mut lines = Vec::with_capacity(names.len() + 1);
        lines.push(self.heading(section));
        lines.extend(names.iter().map(|name| self.link(section, name)));
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Full document after the merge.
    pub content: String,
    /// Lines added at the end, in order.
    pub appended: Vec<String>,
    original_len: usize,
}

impl MergeOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.appended.is_empty()
    }

    /// Text added after the original content.
    pub fn tail(&self) -> &str {
        &self.content[self.original_len..]
    }
}

/// Merge `wanted` into `content` without touching existing lines.
///
/// Matching is sequential: after the first line containing `section`, each
/// line is compared (terminator included, `\r\n` read as `\n`) against the head of the pending
/// queue only. Lines present but out of order are therefore not recognised.
pub fn merge_content(content: &str, section: &str, wanted: Vec<String>) -> MergeOutcome {
    let mut pending: VecDeque<String> = wanted.into();

    let scoped = content
        .split_inclusive('\n')
        .skip_while(|line| !line.contains(section));
    for line in scoped {
        let Some(head) = pending.front() else {
            break;
        };
        if same_line(head, line) {
            pending.pop_front();
        }
    }

    let mut merged = content.to_owned();
    if !pending.is_empty() && !merged.is_empty() && !merged.ends_with('\n') {
        merged.push('\n');
    }
    let appended: Vec<String> = pending.into_iter().collect();
    for line in &appended {
        merged.push_str(line);
    }

    MergeOutcome {
        content: merged,
        appended,
        original_len: content.len(),
    }
}

/// `\r\n` counts as `\n`; an unterminated last line never matches.
fn same_line(wanted: &str, line: &str) -> bool {
    match line.strip_suffix("\r\n") {
        Some(body) => wanted.strip_suffix('\n') == Some(body),
        None => wanted == line,
    }
}

/// Merge the section block into the summary at `path`, appending in place.
#[instrument(skip_all, fields(summary = %path, section = %section))]
pub fn merge(
    path: &Utf8Path,
    section: &str,
    names: &[String],
    layout: &TocLayout,
    dry_run: bool,
) -> Result<MergeOutcome> {
    let current = fs::read_to_string(path).map_err(|err| DocError::from_io(path, err))?;
    let outcome = merge_content(&current, section, layout.wanted_lines(section, names));

    if outcome.is_unchanged() {
        debug!("summary already up to date");
        return Ok(outcome);
    }

    if !dry_run {
        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|err| DocError::from_io(path, err))?;
        file.write_all(outcome.tail().as_bytes())
            .map_err(|err| DocError::from_io(path, err))?;
    }
    info!(appended = outcome.appended.len(), "updated summary");
    Ok(outcome)
}
