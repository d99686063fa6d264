use std::fs;

use camino::Utf8Path;
use tracing::{debug, warn};

use crate::error::{DocError, Result};

/// Read an index document and return the subsection names it declares.
pub fn list_subsections(index: &Utf8Path, bullet: &str) -> Result<Vec<String>> {
    let contents = fs::read_to_string(index).map_err(|err| DocError::from_io(index, err))?;
    let names = parse_subsections(&contents, bullet);
    debug!(index = %index, count = names.len(), "listed subsections");
    Ok(names)
}

/// Extract bullet payloads in document order.
///
/// Only lines that literally start with `bullet` count; indented sub-bullets
/// and prose are skipped. Duplicates are kept.
pub fn parse_subsections(contents: &str, bullet: &str) -> Vec<String> {
    let strip: Vec<char> = bullet.chars().chain([' ']).collect();
    let mut names = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        if bullet.is_empty() || !line.starts_with(bullet) {
            continue;
        }

        let name = line.trim_start_matches(strip.as_slice()).trim_end();
        if name.is_empty() {
            warn!(line = idx + 1, "ignoring bullet without a name");
            continue;
        }
        names.push(name.to_owned());
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_bullets_in_order_and_skips_prose() {
        let names = parse_subsections("* alpha\nnotes\n* beta\n", "*");
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn ignores_indented_and_blank_lines() {
        let contents = "# Chapter\n\n* intro\n    * nested\n  * also nested\n*   spaced out  \r\n";
        let names = parse_subsections(contents, "*");
        assert_eq!(names, vec!["intro", "spaced out"]);
    }

    #[test]
    fn keeps_duplicates_and_drops_empty_bullets() {
        let names = parse_subsections("* a\n*\n* a\n**  b\n", "*");
        assert_eq!(names, vec!["a", "a", "b"]);
    }

    #[test]
    fn honours_custom_marker() {
        let names = parse_subsections("- one\n* two\n- three", "-");
        assert_eq!(names, vec!["one", "three"]);
    }

    #[test]
    fn missing_index_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let err = list_subsections(&root.join("readme.md"), "*").unwrap_err();
        assert!(matches!(err, DocError::NotFound { .. }));
    }

    #[test]
    fn reads_index_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let index = root.join("readme.md");
        fs::write(&index, "## Files and IO\n* read a file\n* write a file\n").unwrap();

        let names = list_subsections(&index, "*").unwrap();
        assert_eq!(names, vec!["read a file", "write a file"]);
    }
}
