pub mod placeholder;

use std::fs;

use camino::Utf8Path;
use tracing::{debug, info, warn};

use crate::config::{DocsConfig, MissingPlaceholder};
use crate::error::{DocError, Result};

#[derive(Clone, Debug)]
pub struct ScaffoldOptions {
    pub placeholder_file: String,
    pub missing_placeholder: MissingPlaceholder,
    pub dry_run: bool,
}

impl ScaffoldOptions {
    pub fn from_config(config: &DocsConfig, dry_run: bool) -> Self {
        Self {
            placeholder_file: config.placeholder_file.clone(),
            missing_placeholder: config.missing_placeholder,
            dry_run,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Directory and placeholder were already there.
    Unchanged,
    /// Directory and placeholder were both created.
    Created,
    /// Directory existed; only the placeholder was written.
    PlaceholderRestored,
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct ScaffoldReport {
    pub created: usize,
    pub restored: usize,
    pub unchanged: usize,
}

impl ScaffoldReport {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Created => self.created += 1,
            Outcome::PlaceholderRestored => self.restored += 1,
        }
    }

    /// Number of subsections that needed a write.
    pub fn writes(&self) -> usize {
        self.created + self.restored
    }
}

/// Make sure `section_dir/name` exists and holds its placeholder.
pub fn ensure_subsection(
    section_dir: &Utf8Path,
    name: &str,
    opts: &ScaffoldOptions,
) -> Result<Outcome> {
    let subdir = section_dir.join(name);
    let placeholder_path = subdir.join(&opts.placeholder_file);

    if subdir.is_dir() && placeholder_path.exists() {
        debug!(subsection = name, "already scaffolded");
        return Ok(Outcome::Unchanged);
    }

    if subdir.exists() {
        if !subdir.is_dir() {
            return Err(DocError::NotADirectory { path: subdir });
        }
        if opts.missing_placeholder == MissingPlaceholder::Fail {
            return Err(DocError::AlreadyExists { path: subdir });
        }
        if !opts.dry_run {
            placeholder::write_new(&placeholder_path, name)?;
        }
        warn!(path = %placeholder_path, "restored missing placeholder");
        return Ok(Outcome::PlaceholderRestored);
    }

    if !opts.dry_run {
        create_leaf_dir(&subdir)?;
        placeholder::write_new(&placeholder_path, name)?;
    }
    info!(path = %subdir, "created subsection");
    Ok(Outcome::Created)
}

/// Create `dir`, failing with `AlreadyExists` if it appeared in the meantime.
fn create_leaf_dir(dir: &Utf8Path) -> Result<()> {
    if let Some(parent) = dir.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| DocError::from_io(parent, err))?;
    }
    fs::create_dir(dir).map_err(|err| DocError::from_io(dir, err))
}

/// Run [`ensure_subsection`] for every name, in order, stopping at the first error.
pub fn scaffold_all(
    section_dir: &Utf8Path,
    names: &[String],
    opts: &ScaffoldOptions,
) -> Result<ScaffoldReport> {
    let mut report = ScaffoldReport::default();
    let prefix = if opts.dry_run { "[dry-run] would create" } else { "created" };

    for name in names {
        let outcome = ensure_subsection(section_dir, name, opts)?;
        match outcome {
            Outcome::Created => println!("  {} {}/", prefix, section_dir.join(name)),
            Outcome::PlaceholderRestored => println!(
                "  {} {}",
                prefix,
                section_dir.join(name).join(&opts.placeholder_file)
            ),
            Outcome::Unchanged => {}
        }
        report.record(outcome);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn temp_section() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let section = Utf8PathBuf::from_path_buf(dir.path().join("ch5")).unwrap();
        fs::create_dir_all(&section).unwrap();
        (dir, section)
    }

    fn options(policy: MissingPlaceholder, dry_run: bool) -> ScaffoldOptions {
        ScaffoldOptions {
            placeholder_file: "readme.md".to_owned(),
            missing_placeholder: policy,
            dry_run,
        }
    }

    fn snapshot(dir: &Utf8Path) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir).unwrap() {
            let entry = entry.unwrap();
            let path = Utf8PathBuf::from_path_buf(entry.path()).unwrap();
            if path.is_dir() {
                entries.push((path.to_string(), String::new()));
                entries.extend(snapshot(&path));
            } else {
                entries.push((path.to_string(), fs::read_to_string(&path).unwrap()));
            }
        }
        entries.sort();
        entries
    }

    #[test]
    fn creates_directory_and_placeholder() {
        let (_guard, section) = temp_section();
        let opts = options(MissingPlaceholder::Create, false);

        let outcome = ensure_subsection(&section, "alpha", &opts).unwrap();
        assert_eq!(outcome, Outcome::Created);

        let placeholder = section.join("alpha").join("readme.md");
        assert_eq!(fs::read_to_string(&placeholder).unwrap(), "### alpha");
        assert_eq!(fs::read_dir(section.join("alpha")).unwrap().count(), 1);
    }

    #[test]
    fn existing_subsection_is_untouched() {
        let (_guard, section) = temp_section();
        let subdir = section.join("alpha");
        fs::create_dir_all(&subdir).unwrap();
        fs::write(subdir.join("readme.md"), "# hand written\n").unwrap();
        let before = snapshot(&section);

        let outcome =
            ensure_subsection(&section, "alpha", &options(MissingPlaceholder::Fail, false)).unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(snapshot(&section), before);
    }

    #[test]
    fn second_run_performs_no_writes() {
        let (_guard, section) = temp_section();
        let names = vec!["alpha".to_owned(), "beta".to_owned()];
        let opts = options(MissingPlaceholder::Create, false);

        let first = scaffold_all(&section, &names, &opts).unwrap();
        assert_eq!(first.created, 2);
        let after_first = snapshot(&section);

        let second = scaffold_all(&section, &names, &opts).unwrap();
        assert_eq!(second.writes(), 0);
        assert_eq!(second.unchanged, 2);
        assert_eq!(snapshot(&section), after_first);
    }

    #[test]
    fn restores_missing_placeholder_by_default() {
        let (_guard, section) = temp_section();
        fs::create_dir_all(section.join("alpha")).unwrap();

        let outcome =
            ensure_subsection(&section, "alpha", &options(MissingPlaceholder::Create, false))
                .unwrap();
        assert_eq!(outcome, Outcome::PlaceholderRestored);
        assert_eq!(
            fs::read_to_string(section.join("alpha").join("readme.md")).unwrap(),
            "### alpha"
        );
    }

    #[test]
    fn fail_policy_rejects_directory_without_placeholder() {
        let (_guard, section) = temp_section();
        fs::create_dir_all(section.join("alpha")).unwrap();

        let err = ensure_subsection(&section, "alpha", &options(MissingPlaceholder::Fail, false))
            .unwrap_err();
        assert!(matches!(err, DocError::AlreadyExists { .. }));
        assert!(!section.join("alpha").join("readme.md").exists());
    }

    #[test]
    fn file_in_place_of_directory_is_an_error() {
        let (_guard, section) = temp_section();
        fs::write(section.join("alpha"), "oops").unwrap();

        let err = ensure_subsection(&section, "alpha", &options(MissingPlaceholder::Create, false))
            .unwrap_err();
        assert!(matches!(err, DocError::NotADirectory { .. }));
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let (_guard, section) = temp_section();
        fs::create_dir_all(section.join("beta")).unwrap();
        let names = vec!["alpha".to_owned(), "beta".to_owned()];

        let report =
            scaffold_all(&section, &names, &options(MissingPlaceholder::Create, true)).unwrap();
        assert_eq!(report.created, 1);
        assert_eq!(report.restored, 1);
        assert!(!section.join("alpha").exists());
        assert!(!section.join("beta").join("readme.md").exists());
    }

    #[test]
    fn leaf_dir_collision_is_already_exists() {
        let (_guard, section) = temp_section();
        let subdir = section.join("alpha");
        create_leaf_dir(&subdir).unwrap();
        assert!(subdir.is_dir());

        let err = create_leaf_dir(&subdir).unwrap_err();
        assert!(matches!(err, DocError::AlreadyExists { .. }));
    }

    #[test]
    fn nested_name_creates_parents() {
        let (_guard, section) = temp_section();
        let outcome =
            ensure_subsection(&section, "part1/alpha", &options(MissingPlaceholder::Create, false))
                .unwrap();
        assert_eq!(outcome, Outcome::Created);
        assert_eq!(
            fs::read_to_string(section.join("part1").join("alpha").join("readme.md")).unwrap(),
            "### part1/alpha"
        );
    }

    #[test]
    fn stops_at_first_failure() {
        let (_guard, section) = temp_section();
        fs::write(section.join("beta"), "not a dir").unwrap();
        let names = vec!["alpha".to_owned(), "beta".to_owned(), "gamma".to_owned()];

        let result = scaffold_all(&section, &names, &options(MissingPlaceholder::Create, false));
        assert!(result.is_err());
        assert!(section.join("alpha").join("readme.md").exists());
        assert!(!section.join("gamma").exists());
    }
}
