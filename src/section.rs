use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

use crate::error::{DocError, Result};

/// A chapter directory together with the book root that holds its summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub dir: Utf8PathBuf,
    pub name: String,
    pub root: Utf8PathBuf,
}

impl Section {
    /// Resolve `path` against `base` and split it into name and root.
    ///
    /// Name and root come from the path as given, so a symlinked chapter keeps
    /// the name of the link rather than its target.
    pub fn locate(base: &Utf8Path, path: &Utf8Path) -> Result<Self> {
        let dir = clean(&base.join(path));
        let metadata = dir.metadata().map_err(|err| DocError::from_io(&dir, err))?;
        if !metadata.is_dir() {
            return Err(DocError::NotADirectory { path: dir });
        }

        // only the filesystem root lacks a file name once `.` and `..` are folded
        let name = dir
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| DocError::NotADirectory { path: dir.clone() })?;
        let root = dir.parent().map(Utf8Path::to_owned).unwrap_or_else(|| dir.clone());

        Ok(Self { dir, name, root })
    }

    pub fn index_path(&self, index_file: &str) -> Utf8PathBuf {
        self.dir.join(index_file)
    }
}

/// Fold `.` and `..` segments without touching the filesystem.
fn clean(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_str()),
        }
    }
    out
}
