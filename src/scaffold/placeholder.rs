use std::fs::OpenOptions;
use std::io::Write;

use camino::Utf8Path;

use crate::error::{DocError, Result};

/// Body of a freshly scaffolded subsection index. No trailing newline.
pub fn render(name: &str) -> String {
    format!("### {name}")
}

/// Create the placeholder, failing if anything already sits at `path`.
pub fn write_new(path: &Utf8Path, name: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| DocError::from_io(path, err))?;
    file.write_all(render(name).as_bytes())
        .map_err(|err| DocError::from_io(path, err))
}
