//! JSON rendering for manifests and package files

use crate::domain::DatasourceOutput;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Render a value as JSON indented with `indent` spaces
pub fn to_json_string<T: Serialize>(value: &T, indent: usize) -> serde_json::Result<String> {
    let indent_bytes = vec![b' '; indent];
    let formatter = PrettyFormatter::with_indent(&indent_bytes);
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write rendered content to `path`, or to `stdout` when no path is given
pub fn emit(content: &str, path: Option<&Path>, stdout: &mut dyn Write) -> io::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
            tracing::info!(path = %path.display(), "manifest written");
            Ok(())
        }
        None => writeln!(stdout, "{}", content),
    }
}

/// Write one package file under `output_dir`, creating parent directories
pub fn write_package(
    output: &DatasourceOutput,
    output_dir: &Path,
    indent: usize,
) -> io::Result<PathBuf> {
    let path = output.output_path(output_dir);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = to_json_string(output, indent).map_err(io::Error::other)?;
    fs::write(&path, content)?;
    Ok(path)
}
