// ABOUTME: Output handling for the wcl CLI: JSON formatting and generated source files
// ABOUTME: FileSourceWriter writes generated units into a directory on disk

use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use wcl_sdk::SourceWriter;

pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn format(&self, value: &Value) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

/// Writes each generated unit to `<dir>/<file_name>`, creating `dir` on first write.
pub struct FileSourceWriter {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FileSourceWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl SourceWriter for FileSourceWriter {
    fn write_source(&mut self, file_name: &str, contents: &str) -> wcl_sdk::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, contents)?;
        log::debug!("wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}
