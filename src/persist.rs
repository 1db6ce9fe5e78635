use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One durable JSON document per collection.
#[derive(Debug, Clone)]
pub struct RecordFile {
    path: PathBuf,
}

impl RecordFile {
    pub fn new(dir: &Path, file_name: &str) -> Self {
        Self {
            path: dir.join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or blank files load as an empty collection. A file that does not
    /// parse is reported and also loads as empty; it is left on disk untouched
    /// until the next successful write replaces it.
    pub fn load<T: DeserializeOwned>(&self) -> Vec<T> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(v) => v,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to read record file");
                return Vec::new();
            }
        };
        if raw.trim().is_empty() {
            return Vec::new();
        }
        match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "record file is corrupt; starting with an empty collection"
                );
                Vec::new()
            }
        }
    }

    /// Rewrites the whole collection: write a sibling temp file, then rename
    /// it over the record so a crash never leaves a truncated document.
    pub fn save<T: Serialize>(&self, items: &[T]) -> anyhow::Result<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        items
            .serialize(&mut ser)
            .with_context(|| format!("failed to serialize {}", self.path.display()))?;

        let tmp = self.tmp_path();
        let mut f = std::fs::File::create(&tmp)
            .with_context(|| format!("failed to create {}", tmp.display()))?;
        f.write_all(&buf)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        f.sync_all()
            .with_context(|| format!("failed to sync {}", tmp.display()))?;
        drop(f);

        std::fs::rename(&tmp, &self.path).with_context(|| {
            format!(
                "failed to replace {} with {}",
                self.path.display(),
                tmp.display()
            )
        })?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
