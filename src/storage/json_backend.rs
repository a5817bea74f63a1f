use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::utils::{app_data_dir, ensure_dir};
use crate::errors::StoreResult;

use super::StorageBackend;

const TMP_SUFFIX: &str = "tmp";
const STATE_DIR: &str = "state";

/// File-per-namespace JSON backend rooted in the application data directory.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    state_dir: PathBuf,
}

impl JsonStorage {
    /// Opens a backend rooted at `root`, creating directories as needed.
    /// `None` resolves to the default application data directory.
    pub fn new(root: Option<PathBuf>) -> StoreResult<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        let state_dir = root.join(STATE_DIR);
        ensure_dir(&root)?;
        ensure_dir(&state_dir)?;
        Ok(Self { root, state_dir })
    }

    pub fn new_default() -> StoreResult<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    /// Canonical file path backing a namespace.
    pub fn namespace_path(&self, namespace: &str) -> PathBuf {
        self.state_dir
            .join(format!("{}.json", canonical_name(namespace)))
    }
}

impl StorageBackend for JsonStorage {
    fn write(&self, namespace: &str, data: &str) -> StoreResult<()> {
        let path = self.namespace_path(namespace);
        let tmp = tmp_path(&path);
        write_file(&tmp, data)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn read(&self, namespace: &str) -> StoreResult<Option<String>> {
        let path = self.namespace_path(namespace);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn remove(&self, namespace: &str) -> StoreResult<()> {
        let path = self.namespace_path(namespace);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn exists(&self, namespace: &str) -> StoreResult<bool> {
        Ok(self.namespace_path(namespace).exists())
    }
}

fn canonical_name(namespace: &str) -> String {
    let sanitized: String = namespace
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "store".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
