/*!
Test harness for the ONT tools

Creates a temporary directory laid out like a deployment:

```text
<root>/data/onts.json
<root>/data/csvjson.json
<root>/runtime/backups/
```

and offers helpers to seed files, read them back and inspect backups.
*/

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct DatasetHarness {
    dir: TempDir,
}

impl DatasetHarness {
    pub fn new() -> Result<Self> {
        // Test logging; a second init in the same process is fine to ignore
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init()
            .ok();

        let dir = tempfile::tempdir().context("failed to create temp dir")?;
        fs::create_dir_all(dir.path().join("data"))?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.root().join("data").join("onts.json")
    }

    pub fn source_path(&self) -> PathBuf {
        self.root().join("data").join("csvjson.json")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.root().join("runtime").join("backups")
    }

    /// Writes `records` (a JSON array) as the canonical dataset.
    pub fn seed_dataset(&self, records: &Value) -> Result<()> {
        self.write_json(&self.dataset_path(), records)
    }

    /// Writes `rows` (a JSON array) as the CSV export.
    pub fn seed_source(&self, rows: &Value) -> Result<()> {
        self.write_json(&self.source_path(), rows)
    }

    /// Writes arbitrary text below the root, e.g. broken JSON.
    pub fn write_raw(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    pub fn read_dataset_raw(&self) -> Result<String> {
        let path = self.dataset_path();
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
    }

    pub fn read_dataset(&self) -> Result<Vec<Value>> {
        let raw = self.read_dataset_raw()?;
        serde_json::from_str(&raw).context("dataset is not a JSON array")
    }

    /// Record of the dataset with the given customer id.
    pub fn find_by_customer(&self, customer_id: &str) -> Result<Option<Value>> {
        Ok(self
            .read_dataset()?
            .into_iter()
            .find(|record| record["id_pelanggan"] == customer_id))
    }

    /// Backup files, sorted by name.
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        let dir = self.backup_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = fs::read_dir(&dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        files.sort();
        Ok(files)
    }

    fn write_json(&self, path: &Path, value: &Value) -> Result<()> {
        let text = serde_json::to_string_pretty(value)?;
        fs::write(path, text).with_context(|| format!("writing {}", path.display()))
    }
}
