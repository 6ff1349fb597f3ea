/*!
 * DATASET - Handle on the canonical ONT dataset file
 *
 * ROLE:
 * Ties one dataset path to its Persister. Both maintenance operations
 * (merge of a fresh export, status reset) go through this type, so they
 * share one write discipline and can be pointed at any directory.
 *
 * HOW IT WORKS:
 * - plan_merge: load dataset + export, convert, merge in memory (no write)
 * - apply_merge / reset: write through Persister (temp file, rename, backup)
 * - Missing or malformed dataset on merge = start from empty, the backup
 *   keeps the old bytes; a dataset that cannot be read at all aborts
 *
 * USED BY:
 * ont-merge and ont-reset binaries, integration tests in ont-core/tests.
 */

use crate::config::ToolsConfig;
use crate::convert::convert_records;
use crate::error::StoreError;
use crate::loader::{load_json_array, LoadOutcome};
use crate::merge::{merge_records, MergeOutcome};
use crate::models::{OntRecord, SourceRecord};
use crate::persist::{Persister, SaveReport};
use crate::reset::{reset_statuses, ResetReport};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of load + convert + merge, before anything is written.
#[derive(Debug, Clone)]
pub struct MergePlan {
    /// Records in the dataset before the merge
    pub existing: usize,
    /// Rows read from the export
    pub source_rows: usize,
    /// Rows that survived conversion
    pub valid: usize,
    pub outcome: MergeOutcome,
}

#[derive(Debug)]
pub enum ResetOutcome {
    /// Operator declined, nothing written
    Aborted,
    Persisted {
        report: ResetReport,
        save: SaveReport,
        records: Vec<OntRecord>,
    },
}

#[derive(Debug, Clone)]
pub struct Dataset {
    path: PathBuf,
    persister: Persister,
}

impl Dataset {
    pub fn new<P: Into<PathBuf>>(path: P, persister: Persister) -> Self {
        Self {
            path: path.into(),
            persister,
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::new(config.dataset_path(), Persister::new(config.backup_path()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> LoadOutcome<OntRecord> {
        load_json_array(&self.path)
    }

    /// Load that reports missing / invalid files as errors.
    pub fn load_strict(&self) -> Result<Vec<OntRecord>, StoreError> {
        self.load().into_result()
    }

    pub fn save(&self, records: &[OntRecord]) -> Result<SaveReport, StoreError> {
        self.persister.save(&self.path, records)
    }

    /// Reads the export at `source` and merges it into the current dataset.
    ///
    /// A missing or malformed dataset counts as empty. A dataset that exists
    /// but cannot be read is an error, so it is never overwritten. Returns
    /// `Ok(None)` when the export has no rows at all.
    pub fn plan_merge(&self, source: &Path) -> Result<Option<MergePlan>, StoreError> {
        let existing = match self.load() {
            LoadOutcome::Loaded(records) => records,
            LoadOutcome::Missing(_) => Vec::new(),
            LoadOutcome::Malformed { .. } => {
                warn!(
                    dataset = %self.path.display(),
                    "dataset malformed, merging into an empty dataset"
                );
                Vec::new()
            }
            LoadOutcome::Unreadable { path, source: e } => {
                return Err(StoreError::io(path, e));
            }
        };
        let rows: Vec<SourceRecord> = load_json_array(source).into_records();
        if rows.is_empty() {
            info!(source = %source.display(), "no export rows to process");
            return Ok(None);
        }
        self.plan_merge_rows(existing, &rows).map(Some)
    }

    /// Pure part of [`Dataset::plan_merge`], for callers that already hold
    /// the data.
    pub fn plan_merge_rows(
        &self,
        existing: Vec<OntRecord>,
        rows: &[SourceRecord],
    ) -> Result<MergePlan, StoreError> {
        let existing_count = existing.len();
        let converted = convert_records(rows);
        let valid = converted.len();
        Ok(MergePlan {
            existing: existing_count,
            source_rows: rows.len(),
            valid,
            outcome: merge_records(existing, converted)?,
        })
    }

    pub fn apply_merge(&self, plan: &MergePlan) -> Result<SaveReport, StoreError> {
        self.save(&plan.outcome.records)
    }

    /// Resets `records` and writes them back, unless `confirmed` is false.
    pub fn reset(
        &self,
        mut records: Vec<OntRecord>,
        confirmed: bool,
    ) -> Result<ResetOutcome, StoreError> {
        if !confirmed {
            info!(dataset = %self.path.display(), "reset declined");
            return Ok(ResetOutcome::Aborted);
        }
        let report = reset_statuses(&mut records);
        let save = self.save(&records)?;
        Ok(ResetOutcome::Persisted {
            report,
            save,
            records,
        })
    }

    /// Load (strict) + [`Dataset::reset`].
    pub fn reset_statuses(&self, confirmed: bool) -> Result<ResetOutcome, StoreError> {
        let records = self.load_strict()?;
        self.reset(records, confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn merge_into_missing_dataset_starts_at_one() {
        let dir = tempdir().unwrap();
        let dataset = Dataset::new(
            dir.path().join("onts.json"),
            Persister::new(dir.path().join("backups")),
        );
        let source = dir.path().join("csvjson.json");
        fs::write(
            &source,
            json!([{"no": 5, "ID": "A1", "Nama": "a"}, {"no": 6, "ID": "A2", "Nama": "b"}]).to_string(),
        )
        .unwrap();

        let plan = dataset.plan_merge(&source).unwrap().unwrap();
        assert_eq!(plan.existing, 0);
        assert_eq!(plan.valid, 2);
        let ids: Vec<u64> = plan.outcome.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn empty_export_plans_nothing() {
        let dir = tempdir().unwrap();
        let dataset = Dataset::new(
            dir.path().join("onts.json"),
            Persister::new(dir.path().join("backups")),
        );
        assert!(dataset
            .plan_merge(&dir.path().join("missing.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn unreadable_dataset_aborts_merge() {
        let dir = tempdir().unwrap();
        // a directory where the dataset file should be: exists, cannot be read
        let path = dir.path().join("onts.json");
        fs::create_dir(&path).unwrap();
        let source = dir.path().join("csvjson.json");
        fs::write(&source, json!([{"no": 1, "ID": "A1", "Nama": "a"}]).to_string()).unwrap();
        let dataset = Dataset::new(&path, Persister::new(dir.path().join("backups")));

        let err = dataset.plan_merge(&source).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(path.is_dir());
        assert!(!dir.path().join("backups").exists());
    }

    #[test]
    fn declined_reset_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("onts.json");
        let original = r#"[{"id":1,"id_pelanggan":"A","name":"a","status":"OFF","rto_count":2}]"#;
        fs::write(&path, original).unwrap();
        let dataset = Dataset::new(&path, Persister::new(dir.path().join("backups")));

        let outcome = dataset.reset_statuses(false).unwrap();
        assert!(matches!(outcome, ResetOutcome::Aborted));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert!(!dir.path().join("backups").exists());
    }

    #[test]
    fn reset_on_invalid_json_fails_without_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("onts.json");
        fs::write(&path, "[{").unwrap();
        let dataset = Dataset::new(&path, Persister::new(dir.path().join("backups")));

        assert!(matches!(
            dataset.reset_statuses(true),
            Err(StoreError::InvalidJson { .. })
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "[{");
    }
}
