//! Status reset: every ONT back to `ON` with a zero retry counter.

use crate::models::{OntRecord, OntStatus};

/// Online/offline counts over a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusSummary {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
}

impl StatusSummary {
    pub fn of(records: &[OntRecord]) -> Self {
        let online = records.iter().filter(|r| r.status.is_online()).count();
        Self {
            total: records.len(),
            online,
            offline: records.len() - online,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetReport {
    pub before: StatusSummary,
    pub after: StatusSummary,
    /// Records whose status or rto_count actually changed
    pub changed: usize,
}

/// Sets every record to `ON` / `rto_count = 0`. No I/O.
pub fn reset_statuses(records: &mut [OntRecord]) -> ResetReport {
    let before = StatusSummary::of(records);
    let mut changed = 0;
    for record in records.iter_mut() {
        if !record.status.is_online() || record.rto_count != 0 {
            changed += 1;
        }
        record.status = OntStatus::On;
        record.rto_count = 0;
    }
    ResetReport {
        before,
        after: StatusSummary::of(records),
        changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ont(status: OntStatus, rto_count: u32) -> OntRecord {
        OntRecord {
            status,
            rto_count,
            ..OntRecord::default()
        }
    }

    #[test]
    fn reset_brings_everything_online() {
        let mut records = vec![
            ont(OntStatus::On, 0),
            ont(OntStatus::Off, 4),
            ont(OntStatus::Other("RTO".into()), 1),
            ont(OntStatus::On, 2),
        ];
        let report = reset_statuses(&mut records);

        assert_eq!(report.before, StatusSummary { total: 4, online: 2, offline: 2 });
        assert_eq!(report.after, StatusSummary { total: 4, online: 4, offline: 0 });
        assert_eq!(report.changed, 3);
        assert!(records.iter().all(|r| r.status == OntStatus::On && r.rto_count == 0));
    }

    #[test]
    fn empty_dataset_resets_to_empty_summary() {
        let report = reset_statuses(&mut []);
        assert_eq!(report.after, StatusSummary::default());
        assert_eq!(report.changed, 0);
    }
}
