//! Upsert of converted records into the canonical dataset, keyed by
//! customer id (`id_pelanggan`).

use crate::error::StoreError;
use crate::models::OntRecord;
use std::collections::HashMap;
use tracing::debug;

/// What happened to one incoming record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeEvent {
    Added {
        id: u64,
        id_pelanggan: String,
        name: String,
    },
    Updated {
        id: u64,
        id_pelanggan: String,
        name: String,
    },
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub records: Vec<OntRecord>,
    pub added: usize,
    pub updated: usize,
    /// One entry per incoming record, in input order
    pub events: Vec<MergeEvent>,
}

/// Merges `incoming` into `existing`.
///
/// Known customer ids get their name, location, ip and coordinates
/// overwritten; id, status, rto_count and unknown keys stay as they were.
/// Unknown customer ids are appended with the next free id. When a batch
/// repeats a customer id, the first occurrence is the record that stays and
/// the later ones update it.
///
/// Fails with [`StoreError::IdExhausted`] when the next id would overflow;
/// nothing is merged in that case.
pub fn merge_records(
    existing: Vec<OntRecord>,
    incoming: Vec<OntRecord>,
) -> Result<MergeOutcome, StoreError> {
    let mut records = existing;
    let mut index: HashMap<String, usize> = records
        .iter()
        .enumerate()
        .map(|(pos, record)| (record.id_pelanggan.clone(), pos))
        .collect();
    let mut max_id = records.iter().map(|record| record.id).max().unwrap_or(0);

    let mut added = 0;
    let mut updated = 0;
    let mut events = Vec::with_capacity(incoming.len());

    for mut item in incoming {
        if let Some(&pos) = index.get(&item.id_pelanggan) {
            let target = &mut records[pos];
            target.name = item.name;
            target.lokasi = item.lokasi;
            target.ip = item.ip;
            target.latitude = item.latitude;
            target.longitude = item.longitude;
            updated += 1;
            events.push(MergeEvent::Updated {
                id: target.id,
                id_pelanggan: target.id_pelanggan.clone(),
                name: target.name.clone(),
            });
        } else {
            max_id = max_id.checked_add(1).ok_or_else(|| StoreError::IdExhausted {
                id_pelanggan: item.id_pelanggan.clone(),
                max_id,
            })?;
            item.id = max_id;
            index.insert(item.id_pelanggan.clone(), records.len());
            events.push(MergeEvent::Added {
                id: item.id,
                id_pelanggan: item.id_pelanggan.clone(),
                name: item.name.clone(),
            });
            records.push(item);
            added += 1;
        }
    }

    debug!(added, updated, total = records.len(), "merge finished");
    Ok(MergeOutcome {
        records,
        added,
        updated,
        events,
    })
}
