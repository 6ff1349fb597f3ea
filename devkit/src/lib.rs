/*!
# ONT DevKit - test support for the ONT dataset tools

- `DatasetHarness`: throwaway deployment directory (`data/`, `runtime/backups/`)
- `fixtures`: JSON builders for export rows and canonical records
*/

pub mod fixtures;
pub mod test_utils;

pub use fixtures::{canonical_record, export_row, RecordBuilder};
pub use test_utils::DatasetHarness;
