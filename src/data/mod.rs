//! Dataset loading: column schema, parsed records and the line reader.

pub mod loader;
pub mod record;
pub mod schema;

pub use loader::{RecordReader, load_records, open_records};
pub(crate) use loader::separator_byte;
pub use record::IrisRecord;
pub use schema::{ColumnKind, ColumnSpec, FEATURE_COUNT, Schema};
