//! Invoice field extraction module.

mod builder;
pub mod rules;
pub mod scanner;
mod summary;

pub use builder::{is_known_key, InvoiceRecordBuilder};
pub use scanner::{
    keys, AddressMode, AddressTarget, FieldExtractor, KeyValuePair, LineScan, ScanState,
    TableMode,
};
pub use summary::{quick_summary, QuickSummary};
