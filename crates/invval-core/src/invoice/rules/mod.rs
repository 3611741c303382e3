//! Rule-based helpers for invoice text.

pub mod amounts;
pub mod dates;
pub mod patterns;
pub mod text;

pub use amounts::{format_amount, parse_amount};
pub use dates::{normalize_date, parse_invoice_date};
pub use text::{clean_extracted_text, clean_invoice_number, split_lines};
