//! Data models for the admin console.
//!
//! - `Identity`: the user returned by the liveness probe
//! - `Record`: one row of a remote collection, kept as a JSON object
//! - Inquiry defaults and the client-side search/sort helpers for tables

pub mod identity;
pub mod inquiry;
pub mod record;

pub use identity::Identity;
pub use inquiry::{inquiry_query, INQUIRIES_COLLECTION, INQUIRY_COLUMNS, INQUIRY_DEFAULT_SORT};
pub use record::{columns_for, filter_records, record_cell, sort_records, Record};
