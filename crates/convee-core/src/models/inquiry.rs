use crate::api::QueryOptions;

/// Remote name of the inquiries collection.
pub const INQUIRIES_COLLECTION: &str = "anfragen";

/// Newest first.
pub const INQUIRY_DEFAULT_SORT: &str = "-date_created";

/// Columns shown first when present in the data.
pub const INQUIRY_COLUMNS: &[&str] = &[
    "id",
    "date_created",
    "status",
    "name",
    "email",
    "phone",
    "subject",
    "message",
];

pub fn inquiry_query(limit: u32) -> QueryOptions {
    QueryOptions::new().sort(INQUIRY_DEFAULT_SORT).limit(limit)
}
