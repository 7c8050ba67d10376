//! Small shared utilities.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Returns the current time as an ISO-8601 (RFC 3339) timestamp string,
/// used for `creation_date` / `date_created` fields throughout the model
/// and durable schema.
pub fn current_timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
