//! Media record supplied by the host for one card.

use serde::Deserialize;
use time::OffsetDateTime;

/// One video record as stored by the host. Immutable for the lifetime of a
/// card; the card never writes any of these fields back.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    /// Opaque identifier of the asset in the delivery service.
    pub source_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub duration_seconds: f64,
    pub original_size_bytes: u64,
    pub compressed_size_bytes: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
