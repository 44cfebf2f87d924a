use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A customer segment computed by Square. Read-only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Segment {
    pub id: Option<String>,
    pub name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
