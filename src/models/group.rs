use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A customer group belonging to the current merchant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Group {
    pub id: Option<String>,
    pub name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
