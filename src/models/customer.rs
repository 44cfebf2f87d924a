use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Address, Card, CreationSource};

/// A customer profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Customer {
    pub id: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub nickname: Option<String>,
    pub company_name: Option<String>,
    pub email_address: Option<String>,
    pub address: Option<Address>,
    /// Phone number in E.164 form.
    pub phone_number: Option<String>,
    pub birthday: Option<Birthday>,
    /// Secondary ID linking the profile to an entity in another system.
    pub reference_id: Option<String>,
    pub note: Option<String>,
    pub preferences: Option<CustomerPreferences>,
    pub creation_source: Option<CreationSource>,
    #[serde(default)]
    pub group_ids: Vec<String>,
    #[serde(default)]
    pub segment_ids: Vec<String>,
    #[serde(default)]
    pub cards: Vec<Card>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Full name assembled from given and family name, if available.
    pub fn name(&self) -> Option<String> {
        match (&self.given_name, &self.family_name) {
            (Some(given), Some(family)) => Some(format!("{given} {family}")),
            (Some(given), None) => Some(given.clone()),
            (None, Some(family)) => Some(family.clone()),
            (None, None) => None,
        }
    }
}

/// General customer preferences.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPreferences {
    /// Whether the customer unsubscribed from marketing campaign emails.
    pub email_unsubscribed: Option<bool>,
}

/// A customer's birthday.
///
/// The API sends birthdays as RFC 3339 dates whose year may be the
/// placeholder `0000` when the customer gave no birth year. `0000` is not a
/// valid calendar year, so parsing substitutes a leap year and the original
/// string is kept for byte-for-byte re-serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Birthday {
    raw: String,
    year: Option<i32>,
    month: u32,
    day: u32,
}

// 0004 is a leap year, so Feb 29 birthdays survive the substitution.
const PLACEHOLDER_YEAR: &str = "0004";

impl Birthday {
    /// Month of the birthday, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day of the birthday, 1-31.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Birth year, absent when the customer gave none.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// The timestamp exactly as the API sent it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl TryFrom<String> for Birthday {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let year_naive = raw.starts_with("0000");
        let adjusted = if year_naive {
            format!("{PLACEHOLDER_YEAR}{}", &raw[4..])
        } else {
            raw.clone()
        };

        let date_part = adjusted.get(..10).ok_or_else(|| {
            format!("birthday '{raw}' is too short to contain an RFC 3339 date")
        })?;
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|e| format!("birthday '{raw}' is not an RFC 3339 date: {e}"))?;

        Ok(Self {
            year: (!year_naive).then(|| date.year()),
            month: date.month(),
            day: date.day(),
            raw,
        })
    }
}

impl From<Birthday> for String {
    fn from(birthday: Birthday) -> Self {
        birthday.raw
    }
}
