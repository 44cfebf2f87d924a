use serde::{Deserialize, Serialize};

/// A physical address attached to a customer or card.
///
/// Every field is optional on the wire; serialization omits unset fields
/// entirely rather than sending nulls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_3: Option<String>,
    /// A civil entity within the country. In the US, the state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_district_level_1: Option<String>,
    /// A civil entity within level 1. In the US, the county.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_district_level_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_district_level_3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<Country>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// The city or town.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sublocality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sublocality_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sublocality_3: Option<String>,
}

impl Address {
    /// Recipient name, if first and/or last name are set.
    pub fn name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            _ => None,
        }
    }

    /// All set administrative districts, comma-joined, most specific last.
    pub fn district(&self) -> Option<String> {
        let joined = [
            &self.administrative_district_level_1,
            &self.administrative_district_level_2,
            &self.administrative_district_level_3,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect::<Vec<_>>()
        .join(",");

        if joined.is_empty() { None } else { Some(joined) }
    }

    /// Full postal address, one component per line, unset parts skipped.
    pub fn full_address(&self) -> Option<String> {
        let district = self.district();
        let name = self.name();
        let country = self.country.as_ref().map(|c| c.code().to_string());

        let joined = [
            &name,
            &self.address_line_1,
            &self.address_line_2,
            &self.address_line_3,
            &self.locality,
            &self.postal_code,
            &district,
            &country,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");

        if joined.is_empty() { None } else { Some(joined) }
    }
}

/// ISO 3166-1 alpha-2 country code, carried verbatim from the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Country {
    alpha2: String,
}

impl Country {
    pub fn code(&self) -> &str {
        &self.alpha2
    }
}

impl From<String> for Country {
    fn from(alpha2: String) -> Self {
        Self { alpha2 }
    }
}

impl From<&str> for Country {
    fn from(alpha2: &str) -> Self {
        Self {
            alpha2: alpha2.to_string(),
        }
    }
}

impl From<Country> for String {
    fn from(country: Country) -> Self {
        country.alpha2
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.alpha2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Address {
        serde_json::from_value(json!({
            "address_line_1": "1455 Market Street",
            "locality": "San Francisco",
            "administrative_district_level_1": "CA",
            "postal_code": "94103",
            "country": "US",
            "first_name": "Amelia",
            "last_name": "Earhart"
        }))
        .unwrap()
    }

    #[test]
    fn test_hydrates_from_wire_json() {
        let address = sample();
        assert_eq!(address.address_line_1.as_deref(), Some("1455 Market Street"));
        assert_eq!(address.postal_code.as_deref(), Some("94103"));
        assert_eq!(address.country.as_ref().unwrap().code(), "US");
        assert!(address.address_line_2.is_none());
    }

    #[test]
    fn test_serialization_omits_unset_fields_and_keeps_country_code() {
        let address = sample();
        let value = serde_json::to_value(&address).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["country"], json!("US"));
        assert!(!object.contains_key("address_line_2"));
        assert!(!object.contains_key("sublocality"));
        assert!(object.values().all(|v| !v.is_null()));
    }

    #[test]
    fn test_name_and_district() {
        let address = sample();
        assert_eq!(address.name().as_deref(), Some("Amelia Earhart"));
        assert_eq!(address.district().as_deref(), Some("CA"));

        let empty = Address::default();
        assert!(empty.name().is_none());
        assert!(empty.district().is_none());
        assert!(empty.full_address().is_none());
    }

    #[test]
    fn test_full_address_layout() {
        let address = sample();
        let full = address.full_address().unwrap();
        assert_eq!(
            full,
            "Amelia Earhart\n1455 Market Street\nSan Francisco\n94103\nCA\nUS"
        );
    }
}
