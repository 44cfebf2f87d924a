//! Customer search query building.
//!
//! `SearchQuery` gathers structured filter criteria and turns them into the
//! nested document the search endpoint expects. All validation happens in
//! [`SearchQuery::build`], before any request goes out, so a bad filter can
//! never cause a partial multi-page fetch. Unset filters omit their keys
//! entirely; nothing is ever serialized as null.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ApiError;
use crate::models::CreationSource;

/// A filter criterion for fuzzy-capable text fields.
///
/// Plain strings convert to exact matches; use [`Match::fuzzy`] for
/// non-exact matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Match {
    Exact(String),
    Fuzzy(String),
}

impl Match {
    pub fn fuzzy(value: impl Into<String>) -> Self {
        Self::Fuzzy(value.into())
    }

    pub fn exact(value: impl Into<String>) -> Self {
        Self::Exact(value.into())
    }
}

impl From<&str> for Match {
    fn from(value: &str) -> Self {
        Self::Exact(value.to_string())
    }
}

impl From<String> for Match {
    fn from(value: String) -> Self {
        Self::Exact(value)
    }
}

/// Group membership rule: up to three optional member sets.
///
/// `all` requires membership in every listed group, `any` in at least one,
/// `none` in none of them. Unset sets are omitted from the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    all: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    any: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    none: Option<Vec<String>>,
}

impl GroupRule {
    pub fn all<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::default().and_all(ids)
    }

    pub fn any<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::default().and_any(ids)
    }

    pub fn none<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::default().and_none(ids)
    }

    pub fn and_all<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.all = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn and_any<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.any = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn and_none<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.none = Some(ids.into_iter().map(Into::into).collect());
        self
    }
}

impl From<Vec<String>> for GroupRule {
    fn from(ids: Vec<String>) -> Self {
        Self::all(ids)
    }
}

impl From<Vec<&str>> for GroupRule {
    fn from(ids: Vec<&str>) -> Self {
        Self::all(ids)
    }
}

/// Field a customer search can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortField {
    Default,
    CreatedAt,
}

impl SortField {
    /// Parses a case-insensitive token. This is an API restriction, not a
    /// client preference: only these two fields are recognized server-side.
    pub fn parse(token: &str) -> Result<Self, ApiError> {
        match token.to_ascii_uppercase().as_str() {
            "DEFAULT" => Ok(Self::Default),
            "CREATED_AT" => Ok(Self::CreatedAt),
            _ => Err(ApiError::InvalidArgument(format!(
                "sort_field must be either DEFAULT or CREATED_AT, not '{token}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::CreatedAt => "CREATED_AT",
        }
    }
}

/// Sort direction, normalized to the uppercase canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(token: &str) -> Result<Self, ApiError> {
        match token.to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(ApiError::InvalidArgument(format!(
                "order must be either ASC or DESC, not '{token}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// An inclusive timestamp range, start and end always set together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum SourceRule {
    Include,
    Exclude,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct CreationSourceFilter {
    rule: SourceRule,
    values: Vec<CreationSource>,
}

/// Structured filter criteria for a customer search.
///
/// Collect filters with the setters, then [`build`](Self::build) validates
/// everything and produces the request document.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    limit: Option<u32>,
    order: Option<String>,
    sort_field: Option<String>,
    created_at: Option<(DateTime<Utc>, DateTime<Utc>)>,
    updated_at: Option<(DateTime<Utc>, DateTime<Utc>)>,
    creation_source: Vec<CreationSource>,
    not_creation_source: Vec<CreationSource>,
    email_address: Option<Match>,
    phone_number: Option<Match>,
    reference_id: Option<Match>,
    group_ids: Option<GroupRule>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results per page, 1-100 inclusive.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sort direction token, case-insensitive `asc` or `desc`.
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Sort field token, case-insensitive `default` or `created_at`.
    pub fn sort_field(mut self, field: impl Into<String>) -> Self {
        self.sort_field = Some(field.into());
        self
    }

    /// Customers created between the two timestamps.
    pub fn created_between(mut self, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Self {
        self.created_at = Some((start_at, end_at));
        self
    }

    /// Customers updated between the two timestamps.
    pub fn updated_between(mut self, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Self {
        self.updated_at = Some((start_at, end_at));
        self
    }

    /// Customers created by this source. Repeatable; cannot be combined with
    /// [`not_creation_source`](Self::not_creation_source).
    pub fn creation_source(mut self, source: CreationSource) -> Self {
        self.creation_source.push(source);
        self
    }

    /// Customers created by none of these sources. Repeatable; cannot be
    /// combined with [`creation_source`](Self::creation_source).
    pub fn not_creation_source(mut self, source: CreationSource) -> Self {
        self.not_creation_source.push(source);
        self
    }

    /// Filter by email address; plain strings match exactly.
    pub fn email_address(mut self, criterion: impl Into<Match>) -> Self {
        self.email_address = Some(criterion.into());
        self
    }

    /// Filter by E.164 phone number; plain strings match exactly.
    pub fn phone_number(mut self, criterion: impl Into<Match>) -> Self {
        self.phone_number = Some(criterion.into());
        self
    }

    /// Filter by reference ID; plain strings match exactly.
    pub fn reference_id(mut self, criterion: impl Into<Match>) -> Self {
        self.reference_id = Some(criterion.into());
        self
    }

    /// Filter by group membership. A plain collection means the customer
    /// must belong to every listed group.
    pub fn groups(mut self, rule: impl Into<GroupRule>) -> Self {
        self.group_ids = Some(rule.into());
        self
    }

    /// Validates the collected criteria and assembles the request document.
    ///
    /// Pure transformation: nothing is sent, so an invalid filter fails here
    /// and never triggers a partial multi-page fetch.
    pub fn build(self) -> Result<SearchRequest, ApiError> {
        if let Some(limit) = self.limit {
            if !(1..=100).contains(&limit) {
                return Err(ApiError::InvalidArgument(
                    "limit must be within the range 1-100 inclusive".to_string(),
                ));
            }
        }

        let order = self.order.as_deref().map(SortOrder::parse).transpose()?;
        let field = self
            .sort_field
            .as_deref()
            .map(SortField::parse)
            .transpose()?;

        if !self.creation_source.is_empty() && !self.not_creation_source.is_empty() {
            return Err(ApiError::InvalidArgument(
                "cannot specify both creation_source and not_creation_source".to_string(),
            ));
        }
        let creation_source = if !self.creation_source.is_empty() {
            Some(CreationSourceFilter {
                rule: SourceRule::Include,
                values: self.creation_source,
            })
        } else if !self.not_creation_source.is_empty() {
            Some(CreationSourceFilter {
                rule: SourceRule::Exclude,
                values: self.not_creation_source,
            })
        } else {
            None
        };

        let sort = (order.is_some() || field.is_some()).then_some(Sort { field, order });

        Ok(SearchRequest {
            cursor: None,
            limit: self.limit,
            query: Query {
                filter: Filter {
                    created_at: self.created_at.map(|(start_at, end_at)| TimeRange {
                        start_at,
                        end_at,
                    }),
                    updated_at: self.updated_at.map(|(start_at, end_at)| TimeRange {
                        start_at,
                        end_at,
                    }),
                    creation_source,
                    email_address: self.email_address,
                    phone_number: self.phone_number,
                    reference_id: self.reference_id,
                    group_ids: self.group_ids,
                },
                sort,
            },
        })
    }
}

/// Validated, serializable body for the search endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    query: Query,
}

impl SearchRequest {
    /// Copy of this request continuing from `cursor`, passed back verbatim.
    pub(crate) fn with_cursor(&self, cursor: Option<String>) -> Self {
        let mut request = self.clone();
        request.cursor = cursor;
        request
    }
}

#[derive(Debug, Clone, Serialize)]
struct Query {
    filter: Filter,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<Sort>,
}

#[derive(Debug, Clone, Serialize)]
struct Sort {
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<SortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<SortOrder>,
}

#[derive(Debug, Clone, Serialize)]
struct Filter {
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<TimeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<TimeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    creation_source: Option<CreationSourceFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_address: Option<Match>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<Match>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_id: Option<Match>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_ids: Option<GroupRule>,
}
