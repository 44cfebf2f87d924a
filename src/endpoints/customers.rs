use futures::Stream;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::models::{Address, Birthday, Customer};
use crate::pagination;
use crate::query::{SearchQuery, SortField, SortOrder};

/// The customer endpoint group.
///
/// Listing and searching return lazy streams; the `*_all` variants collect
/// every page eagerly instead.
#[derive(Debug, Clone, Copy)]
pub struct Customers<'a> {
    http: &'a HttpClient,
}

impl<'a> Customers<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Streams all customers, following cursors until exhausted.
    pub fn list(
        self,
        options: ListCustomers,
    ) -> impl Stream<Item = Result<Customer, ApiError>> + 'a {
        let http = self.http;
        pagination::items(move |cursor| {
            let options = options.clone();
            async move {
                http.list_customers(
                    options.sort_field,
                    options.sort_order,
                    options.limit,
                    cursor.as_deref(),
                )
                .await
            }
        })
    }

    /// Collects every page of the listing into one ordered vector.
    pub async fn list_all(&self, options: ListCustomers) -> Result<Vec<Customer>, ApiError> {
        let http = self.http;
        pagination::collect_all(move |cursor| {
            let options = options.clone();
            async move {
                http.list_customers(
                    options.sort_field,
                    options.sort_order,
                    options.limit,
                    cursor.as_deref(),
                )
                .await
            }
        })
        .await
    }

    /// Streams customers matching `query`.
    ///
    /// The query is validated here, before anything is sent; an invalid
    /// filter fails without touching the network.
    pub fn search(
        self,
        query: SearchQuery,
    ) -> Result<impl Stream<Item = Result<Customer, ApiError>> + 'a, ApiError> {
        let request = query.build()?;
        let http = self.http;
        Ok(pagination::items(move |cursor| {
            let body = request.with_cursor(cursor);
            async move { http.search_customers(&body).await }
        }))
    }

    /// Collects every page of a search into one ordered vector.
    pub async fn search_all(&self, query: SearchQuery) -> Result<Vec<Customer>, ApiError> {
        let request = query.build()?;
        let http = self.http;
        pagination::collect_all(move |cursor| {
            let body = request.with_cursor(cursor);
            async move { http.search_customers(&body).await }
        })
        .await
    }

    /// Fetches a single customer by ID.
    pub async fn get(&self, customer_id: &str) -> Result<Customer, ApiError> {
        self.http.get_customer(customer_id).await
    }

    /// Creates a customer profile.
    pub async fn create(&self, customer: CreateCustomer) -> Result<Customer, ApiError> {
        customer.validate()?;
        self.http.create_customer(&customer).await
    }

    /// Updates an existing customer profile.
    pub async fn update(
        &self,
        customer_id: &str,
        fields: UpdateCustomer,
    ) -> Result<Customer, ApiError> {
        self.http.update_customer(customer_id, &fields).await
    }

    /// Deletes a customer profile.
    pub async fn delete(&self, customer_id: &str) -> Result<(), ApiError> {
        self.http.delete_customer(customer_id).await
    }

    /// Adds a group membership to a customer.
    pub async fn assign_group(&self, customer_id: &str, group_id: &str) -> Result<(), ApiError> {
        self.http.assign_group(customer_id, group_id).await
    }

    /// Removes a group membership from a customer.
    pub async fn unassign_group(&self, customer_id: &str, group_id: &str) -> Result<(), ApiError> {
        self.http.unassign_group(customer_id, group_id).await
    }
}

/// Options for listing customers.
#[derive(Debug, Clone, Default)]
pub struct ListCustomers {
    pub sort_field: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
}

impl ListCustomers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort_field(mut self, field: SortField) -> Self {
        self.sort_field = Some(field);
        self
    }

    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = Some(order);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Fields for creating a customer profile.
///
/// At least one of `given_name`, `family_name`, `company_name`,
/// `email_address` or `phone_number` must be set; this is checked before any
/// request goes out.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateCustomer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<Birthday>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CreateCustomer {
    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        let has_identifier = self.given_name.is_some()
            || self.family_name.is_some()
            || self.company_name.is_some()
            || self.email_address.is_some()
            || self.phone_number.is_some();

        if has_identifier {
            Ok(())
        } else {
            Err(ApiError::InvalidArgument(
                "creating a customer requires at least one of: given_name, family_name, \
                 company_name, email_address, phone_number"
                    .to_string(),
            ))
        }
    }
}

/// Fields for updating a customer profile. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateCustomer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<Birthday>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
