use std::time::Duration;

use reqwest::{Client, Response, StatusCode, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

use crate::error::{ApiError, ErrorBody, MultipleErrors, SquareError};
use crate::http::route::Route;
use crate::models::{Card, Customer, Group, Segment};
use crate::pagination::Page;
use crate::query::{SearchRequest, SortField, SortOrder};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("square-rs/", env!("CARGO_PKG_VERSION"));

/// Transport adapter for the Square API.
///
/// Owns the HTTP session, attaches the authentication and versioning headers
/// to every request, decodes JSON bodies, and classifies non-success
/// responses. One typed method per fixed endpoint; nothing here retries.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base: Url,
}

impl HttpClient {
    /// Builds a session bound to `base` with the standard header set.
    pub fn new(token: &str, base: Url, api_version: Option<&str>) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        headers.insert(header::CACHE_CONTROL, header::HeaderValue::from_static("no-cache"));
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let mut auth = header::HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ApiError::InvalidArgument(
                "access token contains characters that cannot appear in a header".to_string(),
            )
        })?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        if let Some(version) = api_version {
            let value = header::HeaderValue::from_str(version).map_err(|_| {
                ApiError::InvalidArgument(format!("'{version}' is not a valid Square-Version value"))
            })?;
            headers.insert("Square-Version", value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: "client_init".to_string(),
                source,
            })?;

        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    async fn dispatch<T, B>(
        &self,
        route: Route,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resolved = route.resolve(&self.base)?;
        let endpoint = resolved.url.path().to_string();

        let mut request = self.client.request(resolved.method, resolved.url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.clone(),
            source,
        })?;

        self.handle_response(response, &endpoint).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        route: Route,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.dispatch(route, query, None::<&()>).await
    }

    async fn send_json<T, B>(&self, route: Route, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(route, &[], Some(body)).await
    }

    /// Sends a request whose response body carries nothing of interest.
    async fn send_empty(&self, route: Route) -> Result<(), ApiError> {
        let _: serde_json::Value = self.send(route, &[]).await?;
        Ok(())
    }

    /// Decodes a success body, or classifies a failure.
    ///
    /// 404 short-circuits to `NotFound`. Any other non-2xx status is read as
    /// an `errors` array: one classified entry surfaces directly, several
    /// become an ordered aggregate, and none leaves the raw status and body
    /// on a generic HTTP error so nothing is discarded.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(|source| ApiError::Decode {
                endpoint: endpoint.to_string(),
                source,
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                endpoint: endpoint.to_string(),
            });
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let body: ErrorBody = serde_json::from_str(&message).unwrap_or_default();
        let mut classified: Vec<SquareError> = body
            .errors
            .into_iter()
            .filter_map(SquareError::classify)
            .collect();

        match classified.len() {
            0 => Err(ApiError::Http {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                message,
            }),
            1 => Err(ApiError::Square(classified.remove(0))),
            _ => Err(ApiError::Multiple(MultipleErrors { errors: classified })),
        }
    }

    // --- customers ---

    pub(crate) async fn list_customers(
        &self,
        sort_field: Option<SortField>,
        sort_order: Option<SortOrder>,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> Result<CustomerPage, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(field) = sort_field {
            query.push(("sort_field", field.as_str().to_string()));
        }
        if let Some(order) = sort_order {
            query.push(("sort_order", order.as_str().to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        self.send(Route::new("GET", "customers"), &query).await
    }

    pub(crate) async fn search_customers(
        &self,
        body: &SearchRequest,
    ) -> Result<CustomerPage, ApiError> {
        self.send_json(Route::new("POST", "customers/search"), body)
            .await
    }

    pub(crate) async fn get_customer(&self, customer_id: &str) -> Result<Customer, ApiError> {
        let envelope: CustomerEnvelope = self
            .send(
                Route::new("GET", "customers/{customer_id}").param("customer_id", customer_id),
                &[],
            )
            .await?;
        Ok(envelope.customer)
    }

    pub(crate) async fn create_customer<B>(&self, body: &B) -> Result<Customer, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let envelope: CustomerEnvelope = self
            .send_json(Route::new("POST", "customers"), body)
            .await?;
        Ok(envelope.customer)
    }

    pub(crate) async fn update_customer<B>(
        &self,
        customer_id: &str,
        body: &B,
    ) -> Result<Customer, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let envelope: CustomerEnvelope = self
            .send_json(
                Route::new("PUT", "customers/{customer_id}").param("customer_id", customer_id),
                body,
            )
            .await?;
        Ok(envelope.customer)
    }

    pub(crate) async fn delete_customer(&self, customer_id: &str) -> Result<(), ApiError> {
        self.send_empty(
            Route::new("DELETE", "customers/{customer_id}").param("customer_id", customer_id),
        )
        .await
    }

    pub(crate) async fn assign_group(
        &self,
        customer_id: &str,
        group_id: &str,
    ) -> Result<(), ApiError> {
        self.send_empty(
            Route::new("PUT", "customers/{customer_id}/groups/{group_id}")
                .param("customer_id", customer_id)
                .param("group_id", group_id),
        )
        .await
    }

    pub(crate) async fn unassign_group(
        &self,
        customer_id: &str,
        group_id: &str,
    ) -> Result<(), ApiError> {
        self.send_empty(
            Route::new("DELETE", "customers/{customer_id}/groups/{group_id}")
                .param("customer_id", customer_id)
                .param("group_id", group_id),
        )
        .await
    }

    // --- cards ---

    pub(crate) async fn create_card<B>(&self, customer_id: &str, body: &B) -> Result<Card, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let envelope: CardEnvelope = self
            .send_json(
                Route::new("POST", "customers/{customer_id}/cards")
                    .param("customer_id", customer_id),
                body,
            )
            .await?;
        Ok(envelope.card)
    }

    pub(crate) async fn delete_card(
        &self,
        customer_id: &str,
        card_id: &str,
    ) -> Result<(), ApiError> {
        self.send_empty(
            Route::new("DELETE", "customers/{customer_id}/cards/{card_id}")
                .param("customer_id", customer_id)
                .param("card_id", card_id),
        )
        .await
    }

    // --- groups ---

    pub(crate) async fn list_groups(
        &self,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> Result<GroupPage, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        self.send(Route::new("GET", "customers/groups"), &query).await
    }

    pub(crate) async fn fetch_group(&self, group_id: &str) -> Result<Group, ApiError> {
        let envelope: GroupEnvelope = self
            .send(
                Route::new("GET", "customers/groups/{group_id}").param("group_id", group_id),
                &[],
            )
            .await?;
        Ok(envelope.group)
    }

    pub(crate) async fn create_group<B>(&self, body: &B) -> Result<Group, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let envelope: GroupEnvelope = self
            .send_json(Route::new("POST", "customers/groups"), body)
            .await?;
        Ok(envelope.group)
    }

    pub(crate) async fn update_group<B>(&self, group_id: &str, body: &B) -> Result<Group, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let envelope: GroupEnvelope = self
            .send_json(
                Route::new("PUT", "customers/groups/{group_id}").param("group_id", group_id),
                body,
            )
            .await?;
        Ok(envelope.group)
    }

    pub(crate) async fn delete_group(&self, group_id: &str) -> Result<(), ApiError> {
        self.send_empty(
            Route::new("DELETE", "customers/groups/{group_id}").param("group_id", group_id),
        )
        .await
    }

    // --- segments ---

    pub(crate) async fn list_segments(
        &self,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> Result<SegmentPage, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        self.send(Route::new("GET", "customers/segments"), &query)
            .await
    }

    pub(crate) async fn fetch_segment(&self, segment_id: &str) -> Result<Segment, ApiError> {
        let envelope: SegmentEnvelope = self
            .send(
                Route::new("GET", "customers/segments/{segment_id}")
                    .param("segment_id", segment_id),
                &[],
            )
            .await?;
        Ok(envelope.segment)
    }
}

/// One page of a customer list or search response.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerPage {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub cursor: Option<String>,
}

impl Page for CustomerPage {
    type Item = Customer;

    fn items(self) -> Vec<Customer> {
        self.customers
    }

    fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

/// One page of a group list response.
#[derive(Debug, Default, Deserialize)]
pub struct GroupPage {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub cursor: Option<String>,
}

impl Page for GroupPage {
    type Item = Group;

    fn items(self) -> Vec<Group> {
        self.groups
    }

    fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

/// One page of a segment list response.
#[derive(Debug, Default, Deserialize)]
pub struct SegmentPage {
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub cursor: Option<String>,
}

impl Page for SegmentPage {
    type Item = Segment;

    fn items(self) -> Vec<Segment> {
        self.segments
    }

    fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct CustomerEnvelope {
    customer: Customer,
}

#[derive(Debug, Deserialize)]
struct CardEnvelope {
    card: Card,
}

#[derive(Debug, Deserialize)]
struct GroupEnvelope {
    group: Group,
}

#[derive(Debug, Deserialize)]
struct SegmentEnvelope {
    segment: Segment,
}
