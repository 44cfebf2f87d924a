use futures::Stream;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::models::Group;
use crate::pagination;

/// The customer group endpoint group.
#[derive(Debug, Clone, Copy)]
pub struct Groups<'a> {
    http: &'a HttpClient,
}

impl<'a> Groups<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Streams all groups, following cursors until exhausted.
    pub fn list(self, limit: Option<u32>) -> impl Stream<Item = Result<Group, ApiError>> + 'a {
        let http = self.http;
        pagination::items(move |cursor| async move {
            http.list_groups(limit, cursor.as_deref()).await
        })
    }

    /// Collects every page of the listing into one ordered vector.
    pub async fn list_all(&self, limit: Option<u32>) -> Result<Vec<Group>, ApiError> {
        let http = self.http;
        pagination::collect_all(move |cursor| async move {
            http.list_groups(limit, cursor.as_deref()).await
        })
        .await
    }

    /// Fetches a single group by ID.
    pub async fn get(&self, group_id: &str) -> Result<Group, ApiError> {
        self.http.fetch_group(group_id).await
    }

    /// Creates a group with the given name.
    pub async fn create(
        &self,
        name: &str,
        idempotency_key: Option<&str>,
    ) -> Result<Group, ApiError> {
        let body = GroupBody {
            idempotency_key,
            group: GroupFields { name },
        };
        self.http.create_group(&body).await
    }

    /// Renames an existing group.
    pub async fn rename(&self, group_id: &str, name: &str) -> Result<Group, ApiError> {
        let body = GroupBody {
            idempotency_key: None,
            group: GroupFields { name },
        };
        self.http.update_group(group_id, &body).await
    }

    /// Deletes a group. Memberships dissolve; customers are untouched.
    pub async fn delete(&self, group_id: &str) -> Result<(), ApiError> {
        self.http.delete_group(group_id).await
    }
}

#[derive(Debug, Serialize)]
struct GroupBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    idempotency_key: Option<&'a str>,
    group: GroupFields<'a>,
}

#[derive(Debug, Serialize)]
struct GroupFields<'a> {
    name: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_group_body_serialization() {
        let body = GroupBody {
            idempotency_key: Some("key-1"),
            group: GroupFields { name: "Regulars" },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"idempotency_key": "key-1", "group": {"name": "Regulars"}})
        );

        let body = GroupBody {
            idempotency_key: None,
            group: GroupFields { name: "Regulars" },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"group": {"name": "Regulars"}})
        );
    }
}
