use futures::Stream;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::models::Segment;
use crate::pagination;

/// The customer segment endpoint group. Segments are computed by Square and
/// read-only here.
#[derive(Debug, Clone, Copy)]
pub struct Segments<'a> {
    http: &'a HttpClient,
}

impl<'a> Segments<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Streams all segments, following cursors until exhausted.
    pub fn list(self, limit: Option<u32>) -> impl Stream<Item = Result<Segment, ApiError>> + 'a {
        let http = self.http;
        pagination::items(move |cursor| async move {
            http.list_segments(limit, cursor.as_deref()).await
        })
    }

    /// Collects every page of the listing into one ordered vector.
    pub async fn list_all(&self, limit: Option<u32>) -> Result<Vec<Segment>, ApiError> {
        let http = self.http;
        pagination::collect_all(move |cursor| async move {
            http.list_segments(limit, cursor.as_deref()).await
        })
        .await
    }

    /// Fetches a single segment by ID.
    pub async fn get(&self, segment_id: &str) -> Result<Segment, ApiError> {
        self.http.fetch_segment(segment_id).await
    }
}
