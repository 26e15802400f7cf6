use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::{segment, HttpRequest, Query};
use crate::tasks::TaskSubmission;
use crate::types::{Hotspot, HotspotFilter, HotspotQuery, Page};

use super::paged;

pub struct Hotspots<'a> {
    client: &'a ApiClient,
}

impl<'a> Hotspots<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &HotspotQuery) -> Result<Page<Hotspot>, ApiError> {
        let q = Query::new()
            .opt("platform", query.platform.as_deref())
            .opt("live_room_id", query.live_room_id.as_deref())
            .opt("start_date", query.start_date.as_deref())
            .opt("end_date", query.end_date.as_deref());
        self.client
            .json(HttpRequest::get("/hotspots").query(paged(q, query.paging)))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Hotspot, ApiError> {
        self.client.json(HttpRequest::get(format!("/hotspots/{}", segment(id)))).await
    }

    /// Start a crawl. Without `platform` the server crawls every platform it knows.
    pub async fn fetch(&self, platform: Option<&str>) -> Result<TaskSubmission, ApiError> {
        let q = Query::new().opt("platform", platform);
        self.client.json(HttpRequest::post("/hotspots/fetch").query(q)).await
    }

    pub async fn filter(&self, filter: &HotspotFilter) -> Result<Value, ApiError> {
        self.client.json(HttpRequest::post("/hotspots/filter").json(filter)).await
    }

    /// Bubble-chart data, optionally narrowed to one live room.
    pub async fn visualization(&self, live_room_id: Option<&str>) -> Result<Value, ApiError> {
        let q = Query::new().opt("live_room_id", live_room_id);
        self.client.json(HttpRequest::get("/hotspots/visualization").query(q)).await
    }
}
