use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::{segment, HttpRequest, Query};
use crate::types::{LiveRoom, LiveRoomList, LiveRoomPatch, NewLiveRoom};

pub struct LiveRooms<'a> {
    client: &'a ApiClient,
}

impl<'a> LiveRooms<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, category: Option<&str>) -> Result<LiveRoomList, ApiError> {
        let q = Query::new().opt("category", category);
        self.client.json(HttpRequest::get("/live-rooms").query(q)).await
    }

    pub async fn get(&self, id: &str) -> Result<LiveRoom, ApiError> {
        self.client.json(HttpRequest::get(format!("/live-rooms/{}", segment(id)))).await
    }

    pub async fn create(&self, room: &NewLiveRoom) -> Result<Value, ApiError> {
        self.client.json(HttpRequest::post("/live-rooms").json(room)).await
    }

    pub async fn update(&self, id: &str, patch: &LiveRoomPatch) -> Result<Value, ApiError> {
        self.client.json(HttpRequest::put(format!("/live-rooms/{}", segment(id))).json(patch)).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.client.json(HttpRequest::delete(format!("/live-rooms/{}", segment(id)))).await
    }
}
