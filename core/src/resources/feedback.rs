use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::{segment, HttpRequest, Query};
use crate::types::{Feedback, FeedbackPatch, FeedbackQuery, NewFeedback, Page};

use super::paged;

pub struct FeedbackApi<'a> {
    client: &'a ApiClient,
}

impl<'a> FeedbackApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &FeedbackQuery) -> Result<Page<Feedback>, ApiError> {
        let q = Query::new()
            .opt("status", query.status.as_deref())
            .opt("feedback_type", query.feedback_type.as_deref());
        self.client
            .json(HttpRequest::get("/feedback").query(paged(q, query.paging)))
            .await
    }

    pub async fn create(&self, feedback: &NewFeedback) -> Result<Value, ApiError> {
        self.client.json(HttpRequest::post("/feedback").json(feedback)).await
    }

    pub async fn update(&self, id: &str, patch: &FeedbackPatch) -> Result<Value, ApiError> {
        self.client.json(HttpRequest::put(format!("/feedback/{}", segment(id))).json(patch)).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.client.json(HttpRequest::delete(format!("/feedback/{}", segment(id)))).await
    }
}
