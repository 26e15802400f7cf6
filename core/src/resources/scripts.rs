use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::{segment, HttpRequest, HttpResponse, Query};
use crate::tasks::TaskSubmission;
use crate::types::{GenerateScript, OptimizationSuggestions, Page, ReviewAction, Script, ScriptQuery};

use super::paged;

pub struct Scripts<'a> {
    client: &'a ApiClient,
}

impl<'a> Scripts<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ScriptQuery) -> Result<Page<Script>, ApiError> {
        let q = Query::new()
            .opt("product_id", query.product_id.as_deref())
            .opt("status", query.status.as_deref());
        self.client
            .json(HttpRequest::get("/scripts").query(paged(q, query.paging)))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Script, ApiError> {
        self.client.json(HttpRequest::get(format!("/scripts/{}", segment(id)))).await
    }

    pub async fn generate(&self, request: &GenerateScript) -> Result<TaskSubmission, ApiError> {
        self.client.json(HttpRequest::post("/scripts/generate").json(request)).await
    }

    /// `changes` is a partial script object.
    pub async fn update(&self, id: &str, changes: &Value) -> Result<Value, ApiError> {
        self.client.json(HttpRequest::put(format!("/scripts/{}", segment(id))).json(changes)).await
    }

    pub async fn review(&self, id: &str, action: ReviewAction, comment: Option<&str>) -> Result<Value, ApiError> {
        let mut body = json!({ "action": action });
        if let Some(comment) = comment {
            body["comment"] = json!(comment);
        }
        self.client.json(HttpRequest::post(format!("/scripts/{}/review", segment(id))).json(&body)).await
    }

    pub async fn optimize(&self, id: &str) -> Result<OptimizationSuggestions, ApiError> {
        self.client.json(HttpRequest::post(format!("/scripts/{}/optimize", segment(id)))).await
    }

    pub async fn regenerate(&self, id: &str, adjustment_feedback: &str) -> Result<TaskSubmission, ApiError> {
        let body = json!({ "adjustment_feedback": adjustment_feedback });
        self.client
            .json(HttpRequest::post(format!("/scripts/{}/regenerate", segment(id))).json(&body))
            .await
    }

    /// The PDF envelope; use `HttpResponse::filename` for the suggested name.
    pub async fn export_pdf(&self, id: &str) -> Result<HttpResponse, ApiError> {
        self.client.binary(HttpRequest::get(format!("/scripts/{}/export-pdf", segment(id)))).await
    }
}
