use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::{segment, HttpRequest, Query};
use crate::tasks::TaskSubmission;
use crate::types::{AnalysisReport, BatchSubmission, Page, ReportQuery};

use super::paged;

pub struct Analysis<'a> {
    client: &'a ApiClient,
}

impl<'a> Analysis<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_reports(&self, query: &ReportQuery) -> Result<Page<AnalysisReport>, ApiError> {
        let q = Query::new().opt("video_url", query.video_url.as_deref());
        self.client
            .json(HttpRequest::get("/analysis/reports").query(paged(q, query.paging)))
            .await
    }

    pub async fn get_report(&self, id: &str) -> Result<AnalysisReport, ApiError> {
        self.client.json(HttpRequest::get(format!("/analysis/reports/{}", segment(id)))).await
    }

    /// Start analysing one video; poll the returned task for the report.
    pub async fn analyze(&self, video_url: &str, options: Option<Value>) -> Result<TaskSubmission, ApiError> {
        let mut body = json!({ "video_url": video_url });
        if let Some(options) = options {
            body["options"] = options;
        }
        self.client.json(HttpRequest::post("/analysis/analyze").json(&body)).await
    }

    pub async fn batch(&self, video_urls: &[String]) -> Result<BatchSubmission, ApiError> {
        self.client.json(HttpRequest::post("/analysis/batch").json(video_urls)).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::test_support::client;
    use crate::http::Body;
    use crate::transport::fake;

    #[tokio::test]
    async fn analyze_omits_absent_options() {
        let (client, transport) = client(vec![
            fake::json(200, json!({"task_id": "t-1"})),
            fake::json(200, json!({"task_id": "t-2"})),
        ]);
        client.analysis().analyze("https://v/1", None).await.unwrap();
        client
            .analysis()
            .analyze("https://v/2", Some(json!({"depth": "full"})))
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].1.body, Some(Body::Json(json!({"video_url": "https://v/1"}))));
        assert_eq!(
            calls[1].1.body,
            Some(Body::Json(json!({"video_url": "https://v/2", "options": {"depth": "full"}})))
        );
    }

    #[tokio::test]
    async fn batch_posts_a_bare_array() {
        let (client, transport) = client(vec![fake::json(200, json!({"task_ids": ["a", "b"], "status": "success"}))]);
        let urls = vec!["https://v/1".to_string(), "https://v/2".to_string()];
        let submitted = client.analysis().batch(&urls).await.unwrap();
        assert_eq!(submitted.task_ids, vec!["a", "b"]);
        assert_eq!(
            transport.calls()[0].1.body,
            Some(Body::Json(json!(["https://v/1", "https://v/2"])))
        );
    }
}
