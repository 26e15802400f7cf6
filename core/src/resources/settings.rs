use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::types::ApiKeyStatus;

const DEEPSEEK_KEY_PATH: &str = "/settings/deepseek-api-key";

pub struct Settings<'a> {
    client: &'a ApiClient,
}

impl<'a> Settings<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn deepseek_api_key(&self) -> Result<ApiKeyStatus, ApiError> {
        self.client.json(HttpRequest::get(DEEPSEEK_KEY_PATH)).await
    }

    pub async fn set_deepseek_api_key(&self, api_key: &str) -> Result<Value, ApiError> {
        self.client
            .json(HttpRequest::post(DEEPSEEK_KEY_PATH).json(&json!({ "api_key": api_key })))
            .await
    }
}
