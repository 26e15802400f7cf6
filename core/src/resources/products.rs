use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::{segment, HttpRequest, Query};
use crate::types::{NewProduct, Page, Product, ProductPatch, ProductQuery};

use super::paged;

pub struct Products<'a> {
    client: &'a ApiClient,
}

impl<'a> Products<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ProductQuery) -> Result<Page<Product>, ApiError> {
        let q = Query::new()
            .opt("live_room_id", query.live_room_id.as_deref())
            .opt("live_date", query.live_date.as_deref());
        self.client
            .json(HttpRequest::get("/products").query(paged(q, query.paging)))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Product, ApiError> {
        self.client.json(HttpRequest::get(format!("/products/{}", segment(id)))).await
    }

    pub async fn create(&self, product: &NewProduct) -> Result<Value, ApiError> {
        self.client.json(HttpRequest::post("/products").json(product)).await
    }

    pub async fn update(&self, id: &str, patch: &ProductPatch) -> Result<Value, ApiError> {
        self.client.json(HttpRequest::put(format!("/products/{}", segment(id))).json(patch)).await
    }
}
