//! Domain DTOs for the studio API.
//!
//! # Design
//! These mirror the server's JSON schema. Fields the server treats as
//! free-form (analysis sections, shot lists, production notes) stay
//! `serde_json::Value`. Request payloads skip absent optional fields so the
//! server sees them as "not provided" rather than `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub total: u64,
    pub items: Vec<T>,
    pub limit: u64,
    pub offset: u64,
}

/// Paging shared by list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

// ---------------------------------------------------------------------------
// Hotspots
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: String,
    pub title: String,
    pub url: String,
    pub platform: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub heat_score: Option<f64>,
    #[serde(default)]
    pub match_score: Option<f64>,
    #[serde(default)]
    pub publish_time: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotspotQuery {
    pub platform: Option<String>,
    pub live_room_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub paging: Paging,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotFilter {
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_room_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub category: String,
    pub live_room_id: String,
    pub price: f64,
    #[serde(default)]
    pub selling_points: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hand_card: Option<String>,
    #[serde(default)]
    pub live_date: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub live_room_id: Option<String>,
    /// `YYYY-MM-DD`.
    pub live_date: Option<String>,
    pub paging: Paging,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub category: String,
    pub live_room_id: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selling_points: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_card: Option<String>,
    pub live_date: String,
}

/// Partial update; omitted fields stay unchanged on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selling_points: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Live rooms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveRoom {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub ip_character: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveRoomList {
    pub items: Vec<LiveRoom>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLiveRoom {
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_character: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveRoomPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_character: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    pub content: String,
    #[serde(default)]
    pub feedback_type: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackQuery {
    pub status: Option<String>,
    pub feedback_type: Option<String>,
    pub paging: Paging,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyStatus {
    pub configured: bool,
    #[serde(default)]
    pub masked_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: String,
    pub video_url: String,
    #[serde(default)]
    pub video_info: Option<Value>,
    #[serde(default)]
    pub basic_info: Option<Value>,
    #[serde(default)]
    pub shot_table: Option<Vec<Value>>,
    #[serde(default)]
    pub golden_3s: Option<Value>,
    #[serde(default)]
    pub highlights: Option<Vec<Value>>,
    #[serde(default)]
    pub viral_formula: Option<Value>,
    #[serde(default)]
    pub keywords: Option<Value>,
    #[serde(default)]
    pub production_tips: Option<Value>,
    #[serde(default)]
    pub techniques: Option<Vec<Value>>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub video_url: Option<String>,
    pub paging: Paging,
}

/// Returned by `POST /analysis/batch`: one task per video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSubmission {
    pub task_ids: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Scripts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub id: String,
    #[serde(default)]
    pub hotspot_id: Option<String>,
    pub product_id: String,
    #[serde(default)]
    pub analysis_report_id: Option<String>,
    #[serde(default)]
    pub video_info: Option<Value>,
    #[serde(default)]
    pub script_content: Option<String>,
    #[serde(default)]
    pub shot_list: Option<Vec<Value>>,
    #[serde(default)]
    pub production_notes: Option<Value>,
    #[serde(default)]
    pub tags: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptQuery {
    pub product_id: Option<String>,
    pub status: Option<String>,
    pub paging: Paging,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateScript {
    pub hotspot_id: String,
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_report_id: Option<String>,
    /// Seconds, 5..=15 on the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment_feedback: Option<String>,
    /// 5..=10 on the server; defaults to 5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Approve,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSuggestions {
    pub id: String,
    pub suggestions: Vec<Value>,
    #[serde(default)]
    pub count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn patch_omits_unset_fields() {
        let patch = ProductPatch {
            price: Some(59.0),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"price": 59.0}));
    }

    #[test]
    fn hotspot_accepts_missing_optionals() {
        let hotspot: Hotspot = serde_json::from_value(json!({
            "id": "h1",
            "title": "Autumn skincare",
            "url": "https://example.com/h1",
            "platform": "douyin",
            "created_at": "2024-10-01T08:00:00"
        }))
        .unwrap();
        assert!(hotspot.tags.is_none());
        assert!(hotspot.heat_score.is_none());
    }

    #[test]
    fn review_action_is_lowercase() {
        assert_eq!(serde_json::to_value(ReviewAction::Approve).unwrap(), json!("approve"));
    }

    #[test]
    fn generate_request_rejects_missing_product() {
        let result: Result<GenerateScript, _> = serde_json::from_value(json!({"hotspot_id": "h1"}));
        assert!(result.is_err());
    }

    #[test]
    fn page_decodes() {
        let page: Page<Feedback> = serde_json::from_value(json!({
            "total": 1,
            "limit": 20,
            "offset": 0,
            "items": [{
                "id": "f1",
                "content": "Please add export to Word",
                "created_at": "2024-10-01T08:00:00",
                "updated_at": "2024-10-01T08:00:00"
            }]
        }))
        .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].content, "Please add export to Word");
    }
}
