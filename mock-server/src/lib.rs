//! In-memory stand-in for the studio API, used by the client's tests.
//!
//! Serves a subset of the real routes under `/api/v1`. Long-running jobs are
//! simulated: every submission registers a task that advances one step per
//! status read (PENDING, then PROGRESS 1..=n of n, then its terminal state)
//! and stays terminal afterwards. Errors carry a `detail` field.

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const API_PREFIX: &str = "/api/v1";

/// How long `GET /api/v1/slow` holds its response.
pub const SLOW_RESPONSE: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiveRoom {
    pub id: String,
    pub name: String,
    pub category: String,
    pub keywords: Option<Vec<String>>,
    pub ip_character: Option<String>,
    pub style: Option<String>,
    pub created_at: String,
}

#[derive(Deserialize)]
pub struct CreateLiveRoom {
    pub name: String,
    pub category: String,
    pub keywords: Option<Vec<String>>,
    pub ip_character: Option<String>,
    pub style: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateLiveRoom {
    pub name: Option<String>,
    pub category: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub ip_character: Option<String>,
    pub style: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    pub user_name: Option<String>,
    pub content: String,
    pub feedback_type: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<String>,
    pub response: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize)]
pub struct CreateFeedback {
    pub user_name: Option<String>,
    pub content: String,
    pub feedback_type: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct UpdateFeedback {
    pub status: Option<String>,
    pub response: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Script {
    pub id: String,
    pub hotspot_id: Option<String>,
    pub product_id: String,
    pub script_content: Option<String>,
    pub status: Option<String>,
    pub created_at: String,
}

#[derive(Deserialize)]
pub struct GenerateScript {
    pub hotspot_id: String,
    pub product_id: String,
    pub duration: Option<u32>,
    pub script_count: Option<u32>,
}

#[derive(Deserialize)]
pub struct Regenerate {
    pub adjustment_feedback: String,
}

#[derive(Deserialize)]
pub struct Analyze {
    pub video_url: String,
}

#[derive(Deserialize)]
pub struct ApiKey {
    pub api_key: String,
}

#[derive(Deserialize)]
pub struct CategoryFilter {
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct FeedbackFilter {
    pub status: Option<String>,
    pub feedback_type: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Clone, Debug)]
enum Outcome {
    Success(Value),
    Failure(String),
}

#[derive(Clone, Debug)]
struct MockTask {
    total: u64,
    reads: u64,
    outcome: Outcome,
}

impl MockTask {
    /// Status body for the current read, then advance.
    fn next_status(&mut self, task_id: &str) -> Value {
        let step = self.reads;
        self.reads = (self.reads + 1).min(self.total + 1);
        if step == 0 {
            json!({"task_id": task_id, "state": "PENDING", "status": "waiting"})
        } else if step <= self.total {
            json!({
                "task_id": task_id,
                "state": "PROGRESS",
                "current": step,
                "total": self.total,
                "status": "running"
            })
        } else {
            match &self.outcome {
                Outcome::Success(result) => {
                    json!({"task_id": task_id, "state": "SUCCESS", "result": result, "status": "done"})
                }
                Outcome::Failure(error) => {
                    json!({"task_id": task_id, "state": "FAILURE", "error": error, "status": "failed"})
                }
            }
        }
    }
}

#[derive(Default)]
pub struct Store {
    rooms: HashMap<String, LiveRoom>,
    feedback: HashMap<String, Feedback>,
    scripts: HashMap<String, Script>,
    tasks: HashMap<String, MockTask>,
    deepseek_key: Option<String>,
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

fn detail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": message })))
}

fn now() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    secs.to_string()
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/live-rooms", get(list_rooms).post(create_room))
        .route("/live-rooms/{id}", get(get_room).put(update_room).delete(delete_room))
        .route("/feedback", get(list_feedback).post(create_feedback))
        .route("/feedback/{id}", put(update_feedback).delete(delete_feedback))
        .route("/settings/deepseek-api-key", get(get_api_key).post(set_api_key))
        .route("/scripts/generate", post(generate_script))
        .route("/scripts/{id}", get(get_script))
        .route("/scripts/{id}/regenerate", post(regenerate_script))
        .route("/scripts/{id}/export-pdf", get(export_pdf))
        .route("/analysis/analyze", post(analyze_video))
        .route("/tasks/{task_id}", get(task_status))
        .route("/slow", get(slow))
        .with_state(db);
    Router::new().nest(API_PREFIX, api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- live rooms ---

async fn list_rooms(State(db): State<Db>, Query(filter): Query<CategoryFilter>) -> Json<Value> {
    let store = db.read().await;
    let items: Vec<&LiveRoom> = store
        .rooms
        .values()
        .filter(|r| filter.category.as_ref().map_or(true, |c| &r.category == c))
        .collect();
    Json(json!({ "items": items }))
}

async fn create_room(State(db): State<Db>, Json(input): Json<CreateLiveRoom>) -> Json<Value> {
    let room = LiveRoom {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        category: input.category,
        keywords: input.keywords,
        ip_character: input.ip_character,
        style: input.style,
        created_at: now(),
    };
    let body = json!({
        "id": room.id,
        "message": "live room created",
        "room": {"id": room.id, "name": room.name, "category": room.category}
    });
    db.write().await.rooms.insert(room.id.clone(), room);
    Json(body)
}

async fn get_room(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<LiveRoom>> {
    let store = db.read().await;
    store
        .rooms
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "live room not found"))
}

async fn update_room(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UpdateLiveRoom>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let room = store
        .rooms
        .get_mut(&id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "live room not found"))?;
    if let Some(name) = input.name {
        room.name = name;
    }
    if let Some(category) = input.category {
        room.category = category;
    }
    if input.keywords.is_some() {
        room.keywords = input.keywords;
    }
    if input.ip_character.is_some() {
        room.ip_character = input.ip_character;
    }
    if input.style.is_some() {
        room.style = input.style;
    }
    Ok(Json(json!({"id": id, "message": "live room updated"})))
}

async fn delete_room(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    store
        .rooms
        .remove(&id)
        .map(|_| Json(json!({"id": id, "message": "live room deleted"})))
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "live room not found"))
}

// --- feedback ---

async fn list_feedback(State(db): State<Db>, Query(filter): Query<FeedbackFilter>) -> Json<Value> {
    let store = db.read().await;
    let mut matching: Vec<&Feedback> = store
        .feedback
        .values()
        .filter(|f| filter.status.is_none() || f.status == filter.status)
        .filter(|f| filter.feedback_type.is_none() || f.feedback_type == filter.feedback_type)
        .collect();
    matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    let limit = filter.limit.unwrap_or(20);
    let offset = filter.offset.unwrap_or(0);
    let items: Vec<&Feedback> = matching.iter().skip(offset).take(limit).copied().collect();
    Json(json!({"total": matching.len(), "items": items, "limit": limit, "offset": offset}))
}

async fn create_feedback(State(db): State<Db>, Json(input): Json<CreateFeedback>) -> Json<Value> {
    let stamp = now();
    let feedback = Feedback {
        id: Uuid::new_v4().to_string(),
        user_name: input.user_name,
        content: input.content,
        feedback_type: Some(input.feedback_type.unwrap_or_else(|| "general".to_string())),
        tags: Some(input.tags.unwrap_or_default()),
        status: Some("new".to_string()),
        response: None,
        created_at: stamp.clone(),
        updated_at: stamp,
    };
    let body = json!({"id": feedback.id, "message": "feedback submitted", "feedback": feedback});
    db.write().await.feedback.insert(feedback.id.clone(), feedback);
    Json(body)
}

async fn update_feedback(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UpdateFeedback>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let feedback = store
        .feedback
        .get_mut(&id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "feedback not found"))?;
    if input.status.is_some() {
        feedback.status = input.status;
    }
    if input.response.is_some() {
        feedback.response = input.response;
    }
    feedback.updated_at = now();
    Ok(Json(json!({"id": id, "message": "feedback updated", "feedback": feedback})))
}

async fn delete_feedback(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    store
        .feedback
        .remove(&id)
        .map(|_| Json(json!({"id": id, "message": "feedback deleted"})))
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "feedback not found"))
}

// --- settings ---

async fn get_api_key(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    match &store.deepseek_key {
        Some(key) => {
            let masked = if key.is_ascii() && key.len() > 8 {
                format!("{}****{}", &key[..4], &key[key.len() - 4..])
            } else {
                "****".to_string()
            };
            Json(json!({"configured": true, "masked_key": masked}))
        }
        None => Json(json!({"configured": false})),
    }
}

async fn set_api_key(State(db): State<Db>, Json(input): Json<ApiKey>) -> ApiResult<Json<Value>> {
    let key = input.api_key.trim();
    if key.is_empty() {
        return Err(detail(StatusCode::BAD_REQUEST, "API key must not be empty"));
    }
    db.write().await.deepseek_key = Some(key.to_string());
    Ok(Json(json!({"status": "success", "message": "API key saved"})))
}

// --- scripts ---

async fn generate_script(State(db): State<Db>, Json(input): Json<GenerateScript>) -> ApiResult<Json<Value>> {
    let duration = input.duration.unwrap_or(10);
    if !(5..=15).contains(&duration) {
        return Err(detail(StatusCode::BAD_REQUEST, "duration must be between 5 and 15 seconds"));
    }
    let count = input.script_count.unwrap_or(5);
    if count < 5 {
        return Err(detail(StatusCode::BAD_REQUEST, "script_count must be at least 5"));
    }
    if count > 10 {
        return Err(detail(StatusCode::BAD_REQUEST, "script_count must be at most 10"));
    }

    let mut store = db.write().await;
    let outcome = if input.hotspot_id == "fail" {
        Outcome::Failure("hotspot not found".to_string())
    } else {
        let ids = create_scripts(&mut store, &input.hotspot_id, &input.product_id, count);
        Outcome::Success(json!({"script_ids": ids, "count": count}))
    };
    let task_id = register_task(&mut store, u64::from(count), outcome);
    Ok(Json(json!({
        "status": "success",
        "task_id": task_id,
        "message": format!("generating {count} scripts")
    })))
}

fn create_scripts(store: &mut Store, hotspot_id: &str, product_id: &str, count: u32) -> Vec<String> {
    (0..count)
        .map(|n| {
            let script = Script {
                id: Uuid::new_v4().to_string(),
                hotspot_id: Some(hotspot_id.to_string()),
                product_id: product_id.to_string(),
                script_content: Some(format!("Draft {} for {product_id}", n + 1)),
                status: Some("draft".to_string()),
                created_at: now(),
            };
            let id = script.id.clone();
            store.scripts.insert(id.clone(), script);
            id
        })
        .collect()
}

async fn get_script(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Script>> {
    let store = db.read().await;
    store
        .scripts
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "script not found"))
}

async fn regenerate_script(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<Regenerate>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let (hotspot_id, product_id) = {
        let script = store
            .scripts
            .get(&id)
            .ok_or_else(|| detail(StatusCode::NOT_FOUND, "script not found"))?;
        (script.hotspot_id.clone().unwrap_or_default(), script.product_id.clone())
    };
    if input.adjustment_feedback.trim().is_empty() {
        return Err(detail(StatusCode::BAD_REQUEST, "adjustment_feedback must not be empty"));
    }
    let ids = create_scripts(&mut store, &hotspot_id, &product_id, 1);
    let task_id = register_task(&mut store, 1, Outcome::Success(json!({"script_ids": ids, "count": 1})));
    Ok(Json(json!({"status": "success", "task_id": task_id, "message": "regenerating script"})))
}

async fn export_pdf(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Response> {
    let store = db.read().await;
    let script = store
        .scripts
        .get(&id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "script not found"))?;
    let body = format!(
        "%PDF-1.4\n% {}\n{}\n%%EOF\n",
        script.id,
        script.script_content.as_deref().unwrap_or_default()
    );
    let disposition = format!("attachment; filename=script_{}.pdf", script.id);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body.into_bytes(),
    )
        .into_response())
}

// --- analysis ---

async fn analyze_video(State(db): State<Db>, Json(input): Json<Analyze>) -> ApiResult<Json<Value>> {
    if input.video_url.trim().is_empty() {
        return Err(detail(StatusCode::BAD_REQUEST, "video_url must not be empty"));
    }
    let report = json!({"id": Uuid::new_v4().to_string(), "video_url": input.video_url});
    let task_id = register_task(&mut *db.write().await, 3, Outcome::Success(report));
    Ok(Json(json!({
        "status": "success",
        "task_id": task_id,
        "video_url": input.video_url,
        "message": "analysis started"
    })))
}

// --- tasks ---

fn register_task(store: &mut Store, total: u64, outcome: Outcome) -> String {
    let task_id = Uuid::new_v4().to_string();
    store.tasks.insert(
        task_id.clone(),
        MockTask {
            total,
            reads: 0,
            outcome,
        },
    );
    info!(%task_id, total, "task registered");
    task_id
}

async fn task_status(State(db): State<Db>, Path(task_id): Path<String>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let task = store
        .tasks
        .get_mut(&task_id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "task not found"))?;
    Ok(Json(task.next_status(&task_id)))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(SLOW_RESPONSE).await;
    Json(json!({"slow": true}))
}
