//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port and drives the real
//! reqwest transport through `ApiClient`, so prefixing, query encoding,
//! unwrapping and error normalization are all exercised over HTTP.

use std::time::Duration;

use studio_core::types::{FeedbackPatch, FeedbackQuery, GenerateScript, LiveRoomPatch, NewFeedback, NewLiveRoom};
use studio_core::{wait_for_task, ApiClient, ClientConfig, HttpRequest, PollPolicy, TaskState, FALLBACK_MESSAGE};

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}")
}

async fn client() -> ApiClient {
    let base = start_server().await;
    ApiClient::new(ClientConfig::new(&base)).unwrap()
}

fn quick_polls() -> PollPolicy {
    PollPolicy::default()
        .with_interval(Duration::from_millis(5))
        .with_max_wait(Some(Duration::from_secs(10)))
}

fn generate(hotspot_id: &str) -> GenerateScript {
    GenerateScript {
        hotspot_id: hotspot_id.to_string(),
        product_id: "p-1".to_string(),
        analysis_report_id: None,
        duration: Some(10),
        adjustment_feedback: None,
        script_count: Some(5),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn generation_job_runs_to_success() {
    let client = client().await;

    // Step 1: submit.
    let submitted = client.scripts().generate(&generate("h-1")).await.unwrap();

    // Step 2: poll until terminal, recording every snapshot.
    let mut seen = Vec::new();
    let done = wait_for_task(&client.tasks(), &submitted.task_id, &quick_polls(), |h| {
        seen.push(h.state());
        if let Some(p) = h.progress() {
            assert!(p.current <= p.total);
        }
    })
    .await
    .unwrap();

    assert_eq!(done.state(), TaskState::Success);
    assert!(done.error().is_none());
    assert_eq!(seen.first(), Some(&TaskState::Pending));
    assert_eq!(seen.last(), Some(&TaskState::Success));
    assert_eq!(seen.iter().filter(|s| s.is_terminal()).count(), 1);
    assert_eq!(seen.len(), 7);

    // Step 3: a terminal task stays terminal.
    let again = client.tasks().get_status(&submitted.task_id).await.unwrap();
    assert_eq!(again.state(), TaskState::Success);
    assert_eq!(again.result(), done.result());

    // Step 4: the result points at real scripts, exportable as PDF.
    let script_id = done.result().unwrap()["script_ids"][0].as_str().unwrap().to_string();
    let script = client.scripts().get(&script_id).await.unwrap();
    assert_eq!(script.product_id, "p-1");

    let pdf = client.scripts().export_pdf(&script_id).await.unwrap();
    assert_eq!(pdf.status, 200);
    assert_eq!(pdf.content_type(), Some("application/pdf"));
    assert_eq!(pdf.filename(), Some(format!("script_{script_id}.pdf")));
    assert!(pdf.body.starts_with(b"%PDF-1.4"));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_job_is_a_handle_not_an_error() {
    let client = client().await;
    let submitted = client.scripts().generate(&generate("fail")).await.unwrap();

    let done = wait_for_task(&client.tasks(), &submitted.task_id, &quick_polls(), |_| {})
        .await
        .unwrap();
    assert_eq!(done.state(), TaskState::Failure);
    assert_eq!(done.error(), Some("hotspot not found"));
    assert!(done.result().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn server_detail_becomes_the_error_message() {
    let client = client().await;

    let mut bad = generate("h-1");
    bad.script_count = Some(3);
    let err = client.scripts().generate(&bad).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.message(), "script_count must be at least 5");

    let err = client.tasks().get_status("t-does-not-exist").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.message(), "task not found");
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_route_without_detail_uses_status_message() {
    let client = client().await;
    let err = client.request(HttpRequest::get("/no-such-route")).await.unwrap_err();
    assert_eq!(err.message(), "Request failed with status code 404");
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_response_times_out() {
    let base = start_server().await;
    let client = ApiClient::new(ClientConfig::new(&base).with_timeout(Duration::from_millis(200))).unwrap();

    let err = client.request(HttpRequest::get("/slow")).await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.message(), "timeout of 200ms exceeded");
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_reports_transport_message() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(ClientConfig::new(&format!("http://{addr}"))).unwrap();
    let err = client.live_rooms().list(None).await.unwrap_err();
    assert_eq!(err.status(), None);
    assert!(!err.message().is_empty());
    assert_ne!(err.message(), FALLBACK_MESSAGE);
}

#[tokio::test(flavor = "multi_thread")]
async fn live_room_lifecycle() {
    let client = client().await;
    let rooms = client.live_rooms();

    // Step 1: empty list.
    assert!(rooms.list(None).await.unwrap().items.is_empty());

    // Step 2: create.
    let created = rooms
        .create(&NewLiveRoom {
            name: "Evening beauty".into(),
            category: "beauty".into(),
            keywords: Some(vec!["serum".into()]),
            ip_character: None,
            style: None,
        })
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    // Step 3: filter by category.
    assert_eq!(rooms.list(Some("beauty")).await.unwrap().items.len(), 1);
    assert!(rooms.list(Some("food")).await.unwrap().items.is_empty());

    // Step 4: partial update.
    rooms
        .update(
            &id,
            &LiveRoomPatch {
                style: Some("calm".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let fetched = rooms.get(&id).await.unwrap();
    assert_eq!(fetched.name, "Evening beauty");
    assert_eq!(fetched.style.as_deref(), Some("calm"));

    // Step 5: delete, then it is gone.
    rooms.delete(&id).await.unwrap();
    let err = rooms.get(&id).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.message(), "live room not found");
}

#[tokio::test(flavor = "multi_thread")]
async fn feedback_and_settings_flow() {
    let client = client().await;

    let created = client
        .feedback()
        .create(&NewFeedback {
            user_name: None,
            content: "Export to Word please".into(),
            feedback_type: Some("feature".into()),
            tags: None,
        })
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    client
        .feedback()
        .update(
            &id,
            &FeedbackPatch {
                status: Some("resolved".into()),
                response: None,
            },
        )
        .await
        .unwrap();

    let resolved = client
        .feedback()
        .list(&FeedbackQuery {
            status: Some("resolved".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(resolved.total, 1);
    assert_eq!(resolved.items[0].content, "Export to Word please");

    let status = client.settings().deepseek_api_key().await.unwrap();
    assert!(!status.configured);
    client.settings().set_deepseek_api_key("sk-1234567890abcd").await.unwrap();
    let status = client.settings().deepseek_api_key().await.unwrap();
    assert!(status.configured);
    assert_eq!(status.masked_key.as_deref(), Some("sk-1****abcd"));
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_submissions_do_not_mix() {
    let client = client().await;

    let (analysis_a, analysis_b) = (client.analysis(), client.analysis());
    let (a, b) = tokio::join!(
        analysis_a.analyze("https://video.example/a", None),
        analysis_b.analyze("https://video.example/b", None),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.task_id, b.task_id);

    let tracker = client.tasks();
    let (polls_a, polls_b) = (quick_polls(), quick_polls());
    let (done_a, done_b) = tokio::join!(
        wait_for_task(&tracker, &a.task_id, &polls_a, |_| {}),
        wait_for_task(&tracker, &b.task_id, &polls_b, |_| {}),
    );
    let (done_a, done_b) = (done_a.unwrap(), done_b.unwrap());
    assert_eq!(done_a.task_id, a.task_id);
    assert_eq!(done_b.task_id, b.task_id);
    assert_eq!(done_a.result().unwrap()["video_url"], "https://video.example/a");
    assert_eq!(done_b.result().unwrap()["video_url"], "https://video.example/b");
}
