use axum::Router;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use campus_data::Catalog;
use campus_model::MockLlm;
use campus_server::{AppState, build_router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app(model: &Arc<MockLlm>) -> Router {
    let state = AppState::new(model.clone(), Arc::new(Catalog::builtin()), None, 5).unwrap();
    build_router(state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(&Arc::new(MockLlm::new())), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_invoke_flow() {
    let model = Arc::new(MockLlm::new().then_text("Try the Pomodoro technique."));
    let (status, body) =
        send(app(&model), post("/api/flows/wellnessCoach", json!({"query": "How do I focus?"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "Try the Pomodoro technique."}));
}

#[tokio::test]
async fn test_invalid_input_is_400_with_violations() {
    let model = Arc::new(MockLlm::new());
    let (status, body) = send(app(&model), post("/api/flows/aiTutor", json!({"query": "hi"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidInput");
    assert_eq!(body["violations"][0]["path"], "subject");
    assert_eq!(body["violations"][0]["constraint"]["kind"], "required");
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_non_json_body_is_400() {
    let request = Request::post("/api/flows/aiTutor")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(&Arc::new(MockLlm::new())), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidInput");
}

#[tokio::test]
async fn test_unknown_flow_is_404() {
    let (status, body) = send(app(&Arc::new(MockLlm::new())), post("/api/flows/horoscope", json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "UnknownFlow");
}

#[tokio::test]
async fn test_model_failure_is_502_with_generic_message() {
    let model = Arc::new(MockLlm::new().then_error("quota exceeded for key abc"));
    let (status, body) =
        send(app(&model), post("/api/flows/campusGuide", json!({"query": "Where is the gym?"}))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "ModelServiceError");
    assert!(!body["message"].as_str().unwrap().contains("abc"));
}

#[tokio::test]
async fn test_list_flows() {
    let (status, body) = send(app(&Arc::new(MockLlm::new())), get("/api/flows")).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body.as_array().unwrap().iter().map(|f| f["name"].as_str().unwrap()).collect();
    assert_eq!(names.len(), 7);
    assert!(names.contains(&"textToSpeech"));
    let tutor = body.as_array().unwrap().iter().find(|f| f["name"] == "aiTutor").unwrap();
    assert_eq!(tutor["inputSchema"]["required"], json!(["subject", "query"]));
}

#[tokio::test]
async fn test_reference_data_routes() {
    for uri in [
        "/api/announcements",
        "/api/events",
        "/api/locations",
        "/api/courses",
        "/api/students",
        "/api/groups",
        "/api/activities",
        "/api/subjects",
    ] {
        let (status, body) = send(app(&Arc::new(MockLlm::new())), get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(!body.as_array().unwrap().is_empty(), "{uri}");
    }

    let (_, locations) = send(app(&Arc::new(MockLlm::new())), get("/api/locations")).await;
    let tech = locations.as_array().unwrap().iter().find(|l| l["name"] == "Tech Building").unwrap();
    assert_eq!(tech["type"], "Academic");
}
