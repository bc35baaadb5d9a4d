//! Shared test infrastructure.
//!
//! - `users()` - fixed admin user rows for list tests
//! - `MockSource` - scripted notification backend with per-call gates
//! - `spawn_backend()` - actix-web stand-in for the REST API on an ephemeral port
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::{mpsc, oneshot};

use lessonhub_admin::auth::{AuthContext, MemoryTokenStore};
use lessonhub_admin::errors::ApiError;
use lessonhub_admin::models::AdminUser;
use lessonhub_admin::notifications::{Notification, NotificationSnapshot, NotificationSource};
use lessonhub_admin::ApiClient;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const TOKEN_KEY: &str = "token";
pub const TEST_TOKEN: &str = "test-admin-token";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn users() -> Vec<AdminUser> {
    serde_json::from_value(json!([
        {"user_id": 1, "name": "Alice", "email": "alice@studio.test", "role": "student", "is_active": true, "created_at": "2026-01-05 09:00:00"},
        {"user_id": 2, "name": "Bob", "email": "bob@studio.test", "role": "admin", "is_active": true, "created_at": "2026-01-02 09:00:00"},
        {"user_id": 3, "name": "alice2", "email": "a2@studio.test", "role": "student", "is_active": false, "created_at": "2026-01-09 09:00:00"},
        {"user_id": 4, "name": "Carmen", "email": "carmen@studio.test", "role": "instructor", "is_active": true, "created_at": "2026-01-02 09:00:00"},
        {"user_id": 5, "name": "Dmitri", "email": "dmitri@studio.test", "role": "student", "is_active": true, "created_at": "2026-02-11 09:00:00"},
        {"user_id": 6, "name": "Elif", "email": "elif@studio.test", "role": "student", "is_active": false, "created_at": "2026-01-02 09:00:00"},
        {"user_id": 7, "name": "Farah", "email": "farah@studio.test", "role": "instructor", "is_active": true, "created_at": "2026-03-20 09:00:00"}
    ]))
    .expect("fixture users")
}

pub fn notification(id: i64, is_read: bool, created_at: &str) -> Notification {
    serde_json::from_value(json!({
        "id": id,
        "notification_id": format!("ntf_{id}"),
        "type": "system",
        "title": format!("Notification {id}"),
        "message": "",
        "created_at": created_at,
        "is_read": is_read,
    }))
    .expect("fixture notification")
}

pub fn snapshot(notes: Vec<Notification>) -> NotificationSnapshot {
    NotificationSnapshot { notifications: notes, unread_count: None }
}

// ============================================================================
// SCRIPTED NOTIFICATION SOURCE
// ============================================================================

struct Step {
    gate: Option<oneshot::Receiver<()>>,
    result: Result<NotificationSnapshot, u16>,
}

/// Fetches consume scripted steps in call order, falling back to
/// `default` once the script runs out. Each fetch announces its call number
/// on the channel returned by `new` before waiting on its gate.
pub struct MockSource {
    script: Mutex<VecDeque<Step>>,
    default: Mutex<NotificationSnapshot>,
    started: mpsc::UnboundedSender<usize>,
    fetch_calls: AtomicUsize,
    marked: Mutex<Vec<i64>>,
    mark_all_calls: AtomicUsize,
    fail_marks: AtomicBool,
    mark_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl MockSource {
    pub fn new(default: NotificationSnapshot) -> (Arc<Self>, mpsc::UnboundedReceiver<usize>) {
        let (started, rx) = mpsc::unbounded_channel();
        let source = MockSource {
            script: Mutex::new(VecDeque::new()),
            default: Mutex::new(default),
            started,
            fetch_calls: AtomicUsize::new(0),
            marked: Mutex::new(Vec::new()),
            mark_all_calls: AtomicUsize::new(0),
            fail_marks: AtomicBool::new(false),
            mark_gate: Mutex::new(None),
        };
        (Arc::new(source), rx)
    }

    /// Queue a fetch that resolves only when the returned sender fires.
    pub fn push_gated(&self, result: Result<NotificationSnapshot, u16>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().push_back(Step { gate: Some(rx), result });
        tx
    }

    /// Queue a fetch that resolves immediately.
    pub fn push(&self, result: Result<NotificationSnapshot, u16>) {
        self.script.lock().unwrap().push_back(Step { gate: None, result });
    }

    pub fn set_default(&self, snapshot: NotificationSnapshot) {
        *self.default.lock().unwrap() = snapshot;
    }

    pub fn fail_marks(&self, fail: bool) {
        self.fail_marks.store(fail, Ordering::SeqCst);
    }

    /// Hold the next mark-read call until the returned sender fires.
    pub fn gate_marks(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.mark_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn marked(&self) -> Vec<i64> {
        self.marked.lock().unwrap().clone()
    }

    pub fn mark_all_calls(&self) -> usize {
        self.mark_all_calls.load(Ordering::SeqCst)
    }

    async fn mark_outcome(&self) -> Result<(), ApiError> {
        let gate = self.mark_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.fail_marks.load(Ordering::SeqCst) {
            Err(ApiError::Status(503))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NotificationSource for MockSource {
    async fn fetch(&self) -> Result<NotificationSnapshot, ApiError> {
        let call = self.fetch_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let step = self.script.lock().unwrap().pop_front();
        let _ = self.started.send(call);
        let (gate, result) = match step {
            Some(step) => (step.gate, step.result),
            None => (None, Ok(self.default.lock().unwrap().clone())),
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result.map_err(ApiError::Status)
    }

    async fn mark_read(&self, id: i64) -> Result<(), ApiError> {
        self.marked.lock().unwrap().push(id);
        self.mark_outcome().await
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.mark_all_calls.fetch_add(1, Ordering::SeqCst);
        self.mark_outcome().await
    }
}

// ============================================================================
// MOCK REST BACKEND
// ============================================================================

#[derive(Debug, Default)]
pub struct BackendState {
    pub requests: usize,
    pub notifications: Vec<Value>,
    pub read_ids: Vec<i64>,
    pub read_all_calls: usize,
    pub status_updates: Vec<(i64, bool)>,
    pub deleted: Vec<i64>,
    pub last_query: Vec<(String, String)>,
}

pub type SharedState = web::Data<Mutex<BackendState>>;

pub struct MockBackend {
    pub base_url: String,
    pub state: SharedState,
}

impl MockBackend {
    pub fn client(&self) -> ApiClient {
        let store = Arc::new(MemoryTokenStore::with_token(TOKEN_KEY, TEST_TOKEN));
        self.client_with(AuthContext::new(store, TOKEN_KEY))
    }

    pub fn client_with(&self, auth: AuthContext) -> ApiClient {
        ApiClient::new(&self.base_url, auth, Duration::from_secs(5)).expect("client")
    }

    pub fn requests(&self) -> usize {
        self.state.lock().unwrap().requests
    }
}

fn authorized(req: &HttpRequest, state: &SharedState) -> bool {
    state.lock().unwrap().requests += 1;
    req.headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TEST_TOKEN}"))
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({"success": false, "message": "Unauthorized"}))
}

async fn list_users(req: HttpRequest, state: SharedState) -> HttpResponse {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    let users = serde_json::to_value(users()).unwrap();
    // "roles" sorts ahead of "users"; clients must pick the list by name.
    HttpResponse::Ok().json(json!({
        "success": true,
        "data": {"roles": ["student", "instructor", "admin"], "users": users}
    }))
}

async fn list_payments(
    req: HttpRequest,
    state: SharedState,
    query: web::Query<Vec<(String, String)>>,
) -> HttpResponse {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    let query = query.into_inner();
    let get = |k: &str| query.iter().find(|(key, _)| key == k).map(|(_, v)| v.clone());
    let page: usize = get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: usize = get("limit").and_then(|p| p.parse().ok()).unwrap_or(10);
    state.lock().unwrap().last_query = query.clone();
    HttpResponse::Ok().json(json!({
        "success": true,
        "data": [
            {"payment_id": 31, "user_name": "Alice", "amount": 49.0, "status": "completed", "created_at": "2026-10-01T10:00:00Z"},
            {"payment_id": 32, "user_name": "Bob", "amount": 19.0, "status": "completed", "created_at": "2026-10-02T10:00:00Z"}
        ],
        "pagination": {"page": page, "limit": limit, "total": 12, "pages": 12usize.div_ceil(limit)}
    }))
}

async fn set_user_status(
    req: HttpRequest,
    state: SharedState,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> HttpResponse {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    let active = body.get("is_active").and_then(Value::as_bool).unwrap_or(false);
    state.lock().unwrap().status_updates.push((path.into_inner(), active));
    HttpResponse::Ok().json(json!({"success": true, "message": "updated"}))
}

async fn delete_user(req: HttpRequest, state: SharedState, path: web::Path<i64>) -> HttpResponse {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    state.lock().unwrap().deleted.push(path.into_inner());
    HttpResponse::Ok().json(json!({"success": true}))
}

async fn instructors_down(req: HttpRequest, state: SharedState) -> HttpResponse {
    authorized(&req, &state);
    HttpResponse::InternalServerError().body("boom")
}

async fn modules_rejected(req: HttpRequest, state: SharedState) -> HttpResponse {
    authorized(&req, &state);
    HttpResponse::Ok().json(json!({"success": false, "message": "maintenance"}))
}

async fn activity_logs_garbled(req: HttpRequest, state: SharedState) -> HttpResponse {
    authorized(&req, &state);
    HttpResponse::Ok().content_type("application/json").body("<html>oops</html>")
}

async fn dashboard_stats(req: HttpRequest, state: SharedState) -> HttpResponse {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    HttpResponse::Ok().json(json!({
        "success": true,
        "data": {"total_users": 7, "total_instructors": 2, "total_revenue": 1250.5}
    }))
}

async fn admin_notifications(req: HttpRequest, state: SharedState) -> HttpResponse {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    let guard = state.lock().unwrap();
    let unread = guard
        .notifications
        .iter()
        .filter(|n| !n.get("is_read").and_then(Value::as_bool).unwrap_or(false))
        .count();
    HttpResponse::Ok().json(json!({
        "success": true,
        "data": {"notifications": guard.notifications, "unreadCount": unread}
    }))
}

async fn mark_notification_read(req: HttpRequest, state: SharedState, path: web::Path<i64>) -> HttpResponse {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    let id = path.into_inner();
    let mut guard = state.lock().unwrap();
    guard.read_ids.push(id);
    for n in guard.notifications.iter_mut() {
        if n.get("id").and_then(Value::as_i64) == Some(id) {
            n["is_read"] = json!(true);
        }
    }
    HttpResponse::Ok().json(json!({"success": true}))
}

async fn mark_all_notifications_read(req: HttpRequest, state: SharedState) -> HttpResponse {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    let mut guard = state.lock().unwrap();
    guard.read_all_calls += 1;
    for n in guard.notifications.iter_mut() {
        n["is_read"] = json!(true);
    }
    HttpResponse::Ok().json(json!({"success": true}))
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/admin/users", web::get().to(list_users))
        .route("/api/admin/users/{id}/status", web::put().to(set_user_status))
        .route("/api/admin/users/{id}", web::delete().to(delete_user))
        .route("/api/admin/payments", web::get().to(list_payments))
        .route("/api/admin/instructors", web::get().to(instructors_down))
        .route("/api/admin/modules", web::get().to(modules_rejected))
        .route("/api/admin/activity-logs", web::get().to(activity_logs_garbled))
        .route("/api/admin/dashboard/stats", web::get().to(dashboard_stats))
        // read-all BEFORE {id}/read to avoid routing conflict
        .route("/api/notifications/read-all", web::put().to(mark_all_notifications_read))
        .route("/api/notifications/{id}/read", web::put().to(mark_notification_read))
        .route("/api/notifications/admin/system", web::get().to(admin_notifications));
}

/// Start the stand-in backend. Must run inside an actix runtime
/// (`#[actix_web::test]`).
pub fn spawn_backend(notifications: Vec<Value>) -> MockBackend {
    init_logging();
    let state: SharedState = web::Data::new(Mutex::new(BackendState {
        notifications,
        ..Default::default()
    }));
    let app_state = state.clone();
    let server = HttpServer::new(move || App::new().app_data(app_state.clone()).configure(routes))
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind mock backend");
    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());
    MockBackend { base_url: format!("http://{addr}"), state }
}
