//! In-process fake of the shop backend.
//!
//! [`FakeBackend::start`] serves the REST API the storefront client talks to
//! on an ephemeral port, backed by in-memory state the tests can inspect and
//! tweak. Responses use the same mix of envelopes the real backend does.
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = FakeBackend::start().await;
//! let lamp = backend.add_item("Desk Lamp", 60.0, 5);
//! backend.add_user("Ada", "ada@example.com", "secret123", "user");
//! let mut ctx = backend.context(Storage::memory()).await;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use stockroom_storefront::AppContext;
use stockroom_storefront::config::ClientConfig;
use stockroom_storefront::storage::Storage;
use uuid::Uuid;

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub legacy_token: Option<String>,
    pub request_id: Option<String>,
    pub content_type: Option<String>,
}

impl RecordedRequest {
    /// Capture what the client sent. Borrows only `Sync` parts of the
    /// request, so nothing is held across the handler's await.
    fn from_parts(method: &Method, path: &str, headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        Self {
            method: method.clone(),
            path: path.to_owned(),
            bearer: header("authorization").and_then(|v| v.strip_prefix("Bearer ").map(String::from)),
            legacy_token: header("x-auth-token"),
            request_id: header("x-request-id"),
            content_type: header("content-type"),
        }
    }

    /// `"METHOD /path"`.
    #[must_use]
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[derive(Debug, Clone)]
struct FakeUser {
    id: String,
    name: String,
    email: String,
    password: String,
    role: String,
}

impl FakeUser {
    fn profile(&self) -> Value {
        json!({ "_id": self.id, "name": self.name, "email": self.email, "role": self.role })
    }
}

/// Mutable backend state.
#[derive(Debug, Default)]
pub struct BackendState {
    items: Vec<Value>,
    users: Vec<FakeUser>,
    tokens: HashMap<String, String>,
    refresh_tokens: HashMap<String, String>,
    carts: HashMap<String, Vec<(String, u32)>>,
    orders: Vec<Value>,
    requests: Vec<RecordedRequest>,
    fail_cart_clear: bool,
    fail_orders: Option<(u16, String)>,
    issue_refresh_tokens: bool,
}

type Shared = Arc<Mutex<BackendState>>;

fn lock(state: &Shared) -> MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A running fake backend.
pub struct FakeBackend {
    api_url: String,
    state: Shared,
    server: tokio::task::JoinHandle<()>,
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

impl FakeBackend {
    /// Bind to `127.0.0.1:0` and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    #[allow(clippy::expect_used)]
    pub async fn start() -> Self {
        let state = Shared::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend address");
        let app = router(state.clone());
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Fake backend stopped");
            }
        });
        Self {
            api_url: format!("http://{addr}/api"),
            state,
            server,
        }
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Client configuration pointing at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the backend URL does not parse, which cannot happen.
    #[allow(clippy::expect_used)]
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_url, "unused-state.json").expect("fake backend url")
    }

    /// Start an application context against this backend.
    ///
    /// # Panics
    ///
    /// Panics if the context cannot be built.
    #[allow(clippy::expect_used)]
    pub async fn context(&self, storage: Storage) -> AppContext {
        AppContext::start_with(self.config(), storage)
            .await
            .expect("start app context")
    }

    /// Add an inventory item and return its id.
    pub fn add_item(&self, name: &str, price: f64, quantity: u32) -> String {
        let id = new_id();
        lock(&self.state).items.push(json!({
            "_id": id,
            "name": name,
            "description": "",
            "price": price,
            "quantity": quantity,
            "category": "General",
            "imageUrl": [format!("/uploads/{id}.png")],
        }));
        id
    }

    /// Remove an item from inventory (cart lines pointing at it stay).
    pub fn remove_item(&self, id: &str) {
        lock(&self.state).items.retain(|item| item["_id"] != id);
    }

    /// Register an account directly and return its id.
    pub fn add_user(&self, name: &str, email: &str, password: &str, role: &str) -> String {
        let id = new_id();
        lock(&self.state).users.push(FakeUser {
            id: id.clone(),
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
            role: role.to_owned(),
        });
        id
    }

    /// Mint a valid access token for a user.
    pub fn issue_token(&self, user_id: &str) -> String {
        let token = format!("tok-{}", Uuid::new_v4().simple());
        lock(&self.state)
            .tokens
            .insert(token.clone(), user_id.to_owned());
        token
    }

    /// Invalidate every access token (refresh tokens stay valid).
    pub fn revoke_tokens(&self) {
        lock(&self.state).tokens.clear();
    }

    /// Hand out refresh tokens on login.
    pub fn issue_refresh_tokens(&self, enabled: bool) {
        lock(&self.state).issue_refresh_tokens = enabled;
    }

    /// Put lines straight into a user's server cart.
    pub fn set_cart(&self, user_id: &str, lines: &[(&str, u32)]) {
        lock(&self.state).carts.insert(
            user_id.to_owned(),
            lines.iter().map(|(id, qty)| ((*id).to_owned(), *qty)).collect(),
        );
    }

    /// A user's server cart as `(item_id, quantity)` pairs.
    #[must_use]
    pub fn cart_of(&self, user_id: &str) -> Vec<(String, u32)> {
        lock(&self.state)
            .carts
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Make `DELETE /cart` fail with a 500.
    pub fn fail_cart_clear(&self, fail: bool) {
        lock(&self.state).fail_cart_clear = fail;
    }

    /// Make `POST /orders` fail with this status and message.
    pub fn fail_orders(&self, failure: Option<(u16, &str)>) {
        lock(&self.state).fail_orders = failure.map(|(status, message)| (status, message.to_owned()));
    }

    /// Every order accepted so far, as stored.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        lock(&self.state).orders.clone()
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Request lines (`"METHOD /path"`) received so far.
    #[must_use]
    pub fn request_lines(&self) -> Vec<String> {
        self.requests().iter().map(RecordedRequest::line).collect()
    }

    /// Forget recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.state).requests.clear();
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

// =============================================================================
// Router
// =============================================================================

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/me", get(me))
        .route("/api/auth/refresh-token", post(refresh))
        .route("/api/items", get(list_items).post(create_item))
        .route(
            "/api/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/api/cart", get(get_cart).delete(clear_cart))
        .route("/api/cart/items", post(add_to_cart))
        .route(
            "/api/cart/items/{id}",
            put(update_cart_item).delete(remove_from_cart),
        )
        .route("/api/orders", get(all_orders).post(create_order))
        .route("/api/orders/myorders", get(my_orders))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/{id}/status", put(set_status))
        .route("/api/orders/{id}/pay", put(pay))
        .route("/api/orders/{id}/deliver", put(deliver))
        .route("/api/users", get(list_users))
        .route("/api/users/{id}", axum::routing::delete(delete_user))
        .route("/api/users/{id}/role", put(set_role))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let recorded = RecordedRequest::from_parts(request.method(), request.uri().path(), request.headers());
    lock(&state).requests.push(recorded);
    next.run(request).await
}

type Reply = Result<Response, Response>;

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn ok(body: Value) -> Reply {
    Ok(Json(body).into_response())
}

fn caller(state: &BackendState, headers: &HeaderMap) -> Result<FakeUser, Response> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Not authorized, no token"))?;
    let user_id = state
        .tokens
        .get(token)
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Not authorized, token failed"))?;
    state
        .users
        .iter()
        .find(|user| &user.id == user_id)
        .cloned()
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "User not found"))
}

fn admin(state: &BackendState, headers: &HeaderMap) -> Result<FakeUser, Response> {
    let user = caller(state, headers)?;
    if user.role == "admin" {
        Ok(user)
    } else {
        Err(fail(StatusCode::FORBIDDEN, "Not authorized as an admin"))
    }
}

fn find_item<'a>(state: &'a BackendState, id: &str) -> Option<&'a Value> {
    state.items.iter().find(|item| item["_id"] == id)
}

// =============================================================================
// Auth
// =============================================================================

fn session_reply(state: &mut BackendState, user: &FakeUser) -> Reply {
    let token = format!("tok-{}", Uuid::new_v4().simple());
    state.tokens.insert(token.clone(), user.id.clone());
    let mut body = json!({ "success": true, "token": token, "user": user.profile() });
    if state.issue_refresh_tokens {
        let refresh = format!("ref-{}", Uuid::new_v4().simple());
        state.refresh_tokens.insert(refresh.clone(), user.id.clone());
        body["refreshToken"] = json!(refresh);
    }
    ok(body)
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut state = lock(&state);
    let user = state
        .users
        .iter()
        .find(|user| body["email"] == user.email.as_str() && body["password"] == user.password.as_str())
        .cloned()
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Invalid email or password"))?;
    session_reply(&mut state, &user)
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut state = lock(&state);
    let email = body["email"].as_str().unwrap_or_default().to_owned();
    if state.users.iter().any(|user| user.email == email) {
        return Err(fail(StatusCode::BAD_REQUEST, "User already exists"));
    }
    let user = FakeUser {
        id: new_id(),
        name: body["name"].as_str().unwrap_or_default().to_owned(),
        email,
        password: body["password"].as_str().unwrap_or_default().to_owned(),
        role: "user".to_owned(),
    };
    state.users.push(user.clone());
    session_reply(&mut state, &user)
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let state = lock(&state);
    let user = caller(&state, &headers)?;
    ok(json!({ "success": true, "user": user.profile() }))
}

async fn refresh(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut state = lock(&state);
    let user_id = body["refreshToken"]
        .as_str()
        .and_then(|token| state.refresh_tokens.get(token))
        .cloned()
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Invalid refresh token"))?;
    let user = state
        .users
        .iter()
        .find(|user| user.id == user_id)
        .cloned()
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "User not found"))?;
    let token = format!("tok-{}", Uuid::new_v4().simple());
    state.tokens.insert(token.clone(), user.id.clone());
    ok(json!({ "token": token, "user": user.profile() }))
}

// =============================================================================
// Items
// =============================================================================

async fn list_items(State(state): State<Shared>) -> Reply {
    ok(json!({ "success": true, "data": lock(&state).items }))
}

async fn get_item(State(state): State<Shared>, Path(id): Path<String>) -> Reply {
    let state = lock(&state);
    let item = find_item(&state, &id).ok_or_else(|| fail(StatusCode::NOT_FOUND, "Item not found"))?;
    ok(json!({ "success": true, "data": item }))
}

/// Fields of a JSON or multipart item form.
async fn item_form(request: Request) -> Result<Value, Response> {
    let multipart = request
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));
    if !multipart {
        let Json(body) = Json::<Value>::from_request(request, &())
            .await
            .map_err(IntoResponse::into_response)?;
        return Ok(body);
    }

    let mut form = Multipart::from_request(request, &())
        .await
        .map_err(IntoResponse::into_response)?;
    let mut body = json!({});
    while let Some(field) = form
        .next_field()
        .await
        .map_err(IntoResponse::into_response)?
    {
        let name = field.name().unwrap_or_default().to_owned();
        if name == "image" {
            let file_name = field.file_name().unwrap_or("upload").to_owned();
            let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;
            body["imageUrl"] = json!([format!("/uploads/{file_name}")]);
            body["imageBytes"] = json!(bytes.len());
        } else {
            let text = field.text().await.map_err(IntoResponse::into_response)?;
            let value = match name.as_str() {
                "price" => text.parse::<f64>().map_or_else(|_| json!(text), |n| json!(n)),
                "quantity" => text.parse::<u64>().map_or_else(|_| json!(text), |n| json!(n)),
                _ => json!(text),
            };
            body[name.as_str()] = value;
        }
    }
    Ok(body)
}

async fn create_item(State(state): State<Shared>, headers: HeaderMap, request: Request) -> Reply {
    admin(&lock(&state), &headers)?;
    let mut item = item_form(request).await?;
    item["_id"] = json!(new_id());
    lock(&state).items.push(item.clone());
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": item }))).into_response())
}

async fn update_item(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    request: Request,
) -> Reply {
    admin(&lock(&state), &headers)?;
    let form = item_form(request).await?;
    let mut state = lock(&state);
    let item = state
        .items
        .iter_mut()
        .find(|item| item["_id"] == id.as_str())
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Item not found"))?;
    if let (Some(item), Some(form)) = (item.as_object_mut(), form.as_object()) {
        for (key, value) in form {
            item.insert(key.clone(), value.clone());
        }
    }
    ok(json!({ "success": true, "data": item }))
}

async fn delete_item(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    let mut state = lock(&state);
    admin(&state, &headers)?;
    let before = state.items.len();
    state.items.retain(|item| item["_id"] != id.as_str());
    if state.items.len() == before {
        return Err(fail(StatusCode::NOT_FOUND, "Item not found"));
    }
    ok(json!({ "success": true, "message": "Item removed" }))
}

// =============================================================================
// Cart
// =============================================================================

/// The caller's cart with populated items.
fn cart_reply(state: &BackendState, user_id: &str) -> Reply {
    let lines: Vec<Value> = state
        .carts
        .get(user_id)
        .map(|lines| {
            lines
                .iter()
                .map(|(item_id, quantity)| {
                    let item = find_item(state, item_id).cloned().unwrap_or_else(|| json!(item_id));
                    json!({ "_id": new_id(), "item": item, "quantity": quantity })
                })
                .collect()
        })
        .unwrap_or_default();
    ok(json!({ "success": true, "data": { "user": user_id, "items": lines } }))
}

async fn get_cart(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let state = lock(&state);
    let user = caller(&state, &headers)?;
    if !state.carts.contains_key(&user.id) {
        return Err(fail(StatusCode::NOT_FOUND, "Cart not found"));
    }
    cart_reply(&state, &user.id)
}

async fn add_to_cart(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let mut state = lock(&state);
    let user = caller(&state, &headers)?;
    let item_id = body["itemId"].as_str().unwrap_or_default().to_owned();
    let quantity = body["quantity"].as_u64().and_then(|q| u32::try_from(q).ok()).unwrap_or(1);
    let stock = find_item(&state, &item_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Item not found"))?["quantity"]
        .as_u64()
        .unwrap_or(0);

    let lines = state.carts.entry(user.id.clone()).or_default();
    let current = lines.iter().find(|(id, _)| *id == item_id).map_or(0, |(_, q)| *q);
    if u64::from(current + quantity) > stock {
        return Err(fail(StatusCode::BAD_REQUEST, "Not enough stock"));
    }
    match lines.iter_mut().find(|(id, _)| *id == item_id) {
        Some((_, q)) => *q += quantity,
        None => lines.push((item_id, quantity)),
    }
    cart_reply(&state, &user.id)
}

async fn update_cart_item(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut state = lock(&state);
    let user = caller(&state, &headers)?;
    let quantity = body["quantity"].as_u64().and_then(|q| u32::try_from(q).ok()).unwrap_or(0);
    let line = state
        .carts
        .get_mut(&user.id)
        .and_then(|lines| lines.iter_mut().find(|(item_id, _)| *item_id == id))
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Item not in cart"))?;
    line.1 = quantity;
    cart_reply(&state, &user.id)
}

async fn remove_from_cart(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    let mut state = lock(&state);
    let user = caller(&state, &headers)?;
    if let Some(lines) = state.carts.get_mut(&user.id) {
        lines.retain(|(item_id, _)| *item_id != id);
    }
    cart_reply(&state, &user.id)
}

async fn clear_cart(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = lock(&state);
    let user = caller(&state, &headers)?;
    if state.fail_cart_clear {
        return Err(fail(StatusCode::INTERNAL_SERVER_ERROR, "Cart service unavailable"));
    }
    state.carts.insert(user.id.clone(), Vec::new());
    cart_reply(&state, &user.id)
}

// =============================================================================
// Orders
// =============================================================================

async fn create_order(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let mut state = lock(&state);
    let user = caller(&state, &headers)?;
    if let Some((status, message)) = &state.fail_orders {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST);
        return Err(fail(status, message));
    }
    let mut order = body;
    order["_id"] = json!(new_id());
    order["orderNumber"] = json!(format!("SR-{:05}", state.orders.len() + 1));
    order["user"] = json!(user.id);
    order["createdAt"] = json!("2026-10-19T12:00:00Z");
    state.orders.push(order.clone());
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": order }))).into_response())
}

async fn my_orders(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let state = lock(&state);
    let user = caller(&state, &headers)?;
    let mine: Vec<&Value> = state.orders.iter().filter(|o| o["user"] == user.id.as_str()).collect();
    ok(json!({ "success": true, "data": mine }))
}

async fn all_orders(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let state = lock(&state);
    admin(&state, &headers)?;
    ok(json!({ "success": true, "orders": state.orders }))
}

async fn get_order(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    let state = lock(&state);
    let user = caller(&state, &headers)?;
    let order = state
        .orders
        .iter()
        .find(|o| o["_id"] == id.as_str())
        .filter(|o| user.role == "admin" || o["user"] == user.id.as_str())
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Order not found"))?;
    // Bare order, no envelope
    ok(order.clone())
}

fn update_order(
    state: &Shared,
    headers: &HeaderMap,
    id: &str,
    apply: impl FnOnce(&mut Value),
) -> Reply {
    let mut state = lock(state);
    admin(&state, headers)?;
    let order = state
        .orders
        .iter_mut()
        .find(|o| o["_id"] == id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Order not found"))?;
    apply(order);
    ok(json!({ "success": true, "order": order }))
}

async fn set_status(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    update_order(&state, &headers, &id, |order| {
        order["status"] = body["status"].clone();
        if let Some(reason) = body.get("reason") {
            order["statusReason"] = reason.clone();
        }
    })
}

async fn pay(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    update_order(&state, &headers, &id, |order| {
        order["isPaid"] = json!(true);
        order["paidAt"] = json!("2026-10-19T12:30:00Z");
    })
}

async fn deliver(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    update_order(&state, &headers, &id, |order| {
        order["isDelivered"] = json!(true);
        order["deliveredAt"] = json!("2026-10-20T09:00:00Z");
    })
}

// =============================================================================
// Users
// =============================================================================

async fn list_users(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let state = lock(&state);
    admin(&state, &headers)?;
    let users: Vec<Value> = state.users.iter().map(FakeUser::profile).collect();
    ok(json!(users))
}

async fn set_role(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut state = lock(&state);
    admin(&state, &headers)?;
    let user = state
        .users
        .iter_mut()
        .find(|user| user.id == id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "User not found"))?;
    user.role = body["role"].as_str().unwrap_or("user").to_owned();
    ok(json!({ "success": true, "data": user.profile() }))
}

async fn delete_user(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    let mut state = lock(&state);
    admin(&state, &headers)?;
    state.users.retain(|user| user.id != id);
    ok(json!({ "success": true, "message": "User removed" }))
}
