//! API handlers and routing for Bookshelf REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use std::convert::Infallible;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::CONTENT_TYPE, request::Parts, Method, StatusCode},
    routing::get,
    Router,
};
use serde_json::{Map, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Books
        .route(
            "/",
            get(books::list_books)
                .post(books::create_book)
                .fallback(method_not_allowed),
        )
        .route(
            "/:id/",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book)
                .fallback(method_not_allowed),
        )
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(openapi::create_openapi_router())
        .fallback(unknown_route)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method)
}

async fn unknown_route() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Book id taken from the path. Only plain digit strings name a book;
/// anything else is answered as an unknown resource.
pub struct BookId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for BookId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::NotFound(e.body_text()))?;

        parse_book_id(&raw)
            .map(BookId)
            .ok_or_else(|| AppError::NotFound(format!("No book route for id {:?}", raw)))
    }
}

fn parse_book_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Request body for book writes.
///
/// Parsing problems are kept rather than rejected so the item handlers can
/// answer an unknown id with 404 before looking at the body.
pub struct BookPayload(AppResult<Value>);

impl BookPayload {
    pub fn json(value: Value) -> Self {
        Self(Ok(value))
    }

    pub fn into_json(self) -> AppResult<Value> {
        self.0
    }
}

#[async_trait]
impl<S> FromRequest<S> for BookPayload
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let parsed = match Bytes::from_request(req, state).await {
            Ok(body) => parse_body(content_type.as_deref(), &body),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        };
        Ok(Self(parsed))
    }
}

fn parse_body(content_type: Option<&str>, body: &[u8]) -> AppResult<Value> {
    // An absent body reads as an empty object, which then fails field validation
    if body.is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    let content_type = content_type.unwrap_or_default();
    if !is_json_content_type(content_type) {
        return Err(AppError::UnsupportedMediaType(content_type.to_string()));
    }

    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("JSON parse error - {}", e)))
}

fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
