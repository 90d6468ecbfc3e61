//! Comment proxy endpoint: `GET /api/customhost/live_comments`, forwarded to `CUSTOM_ENDPOINT`.

use std::time::Instant;

use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

pub const LIVE_COMMENTS_PATH: &str = "/api/customhost/live_comments";

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("CUSTOM_ENDPOINT is not set")]
    EndpointNotSet,

    #[error("Failed to fetch from endpoint")]
    Upstream(anyhow::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        if let ProxyError::Upstream(ref source) = self {
            error!(error = %format!("{source:#}"), "comment proxy upstream failure");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[derive(Clone)]
pub struct ProxyState {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl ProxyState {
    pub fn new(endpoint: Option<String>) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    pub fn with_client(endpoint: Option<String>, client: reqwest::Client) -> Self {
        Self { endpoint, client }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LiveCommentsQuery {
    pub live_id: Option<String>,
    #[serde(rename = "pageToken")]
    pub page_token: Option<String>,
}

pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route(LIVE_COMMENTS_PATH, get(live_comments))
        .layer(middleware::from_fn(request_log_middleware))
        .with_state(state)
}

async fn live_comments(
    State(state): State<ProxyState>,
    Query(query): Query<LiveCommentsQuery>,
) -> Result<Response, ProxyError> {
    let endpoint = state.endpoint.as_deref().ok_or(ProxyError::EndpointNotSet)?;
    let (status, body) = forward(&state.client, endpoint, &query)
        .await
        .map_err(ProxyError::Upstream)?;

    let mut response = (status, body).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(JSON_CONTENT_TYPE),
    );
    Ok(response)
}

async fn forward(
    client: &reqwest::Client,
    endpoint: &str,
    query: &LiveCommentsQuery,
) -> anyhow::Result<(StatusCode, String)> {
    let mut url = reqwest::Url::parse(endpoint)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("live_id", query.live_id.as_deref().unwrap_or_default());
        if let Some(token) = query.page_token.as_deref().filter(|t| !t.is_empty()) {
            pairs.append_pair("pageToken", token);
        }
    }

    let response = client
        .get(url)
        .header(header::ACCEPT, "application/json")
        .send()
        .await?;
    let status = response.status();
    let body = response.text().await?;
    Ok((status, body))
}

async fn request_log_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started_at = Instant::now();

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started_at.elapsed().as_millis(),
        "request completed"
    );
    response
}
