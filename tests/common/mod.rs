//! Local stand-in for the DRACIN backend that records every request

#![allow(dead_code)]

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use dracin_config::DracinConfig;
use dracin_scenarios::{LoadPlan, WaitRange};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Book ids the stub's trending and home listings carry
pub const TRENDING_BOOK_IDS: &[&str] = &["77000000001", "77000000002"];

/// Token the stub hands out on register and login
pub const STUB_TOKEN: &str = "stub-token";

/// Episodes the stub lists for every `allstreams` request
pub const STUB_EPISODES: usize = 2;

/// One request as the server saw it
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub user_agent: Option<String>,
    pub origin: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct StubState {
    hits: Arc<Mutex<Vec<Hit>>>,
    /// Paths answered with a fixed error status
    statuses: Arc<HashMap<String, StatusCode>>,
}

pub struct StubServer {
    addr: SocketAddr,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl StubServer {
    /// Serve on an ephemeral port; requests to `failing` paths get a 500
    pub async fn spawn(failing: &[&str]) -> Result<Self> {
        let statuses: Vec<_> = failing
            .iter()
            .map(|path| (*path, StatusCode::INTERNAL_SERVER_ERROR))
            .collect();
        Self::spawn_with_statuses(&statuses).await
    }

    /// Serve on an ephemeral port, answering each listed path with its status
    pub async fn spawn_with_statuses(statuses: &[(&str, StatusCode)]) -> Result<Self> {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            hits: Arc::clone(&hits),
            statuses: Arc::new(
                statuses
                    .iter()
                    .map(|(path, status)| (path.to_string(), *status))
                    .collect(),
            ),
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, hits })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hits_to(&self, path: &str) -> Vec<Hit> {
        self.hits()
            .into_iter()
            .filter(|hit| hit.path == path)
            .collect()
    }
}

async fn record(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let query = uri
        .query()
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();

    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    state.hits.lock().unwrap().push(Hit {
        method,
        path: path.clone(),
        query,
        user_agent: header_value(header::USER_AGENT),
        origin: header_value(header::ORIGIN),
        authorization: header_value(header::AUTHORIZATION),
        body: serde_json::from_slice(&body).ok(),
    });

    if let Some(status) = state.statuses.get(&path) {
        return (*status, "stub failure").into_response();
    }

    match path.as_str() {
        "/api/dramabox/trending" | "/api/reelshort/trending" => {
            let results: Vec<_> = TRENDING_BOOK_IDS
                .iter()
                .map(|id| json!({"bookId": id, "bookName": "Stub drama"}))
                .collect();
            Json(json!({"success": true, "data": {"results": results}})).into_response()
        }
        "/api/dramawave/home" => {
            let list: Vec<_> = TRENDING_BOOK_IDS
                .iter()
                .map(|id| json!({"id": id, "title": "Stub drama"}))
                .collect();
            Json(json!({"success": true, "data": {"list": list}})).into_response()
        }
        "/api/auth/register" | "/api/auth/login" => {
            Json(json!({"success": true, "data": {"token": STUB_TOKEN}})).into_response()
        }
        _ if path.ends_with("/allstreams") => {
            let episodes: Vec<_> = (1..=STUB_EPISODES).map(|n| json!({"episode": n})).collect();
            Json(json!({"success": true, "data": {"episodes": episodes}})).into_response()
        }
        _ => Json(json!({"success": true})).into_response(),
    }
}

/// Plan for `config` against `server`, with waits short enough for a test
pub fn fast_plan(config: &mut DracinConfig, server: &StubServer) -> Result<LoadPlan> {
    config.target.host = server.base_url();
    config.target.timeout = Duration::from_secs(5);

    let mut plan = LoadPlan::from_config(config)?;
    for archetype in &mut plan.archetypes {
        archetype.wait = WaitRange::between_millis(0, 20);
    }
    Ok(plan)
}
