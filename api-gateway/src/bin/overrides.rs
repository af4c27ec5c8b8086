//! Schedule Overrides Lambda - CRUD over per-date override records.
//!
//! Endpoints (single path, dispatched on method):
//! - OPTIONS - CORS preflight
//! - GET ?date=YYYY-MM-DD - Get one date's override
//! - GET - List every override
//! - POST - Upsert one record onto `date`, `dates` and/or `from`..`to` (admin)
//! - DELETE ?date=YYYY-MM-DD - Delete one date's override (admin)

use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use serde::Serialize;
use serde_json::Value;
use shared::http::{error_response, json_response, preflight_response};
use shared::{
    authorize_admin, presented_admin_key, BlobStore, Config, MemoryStore, OverrideService,
    S3Store, StoreBackend, UpsertRequest,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Upsert response
#[derive(Debug, Serialize)]
struct SavedResponse {
    ok: bool,
    saved: usize,
}

/// Delete response
#[derive(Debug, Serialize)]
struct DeletedResponse {
    ok: bool,
}

/// Application state
struct AppState {
    service: OverrideService,
    admin_key: Option<String>,
}

impl AppState {
    async fn new(config: Config) -> Result<Self, Error> {
        let admin_key = match (&config.admin_key, &config.admin_key_secret_arn) {
            (Some(key), _) => Some(key.clone()),
            (None, Some(arn)) => {
                let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                let secrets_client = aws_sdk_secretsmanager::Client::new(&sdk_config);
                shared::fetch_admin_key(&secrets_client, arn).await?
            }
            (None, None) => None,
        };

        if admin_key.is_none() {
            warn!("No admin key configured; write requests will be rejected");
        }

        let store: Arc<dyn BlobStore> = match &config.store {
            StoreBackend::S3 {
                bucket,
                prefix,
                endpoint_url,
            } => {
                info!("Using S3 store s3://{}/{}", bucket, prefix);
                Arc::new(S3Store::connect(bucket.clone(), prefix.clone(), endpoint_url.as_deref()).await)
            }
            StoreBackend::Memory => {
                warn!("Using in-memory store; overrides will not persist");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self {
            service: OverrideService::new(store),
            admin_key,
        })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    if *event.method() == Method::OPTIONS {
        return preflight_response();
    }

    let method = event.method().clone();
    info!("Received request: method={}", method);

    match dispatch(&state, &event).await {
        Ok((status, body)) => json_response(status, &body),
        Err(e) => {
            let status = e.status_code();
            if status >= 500 {
                error!("overrides {} failed: {}", method, e);
            } else {
                warn!("overrides {} rejected ({}): {}", method, status, e);
            }
            error_response(status, e.to_string())
        }
    }
}

async fn dispatch(state: &AppState, event: &Request) -> shared::Result<(u16, Value)> {
    let params = event.query_string_parameters();
    let date = params.first("date").filter(|d| !d.is_empty());

    match *event.method() {
        Method::GET => {
            if let Some(date) = date {
                let value = state.service.get_one(date).await?;
                let mut body = BTreeMap::new();
                body.insert(date.to_string(), value);
                return Ok((200, serde_json::to_value(body)?));
            }

            let all = state.service.list_all().await?;
            info!("Listed {} override(s)", all.len());
            Ok((200, serde_json::to_value(all)?))
        }

        Method::POST => {
            authorize_admin(state.admin_key.as_deref(), presented_admin_key(event.headers()))?;

            let request = UpsertRequest::from_body(event.body().as_ref());
            let saved = state.service.upsert(&request).await?;
            Ok((200, serde_json::to_value(SavedResponse { ok: true, saved })?))
        }

        Method::DELETE => {
            authorize_admin(state.admin_key.as_deref(), presented_admin_key(event.headers()))?;

            state.service.delete(date).await?;
            Ok((200, serde_json::to_value(DeletedResponse { ok: true })?))
        }

        _ => Err(shared::Error::MethodNotAllowed),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;
    let state = Arc::new(AppState::new(config).await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
