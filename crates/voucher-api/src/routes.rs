use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{DefaultBodyLimit, Query, Request, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinError;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use voucher_core::{Database, Voucher};

use crate::config::AppConfig;
use crate::envelope::Envelope;
use crate::error::ActionError;
use crate::payload::{PostCommand, RequestBody};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    db: Arc<Mutex<Database>>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, db: Database) -> Self {
        Self {
            config,
            db: Arc::new(Mutex::new(db)),
        }
    }

    async fn load(&self) -> Result<Envelope, ActionError> {
        let db = Arc::clone(&self.db).lock_owned().await;
        let sheet_name = self.config.sheet_name.clone();
        let outcome = tokio::task::spawn_blocking(move || db.load_vouchers(&sheet_name))
            .await
            .map_err(|err| ActionError::Load(worker_failed(&err)))?
            .map_err(ActionError::Load)?;
        Ok(Envelope::loaded(outcome))
    }

    async fn sync(&self, data: Option<Value>) -> Result<Envelope, ActionError> {
        let vouchers = Voucher::decode_batch(data).map_err(ActionError::Sync)?;
        let mut db = Arc::clone(&self.db).lock_owned().await;
        let sheet_name = self.config.sheet_name.clone();
        let count =
            tokio::task::spawn_blocking(move || db.sync_vouchers(&sheet_name, &vouchers))
                .await
                .map_err(|err| ActionError::Sync(worker_failed(&err)))?
                .map_err(ActionError::Sync)?;
        Ok(Envelope::synced(count))
    }
}

fn worker_failed(err: &JoinError) -> voucher_core::Error {
    voucher_core::Error::Storage(format!("database task failed: {err}"))
}

pub fn app_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/", get(handle_get).post(handle_post))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

async fn handle_get(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<Envelope>, ActionError> {
    let Ok(Query(query)) = query else {
        return Err(ActionError::InvalidGetAction);
    };
    match query.get("action").map(String::as_str) {
        Some("load") => {
            let envelope = state.load().await?;
            tracing::info!(
                action = "load",
                count = envelope.vouchers.as_ref().map_or(0, Vec::len),
                "Served vouchers"
            );
            Ok(Json(envelope))
        }
        _ => Err(ActionError::InvalidGetAction),
    }
}

async fn handle_post(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    request: Request,
) -> Result<Json<Envelope>, ActionError> {
    let Query(query) = query.map_err(|err| ActionError::decode(err.body_text()))?;
    let command = RequestBody::extract(request, query).await?.into_command()?;
    match command {
        PostCommand::Sync { data } => {
            let envelope = state.sync(data).await?;
            tracing::info!(action = "sync", count = envelope.count, "Synced vouchers");
            Ok(Json(envelope))
        }
    }
}
