//! Template collection routes
//!
//! `GET` returns the stored collection (`[]` when nothing has been saved),
//! `POST` replaces it. The legacy `/read_prompts` and `/save_prompts` paths
//! are kept for older clients.

use crate::{
    AppState,
    error::{ApiError, Result},
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    routing::{get, post},
};
use serde_json::{Value, json};
use tracing::{debug, error, info};

/// Create prompt collection routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/prompts",
            get(read_prompts)
                .post(save_prompts)
                .fallback(method_not_allowed),
        )
        .route("/read_prompts", get(read_prompts).fallback(method_not_allowed))
        .route("/save_prompts", post(save_prompts).fallback(method_not_allowed))
}

/// Return the stored collection as-is
async fn read_prompts(State(state): State<AppState>) -> Result<Json<Value>> {
    debug!("Reading prompts from {}", state.prompts.path().display());

    let stored = state.prompts.read::<Value>().await.map_err(|e| {
        error!("Failed to read prompts: {}", e);
        ApiError::from(e)
    })?;

    match stored {
        None => Ok(Json(json!([]))),
        Some(Value::Null) => {
            error!("Prompts file holds null");
            Err(ApiError::CorruptStore("document is null".to_string()))
        }
        Some(prompts) => Ok(Json(prompts)),
    }
}

/// Replace the stored collection with the posted array
async fn save_prompts(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>> {
    let data: Value = match serde_json::from_slice(&body) {
        Ok(Value::Null) | Err(_) => return Err(ApiError::bad_request("Invalid JSON data")),
        Ok(data) => data,
    };

    let count = match data.as_array() {
        Some(items) => items.len(),
        None => return Err(ApiError::bad_request("Data must be an array")),
    };

    state.prompts.write(&data).await.map_err(|e| {
        error!("Failed to save prompts: {}", e);
        ApiError::from(e)
    })?;

    info!("Saved {} prompts", count);

    Ok(Json(json!({
        "success": true,
        "message": "Prompts saved successfully"
    })))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
