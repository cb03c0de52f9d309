// Route handlers — POST /predict, POST /predict_batch, POST /add_trusted_url.
//
// Prediction failures surface as HTTP 500. Trusted-URL registration failures
// do NOT: they return 200 with a success flag and a human-readable error,
// which existing clients depend on. Keep that asymmetry.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::trusted::AddOutcome;
use crate::web::{api_error, AppState};

#[derive(Deserialize)]
pub struct PredictRequest {
    comment: String,
}

#[derive(Deserialize)]
pub struct PredictBatchRequest {
    comments: Vec<String>,
}

#[derive(Deserialize)]
pub struct AddTrustedUrlRequest {
    url: String,
    password: String,
}

#[derive(Serialize)]
pub struct AddTrustedUrlResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trusted_urls: Option<Vec<String>>,
}

/// POST /predict — classify one comment.
pub async fn predict(
    State(state): State<AppState>,
    Json(body): Json<PredictRequest>,
) -> Response {
    match state.service.predict_one(&body.comment).await {
        Ok(prediction) => (StatusCode::OK, Json(prediction)).into_response(),
        Err(e) => {
            error!("Prediction failed: {e:#}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Inference failed")
        }
    }
}

/// POST /predict_batch — classify a batch of comments, preserving order.
pub async fn predict_batch(
    State(state): State<AppState>,
    Json(body): Json<PredictBatchRequest>,
) -> Response {
    match state.service.predict_batch(&body.comments).await {
        Ok(predictions) => (StatusCode::OK, Json(predictions)).into_response(),
        Err(e) => {
            error!("Batch prediction failed: {e:#}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Inference failed")
        }
    }
}

/// POST /add_trusted_url — register a new trusted origin.
///
/// Always 200 for authorization/duplicate rejections; only a persistence
/// failure becomes a 500.
pub async fn add_trusted_url(
    State(state): State<AppState>,
    Json(body): Json<AddTrustedUrlRequest>,
) -> Response {
    let outcome = match state.trusted.add(&body.url, &body.password).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Failed to persist trusted origins: {e:#}");
            return api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to persist trusted URL list",
            );
        }
    };

    let response = match outcome {
        AddOutcome::Added(urls) => AddTrustedUrlResponse {
            success: true,
            error: None,
            trusted_urls: Some(urls),
        },
        AddOutcome::Unauthorized => AddTrustedUrlResponse {
            success: false,
            error: Some("Unauthorized".to_string()),
            trusted_urls: None,
        },
        AddOutcome::Duplicate(urls) => AddTrustedUrlResponse {
            success: false,
            error: Some("URL already in trusted list".to_string()),
            trusted_urls: Some(urls),
        },
    };

    (StatusCode::OK, Json(response)).into_response()
}
