use crate::models::{AnalyzeResponse, RelayRequest};
use crate::startup::AppState;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// Generic analyze handler, mounted once per media kind:
/// `post(analyze::<AnalyzeImageRequest>)`.
pub async fn analyze<R: RelayRequest>(
    State(state): State<AppState>,
    payload: Result<Json<R>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(kind = %R::KIND, error = %rejection, "Rejected malformed request body");
        AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let response = state.relay.analyze(&request).await?;

    Ok(Json(AnalyzeResponse { response }))
}
