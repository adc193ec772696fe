//! HTTP surface for the move commit step
//!
//! One route, `PUT /tasks/move`, accepting a `MovePayload` and answering
//! with the authoritative post-move card record. Failure classes map to
//! status codes: structural validation to 400 with field details, an
//! unknown task to 404, persistence failures to 500 (the client must treat
//! 500 as not applied and roll back).

use crate::{
    error::KadroError,
    service::payload::{ErrorResponse, MovePayload, MoveResponse},
    service::reorder::ReorderService,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::put,
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builds the reorder API router
pub fn router(service: Arc<ReorderService>) -> Router {
    Router::new()
        .route("/tasks/move", put(move_task))
        .with_state(service)
}

/// Binds the router to a listener and serves until shutdown
///
/// Port 0 is supported; the bound address is logged.
pub async fn serve(listener: TcpListener, service: Arc<ReorderService>) -> crate::Result<()> {
    tracing::info!(addr = %listener.local_addr()?, "reorder API listening");
    axum::serve(listener, router(service)).await?;
    Ok(())
}

async fn move_task(
    State(service): State<Arc<ReorderService>>,
    Json(payload): Json<MovePayload>,
) -> Response {
    match service.move_task(&payload).await {
        Ok(card) => (
            StatusCode::OK,
            Json(MoveResponse {
                success: true,
                data: card.into(),
            }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: KadroError) -> Response {
    let (status, details) = match &err {
        KadroError::InvalidPayload(errors) => (StatusCode::BAD_REQUEST, Some(errors.clone())),
        KadroError::CardNotFound(_) | KadroError::ColumnNotFound(_) => {
            (StatusCode::NOT_FOUND, None)
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, None),
    };

    (
        status,
        Json(ErrorResponse {
            success: false,
            error: err.to_string(),
            details,
        }),
    )
        .into_response()
}
