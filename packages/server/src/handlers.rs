use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::Deserialize;

use vlo_core::{HandledRequest, SelfLink};

use crate::state::AppState;

const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

fn xml_response(status: u16, body: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, XML_CONTENT_TYPE)], body).into_response()
}

async fn handle(state: &AppState, params: Vec<(String, String)>) -> Response {
    match state.engine.handle(&params).await {
        Ok(HandledRequest { status, body }) => xml_response(status, body),
        Err(e) => {
            tracing::error!(error = %e, "OAI-PMH request failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /oai?verb=...`
pub async fn oai_get(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    handle(&state, params).await
}

/// `POST /oai` with a form-encoded body.
pub async fn oai_post(
    State(state): State<AppState>,
    Form(params): Form<Vec<(String, String)>>,
) -> Response {
    handle(&state, params).await
}

#[derive(Deserialize)]
pub struct RecordQuery {
    pub format: Option<String>,
}

/// `GET /record/{id}?format=...`: the bare metadata document of one record.
pub async fn record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<RecordQuery>,
) -> Response {
    match state.engine.self_link(&id, query.format.as_deref()).await {
        Ok(SelfLink::Document(body)) => xml_response(200, body),
        Ok(SelfLink::Status(status)) => StatusCode::from_u16(status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, record_id = %id, "record self link failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn health(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    state.engine.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok("OK")
}
