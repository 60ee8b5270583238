// src/handlers/clock.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::clock::{ClockEvent, ClockResponse},
    services::clock_service::ClockSubmission,
};

// O que o tablet manda a cada batida
#[derive(Debug, Deserialize, ToSchema)]
pub struct ClockPayload {
    #[serde(default)]
    #[schema(value_type = String, example = "123.456.789-09")]
    pub id_funcionario: Option<Value>,

    #[serde(default)]
    #[schema(value_type = String)]
    pub id_cliente: Option<Value>,

    #[serde(default)]
    #[schema(example = "-23.5505,-46.6333")]
    pub geo: Option<String>,

    #[serde(default)]
    pub machine_id: Option<String>,

    /// Hora do tablet. Gravada, mas nunca usada para ordenar.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub timestamp_local: Option<Value>,
}

// POST /api/ponto/registrar  (alias: POST /api/ponto)
#[utoipa::path(
    post,
    path = "/api/ponto/registrar",
    tag = "Ponto",
    request_body = ClockPayload,
    responses(
        (status = 201, description = "Batida registrada", body = ClockResponse),
        (status = 400, description = "CPF ausente"),
        (status = 403, description = "Cliente bloqueado ou dispositivo não autorizado"),
        (status = 404, description = "Funcionário não encontrado"),
        (status = 500, description = "Histórico corrompido ou store indisponível")
    )
)]
pub async fn register_clock(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ClockPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let client_timestamp = payload
        .timestamp_local
        .as_ref()
        .map(|v| super::loose_text(Some(v)))
        .filter(|ts| !ts.is_empty());

    let outcome = app_state
        .clock_service
        .resolve_and_record(ClockSubmission {
            employee_id: super::loose_text(payload.id_funcionario.as_ref()),
            company_id: super::loose_text(payload.id_cliente.as_ref()),
            geolocation: payload.geo,
            machine_id: payload.machine_id,
            client_timestamp,
        })
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        Json(ClockResponse {
            status: "sucesso".to_string(),
            tipo: outcome.event_type,
            horas: outcome.hours,
            funcionario: outcome.employee_name,
        }),
    ))
}

// GET /api/ponto/funcionario/{cpf}
#[utoipa::path(
    get,
    path = "/api/ponto/funcionario/{cpf}",
    tag = "Ponto",
    params(("cpf" = String, Path, description = "CPF, com ou sem pontuação")),
    responses(
        (status = 200, description = "Histórico em ordem cronológica", body = Vec<ClockEvent>)
    )
)]
pub async fn employee_history(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(cpf): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let events = app_state
        .clock_service
        .history(&cpf)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(events)))
}
