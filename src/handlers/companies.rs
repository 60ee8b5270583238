// src/handlers/companies.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::company::{Company, TabletLoginResponse},
    services::company_service::{CompanyChanges, NewCompany},
};

// =============================================================================
//  CADASTRO DE CLIENTES (PAINEL ADMIN)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCompanyPayload {
    #[serde(rename = "nome", default)]
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Padaria Central")]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "12.345.678/0001-90")]
    pub cnpj: String,

    #[serde(rename = "senha", default)]
    pub password: Option<String>,

    /// Nome alternativo do campo de senha, aceito por compatibilidade.
    #[serde(rename = "senha_acesso", default)]
    pub access_password: Option<String>,

    #[serde(rename = "responsavel", default)]
    pub contact_name: Option<String>,

    #[serde(default)]
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,

    #[serde(rename = "endereco", default)]
    pub address: Option<Value>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCompanyPayload {
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cnpj: Option<String>,
    #[serde(rename = "senha", default)]
    pub password: Option<String>,
    #[serde(rename = "senha_acesso", default)]
    pub access_password: Option<String>,
    #[serde(rename = "responsavel", default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "endereco", default)]
    pub address: Option<Value>,
    #[schema(example = "bloqueado")]
    #[serde(default)]
    pub status: Option<String>,
}

// `senha_acesso` vazio não esconde uma `senha` preenchida
fn pick_password(access_password: Option<String>, password: Option<String>) -> Option<String> {
    access_password.filter(|p| !p.is_empty()).or(password)
}

// POST /api/clientes
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = CreateCompanyPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Company),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let company = app_state
        .company_service
        .create_company(NewCompany {
            name: payload.name,
            cnpj: payload.cnpj,
            password: pick_password(payload.access_password, payload.password).unwrap_or_default(),
            contact_name: payload.contact_name,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
        })
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(company)))
}

// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    responses(
        (status = 200, description = "Lista de clientes", body = Vec<Company>)
    )
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let companies = app_state
        .company_service
        .list_companies()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(companies)))
}

// PUT /api/clientes/{id}
#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    request_body = UpdateCompanyPayload,
    params(("id" = String, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn update_company(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCompanyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .company_service
        .update_company(
            &id,
            CompanyChanges {
                name: payload.name,
                cnpj: payload.cnpj,
                password: pick_password(payload.access_password, payload.password),
                contact_name: payload.contact_name,
                email: payload.email,
                phone: payload.phone,
                address: payload.address,
                status: payload.status,
            },
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "status": "atualizado" }))))
}

// DELETE /api/clientes/{id}
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = String, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente removido"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn delete_company(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .company_service
        .delete_company(&id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "status": "removido" }))))
}

// =============================================================================
//  TABLET: LOGIN E PAREAMENTO
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct TabletLoginPayload {
    #[serde(default)]
    #[schema(example = "12345678000190")]
    pub cnpj: String,
    #[serde(rename = "senha", default)]
    pub password: String,
}

// POST /api/clientes/login-tablet
#[utoipa::path(
    post,
    path = "/api/clientes/login-tablet",
    tag = "Tablet",
    request_body = TabletLoginPayload,
    responses(
        (status = 200, description = "Login aceito", body = TabletLoginResponse),
        (status = 401, description = "CNPJ ou senha incorretos"),
        (status = 403, description = "Cliente bloqueado")
    )
)]
pub async fn login_tablet(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<TabletLoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let login = app_state
        .company_service
        .login_tablet(&payload.cnpj, &payload.password)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(login)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActivateDevicePayload {
    #[serde(default)]
    pub cliente_id: Option<Value>,
    #[serde(default)]
    #[schema(example = "a1b2c3d4e5")]
    pub machine_id: String,
    #[serde(rename = "modelo", default)]
    #[schema(example = "Galaxy Tab A8")]
    pub model: Option<String>,
}

// POST /api/clientes/ativar-dispositivo
#[utoipa::path(
    post,
    path = "/api/clientes/ativar-dispositivo",
    tag = "Tablet",
    request_body = ActivateDevicePayload,
    responses(
        (status = 200, description = "Dispositivo ativado"),
        (status = 403, description = "Cliente bloqueado"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn activate_device(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ActivateDevicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let company_id = super::loose_text(payload.cliente_id.as_ref());
    if company_id.trim().is_empty() {
        return Err(AppError::InvalidInput("company_required").to_api_error(&locale, &app_state.i18n_store));
    }

    let device = app_state
        .company_service
        .activate_device(company_id.trim(), &payload.machine_id, payload.model)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::OK,
        Json(json!({ "status": "ativado", "cliente_id": device.company_id, "machine_id": device.machine_id })),
    ))
}

// =============================================================================
//  EXPORTAÇÃO AFD
// =============================================================================

// GET /api/clientes/{id}/afd
#[utoipa::path(
    get,
    path = "/api/clientes/{id}/afd",
    tag = "Clientes",
    params(("id" = String, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Arquivo AFD", body = String, content_type = "text/plain"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn export_afd(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let afd = app_state
        .afd_service
        .export(&id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let file_id: String = id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"AFD_{}.txt\"", file_id)),
        ],
        afd,
    ))
}
