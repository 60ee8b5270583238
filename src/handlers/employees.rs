// src/handlers/employees.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        identifiers::normalized_non_empty,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::employee::Employee,
    services::employee_service::{EmployeeChanges, NewEmployee},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEmployeePayload {
    #[serde(default)]
    #[schema(value_type = String, example = "123.456.789-09")]
    pub cpf: Option<Value>,

    #[serde(rename = "nome", default)]
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria da Silva")]
    pub name: String,

    #[serde(rename = "setor", default)]
    pub sector: Option<String>,

    #[serde(rename = "salario_base", default)]
    #[schema(value_type = Option<f64>, example = 2500.0)]
    pub base_salary: Option<Value>,

    #[serde(rename = "tipo_contrato", default)]
    #[schema(example = "CLT")]
    pub contract_type: Option<String>,

    #[serde(rename = "cliente_id", default)]
    #[schema(value_type = String)]
    pub company_id: Option<Value>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEmployeePayload {
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(rename = "setor", default)]
    pub sector: Option<String>,
    #[serde(rename = "salario_base", default)]
    #[schema(value_type = Option<f64>)]
    pub base_salary: Option<Value>,
    #[serde(rename = "tipo_contrato", default)]
    pub contract_type: Option<String>,
    #[serde(rename = "cliente_id", default)]
    #[schema(value_type = Option<String>)]
    pub company_id: Option<Value>,
}

// POST /api/funcionarios
#[utoipa::path(
    post,
    path = "/api/funcionarios",
    tag = "Funcionários",
    request_body = CreateEmployeePayload,
    responses(
        (status = 201, description = "Funcionário cadastrado"),
        (status = 400, description = "CPF ausente ou dados inválidos")
    )
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateEmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    // CPF primeiro: é o erro mais comum vindo do painel
    let cpf = super::loose_text(payload.cpf.as_ref());
    if normalized_non_empty(&cpf).is_none() {
        return Err(AppError::InvalidInput("cpf_required").to_api_error(&locale, &app_state.i18n_store));
    }

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let employee = app_state
        .employee_service
        .create_employee(NewEmployee {
            cpf,
            name: payload.name,
            sector: payload.sector,
            base_salary: payload.base_salary,
            contract_type: payload.contract_type,
            company_id: payload.company_id,
        })
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(json!({ "status": "sucesso", "cpf": employee.cpf }))))
}

// GET /api/funcionarios/{cliente_id}
#[utoipa::path(
    get,
    path = "/api/funcionarios/{cliente_id}",
    tag = "Funcionários",
    params(("cliente_id" = String, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Funcionários do cliente, por nome", body = Vec<Employee>)
    )
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(company_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let employees = app_state
        .employee_service
        .list_by_company(&company_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(employees)))
}

// PUT /api/funcionarios/{cpf}
#[utoipa::path(
    put,
    path = "/api/funcionarios/{cpf}",
    tag = "Funcionários",
    request_body = UpdateEmployeePayload,
    params(("cpf" = String, Path, description = "CPF, com ou sem pontuação")),
    responses(
        (status = 200, description = "Funcionário atualizado"),
        (status = 404, description = "Funcionário não encontrado")
    )
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(cpf): Path<String>,
    Json(payload): Json<UpdateEmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .employee_service
        .update_employee(
            &cpf,
            EmployeeChanges {
                name: payload.name,
                sector: payload.sector,
                base_salary: payload.base_salary,
                contract_type: payload.contract_type,
                company_id: payload.company_id,
            },
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "status": "atualizado" }))))
}

// DELETE /api/funcionarios/{cpf}
#[utoipa::path(
    delete,
    path = "/api/funcionarios/{cpf}",
    tag = "Funcionários",
    params(("cpf" = String, Path, description = "CPF, com ou sem pontuação")),
    responses(
        (status = 200, description = "Funcionário removido"),
        (status = 404, description = "Funcionário não encontrado")
    )
)]
pub async fn delete_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(cpf): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .employee_service
        .delete_employee(&cpf)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "status": "removido" }))))
}
