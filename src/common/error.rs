use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::{I18nStore, DEFAULT_LANG};
use crate::middleware::i18n::Locale;

// Erros de domínio. Serviços e repositórios devolvem `AppError`;
// a fronteira dos handlers converte para `ApiError` já traduzido.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Campo obrigatório ausente ou inválido. Carrega a chave de i18n.
    #[error("Entrada inválida: {0}")]
    InvalidInput(&'static str),

    #[error("Funcionário não encontrado")]
    EmployeeNotFound,

    #[error("Cliente não encontrado")]
    CompanyNotFound,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Dispositivo não autorizado")]
    DeviceNotAuthorized,

    #[error("Cliente bloqueado")]
    CompanyBlocked,

    #[error("Histórico corrompido: {0}")]
    CorruptHistory(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Armazenamento indisponível: {0}")]
    StoreUnavailable(String),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),
}

/// Erro pronto para a resposta HTTP: `{"erro": <mensagem>}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "erro": self.message }))).into_response()
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::EmployeeNotFound | AppError::CompanyNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::DeviceNotAuthorized | AppError::CompanyBlocked => StatusCode::FORBIDDEN,
            AppError::CorruptHistory(_)
            | AppError::DatabaseError(_)
            | AppError::StoreUnavailable(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::InvalidInput(key) => *key,
            AppError::EmployeeNotFound => "employee_not_found",
            AppError::CompanyNotFound => "company_not_found",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::DeviceNotAuthorized => "device_not_authorized",
            AppError::CompanyBlocked => "company_blocked",
            AppError::CorruptHistory(_) => "corrupt_history",
            AppError::DatabaseError(_) | AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::InternalServerError(_) | AppError::BcryptError(_) => "internal_error",
        }
    }

    /// Converte para a resposta HTTP no idioma do cliente. Erros 5xx são logados aqui.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let mut message = i18n.get(&locale.0, self.message_key());

        // Validação: anexa os campos com problema, como "cpf: required".
        if let AppError::ValidationError(errors) = self {
            let mut details: Vec<String> = errors
                .field_errors()
                .iter()
                .map(|(field, errs)| {
                    let msgs: Vec<String> = errs
                        .iter()
                        .map(|e| e.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string()))
                        .collect();
                    format!("{}: {}", field, msgs.join(", "))
                })
                .collect();
            details.sort();
            if !details.is_empty() {
                message = format!("{} ({})", message, details.join("; "));
            }
        }

        ApiError { status, message }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let locale = Locale(DEFAULT_LANG.to_string());
        self.to_api_error(&locale, &I18nStore::new()).into_response()
    }
}
