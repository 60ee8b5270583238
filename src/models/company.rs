// src/models/company.rs

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// ---
// Status do cliente (tenant)
// ---
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum CompanyStatus {
    #[serde(rename = "ativo")]
    Active,
    #[serde(rename = "bloqueado")]
    Blocked,
}

impl CompanyStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "ativo" => Some(Self::Active),
            "bloqueado" => Some(Self::Blocked),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ativo",
            Self::Blocked => "bloqueado",
        }
    }
}

// ---
// Cliente (a empresa que usa os tablets)
// ---
// O id vem do store e não faz parte do corpo persistido.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Company {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    #[schema(example = "3f2c1a9be0d64c7f8e1b2a3c4d5e6f70")]
    pub id: String,

    #[serde(rename = "nome_fantasia")]
    #[schema(example = "Padaria Central")]
    pub trade_name: String,

    /// Sempre só dígitos.
    #[schema(example = "12345678000190")]
    pub cnpj: String,

    #[serde(rename = "responsavel", default)]
    pub contact_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,

    #[serde(rename = "endereco", default)]
    pub address: Option<Value>,

    // Nunca sai na resposta. Gravado pelo repositório.
    #[serde(rename = "senha_hash", default, skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,

    // Cadastros antigos guardavam a senha em texto puro. Só é lido, nunca gravado.
    #[serde(rename = "senha_acesso", default, skip_serializing)]
    #[schema(ignore)]
    pub legacy_password: Option<String>,

    pub status: CompanyStatus,

    #[serde(rename = "data_cadastro")]
    pub created_at: DateTime<FixedOffset>,
}

impl Company {
    pub fn is_active(&self) -> bool {
        self.status == CompanyStatus::Active
    }
}

/// Resposta do login do tablet.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TabletLoginResponse {
    pub id: String,
    pub nome: String,
}
