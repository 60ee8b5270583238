// src/models/device.rs

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Tablet pareado com um cliente
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Device {
    #[serde(rename = "cliente_id")]
    pub company_id: String,

    pub machine_id: String,

    #[serde(rename = "modelo", default)]
    pub model: Option<String>,

    #[serde(rename = "ativo", default)]
    pub active: bool,

    #[serde(rename = "data_ativacao")]
    pub activated_at: DateTime<FixedOffset>,
}

impl Device {
    /// Id do documento: um mesmo tablet pode ser pareado com mais de um cliente.
    pub fn document_id(company_id: &str, machine_id: &str) -> String {
        format!("{}:{}", company_id, machine_id)
    }
}
