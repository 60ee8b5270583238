// src/models/clock.rs

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---
// Tipo de marcação: conjunto fechado de dois valores
// ---
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum EventType {
    #[serde(rename = "ENTRADA")]
    Entrada,
    #[serde(rename = "SAÍDA", alias = "SAIDA")]
    Saida,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entrada => "ENTRADA",
            Self::Saida => "SAÍDA",
        }
    }
}

// ---
// Registro de ponto
// ---
// Criado uma vez por batida e nunca alterado. A ordem é reconstruída só pelo
// `timestamp_servidor`; o `timestamp_local` do tablet é apenas informativo.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ClockEvent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// CPF normalizado.
    #[serde(rename = "id_funcionario")]
    pub employee_id: String,

    #[serde(rename = "nome_funcionario", default)]
    pub employee_name: Option<String>,

    #[serde(rename = "cliente_id", default)]
    pub company_id: Option<String>,

    #[serde(rename = "tipo")]
    pub event_type: EventType,

    #[serde(rename = "timestamp_servidor")]
    #[schema(value_type = String, format = DateTime, example = "2024-01-01T08:00:00-03:00")]
    pub server_timestamp: DateTime<FixedOffset>,

    /// Só é diferente de zero em SAÍDA.
    #[serde(rename = "horas_trabalhadas", default)]
    #[schema(example = 9.5)]
    pub hours_worked: f64,

    #[serde(rename = "geolocalizacao", default)]
    #[schema(example = "-23.5505,-46.6333")]
    pub geolocation: Option<String>,

    #[serde(default)]
    pub machine_id: Option<String>,

    #[serde(default)]
    pub timestamp_local: Option<String>,
}

/// Resposta de uma batida registrada.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClockResponse {
    #[schema(example = "sucesso")]
    pub status: String,
    pub tipo: EventType,
    #[schema(example = 9.5)]
    pub horas: f64,
    #[schema(example = "Maria da Silva")]
    pub funcionario: String,
}
