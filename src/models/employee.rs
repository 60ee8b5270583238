// src/models/employee.rs

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Funcionário. O CPF normalizado é a chave primária do documento.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    /// Igual ao CPF; preenchido na leitura.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[schema(example = "12345678909")]
    pub cpf: String,

    #[serde(rename = "nome")]
    #[schema(example = "Maria da Silva")]
    pub name: String,

    #[serde(rename = "setor", default)]
    pub sector: Option<String>,

    #[serde(rename = "salario_base", default)]
    #[schema(value_type = f64, example = 2500.0)]
    pub base_salary: Decimal,

    #[serde(rename = "tipo_contrato", default)]
    #[schema(example = "CLT")]
    pub contract_type: Option<String>,

    #[serde(rename = "cliente_id")]
    pub company_id: String,

    #[serde(rename = "data_cadastro")]
    pub created_at: DateTime<FixedOffset>,
}
