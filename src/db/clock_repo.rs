// src/db/clock_repo.rs

use std::sync::Arc;

use serde_json::Value;

use super::document_store::{to_document, DocumentStore, Filter, StoredDocument};
use crate::{common::error::AppError, models::clock::ClockEvent};

pub const CLOCK_EVENTS: &str = "registros_ponto";

// Registros de ponto. Só inserção e leitura: nenhum registro é alterado aqui.
// As consultas não pedem ordem ao store; quem chama ordena pelo timestamp do servidor.
#[derive(Clone)]
pub struct ClockEventRepository {
    store: Arc<dyn DocumentStore>,
}

impl ClockEventRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn insert(&self, event: &ClockEvent) -> Result<String, AppError> {
        let doc = to_document(event)?;
        self.store.add(CLOCK_EVENTS, doc).await
    }

    /// Histórico completo do funcionário, sem filtro de data.
    pub async fn list_by_employee(&self, employee_id: &str) -> Result<Vec<ClockEvent>, AppError> {
        self.store
            .query(CLOCK_EVENTS, &[Filter::eq("id_funcionario", employee_id)])
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn list_by_company(&self, company_id: &str) -> Result<Vec<ClockEvent>, AppError> {
        self.store
            .query(CLOCK_EVENTS, &[Filter::eq("cliente_id", company_id)])
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }
}

// Registro ilegível (timestamp inválido, tipo desconhecido) é erro de integridade.
fn decode(doc: StoredDocument) -> Result<ClockEvent, AppError> {
    let mut event: ClockEvent = serde_json::from_value(Value::Object(doc.data))
        .map_err(|e| AppError::CorruptHistory(format!("registro {}: {}", doc.id, e)))?;
    event.id = doc.id;
    Ok(event)
}
