// src/db/company_repo.rs

use std::sync::Arc;

use serde_json::Value;

use super::document_store::{to_document, Document, DocumentStore, Filter, StoredDocument};
use crate::{common::error::AppError, models::company::Company};

pub const COMPANIES: &str = "clientes";

// Repositório de clientes, responsável pela coleção 'clientes'
#[derive(Clone)]
pub struct CompanyRepository {
    store: Arc<dyn DocumentStore>,
}

impl CompanyRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Insere um cliente novo (id gerado pelo store). O hash da senha é gravado aqui,
    /// já que o modelo nunca o serializa.
    pub async fn create(&self, company: &Company) -> Result<String, AppError> {
        let mut doc = to_document(company)?;
        doc.insert("senha_hash".into(), Value::String(company.password_hash.clone()));
        self.store.add(COMPANIES, doc).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Company>, AppError> {
        self.store.get(COMPANIES, id).await?.map(decode).transpose()
    }

    pub async fn list_all(&self) -> Result<Vec<Company>, AppError> {
        self.store
            .query(COMPANIES, &[])
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Busca por igualdade exata no CNPJ gravado (já normalizado).
    pub async fn find_by_cnpj(&self, cnpj: &str) -> Result<Vec<Company>, AppError> {
        self.store
            .query(COMPANIES, &[Filter::eq("cnpj", cnpj)])
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn update(&self, id: &str, patch: Document) -> Result<bool, AppError> {
        self.store.update(COMPANIES, id, patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        self.store.delete(COMPANIES, id).await
    }
}

fn decode(doc: StoredDocument) -> Result<Company, AppError> {
    let mut company: Company = serde_json::from_value(Value::Object(doc.data)).map_err(|e| {
        AppError::InternalServerError(anyhow::anyhow!("Cliente {} ilegível: {}", doc.id, e))
    })?;
    company.id = doc.id;
    Ok(company)
}
