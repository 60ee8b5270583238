// src/db/document_store.rs

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::common::error::AppError;

/// Corpo de um documento: objeto JSON de primeiro nível.
pub type Document = Map<String, Value>;

/// Documento lido do store, com o id separado do corpo.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Document,
}

/// Filtro por igualdade num campo de primeiro nível.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self { field: field.to_string(), value: value.into() }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        doc.get(&self.field) == Some(&self.value)
    }
}

/// Store de documentos por coleção (estilo Firestore).
///
/// A ordem dos resultados de `query` não é garantida: quem precisa de ordem
/// ordena na aplicação, evitando índices compostos no backend.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insere com id gerado e devolve o id.
    async fn add(&self, collection: &str, data: Document) -> Result<String, AppError>;

    /// Insere ou substitui com id explícito. Com `merge`, só os campos enviados
    /// sobrescrevem o documento existente.
    async fn set(&self, collection: &str, id: &str, data: Document, merge: bool) -> Result<(), AppError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, AppError>;

    /// Merge parcial. `false` quando o documento não existe.
    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<bool, AppError>;

    /// `false` quando nada foi removido.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, AppError>;

    /// Varredura com AND de todos os filtros. Lista vazia = coleção inteira.
    async fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<StoredDocument>, AppError>;
}

/// Gera um id de documento (uuid v4 sem hífens).
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Serializa um modelo para o corpo de documento.
pub fn to_document<T: serde::Serialize>(value: &T) -> Result<Document, AppError> {
    match serde_json::to_value(value).map_err(anyhow::Error::from)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::InternalServerError(anyhow::anyhow!(
            "Documento precisa ser um objeto JSON, recebido: {}",
            other
        ))),
    }
}
