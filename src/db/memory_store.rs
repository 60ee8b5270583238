// src/db/memory_store.rs

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use super::document_store::{generate_id, Document, DocumentStore, Filter, StoredDocument};
use crate::common::error::AppError;

// Store em memória: testes e execução local sem credenciais.
// Dentro de cada coleção os documentos ficam ordenados por id (BTreeMap),
// então a ordem devolvida por `query` é determinística.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, BTreeMap<String, Document>>>, AppError> {
        self.collections
            .read()
            .map_err(|_| AppError::StoreUnavailable("lock do store em memória envenenado".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, BTreeMap<String, Document>>>, AppError> {
        self.collections
            .write()
            .map_err(|_| AppError::StoreUnavailable("lock do store em memória envenenado".into()))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn add(&self, collection: &str, data: Document) -> Result<String, AppError> {
        let id = generate_id();
        self.write()?
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, data: Document, merge: bool) -> Result<(), AppError> {
        let mut guard = self.write()?;
        let docs = guard.entry(collection.to_string()).or_default();
        if merge {
            if let Some(existing) = docs.get_mut(id) {
                existing.extend(data);
                return Ok(());
            }
        }
        docs.insert(id.to_string(), data);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, AppError> {
        Ok(self
            .read()?
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| StoredDocument { id: id.to_string(), data: data.clone() }))
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<bool, AppError> {
        let mut guard = self.write()?;
        match guard.get_mut(collection).and_then(|docs| docs.get_mut(id)) {
            Some(existing) => {
                existing.extend(patch);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, AppError> {
        Ok(self
            .write()?
            .get_mut(collection)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false))
    }

    async fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<StoredDocument>, AppError> {
        let guard = self.read()?;
        let Some(docs) = guard.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|(_, data)| filters.iter().all(|f| f.matches(data)))
            .map(|(id, data)| StoredDocument { id: id.clone(), data: data.clone() })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn add_generates_distinct_ids() {
        let store = MemoryDocumentStore::new();
        let a = store.add("c", doc(json!({"n": 1}))).await.unwrap();
        let b = store.add("c", doc(json!({"n": 2}))).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.get("c", &a).await.unwrap().unwrap().data["n"], 1);
    }

    #[tokio::test]
    async fn set_with_merge_keeps_other_fields() {
        let store = MemoryDocumentStore::new();
        store.set("f", "1", doc(json!({"nome": "Ana", "setor": "RH"})), false).await.unwrap();
        store.set("f", "1", doc(json!({"setor": "TI"})), true).await.unwrap();
        let data = store.get("f", "1").await.unwrap().unwrap().data;
        assert_eq!(data["nome"], "Ana");
        assert_eq!(data["setor"], "TI");

        store.set("f", "1", doc(json!({"setor": "Caixa"})), false).await.unwrap();
        let data = store.get("f", "1").await.unwrap().unwrap().data;
        assert!(data.get("nome").is_none());
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_documents() {
        let store = MemoryDocumentStore::new();
        assert!(!store.update("c", "x", Document::new()).await.unwrap());
        assert!(!store.delete("c", "x").await.unwrap());

        store.set("c", "x", doc(json!({"a": 1})), false).await.unwrap();
        assert!(store.update("c", "x", doc(json!({"b": 2}))).await.unwrap());
        assert_eq!(store.get("c", "x").await.unwrap().unwrap().data.len(), 2);
        assert!(store.delete("c", "x").await.unwrap());
        assert!(store.get("c", "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn query_applies_all_equality_filters() {
        let store = MemoryDocumentStore::new();
        store.add("p", doc(json!({"cpf": "1", "cliente": "a"}))).await.unwrap();
        store.add("p", doc(json!({"cpf": "1", "cliente": "b"}))).await.unwrap();
        store.add("p", doc(json!({"cpf": "2", "cliente": "a"}))).await.unwrap();

        assert_eq!(store.query("p", &[Filter::eq("cpf", "1")]).await.unwrap().len(), 2);
        let both = [Filter::eq("cpf", "1"), Filter::eq("cliente", "a")];
        assert_eq!(store.query("p", &both).await.unwrap().len(), 1);
        assert_eq!(store.query("p", &[]).await.unwrap().len(), 3);
        assert!(store.query("vazia", &[]).await.unwrap().is_empty());
    }
}
