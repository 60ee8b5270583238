// src/db/employee_repo.rs

use std::sync::Arc;

use serde_json::Value;

use super::document_store::{to_document, Document, DocumentStore, Filter, StoredDocument};
use crate::{common::error::AppError, models::employee::Employee};

pub const EMPLOYEES: &str = "funcionarios";

// Funcionários ficam com o CPF normalizado como id do documento,
// então a busca por CPF é uma leitura direta.
#[derive(Clone)]
pub struct EmployeeRepository {
    store: Arc<dyn DocumentStore>,
}

impl EmployeeRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Grava com merge: um cadastro repetido não apaga campos já existentes.
    pub async fn upsert(&self, employee: &Employee) -> Result<(), AppError> {
        let doc = to_document(employee)?;
        self.store.set(EMPLOYEES, &employee.cpf, doc, true).await
    }

    pub async fn find_by_cpf(&self, cpf: &str) -> Result<Option<Employee>, AppError> {
        self.store.get(EMPLOYEES, cpf).await?.map(decode).transpose()
    }

    pub async fn list_by_company(&self, company_id: &str) -> Result<Vec<Employee>, AppError> {
        self.store
            .query(EMPLOYEES, &[Filter::eq("cliente_id", company_id)])
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn update(&self, cpf: &str, patch: Document) -> Result<bool, AppError> {
        self.store.update(EMPLOYEES, cpf, patch).await
    }

    pub async fn delete(&self, cpf: &str) -> Result<bool, AppError> {
        self.store.delete(EMPLOYEES, cpf).await
    }
}

fn decode(doc: StoredDocument) -> Result<Employee, AppError> {
    let mut employee: Employee = serde_json::from_value(Value::Object(doc.data)).map_err(|e| {
        AppError::InternalServerError(anyhow::anyhow!("Funcionário {} ilegível: {}", doc.id, e))
    })?;
    employee.id = doc.id;
    Ok(employee)
}
