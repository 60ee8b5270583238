// src/services/employee_service.rs

use std::{str::FromStr, sync::Arc};

use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::{
    common::{error::AppError, identifiers::normalized_non_empty, time::Clock},
    db::{Document, EmployeeRepository},
    models::employee::Employee,
};

/// Dados de cadastro. Salário e cliente chegam como JSON livre
/// (o painel manda tanto número quanto texto).
#[derive(Debug, Clone, Default)]
pub struct NewEmployee {
    pub cpf: String,
    pub name: String,
    pub sector: Option<String>,
    pub base_salary: Option<Value>,
    pub contract_type: Option<String>,
    pub company_id: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub base_salary: Option<Value>,
    pub contract_type: Option<String>,
    pub company_id: Option<Value>,
}

#[derive(Clone)]
pub struct EmployeeService {
    repo: EmployeeRepository,
    clock: Arc<dyn Clock>,
}

impl EmployeeService {
    pub fn new(repo: EmployeeRepository, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Cadastra (ou completa) o funcionário usando o CPF normalizado como chave.
    pub async fn create_employee(&self, new: NewEmployee) -> Result<Employee, AppError> {
        let cpf = normalized_non_empty(&new.cpf).ok_or(AppError::InvalidInput("cpf_required"))?;
        let company_id = new
            .company_id
            .as_ref()
            .and_then(id_as_string)
            .ok_or(AppError::InvalidInput("company_required"))?;

        let employee = Employee {
            id: cpf.clone(),
            cpf,
            name: new.name,
            sector: new.sector,
            base_salary: parse_salary(new.base_salary.as_ref())?,
            contract_type: new.contract_type,
            company_id,
            created_at: self.clock.now(),
        };
        self.repo.upsert(&employee).await?;

        tracing::info!(employee_id = %employee.cpf, company_id = %employee.company_id, "👤 Funcionário cadastrado");
        Ok(employee)
    }

    /// Funcionários do cliente, ordenados pelo nome na aplicação (sem índice no store).
    pub async fn list_by_company(&self, company_id: &str) -> Result<Vec<Employee>, AppError> {
        let mut employees = self.repo.list_by_company(company_id.trim()).await?;
        employees.sort_by_key(|e| e.name.to_lowercase());
        Ok(employees)
    }

    pub async fn find_employee(&self, raw_cpf: &str) -> Result<Employee, AppError> {
        let cpf = normalized_non_empty(raw_cpf).ok_or(AppError::InvalidInput("cpf_required"))?;
        self.repo.find_by_cpf(&cpf).await?.ok_or(AppError::EmployeeNotFound)
    }

    pub async fn update_employee(&self, raw_cpf: &str, changes: EmployeeChanges) -> Result<(), AppError> {
        let cpf = normalized_non_empty(raw_cpf).ok_or(AppError::InvalidInput("cpf_required"))?;

        let mut patch = Document::new();
        if let Some(name) = changes.name {
            patch.insert("nome".into(), json!(name));
        }
        if let Some(sector) = changes.sector {
            patch.insert("setor".into(), json!(sector));
        }
        if let Some(salary) = changes.base_salary {
            patch.insert("salario_base".into(), json!(parse_salary(Some(&salary))?));
        }
        if let Some(contract) = changes.contract_type {
            patch.insert("tipo_contrato".into(), json!(contract));
        }
        if let Some(company) = changes.company_id {
            let company_id = id_as_string(&company).ok_or(AppError::InvalidInput("company_required"))?;
            patch.insert("cliente_id".into(), json!(company_id));
        }

        if patch.is_empty() {
            return self.repo.find_by_cpf(&cpf).await?.map(|_| ()).ok_or(AppError::EmployeeNotFound);
        }
        if !self.repo.update(&cpf, patch).await? {
            return Err(AppError::EmployeeNotFound);
        }
        Ok(())
    }

    pub async fn delete_employee(&self, raw_cpf: &str) -> Result<(), AppError> {
        let cpf = normalized_non_empty(raw_cpf).ok_or(AppError::InvalidInput("cpf_required"))?;
        if !self.repo.delete(&cpf).await? {
            return Err(AppError::EmployeeNotFound);
        }
        tracing::info!(employee_id = %cpf, "🗑️ Funcionário removido");
        Ok(())
    }
}

// O id do cliente é sempre guardado como texto, mesmo que chegue como número.
fn id_as_string(value: &Value) -> Option<String> {
    let id = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if id.is_empty() { None } else { Some(id) }
}

/// Ausente, nulo ou vazio vira zero. Aceita vírgula decimal ("2500,50").
fn parse_salary(value: Option<&Value>) -> Result<Decimal, AppError> {
    let invalid = || AppError::InvalidInput("invalid_salary");
    match value {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map_err(|_| invalid()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Decimal::ZERO),
        Some(Value::String(s)) => Decimal::from_str(&s.trim().replace(',', ".")).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::time::FixedClock,
        db::{DocumentStore, MemoryDocumentStore},
    };

    fn service() -> (Arc<MemoryDocumentStore>, EmployeeService) {
        let store = Arc::new(MemoryDocumentStore::new());
        let dyn_store: Arc<dyn DocumentStore> = store.clone();
        let clock = Arc::new(FixedClock::at("2024-01-01T08:00:00-03:00").unwrap());
        (store, EmployeeService::new(EmployeeRepository::new(dyn_store), clock))
    }

    fn maria() -> NewEmployee {
        NewEmployee {
            cpf: "123.456.789-09".into(),
            name: "Maria da Silva".into(),
            sector: Some("Caixa".into()),
            base_salary: Some(json!("2500,50")),
            contract_type: Some("CLT".into()),
            company_id: Some(json!(42)),
        }
    }

    #[test]
    fn salary_accepts_numbers_text_and_blank() {
        assert_eq!(parse_salary(None).unwrap(), Decimal::ZERO);
        assert_eq!(parse_salary(Some(&json!(""))).unwrap(), Decimal::ZERO);
        assert_eq!(parse_salary(Some(&json!(1500))).unwrap(), Decimal::new(1500, 0));
        assert_eq!(parse_salary(Some(&json!(1500.75))).unwrap(), Decimal::new(150075, 2));
        assert_eq!(parse_salary(Some(&json!("2500,50"))).unwrap(), Decimal::new(250050, 2));
        assert!(parse_salary(Some(&json!("muito"))).is_err());
        assert!(parse_salary(Some(&json!([1]))).is_err());
    }

    #[tokio::test]
    async fn create_keys_by_normalized_cpf() {
        let (store, service) = service();
        let employee = service.create_employee(maria()).await.unwrap();
        assert_eq!(employee.cpf, "12345678909");
        assert_eq!(employee.company_id, "42");

        let raw = store.get("funcionarios", "12345678909").await.unwrap().unwrap().data;
        assert_eq!(raw["cliente_id"], "42");
        assert_eq!(raw["cpf"], "12345678909");

        // leitura por qualquer formatação do mesmo CPF
        assert_eq!(service.find_employee("123 456 789 09").await.unwrap().name, "Maria da Silva");
    }

    #[tokio::test]
    async fn create_requires_cpf() {
        let (_, service) = service();
        let mut no_cpf = maria();
        no_cpf.cpf = "abc".into();
        assert!(matches!(
            service.create_employee(no_cpf).await,
            Err(AppError::InvalidInput("cpf_required"))
        ));
    }

    #[tokio::test]
    async fn list_filters_by_company_and_sorts_by_name() {
        let (_, service) = service();
        for (cpf, name, company) in [("1", "zé", "42"), ("2", "Ana", "42"), ("3", "bruno", "42"), ("4", "Outro", "7")] {
            service
                .create_employee(NewEmployee {
                    cpf: cpf.into(),
                    name: name.into(),
                    company_id: Some(json!(company)),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        let names: Vec<String> = service.list_by_company("42").await.unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["Ana", "bruno", "zé"]);
    }

    #[tokio::test]
    async fn update_and_delete_normalize_the_cpf() {
        let (_, service) = service();
        service.create_employee(maria()).await.unwrap();

        service
            .update_employee("123.456.789-09", EmployeeChanges { sector: Some("Estoque".into()), ..Default::default() })
            .await
            .unwrap();
        let updated = service.find_employee("12345678909").await.unwrap();
        assert_eq!(updated.sector.as_deref(), Some("Estoque"));
        assert_eq!(updated.contract_type.as_deref(), Some("CLT"));

        service.delete_employee("123.456.789-09").await.unwrap();
        assert!(matches!(service.find_employee("12345678909").await, Err(AppError::EmployeeNotFound)));
        assert!(matches!(service.delete_employee("12345678909").await, Err(AppError::EmployeeNotFound)));
        assert!(matches!(
            service.update_employee("12345678909", EmployeeChanges::default()).await,
            Err(AppError::EmployeeNotFound)
        ));
    }
}
