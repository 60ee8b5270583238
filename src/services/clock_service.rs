// src/services/clock_service.rs

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::{
    common::{error::AppError, identifiers::normalized_non_empty, time::Clock},
    db::{ClockEventRepository, CompanyRepository, DeviceRepository, EmployeeRepository},
    models::clock::{ClockEvent, EventType},
    services::clock_resolver::{derive_state, resolve, sort_newest_first, sort_oldest_first},
};

/// Geolocalização gravada quando o tablet não manda nenhuma.
pub const DEFAULT_GEOLOCATION: &str = "0,0";

/// Dados de uma batida vindos do tablet.
#[derive(Debug, Clone, Default)]
pub struct ClockSubmission {
    pub employee_id: String,
    pub company_id: String,
    pub geolocation: Option<String>,
    pub machine_id: Option<String>,
    /// Só informativo: nunca entra na ordenação nem no cálculo de horas.
    pub client_timestamp: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ClockOutcome {
    pub event_type: EventType,
    pub hours: f64,
    pub employee_name: String,
    pub event: ClockEvent,
}

#[derive(Clone)]
pub struct ClockService {
    employees: EmployeeRepository,
    companies: CompanyRepository,
    devices: DeviceRepository,
    events: ClockEventRepository,
    clock: Arc<dyn Clock>,
    require_device_activation: bool,
    // Uma trava por CPF: ler histórico -> calcular -> gravar roda em série por funcionário.
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl ClockService {
    pub fn new(
        employees: EmployeeRepository,
        companies: CompanyRepository,
        devices: DeviceRepository,
        events: ClockEventRepository,
        clock: Arc<dyn Clock>,
        require_device_activation: bool,
    ) -> Self {
        Self {
            employees,
            companies,
            devices,
            events,
            clock,
            require_device_activation,
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Registra uma batida: decide ENTRADA/SAÍDA pelo histórico completo do
    /// funcionário e grava o novo registro com o timestamp do servidor.
    pub async fn resolve_and_record(&self, submission: ClockSubmission) -> Result<ClockOutcome, AppError> {
        // 1. Normaliza o CPF
        let cpf = normalized_non_empty(&submission.employee_id)
            .ok_or(AppError::InvalidInput("cpf_required"))?;
        // O id do cliente vem do tablet e é gravado como veio
        let company_id = submission.company_id.clone();

        // 2. Valida funcionário, cliente e dispositivo antes de qualquer escrita
        let employee = self
            .employees
            .find_by_cpf(&cpf)
            .await?
            .ok_or(AppError::EmployeeNotFound)?;

        // O bloqueio vale para o cliente dono do funcionário, não para o id enviado
        if let Some(owner) = self.companies.find_by_id(&employee.company_id).await? {
            if !owner.is_active() {
                return Err(AppError::CompanyBlocked);
            }
        }

        if self.require_device_activation {
            self.ensure_device_authorized(&company_id, submission.machine_id.as_deref())
                .await?;
        }

        // 3. Seção crítica por funcionário
        let lock = self.lock_for(&cpf);
        let outcome = {
            let _guard = lock.lock().await;
            self.record_locked(&cpf, &company_id, &employee.name, submission).await
        };
        drop(lock);
        self.release_lock(&cpf);

        outcome
    }

    async fn record_locked(
        &self,
        cpf: &str,
        company_id: &str,
        employee_name: &str,
        submission: ClockSubmission,
    ) -> Result<ClockOutcome, AppError> {
        let mut history = self.events.list_by_employee(cpf).await?;
        sort_newest_first(&mut history);

        let now = self.clock.now();
        let resolution = resolve(derive_state(&history), now);

        if resolution.hours < 0.0 {
            tracing::warn!(
                employee_id = %cpf,
                hours = resolution.hours,
                "⚠️ Horas negativas: último registro está no futuro em relação ao servidor"
            );
        }

        let mut event = ClockEvent {
            id: String::new(),
            employee_id: cpf.to_string(),
            employee_name: Some(employee_name.to_string()),
            company_id: Some(company_id.to_string()),
            event_type: resolution.event_type,
            server_timestamp: now,
            hours_worked: resolution.hours,
            geolocation: Some(
                submission
                    .geolocation
                    .filter(|g| !g.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_GEOLOCATION.to_string()),
            ),
            machine_id: submission.machine_id,
            timestamp_local: submission.client_timestamp,
        };
        event.id = self.events.insert(&event).await?;

        tracing::info!(
            employee_id = %cpf,
            company_id = %company_id,
            tipo = resolution.event_type.as_str(),
            horas = resolution.hours,
            "🕒 Ponto registrado"
        );

        Ok(ClockOutcome {
            event_type: resolution.event_type,
            hours: resolution.hours,
            employee_name: employee_name.to_string(),
            event,
        })
    }

    async fn ensure_device_authorized(&self, company_id: &str, machine_id: Option<&str>) -> Result<(), AppError> {
        let machine_id = machine_id
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or(AppError::DeviceNotAuthorized)?;

        match self.devices.find(company_id, machine_id).await? {
            Some(device) if device.active => Ok(()),
            _ => Err(AppError::DeviceNotAuthorized),
        }
    }

    /// Histórico do funcionário em ordem cronológica (mais antigo primeiro).
    pub async fn history(&self, raw_cpf: &str) -> Result<Vec<ClockEvent>, AppError> {
        let cpf = normalized_non_empty(raw_cpf).ok_or(AppError::InvalidInput("cpf_required"))?;
        let mut events = self.events.list_by_employee(&cpf).await?;
        sort_oldest_first(&mut events);
        Ok(events)
    }

    fn lock_for(&self, cpf: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(cpf.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    // Remove a trava quando ninguém mais está esperando por ela.
    fn release_lock(&self, cpf: &str) {
        self.locks.remove_if(cpf, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::time::FixedClock,
        db::{DocumentStore, MemoryDocumentStore},
        models::{
            company::{Company, CompanyStatus},
            device::Device,
            employee::Employee,
        },
    };
    use chrono::DateTime;
    use rust_decimal::Decimal;
    use serde_json::json;

    struct Fixture {
        store: Arc<MemoryDocumentStore>,
        clock: Arc<FixedClock>,
        service: ClockService,
        company_id: String,
    }

    async fn fixture(require_device: bool) -> Fixture {
        let store = Arc::new(MemoryDocumentStore::new());
        let dyn_store: Arc<dyn DocumentStore> = store.clone();
        let clock = Arc::new(FixedClock::at("2024-01-01T08:00:00-03:00").unwrap());

        let companies = CompanyRepository::new(dyn_store.clone());
        let employees = EmployeeRepository::new(dyn_store.clone());
        let company_id = companies
            .create(&Company {
                id: String::new(),
                trade_name: "Padaria Central".into(),
                cnpj: "12345678000190".into(),
                contact_name: None,
                email: None,
                phone: None,
                address: None,
                password_hash: String::new(),
                legacy_password: None,
                status: CompanyStatus::Active,
                created_at: clock.now(),
            })
            .await
            .unwrap();
        employees
            .upsert(&Employee {
                id: "12345678909".into(),
                cpf: "12345678909".into(),
                name: "Maria da Silva".into(),
                sector: Some("Caixa".into()),
                base_salary: Decimal::new(250000, 2),
                contract_type: Some("CLT".into()),
                company_id: company_id.clone(),
                created_at: clock.now(),
            })
            .await
            .unwrap();

        let service = ClockService::new(
            employees,
            companies,
            DeviceRepository::new(dyn_store.clone()),
            ClockEventRepository::new(dyn_store),
            clock.clone(),
            require_device,
        );
        Fixture { store, clock, service, company_id }
    }

    fn submission(f: &Fixture, cpf: &str) -> ClockSubmission {
        ClockSubmission {
            employee_id: cpf.into(),
            company_id: f.company_id.clone(),
            ..Default::default()
        }
    }

    fn at(raw: &str) -> chrono::DateTime<chrono::FixedOffset> {
        DateTime::parse_from_rfc3339(raw).unwrap()
    }

    #[tokio::test]
    async fn first_clock_is_entrada_then_saida_with_hours() {
        let f = fixture(false).await;

        let first = f.service.resolve_and_record(submission(&f, "123.456.789-09")).await.unwrap();
        assert_eq!(first.event_type, EventType::Entrada);
        assert_eq!(first.hours, 0.0);
        assert_eq!(first.employee_name, "Maria da Silva");
        assert_eq!(first.event.geolocation.as_deref(), Some(DEFAULT_GEOLOCATION));

        f.clock.set(at("2024-01-01T17:30:00-03:00"));
        let second = f.service.resolve_and_record(submission(&f, "12345678909")).await.unwrap();
        assert_eq!(second.event_type, EventType::Saida);
        assert_eq!(second.hours, 9.5);
        assert_eq!(second.event.hours_worked, 9.5);

        f.clock.set(at("2024-01-02T08:00:00-03:00"));
        let third = f.service.resolve_and_record(submission(&f, "12345678909")).await.unwrap();
        assert_eq!(third.event_type, EventType::Entrada);
    }

    #[tokio::test]
    async fn client_timestamp_is_recorded_but_ignored() {
        let f = fixture(false).await;
        let mut sub = submission(&f, "12345678909");
        sub.client_timestamp = Some("2030-01-01T00:00:00-03:00".into());
        f.service.resolve_and_record(sub).await.unwrap();

        f.clock.set(at("2024-01-01T09:00:00-03:00"));
        let out = f.service.resolve_and_record(submission(&f, "12345678909")).await.unwrap();
        assert_eq!(out.hours, 1.0);

        let history = f.service.history("12345678909").await.unwrap();
        assert_eq!(history[0].timestamp_local.as_deref(), Some("2030-01-01T00:00:00-03:00"));
        assert_eq!(history[0].server_timestamp, at("2024-01-01T08:00:00-03:00"));
    }

    #[tokio::test]
    async fn unknown_employee_writes_nothing() {
        let f = fixture(false).await;
        let err = f.service.resolve_and_record(submission(&f, "99999999999")).await.unwrap_err();
        assert!(matches!(err, AppError::EmployeeNotFound));
        assert!(f.store.query("registros_ponto", &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_cpf_is_invalid_input() {
        let f = fixture(false).await;
        let err = f.service.resolve_and_record(submission(&f, "..-")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput("cpf_required")));
    }

    #[tokio::test]
    async fn blocked_company_cannot_clock() {
        let f = fixture(false).await;
        let patch = json!({"status": "bloqueado"}).as_object().cloned().unwrap();
        f.store.update("clientes", &f.company_id, patch).await.unwrap();

        let err = f.service.resolve_and_record(submission(&f, "12345678909")).await.unwrap_err();
        assert!(matches!(err, AppError::CompanyBlocked));
        assert!(f.store.query("registros_ponto", &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blocked_owner_cannot_clock_through_another_company() {
        let f = fixture(false).await;
        let other_id = CompanyRepository::new(f.store.clone())
            .create(&Company {
                id: String::new(),
                trade_name: "Mercado Vizinho".into(),
                cnpj: "98765432000110".into(),
                contact_name: None,
                email: None,
                phone: None,
                address: None,
                password_hash: String::new(),
                legacy_password: None,
                status: CompanyStatus::Active,
                created_at: f.clock.now(),
            })
            .await
            .unwrap();
        let patch = json!({"status": "bloqueado"}).as_object().cloned().unwrap();
        f.store.update("clientes", &f.company_id, patch).await.unwrap();

        let mut sub = submission(&f, "12345678909");
        sub.company_id = other_id;
        let err = f.service.resolve_and_record(sub).await.unwrap_err();
        assert!(matches!(err, AppError::CompanyBlocked));
        assert!(f.store.query("registros_ponto", &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn company_id_is_recorded_as_sent() {
        let f = fixture(false).await;
        let mut sub = submission(&f, "12345678909");
        sub.company_id = " loja-07 ".into();

        let out = f.service.resolve_and_record(sub).await.unwrap();
        assert_eq!(out.event_type, EventType::Entrada);
        assert_eq!(out.event.company_id.as_deref(), Some(" loja-07 "));

        let history = f.service.history("12345678909").await.unwrap();
        assert_eq!(history[0].company_id.as_deref(), Some(" loja-07 "));
    }

    #[tokio::test]
    async fn device_policy_requires_activated_tablet() {
        let f = fixture(true).await;

        let err = f.service.resolve_and_record(submission(&f, "12345678909")).await.unwrap_err();
        assert!(matches!(err, AppError::DeviceNotAuthorized));

        DeviceRepository::new(f.store.clone())
            .upsert(&Device {
                company_id: f.company_id.clone(),
                machine_id: "tab-01".into(),
                model: Some("Galaxy Tab A".into()),
                active: true,
                activated_at: f.clock.now(),
            })
            .await
            .unwrap();

        let mut sub = submission(&f, "12345678909");
        sub.machine_id = Some("tab-02".into());
        let err = f.service.resolve_and_record(sub.clone()).await.unwrap_err();
        assert!(matches!(err, AppError::DeviceNotAuthorized));

        sub.machine_id = Some("tab-01".into());
        let out = f.service.resolve_and_record(sub).await.unwrap();
        assert_eq!(out.event.machine_id.as_deref(), Some("tab-01"));
    }

    #[tokio::test]
    async fn corrupt_last_event_fails_the_request() {
        let f = fixture(false).await;
        let bad = json!({
            "id_funcionario": "12345678909",
            "tipo": "ENTRADA",
            "timestamp_servidor": "ontem de manhã"
        });
        f.store.add("registros_ponto", bad.as_object().cloned().unwrap()).await.unwrap();

        let err = f.service.resolve_and_record(submission(&f, "12345678909")).await.unwrap_err();
        assert!(matches!(err, AppError::CorruptHistory(_)));
        assert_eq!(f.store.query("registros_ponto", &[]).await.unwrap().len(), 1);
    }

    // Avança um minuto a cada leitura.
    struct StepClock(std::sync::Mutex<chrono::DateTime<chrono::FixedOffset>>);

    impl Clock for StepClock {
        fn now(&self) -> chrono::DateTime<chrono::FixedOffset> {
            let mut current = self.0.lock().unwrap();
            *current += chrono::Duration::minutes(1);
            *current
        }
    }

    #[tokio::test]
    async fn concurrent_taps_alternate_strictly() {
        let mut f = fixture(false).await;
        let clock: Arc<dyn Clock> = Arc::new(StepClock(std::sync::Mutex::new(at("2024-01-01T08:00:00-03:00"))));
        f.service.clock = clock;
        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let service = f.service.clone();
                let sub = submission(&f, "12345678909");
                tokio::spawn(async move { service.resolve_and_record(sub).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let events = f.store.query("registros_ponto", &[]).await.unwrap();
        let entradas = events.iter().filter(|d| d.data["tipo"] == "ENTRADA").count();
        let saidas = events.iter().filter(|d| d.data["tipo"] == "SAÍDA").count();
        assert_eq!((entradas, saidas), (3, 3));
        assert!(f.service.locks.is_empty());
    }

    #[tokio::test]
    async fn history_is_chronological() {
        let f = fixture(false).await;
        for t in ["2024-01-01T08:00:00-03:00", "2024-01-01T12:00:00-03:00", "2024-01-01T13:00:00-03:00"] {
            f.clock.set(at(t));
            f.service.resolve_and_record(submission(&f, "12345678909")).await.unwrap();
        }
        let history = f.service.history("123.456.789-09").await.unwrap();
        let kinds: Vec<EventType> = history.iter().map(|e| e.event_type).collect();
        assert_eq!(kinds, [EventType::Entrada, EventType::Saida, EventType::Entrada]);
        assert!(history.windows(2).all(|w| w[0].server_timestamp <= w[1].server_timestamp));
    }
}
