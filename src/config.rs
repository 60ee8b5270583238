// src/config.rs

use std::{env, fs, path::Path, sync::Arc, time::Duration};

use anyhow::Context;
use serde::Deserialize;

use crate::{
    common::{
        i18n::I18nStore,
        time::{fixed_offset, Clock, SystemClock, DEFAULT_UTC_OFFSET_HOURS},
    },
    db::{
        ClockEventRepository, CompanyRepository, DeviceRepository, DocumentStore, EmployeeRepository,
        MemoryDocumentStore, PgDocumentStore,
    },
    services::{AfdService, ClockService, CompanyService, EmployeeService},
};

const DEFAULT_CREDENTIALS_FILE: &str = "store_credentials.json";
const DEFAULT_PORT: u16 = 5000;

/// Credenciais do store, lidas de `STORE_CREDENTIALS` (JSON) ou de arquivo.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StoreCredentials {
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    3
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` => store em memória.
    pub store: Option<StoreCredentials>,
    pub utc_offset_hours: i32,
    pub require_device_activation: bool,
    pub bcrypt_cost: u32,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: None,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            require_device_activation: false,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let utc_offset_hours = parse_var("UTC_OFFSET_HOURS", DEFAULT_UTC_OFFSET_HOURS)?;
        if !(-23..=23).contains(&utc_offset_hours) {
            anyhow::bail!("UTC_OFFSET_HOURS fora do intervalo -23..=23: {}", utc_offset_hours);
        }

        let bcrypt_cost = parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            anyhow::bail!("BCRYPT_COST fora do intervalo 4..=31: {}", bcrypt_cost);
        }

        Ok(Self {
            store: load_store_credentials()?,
            utc_offset_hours,
            require_device_activation: parse_bool_var("REQUIRE_DEVICE_ACTIVATION")?,
            bcrypt_cost,
            port: parse_var("PORT", DEFAULT_PORT)?,
        })
    }
}

// Ordem: STORE_CREDENTIALS (JSON) -> arquivo -> DATABASE_URL -> nada (memória).
fn load_store_credentials() -> anyhow::Result<Option<StoreCredentials>> {
    if let Ok(blob) = env::var("STORE_CREDENTIALS") {
        return parse_credentials(&blob)
            .context("STORE_CREDENTIALS não é um JSON de credenciais válido")
            .map(Some);
    }

    let file = env::var("STORE_CREDENTIALS_FILE").unwrap_or_else(|_| DEFAULT_CREDENTIALS_FILE.to_string());
    if Path::new(&file).exists() {
        let blob = fs::read_to_string(&file).with_context(|| format!("Falha ao ler {}", file))?;
        return parse_credentials(&blob)
            .with_context(|| format!("{} não contém credenciais válidas", file))
            .map(Some);
    }

    Ok(env::var("DATABASE_URL").ok().map(|database_url| StoreCredentials {
        database_url,
        max_connections: default_max_connections(),
        acquire_timeout_secs: default_acquire_timeout_secs(),
    }))
}

pub fn parse_credentials(blob: &str) -> anyhow::Result<StoreCredentials> {
    Ok(serde_json::from_str(blob)?)
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválido ({}): {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}

fn parse_bool_var(name: &str) -> anyhow::Result<bool> {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "sim" | "yes" => Ok(true),
            "0" | "false" | "nao" | "não" | "no" | "" => Ok(false),
            other => anyhow::bail!("{} inválido: {}", name, other),
        },
        Err(_) => Ok(false),
    }
}

// O estado compartilhado, montado uma vez no início e injetado nos handlers
#[derive(Clone)]
pub struct AppState {
    pub i18n_store: Arc<I18nStore>,
    pub company_service: CompanyService,
    pub employee_service: EmployeeService,
    pub clock_service: ClockService,
    pub afd_service: AfdService,
}

impl AppState {
    /// Conecta ao store configurado e monta o gráfico de dependências.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn DocumentStore> = match &config.store {
            Some(creds) => Arc::new(
                PgDocumentStore::connect(
                    &creds.database_url,
                    creds.max_connections,
                    Duration::from_secs(creds.acquire_timeout_secs),
                )
                .await?,
            ),
            None => {
                tracing::warn!("⚠️ Nenhuma credencial de store configurada: usando store em memória (dados não persistem)");
                Arc::new(MemoryDocumentStore::new())
            }
        };

        let clock = Arc::new(SystemClock::new(fixed_offset(config.utc_offset_hours)?));
        Ok(Self::with_store(store, clock, config))
    }

    /// Monta o estado sobre um store e relógio já prontos (usado também nos testes).
    pub fn with_store(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>, config: &Config) -> Self {
        let companies = CompanyRepository::new(store.clone());
        let employees = EmployeeRepository::new(store.clone());
        let events = ClockEventRepository::new(store.clone());
        let devices = DeviceRepository::new(store);

        let company_service =
            CompanyService::new(companies.clone(), devices.clone(), clock.clone(), config.bcrypt_cost);
        let employee_service = EmployeeService::new(employees.clone(), clock.clone());
        let clock_service = ClockService::new(
            employees,
            companies.clone(),
            devices,
            events.clone(),
            clock.clone(),
            config.require_device_activation,
        );
        let afd_service = AfdService::new(companies, events, clock);

        Self {
            i18n_store: Arc::new(I18nStore::new()),
            company_service,
            employee_service,
            clock_service,
            afd_service,
        }
    }
}
