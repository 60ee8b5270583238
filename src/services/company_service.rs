// src/services/company_service.rs

use std::sync::Arc;

use serde_json::{json, Value};

use crate::{
    common::{
        error::AppError,
        identifiers::{normalize_digits, normalized_non_empty},
        time::Clock,
    },
    db::{CompanyRepository, DeviceRepository, Document},
    models::{
        company::{Company, CompanyStatus, TabletLoginResponse},
        device::Device,
    },
};

/// Dados para cadastrar um cliente.
#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    pub name: String,
    pub cnpj: String,
    pub password: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Value>,
}

/// Alteração parcial: só os campos presentes são gravados.
#[derive(Debug, Clone, Default)]
pub struct CompanyChanges {
    pub name: Option<String>,
    pub cnpj: Option<String>,
    pub password: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Value>,
    pub status: Option<String>,
}

#[derive(Clone)]
pub struct CompanyService {
    repo: CompanyRepository,
    devices: DeviceRepository,
    clock: Arc<dyn Clock>,
    bcrypt_cost: u32,
}

impl CompanyService {
    pub fn new(
        repo: CompanyRepository,
        devices: DeviceRepository,
        clock: Arc<dyn Clock>,
        bcrypt_cost: u32,
    ) -> Self {
        Self { repo, devices, clock, bcrypt_cost }
    }

    pub async fn create_company(&self, new: NewCompany) -> Result<Company, AppError> {
        let cnpj = normalized_non_empty(&new.cnpj).ok_or(AppError::InvalidInput("cnpj_required"))?;
        if new.password.is_empty() {
            return Err(AppError::InvalidInput("password_required"));
        }

        let password_hash = self.hash_password(new.password).await?;

        let mut company = Company {
            id: String::new(),
            trade_name: new.name,
            cnpj,
            contact_name: new.contact_name,
            email: new.email,
            phone: new.phone,
            address: new.address,
            password_hash,
            legacy_password: None,
            status: CompanyStatus::Active,
            created_at: self.clock.now(),
        };
        company.id = self.repo.create(&company).await?;

        tracing::info!(company_id = %company.id, "🏢 Cliente cadastrado");
        Ok(company)
    }

    /// Todos os clientes, ordenados pelo nome (sem diferenciar maiúsculas).
    pub async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        let mut companies = self.repo.list_all().await?;
        companies.sort_by_key(|c| c.trade_name.to_lowercase());
        Ok(companies)
    }

    pub async fn update_company(&self, id: &str, changes: CompanyChanges) -> Result<(), AppError> {
        let mut patch = Document::new();

        if let Some(name) = changes.name {
            patch.insert("nome_fantasia".into(), json!(name));
        }
        if let Some(raw) = changes.cnpj {
            let cnpj = normalized_non_empty(&raw).ok_or(AppError::InvalidInput("cnpj_required"))?;
            patch.insert("cnpj".into(), json!(cnpj));
        }
        if let Some(status) = changes.status {
            let status = CompanyStatus::parse(&status).ok_or(AppError::InvalidInput("invalid_status"))?;
            patch.insert("status".into(), json!(status.as_str()));
        }
        if let Some(v) = changes.contact_name {
            patch.insert("responsavel".into(), json!(v));
        }
        if let Some(v) = changes.email {
            patch.insert("email".into(), json!(v));
        }
        if let Some(v) = changes.phone {
            patch.insert("telefone".into(), json!(v));
        }
        if let Some(v) = changes.address {
            patch.insert("endereco".into(), v);
        }
        if let Some(password) = changes.password.filter(|p| !p.is_empty()) {
            patch.insert("senha_hash".into(), json!(self.hash_password(password).await?));
            // Apaga a senha em texto puro de cadastros antigos
            patch.insert("senha_acesso".into(), Value::Null);
        }

        if patch.is_empty() {
            return self.repo.find_by_id(id).await?.map(|_| ()).ok_or(AppError::CompanyNotFound);
        }

        if !self.repo.update(id, patch).await? {
            return Err(AppError::CompanyNotFound);
        }
        Ok(())
    }

    pub async fn delete_company(&self, id: &str) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::CompanyNotFound);
        }
        tracing::info!(company_id = %id, "🗑️ Cliente removido");
        Ok(())
    }

    pub async fn find_company(&self, id: &str) -> Result<Company, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::CompanyNotFound)
    }

    /// Login do tablet: CNPJ sempre comparado só com dígitos.
    pub async fn login_tablet(&self, raw_cnpj: &str, password: &str) -> Result<TabletLoginResponse, AppError> {
        let cnpj = normalized_non_empty(raw_cnpj).ok_or(AppError::InvalidCredentials)?;

        let mut candidates = self.repo.find_by_cnpj(&cnpj).await?;
        if candidates.is_empty() {
            // Cadastros antigos podem ter o CNPJ gravado com pontuação
            candidates = self
                .repo
                .list_all()
                .await?
                .into_iter()
                .filter(|c| normalize_digits(&c.cnpj) == cnpj)
                .collect();
        }

        for company in candidates {
            if self.verify_password(&company, password).await? {
                if !company.is_active() {
                    return Err(AppError::CompanyBlocked);
                }
                return Ok(TabletLoginResponse { id: company.id, nome: company.trade_name });
            }
        }

        Err(AppError::InvalidCredentials)
    }

    /// Pareia (ou reativa) um tablet com o cliente.
    pub async fn activate_device(
        &self,
        company_id: &str,
        machine_id: &str,
        model: Option<String>,
    ) -> Result<Device, AppError> {
        let machine_id = machine_id.trim();
        if machine_id.is_empty() {
            return Err(AppError::InvalidInput("machine_id_required"));
        }

        let company = self.find_company(company_id).await?;
        if !company.is_active() {
            return Err(AppError::CompanyBlocked);
        }

        let device = Device {
            company_id: company.id,
            machine_id: machine_id.to_string(),
            model,
            active: true,
            activated_at: self.clock.now(),
        };
        self.devices.upsert(&device).await?;

        tracing::info!(company_id = %device.company_id, machine_id = %device.machine_id, "📱 Dispositivo ativado");
        Ok(device)
    }

    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    async fn verify_password(&self, company: &Company, password: &str) -> Result<bool, AppError> {
        if !company.password_hash.is_empty() {
            let password = password.to_owned();
            let hash = company.password_hash.clone();
            let valid = tokio::task::spawn_blocking(move || bcrypt::verify(&password, &hash))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
            return Ok(valid);
        }

        match company.legacy_password.as_deref() {
            Some(legacy) if !legacy.is_empty() && legacy == password => {
                tracing::warn!(company_id = %company.id, "⚠️ Login com senha legada em texto puro; atualize a senha do cliente");
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
