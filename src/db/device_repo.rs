// src/db/device_repo.rs

use std::sync::Arc;

use serde_json::Value;

use super::document_store::{to_document, DocumentStore};
use crate::{common::error::AppError, models::device::Device};

pub const DEVICES: &str = "dispositivos";

#[derive(Clone)]
pub struct DeviceRepository {
    store: Arc<dyn DocumentStore>,
}

impl DeviceRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Ativa (ou reativa) o tablet para o cliente.
    pub async fn upsert(&self, device: &Device) -> Result<(), AppError> {
        let id = Device::document_id(&device.company_id, &device.machine_id);
        self.store.set(DEVICES, &id, to_document(device)?, true).await
    }

    pub async fn find(&self, company_id: &str, machine_id: &str) -> Result<Option<Device>, AppError> {
        let id = Device::document_id(company_id, machine_id);
        match self.store.get(DEVICES, &id).await? {
            Some(doc) => serde_json::from_value(Value::Object(doc.data))
                .map(Some)
                .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("Dispositivo {} ilegível: {}", id, e))),
            None => Ok(None),
        }
    }
}
