// src/services/afd_service.rs

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::{
    common::{error::AppError, identifiers::normalize_digits, time::Clock},
    db::{ClockEventRepository, CompanyRepository},
    models::{clock::ClockEvent, company::Company},
    services::clock_resolver::sort_oldest_first,
};

// ---
// Exportação AFD (Arquivo Fonte de Dados)
// ---
// Layout simplificado: cabeçalho (tipo 1), uma marcação por registro (tipo 3)
// e trailer (tipo 9). Linhas terminadas em CRLF.

const COMPANY_NAME_WIDTH: usize = 150;

#[derive(Clone)]
pub struct AfdService {
    companies: CompanyRepository,
    events: ClockEventRepository,
    clock: Arc<dyn Clock>,
}

impl AfdService {
    pub fn new(companies: CompanyRepository, events: ClockEventRepository, clock: Arc<dyn Clock>) -> Self {
        Self { companies, events, clock }
    }

    pub async fn export(&self, company_id: &str) -> Result<String, AppError> {
        let company = self
            .companies
            .find_by_id(company_id)
            .await?
            .ok_or(AppError::CompanyNotFound)?;

        let mut events = self.events.list_by_company(&company.id).await?;
        sort_oldest_first(&mut events);

        tracing::info!(company_id = %company.id, registros = events.len(), "📄 AFD gerado");
        Ok(render_afd(&company, &events, self.clock.now()))
    }
}

/// Monta o arquivo. `events` precisa estar em ordem cronológica.
pub fn render_afd(company: &Company, events: &[ClockEvent], generated_at: DateTime<FixedOffset>) -> String {
    let offset = *generated_at.offset();
    let local = |ts: &DateTime<FixedOffset>| ts.with_timezone(&offset);

    let first = events.first().map(|e| local(&e.server_timestamp)).unwrap_or(generated_at);
    let last = events.last().map(|e| local(&e.server_timestamp)).unwrap_or(generated_at);

    let mut lines = Vec::with_capacity(events.len() + 2);

    lines.push(format!(
        "{nsr}1{id_type}{cnpj}{cei}{name}{rep}{first}{last}{generated}",
        nsr = "000000000",
        id_type = 1,
        cnpj = left_zero_pad(&normalize_digits(&company.cnpj), 14),
        cei = "0".repeat(12),
        name = right_space_pad(&company.trade_name, COMPANY_NAME_WIDTH),
        rep = "0".repeat(17),
        first = first.format("%d%m%Y"),
        last = last.format("%d%m%Y"),
        generated = generated_at.format("%d%m%Y%H%M"),
    ));

    for (index, event) in events.iter().enumerate() {
        let at = local(&event.server_timestamp);
        lines.push(format!(
            "{nsr:09}3{date}{time}{worker}",
            nsr = index + 1,
            date = at.format("%d%m%Y"),
            time = at.format("%H%M"),
            worker = left_zero_pad(&normalize_digits(&event.employee_id), 12),
        ));
    }

    lines.push(format!("999999999{:09}{:09}{:09}{:09}9", 0, events.len(), 0, 0));

    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

// Zeros à esquerda; se passar da largura, fica com os dígitos finais.
fn left_zero_pad(digits: &str, width: usize) -> String {
    if digits.len() >= width {
        digits[digits.len() - width..].to_string()
    } else {
        format!("{}{}", "0".repeat(width - digits.len()), digits)
    }
}

fn right_space_pad(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}
