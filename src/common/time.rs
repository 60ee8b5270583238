// src/common/time.rs

use std::sync::Mutex;

use chrono::{DateTime, FixedOffset, Utc};

// ---
// Fuso fixo do sistema
// ---
// Todos os timestamps persistidos e comparados usam o mesmo offset (padrão UTC-3).

pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -3;

/// Constrói o offset fixo a partir de horas inteiras (ex: -3 => UTC-03:00).
pub fn fixed_offset(hours: i32) -> anyhow::Result<FixedOffset> {
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| anyhow::anyhow!("Offset UTC inválido: {} horas", hours))
}

/// Fonte de tempo do servidor. O timestamp autoritativo de cada evento vem daqui.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Relógio de produção: hora do sistema convertida para o offset configurado.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Relógio controlado manualmente, usado nos testes.
#[derive(Debug)]
pub struct FixedClock {
    current: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self { current: Mutex::new(at) }
    }

    /// Atalho para testes: `FixedClock::at("2024-01-01T08:00:00-03:00")`.
    pub fn at(rfc3339: &str) -> anyhow::Result<Self> {
        Ok(Self::new(DateTime::parse_from_rfc3339(rfc3339)?))
    }

    pub fn set(&self, at: DateTime<FixedOffset>) {
        match self.current.lock() {
            Ok(mut guard) => *guard = at,
            Err(poisoned) => *poisoned.into_inner() = at,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.current.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
