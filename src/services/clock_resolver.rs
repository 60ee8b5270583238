// src/services/clock_resolver.rs

use chrono::{DateTime, FixedOffset};

use crate::models::clock::{ClockEvent, EventType};

// ---
// Resolução ENTRADA / SAÍDA
// ---
// O estado do funcionário não é gravado em lugar nenhum: é derivado do histórico
// a cada batida. NO_HISTORY -> ENTRADA, CLOCKED_IN -> SAÍDA, CLOCKED_OUT -> ENTRADA.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftState {
    NoHistory,
    ClockedIn { since: DateTime<FixedOffset> },
    ClockedOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub event_type: EventType,
    pub hours: f64,
}

/// Mais recente primeiro. Ordenação estável: empates mantêm a ordem devolvida
/// pelo store, e o primeiro deles vira o "último" evento.
pub fn sort_newest_first(events: &mut [ClockEvent]) {
    events.sort_by(|a, b| b.server_timestamp.cmp(&a.server_timestamp));
}

/// Mais antigo primeiro (relatórios).
pub fn sort_oldest_first(events: &mut [ClockEvent]) {
    events.sort_by(|a, b| a.server_timestamp.cmp(&b.server_timestamp));
}

/// Estado a partir de um histórico já ordenado com `sort_newest_first`.
pub fn derive_state(newest_first: &[ClockEvent]) -> ShiftState {
    match newest_first.first() {
        None => ShiftState::NoHistory,
        Some(last) => match last.event_type {
            EventType::Entrada => ShiftState::ClockedIn { since: last.server_timestamp },
            EventType::Saida => ShiftState::ClockedOut,
        },
    }
}

/// Próxima marcação para o estado atual, batendo em `now`.
pub fn resolve(state: ShiftState, now: DateTime<FixedOffset>) -> Resolution {
    match state {
        ShiftState::NoHistory | ShiftState::ClockedOut => Resolution {
            event_type: EventType::Entrada,
            hours: 0.0,
        },
        ShiftState::ClockedIn { since } => Resolution {
            event_type: EventType::Saida,
            hours: elapsed_hours(since, now),
        },
    }
}

/// Horas decimais entre dois instantes, arredondadas em duas casas.
/// Pode ser negativo se o histórico estiver no futuro; quem chama decide o que fazer.
pub fn elapsed_hours(from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> f64 {
    let seconds = (to - from).num_milliseconds() as f64 / 1000.0;
    let hours = (seconds / 3600.0 * 100.0).round() / 100.0;
    // -0.0 sairia como "-0.0" no JSON
    if hours == 0.0 { 0.0 } else { hours }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(raw: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(raw).unwrap()
    }

    fn event(id: &str, event_type: EventType, at: &str) -> ClockEvent {
        ClockEvent {
            id: id.to_string(),
            employee_id: "12345678909".into(),
            employee_name: Some("Maria".into()),
            company_id: Some("c1".into()),
            event_type,
            server_timestamp: ts(at),
            hours_worked: 0.0,
            geolocation: None,
            machine_id: None,
            timestamp_local: None,
        }
    }

    fn next(mut history: Vec<ClockEvent>, now: &str) -> Resolution {
        sort_newest_first(&mut history);
        resolve(derive_state(&history), ts(now))
    }

    #[test]
    fn empty_history_starts_a_shift() {
        let r = next(vec![], "2024-01-01T08:00:00-03:00");
        assert_eq!(r.event_type, EventType::Entrada);
        assert_eq!(r.hours, 0.0);
    }

    #[test]
    fn open_shift_is_closed_with_elapsed_hours() {
        let history = vec![event("a", EventType::Entrada, "2024-01-01T08:00:00-03:00")];
        let r = next(history, "2024-01-01T17:30:00-03:00");
        assert_eq!(r.event_type, EventType::Saida);
        assert_eq!(r.hours, 9.5);
    }

    #[test]
    fn closed_shift_opens_a_new_one() {
        let history = vec![
            event("a", EventType::Entrada, "2024-01-01T08:00:00-03:00"),
            event("b", EventType::Saida, "2024-01-01T12:00:00-03:00"),
        ];
        let r = next(history, "2024-01-01T13:00:00-03:00");
        assert_eq!(r.event_type, EventType::Entrada);
        assert_eq!(r.hours, 0.0);
    }

    #[test]
    fn last_event_is_the_newest_regardless_of_store_order() {
        // Store devolveu fora de ordem: a SAÍDA das 12h é a mais recente.
        let history = vec![
            event("b", EventType::Saida, "2024-01-01T12:00:00-03:00"),
            event("a", EventType::Entrada, "2024-01-01T08:00:00-03:00"),
            event("c", EventType::Entrada, "2023-12-31T22:00:00-03:00"),
        ];
        let r = next(history, "2024-01-01T13:00:00-03:00");
        assert_eq!(r.event_type, EventType::Entrada);
    }

    #[test]
    fn shift_crossing_midnight_is_closed() {
        let history = vec![event("a", EventType::Entrada, "2024-01-01T22:00:00-03:00")];
        let r = next(history, "2024-01-02T06:15:00-03:00");
        assert_eq!(r.event_type, EventType::Saida);
        assert_eq!(r.hours, 8.25);
    }

    #[test]
    fn timestamps_in_other_offsets_compare_as_instants() {
        // 11:00Z == 08:00-03:00
        let history = vec![event("a", EventType::Entrada, "2024-01-01T11:00:00+00:00")];
        let r = next(history, "2024-01-01T10:00:00-03:00");
        assert_eq!(r.hours, 2.0);
    }

    #[test]
    fn ties_pick_exactly_one_last_event_deterministically() {
        let history = vec![
            event("first", EventType::Saida, "2024-01-01T12:00:00-03:00"),
            event("second", EventType::Entrada, "2024-01-01T12:00:00-03:00"),
        ];
        let mut sorted = history.clone();
        sort_newest_first(&mut sorted);
        assert_eq!(sorted[0].id, "first");

        let r = next(history, "2024-01-01T13:00:00-03:00");
        assert_eq!(r.event_type, EventType::Entrada);
    }

    #[test]
    fn hours_are_rounded_to_two_decimals() {
        let from = ts("2024-01-01T08:00:00-03:00");
        assert_eq!(elapsed_hours(from, ts("2024-01-01T08:20:00-03:00")), 0.33);
        assert_eq!(elapsed_hours(from, ts("2024-01-01T08:40:00-03:00")), 0.67);
        assert_eq!(elapsed_hours(from, ts("2024-01-01T09:00:30-03:00")), 1.01);
    }

    #[test]
    fn negative_elapsed_time_is_not_clamped() {
        let history = vec![event("a", EventType::Entrada, "2024-01-01T10:00:00-03:00")];
        let r = next(history, "2024-01-01T09:00:00-03:00");
        assert_eq!(r.event_type, EventType::Saida);
        assert_eq!(r.hours, -1.0);
    }

    #[test]
    fn tiny_negative_elapsed_time_rounds_to_plain_zero() {
        let from = ts("2024-01-01T08:00:10-03:00");
        let hours = elapsed_hours(from, ts("2024-01-01T08:00:00-03:00"));
        assert_eq!(hours, 0.0);
        assert!(hours.is_sign_positive());
        assert_eq!(serde_json::to_string(&hours).unwrap(), "0.0");
    }

    #[test]
    fn report_order_is_non_decreasing() {
        let mut history = vec![
            event("b", EventType::Saida, "2024-01-01T12:00:00-03:00"),
            event("c", EventType::Entrada, "2024-01-02T08:00:00-03:00"),
            event("a", EventType::Entrada, "2024-01-01T08:00:00-03:00"),
        ];
        sort_oldest_first(&mut history);
        let ids: Vec<&str> = history.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert!(history.windows(2).all(|w| w[0].server_timestamp <= w[1].server_timestamp));
    }
}
