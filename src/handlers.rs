pub mod clock;
pub mod companies;
pub mod employees;

use serde_json::Value;

// Campos que o painel/tablet manda ora como texto, ora como número.
pub(crate) fn loose_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
