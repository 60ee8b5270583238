// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "pt";

// Tabela (idioma, chave, mensagem). Português é o idioma de referência.
const MESSAGES: &[(&str, &str, &str)] = &[
    ("pt", "validation_error", "Um ou mais campos são inválidos."),
    ("en", "validation_error", "One or more fields are invalid."),
    ("pt", "cpf_required", "CPF é obrigatório"),
    ("en", "cpf_required", "CPF is required"),
    ("pt", "cnpj_required", "CNPJ é obrigatório"),
    ("en", "cnpj_required", "CNPJ is required"),
    ("pt", "company_required", "Cliente é obrigatório"),
    ("en", "company_required", "Company is required"),
    ("pt", "machine_id_required", "machine_id é obrigatório"),
    ("en", "machine_id_required", "machine_id is required"),
    ("pt", "password_required", "Senha é obrigatória"),
    ("en", "password_required", "Password is required"),
    ("pt", "invalid_status", "Status inválido (use 'ativo' ou 'bloqueado')"),
    ("en", "invalid_status", "Invalid status (use 'ativo' or 'bloqueado')"),
    ("pt", "invalid_salary", "Salário base inválido"),
    ("en", "invalid_salary", "Invalid base salary"),
    ("pt", "employee_not_found", "Funcionário não encontrado"),
    ("en", "employee_not_found", "Employee not found"),
    ("pt", "company_not_found", "Cliente não encontrado"),
    ("en", "company_not_found", "Company not found"),
    ("pt", "invalid_credentials", "CNPJ ou Senha incorretos"),
    ("en", "invalid_credentials", "Wrong CNPJ or password"),
    ("pt", "device_not_authorized", "Dispositivo não autorizado para este cliente"),
    ("en", "device_not_authorized", "Device not authorized for this company"),
    ("pt", "company_blocked", "Cliente bloqueado"),
    ("en", "company_blocked", "Company is blocked"),
    ("pt", "corrupt_history", "Histórico de ponto corrompido"),
    ("en", "corrupt_history", "Clock history is corrupted"),
    ("pt", "store_unavailable", "Armazenamento indisponível"),
    ("en", "store_unavailable", "Storage unavailable"),
    ("pt", "internal_error", "Ocorreu um erro inesperado."),
    ("en", "internal_error", "An unexpected error occurred."),
];

/// Mensagens de erro por idioma. Idioma desconhecido cai no português;
/// chave desconhecida devolve a própria chave.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<(String, String), String>,
}

impl I18nStore {
    pub fn new() -> Self {
        let messages = MESSAGES
            .iter()
            .map(|(lang, key, msg)| ((lang.to_string(), key.to_string()), msg.to_string()))
            .collect();
        Self { messages }
    }

    pub fn get(&self, lang: &str, key: &str) -> String {
        self.messages
            .get(&(lang.to_string(), key.to_string()))
            .or_else(|| self.messages.get(&(DEFAULT_LANG.to_string(), key.to_string())))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_portuguese_then_key() {
        let store = I18nStore::new();
        assert_eq!(store.get("en", "employee_not_found"), "Employee not found");
        assert_eq!(store.get("fr", "employee_not_found"), "Funcionário não encontrado");
        assert_eq!(store.get("pt", "sem_chave"), "sem_chave");
    }
}
