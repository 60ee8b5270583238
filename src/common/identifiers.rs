// src/common/identifiers.rs

// ---
// Normalização de CPF / CNPJ
// ---
// Todo CPF e CNPJ passa por aqui antes de virar chave ou filtro no store,
// tanto na escrita quanto na leitura.

/// Remove todo caractere que não seja dígito decimal, preservando a ordem.
///
/// `"123.456.789-09"` -> `"12345678909"`, `"12.345.678/0001-90"` -> `"12345678000190"`.
pub fn normalize_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normaliza e rejeita o vazio. Devolve `None` quando não sobra nenhum dígito.
pub fn normalized_non_empty(raw: &str) -> Option<String> {
    let digits = normalize_digits(raw);
    if digits.is_empty() { None } else { Some(digits) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_cpf_and_cnpj_punctuation() {
        assert_eq!(normalize_digits("123.456.789-09"), "12345678909");
        assert_eq!(normalize_digits("12.345.678/0001-90"), "12345678000190");
        assert_eq!(normalize_digits(" 1a2b3 "), "123");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["", "abc", "000.111.222-33", "12.345.678/0001-90", "٣12"] {
            let once = normalize_digits(raw);
            assert_eq!(normalize_digits(&once), once);
        }
    }

    #[test]
    fn keeps_only_ascii_digits_in_order() {
        let raw = "9x8-7.6/5 4";
        let out = normalize_digits(raw);
        let expected: String = raw.chars().filter(char::is_ascii_digit).collect();
        assert_eq!(out, expected);
        assert_eq!(out, "987654");
    }

    #[test]
    fn empty_after_normalization_is_rejected() {
        assert_eq!(normalized_non_empty("..-/"), None);
        assert_eq!(normalized_non_empty("1-2"), Some("12".to_string()));
    }
}
