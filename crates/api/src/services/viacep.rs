//! ViaCEP postal-code lookup client.

use serde::{Deserialize, Serialize};

/// A resolved postal address.
#[derive(Debug, Clone, Serialize)]
pub struct CepAddress {
    pub cep: String,
    pub logradouro: String,
    pub bairro: String,
    pub cidade: String,
    pub uf: String,
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    erro: Option<serde_json::Value>,
    #[serde(default)]
    cep: String,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    /// ViaCEP calls the city "localidade".
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
}

/// Strip separators from a CEP; returns `None` unless exactly 8 digits remain.
#[must_use]
pub fn sanitize_cep(cep: &str) -> Option<String> {
    let digits: String = cep.chars().filter(|c| *c != '-' && *c != '.').collect();
    if digits.len() == 8 && digits.chars().all(|c| c.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}

/// ViaCEP API client.
#[derive(Clone)]
pub struct ViaCepClient {
    http: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    /// Create a new ViaCEP client.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Look up an address by CEP.
    ///
    /// Returns `None` for malformed CEPs, unknown CEPs, and lookup failures;
    /// callers treat all three the same way (not found / fallback fee).
    pub async fn get_address(&self, cep: &str) -> Option<CepAddress> {
        let cep = sanitize_cep(cep)?;

        let response = self
            .http
            .get(format!("{}/ws/{cep}/json/", self.base_url))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "CEP lookup failed");
                return None;
            }
        };

        let body: ViaCepResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = %e, "CEP response parse failed");
                return None;
            }
        };

        // ViaCEP reports unknown CEPs as 200 with an "erro" marker
        if body.erro.is_some() {
            return None;
        }

        Some(CepAddress {
            cep: body.cep,
            logradouro: body.logradouro,
            bairro: body.bairro,
            cidade: body.localidade,
            uf: body.uf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_cep_plain() {
        assert_eq!(sanitize_cep("01310100").as_deref(), Some("01310100"));
    }

    #[test]
    fn test_sanitize_cep_with_separators() {
        assert_eq!(sanitize_cep("01310-100").as_deref(), Some("01310100"));
        assert_eq!(sanitize_cep("01.310-100").as_deref(), Some("01310100"));
    }

    #[test]
    fn test_sanitize_cep_wrong_length() {
        assert_eq!(sanitize_cep("0131010"), None);
        assert_eq!(sanitize_cep("013101000"), None);
    }

    #[test]
    fn test_sanitize_cep_non_digits() {
        assert_eq!(sanitize_cep("abcd-efgh"), None);
    }
}
