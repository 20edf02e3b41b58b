//! Olinda OData integration for the Top 5 monthly market expectations.

use chrono::NaiveDate;
use log::{debug, info};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::FetchConfig;
use crate::error::AppError;

pub const BASE_URL: &str =
    "https://olinda.bcb.gov.br/olinda/servico/Expectativas/versao/v1/odata/ExpectativasMercadoTop5Mensais";

pub const DEFAULT_INDICATOR: &str = "IPCA";
/// Calculation type `L`: the short-horizon (monthly) Top 5 ranking.
pub const DEFAULT_CALC_TYPE: &str = "L";

pub struct OlindaClient {
    client: Client,
}

impl OlindaClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Issue the filtered query and return the response's `value` array untouched.
    pub fn fetch_expectations(&self, config: &FetchConfig) -> Result<Vec<Value>, AppError> {
        let url = build_url(config)?;
        info!("querying {} survey window {} to {}", config.indicator, config.start, config.end);
        debug!("GET {url}");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::fetch(format!("Expectations request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::fetch(format!(
                "Expectations request failed with status {}.",
                resp.status()
            )));
        }

        let body: ODataResponse = resp
            .json()
            .map_err(|e| AppError::fetch(format!("Failed to parse expectations response: {e}")))?;

        info!("{} records received", body.value.len());
        Ok(body.value)
    }
}

impl Default for OlindaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ODataResponse {
    value: Vec<Value>,
}

/// OData `$filter` expression: indicator, calculation type and survey date window.
pub fn build_filter(indicator: &str, calc_type: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "Indicador eq '{indicator}' and tipoCalculo eq '{calc_type}' and Data ge '{}' and Data le '{}'",
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d"),
    )
}

/// Full request URL with `$filter`, `$format` and `$orderby`.
///
/// The query is set as a raw string so spaces go out as `%20`; the endpoint does
/// not accept form-style `+` inside the filter expression.
pub fn build_url(config: &FetchConfig) -> Result<Url, AppError> {
    if config.start > config.end {
        return Err(AppError::io(format!(
            "Survey window start {} is after end {}.",
            config.start, config.end
        )));
    }

    let mut url = Url::parse(&config.base_url)
        .map_err(|e| AppError::io(format!("Invalid base URL '{}': {e}", config.base_url)))?;
    let filter = build_filter(&config.indicator, &config.calc_type, config.start, config.end);
    url.set_query(Some(&format!("$filter={filter}&$format=json&$orderby=Data desc")));
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> FetchConfig {
        FetchConfig {
            base_url: BASE_URL.to_string(),
            indicator: DEFAULT_INDICATOR.to_string(),
            calc_type: DEFAULT_CALC_TYPE.to_string(),
            start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 1, 22).unwrap(),
            snapshot: PathBuf::from("expectativas_filtradas.json"),
        }
    }

    #[test]
    fn filter_expression_matches_window() {
        let c = config();
        let f = build_filter(&c.indicator, &c.calc_type, c.start, c.end);
        assert_eq!(
            f,
            "Indicador eq 'IPCA' and tipoCalculo eq 'L' and Data ge '2026-01-01' and Data le '2026-01-22'"
        );
    }

    #[test]
    fn url_carries_odata_parameters() {
        let url = build_url(&config()).unwrap();
        let s = url.as_str();
        assert!(s.starts_with(BASE_URL), "{s}");
        assert!(s.contains("$filter=Indicador%20eq%20"), "{s}");
        assert!(s.contains("$format=json"), "{s}");
        assert!(s.contains("$orderby=Data%20desc"), "{s}");
        assert!(!s.contains(' '));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let mut c = config();
        c.start = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let err = build_url(&c).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_IO);
    }

    #[test]
    fn response_body_exposes_value_array() {
        let body: ODataResponse =
            serde_json::from_str(r#"{"@odata.context": "x", "value": [{"Data": "2026-01-22"}]}"#).unwrap();
        assert_eq!(body.value.len(), 1);
        assert_eq!(body.value[0]["Data"], "2026-01-22");
    }
}
