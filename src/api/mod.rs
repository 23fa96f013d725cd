use crate::models::{SearchOption, SearchSource};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Network,
    Http,
    Parse,
    /// Well-formed JSON that is not a `{ success: true, data: [...] }` envelope.
    Payload,
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }

    fn payload(data: &serde_json::Value) -> Self {
        Self {
            kind: ApiErrorKind::Payload,
            message: format!("Unexpected search payload: {data}"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:6689";
pub(crate) const DEFAULT_LOOKUP_DEBOUNCE_MS: u32 = 500;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct EnvConfig {
    pub api_url: String,

    /// Quiet period before a typed lookup query is committed.
    pub lookup_debounce_ms: u32,

    pub log_level: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let mut api_url = None;
        let mut debounce = None;
        let mut log_level = None;

        // Both `window.ENV.API_URL` and the older `window.ENV.api_url` are honoured.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    let get = |k: &str| js_sys::Reflect::get(&env, &k.into()).ok();

                    api_url = get("API_URL")
                        .and_then(|v| v.as_string())
                        .or_else(|| get("api_url").and_then(|v| v.as_string()));

                    debounce = get("LOOKUP_DEBOUNCE_MS").and_then(|v| {
                        v.as_f64()
                            .or_else(|| v.as_string().and_then(|s| s.trim().parse().ok()))
                    });

                    log_level = get("LOG_LEVEL").and_then(|v| v.as_string());
                }
            }
        }

        Self::from_values(api_url, debounce, log_level)
    }

    pub fn from_values(
        api_url: Option<String>,
        lookup_debounce_ms: Option<f64>,
        log_level: Option<String>,
    ) -> Self {
        let api_url = api_url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let lookup_debounce_ms = lookup_debounce_ms
            .filter(|ms| ms.is_finite() && *ms >= 0.0 && *ms <= f64::from(u32::MAX))
            .map(|ms| ms.round() as u32)
            .unwrap_or(DEFAULT_LOOKUP_DEBOUNCE_MS);

        let log_level = log_level
            .filter(|l| l.trim().parse::<log::Level>().is_ok())
            .map(|l| l.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "info".to_string());

        Self {
            api_url,
            lookup_debounce_ms,
            log_level,
        }
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    /// `GET {base}{endpoint}?q=<query>[&type=<filter>]`
    pub(crate) fn search_url(&self, source: &SearchSource, query: &str) -> String {
        let mut url = format!(
            "{}{}?q={}",
            self.base_url,
            source.endpoint,
            urlencoding::encode(query)
        );
        if let Some(filter) = source.filter.as_deref() {
            url.push_str("&type=");
            url.push_str(&urlencoding::encode(filter));
        }
        url
    }

    async fn get_json(&self, url: String) -> ApiResult<serde_json::Value> {
        let client = reqwest::Client::new();
        let res = client.get(url).send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Search failed"))
        }
    }

    /// Normalizes a search envelope. Anything but `success == true` with an
    /// array `data` is rejected; records without a code are skipped.
    pub(crate) fn parse_search_response(
        source: &SearchSource,
        data: &serde_json::Value,
    ) -> ApiResult<Vec<SearchOption>> {
        let success = data.get("success").and_then(|v| v.as_bool()) == Some(true);
        let Some(list) = data.get("data").and_then(|v| v.as_array()).filter(|_| success) else {
            return Err(ApiError::payload(data));
        };

        Ok(list
            .iter()
            .filter_map(|item| source.fields.normalize(item))
            .collect())
    }

    pub async fn search(&self, source: &SearchSource, query: &str) -> ApiResult<Vec<SearchOption>> {
        let data = self.get_json(self.search_url(source, query)).await?;
        Self::parse_search_response(source, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_url_encodes_query() {
        let client = ApiClient::new("http://api.local".to_string());
        let url = client.search_url(&SearchSource::customers(), "budi & sons");
        assert_eq!(url, "http://api.local/customers/search?q=budi%20%26%20sons");
    }

    #[test]
    fn search_url_appends_type_filter() {
        let client = ApiClient::new("http://api.local".to_string());
        let url = client.search_url(&SearchSource::ledger_accounts(Some("expense")), "");
        assert_eq!(url, "http://api.local/accounts/search?q=&type=expense");
    }

    #[test]
    fn parse_success_envelope_keeps_backend_order() {
        let data = json!({
            "success": true,
            "data": [
                {"id": 2, "customerNo": "C002", "name": "Sari"},
                {"id": 9, "name": "missing code"},
                {"id": 1, "customerNo": "C001", "name": "Budi Santoso"}
            ]
        });
        let options = ApiClient::parse_search_response(&SearchSource::customers(), &data)
            .expect("should parse");
        let codes: Vec<&str> = options.iter().map(|o| o.code.as_str()).collect();
        assert_eq!(codes, vec!["C002", "C001"]);
    }

    #[test]
    fn parse_empty_success_is_ok() {
        let data = json!({"success": true, "data": []});
        let options = ApiClient::parse_search_response(&SearchSource::items(), &data)
            .expect("should parse");
        assert!(options.is_empty());
    }

    #[test]
    fn parse_rejects_non_success_shapes() {
        let source = SearchSource::items();
        for data in [
            json!({"success": false, "data": {"message": "boom"}}),
            json!({"success": true, "data": {"message": "not a list"}}),
            json!({"data": []}),
            json!([1, 2, 3]),
        ] {
            let err = ApiClient::parse_search_response(&source, &data)
                .expect_err("should reject payload");
            assert_eq!(err.kind, ApiErrorKind::Payload);
        }
    }

    #[test]
    fn config_defaults() {
        let c = EnvConfig::from_values(None, None, None);
        assert_eq!(c.api_url, DEFAULT_API_URL);
        assert_eq!(c.lookup_debounce_ms, DEFAULT_LOOKUP_DEBOUNCE_MS);
        assert_eq!(c.log_level(), log::Level::Info);
    }

    #[test]
    fn config_accepts_overrides() {
        let c = EnvConfig::from_values(
            Some("https://books.example.com/api/".to_string()),
            Some(400.0),
            Some("DEBUG".to_string()),
        );
        assert_eq!(c.api_url, "https://books.example.com/api");
        assert_eq!(c.lookup_debounce_ms, 400);
        assert_eq!(c.log_level, "debug");
        assert_eq!(c.log_level(), log::Level::Debug);
    }

    #[test]
    fn config_rejects_bad_values() {
        let c = EnvConfig::from_values(
            Some("   ".to_string()),
            Some(-5.0),
            Some("loud".to_string()),
        );
        assert_eq!(c.api_url, DEFAULT_API_URL);
        assert_eq!(c.lookup_debounce_ms, DEFAULT_LOOKUP_DEBOUNCE_MS);
        assert_eq!(c.log_level, "info");

        let c = EnvConfig::from_values(None, Some(f64::NAN), None);
        assert_eq!(c.lookup_debounce_ms, DEFAULT_LOOKUP_DEBOUNCE_MS);
    }
}
