use serde::{Deserialize, Serialize};

use crate::storage::KeyValueStore;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
const SETTINGS_KEY: &str = "settings";

/// Build-time configuration. Override with `EXPENSE_API_BASE_URL` and
/// `EXPENSE_LOG_LEVEL` when running `trunk build`.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub log_level: log::Level,
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("EXPENSE_API_BASE_URL"),
            option_env!("EXPENSE_LOG_LEVEL"),
        )
    }

    fn from_values(base_url: Option<&str>, level: Option<&str>) -> Self {
        let api_base_url = base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let log_level = level
            .and_then(|raw| raw.parse::<log::Level>().ok())
            .unwrap_or(log::Level::Info);
        Self {
            api_base_url,
            log_level,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub currency_code: String,
    pub currency_symbol: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            currency_code: "INR".to_string(),
            currency_symbol: "₹".to_string(),
        }
    }
}

impl AppSettings {
    pub fn for_currency(code: &str) -> Self {
        AppSettings {
            currency_code: code.to_string(),
            currency_symbol: currency_symbol_for(code).to_string(),
        }
    }

    pub fn load(storage: &impl KeyValueStore) -> Self {
        storage
            .get(SETTINGS_KEY)
            .and_then(|raw| serde_json::from_str::<AppSettings>(&raw).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, storage: &impl KeyValueStore) {
        if let Ok(raw) = serde_json::to_string(self) {
            storage.set(SETTINGS_KEY, &raw);
        }
    }
}

pub const CURRENCIES: [(&str, &str); 5] = [
    ("INR", "₹"),
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("JPY", "¥"),
];

pub fn currency_symbol_for(code: &str) -> &'static str {
    CURRENCIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, symbol)| *symbol)
        .unwrap_or("₹")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = AppConfig::default();
        assert_eq!(config.url("/api/expenses"), "http://localhost:8080/api/expenses");
        assert_eq!(config.log_level, log::Level::Info);
    }

    #[test]
    fn overrides_are_normalised() {
        let config = AppConfig::from_values(Some("https://api.example.com/"), Some("debug"));
        assert_eq!(config.url("/api/category/all"), "https://api.example.com/api/category/all");
        assert_eq!(config.log_level, log::Level::Debug);
    }

    #[test]
    fn bad_log_level_falls_back() {
        let config = AppConfig::from_values(None, Some("loud"));
        assert_eq!(config.log_level, log::Level::Info);
    }

    #[test]
    fn settings_round_trip_through_storage() {
        let storage = MemoryStorage::default();
        assert_eq!(AppSettings::load(&storage), AppSettings::default());

        let euro = AppSettings::for_currency("EUR");
        euro.save(&storage);
        assert_eq!(AppSettings::load(&storage).currency_symbol, "€");
    }
}
