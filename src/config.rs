// ============================================================================
// Configuration
// ============================================================================
// Lue depuis l'environnement (après chargement optionnel d'un fichier .env)
//
//   MASSIVE_API_KEY       clé API (optionnelle, sinon 401 côté fournisseur)
//   MASSIVE_BASE_URL      défaut : https://api.massive.com
//   MASSIVE_TIMEOUT_SECS  défaut : 10
//   MASSIVE_TICKERS_LIMIT défaut : 1000
// ============================================================================

use std::time::Duration;

use tracing::warn;

/// URL de base de l'API Massive
pub const DEFAULT_BASE_URL: &str = "https://api.massive.com";

/// Timeout par défaut des requêtes HTTP
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Nombre maximum de tickers demandés au catalogue
pub const DEFAULT_TICKERS_LIMIT: u32 = 1000;

/// Configuration du client de données de marché
#[derive(Clone)]
pub struct Config {
    /// Clé API, ajoutée en paramètre `apiKey` à chaque requête
    pub api_key: Option<String>,

    /// URL de base, sans slash final
    pub base_url: String,

    /// Timeout global d'une requête
    pub timeout: Duration,

    /// Limite passée à l'endpoint des tickers
    pub tickers_limit: u32,
}

impl Config {
    /// Lit la configuration depuis les variables d'environnement
    ///
    /// Une valeur numérique illisible retombe sur la valeur par défaut.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Variante testable : `lookup` remplace std::env::var
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("MASSIVE_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let base_url = lookup("MASSIVE_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = parse_or_default(&lookup, "MASSIVE_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let tickers_limit = parse_or_default(&lookup, "MASSIVE_TICKERS_LIMIT", DEFAULT_TICKERS_LIMIT)
            .unwrap_or(DEFAULT_TICKERS_LIMIT);

        Self {
            api_key,
            base_url,
            timeout,
            tickers_limit,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            tickers_limit: DEFAULT_TICKERS_LIMIT,
        }
    }
}

// La clé API ne doit jamais apparaître dans les logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("tickers_limit", &self.tickers_limit)
            .finish()
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key = key, value = %raw, default = %default, "Invalid numeric setting, using default");
            Some(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.tickers_limit, 1000);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("MASSIVE_API_KEY", "secret"),
            ("MASSIVE_BASE_URL", "http://localhost:8080/"),
            ("MASSIVE_TIMEOUT_SECS", "3"),
            ("MASSIVE_TICKERS_LIMIT", "50"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.tickers_limit, 50);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("MASSIVE_TIMEOUT_SECS", "soon"),
            ("MASSIVE_TICKERS_LIMIT", "-1"),
        ]));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.tickers_limit, DEFAULT_TICKERS_LIMIT);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = Config::from_lookup(lookup_from(&[("MASSIVE_API_KEY", "secret")]));
        assert!(!format!("{:?}", config).contains("secret"));
    }
}
