// ============================================================================
// Structures : CurrencyPair et CatalogEntry
// ============================================================================
// CurrencyPair : la sélection courante (devise de base + devise de cotation)
// CatalogEntry : une paire disponible chez le fournisseur (pour les pickers)
//
// CONCEPT : Symbole canonique
// - Le fournisseur préfixe les paires forex par "C:" (ex: "C:EURUSD")
// - Le corps fait toujours 6 lettres : 3 pour la base, 3 pour la cotation
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MarketDataError;

/// Préfixe des tickers forex chez le fournisseur
pub const FOREX_PREFIX: &str = "C:";

/// Paire de devises sélectionnée
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Devise de base (ex: "EUR")
    pub base: String,

    /// Devise de cotation (ex: "USD")
    pub quote: String,
}

impl CurrencyPair {
    /// Crée une paire validée
    ///
    /// Les codes sont nettoyés (trim) et passés en majuscules. Un code qui
    /// n'est pas exactement 3 lettres ASCII est refusé.
    pub fn new(base: &str, quote: &str) -> Result<Self, MarketDataError> {
        let base = normalize_code(base)?;
        let quote = normalize_code(quote)?;
        Ok(Self { base, quote })
    }

    /// Symbole canonique pour l'API : "C:" + base + quote
    pub fn ticker(&self) -> String {
        format!("{}{}{}", FOREX_PREFIX, self.base, self.quote)
    }
}

impl Default for CurrencyPair {
    /// EUR/USD par défaut
    fn default() -> Self {
        Self {
            base: "EUR".to_string(),
            quote: "USD".to_string(),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

fn normalize_code(code: &str) -> Result<String, MarketDataError> {
    let code = code.trim().to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(MarketDataError::InvalidPair(format!(
            "'{}' is not a 3-letter currency code",
            code
        )))
    }
}

/// Retire le préfixe "C:" s'il est présent
pub fn strip_forex_prefix(ticker: &str) -> &str {
    ticker.strip_prefix(FOREX_PREFIX).unwrap_or(ticker)
}

/// Découpe un ticker en (base, quote)
///
/// Retourne deux chaînes vides si le corps ne fait pas 6 caractères.
pub fn parse_currency_pair(ticker: &str) -> (String, String) {
    let body = strip_forex_prefix(ticker);
    match (body.get(0..3), body.get(3..6)) {
        (Some(base), Some(quote)) if body.len() == 6 => (base.to_string(), quote.to_string()),
        _ => (String::new(), String::new()),
    }
}

/// Une entrée du catalogue des paires disponibles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Ticker du fournisseur (ex: "C:EURUSD")
    pub ticker: String,

    /// Nom affichable (ex: "Euro - United States Dollar")
    pub name: String,

    /// Symbole de la devise de cotation (ex: "USD")
    pub currency_symbol: Option<String>,

    /// Nom de la devise de cotation
    pub currency_name: Option<String>,

    /// Symbole de la devise de base (ex: "EUR")
    pub base_currency_symbol: Option<String>,

    /// Nom de la devise de base
    pub base_currency_name: Option<String>,
}

impl CatalogEntry {
    /// Vrai si le ticker est une paire forex ("C:" + ...)
    pub fn is_forex(ticker: &str) -> bool {
        ticker.starts_with(FOREX_PREFIX)
    }
}
