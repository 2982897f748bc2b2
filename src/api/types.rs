// ============================================================================
// Structures pour parser les réponses JSON de l'API Massive
// ============================================================================
// On définit des structures qui matchent la forme du JSON pour que serde
// puisse désérialiser automatiquement. Les champs absents chez le fournisseur
// sont des Option (ou #[serde(default)]).
// ============================================================================

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::AggregateBar;

/// Un ticker du catalogue de référence (/v3/reference/tickers)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerDescriptor {
    /// Symbole (les paires forex sont préfixées "C:")
    pub ticker: String,

    /// Nom complet (peut être vide chez le fournisseur)
    #[serde(default)]
    pub name: String,

    /// Marché (ex: "fx")
    #[serde(default)]
    pub market: Option<String>,

    #[serde(default)]
    pub locale: Option<String>,

    /// Devise de cotation
    #[serde(default)]
    pub currency_symbol: Option<String>,

    #[serde(default)]
    pub currency_name: Option<String>,

    /// Devise de base
    #[serde(default)]
    pub base_currency_symbol: Option<String>,

    #[serde(default)]
    pub base_currency_name: Option<String>,

    #[serde(default)]
    pub active: Option<bool>,
}

/// Réponse de l'endpoint des tickers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickersResponse {
    #[serde(default)]
    pub status: Option<String>,

    /// None si le fournisseur n'a pas renvoyé de liste
    #[serde(default)]
    pub results: Option<Vec<TickerDescriptor>>,

    #[serde(default)]
    pub count: Option<u64>,

    #[serde(default)]
    pub next_url: Option<String>,
}

/// Réponse de l'endpoint des agrégats (/v2/aggs/...)
///
/// `results` est gardé brut : une liste absente ou mal formée n'est pas une
/// erreur de transport mais une condition "pas de données".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatesResponse {
    #[serde(default)]
    pub ticker: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(rename = "resultsCount", default)]
    pub results_count: Option<u64>,

    #[serde(default)]
    pub results: Option<serde_json::Value>,
}

impl AggregatesResponse {
    /// Construit une réponse à partir de barres déjà typées
    pub fn from_bars(ticker: &str, bars: &[AggregateBar]) -> Self {
        Self {
            ticker: Some(ticker.to_string()),
            status: Some("OK".to_string()),
            results_count: Some(bars.len() as u64),
            results: serde_json::to_value(bars).ok(),
        }
    }

    /// Extrait les barres
    ///
    /// - None : `results` absent, null, ou pas une liste de barres
    /// - Some(vec![]) : liste vide
    pub fn into_bars(self) -> Option<Vec<AggregateBar>> {
        let raw = self.results?;
        if !raw.is_array() {
            warn!("Aggregates response 'results' is not a list");
            return None;
        }

        match serde_json::from_value::<Vec<AggregateBar>>(raw) {
            Ok(bars) => Some(bars),
            Err(e) => {
                warn!(error = %e, "Aggregates response contains malformed bars");
                None
            }
        }
    }
}
