// ============================================================================
// Module : error
// ============================================================================
// Taxonomie fermée des erreurs de données de marché
//
// CONCEPTS RUST :
// 1. thiserror : dérive Display + std::error::Error depuis des attributs
// 2. Enum fermé : le store ne compare jamais de codes HTTP ni de chaînes,
//    il ne manipule que ces variantes
// ============================================================================

use thiserror::Error;

/// Erreur renvoyée par le client de données de marché (et par le store)
///
/// Chaque variante porte un message fixe destiné à l'utilisateur : c'est
/// exactement ce texte qui finit dans l'état d'erreur du store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketDataError {
    /// Aucune réponse n'est parvenue au client (connexion, timeout)
    #[error("Network error. Please check your connection.")]
    Network,

    /// Clé API refusée (401 / 403)
    #[error("Invalid API key. Please check your configuration.")]
    Unauthorized,

    /// Quota dépassé (429)
    #[error("API rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    /// Erreur amont (5xx)
    #[error("Server error. Please try again later.")]
    Server { status: u16 },

    /// Toute autre erreur de l'API, avec le message du fournisseur
    #[error("{0}")]
    Api(String),

    /// Appel réussi mais aucune barre exploitable
    #[error("No data available for the selected timeframe")]
    NoData,

    /// Sélection de paire invalide (codes à 3 lettres attendus)
    #[error("Invalid currency pair: {0}")]
    InvalidPair(String),

    /// Le client HTTP n'a pas pu être construit
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MarketDataError {
    /// Traduit un statut HTTP non-2xx en erreur typée
    ///
    /// `message` est le champ `message` du corps de réponse s'il existe.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            429 => MarketDataError::RateLimited,
            401 | 403 => MarketDataError::Unauthorized,
            s if s >= 500 => MarketDataError::Server { status: s },
            s => MarketDataError::Api(
                message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| format!("Request failed with status code {}", s)),
            ),
        }
    }

    /// Vrai pour la condition "données vides" (pas une panne)
    pub fn is_empty_result(&self) -> bool {
        matches!(self, MarketDataError::NoData)
    }
}

/// Alias pratique pour les résultats du client
pub type Result<T> = std::result::Result<T, MarketDataError>;
