// ============================================================================
// LazyForex - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;    // Client de cotations (trait + implémentation Massive)
pub mod app;    // État de l'interface
pub mod config; // Configuration (environnement / .env)
pub mod error;  // MarketDataError
pub mod models; // Structures de données
pub mod store;  // MarketDataStore : sélection, fetchs, métriques dérivées
pub mod ui;     // Interface utilisateur
pub mod utils;  // Résolution des périodes + formatage

pub use store::{MarketDataStore, MarketState};
