// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod bar;       // Barres agrégées OHLCV + variation de prix
pub mod pair;      // Paire sélectionnée + entrées du catalogue
pub mod timeframe; // Timeframe (sélection) + Timespan (résolution API)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use lazyforex::models::bar::AggregateBar;
// On peut faire : use lazyforex::models::AggregateBar;
pub use bar::{AggregateBar, PriceChange};
pub use pair::{CatalogEntry, CurrencyPair};
pub use timeframe::{Timeframe, Timespan};
