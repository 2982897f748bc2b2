// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le client de l'API de cotations (Massive) et le trait
// MarketDataClient que le store consomme.
//
// CONCEPT RUST : Trait comme point de jonction
// - Le store ne connaît que le trait, jamais reqwest
// - Les tests branchent un faux client en mémoire
// - async_trait : méthodes async dans un trait utilisable en Arc<dyn ...>
// ============================================================================

pub mod massive; // Client HTTP réel (reqwest)
pub mod types;   // Structures JSON du fournisseur

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::Timespan;

// Re-export des éléments principaux
pub use massive::MassiveClient;
pub use types::{AggregatesResponse, TickerDescriptor, TickersResponse};

/// Les deux appels distants dont le store a besoin
///
/// Les implémentations traduisent toute panne HTTP en MarketDataError ;
/// le store ne voit jamais de code de statut.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Liste les tickers forex actifs du catalogue de référence
    async fn list_forex_tickers(&self, limit: u32) -> Result<TickersResponse>;

    /// Récupère les barres agrégées d'un ticker sur une période
    async fn get_aggregates(
        &self,
        ticker: &str,
        multiplier: u32,
        timespan: Timespan,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<AggregatesResponse>;
}
