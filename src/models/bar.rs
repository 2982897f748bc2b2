// ============================================================================
// Structure : AggregateBar (Open, High, Low, Close, Volume)
// ============================================================================
// Une barre agrégée telle que renvoyée par l'endpoint /v2/aggs de l'API
//
// CONCEPTS RUST :
// 1. #[serde(rename = "...")] : l'API utilise des clés d'une lettre (o, h, l, c)
// 2. i64 pour le timestamp : millisecondes depuis l'epoch
// 3. Fonctions pures sur des slices : &[AggregateBar] plutôt que Vec
// ============================================================================

use serde::{Deserialize, Serialize};

/// Une barre OHLCV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateBar {
    /// Prix d'ouverture (Open)
    #[serde(rename = "o")]
    pub open: f64,

    /// Prix le plus haut (High)
    #[serde(rename = "h")]
    pub high: f64,

    /// Prix le plus bas (Low)
    #[serde(rename = "l")]
    pub low: f64,

    /// Prix de clôture (Close)
    #[serde(rename = "c")]
    pub close: f64,

    /// Prix moyen pondéré par le volume
    #[serde(rename = "vw", default)]
    pub vwap: f64,

    /// Volume échangé
    #[serde(rename = "v", default)]
    pub volume: f64,

    /// Nombre de transactions
    #[serde(rename = "n", default)]
    pub transactions: u64,

    /// Début du bucket, en millisecondes depuis l'epoch
    #[serde(rename = "t")]
    pub timestamp: i64,
}

impl AggregateBar {
    /// Constructeur minimal (OHLC + timestamp), le reste à zéro
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            vwap: 0.0,
            volume: 0.0,
            transactions: 0,
            timestamp,
        }
    }
}

/// Variation de prix entre la première et la dernière barre d'une série
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceChange {
    /// Variation absolue (dernier close - premier close)
    pub value: f64,

    /// Variation en pourcentage du premier close
    pub percentage: f64,
}

impl PriceChange {
    /// Calcule la variation sur une série
    ///
    /// - Moins de 2 barres : {0, 0}
    /// - Premier close à 0 : pourcentage à 0 (pas de division par zéro)
    pub fn from_series(bars: &[AggregateBar]) -> Self {
        let (first, last) = match (bars.first(), bars.last()) {
            (Some(first), Some(last)) if bars.len() >= 2 => (first.close, last.close),
            _ => return PriceChange::default(),
        };

        let value = last - first;
        let percentage = if first != 0.0 {
            (value / first) * 100.0
        } else {
            0.0
        };

        PriceChange { value, percentage }
    }
}

/// Vérifie que les timestamps sont non-décroissants
pub fn is_chronological(bars: &[AggregateBar]) -> bool {
    bars.windows(2).all(|pair| pair[0].timestamp <= pair[1].timestamp)
}

/// Trie la série par timestamp croissant (tri stable)
pub fn sort_chronologically(bars: &mut [AggregateBar]) {
    bars.sort_by_key(|bar| bar.timestamp);
}

// ============================================================================
// Tests unitaires
// ============================================================================
