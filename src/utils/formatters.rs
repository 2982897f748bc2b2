// ============================================================================
// Formatage des métriques pour l'affichage
// ============================================================================
// Fonctions pures, sans effet de bord et sans erreur : toute entrée absente
// (None) produit une valeur par défaut sûre.
// ============================================================================

use chrono::DateTime;

use crate::models::pair::parse_currency_pair;
use crate::models::Timeframe;

/// Nombre de décimales pour les prix forex
pub const PRICE_DECIMALS: usize = 6;

/// Classification sémantique d'une variation (pour la couleur)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeColor {
    /// Variation >= 0
    Positive,
    /// Variation < 0
    Negative,
    /// Pas de valeur
    Neutral,
}

/// Variation prête à afficher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedChange {
    /// Valeur à 6 décimales (porte le "-" si négative)
    pub value: String,

    /// "+" pour une variation >= 0, "" sinon
    pub sign: &'static str,

    /// Classification pour la couleur
    pub color: ChangeColor,
}

impl FormattedChange {
    /// Concatène signe et valeur (ex: "+0.001200")
    pub fn display(&self) -> String {
        format!("{}{}", self.sign, self.value)
    }
}

/// Valeur affichable : None pour NaN/infini, -0.0 ramené à 0.0
///
/// `{:.6}` affiche "-0.000000" pour -0.0 ; l'addition de +0.0 donne +0.0.
fn displayable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite()).map(|v| v + 0.0)
}

/// Formate un prix à 6 décimales
///
/// # Exemple
/// format_price(Some(1.23456789)) == "1.234568"
/// format_price(None) == "0.000000"
pub fn format_price(price: Option<f64>) -> String {
    match displayable(price) {
        Some(price) => format!("{:.*}", PRICE_DECIMALS, price),
        None => format!("{:.*}", PRICE_DECIMALS, 0.0),
    }
}

/// Formate un pourcentage avec signe explicite et suffixe "%"
///
/// # Exemple
/// format_percentage(Some(3.0)) == "+3.000000%"
/// format_percentage(Some(-2.5)) == "-2.500000%"
/// format_percentage(None) == "0.00%"
pub fn format_percentage(percentage: Option<f64>) -> String {
    match displayable(percentage) {
        Some(p) if p >= 0.0 => format!("+{:.*}%", PRICE_DECIMALS, p),
        Some(p) => format!("{:.*}%", PRICE_DECIMALS, p),
        None => "0.00%".to_string(),
    }
}

/// Formate une variation de prix : valeur, signe et couleur
///
/// Une valeur non finie est traitée comme absente (Neutral).
pub fn format_price_change(change: Option<f64>) -> FormattedChange {
    match displayable(change) {
        Some(value) if value >= 0.0 => FormattedChange {
            value: format!("{:.*}", PRICE_DECIMALS, value),
            sign: "+",
            color: ChangeColor::Positive,
        },
        Some(value) => FormattedChange {
            value: format!("{:.*}", PRICE_DECIMALS, value),
            sign: "",
            color: ChangeColor::Negative,
        },
        None => FormattedChange {
            value: format_price(None),
            sign: "",
            color: ChangeColor::Neutral,
        },
    }
}

/// Formate un timestamp (ms, UTC) pour l'axe du graphique
///
/// - 15M / 1H : "Jan 5, 14:30"
/// - 1D / 1W  : "Jan 5"
/// - 1M       : "Jan 2024"
pub fn format_chart_date(timestamp_ms: i64, timeframe: Timeframe) -> String {
    let Some(date) = DateTime::from_timestamp_millis(timestamp_ms) else {
        return String::new();
    };

    let pattern = match timeframe {
        t if t.is_intraday() => "%b %-d, %H:%M",
        Timeframe::OneMonth => "%b %Y",
        _ => "%b %-d",
    };

    date.format(pattern).to_string()
}

/// Formate un ticker pour l'affichage : "C:EURUSD" -> "EUR/USD"
pub fn format_currency_pair(ticker: &str) -> String {
    let (base, quote) = parse_currency_pair(ticker);
    format!("{}/{}", base, quote)
}

// ============================================================================
// Tests unitaires
// ============================================================================
