// ============================================================================
// Module : utils
// ============================================================================
// Fonctions pures utilisées par le store et l'interface :
// résolution des périodes et formatage des métriques
// ============================================================================

pub mod date_range; // Timeframe -> { from, to, multiplier, timespan }
pub mod formatters; // Prix, pourcentages, variations, dates du graphique

pub use date_range::{calculate_date_range, DateRange};
pub use formatters::{
    format_chart_date, format_currency_pair, format_percentage, format_price,
    format_price_change, ChangeColor, FormattedChange,
};
