// ============================================================================
// Résolveur de période : Timeframe -> paramètres de requête
// ============================================================================
// Transforme une sélection grossière (15M, 1H, ...) en descripteur concret :
// { from, to, multiplier, timespan }
//
// Table fixe (doit correspondre exactement à la sémantique du fournisseur) :
//
//   Timeframe | fenêtre  | multiplier | timespan
//   15M       | 1 jour   | 15         | minute
//   1H        | 7 jours  | 1          | hour
//   1D        | 30 jours | 1          | day
//   1W        | 6 mois   | 1          | week
//   1M        | 2 ans    | 1          | month
//   (inconnu) | 1 jour   | 15         | minute
//
// CONCEPT : Fonction pure + horloge injectée
// - resolve() prend la date du jour en paramètre : déterministe et testable
// - calculate_date_range() lit l'horloge à chaque appel (pas de cache de "now")
// ============================================================================

use chrono::{Days, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Timeframe, Timespan};

/// Descripteur de requête pour l'endpoint des agrégats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Premier jour inclus (YYYY-MM-DD)
    pub from: NaiveDate,

    /// Dernier jour inclus : toujours "aujourd'hui" au moment de l'appel
    pub to: NaiveDate,

    /// Taille du bucket (ex: 15 pour 15 minutes)
    pub multiplier: u32,

    /// Unité du bucket
    pub timespan: Timespan,
}

/// Fenêtre historique à remonter depuis "aujourd'hui"
#[derive(Debug, Clone, Copy)]
enum Lookback {
    Days(u64),
    Months(u32),
}

impl DateRange {
    /// Résout une période à partir de la date du jour
    pub fn resolve(timeframe: Timeframe, today: NaiveDate) -> Self {
        let (lookback, multiplier, timespan) = match timeframe {
            Timeframe::FifteenMinutes => (Lookback::Days(1), 15, Timespan::Minute),
            Timeframe::OneHour => (Lookback::Days(7), 1, Timespan::Hour),
            Timeframe::OneDay => (Lookback::Days(30), 1, Timespan::Day),
            Timeframe::OneWeek => (Lookback::Months(6), 1, Timespan::Week),
            Timeframe::OneMonth => (Lookback::Months(24), 1, Timespan::Month),
        };

        // Sub de chrono ne peut échouer qu'aux bornes du calendrier
        let from = match lookback {
            Lookback::Days(days) => today.checked_sub_days(Days::new(days)),
            Lookback::Months(months) => today.checked_sub_months(Months::new(months)),
        }
        .unwrap_or(NaiveDate::MIN);

        Self {
            from,
            to: today,
            multiplier,
            timespan,
        }
    }

    /// Résout un code brut ("15M", "1H", ...)
    ///
    /// Un code inconnu retombe sur la période 15 minutes, sans erreur.
    pub fn resolve_code(code: &str, today: NaiveDate) -> Self {
        let timeframe = Timeframe::from_code(code).unwrap_or_default();
        Self::resolve(timeframe, today)
    }

    /// Paramètre `from` au format ISO (YYYY-MM-DD)
    pub fn from_param(&self) -> String {
        self.from.format("%Y-%m-%d").to_string()
    }

    /// Paramètre `to` au format ISO (YYYY-MM-DD)
    pub fn to_param(&self) -> String {
        self.to.format("%Y-%m-%d").to_string()
    }
}

/// Résout une période avec l'horloge locale, relue à chaque appel
pub fn calculate_date_range(timeframe: Timeframe) -> DateRange {
    DateRange::resolve(timeframe, Local::now().date_naive())
}

// ============================================================================
// Tests unitaires
// ============================================================================
