// ============================================================================
// Enums : Timeframe et Timespan
// ============================================================================
// Timeframe : sélection grossière faite par l'utilisateur (15M, 1H, 1D, 1W, 1M)
// Timespan  : unité de résolution attendue par l'API (minute, hour, ...)
//
// CONCEPT : Timeframe vs Timespan
// - Timeframe pilote à la fois la fenêtre historique ET la résolution
// - Timespan n'est que l'unité de la résolution (le "bucket" d'une barre)
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sélection de période affichée
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    /// Barres de 15 minutes sur 1 jour
    #[serde(rename = "15M")]
    FifteenMinutes,
    /// Barres de 1 heure sur 7 jours
    #[serde(rename = "1H")]
    OneHour,
    /// Barres journalières sur 30 jours
    #[serde(rename = "1D")]
    OneDay,
    /// Barres hebdomadaires sur 6 mois
    #[serde(rename = "1W")]
    OneWeek,
    /// Barres mensuelles sur 2 ans
    #[serde(rename = "1M")]
    OneMonth,
}

impl Timeframe {
    /// Retourne le code court (ex: "15M", "1H")
    pub fn code(&self) -> &'static str {
        match self {
            Timeframe::FifteenMinutes => "15M",
            Timeframe::OneHour => "1H",
            Timeframe::OneDay => "1D",
            Timeframe::OneWeek => "1W",
            Timeframe::OneMonth => "1M",
        }
    }

    /// Retourne le label pour l'affichage
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::FifteenMinutes => "15 min",
            Timeframe::OneHour => "1 hour",
            Timeframe::OneDay => "1 day",
            Timeframe::OneWeek => "1 week",
            Timeframe::OneMonth => "1 month",
        }
    }

    /// Parse un code court
    ///
    /// Retourne None pour un code inconnu : c'est le résolveur de dates qui
    /// décide du repli (15 minutes), pas le parseur.
    pub fn from_code(code: &str) -> Option<Timeframe> {
        match code.trim() {
            "15M" => Some(Timeframe::FifteenMinutes),
            "1H" => Some(Timeframe::OneHour),
            "1D" => Some(Timeframe::OneDay),
            "1W" => Some(Timeframe::OneWeek),
            "1M" => Some(Timeframe::OneMonth),
            _ => None,
        }
    }

    /// Retourne toutes les périodes disponibles (pour UI de sélection)
    pub fn all() -> [Timeframe; 5] {
        [
            Timeframe::FifteenMinutes,
            Timeframe::OneHour,
            Timeframe::OneDay,
            Timeframe::OneWeek,
            Timeframe::OneMonth,
        ]
    }

    /// Retourne la période suivante (cycle)
    pub fn next(&self) -> Timeframe {
        match self {
            Timeframe::FifteenMinutes => Timeframe::OneHour,
            Timeframe::OneHour => Timeframe::OneDay,
            Timeframe::OneDay => Timeframe::OneWeek,
            Timeframe::OneWeek => Timeframe::OneMonth,
            Timeframe::OneMonth => Timeframe::FifteenMinutes, // Boucle
        }
    }

    /// Retourne la période précédente (cycle)
    pub fn previous(&self) -> Timeframe {
        match self {
            Timeframe::FifteenMinutes => Timeframe::OneMonth, // Boucle
            Timeframe::OneHour => Timeframe::FifteenMinutes,
            Timeframe::OneDay => Timeframe::OneHour,
            Timeframe::OneWeek => Timeframe::OneDay,
            Timeframe::OneMonth => Timeframe::OneWeek,
        }
    }

    /// Vrai si les barres sont plus fines qu'une journée
    pub fn is_intraday(&self) -> bool {
        matches!(self, Timeframe::FifteenMinutes | Timeframe::OneHour)
    }
}

impl Default for Timeframe {
    /// Période par défaut : 15 minutes
    fn default() -> Self {
        Timeframe::FifteenMinutes
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Unité de résolution des barres, telle que l'API l'attend dans l'URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timespan {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl Timespan {
    /// Segment d'URL pour l'API (ex: "minute")
    pub fn as_str(&self) -> &'static str {
        match self {
            Timespan::Minute => "minute",
            Timespan::Hour => "hour",
            Timespan::Day => "day",
            Timespan::Week => "week",
            Timespan::Month => "month",
        }
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_codes() {
        for timeframe in Timeframe::all() {
            assert_eq!(Timeframe::from_code(timeframe.code()), Some(timeframe));
        }
        assert_eq!(Timeframe::from_code("4H"), None);
    }

    #[test]
    fn test_timeframe_cycle() {
        assert_eq!(Timeframe::FifteenMinutes.next(), Timeframe::OneHour);
        assert_eq!(Timeframe::OneMonth.next(), Timeframe::FifteenMinutes); // Boucle
        assert_eq!(Timeframe::FifteenMinutes.previous(), Timeframe::OneMonth);
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Timeframe::OneWeek).unwrap();
        assert_eq!(json, "\"1W\"");
        let timespan: Timespan = serde_json::from_str("\"hour\"").unwrap();
        assert_eq!(timespan, Timespan::Hour);
    }
}
