// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Error handling avec Result
// 3. Pattern matching : matches! pour tester une touche en une ligne
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier : permet de redessiner pendant un chargement
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Crée un gestionnaire avec un tick de 250ms
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
        }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(tick_rate) attend au plus un tick
    /// - Pas d'événement : Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS on reçoit Press ET Release : on ne garde que Press
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : KeyEvent -> action
// ============================================================================

/// Vérifie si l'événement est une des touches données
fn is_key(event: &Event, codes: &[KeyCode]) -> bool {
    if let Event::Key(key) = event {
        codes.contains(&key.code)
    } else {
        false
    }
}

/// 'q' : quitter (deux pressions)
pub fn is_quit_event(event: &Event) -> bool {
    is_key(event, &[KeyCode::Char('q'), KeyCode::Char('Q')])
}

pub fn is_escape_event(event: &Event) -> bool {
    is_key(event, &[KeyCode::Esc])
}

pub fn is_enter_event(event: &Event) -> bool {
    is_key(event, &[KeyCode::Enter])
}

/// Flèche vers le haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    is_key(event, &[KeyCode::Up, KeyCode::Char('k'), KeyCode::Char('K')])
}

/// Flèche vers le bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    is_key(event, &[KeyCode::Down, KeyCode::Char('j'), KeyCode::Char('J')])
}

/// 'l' : période suivante
pub fn is_next_timeframe_event(event: &Event) -> bool {
    is_key(event, &[KeyCode::Char('l'), KeyCode::Right])
}

/// 'h' : période précédente
pub fn is_previous_timeframe_event(event: &Event) -> bool {
    is_key(event, &[KeyCode::Char('h'), KeyCode::Left])
}

/// 'p' : ouvrir le sélecteur de paire
pub fn is_picker_event(event: &Event) -> bool {
    is_key(event, &[KeyCode::Char('p'), KeyCode::Char('P')])
}

/// 'r' : recharger la série
pub fn is_refresh_event(event: &Event) -> bool {
    is_key(event, &[KeyCode::Char('r'), KeyCode::Char('R')])
}

/// 'c' : effacer le message d'erreur
pub fn is_clear_error_event(event: &Event) -> bool {
    is_key(event, &[KeyCode::Char('c'), KeyCode::Char('C')])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, event::KeyModifiers::empty()))
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_timeframe_keys() {
        assert!(is_next_timeframe_event(&key(KeyCode::Char('l'))));
        assert!(is_previous_timeframe_event(&key(KeyCode::Char('h'))));
        assert!(!is_next_timeframe_event(&key(KeyCode::Char('h'))));
    }

    #[test]
    fn test_navigation_keys() {
        assert!(is_up_event(&key(KeyCode::Up)));
        assert!(is_up_event(&key(KeyCode::Char('k'))));
        assert!(is_down_event(&key(KeyCode::Char('j'))));
        assert!(is_enter_event(&key(KeyCode::Enter)));
        assert!(is_escape_event(&key(KeyCode::Esc)));
    }

    #[test]
    fn test_action_keys() {
        assert!(is_picker_event(&key(KeyCode::Char('p'))));
        assert!(is_refresh_event(&key(KeyCode::Char('r'))));
        assert!(is_clear_error_event(&key(KeyCode::Char('c'))));
        assert!(!is_refresh_event(&Event::Tick));
    }
}
