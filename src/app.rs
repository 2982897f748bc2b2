// ============================================================================
// Structure : App
// ============================================================================
// État propre à l'interface : écran actif, sélecteur de paire, confirmation
// de sortie. Les données de marché vivent dans le MarketDataStore ; App ne
// fait que piloter la navigation.
//
// CONCEPTS RUST :
// 1. State Management : un seul endroit pour l'état de navigation
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Enums pour les machines à états (Screen, PickerStage)
// ============================================================================

// ============================================================================
// Enums : Screen et PickerStage
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul écran actif à la fois
// - Le compilateur force à gérer tous les cas (exhaustivité)
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : en-tête de cotation + graphique
    Dashboard,

    /// Sélecteur de paire en deux étapes (base puis quote)
    PairPicker,
}

/// Étape du sélecteur de paire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerStage {
    Base,
    Quote,
}

/// État de l'interface
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Two-step quit : première pression de 'q' -> true, seconde -> sortie
    pub confirm_quit: bool,

    /// Étape courante du sélecteur
    pub picker_stage: PickerStage,

    /// Ligne surlignée dans la liste des devises
    pub picker_index: usize,

    /// Devise de base choisie à la première étape
    pub picked_base: Option<String>,
}

impl App {
    /// Crée l'état initial (dashboard, aucune confirmation en attente)
    pub fn new() -> Self {
        Self {
            running: true,
            current_screen: Screen::Dashboard,
            confirm_quit: false,
            picker_stage: PickerStage::Base,
            picker_index: 0,
            picked_base: None,
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_on_dashboard(&self) -> bool {
        self.current_screen == Screen::Dashboard
    }

    pub fn is_on_picker(&self) -> bool {
        self.current_screen == Screen::PairPicker
    }

    // ========================================================================
    // Quit Confirmation
    // ========================================================================

    /// Demande la confirmation de quitter
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit (toute autre touche)
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Pair Picker
    // ========================================================================

    /// Ouvre le sélecteur à l'étape "base"
    pub fn open_picker(&mut self) {
        self.current_screen = Screen::PairPicker;
        self.picker_stage = PickerStage::Base;
        self.picker_index = 0;
        self.picked_base = None;
    }

    /// Ferme le sélecteur sans rien changer
    pub fn close_picker(&mut self) {
        self.current_screen = Screen::Dashboard;
        self.picker_stage = PickerStage::Base;
        self.picker_index = 0;
        self.picked_base = None;
    }

    /// Remonte d'une ligne (saturating : reste à 0)
    pub fn picker_up(&mut self) {
        self.picker_index = self.picker_index.saturating_sub(1);
    }

    /// Descend d'une ligne, bornée par le nombre de devises
    pub fn picker_down(&mut self, len: usize) {
        let max_index = len.saturating_sub(1);
        self.picker_index = (self.picker_index + 1).min(max_index);
    }

    /// Valide la ligne surlignée
    ///
    /// - Étape base : mémorise la devise, passe à l'étape quote
    /// - Étape quote : ferme le sélecteur et retourne (base, quote)
    ///
    /// Une quote identique à la base est ignorée.
    pub fn confirm_picker(&mut self, currencies: &[String]) -> Option<(String, String)> {
        let current = currencies.get(self.picker_index)?.clone();

        match self.picker_stage {
            PickerStage::Base => {
                self.picked_base = Some(current);
                self.picker_stage = PickerStage::Quote;
                self.picker_index = 0;
                None
            }
            PickerStage::Quote => {
                let base = self.picked_base.clone()?;
                if base == current {
                    return None;
                }
                self.close_picker();
                Some((base, current))
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
