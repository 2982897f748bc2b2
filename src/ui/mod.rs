// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod chart;     // Graphique ligne des closes
pub mod dashboard; // En-tête de cotation, routing des écrans, footer
pub mod events;    // Gestion des événements clavier
pub mod picker;    // Sélecteur de paire (base puis quote)

// Re-exports pour simplifier les imports
pub use dashboard::render;
pub use events::{Event, EventHandler};
