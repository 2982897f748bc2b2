// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// En-tête de cotation (paire, prix, variation), graphique ou sélecteur de
// paire au centre, raccourcis clavier en bas.
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. Span / Line : texte multi-couleurs
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Screen};
use crate::store::MarketState;
use crate::ui::{chart, picker};
use crate::utils::{
    format_currency_pair, format_percentage, format_price, format_price_change, ChangeColor,
};

/// Dessine l'interface complète
///
/// `state` est une copie de l'état du store prise juste avant le rendu.
pub fn render(frame: &mut Frame, app: &App, state: &MarketState) {
    let chunks = create_layout(frame.size());

    render_header(frame, state, chunks[0]);

    match app.current_screen {
        Screen::Dashboard => chart::render_chart(frame, state, chunks[1]),
        Screen::PairPicker => picker::render_picker(frame, app, state, chunks[1]),
    }

    render_footer(frame, app, chunks[2]);
}

/// Couleur terminal d'une classification de variation
pub fn change_color(color: ChangeColor) -> Color {
    match color {
        ChangeColor::Positive => Color::Green,
        ChangeColor::Negative => Color::Red,
        ChangeColor::Neutral => Color::Gray,
    }
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header : 2 lignes + bordures
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header : cotation + statut
// ============================================================================

fn render_header(frame: &mut Frame, state: &MarketState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" LazyForex ")
        .title_alignment(Alignment::Center);

    frame.render_widget(
        Paragraph::new(vec![quote_line(state), status_line(state)])
            .block(block)
            .alignment(Alignment::Center),
        area,
    );
}

/// "EUR/USD  1.084200  +0.001200 (+0.110000%)  [15M]  Forex.com"
fn quote_line(state: &MarketState) -> Line<'static> {
    let has_series = !state.historical_data.is_empty();
    let change = state.price_change();

    // Sans série, variation et pourcentage sont neutres
    let formatted = format_price_change(has_series.then_some(change.value));
    let percentage = format_percentage(has_series.then_some(change.percentage));
    let color = change_color(formatted.color);

    Line::from(vec![
        Span::styled(
            format_currency_pair(&state.selected_ticker()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format_price(Some(state.current_price())),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} ({})", formatted.display(), percentage),
            Style::default().fg(color),
        ),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", state.timeframe.code()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(state.exchanges.join(", "), Style::default().fg(Color::Gray)),
    ])
}

/// Chargement en cours, ou message d'erreur
fn status_line(state: &MarketState) -> Line<'static> {
    if state.loading {
        Line::from(Span::styled(
            "⏳ Loading...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(error) = &state.error {
        Line::from(vec![
            Span::styled(
                format!("⚠ {}", error),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  [c] dismiss", Style::default().fg(Color::Gray)),
        ])
    } else {
        Line::from(Span::styled(
            state.timeframe.label(),
            Style::default().fg(Color::Gray),
        ))
    }
}

// ============================================================================
// Footer : raccourcis clavier
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if app.is_on_picker() {
        Line::from(vec![
            Span::styled("[↑↓ / j k]", key_style),
            Span::raw(" Navigate  "),
            Span::styled("[Enter]", key_style),
            Span::raw(" Select  "),
            Span::styled("[ESC]", key_style),
            Span::raw(" Cancel"),
        ])
    } else {
        Line::from(vec![
            Span::styled("[q]", key_style),
            Span::raw(" Quit  "),
            Span::styled("[h/l]", key_style),
            Span::raw(" Timeframe  "),
            Span::styled("[p]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Pair  "),
            Span::styled("[r]", key_style),
            Span::raw(" Refresh  "),
            Span::styled("[c]", key_style),
            Span::raw(" Clear error"),
        ])
    };

    frame.render_widget(
        Paragraph::new(vec![shortcuts])
            .block(block)
            .alignment(Alignment::Center),
        area,
    );
}
