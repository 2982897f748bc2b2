// ============================================================================
// Chart - Graphique des clôtures
// ============================================================================
// Affiche un graphique ligne (line chart) des closes de la série courante
//
// CONCEPTS RUST :
// 1. Iterator chaining : transformer les barres en points (x, y)
// 2. fold : min et max en une seule passe
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de données à afficher
// 3. Axis : configuration des axes X et Y
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::models::{AggregateBar, Timeframe};
use crate::store::MarketState;
use crate::ui::dashboard::change_color;
use crate::utils::{format_chart_date, format_currency_pair, format_price, format_price_change};

/// Dessine le graphique de la paire sélectionnée
pub fn render_chart(frame: &mut Frame, state: &MarketState, area: Rect) {
    if state.historical_data.is_empty() {
        let message = if state.loading {
            "Chargement..."
        } else {
            state.error.as_deref().unwrap_or("Pas de données à afficher")
        };
        render_no_data(frame, area, message);
        return;
    }

    let points: Vec<(f64, f64)> = state
        .historical_data
        .iter()
        .enumerate()
        .map(|(i, bar)| (i as f64, bar.close))
        .collect();

    let (y_min, y_max) = price_bounds(&points);
    let x_max = (points.len().saturating_sub(1) as f64).max(1.0);

    let color = change_color(format_price_change(Some(state.price_change().value)).color);
    let pair = format_currency_pair(&state.selected_ticker());

    let datasets = vec![Dataset::default()
        .name(pair.clone())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points)];

    let x_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, x_max])
        .labels(time_labels(&state.historical_data, state.timeframe));

    let y_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format_price(Some(y_min))),
            Span::raw(format_price(Some((y_min + y_max) / 2.0))),
            Span::raw(format_price(Some(y_max))),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} - {} ", pair, state.timeframe.label())),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Bornes de l'axe Y avec 5% de marge
///
/// Une série plate reçoit une marge fixe pour que la ligne reste visible.
fn price_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let (min_price, max_price) = points.iter().fold(
        (f64::MAX, f64::MIN),
        |(min, max), &(_x, y)| (min.min(y), max.max(y)),
    );

    let margin = match (max_price - min_price) * 0.05 {
        m if m > 0.0 => m,
        _ => (max_price.abs() * 0.001).max(1e-6),
    };

    ((min_price - margin).max(0.0), max_price + margin)
}

/// Labels de l'axe X : première, médiane et dernière barre
fn time_labels(bars: &[AggregateBar], timeframe: Timeframe) -> Vec<Span<'static>> {
    let label = |bar: Option<&AggregateBar>| {
        Span::raw(
            bar.map(|b| format_chart_date(b.timestamp, timeframe))
                .unwrap_or_default(),
        )
    };

    vec![
        label(bars.first()),
        label(bars.get(bars.len() / 2)),
        label(bars.last()),
    ]
}

/// Affiche un message quand il n'y a pas de données à afficher
fn render_no_data(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Graphique ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled(
            "[h/l] Timeframe  [p] Pair  [r] Refresh",
            Style::default().fg(Color::Gray),
        )),
    ];

    frame.render_widget(
        Paragraph::new(text).block(block).alignment(Alignment::Center),
        area,
    );
}
