// ============================================================================
// Sélecteur de paire
// ============================================================================
// Liste des devises du catalogue (code + nom). Première étape : devise de
// base ; seconde étape : devise de cotation.
//
// CONCEPT RATATUI : List + ListState
// - ListState garde la ligne surlignée et fait défiler la liste
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, PickerStage};
use crate::store::MarketState;

pub fn render_picker(frame: &mut Frame, app: &App, state: &MarketState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(picker_title(app));

    let currencies = state.unique_currencies();
    if currencies.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Aucune paire disponible",
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(
            Paragraph::new(text).block(block).alignment(Alignment::Center),
            area,
        );
        return;
    }

    let names = state.currency_names();
    let items: Vec<ListItem> = currencies
        .iter()
        .map(|code| {
            let name = names.get(code).map(String::as_str).unwrap_or("");
            let style = if app.picked_base.as_deref() == Some(code.as_str()) {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!(" {:<5} {}", code, name)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED),
        )
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default().with_selected(Some(app.picker_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn picker_title(app: &App) -> String {
    match (app.picker_stage, &app.picked_base) {
        (PickerStage::Quote, Some(base)) => format!(" Quote currency ({}/...) ", base),
        _ => " Base currency ".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_title() {
        let mut app = App::new();
        app.open_picker();
        assert_eq!(picker_title(&app), " Base currency ");

        app.confirm_picker(&["GBP".to_string(), "JPY".to_string()]);
        assert_eq!(picker_title(&app), " Quote currency (GBP/...) ");
    }
}
