//! New-task input rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, PanelFocus};
use crate::filter;
use crate::gateway::TaskGateway;

/// Render the input line with the toggle-all indicator on its left.
///
/// The indicator is hidden when there are no tasks and lit when every task
/// is completed. The input is shown dimmed while a draft is being created.
pub fn render<G: TaskGateway + 'static>(frame: &mut Frame, area: Rect, app: &App<G>) {
    let is_focused = app.focus == PanelFocus::Input && !app.editor.is_editing();
    let store = app.controller.store();
    let locked = store.draft().is_some();

    let mut spans = Vec::new();
    if !store.tasks().is_empty() {
        let style = if filter::all_completed(store.tasks()) {
            theme::normal().fg(theme::SUCCESS)
        } else {
            theme::dimmed()
        };
        spans.push(Span::styled("\u{25bc} ", style));
    }

    let input = app.controller.input();
    if input.is_empty() && !is_focused {
        spans.push(Span::styled("What needs to be done?", theme::dimmed()));
    } else {
        let style = if locked { theme::dimmed() } else { theme::normal() };
        spans.push(Span::styled(input, style));
    }
    if is_focused && !locked {
        spans.push(Span::styled("\u{2588}", theme::input_cursor()));
    }

    let block = Block::default()
        .title(Span::styled("New task", theme::panel_title(theme::INPUT_TITLE)))
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
