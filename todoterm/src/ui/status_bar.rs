//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, PanelFocus};
use crate::gateway::TaskGateway;

/// Render the status bar at the bottom of the screen.
pub fn render<G: TaskGateway + 'static>(frame: &mut Frame, area: Rect, app: &App<G>) {
    let help_text = if app.editor.is_editing() {
        "Enter: save | Esc: cancel"
    } else {
        match app.focus {
            PanelFocus::Input => "Enter: add | Tab: tasks | Esc: quit",
            PanelFocus::Tasks => {
                "Space: toggle | e: edit | d: delete | a: toggle all | \u{2190}\u{2192}: filter | Tab: input"
            }
        }
    };

    let (dot_color, status_text) = if app.controller.has_pending() {
        (theme::WARNING, "Loading...".to_string())
    } else {
        (
            theme::SUCCESS,
            format!(
                "{} | user {}",
                app.controller.gateway().gateway_type(),
                app.controller.user_id()
            ),
        )
    };

    let status_line = Line::from(vec![
        Span::styled(concat!("todoterm v", env!("CARGO_PKG_VERSION")), theme::bold()),
        Span::raw(" | "),
        Span::styled("\u{25cf}", theme::normal().fg(dot_color)),
        Span::raw(format!(" {status_text}")),
        Span::raw(" | "),
        Span::styled(help_text, theme::dimmed()),
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
