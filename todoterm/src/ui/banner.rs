//! Error banner rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::sync::ErrorNotice;

/// Render the current error, if any, with its dismiss hint.
pub fn render(frame: &mut Frame, area: Rect, notice: &ErrorNotice) {
    let Some(kind) = notice.current() else {
        return;
    };

    let line = Line::from(vec![
        Span::raw(" \u{26a0} "),
        Span::raw(kind.message()),
        Span::raw("  "),
        Span::raw("[Ctrl-X: dismiss]"),
    ]);
    frame.render_widget(Paragraph::new(line).style(theme::error_banner()), area);
}
