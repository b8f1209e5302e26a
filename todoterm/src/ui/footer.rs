//! Footer rendering: remaining count, filter tabs and clear-completed.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::App;
use crate::filter::{self, Filter};
use crate::gateway::TaskGateway;

/// "1 item left" / "N items left".
#[must_use]
pub fn items_left_label(count: usize) -> String {
    if count == 1 {
        "1 item left".to_string()
    } else {
        format!("{count} items left")
    }
}

/// Render the footer. Hidden when there are no tasks.
pub fn render<G: TaskGateway + 'static>(frame: &mut Frame, area: Rect, app: &App<G>) {
    let tasks = app.controller.store().tasks();
    if tasks.is_empty() {
        return;
    }

    let mut spans = vec![
        Span::styled(items_left_label(filter::active_count(tasks)), theme::bold()),
        Span::raw("  "),
    ];

    let current = app.controller.filter();
    for (i, f) in Filter::ALL.into_iter().enumerate() {
        let style = if f == current {
            theme::highlighted()
        } else {
            theme::dimmed()
        };
        spans.push(Span::styled(format!("{}:{}", i + 1, f.label()), style));
        spans.push(Span::raw(" "));
    }

    let clear_style = if filter::completed_ids(tasks).is_empty() {
        theme::dimmed()
    } else {
        theme::normal()
    };
    spans.push(Span::raw(" "));
    spans.push(Span::styled("c: Clear completed", clear_style));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
