//! Task list rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use todoterm_proto::task::{Task, TaskId};

use super::{spinner_frame, theme};
use crate::app::{App, PanelFocus};
use crate::gateway::TaskGateway;

/// Render the visible tasks followed by the draft row, if any.
pub fn render<G: TaskGateway + 'static>(frame: &mut Frame, area: Rect, app: &App<G>) {
    let is_focused = app.focus == PanelFocus::Tasks;
    let store = app.controller.store();
    let spinner = spinner_frame(app.ticks);

    let mut items: Vec<ListItem> = app
        .controller
        .visible()
        .into_iter()
        .map(|task| {
            let busy = store.is_in_flight(task.id);
            ListItem::new(task_line(app, task, busy, spinner))
        })
        .collect();

    if let Some(draft) = store.draft() {
        let busy = store.is_in_flight(TaskId::DRAFT);
        items.push(ListItem::new(task_line(app, draft, busy, spinner)).style(theme::dimmed()));
    }

    let block = Block::default()
        .title(Span::styled(
            format!("Tasks ({})", app.controller.filter()),
            theme::panel_title(theme::TASKS_TITLE),
        ))
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    let list = List::new(items)
        .block(block)
        .highlight_style(if is_focused {
            theme::selected()
        } else {
            theme::normal()
        });

    let mut state = ListState::default();
    if is_focused && !app.controller.visible().is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn task_line<'a, G: TaskGateway + 'static>(
    app: &'a App<G>,
    task: &'a Task,
    busy: bool,
    spinner: &'static str,
) -> Line<'a> {
    let (checkbox, checkbox_style) = if task.completed {
        ("[x]", theme::normal().fg(theme::SUCCESS))
    } else {
        ("[ ]", theme::normal())
    };
    let mut spans = vec![
        Span::styled(if busy { spinner } else { " " }, theme::warning()),
        Span::raw(" "),
        Span::styled(checkbox, checkbox_style),
        Span::raw(" "),
    ];

    match app.editor.state().filter(|s| s.id == task.id) {
        Some(edit) => {
            spans.push(Span::styled(edit.buffer.as_str(), theme::edit_field()));
            if !edit.is_pending() {
                spans.push(Span::styled("\u{2588}", theme::input_cursor()));
            }
        }
        None => {
            let style = if task.completed {
                theme::completed()
            } else {
                theme::normal()
            };
            spans.push(Span::styled(task.title.as_str(), style));
        }
    }
    Line::from(spans)
}
