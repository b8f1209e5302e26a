//! Terminal UI rendering.

pub mod banner;
pub mod footer;
pub mod header;
pub mod status_bar;
pub mod task_list;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::gateway::TaskGateway;

/// Frames of the in-flight spinner.
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Spinner frame for the given loop tick.
fn spinner_frame(tick: u64) -> &'static str {
    let idx = usize::try_from(tick % SPINNER.len() as u64).unwrap_or(0);
    SPINNER[idx]
}

/// Main draw function for the entire UI.
pub fn draw<G: TaskGateway + 'static>(frame: &mut Frame, app: &App<G>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // New-task input
            Constraint::Length(1), // Error banner
            Constraint::Min(3),    // Task list
            Constraint::Length(1), // Footer
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    header::render(frame, chunks[0], app);
    banner::render(frame, chunks[1], app.controller.notice());
    task_list::render(frame, chunks[2], app);
    footer::render(frame, chunks[3], app);
    status_bar::render(frame, chunks[4], app);
}

/// Draw the view shown when no user id is configured.
///
/// No requests are made in this mode; the only key accepted is quit.
pub fn draw_setup_warning(frame: &mut Frame) {
    let lines = vec![
        Line::from(Span::styled("No user id configured", theme::warning())),
        Line::from(""),
        Line::from("Set one of:"),
        Line::from(Span::styled("  --user-id <ID>", theme::bold())),
        Line::from(Span::styled("  TODOTERM_USER_ID=<ID>", theme::bold())),
        Line::from(Span::styled(
            "  [api] user_id = <ID>  in ~/.config/todoterm/config.toml",
            theme::bold(),
        )),
        Line::from(""),
        Line::from(Span::styled("Esc / Ctrl-C: quit", theme::dimmed())),
    ];

    let block = Block::default()
        .title(Span::styled("todoterm", theme::panel_title(theme::WARNING)))
        .borders(Borders::ALL)
        .border_style(theme::normal().fg(theme::WARNING));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, frame.area());
}
