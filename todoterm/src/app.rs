//! Application state and event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use todoterm_proto::task::{Task, TaskId};

use crate::editor::TitleEditor;
use crate::filter::Filter;
use crate::gateway::TaskGateway;
use crate::sync::SyncController;

/// Which panel is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// New-task input (default).
    Input,
    /// Task list.
    Tasks,
}

/// Main application state.
pub struct App<G> {
    /// Task operations and the store they act on.
    pub controller: SyncController<G>,
    /// Inline title editor for the selected task.
    pub editor: TitleEditor,
    /// Which panel is focused.
    pub focus: PanelFocus,
    /// Index into the visible task list.
    pub selected: usize,
    /// Loop iterations so far (drives the spinner).
    pub ticks: u64,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<G: TaskGateway + 'static> App<G> {
    /// Create the application around `controller`.
    #[must_use]
    pub const fn new(controller: SyncController<G>) -> Self {
        Self {
            controller,
            editor: TitleEditor::new(),
            focus: PanelFocus::Input,
            selected: 0,
            ticks: 0,
            should_quit: false,
        }
    }

    /// The task under the selection cursor, if any.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.controller.visible().get(self.selected).copied()
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.selected_task().map(|t| t.id)
    }

    /// Apply arrived settlements and resolve a pending title commit.
    ///
    /// Called once per loop iteration, before drawing.
    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
        self.controller.drain_settlements();
        self.editor.poll();

        if let Some(state) = self.editor.state()
            && self.controller.store().get(state.id).is_none()
            && !state.is_pending()
        {
            self.editor.cancel();
        }
        self.clamp_selection();
    }

    /// Handle a key event.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        // Global shortcuts
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            (KeyCode::Char('x'), KeyModifiers::CONTROL) => {
                self.controller.dismiss_error();
                return;
            }
            _ => {}
        }

        if self.editor.is_editing() {
            self.handle_edit_key(key);
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.cycle_focus();
                return;
            }
            _ => {}
        }

        // Focus-specific shortcuts
        match self.focus {
            PanelFocus::Input => self.handle_input_key(key),
            PanelFocus::Tasks => self.handle_tasks_key(key),
        }
    }

    /// Handle key event while a title is being edited.
    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.editor.commit(&mut self.controller),
            KeyCode::Esc => self.editor.cancel(),
            KeyCode::Backspace => self.editor.pop(),
            KeyCode::Char(c) => self.editor.push(c),
            _ => {}
        }
    }

    /// Handle key event when the new-task input is focused.
    ///
    /// The input is locked while a draft is being created.
    fn handle_input_key(&mut self, key: KeyEvent) {
        if self.controller.store().draft().is_some() {
            return;
        }
        match key.code {
            KeyCode::Enter => {
                if let Err(e) = self.controller.submit() {
                    tracing::debug!(error = %e, "task not submitted");
                }
            }
            KeyCode::Char(c) => self.controller.input_mut().push(c),
            KeyCode::Backspace => {
                self.controller.input_mut().pop();
            }
            _ => {}
        }
    }

    /// Handle key event when the task list is focused.
    fn handle_tasks_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.prev_task(),
            KeyCode::Down | KeyCode::Char('j') => self.next_task(),
            KeyCode::Char(' ' | 'x') => {
                if let Some(id) = self.selected_id() {
                    self.controller.toggle(id);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    drop(self.controller.delete(id));
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self.selected_task().cloned() {
                    self.editor.begin(&task);
                }
            }
            KeyCode::Char('a') => {
                self.controller.toggle_all();
            }
            KeyCode::Char('c') => {
                self.controller.delete_completed();
            }
            KeyCode::Left => self.set_filter(self.controller.filter().prev()),
            KeyCode::Right => self.set_filter(self.controller.filter().next()),
            KeyCode::Char('1') => self.set_filter(Filter::All),
            KeyCode::Char('2') => self.set_filter(Filter::Active),
            KeyCode::Char('3') => self.set_filter(Filter::Completed),
            _ => {}
        }
    }

    const fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Input => PanelFocus::Tasks,
            PanelFocus::Tasks => PanelFocus::Input,
        };
    }

    fn set_filter(&mut self, filter: Filter) {
        self.controller.set_filter(filter);
        self.selected = 0;
    }

    /// Select the previous task.
    const fn prev_task(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Select the next task.
    fn next_task(&mut self) {
        if self.selected < self.controller.visible().len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.controller.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}
