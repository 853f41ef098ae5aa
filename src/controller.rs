use crate::error::AppError;
use crate::manager::TaskManager;
use crate::model::{Completion, Section, Task};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

pub enum Mode {
    List,
    AddTask(InputBuffer),
    ConfirmDelete { index: usize, name: String },
    ConfirmClear,
    Help,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::List => "list",
            Mode::AddTask(_) => "add",
            Mode::ConfirmDelete { .. } => "confirm delete",
            Mode::ConfirmClear => "confirm clear",
            Mode::Help => "help",
        }
    }
}

/// What a key press means in the active mode. Produced by [`resolve`] and
/// carried out by [`Controller::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    CursorUp,
    CursorDown,
    PrevSection,
    NextSection,
    SelectSection(Section),
    Toggle,
    OpenAdd,
    Edit(InputEdit),
    CommitAdd,
    CancelAdd,
    RequestDelete,
    ConfirmDelete,
    RequestClear,
    ConfirmClear,
    Cancel,
    ShowHelp,
    CloseHelp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEdit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The keybinding table, keyed by mode then key.
pub fn resolve(mode: &Mode, key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match mode {
        Mode::List => match key.code {
            KeyCode::Char('c') if ctrl => Action::Quit,
            KeyCode::Char('d') if ctrl => Action::RequestClear,
            _ if ctrl => Action::None,
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Up | KeyCode::Char('k') => Action::CursorUp,
            KeyCode::Down | KeyCode::Char('j') => Action::CursorDown,
            KeyCode::Left => Action::PrevSection,
            KeyCode::Right => Action::NextSection,
            KeyCode::Char('1') => Action::SelectSection(Section::Daily),
            KeyCode::Char('2') => Action::SelectSection(Section::Weekly),
            KeyCode::Char('3') => Action::SelectSection(Section::Monthly),
            KeyCode::Char(' ') => Action::Toggle,
            KeyCode::Char('a') => Action::OpenAdd,
            KeyCode::Char('d') => Action::RequestDelete,
            KeyCode::Char('h') | KeyCode::Char('?') => Action::ShowHelp,
            _ => Action::None,
        },
        Mode::AddTask(_) => match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => Action::CancelAdd,
            KeyCode::Esc => Action::CancelAdd,
            KeyCode::Enter => Action::CommitAdd,
            KeyCode::Backspace => Action::Edit(InputEdit::Backspace),
            KeyCode::Delete => Action::Edit(InputEdit::Delete),
            KeyCode::Left => Action::Edit(InputEdit::Left),
            KeyCode::Right => Action::Edit(InputEdit::Right),
            KeyCode::Home => Action::Edit(InputEdit::Home),
            KeyCode::End => Action::Edit(InputEdit::End),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Action::Edit(InputEdit::Insert(c))
            }
            _ => Action::None,
        },
        Mode::ConfirmDelete { .. } | Mode::ConfirmClear => match key.code {
            KeyCode::Char('c') if ctrl => Action::Quit,
            KeyCode::Char('q') if !ctrl => Action::Quit,
            KeyCode::Char('y') | KeyCode::Char('Y') => match mode {
                Mode::ConfirmDelete { .. } => Action::ConfirmDelete,
                _ => Action::ConfirmClear,
            },
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::Cancel,
            _ => Action::None,
        },
        Mode::Help => match key.code {
            KeyCode::Char('c') if ctrl => Action::Quit,
            KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Char('?') | KeyCode::Esc => {
                Action::CloseHelp
            }
            _ => Action::None,
        },
    }
}

/// Single-line text entry with a byte cursor kept on char boundaries.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    value: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn apply(&mut self, edit: InputEdit) {
        match edit {
            InputEdit::Insert(ch) => {
                self.value.insert(self.cursor, ch);
                self.cursor += ch.len_utf8();
            }
            InputEdit::Backspace => {
                if self.cursor > 0 {
                    let prev = prev_boundary(self.cursor, &self.value);
                    self.value.drain(prev..self.cursor);
                    self.cursor = prev;
                }
            }
            InputEdit::Delete => {
                if self.cursor < self.value.len() {
                    let next = next_boundary(self.cursor, &self.value);
                    self.value.drain(self.cursor..next);
                }
            }
            InputEdit::Left => self.cursor = prev_boundary(self.cursor, &self.value),
            InputEdit::Right => self.cursor = next_boundary(self.cursor, &self.value),
            InputEdit::Home => self.cursor = 0,
            InputEdit::End => self.cursor = self.value.len(),
        }
    }

    pub fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert_str(self.cursor, "▌");
        text
    }
}

fn prev_boundary(cursor: usize, text: &str) -> usize {
    text[..cursor]
        .char_indices()
        .next_back()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

fn next_boundary(cursor: usize, text: &str) -> usize {
    text[cursor..]
        .chars()
        .next()
        .map(|ch| cursor + ch.len_utf8())
        .unwrap_or(text.len())
}

/// Owns the task manager, the active mode and one selection cursor per section.
pub struct Controller {
    manager: TaskManager,
    mode: Mode,
    cursors: [usize; 3],
    status: String,
}

impl Controller {
    pub fn new(manager: TaskManager) -> Self {
        let status = format!("Loaded tasks from {}", manager.store().path().display());
        Controller {
            manager,
            mode: Mode::List,
            cursors: [0; 3],
            status,
        }
    }

    pub fn manager(&self) -> &TaskManager {
        &self.manager
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn current_section(&self) -> Section {
        self.manager.current_section()
    }

    pub fn current_tasks(&self) -> &[Task] {
        self.manager.current_tasks()
    }

    pub fn completion(&self) -> Completion {
        self.manager.completion()
    }

    /// Cursor of the current section; 0 when the section is empty.
    pub fn selected(&self) -> usize {
        self.cursor_for(self.current_section())
    }

    pub fn cursor_for(&self, section: Section) -> usize {
        let len = self.manager.tasks(section).len();
        self.cursors[section.index()].min(len.saturating_sub(1))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let action = resolve(&self.mode, key);
        self.apply(action)
    }

    pub fn apply(&mut self, action: Action) -> Flow {
        match action {
            Action::None => {}
            Action::Quit => return Flow::Quit,
            Action::CursorUp => {
                let selected = self.selected();
                self.set_cursor(selected.saturating_sub(1));
            }
            Action::CursorDown => {
                let selected = self.selected();
                self.set_cursor(selected + 1);
            }
            Action::PrevSection => self.switch_to(self.current_section().prev()),
            Action::NextSection => self.switch_to(self.current_section().next()),
            Action::SelectSection(section) => self.switch_to(section),
            Action::Toggle => {
                let index = self.selected();
                match self.manager.toggle_task(index) {
                    Ok(true) => {
                        let task = &self.current_tasks()[index];
                        self.status = if task.completed {
                            format!("Completed \"{}\"", task.name)
                        } else {
                            format!("Reopened \"{}\"", task.name)
                        };
                    }
                    Ok(false) => self.status = "Nothing to toggle".into(),
                    Err(err) => self.save_failed(err),
                }
            }
            Action::OpenAdd => {
                self.mode = Mode::AddTask(InputBuffer::default());
                self.status = "Adding task (Enter save, Esc cancel)".into();
            }
            Action::Edit(edit) => {
                if let Mode::AddTask(buffer) = &mut self.mode {
                    buffer.apply(edit);
                }
            }
            Action::CommitAdd => {
                if !matches!(self.mode, Mode::AddTask(_)) {
                    return Flow::Continue;
                }
                let mode = std::mem::replace(&mut self.mode, Mode::List);
                if let Mode::AddTask(buffer) = mode {
                    match self.manager.add_task(buffer.value()) {
                        Ok(true) => {
                            self.status = format!(
                                "Added \"{}\" to {}",
                                buffer.value().trim(),
                                self.current_section().label()
                            )
                        }
                        Ok(false) => self.status = "Empty task discarded".into(),
                        Err(err) => self.save_failed(err),
                    }
                }
            }
            Action::CancelAdd => {
                self.mode = Mode::List;
                self.status = "Canceled".into();
            }
            Action::RequestDelete => {
                let index = self.selected();
                match self.current_tasks().get(index) {
                    Some(task) => {
                        let name = task.name.clone();
                        self.status = format!("Delete \"{}\"? (y to confirm, n/Esc to cancel)", name);
                        self.mode = Mode::ConfirmDelete { index, name };
                    }
                    None => self.status = "No task selected to delete".into(),
                }
            }
            Action::ConfirmDelete => {
                if !matches!(self.mode, Mode::ConfirmDelete { .. }) {
                    return Flow::Continue;
                }
                let mode = std::mem::replace(&mut self.mode, Mode::List);
                if let Mode::ConfirmDelete { index, name } = mode {
                    let result = self.manager.delete_task(index);
                    if self.selected_raw() >= self.current_tasks().len() {
                        self.set_cursor(0);
                    }
                    match result {
                        Ok(Some(_)) => self.status = format!("Deleted \"{}\"", name),
                        Ok(None) => self.status = "Task no longer exists".into(),
                        Err(err) => self.save_failed(err),
                    }
                }
            }
            Action::RequestClear => {
                self.mode = Mode::ConfirmClear;
                self.status = format!(
                    "Clear all {}? (y to confirm, n/Esc to cancel)",
                    self.current_section().label()
                );
            }
            Action::ConfirmClear => {
                if !matches!(self.mode, Mode::ConfirmClear) {
                    return Flow::Continue;
                }
                self.mode = Mode::List;
                let result = self.manager.clear_all();
                self.set_cursor(0);
                match result {
                    Ok(()) => {
                        self.status = format!("Cleared {}", self.current_section().label())
                    }
                    Err(err) => self.save_failed(err),
                }
            }
            Action::Cancel => {
                self.mode = Mode::List;
                self.status = "Canceled".into();
            }
            Action::ShowHelp => self.mode = Mode::Help,
            Action::CloseHelp => self.mode = Mode::List,
        }
        Flow::Continue
    }

    fn switch_to(&mut self, section: Section) {
        self.manager.set_section(section);
        let selected = self.selected();
        self.set_cursor(selected);
        self.status = format!("Viewing {}", section.label());
    }

    fn selected_raw(&self) -> usize {
        self.cursors[self.current_section().index()]
    }

    fn set_cursor(&mut self, index: usize) {
        let len = self.current_tasks().len();
        let idx = self.current_section().index();
        self.cursors[idx] = index.min(len.saturating_sub(1));
    }

    fn save_failed(&mut self, err: AppError) {
        warn!(error = %err, "saving tasks failed");
        self.status = format!("Save failed: {}", err);
    }
}
