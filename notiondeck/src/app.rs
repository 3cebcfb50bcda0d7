//! Application state and event handling.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use notiondeck_proto::item::Item;

use crate::net::{NetCommand, NetEvent};
use crate::sync::SyncController;

/// Which panel is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Title input of the create form (default).
    Title,
    /// Description input of the create form.
    Description,
    /// Status selector of the create form.
    Status,
    /// Item list.
    List,
}

impl PanelFocus {
    /// Whether the focus is inside the create form.
    #[must_use]
    pub const fn in_form(self) -> bool {
        !matches!(self, Self::List)
    }
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Cached items, notices and the create-form draft.
    pub sync: SyncController,
    /// Which panel is focused.
    pub focus: PanelFocus,
    /// Selected index in the item list.
    pub selected: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new(crate::sync::DEFAULT_NOTICE_TTL)
    }
}

impl App {
    /// Create an application with an empty list.
    #[must_use]
    pub fn new(notice_ttl: Duration) -> Self {
        Self {
            sync: SyncController::new(notice_ttl),
            focus: PanelFocus::Title,
            selected: 0,
            should_quit: false,
        }
    }

    /// The item under the list cursor.
    #[must_use]
    pub fn selected_item(&self) -> Option<&Item> {
        self.sync.state().items().get(self.selected)
    }

    /// Handle a key event.
    ///
    /// Returns a command when the key triggers a network action.
    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) -> Option<NetCommand> {
        // Global shortcuts
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                self.should_quit = true;
                return None;
            }
            (KeyCode::Tab, KeyModifiers::SHIFT) | (KeyCode::BackTab, _) => {
                self.cycle_focus_backward();
                return None;
            }
            (KeyCode::Tab, _) => {
                self.cycle_focus_forward();
                return None;
            }
            (KeyCode::F(5), _) => return self.request_load(),
            (KeyCode::F(2), _) => return Some(NetCommand::Probe),
            _ => {}
        }

        // Focus-specific shortcuts
        match self.focus {
            PanelFocus::Title | PanelFocus::Description => self.handle_text_key(key, now),
            PanelFocus::Status => self.handle_status_key(key, now),
            PanelFocus::List => self.handle_list_key(key),
        }
    }

    /// Start a full reload unless a request is outstanding.
    pub fn request_load(&mut self) -> Option<NetCommand> {
        self.sync.load()
    }

    /// Apply the outcome of a network command.
    pub fn apply(&mut self, event: NetEvent, now: Instant) {
        self.sync.apply(event, now);
        self.clamp_selection();
    }

    /// Record that `cmd` never reached the net task.
    pub fn undeliverable(&mut self, cmd: NetCommand, reason: &str, now: Instant) {
        self.sync.undeliverable(cmd, reason, now);
    }

    /// Expire stale notices. Returns `true` if anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.sync.expire(now)
    }

    fn handle_text_key(&mut self, key: KeyEvent, now: Instant) -> Option<NetCommand> {
        if key.code == KeyCode::Enter {
            return self.sync.create(now);
        }
        let draft = self.sync.draft_mut();
        let field = if self.focus == PanelFocus::Title {
            &mut draft.title
        } else {
            &mut draft.description
        };
        match key.code {
            KeyCode::Char(c) => field.push(c),
            KeyCode::Backspace => {
                field.pop();
            }
            _ => {}
        }
        None
    }

    fn handle_status_key(&mut self, key: KeyEvent, now: Instant) -> Option<NetCommand> {
        match key.code {
            KeyCode::Enter => return self.sync.create(now),
            KeyCode::Right | KeyCode::Char(' ' | 'l') => {
                let draft = self.sync.draft_mut();
                draft.status = draft.status.next();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                // Three known statuses, so two steps forward is one back.
                let draft = self.sync.draft_mut();
                draft.status = draft.status.next().next();
            }
            _ => {}
        }
        None
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.sync.state().items().len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char('r') => self.request_load(),
            KeyCode::Char('p') => Some(NetCommand::Probe),
            KeyCode::Char('d') | KeyCode::Delete => self.request_archive(),
            _ => None,
        }
    }

    fn request_archive(&mut self) -> Option<NetCommand> {
        let id = self.selected_item()?.id.clone();
        self.sync.archive(&id)
    }

    const fn cycle_focus_forward(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Title => PanelFocus::Description,
            PanelFocus::Description => PanelFocus::Status,
            PanelFocus::Status => PanelFocus::List,
            PanelFocus::List => PanelFocus::Title,
        };
    }

    const fn cycle_focus_backward(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Title => PanelFocus::List,
            PanelFocus::List => PanelFocus::Status,
            PanelFocus::Status => PanelFocus::Description,
            PanelFocus::Description => PanelFocus::Title,
        };
    }

    fn clamp_selection(&mut self) {
        let len = self.sync.state().items().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}
