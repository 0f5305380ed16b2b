use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::PageMode;
use crate::palette::{EngineEvent, EngineState, NavDirection, OpenState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapPreset {
    Default,
    Emacs,
}

impl KeymapPreset {
    pub fn parse(value: &str) -> Self {
        match value {
            "default" => Self::Default,
            "emacs" => Self::Emacs,
            _ => Self::Default,
        }
    }
}

/// What the host should do with a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    Engine(EngineEvent),
    /// Feed the key to the query editor.
    EditQuery,
    Quit,
}

/// Engine facts the keymap needs to pick a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyContext {
    pub state: EngineState,
    pub mode: PageMode,
    pub query_is_empty: bool,
}

pub fn map_key(key: KeyEvent, ctx: KeyContext, preset: KeymapPreset) -> Option<HostAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(HostAction::Quit);
    }

    match ctx.state {
        EngineState::Closed => map_closed_key(key, preset),
        EngineState::Open(OpenState::Browsing) => match preset {
            KeymapPreset::Default => map_browsing_key_default(key, ctx),
            KeymapPreset::Emacs => map_browsing_key_emacs(key, ctx),
        },
        EngineState::Open(OpenState::Error) => map_error_key(key, preset),
        EngineState::Open(
            OpenState::LoadingPage | OpenState::Executing | OpenState::SubmittingInput,
        ) => map_pending_key(key, preset),
    }
}

fn engine(event: EngineEvent) -> Option<HostAction> {
    Some(HostAction::Engine(event))
}

fn map_closed_key(key: KeyEvent, preset: KeymapPreset) -> Option<HostAction> {
    if preset == KeymapPreset::Emacs {
        if key.modifiers.contains(KeyModifiers::ALT) && key.code == KeyCode::Char('x') {
            return engine(EngineEvent::Open);
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('q') {
            return Some(HostAction::Quit);
        }
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('k') => engine(EngineEvent::Toggle),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(':') | KeyCode::Char(' ') | KeyCode::Enter => engine(EngineEvent::Open),
        KeyCode::Char('q') | KeyCode::Esc => Some(HostAction::Quit),
        _ => None,
    }
}

fn map_browsing_key_default(key: KeyEvent, ctx: KeyContext) -> Option<HostAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('k') => engine(EngineEvent::Toggle),
            KeyCode::Char('n') => engine(EngineEvent::Nav(NavDirection::Next)),
            KeyCode::Char('p') => engine(EngineEvent::Nav(NavDirection::Prev)),
            _ => Some(HostAction::EditQuery),
        };
    }

    match key.code {
        KeyCode::Esc => engine(EngineEvent::Back),
        KeyCode::Enter => match ctx.mode {
            PageMode::List => engine(EngineEvent::activate_current()),
            PageMode::Input => engine(EngineEvent::Submit { value: None }),
        },
        KeyCode::Backspace if ctx.query_is_empty => engine(EngineEvent::Back),
        KeyCode::Down | KeyCode::Tab if ctx.mode == PageMode::List => {
            engine(EngineEvent::Nav(NavDirection::Next))
        }
        KeyCode::Up | KeyCode::BackTab if ctx.mode == PageMode::List => {
            engine(EngineEvent::Nav(NavDirection::Prev))
        }
        KeyCode::PageUp if ctx.mode == PageMode::List => {
            engine(EngineEvent::Nav(NavDirection::Home))
        }
        KeyCode::PageDown if ctx.mode == PageMode::List => {
            engine(EngineEvent::Nav(NavDirection::End))
        }
        _ => Some(HostAction::EditQuery),
    }
}

fn map_browsing_key_emacs(key: KeyEvent, ctx: KeyContext) -> Option<HostAction> {
    if key.modifiers.contains(KeyModifiers::ALT) {
        return match key.code {
            KeyCode::Char('x') => engine(EngineEvent::Toggle),
            KeyCode::Char('<') => engine(EngineEvent::Nav(NavDirection::Home)),
            KeyCode::Char('>') => engine(EngineEvent::Nav(NavDirection::End)),
            _ => Some(HostAction::EditQuery),
        };
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('g') => engine(EngineEvent::Back),
            KeyCode::Char('m') | KeyCode::Char('j') => {
                map_browsing_key_default(KeyEvent::from(KeyCode::Enter), ctx)
            }
            KeyCode::Char('q') => Some(HostAction::Quit),
            _ => map_browsing_key_default(key, ctx),
        };
    }

    map_browsing_key_default(key, ctx)
}

fn map_error_key(key: KeyEvent, preset: KeymapPreset) -> Option<HostAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match (preset, key.code) {
            (_, KeyCode::Char('r')) => engine(EngineEvent::Retry),
            (_, KeyCode::Char('k')) => engine(EngineEvent::Toggle),
            (KeymapPreset::Emacs, KeyCode::Char('g')) => engine(EngineEvent::Back),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Enter => engine(EngineEvent::Retry),
        KeyCode::Esc => engine(EngineEvent::Back),
        KeyCode::Char(_) | KeyCode::Backspace | KeyCode::Delete => Some(HostAction::EditQuery),
        _ => None,
    }
}

fn map_pending_key(key: KeyEvent, preset: KeymapPreset) -> Option<HostAction> {
    let abort = match preset {
        KeymapPreset::Default => key.code == KeyCode::Esc,
        KeymapPreset::Emacs => {
            key.code == KeyCode::Esc
                || (key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('g'))
        }
    };
    abort.then_some(HostAction::Engine(EngineEvent::Close))
}

/// Shortcut key name for a key press, as written in catalogs.
///
/// Plain characters map to themselves; modified keys read like `ctrl+s`.
pub fn key_label(key: KeyEvent) -> Option<String> {
    let base = match key.code {
        KeyCode::Char(ch) => ch.to_lowercase().to_string(),
        KeyCode::F(n) => format!("f{n}"),
        _ => return None,
    };

    let mut label = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        label.push_str("ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        label.push_str("alt+");
    }
    label.push_str(&base);
    Some(label)
}
