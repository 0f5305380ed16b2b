use crossterm::event::{Event, KeyEvent, KeyEventKind};
use tui_input::backend::crossterm::EventHandler;

use crate::app::App;
use crate::palette::EngineEvent;

use super::keymap::{HostAction, KeyContext, key_label, map_key};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct InputEventOutcome {
    pub(crate) quit_requested: bool,
    pub(crate) redraw: bool,
}

impl InputEventOutcome {
    fn redraw(redraw: bool) -> Self {
        Self {
            quit_requested: false,
            redraw,
        }
    }

    fn quit() -> Self {
        Self {
            quit_requested: true,
            redraw: false,
        }
    }
}

impl App {
    pub(crate) fn handle_input_event(&mut self, event: Event) -> InputEventOutcome {
        match event {
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                self.handle_key(key)
            }
            Event::Resize(_, _) => InputEventOutcome::redraw(true),
            _ => InputEventOutcome::default(),
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> InputEventOutcome {
        let ctx = self.key_context();
        let Some(action) = map_key(key, ctx, self.preset) else {
            return InputEventOutcome::default();
        };

        let changed = match action {
            HostAction::Quit => return InputEventOutcome::quit(),
            HostAction::Engine(event) => self.dispatch_engine_event(event),
            HostAction::EditQuery => match self.shortcut_target(key) {
                Some(item_id) => self.dispatch_engine_event(EngineEvent::activate(item_id)),
                None => self.edit_query(key),
            },
        };
        self.sync_query_input();
        InputEventOutcome::redraw(changed)
    }

    fn key_context(&self) -> KeyContext {
        KeyContext {
            state: self.engine.state(),
            mode: self
                .engine
                .top_page()
                .map(|page| page.mode)
                .unwrap_or_default(),
            query_is_empty: self.engine.context().query.is_empty(),
        }
    }

    fn shortcut_target(&self, key: KeyEvent) -> Option<String> {
        let label = key_label(key)?;
        self.engine
            .resolve_shortcut(&label)
            .map(|command| command.id.clone())
    }

    fn edit_query(&mut self, key: KeyEvent) -> bool {
        match self.query_input.handle_event(&Event::Key(key)) {
            Some(change) if change.value => {
                let query = self.query_input.value().to_string();
                self.dispatch_engine_event(EngineEvent::query(query))
            }
            Some(change) => change.cursor,
            None => false,
        }
    }

    pub(crate) fn dispatch_engine_event(&mut self, event: EngineEvent) -> bool {
        self.status.last_event_id = Some(event.id());
        self.status.clear_message();
        self.engine.dispatch(event)
    }
}
