use crate::model::{CommandIntent, PageMode};

use super::context::EngineContext;
use super::events::EngineState;
use super::filter::filter_commands;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteItemView {
    pub id: String,
    pub label: String,
    pub subtitle: Option<String>,
    pub disabled: bool,
    pub active: bool,
    pub opens_page: bool,
    /// First unscoped shortcut key, for display.
    pub shortcut: Option<String>,
}

/// Everything a host needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteView {
    pub state: EngineState,
    pub title: String,
    pub subtitle: Option<String>,
    pub mode: PageMode,
    pub placeholder: Option<String>,
    pub submit_label: Option<String>,
    pub empty_state_text: Option<String>,
    pub query: String,
    pub items: Vec<PaletteItemView>,
    /// Index of the active item within `items`.
    pub active_idx: Option<usize>,
    pub last_error: Option<String>,
    /// Page titles from the root to the top.
    pub breadcrumbs: Vec<String>,
}

impl PaletteView {
    pub fn build(state: EngineState, ctx: &EngineContext) -> Self {
        let top = ctx.top();
        let items: Vec<PaletteItemView> = top
            .map(|page| {
                filter_commands(page, &ctx.query)
                    .into_iter()
                    .map(|command| PaletteItemView {
                        id: command.id.clone(),
                        label: command.label.clone(),
                        subtitle: command.subtitle.clone(),
                        disabled: command.disabled,
                        active: ctx.active_item_id.as_deref() == Some(command.id.as_str()),
                        opens_page: command.intent == CommandIntent::Page,
                        shortcut: command
                            .shortcuts
                            .iter()
                            .find(|shortcut| shortcut.target_item_id.is_none())
                            .map(|shortcut| shortcut.key.clone()),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let active_idx = items.iter().position(|item| item.active);

        Self {
            state,
            title: top.map(|page| page.title.clone()).unwrap_or_default(),
            subtitle: top.and_then(|page| page.subtitle.clone()),
            mode: top.map(|page| page.mode).unwrap_or_default(),
            placeholder: top.and_then(|page| page.placeholder.clone()),
            submit_label: top.and_then(|page| page.submit_label.clone()),
            empty_state_text: top.and_then(|page| page.empty_state_text.clone()),
            query: ctx.query.clone(),
            items,
            active_idx,
            last_error: ctx.last_error.clone(),
            breadcrumbs: ctx.stack.iter().map(|page| page.title.clone()).collect(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_awaiting()
    }
}
