mod adapter;
mod context;
mod engine;
mod events;
mod filter;
mod shortcut;
mod stack;
mod view;

#[cfg(test)]
mod tests;

pub use adapter::PaletteAdapter;
pub use context::{EngineContext, LoadKind, LoadRequest};
pub use engine::{AdapterOutcome, PaletteEngine};
pub use events::{EngineEvent, EngineState, NavDirection, OpenState};
pub use filter::{CommandMatcher, ContainsMatcher, filter_commands, filter_commands_with, normalize};
pub use shortcut::resolve_shortcut;
pub use stack::{apply_loaded_page, apply_result, move_active_id};
pub use view::{PaletteItemView, PaletteView};
