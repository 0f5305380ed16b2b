mod handler;
pub mod keymap;

pub use keymap::{HostAction, KeyContext, KeymapPreset, key_label, map_key};
