mod chrome;
mod layout;
mod overlay;

pub use chrome::{StatusLine, draw_chrome};
pub use layout::{UiLayout, split_layout};
pub use overlay::{OverlayOptions, draw_idle_hint, draw_palette_overlay};
