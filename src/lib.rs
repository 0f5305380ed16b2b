pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub(crate) mod event;
pub mod input;
pub mod logging;
pub mod model;
pub mod palette;
pub mod ui;
