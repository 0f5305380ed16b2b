use std::sync::Arc;

use tui_input::Input;

use crate::catalog::CatalogAdapter;
use crate::config::Config;
use crate::error::AppResult;
use crate::input::KeymapPreset;
use crate::palette::PaletteEngine;

use super::state::StatusState;

/// Terminal host around a [`PaletteEngine`] driven by a catalog.
pub struct App {
    pub engine: PaletteEngine,
    pub catalog: Arc<CatalogAdapter>,
    pub config: Config,
    pub status: StatusState,
    pub(crate) query_input: Input,
    pub(crate) preset: KeymapPreset,
}

impl App {
    pub fn new(config: Config) -> AppResult<Self> {
        let catalog = match &config.catalog.path {
            Some(path) => CatalogAdapter::from_path(path)?,
            None => CatalogAdapter::builtin()?,
        };
        Self::new_with_catalog(config, Arc::new(catalog))
    }

    pub fn new_with_catalog(config: Config, catalog: Arc<CatalogAdapter>) -> AppResult<Self> {
        let engine = PaletteEngine::new(catalog.clone())?;
        let preset = KeymapPreset::parse(&config.keymap.preset);
        Ok(Self {
            engine,
            catalog,
            config,
            status: StatusState::default(),
            query_input: Input::default(),
            preset,
        })
    }

    pub fn query_input(&self) -> &Input {
        &self.query_input
    }

    /// Mirrors the engine query into the editor after the engine changed it.
    pub(crate) fn sync_query_input(&mut self) {
        let query = &self.engine.context().query;
        if self.query_input.value() != query {
            self.query_input = Input::new(query.clone());
        }
    }
}
