use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::model::{Command, CommandIntent, CommandResult, LoadReply, Meta, Page};
use crate::palette::PaletteAdapter;

use super::builtin::BUILTIN_CATALOG;
use super::schema::{Catalog, CatalogCommand, CatalogPage, Effect, FollowUp};

/// Serves pages from a [`Catalog`] and keeps its settings in memory.
///
/// Labels and subtitles may reference settings as `{name}`; they are rendered
/// every time a page is loaded, so a refresh shows the latest values.
pub struct CatalogAdapter {
    catalog: Catalog,
    settings: Mutex<BTreeMap<String, String>>,
}

impl CatalogAdapter {
    pub fn new(catalog: Catalog) -> AppResult<Self> {
        catalog.validate()?;
        let settings = Mutex::new(catalog.settings.clone());
        Ok(Self { catalog, settings })
    }

    pub fn builtin() -> AppResult<Self> {
        Self::new(Catalog::from_toml_str(BUILTIN_CATALOG)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        Self::new(Catalog::load_from_path(path)?)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> BTreeMap<String, String> {
        self.lock_settings().clone()
    }

    pub fn setting(&self, name: &str) -> Option<String> {
        self.lock_settings().get(name).cloned()
    }

    /// Builds the palette page for `page_id` with the current settings.
    pub fn render_page(&self, page_id: &str) -> AppResult<Page> {
        let source = self
            .catalog
            .page(page_id)
            .ok_or_else(|| AppError::adapter(format!("unknown page '{page_id}'")))?;
        let settings = self.lock_settings();
        Ok(render_page(source, &settings))
    }

    fn lock_settings(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_setting(&self, name: &str, value: String) {
        debug!(setting = name, value = %value, "setting updated");
        self.lock_settings().insert(name.to_string(), value);
    }

    fn command(&self, page_id: &str, item_id: &str) -> AppResult<&CatalogCommand> {
        self.catalog
            .page(page_id)
            .and_then(|page| page.commands.iter().find(|command| command.id == item_id))
            .ok_or_else(|| {
                AppError::adapter(format!("unknown command '{item_id}' on page '{page_id}'"))
            })
    }

    fn apply_effect(&self, effect: &Effect) -> AppResult<CommandResult> {
        let result = match effect {
            Effect::Set {
                setting,
                value,
                then,
            } => {
                self.write_setting(setting, value.clone());
                follow_up(*then)
            }
            Effect::Toggle { setting, on, off } => {
                let next = if self.setting(setting).as_deref() == Some(on.as_str()) {
                    off.clone()
                } else {
                    on.clone()
                };
                self.write_setting(setting, next);
                CommandResult::RefreshPage
            }
            Effect::Push { page } => CommandResult::push(self.render_page(page)?),
            Effect::Replace { page } => CommandResult::replace(self.render_page(page)?),
            Effect::Pop => CommandResult::PopPage,
            Effect::Refresh => CommandResult::RefreshPage,
            Effect::Stay => CommandResult::Stay,
            Effect::Close => CommandResult::Close,
            Effect::Fail { message } => CommandResult::error(message.clone()),
        };
        Ok(result)
    }
}

#[async_trait]
impl PaletteAdapter for CatalogAdapter {
    async fn load_root(&self) -> AppResult<Page> {
        self.render_page(&self.catalog.root)
    }

    async fn load_child(
        &self,
        page_id: &str,
        _item_id: &str,
        _query: Option<&str>,
        _meta: Option<&Meta>,
    ) -> AppResult<LoadReply> {
        self.render_page(page_id).map(LoadReply::Page)
    }

    async fn execute(
        &self,
        item_id: &str,
        page_id: &str,
        _query: Option<&str>,
        _meta: Option<&Meta>,
    ) -> AppResult<CommandResult> {
        let command = self.command(page_id, item_id)?;
        match &command.effect {
            Some(effect) => self.apply_effect(effect),
            None => Err(AppError::adapter(format!(
                "command '{item_id}' has no effect to execute"
            ))),
        }
    }

    async fn submit(
        &self,
        page_id: &str,
        value: &str,
        _meta: Option<&Meta>,
    ) -> AppResult<CommandResult> {
        let action = self
            .catalog
            .page(page_id)
            .and_then(|page| page.on_submit.as_ref())
            .ok_or_else(|| {
                AppError::unsupported(format!("page '{page_id}' does not accept input"))
            })?;

        let value = value.trim();
        if action.required && value.is_empty() {
            return Ok(CommandResult::error(format!("{} cannot be empty", action.setting)));
        }
        self.write_setting(&action.setting, value.to_string());
        Ok(follow_up(action.then))
    }

    fn on_open_change(&self, is_open: bool) {
        info!(is_open, "palette visibility changed");
    }
}

fn follow_up(then: FollowUp) -> CommandResult {
    match then {
        FollowUp::Refresh => CommandResult::RefreshPage,
        FollowUp::Pop => CommandResult::PopPage,
        FollowUp::Stay => CommandResult::Stay,
        FollowUp::Close => CommandResult::Close,
    }
}

fn render_page(source: &CatalogPage, settings: &BTreeMap<String, String>) -> Page {
    Page {
        id: source.id.clone(),
        title: interpolate(&source.title, settings),
        subtitle: source
            .subtitle
            .as_deref()
            .map(|text| interpolate(text, settings)),
        mode: source.mode,
        placeholder: source.placeholder.clone(),
        submit_label: source.submit_label.clone(),
        empty_state_text: source.empty_state_text.clone(),
        commands: source
            .commands
            .iter()
            .map(|command| render_command(command, settings))
            .collect(),
        meta: source.meta.clone(),
    }
}

fn render_command(source: &CatalogCommand, settings: &BTreeMap<String, String>) -> Command {
    let intent = if source.opens.is_some() {
        CommandIntent::Page
    } else {
        CommandIntent::Action
    };
    Command {
        id: source.id.clone(),
        label: interpolate(&source.label, settings),
        subtitle: source
            .subtitle
            .as_deref()
            .map(|text| interpolate(text, settings)),
        keywords: source.keywords.clone(),
        hidden: source.hidden,
        disabled: source.disabled,
        intent,
        child_page_id: source.opens.clone(),
        shortcuts: source.shortcuts.clone(),
        meta: source.meta.clone(),
    }
}

/// Replaces `{name}` with the setting's value. Unknown names are left as written.
fn interpolate(text: &str, settings: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let Some(end) = tail.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &tail[..end];
        match settings.get(name) {
            Some(value) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use super::{CatalogAdapter, interpolate};
    use crate::model::{CommandIntent, CommandResult, LoadReply, PageMode};
    use crate::palette::{EngineEvent, EngineState, OpenState, PaletteAdapter, PaletteEngine};

    #[test]
    fn interpolate_fills_known_settings_only() {
        let mut settings = BTreeMap::new();
        settings.insert("theme".to_string(), "dark".to_string());
        assert_eq!(interpolate("Theme: {theme}", &settings), "Theme: dark");
        assert_eq!(interpolate("{missing} {theme}", &settings), "{missing} dark");
        assert_eq!(interpolate("open {brace", &settings), "open {brace");
    }

    #[test]
    fn renders_root_with_setting_values() {
        let adapter = CatalogAdapter::builtin().expect("builtin catalog");
        let root = adapter.render_page("root").expect("root page");
        assert_eq!(root.subtitle.as_deref(), Some("Sky over Berlin, Germany"));

        let theme = root.command("root.setting.theme").expect("theme command");
        assert_eq!(theme.intent, CommandIntent::Page);
        assert_eq!(theme.child_page_id.as_deref(), Some("theme"));
        assert_eq!(theme.subtitle.as_deref(), Some("system"));
        assert!(root.validate().is_ok());
    }

    #[tokio::test]
    async fn toggle_flips_setting_and_refreshes() {
        let adapter = CatalogAdapter::builtin().expect("builtin catalog");
        let result = adapter
            .execute("root.setting.second-order", "root", None, None)
            .await
            .expect("toggle runs");
        assert_eq!(result, CommandResult::RefreshPage);
        assert_eq!(adapter.setting("second_order").as_deref(), Some("on"));

        adapter
            .execute("root.setting.second-order", "root", None, None)
            .await
            .expect("toggle runs");
        assert_eq!(adapter.setting("second_order").as_deref(), Some("off"));
    }

    #[tokio::test]
    async fn fail_effect_becomes_error_result() {
        let adapter = CatalogAdapter::builtin().expect("builtin catalog");
        let result = adapter
            .execute("root.sync", "root", None, None)
            .await
            .expect("execute returns a result");
        assert_eq!(result, CommandResult::error("sync is not configured"));
    }

    #[tokio::test]
    async fn unknown_page_is_an_adapter_error() {
        let adapter = CatalogAdapter::builtin().expect("builtin catalog");
        let err = adapter
            .load_child("ghost", "root.ghost", None, None)
            .await
            .expect_err("unknown page");
        assert!(err.to_string().contains("unknown page 'ghost'"));
    }

    #[tokio::test]
    async fn submit_requires_a_value() {
        let adapter = CatalogAdapter::builtin().expect("builtin catalog");
        let result = adapter
            .submit("location", "   ", None)
            .await
            .expect("submit returns a result");
        assert!(matches!(result, CommandResult::Error { .. }));
        assert_eq!(adapter.setting("location").as_deref(), Some("Berlin, Germany"));

        let result = adapter
            .submit("location", " Oslo ", None)
            .await
            .expect("submit returns a result");
        assert_eq!(result, CommandResult::PopPage);
        assert_eq!(adapter.setting("location").as_deref(), Some("Oslo"));
    }

    #[tokio::test]
    async fn location_page_loads_as_input() {
        let adapter = CatalogAdapter::builtin().expect("builtin catalog");
        let reply = adapter
            .load_child("location", "root.setting.location", None, None)
            .await
            .expect("location page");
        let LoadReply::Page(page) = reply else {
            panic!("expected a page");
        };
        assert_eq!(page.mode, PageMode::Input);
        assert_eq!(page.placeholder.as_deref(), Some("City, Country"));
    }

    #[tokio::test]
    async fn engine_drives_builtin_catalog() {
        let adapter = Arc::new(CatalogAdapter::builtin().expect("builtin catalog"));
        let mut engine = PaletteEngine::new(adapter.clone()).expect("engine");

        engine.dispatch(EngineEvent::Open);
        engine.settle().await;
        assert_eq!(engine.state(), EngineState::Open(OpenState::Browsing));

        engine.dispatch(EngineEvent::activate("root.setting.theme"));
        engine.settle().await;
        assert_eq!(engine.top_page().map(|page| page.id.as_str()), Some("theme"));

        engine.dispatch(EngineEvent::activate("theme.dark"));
        engine.settle().await;
        assert_eq!(engine.context().depth(), 1);
        assert_eq!(adapter.setting("theme").as_deref(), Some("dark"));

        engine.dispatch(EngineEvent::activate("root.setting.second-order"));
        engine.settle().await;
        let refreshed = engine
            .top_page()
            .and_then(|page| page.command("root.setting.second-order"))
            .and_then(|command| command.subtitle.clone());
        assert_eq!(refreshed.as_deref(), Some("on"));
    }
}
