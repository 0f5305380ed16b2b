use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::timeout;

use crate::model::{Command, CommandResult, LoadReply, Page, Shortcut};
use crate::palette::{EngineEvent, EngineState, NavDirection, OpenState, PaletteEngine};

use super::scripted::ScriptedAdapter;

const BROWSING: EngineState = EngineState::Open(OpenState::Browsing);
const ERROR: EngineState = EngineState::Open(OpenState::Error);

fn settings_root() -> Page {
    Page::new("root", "Settings").with_commands(vec![Command::action(
        "root.setting.second-order",
        "Second order: off",
    )])
}

fn nav_root() -> Page {
    Page::new("root", "Root").with_commands(vec![
        Command::page("open", "Open location", "location"),
        Command::action("run", "Run"),
        Command::action("off", "Offline").disabled(),
        Command::action("help", "Help").with_shortcut(Shortcut::new("?")),
    ])
}

fn location_page() -> Page {
    Page::new("location", "Location").with_commands(vec![Command::action("berlin", "Berlin")])
}

async fn opened(adapter: &Arc<ScriptedAdapter>) -> PaletteEngine {
    let mut engine = PaletteEngine::new(adapter.clone()).expect("engine should start");
    assert!(engine.dispatch(EngineEvent::Open));
    assert_eq!(engine.state(), EngineState::Open(OpenState::LoadingPage));
    engine.settle().await;
    engine
}

#[tokio::test]
async fn refresh_result_reloads_root_and_returns_to_browsing() {
    let adapter = Arc::new(
        ScriptedAdapter::new()
            .root(settings_root())
            .root(Page::new("root", "Settings").with_commands(vec![Command::action(
                "root.setting.second-order",
                "Second order: on",
            )]))
            .execute(CommandResult::RefreshPage),
    );
    let mut engine = opened(&adapter).await;
    assert_eq!(engine.state(), BROWSING);

    assert!(engine.dispatch(EngineEvent::activate("root.setting.second-order")));
    assert_eq!(engine.state(), EngineState::Open(OpenState::Executing));
    engine.settle().await;

    assert_eq!(engine.state(), BROWSING);
    assert_eq!(engine.context().depth(), 1);
    let top = engine.top_page().expect("root page");
    assert_eq!(top.commands[0].label, "Second order: on");
    assert_eq!(
        adapter.calls(),
        vec![
            "load_root",
            "execute:root.setting.second-order:root",
            "load_root"
        ]
    );
}

#[tokio::test]
async fn activating_page_command_pushes_loaded_child() {
    let adapter = Arc::new(ScriptedAdapter::new().root(nav_root()).child(location_page()));
    let mut engine = opened(&adapter).await;

    assert!(engine.dispatch(EngineEvent::activate("open")));
    assert_eq!(engine.state(), EngineState::Open(OpenState::LoadingPage));
    engine.settle().await;

    assert_eq!(engine.state(), BROWSING);
    assert_eq!(engine.context().depth(), 2);
    assert_eq!(engine.top_page().map(|page| page.id.as_str()), Some("location"));
    assert_eq!(engine.active_item_id(), Some("berlin"));
    assert_eq!(adapter.calls()[1], "load_child:location:open");
}

#[tokio::test]
async fn back_on_root_closes_palette() {
    let adapter = Arc::new(ScriptedAdapter::new().root(nav_root()));
    let mut engine = opened(&adapter).await;

    assert!(engine.dispatch(EngineEvent::Back));
    assert_eq!(engine.state(), EngineState::Closed);
    assert_eq!(engine.context().depth(), 0);
    assert_eq!(adapter.open_changes(), vec![true, false]);
}

#[tokio::test]
async fn thrown_execute_error_lands_in_error_and_retry_clears_it() {
    let adapter = Arc::new(ScriptedAdapter::new().root(nav_root()).execute_error("boom"));
    let mut engine = opened(&adapter).await;

    engine.dispatch(EngineEvent::activate("run"));
    engine.settle().await;
    assert_eq!(engine.state(), ERROR);
    assert_eq!(engine.last_error(), Some("boom"));

    assert!(engine.dispatch(EngineEvent::Retry));
    assert_eq!(engine.state(), BROWSING);
    assert_eq!(engine.last_error(), None);
    assert_eq!(adapter.calls(), vec!["load_root", "execute:run:root"]);
}

#[tokio::test]
async fn submit_close_result_closes_and_notifies_once() {
    let adapter = Arc::new(
        ScriptedAdapter::new()
            .root(Page::input("city", "City").with_placeholder("Search a city"))
            .submit(CommandResult::Close),
    );
    let mut engine = opened(&adapter).await;

    engine.dispatch(EngineEvent::query("Lisbon"));
    assert!(engine.dispatch(EngineEvent::Submit { value: None }));
    assert_eq!(engine.state(), EngineState::Open(OpenState::SubmittingInput));
    assert_eq!(engine.context().input_value.as_deref(), Some("Lisbon"));
    engine.settle().await;

    assert_eq!(engine.state(), EngineState::Closed);
    assert_eq!(adapter.open_changes(), vec![true, false]);
    assert_eq!(adapter.calls()[1], "submit:city:Lisbon");
}

#[tokio::test]
async fn submit_is_ignored_on_list_pages() {
    let adapter = Arc::new(ScriptedAdapter::new().root(nav_root()));
    let mut engine = opened(&adapter).await;

    assert!(!engine.dispatch(EngineEvent::submit("anything")));
    assert_eq!(engine.state(), BROWSING);
}

#[tokio::test]
async fn disabled_or_unknown_activation_is_a_noop() {
    let adapter = Arc::new(ScriptedAdapter::new().root(nav_root()));
    let mut engine = opened(&adapter).await;
    let before = engine.context().clone();

    assert!(!engine.dispatch(EngineEvent::activate("off")));
    assert!(!engine.dispatch(EngineEvent::activate("missing")));
    assert_eq!(engine.state(), BROWSING);
    assert_eq!(engine.context(), &before);
    assert_eq!(adapter.calls(), vec!["load_root"]);
}

#[tokio::test]
async fn activation_defaults_to_active_item_after_navigation() {
    let adapter = Arc::new(
        ScriptedAdapter::new()
            .root(nav_root())
            .execute(CommandResult::Stay),
    );
    let mut engine = opened(&adapter).await;

    engine.dispatch(EngineEvent::Nav(NavDirection::Next));
    assert_eq!(engine.active_item_id(), Some("run"));
    engine.dispatch(EngineEvent::activate_current());
    engine.settle().await;

    assert_eq!(engine.state(), BROWSING);
    assert!(engine.context().pending_command.is_none());
    assert_eq!(adapter.calls()[1], "execute:run:root");
}

#[tokio::test]
async fn query_change_filters_and_reselects_first_match() {
    let adapter = Arc::new(ScriptedAdapter::new().root(nav_root()));
    let mut engine = opened(&adapter).await;

    engine.dispatch(EngineEvent::query("HEL"));
    let ids: Vec<&str> = engine
        .filtered_commands()
        .iter()
        .map(|command| command.id.as_str())
        .collect();
    assert_eq!(ids, vec!["help"]);
    assert_eq!(engine.active_item_id(), Some("help"));

    engine.dispatch(EngineEvent::query("zzz"));
    assert!(engine.filtered_commands().is_empty());
    assert_eq!(engine.active_item_id(), None);
    assert!(!engine.dispatch(EngineEvent::activate_current()));
}

#[tokio::test]
async fn shortcuts_resolve_only_without_query() {
    let adapter = Arc::new(ScriptedAdapter::new().root(nav_root()));
    let mut engine = opened(&adapter).await;

    assert_eq!(
        engine.resolve_shortcut("?").map(|command| command.id.as_str()),
        Some("help")
    );
    engine.dispatch(EngineEvent::query("h"));
    assert!(engine.resolve_shortcut("?").is_none());
}

#[tokio::test]
async fn close_abandons_in_flight_execute() {
    let gate = Arc::new(Notify::new());
    let adapter = Arc::new(
        ScriptedAdapter::new()
            .root(nav_root())
            .root(nav_root())
            .execute(CommandResult::push(location_page()))
            .gated_execute(gate.clone()),
    );
    let mut engine = opened(&adapter).await;

    engine.dispatch(EngineEvent::activate("run"));
    assert_eq!(engine.state(), EngineState::Open(OpenState::Executing));
    assert!(engine.dispatch(EngineEvent::Close));
    assert_eq!(engine.state(), EngineState::Closed);

    assert!(engine.dispatch(EngineEvent::Toggle));
    engine.settle().await;
    assert_eq!(engine.state(), BROWSING);

    gate.notify_one();
    let stale = engine.recv_outcome().await.expect("stale outcome");
    assert!(!engine.apply_outcome(stale));
    assert_eq!(engine.state(), BROWSING);
    assert_eq!(engine.context().depth(), 1);
    assert_eq!(adapter.open_changes(), vec![true, false, true]);
}

#[tokio::test]
async fn failed_root_load_is_reissued_on_retry() {
    let adapter = Arc::new(
        ScriptedAdapter::new()
            .root_error("offline")
            .root(nav_root()),
    );
    let mut engine = opened(&adapter).await;
    assert_eq!(engine.state(), ERROR);
    assert_eq!(engine.last_error(), Some("offline"));
    assert!(engine.context().pending_load.is_some());

    assert!(engine.dispatch(EngineEvent::Retry));
    assert_eq!(engine.state(), EngineState::Open(OpenState::LoadingPage));
    engine.settle().await;

    assert_eq!(engine.state(), BROWSING);
    assert_eq!(engine.last_error(), None);
    assert_eq!(adapter.calls(), vec!["load_root", "load_root"]);
}

#[tokio::test]
async fn invalid_page_shape_is_a_load_error() {
    let mut broken = Command::page("open", "Open", "x");
    broken.child_page_id = None;
    let adapter = Arc::new(
        ScriptedAdapter::new().root(Page::new("root", "Root").with_commands(vec![broken])),
    );
    let engine = opened(&adapter).await;

    assert_eq!(engine.state(), ERROR);
    assert!(
        engine
            .last_error()
            .is_some_and(|message| message.contains("no child page id"))
    );
}

#[tokio::test]
async fn declared_error_from_child_load_keeps_load_for_retry() {
    let adapter = Arc::new(
        ScriptedAdapter::new()
            .root(nav_root())
            .child(CommandResult::error("geocoder unavailable"))
            .child(LoadReply::Page(location_page())),
    );
    let mut engine = opened(&adapter).await;

    engine.dispatch(EngineEvent::activate("open"));
    engine.settle().await;
    assert_eq!(engine.state(), ERROR);
    assert_eq!(engine.last_error(), Some("geocoder unavailable"));
    assert_eq!(engine.context().depth(), 1);

    engine.dispatch(EngineEvent::Retry);
    engine.settle().await;
    assert_eq!(engine.state(), BROWSING);
    assert_eq!(engine.context().depth(), 2);
}

#[tokio::test]
async fn back_from_error_pops_child_page() {
    let adapter = Arc::new(
        ScriptedAdapter::new()
            .root(nav_root())
            .child(Page::new("location", "Location").with_commands(vec![Command::action(
                "berlin", "Berlin",
            )]))
            .execute(CommandResult::error("no network")),
    );
    let mut engine = opened(&adapter).await;
    engine.dispatch(EngineEvent::activate("open"));
    engine.settle().await;
    engine.dispatch(EngineEvent::activate("berlin"));
    engine.settle().await;
    assert_eq!(engine.state(), ERROR);

    assert!(engine.dispatch(EngineEvent::Back));
    assert_eq!(engine.state(), BROWSING);
    assert_eq!(engine.context().depth(), 1);
    assert_eq!(engine.last_error(), None);
    assert_eq!(engine.active_item_id(), Some("open"));
}

#[tokio::test]
async fn query_change_leaves_error_state() {
    let adapter = Arc::new(ScriptedAdapter::new().root(nav_root()).execute_error("boom"));
    let mut engine = opened(&adapter).await;
    engine.dispatch(EngineEvent::activate("run"));
    engine.settle().await;

    assert!(engine.dispatch(EngineEvent::query("ru")));
    assert_eq!(engine.state(), BROWSING);
    assert_eq!(engine.active_item_id(), Some("run"));
    assert_eq!(engine.last_error(), None);
}

#[tokio::test]
async fn push_and_pop_results_walk_the_stack() {
    let adapter = Arc::new(
        ScriptedAdapter::new()
            .root(nav_root())
            .execute(CommandResult::push(location_page()))
            .execute(CommandResult::PopPage),
    );
    let mut engine = opened(&adapter).await;
    let root_stack = engine.context().stack.clone();

    engine.dispatch(EngineEvent::activate("run"));
    engine.settle().await;
    assert_eq!(engine.context().depth(), 2);

    engine.dispatch(EngineEvent::activate("berlin"));
    engine.settle().await;
    assert_eq!(engine.state(), BROWSING);
    assert_eq!(engine.context().stack, root_stack);
    assert_eq!(engine.active_item_id(), Some("open"));
}

#[tokio::test]
async fn events_are_ignored_while_a_call_is_pending() {
    let adapter = Arc::new(ScriptedAdapter::new().root(nav_root()));
    let mut engine = PaletteEngine::new(adapter.clone()).expect("engine should start");

    assert!(!engine.dispatch(EngineEvent::Back));
    engine.dispatch(EngineEvent::Open);
    assert!(!engine.dispatch(EngineEvent::activate("run")));
    assert!(!engine.dispatch(EngineEvent::Open));
    engine.settle().await;
    assert_eq!(engine.state(), BROWSING);
    assert_eq!(adapter.calls(), vec!["load_root"]);
}

#[tokio::test]
async fn refresh_on_child_page_reloads_top_with_executed_item() {
    let adapter = Arc::new(
        ScriptedAdapter::new()
            .root(nav_root())
            .child(location_page())
            .execute(CommandResult::RefreshPage)
            .child(
                Page::new("location", "Location v2")
                    .with_commands(vec![Command::action("berlin", "Berlin")]),
            ),
    );
    let mut engine = opened(&adapter).await;
    engine.dispatch(EngineEvent::activate("open"));
    engine.settle().await;

    assert!(engine.dispatch(EngineEvent::activate("berlin")));
    engine.settle().await;

    assert_eq!(engine.state(), BROWSING);
    assert_eq!(engine.context().depth(), 2);
    assert_eq!(
        engine.top_page().map(|page| page.title.as_str()),
        Some("Location v2")
    );
    assert_eq!(
        adapter.calls(),
        vec![
            "load_root",
            "load_child:location:open",
            "execute:berlin:location",
            "load_child:location:berlin"
        ]
    );
}

#[tokio::test]
async fn submit_refresh_reloads_input_page_by_its_own_id() {
    let adapter = Arc::new(
        ScriptedAdapter::new()
            .root(nav_root())
            .child(Page::input("location", "Location"))
            .submit(CommandResult::RefreshPage)
            .child(Page::input("location", "Location (Oslo)")),
    );
    let mut engine = opened(&adapter).await;
    engine.dispatch(EngineEvent::activate("open"));
    engine.settle().await;

    engine.dispatch(EngineEvent::query("Oslo"));
    assert!(engine.dispatch(EngineEvent::Submit { value: None }));
    assert_eq!(engine.context().input_value.as_deref(), Some("Oslo"));
    assert!(engine.context().pending_command.is_none());
    engine.settle().await;

    assert_eq!(engine.state(), BROWSING);
    assert_eq!(engine.context().depth(), 2);
    assert_eq!(
        engine.top_page().map(|page| page.title.as_str()),
        Some("Location (Oslo)")
    );
    assert_eq!(
        adapter.calls(),
        vec![
            "load_root",
            "load_child:location:open",
            "submit:location:Oslo",
            "load_child:location:location:Oslo"
        ]
    );
}

#[tokio::test]
async fn replace_result_swaps_top_page_in_place() {
    let adapter = Arc::new(
        ScriptedAdapter::new()
            .root(nav_root())
            .child(location_page())
            .execute(CommandResult::replace(
                Page::new("weather", "Weather").with_commands(vec![Command::action("rain", "Rain")]),
            )),
    );
    let mut engine = opened(&adapter).await;
    engine.dispatch(EngineEvent::activate("open"));
    engine.settle().await;

    engine.dispatch(EngineEvent::activate("berlin"));
    engine.settle().await;

    assert_eq!(engine.state(), BROWSING);
    assert_eq!(engine.context().depth(), 2);
    assert_eq!(engine.top_page().map(|page| page.id.as_str()), Some("weather"));
    assert_eq!(engine.context().stack[0].id, "root");
    assert_eq!(engine.active_item_id(), Some("rain"));
}

#[tokio::test]
async fn panicking_execute_lands_in_error() {
    let adapter = Arc::new(ScriptedAdapter::new().root(nav_root()).panicking_execute());
    let mut engine = opened(&adapter).await;

    assert!(engine.dispatch(EngineEvent::activate("run")));
    timeout(Duration::from_secs(2), engine.settle())
        .await
        .expect("engine should leave the executing state");

    assert_eq!(engine.state(), ERROR);
    let error = engine.last_error().expect("panic is reported as an error");
    assert!(error.contains("adapter bug"), "unexpected error: {error}");

    assert!(engine.dispatch(EngineEvent::Retry));
    assert_eq!(engine.state(), BROWSING);
}
