use std::future::Future;
use std::sync::Arc;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::model::{Command, CommandIntent, CommandResult, LoadReply, Meta, Page, PageMode};

use super::adapter::PaletteAdapter;
use super::context::{EngineContext, LoadKind, LoadRequest};
use super::events::{EngineEvent, EngineState, OpenState};
use super::filter::filter_commands;
use super::shortcut::resolve_shortcut;
use super::stack::{apply_loaded_page, apply_result, first_filtered_id, move_active_id, pop_page};
use super::view::PaletteView;

/// Result of one adapter call, tagged with the request that issued it.
#[derive(Debug)]
pub struct AdapterOutcome {
    request_id: u64,
    reply: AdapterReply,
}

#[derive(Debug)]
enum AdapterReply {
    Load(AppResult<LoadReply>),
    Execute(AppResult<CommandResult>),
    Submit(AppResult<CommandResult>),
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    request_id: u64,
    phase: OpenState,
}

struct EngineRuntime {
    _owned: Option<Runtime>,
    handle: Handle,
}

impl EngineRuntime {
    fn new() -> AppResult<Self> {
        if let Ok(handle) = Handle::try_current() {
            return Ok(Self {
                _owned: None,
                handle,
            });
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .thread_name("palnav-adapter")
            .build()
            .map_err(|source| AppError::io_with_context(source, "failed to start adapter runtime"))?;
        let handle = runtime.handle().clone();
        Ok(Self {
            _owned: Some(runtime),
            handle,
        })
    }

    /// Runs `call` as its own task and reports its result, or its panic, as one outcome.
    fn spawn_call<T, F>(
        &self,
        request_id: u64,
        call: F,
        wrap: fn(AppResult<T>) -> AdapterReply,
        outcome_tx: UnboundedSender<AdapterOutcome>,
    ) where
        T: Send + 'static,
        F: Future<Output = AppResult<T>> + Send + 'static,
    {
        let call = self.handle.spawn(call);
        self.handle.spawn(async move {
            let reply = call.await.unwrap_or_else(|err| {
                let message = join_failure(err);
                warn!(request_id, message = %message, "adapter task ended abnormally");
                Err(AppError::adapter(message))
            });
            let _ = outcome_tx.send(AdapterOutcome {
                request_id,
                reply: wrap(reply),
            });
        });
    }
}

fn join_failure(err: JoinError) -> String {
    if !err.is_panic() {
        return "adapter call was cancelled".to_string();
    }
    let payload = err.into_panic();
    let detail = payload
        .downcast_ref::<&str>()
        .map(|text| (*text).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned());
    match detail {
        Some(detail) => format!("adapter call panicked: {detail}"),
        None => "adapter call panicked".to_string(),
    }
}

/// Navigation and command-execution state machine.
///
/// Events are handled one at a time through [`PaletteEngine::dispatch`]. Adapter
/// calls run on the tokio runtime; their outcomes come back through
/// [`PaletteEngine::recv_outcome`] and only take effect while the engine still
/// waits for that exact request.
pub struct PaletteEngine {
    adapter: Arc<dyn PaletteAdapter>,
    state: EngineState,
    context: EngineContext,
    in_flight: Option<InFlight>,
    next_request_id: u64,
    outcome_tx: UnboundedSender<AdapterOutcome>,
    outcome_rx: UnboundedReceiver<AdapterOutcome>,
    runtime: EngineRuntime,
}

impl PaletteEngine {
    pub fn new(adapter: Arc<dyn PaletteAdapter>) -> AppResult<Self> {
        let (outcome_tx, outcome_rx) = unbounded_channel();
        Ok(Self {
            adapter,
            state: EngineState::Closed,
            context: EngineContext::default(),
            in_flight: None,
            next_request_id: 0,
            outcome_tx,
            outcome_rx,
            runtime: EngineRuntime::new()?,
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn top_page(&self) -> Option<&Page> {
        self.context.top()
    }

    pub fn filtered_commands(&self) -> Vec<&Command> {
        self.context
            .top()
            .map(|page| filter_commands(page, &self.context.query))
            .unwrap_or_default()
    }

    pub fn active_item_id(&self) -> Option<&str> {
        self.context.active_item_id.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.context.last_error.as_deref()
    }

    pub fn view(&self) -> PaletteView {
        PaletteView::build(self.state, &self.context)
    }

    /// Command bound to `key` on the current page, if shortcuts apply right now.
    pub fn resolve_shortcut(&self, key: &str) -> Option<&Command> {
        if self.state != EngineState::Open(OpenState::Browsing) {
            return None;
        }
        let page = self.context.top()?;
        resolve_shortcut(
            page,
            key,
            &self.context.query,
            self.context.active_item_id.as_deref(),
        )
    }

    /// Applies one host event. Returns whether anything observable changed.
    pub fn dispatch(&mut self, event: EngineEvent) -> bool {
        let before = self.state;
        let event_id = event.id();
        let changed = match (self.state, event) {
            (EngineState::Closed, EngineEvent::Open | EngineEvent::Toggle) => {
                self.open();
                true
            }
            (EngineState::Open(_), EngineEvent::Close | EngineEvent::Toggle) => {
                self.close();
                true
            }
            (EngineState::Open(OpenState::Browsing), event) => self.handle_browsing(event),
            (EngineState::Open(OpenState::Error), event) => self.handle_error(event),
            _ => false,
        };

        if changed && before != self.state {
            debug!(
                event = event_id,
                from = before.id(),
                to = self.state.id(),
                "palette transition"
            );
        }
        changed
    }

    pub async fn recv_outcome(&mut self) -> Option<AdapterOutcome> {
        self.outcome_rx.recv().await
    }

    /// Applies every outcome that is already waiting, without blocking.
    pub fn drain_outcomes(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            changed |= self.apply_outcome(outcome);
        }
        changed
    }

    /// Waits until no adapter call is pending.
    pub async fn settle(&mut self) {
        while self.state.is_awaiting() {
            let Some(outcome) = self.outcome_rx.recv().await else {
                return;
            };
            self.apply_outcome(outcome);
        }
    }

    /// Folds an adapter outcome into the context. Stale outcomes are dropped.
    pub fn apply_outcome(&mut self, outcome: AdapterOutcome) -> bool {
        let current = match self.in_flight {
            Some(in_flight)
                if in_flight.request_id == outcome.request_id
                    && self.state == EngineState::Open(in_flight.phase) =>
            {
                in_flight
            }
            _ => {
                debug!(
                    request_id = outcome.request_id,
                    state = self.state.id(),
                    "dropping stale adapter outcome"
                );
                return false;
            }
        };
        self.in_flight = None;

        let before = self.state;
        match outcome.reply {
            AdapterReply::Load(Ok(LoadReply::Page(page))) => self.finish_load(page),
            AdapterReply::Load(Ok(LoadReply::Result(result))) => self.finish_with_result(result, true),
            AdapterReply::Execute(Ok(result)) | AdapterReply::Submit(Ok(result)) => {
                self.finish_with_result(result, false)
            }
            AdapterReply::Load(Err(err))
            | AdapterReply::Execute(Err(err))
            | AdapterReply::Submit(Err(err)) => self.fail(err.to_string()),
        }
        debug!(
            request_id = current.request_id,
            from = before.id(),
            to = self.state.id(),
            "adapter outcome applied"
        );
        true
    }

    fn open(&mut self) {
        self.context = EngineContext::default();
        self.adapter.on_open_change(true);
        self.start_load(LoadRequest::root());
    }

    fn close(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(request_id = in_flight.request_id, "abandoning adapter call");
        }
        self.context = EngineContext::default();
        self.state = EngineState::Closed;
        self.adapter.on_open_change(false);
    }

    fn handle_browsing(&mut self, event: EngineEvent) -> bool {
        match event {
            EngineEvent::QueryChanged { query } => {
                self.set_query(query);
                true
            }
            EngineEvent::Nav(direction) => {
                let before = self.context.active_item_id.clone();
                move_active_id(&mut self.context, direction);
                before != self.context.active_item_id
            }
            EngineEvent::Activate { id } => self.activate(id.as_deref()),
            EngineEvent::Submit { value } => self.submit(value),
            EngineEvent::Back => {
                self.back();
                true
            }
            EngineEvent::Open
            | EngineEvent::Close
            | EngineEvent::Toggle
            | EngineEvent::Retry => false,
        }
    }

    fn handle_error(&mut self, event: EngineEvent) -> bool {
        match event {
            EngineEvent::Retry => {
                self.context.last_error = None;
                match self.context.pending_load.clone() {
                    Some(request) => self.start_load(request),
                    None => self.state = EngineState::Open(OpenState::Browsing),
                }
                true
            }
            EngineEvent::Back => {
                self.context.last_error = None;
                self.context.pending_load = None;
                self.back();
                true
            }
            EngineEvent::QueryChanged { query } => {
                self.context.last_error = None;
                self.context.pending_load = None;
                self.set_query(query);
                self.state = EngineState::Open(OpenState::Browsing);
                true
            }
            _ => false,
        }
    }

    fn set_query(&mut self, query: String) {
        self.context.query = query;
        self.context.active_item_id = first_filtered_id(&self.context);
    }

    fn back(&mut self) {
        if self.context.depth() > 1 {
            pop_page(&mut self.context);
            self.state = EngineState::Open(OpenState::Browsing);
        } else {
            self.close();
        }
    }

    fn activate(&mut self, id: Option<&str>) -> bool {
        let Some((page_id, command)) = self.resolve_activation(id) else {
            return false;
        };
        if command.disabled {
            return false;
        }

        let query = self.context.query_arg();
        self.context.active_item_id = Some(command.id.clone());
        self.context.invocation_meta = command.meta.clone();
        self.context.pending_command = Some(command.clone());

        match command.intent {
            CommandIntent::Page => {
                let Some(child_page_id) = command
                    .child_page_id
                    .clone()
                    .filter(|child| !child.trim().is_empty())
                else {
                    self.fail(format!(
                        "command '{}' opens a page but has no child page id",
                        command.id
                    ));
                    return true;
                };
                self.start_load(LoadRequest::child(
                    child_page_id,
                    command.id,
                    query,
                    command.meta,
                ));
            }
            CommandIntent::Action => self.start_execute(command.id, page_id, query, command.meta),
        }
        true
    }

    fn resolve_activation(&self, id: Option<&str>) -> Option<(String, Command)> {
        let page = self.context.top()?;
        let filtered = filter_commands(page, &self.context.query);
        let command = match id {
            Some(id) => filtered.iter().find(|command| command.id == id),
            None => self
                .context
                .active_item_id
                .as_deref()
                .and_then(|active| filtered.iter().find(|command| command.id == active))
                .or_else(|| filtered.first()),
        }?;
        Some((page.id.clone(), (*command).clone()))
    }

    fn submit(&mut self, value: Option<String>) -> bool {
        let Some(page) = self.context.top() else {
            return false;
        };
        if page.mode != PageMode::Input {
            return false;
        }

        let page_id = page.id.clone();
        let meta = page.meta.clone();
        let value = value.unwrap_or_else(|| self.context.query.clone());
        self.context.input_value = Some(value.clone());
        self.context.invocation_meta = meta.clone();
        self.context.pending_command = None;

        let request_id = self.begin(OpenState::SubmittingInput);
        debug!(request_id, page_id = %page_id, "submitting input");
        let adapter = Arc::clone(&self.adapter);
        self.runtime.spawn_call(
            request_id,
            async move { adapter.submit(&page_id, &value, meta.as_ref()).await },
            AdapterReply::Submit,
            self.outcome_tx.clone(),
        );
        true
    }

    fn start_execute(
        &mut self,
        item_id: String,
        page_id: String,
        query: Option<String>,
        meta: Option<Meta>,
    ) {
        let request_id = self.begin(OpenState::Executing);
        debug!(request_id, item_id = %item_id, page_id = %page_id, "executing command");
        let adapter = Arc::clone(&self.adapter);
        self.runtime.spawn_call(
            request_id,
            async move {
                adapter
                    .execute(&item_id, &page_id, query.as_deref(), meta.as_ref())
                    .await
            },
            AdapterReply::Execute,
            self.outcome_tx.clone(),
        );
    }

    fn start_load(&mut self, request: LoadRequest) {
        self.context.pending_load = Some(request.clone());
        let request_id = self.begin(OpenState::LoadingPage);
        debug!(request_id, kind = ?request.kind, page_id = ?request.page_id, "loading page");
        let adapter = Arc::clone(&self.adapter);
        self.runtime.spawn_call(
            request_id,
            async move { run_load(adapter.as_ref(), &request).await },
            AdapterReply::Load,
            self.outcome_tx.clone(),
        );
    }

    fn begin(&mut self, phase: OpenState) -> u64 {
        self.next_request_id = self.next_request_id.saturating_add(1);
        let request_id = self.next_request_id;
        self.in_flight = Some(InFlight { request_id, phase });
        self.state = EngineState::Open(phase);
        request_id
    }

    fn finish_load(&mut self, page: Page) {
        if let Err(err) = page.validate() {
            self.fail(err.to_string());
            return;
        }
        let kind = self
            .context
            .pending_load
            .as_ref()
            .map(|request| request.kind)
            .unwrap_or(LoadKind::Root);
        apply_loaded_page(&mut self.context, page, kind);
        self.state = EngineState::Open(OpenState::Browsing);
    }

    /// `from_load` results keep the pending load on error so retry can re-issue it.
    fn finish_with_result(&mut self, result: CommandResult, from_load: bool) {
        match result {
            CommandResult::Close => self.close(),
            CommandResult::RefreshPage => {
                let item_id = self
                    .context
                    .pending_command
                    .as_ref()
                    .map(|command| command.id.clone());
                let request = LoadRequest::refresh(
                    &self.context.stack,
                    item_id,
                    self.context.query_arg(),
                    self.context.invocation_meta.clone(),
                );
                self.start_load(request);
            }
            CommandResult::Error { message } => {
                warn!(message = %message, "adapter declared failure");
                if !from_load {
                    self.context.pending_load = None;
                }
                apply_result(&mut self.context, CommandResult::Error { message });
                self.state = EngineState::Open(OpenState::Error);
            }
            CommandResult::PushPage { .. }
            | CommandResult::ReplacePage { .. }
            | CommandResult::PopPage
            | CommandResult::Stay => {
                if let CommandResult::PushPage { page } | CommandResult::ReplacePage { page } =
                    &result
                    && let Err(err) = page.validate()
                {
                    self.fail(err.to_string());
                    return;
                }
                self.context.pending_load = None;
                apply_result(&mut self.context, result);
                self.state = EngineState::Open(OpenState::Browsing);
            }
        }
    }

    fn fail(&mut self, message: String) {
        warn!(message = %message, state = self.state.id(), "palette operation failed");
        self.context.last_error = Some(message);
        self.context.pending_command = None;
        self.state = EngineState::Open(OpenState::Error);
    }
}

async fn run_load(adapter: &dyn PaletteAdapter, request: &LoadRequest) -> AppResult<LoadReply> {
    let Some(page_id) = request.page_id.as_deref() else {
        return adapter.load_root().await.map(LoadReply::Page);
    };
    let item_id = request.item_id.as_deref().unwrap_or(page_id);
    adapter
        .load_child(
            page_id,
            item_id,
            request.query.as_deref(),
            request.meta.as_ref(),
        )
        .await
}
