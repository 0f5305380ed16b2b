use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::error::AppResult;
use crate::event::DomainEvent;
use crate::palette::{AdapterOutcome, EngineEvent, PaletteEngine};

use super::actors::UiActor;
use super::core::App;
use super::event_bus::EventBusRuntime;
use super::terminal_session::TerminalSession;

struct LoopRuntime {
    ui_actor: UiActor,
    session: TerminalSession,
    redraw_tick: time::Interval,
    loop_event_rx: UnboundedReceiver<DomainEvent>,
    loop_event_runtime: EventBusRuntime,
}

enum WaitEvent {
    Event(DomainEvent),
    Outcome(AdapterOutcome),
    RedrawTick,
    Closed,
}

enum LoopControl {
    Continue,
    Break,
}

impl App {
    /// Runs the palette in the terminal until the user quits.
    pub async fn run(&mut self) -> AppResult<()> {
        let mut runtime = self.initialize_loop_runtime()?;
        if self.dispatch_engine_event(EngineEvent::Open) {
            runtime.ui_actor.mark_redraw();
        }

        let result = self.run_loop(&mut runtime).await;

        runtime.loop_event_runtime.shutdown();
        runtime.session.restore()?;
        info!("palnav exiting");
        result
    }

    fn initialize_loop_runtime(&mut self) -> AppResult<LoopRuntime> {
        let session = TerminalSession::enter()?;
        let (loop_event_rx, loop_event_runtime) = EventBusRuntime::spawn();
        let mut redraw_tick = time::interval(Duration::from_millis(self.config.ui.redraw_interval_ms));
        redraw_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Ok(LoopRuntime {
            ui_actor: UiActor::new(),
            session,
            redraw_tick,
            loop_event_rx,
            loop_event_runtime,
        })
    }

    async fn run_loop(&mut self, runtime: &mut LoopRuntime) -> AppResult<()> {
        loop {
            if runtime.ui_actor.needs_redraw() {
                self.render_frame(&mut runtime.session, runtime.ui_actor.spinner())?;
                runtime.ui_actor.clear_redraw();
            }

            let waited = wait_next_event(
                &mut runtime.loop_event_rx,
                &mut self.engine,
                &mut runtime.redraw_tick,
            )
            .await;
            if matches!(self.handle_waited_event(waited, runtime), LoopControl::Break) {
                return Ok(());
            }
        }
    }

    fn handle_waited_event(&mut self, waited: WaitEvent, runtime: &mut LoopRuntime) -> LoopControl {
        match waited {
            WaitEvent::Event(DomainEvent::Input(event)) => {
                let outcome = self.handle_input_event(event);
                if outcome.quit_requested {
                    return LoopControl::Break;
                }
                if outcome.redraw {
                    runtime.ui_actor.mark_redraw();
                }
            }
            WaitEvent::Event(DomainEvent::InputError(message)) => {
                self.status.set_message(format!("input error: {message}"));
                runtime.ui_actor.mark_redraw();
            }
            WaitEvent::Outcome(outcome) => {
                if self.engine.apply_outcome(outcome) {
                    self.sync_query_input();
                    runtime.ui_actor.mark_redraw();
                }
            }
            WaitEvent::RedrawTick => {
                runtime.ui_actor.on_redraw_tick(self.engine.state().is_awaiting());
            }
            WaitEvent::Closed => {
                debug!("input stream closed");
                return LoopControl::Break;
            }
        }
        LoopControl::Continue
    }
}

async fn wait_next_event(
    loop_event_rx: &mut UnboundedReceiver<DomainEvent>,
    engine: &mut PaletteEngine,
    redraw_tick: &mut time::Interval,
) -> WaitEvent {
    tokio::select! {
        biased;
        maybe_loop = loop_event_rx.recv() => {
            match maybe_loop {
                Some(event) => WaitEvent::Event(event),
                None => WaitEvent::Closed,
            }
        },
        maybe_outcome = engine.recv_outcome() => {
            match maybe_outcome {
                Some(outcome) => WaitEvent::Outcome(outcome),
                None => WaitEvent::Closed,
            }
        },
        _ = redraw_tick.tick() => WaitEvent::RedrawTick,
    }
}
