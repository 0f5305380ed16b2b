use crossterm::event::Event;

/// Events pumped into the host loop from background tasks.
#[derive(Debug)]
pub(crate) enum DomainEvent {
    Input(Event),
    InputError(String),
}
