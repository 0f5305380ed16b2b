/// Host-side status shown in the bottom bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusState {
    pub message: String,
    /// Id of the last engine event the host dispatched, e.g. `palette.back`.
    pub last_event_id: Option<&'static str>,
}

impl StatusState {
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn clear_message(&mut self) {
        self.message.clear();
    }
}
