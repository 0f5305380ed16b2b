/// Spinner glyphs shown while an adapter call is pending.
const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

pub(crate) struct UiActor {
    needs_redraw: bool,
    spinner_frame: usize,
}

impl UiActor {
    pub(crate) fn new() -> Self {
        Self {
            needs_redraw: true,
            spinner_frame: 0,
        }
    }

    pub(crate) fn mark_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub(crate) fn clear_redraw(&mut self) {
        self.needs_redraw = false;
    }

    pub(crate) fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Advances the spinner on a redraw tick; idle ticks draw nothing.
    pub(crate) fn on_redraw_tick(&mut self, busy: bool) {
        if busy {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
            self.needs_redraw = true;
        }
    }

    pub(crate) fn spinner(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }
}
