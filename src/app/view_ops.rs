use crate::error::AppResult;
use crate::ui::{self, OverlayOptions, StatusLine};

use super::core::App;
use super::terminal_session::TerminalSurface;

impl App {
    pub(crate) fn render_frame<S: TerminalSurface>(
        &self,
        session: &mut S,
        spinner: char,
    ) -> AppResult<()> {
        let view = self.engine.view();
        let status = self.status_line();
        let options = OverlayOptions {
            width: self.config.ui.width,
            max_height: self.config.ui.max_height,
            cursor: self.query_input.cursor(),
            spinner,
        };

        session.draw(|frame| {
            let layout = ui::split_layout(frame.area());
            if view.is_open() {
                ui::draw_palette_overlay(frame, layout.body, &view, &options);
            } else {
                ui::draw_idle_hint(frame, layout.body);
            }
            ui::draw_chrome(frame, layout.status, &status);
        })?;
        Ok(())
    }

    pub(crate) fn status_line(&self) -> StatusLine {
        StatusLine {
            state: self.engine.state().id(),
            settings: self.catalog.settings().into_iter().collect(),
            message: self.status.message.clone(),
        }
    }
}
