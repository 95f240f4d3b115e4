use tracing::trace;

use crate::{
    controller::traits::InteractionKind,
    ui::{
        app::App,
        input::InputHandler,
        tui::{TerminalEvent, Tui},
    },
};

pub struct EventHandler;

impl EventHandler {
    pub async fn handle_events(app: &mut App, tui: &mut Tui) -> color_eyre::Result<()> {
        if let Some(evt) = tui.next().await {
            Self::handle_event(app, evt, tui)?;
        }

        while let Ok(evt) = app.event_rx.try_recv() {
            app.controller.handle(evt);
        }

        Ok(())
    }

    fn handle_event(app: &mut App, evt: TerminalEvent, tui: &mut Tui) -> color_eyre::Result<()> {
        match evt {
            TerminalEvent::Tick => app.controller.poll_playback(),
            TerminalEvent::Key(key) => {
                if let Some(msg) = InputHandler::handle_key(key) {
                    trace!(?msg, "key_message");
                    app.update(msg);
                }
                app.controller.handle_interaction(InteractionKind::Key);
            }
            TerminalEvent::Click => app.controller.handle_interaction(InteractionKind::Click),
            TerminalEvent::Paste(text) => {
                let line: String = text.chars().filter(|c| !c.is_control()).collect();
                app.controller.edit_prompt(|prompt| prompt.push_str(&line));
            }
            TerminalEvent::Resize => tui.clear()?,
        }
        Ok(())
    }
}
