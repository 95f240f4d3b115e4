use crate::ui::message::AppMessage;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key(key: KeyEvent) -> Option<AppMessage> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => Some(AppMessage::Quit),
            KeyCode::Char('p') if ctrl => Some(AppMessage::TogglePlayPause),
            KeyCode::Char('n') if ctrl => Some(AppMessage::NextTrack),
            KeyCode::Char('l') if ctrl => Some(AppMessage::LoadMore),
            KeyCode::Char('u') if ctrl => Some(AppMessage::ClearPrompt),
            KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => None,
            KeyCode::Char(c) => Some(AppMessage::InsertChar(c)),
            KeyCode::Esc => Some(AppMessage::Quit),
            KeyCode::Enter => Some(AppMessage::Generate),
            KeyCode::Backspace => Some(AppMessage::DeleteChar),
            _ => None,
        }
    }
}
