use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyModifiers};
use tracing::trace;

use crate::domain::{AppConfig, AppError, Message, Page};
use crate::model::Model;

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &AppConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, AppError> {
        if event::poll(Duration::from_millis(self.event_poll_time))?
            && let Event::Key(key) = event::read()?
            && key.kind == event::KeyEventKind::Press
        {
            // While the command line is open, keys go to the line editor.
            if model.raw_keyevents() {
                return Ok(Some(Message::RawKey(key)));
            }
            return Ok(self.handle_key(key));
        }
        Ok(None)
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => Some(Message::Quit),
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Char('?'), _) => Some(Message::Help),
            (KeyCode::Esc, _) => Some(Message::Exit),

            (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
                Page::from_index(c as usize - '1' as usize).map(Message::SwitchPage)
            }
            (KeyCode::Tab, _) => Some(Message::NextPage),
            (KeyCode::BackTab, _) => Some(Message::PrevPage),

            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => Some(Message::MoveUp),
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
                Some(Message::MoveDown)
            }
            (KeyCode::Left, _) | (KeyCode::Char('h'), KeyModifiers::NONE) => {
                Some(Message::MoveLeft)
            }
            (KeyCode::Right, _) | (KeyCode::Char('l'), KeyModifiers::NONE) => {
                Some(Message::MoveRight)
            }

            (KeyCode::Char('n'), KeyModifiers::NONE) | (KeyCode::PageDown, _) => {
                Some(Message::TablePageNext)
            }
            (KeyCode::Char('p'), KeyModifiers::NONE) | (KeyCode::PageUp, _) => {
                Some(Message::TablePagePrev)
            }
            (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => {
                Some(Message::TablePageFirst)
            }
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => Some(Message::TablePageLast),
            (KeyCode::Char('z'), KeyModifiers::NONE) => Some(Message::CyclePageSize),

            (KeyCode::Char('s'), KeyModifiers::NONE) => Some(Message::ToggleSort),
            (KeyCode::Char('/'), _) => Some(Message::EnterSearch),
            (KeyCode::Char('f'), KeyModifiers::NONE) => Some(Message::EnterFilter),
            (KeyCode::Char('F'), _) => Some(Message::ClearFilters),
            (KeyCode::Char('D'), _) => Some(Message::CyclePrefilter(0)),
            (KeyCode::Char('T'), _) => Some(Message::CyclePrefilter(1)),

            (KeyCode::Char('r'), KeyModifiers::NONE) => Some(Message::Refresh),
            (KeyCode::Enter, _) => Some(Message::OpenRecord),
            (KeyCode::Char('e'), KeyModifiers::NONE) => Some(Message::EditRecord),
            (KeyCode::Char('d'), KeyModifiers::NONE) => Some(Message::DeleteRecord),
            (KeyCode::Char('y'), KeyModifiers::NONE) => Some(Message::CopyRow),
            (KeyCode::Char('Y'), _) => Some(Message::CopyCell),
            (KeyCode::Char('x'), KeyModifiers::NONE) => Some(Message::ExportCsv),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyEvent;

    fn controller() -> Controller {
        Controller::new(&AppConfig::default())
    }

    #[test]
    fn digit_keys_map_to_pages() {
        let c = controller();
        assert!(matches!(
            c.handle_key(KeyEvent::from(KeyCode::Char('1'))),
            Some(Message::SwitchPage(Page::Dashboard))
        ));
        assert!(matches!(
            c.handle_key(KeyEvent::from(KeyCode::Char('9'))),
            Some(Message::SwitchPage(Page::Targets))
        ));
    }

    #[test]
    fn shifted_and_plain_keys_differ() {
        let c = controller();
        assert!(matches!(
            c.handle_key(KeyEvent::from(KeyCode::Char('d'))),
            Some(Message::DeleteRecord)
        ));
        assert!(matches!(
            c.handle_key(KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT)),
            Some(Message::CyclePrefilter(0))
        ));
    }

    #[test]
    fn unmapped_keys_produce_nothing() {
        let c = controller();
        assert!(c.handle_key(KeyEvent::from(KeyCode::Char('x'))).is_none());
    }
}
