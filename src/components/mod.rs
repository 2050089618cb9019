use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod settings_overlay;
pub mod support_overlay;

pub use settings_overlay::{SettingsChange, SettingsItem, SettingsOverlay};
pub use support_overlay::SupportOverlay;

pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect);

    fn handle_event(&mut self, _event: &Event) -> bool {
        false
    }
}

/// Center a `width` x `height` box inside `area`, shrinking to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
