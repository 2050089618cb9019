use indoc::indoc;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::components::{Component, centered_rect};
use crate::ui::UiFrame;

const SUPPORT_TEXT: &str = indoc! {"
    Click a target in the toolbar to open it; its session stays alive
    while you switch away and is restored instantly when you return.

    Alt+] / Alt+[  cycle through the enabled targets
    Ctrl+S         open or close the split pane
    F2             settings: enable targets, startup behavior
    Esc            close this overlay
    Ctrl+Q         quit

    Drag a toolbar button onto another to reorder; the order persists.
    Drop a button onto the empty split pane to fill it.
"};

/// Static help overlay. Shown instead of the frames; closing it restores the
/// previous selection untouched.
#[derive(Debug, Default)]
pub struct SupportOverlay;

impl SupportOverlay {
    pub fn new() -> Self {
        Self
    }
}

impl Component for SupportOverlay {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        let popup = centered_rect(area, 64, 16);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Support ")
            .border_style(Style::default().fg(crate::theme::overlay_border()))
            .style(Style::default().bg(crate::theme::overlay_bg()));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        frame.render_widget(
            Paragraph::new(SUPPORT_TEXT)
                .wrap(Wrap { trim: false })
                .style(Style::default().fg(crate::theme::overlay_fg())),
            inner,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    #[test]
    fn renders_into_small_area_without_panic() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 10,
            height: 3,
        };
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);
        SupportOverlay::new().render(&mut ui, area);
    }
}
