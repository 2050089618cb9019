//! Embedder seam for hosted frames.
//!
//! The session core never renders destination content itself; it instructs
//! the hosting environment to create frames, navigate them, and flip their
//! visibility. `FrameHost` is that capability boundary. `PaneHost` is the
//! in-terminal implementation, which draws each frame as a bordered pane and
//! settles simulated loads on the next service tick.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ui::UiFrame;

/// Opaque handle to one embedded frame. Owned exclusively by whichever
/// component created it (the registry for primary frames, the split
/// controller for the secondary frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameId(usize);

impl FrameId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }
}

pub trait FrameHost {
    /// Create a frame for `target_id` and attach navigation to `url`.
    /// The load settles later via the host's settle signal.
    fn create_frame(&mut self, target_id: &str, url: &str) -> FrameId;

    /// Point an existing frame at a new location.
    fn navigate(&mut self, id: FrameId, url: &str);

    fn set_visible(&mut self, id: FrameId, visible: bool);

    /// Start the frame's exit animation. The visibility flag is cleared by
    /// the owner once the animation deadline passes.
    fn begin_exit(&mut self, id: FrameId);

    /// The frame's live navigated location, used by the shortcut desync
    /// fallback.
    fn current_url(&self, id: FrameId) -> Option<String>;

    /// Frames capture pointer input; resizing disables that on both panes
    /// for the duration of the drag.
    fn set_pointer_events(&mut self, id: FrameId, enabled: bool);

    /// Best-effort focus hint so typing lands in the destination.
    fn focus_cue(&mut self, _id: FrameId) {}
}

#[derive(Debug)]
struct PaneFrame {
    target_id: String,
    url: String,
    visible: bool,
    exiting: bool,
    pointer_events: bool,
    loaded: bool,
}

/// In-terminal frame host. Each frame renders as a placeholder pane carrying
/// the destination label and URL; "loading" completes on the next tick.
#[derive(Debug, Default)]
pub struct PaneHost {
    frames: Vec<PaneFrame>,
    settled: Vec<String>,
}

impl PaneHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain target ids whose pending load finished since the last call.
    pub fn take_settled(&mut self) -> Vec<String> {
        std::mem::take(&mut self.settled)
    }

    /// Complete pending loads. Placeholder panes have nothing to fetch, so a
    /// navigation settles one tick after it was issued.
    pub fn service(&mut self) {
        for frame in &mut self.frames {
            if !frame.loaded {
                frame.loaded = true;
                self.settled.push(frame.target_id.clone());
            }
        }
    }

    pub fn is_visible(&self, id: FrameId) -> bool {
        self.frames.get(id.0).is_some_and(|frame| frame.visible)
    }

    pub fn is_exiting(&self, id: FrameId) -> bool {
        self.frames.get(id.0).is_some_and(|frame| frame.exiting)
    }

    pub fn render_frame(
        &self,
        frame: &mut UiFrame<'_>,
        id: FrameId,
        area: Rect,
        label: &str,
        focused: bool,
    ) {
        let Some(pane) = self.frames.get(id.0) else {
            return;
        };
        if !pane.visible || area.width == 0 || area.height == 0 {
            return;
        }
        let border = if focused {
            crate::theme::pane_border_focused()
        } else {
            crate::theme::pane_border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {label} "))
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        let body = if pane.loaded {
            format!("{}\n", pane.url)
        } else {
            format!("{}\nconnecting…", pane.url)
        };
        frame.render_widget(
            Paragraph::new(body).style(Style::default().fg(crate::theme::toolbar_inactive_fg())),
            inner,
        );
    }
}

impl FrameHost for PaneHost {
    fn create_frame(&mut self, target_id: &str, url: &str) -> FrameId {
        let id = FrameId(self.frames.len());
        self.frames.push(PaneFrame {
            target_id: target_id.to_string(),
            url: url.to_string(),
            visible: true,
            exiting: false,
            pointer_events: true,
            loaded: false,
        });
        tracing::debug!(target_id, url, "created frame");
        id
    }

    fn navigate(&mut self, id: FrameId, url: &str) {
        if let Some(frame) = self.frames.get_mut(id.0) {
            frame.url = url.to_string();
            frame.loaded = false;
            tracing::debug!(target_id = %frame.target_id, url, "navigating frame");
        }
    }

    fn set_visible(&mut self, id: FrameId, visible: bool) {
        if let Some(frame) = self.frames.get_mut(id.0) {
            frame.visible = visible;
            if visible {
                frame.exiting = false;
            }
        }
    }

    fn begin_exit(&mut self, id: FrameId) {
        if let Some(frame) = self.frames.get_mut(id.0) {
            frame.exiting = true;
        }
    }

    fn current_url(&self, id: FrameId) -> Option<String> {
        self.frames.get(id.0).map(|frame| frame.url.clone())
    }

    fn set_pointer_events(&mut self, id: FrameId, enabled: bool) {
        if let Some(frame) = self.frames.get_mut(id.0) {
            frame.pointer_events = enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_settles_on_next_service() {
        let mut host = PaneHost::new();
        let id = host.create_frame("a", "https://a.example/");
        assert!(host.take_settled().is_empty());
        host.service();
        assert_eq!(host.take_settled(), vec!["a".to_string()]);
        // settled is consumed
        host.service();
        assert!(host.take_settled().is_empty());

        host.navigate(id, "https://a.example/other");
        host.service();
        assert_eq!(host.take_settled(), vec!["a".to_string()]);
    }

    #[test]
    fn visibility_resets_exit_flag() {
        let mut host = PaneHost::new();
        let id = host.create_frame("a", "https://a.example/");
        host.begin_exit(id);
        assert!(host.is_exiting(id));
        host.set_visible(id, true);
        assert!(!host.is_exiting(id));
        host.set_visible(id, false);
        assert!(!host.is_visible(id));
    }
}
