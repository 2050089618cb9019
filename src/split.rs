//! Split-pane controller: an optional secondary pane beside the primary
//! frame, populated by dropping a target onto it and resized by dragging the
//! divider.
//!
//! Resize input is sampled: the drag stores the latest pointer column and the
//! share is recomputed once per service tick, never per motion event. Both
//! panes lose pointer events for the duration of the drag so the frames
//! cannot swallow the gesture.

use std::time::Instant;

use ratatui::layout::Rect;

use crate::catalog::Target;
use crate::constants::{DROP_FADE, MAX_PRIMARY_SHARE, MIN_PRIMARY_SHARE};
use crate::frames::{FrameHost, FrameId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitState {
    Single,
    Split,
}

#[derive(Debug)]
struct SecondaryPane {
    frame: FrameId,
    target_id: String,
    label: String,
}

#[derive(Debug)]
struct ResizeDrag {
    start_col: u16,
    start_share: f32,
    container_width: u16,
    pending_col: Option<u16>,
    primary: Option<FrameId>,
    secondary: Option<FrameId>,
}

#[derive(Debug)]
pub struct SplitController {
    state: SplitState,
    primary_share: f32,
    secondary: Option<SecondaryPane>,
    resize: Option<ResizeDrag>,
    drop_fade_until: Option<Instant>,
}

pub fn clamp_share(share: f32) -> f32 {
    share.clamp(MIN_PRIMARY_SHARE, MAX_PRIMARY_SHARE)
}

impl SplitController {
    pub fn new() -> Self {
        Self {
            state: SplitState::Single,
            primary_share: 50.0,
            secondary: None,
            resize: None,
            drop_fade_until: None,
        }
    }

    pub fn state(&self) -> SplitState {
        self.state
    }

    pub fn is_split(&self) -> bool {
        self.state == SplitState::Split
    }

    pub fn primary_share(&self) -> f32 {
        self.primary_share
    }

    pub fn secondary_frame(&self) -> Option<FrameId> {
        self.secondary.as_ref().map(|pane| pane.frame)
    }

    pub fn secondary_label(&self) -> Option<&str> {
        self.secondary.as_ref().map(|pane| pane.label.as_str())
    }

    /// Secondary pane is open but nothing was dropped into it yet.
    pub fn awaiting_drop(&self) -> bool {
        self.is_split() && self.secondary.is_none()
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    pub fn drop_fading(&self) -> bool {
        self.drop_fade_until.is_some()
    }

    /// Open or close the secondary pane. Ignored while the overlay owns the
    /// content region.
    pub fn toggle(&mut self, overlay_active: bool, host: &mut dyn FrameHost) {
        if overlay_active {
            tracing::debug!("split toggle ignored while overlay is active");
            return;
        }
        match self.state {
            SplitState::Single => {
                self.state = SplitState::Split;
                if let Some(pane) = &self.secondary {
                    host.set_visible(pane.frame, true);
                }
            }
            SplitState::Split => self.close(host),
        }
    }

    /// Close the secondary pane. The secondary frame is hidden, not
    /// destroyed, and its session survives for the next split.
    pub fn close(&mut self, host: &mut dyn FrameHost) {
        if let Some(drag) = self.resize.take() {
            end_resize_pointer_events(&drag, host);
        }
        if let Some(pane) = &self.secondary {
            host.set_visible(pane.frame, false);
        }
        self.state = SplitState::Single;
        self.drop_fade_until = None;
    }

    /// A target was dropped into the secondary pane: create its frame on the
    /// first drop, navigate the existing one otherwise, and fade out the
    /// placeholder.
    pub fn accept_drop(&mut self, target: &Target, host: &mut dyn FrameHost, now: Instant) {
        if self.state != SplitState::Split {
            return;
        }
        match self.secondary.as_mut() {
            Some(pane) => {
                if pane.target_id != target.id {
                    host.navigate(pane.frame, &target.url);
                    pane.target_id = target.id.clone();
                    pane.label = target.label.clone();
                }
                host.set_visible(pane.frame, true);
            }
            None => {
                let frame = host.create_frame(&target.id, &target.url);
                self.secondary = Some(SecondaryPane {
                    frame,
                    target_id: target.id.clone(),
                    label: target.label.clone(),
                });
            }
        }
        self.drop_fade_until = Some(now + DROP_FADE);
        tracing::debug!(target_id = %target.id, "secondary pane populated");
    }

    /// Start a divider drag. Pointer events go dark on both panes until
    /// release.
    pub fn begin_resize(
        &mut self,
        start_col: u16,
        container_width: u16,
        primary: Option<FrameId>,
        host: &mut dyn FrameHost,
    ) {
        if self.state != SplitState::Split || container_width == 0 {
            return;
        }
        let secondary = self.secondary_frame();
        if let Some(frame) = primary {
            host.set_pointer_events(frame, false);
        }
        if let Some(frame) = secondary {
            host.set_pointer_events(frame, false);
        }
        self.resize = Some(ResizeDrag {
            start_col,
            start_share: self.primary_share,
            container_width,
            pending_col: None,
            primary,
            secondary,
        });
    }

    /// Record the latest pointer column; the share moves on the next tick.
    pub fn track_resize(&mut self, col: u16) {
        if let Some(drag) = self.resize.as_mut() {
            drag.pending_col = Some(col);
        }
    }

    pub fn end_resize(&mut self, host: &mut dyn FrameHost) {
        // apply whatever the pointer last reported before letting go
        self.apply_pending_resize();
        if let Some(drag) = self.resize.take() {
            end_resize_pointer_events(&drag, host);
        }
    }

    /// Per-tick work: consume the sampled resize column and expire the drop
    /// placeholder fade.
    pub fn service(&mut self, now: Instant) {
        self.apply_pending_resize();
        if let Some(deadline) = self.drop_fade_until
            && now >= deadline
        {
            self.drop_fade_until = None;
        }
    }

    fn apply_pending_resize(&mut self) {
        if let Some(drag) = self.resize.as_mut()
            && let Some(col) = drag.pending_col.take()
        {
            let delta_cols = col as f32 - drag.start_col as f32;
            let delta_share = delta_cols / drag.container_width as f32 * 100.0;
            self.primary_share = clamp_share(drag.start_share + delta_share);
        }
    }

    /// Carve `container` into primary pane, divider column, and secondary
    /// pane. In single mode the primary takes everything.
    pub fn layout(&self, container: Rect) -> (Rect, Option<Rect>, Option<Rect>) {
        if self.state == SplitState::Single || container.width < 3 {
            return (container, None, None);
        }
        let primary_w =
            ((container.width as f32 * self.primary_share / 100.0).round() as u16)
                .clamp(1, container.width - 2);
        let primary = Rect {
            width: primary_w,
            ..container
        };
        let divider = Rect {
            x: container.x + primary_w,
            width: 1,
            ..container
        };
        let secondary = Rect {
            x: container.x + primary_w + 1,
            width: container.width - primary_w - 1,
            ..container
        };
        (primary, Some(divider), Some(secondary))
    }
}

impl Default for SplitController {
    fn default() -> Self {
        Self::new()
    }
}

fn end_resize_pointer_events(drag: &ResizeDrag, host: &mut dyn FrameHost) {
    if let Some(frame) = drag.primary {
        host.set_pointer_events(frame, true);
    }
    if let Some(frame) = drag.secondary {
        host.set_pointer_events(frame, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingHost;

    fn target(id: &str) -> Target {
        Target {
            id: id.to_string(),
            url: format!("https://{id}.example/"),
            label: id.to_uppercase(),
            enabled: true,
        }
    }

    #[test]
    fn clamp_share_bounds() {
        assert_eq!(clamp_share(5.0), MIN_PRIMARY_SHARE);
        assert_eq!(clamp_share(95.0), MAX_PRIMARY_SHARE);
        assert_eq!(clamp_share(42.0), 42.0);
    }

    #[test]
    fn toggle_respects_overlay() {
        let mut host = RecordingHost::new();
        let mut split = SplitController::new();
        split.toggle(true, &mut host);
        assert!(!split.is_split());
        split.toggle(false, &mut host);
        assert!(split.is_split());
        assert!(split.awaiting_drop());
    }

    #[test]
    fn first_drop_creates_then_navigates() {
        let mut host = RecordingHost::new();
        let mut split = SplitController::new();
        let t = Instant::now();
        split.toggle(false, &mut host);

        split.accept_drop(&target("a"), &mut host, t);
        assert_eq!(host.created.len(), 1);
        assert!(split.drop_fading());
        assert_eq!(split.secondary_label(), Some("A"));

        split.accept_drop(&target("b"), &mut host, t);
        assert_eq!(host.created.len(), 1);
        assert_eq!(host.navigations.len(), 1);
        assert_eq!(split.secondary_label(), Some("B"));

        // same target again: no extra navigation
        split.accept_drop(&target("b"), &mut host, t);
        assert_eq!(host.navigations.len(), 1);

        split.service(t + DROP_FADE);
        assert!(!split.drop_fading());
    }

    #[test]
    fn close_hides_but_keeps_secondary_frame() {
        let mut host = RecordingHost::new();
        let mut split = SplitController::new();
        let t = Instant::now();
        split.toggle(false, &mut host);
        split.accept_drop(&target("a"), &mut host, t);
        let frame = split.secondary_frame().unwrap();

        split.toggle(false, &mut host);
        assert!(!split.is_split());
        assert!(!host.visible(frame));

        split.toggle(false, &mut host);
        assert!(host.visible(frame));
        assert_eq!(host.created.len(), 1);
    }

    #[test]
    fn resize_applies_once_per_tick_and_clamps() {
        let mut host = RecordingHost::new();
        let mut split = SplitController::new();
        let t = Instant::now();
        split.toggle(false, &mut host);
        split.accept_drop(&target("a"), &mut host, t);
        let secondary = split.secondary_frame().unwrap();

        split.begin_resize(50, 100, None, &mut host);
        assert!(host.pointer_events.contains(&(secondary, false)));

        // only the last sampled column counts
        split.track_resize(60);
        split.track_resize(70);
        assert_eq!(split.primary_share(), 50.0);
        split.service(t);
        assert_eq!(split.primary_share(), 70.0);

        // way past the edge: clamped
        split.track_resize(0);
        split.service(t);
        assert_eq!(split.primary_share(), MIN_PRIMARY_SHARE);

        split.end_resize(&mut host);
        assert!(host.pointer_events.contains(&(secondary, true)));
        assert!(!split.is_resizing());
    }

    #[test]
    fn end_resize_applies_last_sample() {
        let mut host = RecordingHost::new();
        let mut split = SplitController::new();
        split.toggle(false, &mut host);
        split.begin_resize(50, 100, None, &mut host);
        split.track_resize(65);
        split.end_resize(&mut host);
        assert_eq!(split.primary_share(), 65.0);
    }

    #[test]
    fn layout_splits_around_divider() {
        let mut host = RecordingHost::new();
        let mut split = SplitController::new();
        let container = Rect {
            x: 0,
            y: 0,
            width: 100,
            height: 20,
        };
        let (primary, divider, secondary) = split.layout(container);
        assert_eq!(primary, container);
        assert!(divider.is_none() && secondary.is_none());

        split.toggle(false, &mut host);
        let (primary, divider, secondary) = split.layout(container);
        assert_eq!(primary.width, 50);
        assert_eq!(divider.unwrap().x, 50);
        let secondary = secondary.unwrap();
        assert_eq!(secondary.x, 51);
        assert_eq!(secondary.width, 49);
    }
}
