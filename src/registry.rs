//! SessionRegistry: owns the pool of embedded frames, one per target, with
//! lazy creation and reuse.
//!
//! The registry is the only component allowed to create primary frames or
//! flip their visibility. Frames are never destroyed once created — the whole
//! point of the pool is that re-activating a target never re-issues
//! navigation. The candidate set is small and fixed, so the unbounded pool is
//! acceptable.

use std::time::Instant;

use crate::constants::FRAME_EXIT_ANIMATION;
use crate::frames::{FrameHost, FrameId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Loading,
    Ready,
    Hidden,
}

#[derive(Debug)]
struct SessionFrame {
    target_id: String,
    state: FrameState,
    element: FrameId,
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    frames: Vec<SessionFrame>,
    exit_deadlines: Vec<(FrameId, Instant)>,
    loading_label: Option<String>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `target_id` the sole visible primary frame, creating its frame on
    /// first activation. All other frames start their exit animation; their
    /// visibility flag is cleared when the deadline passes in [`Self::service`].
    pub fn activate(
        &mut self,
        host: &mut dyn FrameHost,
        target_id: &str,
        url: &str,
        label: &str,
        now: Instant,
    ) {
        self.retire_others(host, target_id, now);

        if let Some(frame) = self
            .frames
            .iter_mut()
            .find(|frame| frame.target_id == target_id)
        {
            // Reuse: no navigation, just show it again.
            frame.state = FrameState::Ready;
            host.set_visible(frame.element, true);
            self.loading_label = None;
            return;
        }

        let element = host.create_frame(target_id, url);
        host.set_visible(element, true);
        self.frames.push(SessionFrame {
            target_id: target_id.to_string(),
            state: FrameState::Loading,
            element,
        });
        self.loading_label = Some(label.to_string());
        tracing::debug!(target_id, "first activation, frame loading");
    }

    /// Terminal signal for a frame's load attempt. Success and failure both
    /// land here; the hosted frame renders its own error state, so the only
    /// effect is ending the loading indicator.
    pub fn on_frame_settled(&mut self, target_id: &str) {
        if let Some(frame) = self
            .frames
            .iter_mut()
            .find(|frame| frame.target_id == target_id)
            && frame.state == FrameState::Loading
        {
            frame.state = FrameState::Ready;
            self.loading_label = None;
        }
    }

    /// Read-only lookup used by other components, e.g. to source the primary
    /// frame's live URL for the shortcut desync fallback.
    pub fn frame_for(&self, target_id: &str) -> Option<FrameId> {
        self.frames
            .iter()
            .find(|frame| frame.target_id == target_id)
            .map(|frame| frame.element)
    }

    pub fn state_of(&self, target_id: &str) -> Option<FrameState> {
        self.frames
            .iter()
            .find(|frame| frame.target_id == target_id)
            .map(|frame| frame.state)
    }

    /// Label for the in-flight load, if any; cleared on settle.
    pub fn loading_label(&self) -> Option<&str> {
        self.loading_label.as_deref()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Remove all frames' visual prominence without destroying them (overlay
    /// activation path).
    pub fn hide_all(&mut self, host: &mut dyn FrameHost, now: Instant) {
        self.retire_others(host, "", now);
        self.loading_label = None;
    }

    /// Fire due exit-animation deadlines. Deadlines are never cancelled: a
    /// frame re-activated mid-animation may be hidden once redundantly, and
    /// the next activation shows it again.
    pub fn service(&mut self, host: &mut dyn FrameHost, now: Instant) {
        let due: Vec<FrameId> = self
            .exit_deadlines
            .iter()
            .filter(|(_, deadline)| now >= *deadline)
            .map(|(element, _)| *element)
            .collect();
        self.exit_deadlines.retain(|(_, deadline)| now < *deadline);
        for element in due {
            host.set_visible(element, false);
        }
    }

    fn retire_others(&mut self, host: &mut dyn FrameHost, keep_target: &str, now: Instant) {
        for frame in &mut self.frames {
            if frame.target_id != keep_target && frame.state != FrameState::Hidden {
                frame.state = FrameState::Hidden;
                host.begin_exit(frame.element);
                self.exit_deadlines
                    .push((frame.element, now + FRAME_EXIT_ANIMATION));
            }
        }
    }
}
