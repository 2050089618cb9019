//! Test doubles shared by unit and integration tests.

use std::collections::BTreeMap;

use crate::frames::{FrameHost, FrameId};

/// `FrameHost` that records every instruction it receives.
#[derive(Debug, Default)]
pub struct RecordingHost {
    /// `(target_id, url)` per created frame, in creation order.
    pub created: Vec<(String, String)>,
    /// `(frame, url)` per explicit navigation. Frame creation does not count
    /// as a navigation.
    pub navigations: Vec<(FrameId, String)>,
    /// Frames whose exit animation was started, in order, with repeats.
    pub exits: Vec<FrameId>,
    /// `(frame, enabled)` pointer-event toggles, in order.
    pub pointer_events: Vec<(FrameId, bool)>,
    /// Frames given the focus cue, in order.
    pub focus_cues: Vec<FrameId>,
    visible: BTreeMap<FrameId, bool>,
    urls: BTreeMap<FrameId, String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self, id: FrameId) -> bool {
        self.visible.get(&id).copied().unwrap_or(false)
    }

    /// Overwrite a frame's reported URL without recording a navigation,
    /// simulating in-frame navigation by the destination itself.
    pub fn drift_url(&mut self, id: FrameId, url: &str) {
        self.urls.insert(id, url.to_string());
    }
}

impl FrameHost for RecordingHost {
    fn create_frame(&mut self, target_id: &str, url: &str) -> FrameId {
        let id = FrameId::from_index(self.created.len());
        self.created.push((target_id.to_string(), url.to_string()));
        self.urls.insert(id, url.to_string());
        self.visible.insert(id, true);
        id
    }

    fn navigate(&mut self, id: FrameId, url: &str) {
        self.navigations.push((id, url.to_string()));
        self.urls.insert(id, url.to_string());
    }

    fn set_visible(&mut self, id: FrameId, visible: bool) {
        self.visible.insert(id, visible);
    }

    fn begin_exit(&mut self, id: FrameId) {
        self.exits.push(id);
    }

    fn current_url(&self, id: FrameId) -> Option<String> {
        self.urls.get(&id).cloned()
    }

    fn set_pointer_events(&mut self, id: FrameId, enabled: bool) {
        self.pointer_events.push((id, enabled));
    }

    fn focus_cue(&mut self, id: FrameId) {
        self.focus_cues.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_lifecycle_in_order() {
        let mut host = RecordingHost::new();
        let a = host.create_frame("a", "https://a.example/");
        let b = host.create_frame("b", "https://b.example/");
        assert_ne!(a, b);
        assert!(host.visible(a));

        host.begin_exit(a);
        host.set_visible(a, false);
        host.navigate(b, "https://b.example/next");
        assert_eq!(host.exits, vec![a]);
        assert!(!host.visible(a));
        assert_eq!(host.current_url(b).as_deref(), Some("https://b.example/next"));
        assert_eq!(host.navigations.len(), 1);
    }
}
