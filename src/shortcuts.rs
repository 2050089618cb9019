//! Debounced shortcut stepping through the enabled targets.
//!
//! Rapid steps update the toolbar visuals immediately but only arm a commit
//! deadline; the frame activation happens once, for the final candidate, when
//! the burst goes quiet. Stepping is cyclic over the displayed order.

use std::time::Instant;

use crate::catalog::{Target, host_of};
use crate::constants::SHORTCUT_COMMIT_DELAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Next,
    Prev,
}

impl StepDirection {
    fn delta(self) -> i64 {
        match self {
            StepDirection::Next => 1,
            StepDirection::Prev => -1,
        }
    }
}

#[derive(Debug, Clone)]
struct PendingSwitch {
    target_id: String,
    commit_at: Instant,
}

#[derive(Debug, Default)]
pub struct ShortcutDebouncer {
    pending: Option<PendingSwitch>,
}

impl ShortcutDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one step through `display`. `current_visual` is the toolbar's
    /// active mark; `fallback_url` is the live URL of the committed frame,
    /// consulted when the mark does not resolve to a displayed target.
    ///
    /// Returns the new visual candidate and (re)arms the commit deadline.
    /// When neither the mark nor the URL host resolves, the step is dropped.
    pub fn step(
        &mut self,
        direction: StepDirection,
        display: &[&Target],
        current_visual: Option<&str>,
        fallback_url: Option<&str>,
        now: Instant,
    ) -> Option<String> {
        if display.is_empty() {
            return None;
        }
        let current = self
            .resolve_index(display, current_visual)
            .or_else(|| host_match_index(display, fallback_url?));
        let Some(current) = current else {
            tracing::warn!("shortcut step with no resolvable current target, dropping");
            return None;
        };
        let next = (current as i64 + direction.delta()).rem_euclid(display.len() as i64) as usize;
        let target_id = display[next].id.clone();
        self.pending = Some(PendingSwitch {
            target_id: target_id.clone(),
            commit_at: now + SHORTCUT_COMMIT_DELAY,
        });
        tracing::debug!(target_id, "shortcut step pending");
        Some(target_id)
    }

    /// Drop the pending switch; a direct click supersedes the burst.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("pending shortcut switch cancelled");
        }
    }

    pub fn pending_target(&self) -> Option<&str> {
        self.pending.as_ref().map(|pending| pending.target_id.as_str())
    }

    /// Commit the pending switch if its deadline has passed, yielding the
    /// target to activate.
    pub fn service(&mut self, now: Instant) -> Option<String> {
        if self
            .pending
            .as_ref()
            .is_some_and(|pending| now >= pending.commit_at)
        {
            return self.pending.take().map(|pending| pending.target_id);
        }
        None
    }

    fn resolve_index(&self, display: &[&Target], current_visual: Option<&str>) -> Option<usize> {
        // A mid-burst step continues from the pending candidate, which is the
        // same id the visual mark shows; either source works.
        let current = self.pending_target().or(current_visual)?;
        display.iter().position(|target| target.id == current)
    }
}

fn host_match_index(display: &[&Target], live_url: &str) -> Option<usize> {
    let live_host = host_of(live_url)?;
    display
        .iter()
        .position(|target| host_of(&target.url).as_deref() == Some(live_host.as_str()))
}
