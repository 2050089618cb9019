//! Active-selection controller: tracks which control owns the panel's
//! content region and keeps the toolbar's active mark and indicator in step.
//!
//! A click on a target commits synchronously in one pass: active mark,
//! indicator geometry, frame activation, persisted last-selection. There is
//! no intermediate state where the mark and the visible frame disagree.

use std::time::Instant;

use crate::catalog::{Catalog, Target};
use crate::frames::FrameHost;
use crate::registry::SessionRegistry;
use crate::store::{OPT_REMEMBER_LAST, SettingsStore};
use crate::toolbar::{ActiveControl, IndicatorGeom, Toolbar};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    ShowingTarget(String),
    ShowingOverlay,
}

#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
    indicator: Option<IndicatorGeom>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn active_target_id(&self) -> Option<&str> {
        match &self.state {
            SelectionState::ShowingTarget(id) => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn is_overlay(&self) -> bool {
        self.state == SelectionState::ShowingOverlay
    }

    /// Indicator geometry in toolbar content coordinates, if any control is
    /// active.
    pub fn indicator(&self) -> Option<IndicatorGeom> {
        self.indicator
    }

    /// Commit `target_id` as the active selection. No-op when the id is not
    /// in the displayed (enabled) set.
    pub fn select_target(
        &mut self,
        target_id: &str,
        display: &[&Target],
        toolbar: &mut Toolbar,
        registry: &mut SessionRegistry,
        host: &mut dyn FrameHost,
        store: &mut dyn SettingsStore,
        now: Instant,
    ) {
        let Some(target) = display.iter().find(|target| target.id == target_id) else {
            tracing::warn!(target_id, "selection for hidden or unknown target ignored");
            return;
        };
        let active = ActiveControl::Target(target_id.to_string());
        toolbar.set_active(Some(active.clone()));
        self.indicator = toolbar.indicator_for(&active, display);
        registry.activate(host, &target.id, &target.url, &target.label, now);
        if let Some(frame) = registry.frame_for(target_id) {
            host.focus_cue(frame);
        }
        store.save_last_selected(target_id);
        self.state = SelectionState::ShowingTarget(target_id.to_string());
        tracing::debug!(target_id, "selection committed");
    }

    /// Give the overlay the content region; every frame is retired visually
    /// but stays alive for reuse.
    pub fn select_overlay(
        &mut self,
        display: &[&Target],
        toolbar: &mut Toolbar,
        registry: &mut SessionRegistry,
        host: &mut dyn FrameHost,
        now: Instant,
    ) {
        toolbar.set_active(Some(ActiveControl::Overlay));
        self.indicator = toolbar.indicator_for(&ActiveControl::Overlay, display);
        registry.hide_all(host, now);
        self.state = SelectionState::ShowingOverlay;
    }

    /// Visual-only update for a debounced shortcut step: move the active mark
    /// and indicator without activating a frame or persisting anything. The
    /// committed state is untouched until the step is committed.
    pub fn preview_target(
        &mut self,
        target_id: &str,
        display: &[&Target],
        toolbar: &mut Toolbar,
    ) -> Option<IndicatorGeom> {
        let active = ActiveControl::Target(target_id.to_string());
        toolbar.set_active(Some(active.clone()));
        self.indicator = toolbar.indicator_for(&active, display);
        self.indicator
    }

    /// Recompute indicator geometry for the current active control, e.g.
    /// after a reorder or an enabled-set change moved its button.
    pub fn reposition_indicator(&mut self, toolbar: &Toolbar, display: &[&Target]) {
        self.indicator = match &self.state {
            SelectionState::ShowingTarget(id) => {
                toolbar.indicator_for(&ActiveControl::Target(id.clone()), display)
            }
            SelectionState::ShowingOverlay => {
                toolbar.indicator_for(&ActiveControl::Overlay, display)
            }
            SelectionState::Idle => None,
        };
    }

    /// Startup resolution: the remembered selection when the option is on and
    /// the target is still enabled, otherwise the first enabled target.
    pub fn initial_target(catalog: &Catalog, store: &dyn SettingsStore) -> Option<String> {
        if store.bool_option(OPT_REMEMBER_LAST)
            && let Some(last) = store.last_selected()
            && catalog.is_enabled(&last)
        {
            return Some(last);
        }
        catalog.first_enabled().map(|target| target.id.clone())
    }
}
