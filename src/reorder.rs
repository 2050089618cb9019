//! Drag-to-reorder for the toolbar targets.
//!
//! The coordinator owns the presentation order outright; the toolbar renders
//! a projection of it. A press arms a gesture, motion past a small threshold
//! starts the drag, and release over another button splices the source next
//! to it and persists the new order. Every end path, aborted or not, clears
//! the transient visuals.

use crate::catalog::{Catalog, Target};
use crate::constants::DRAG_THRESHOLD;
use crate::store::SettingsStore;
use crate::toolbar::Toolbar;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Press and release without crossing the drag threshold.
    Click(String),
    Reordered,
    Aborted,
}

#[derive(Debug)]
struct DragGesture {
    source: String,
    origin: (u16, u16),
    started: bool,
    over: Option<String>,
}

#[derive(Debug, Default)]
pub struct ReorderCoordinator {
    order: Vec<String>,
}

impl ReorderCoordinator {
    /// Rebuild the order from the persisted list: ids no longer in the
    /// catalog are dropped, catalog entries missing from the list are
    /// appended in catalog order.
    pub fn from_persisted(persisted: &[String], catalog: &Catalog) -> Self {
        let mut order: Vec<String> = persisted
            .iter()
            .filter(|id| catalog.get(id).is_some())
            .cloned()
            .collect();
        for target in catalog.enumerate() {
            if !order.contains(&target.id) {
                order.push(target.id.clone());
            }
        }
        Self { order }
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// The toolbar's displayed targets: presentation order filtered to the
    /// enabled set.
    pub fn display<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Target> {
        self.order
            .iter()
            .filter_map(|id| catalog.get(id))
            .filter(|target| target.enabled)
            .collect()
    }

    /// Splice `source` adjacent to `over`: before it when the source came
    /// from further right, after it otherwise. Returns false when nothing
    /// moved.
    fn splice(&mut self, source: &str, over: &str) -> bool {
        let Some(src_idx) = self.order.iter().position(|id| id == source) else {
            return false;
        };
        let Some(tgt_idx) = self.order.iter().position(|id| id == over) else {
            return false;
        };
        if src_idx == tgt_idx {
            return false;
        }
        let moved = self.order.remove(src_idx);
        let anchor = match self.order.iter().position(|id| id == over) {
            Some(anchor) => anchor,
            None => {
                self.order.insert(src_idx, moved);
                return false;
            }
        };
        let insert_at = if src_idx > tgt_idx { anchor } else { anchor + 1 };
        self.order.insert(insert_at, moved);
        true
    }
}

/// One in-flight drag gesture over the toolbar.
#[derive(Debug, Default)]
pub struct DragController {
    gesture: Option<DragGesture>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, target_id: &str, column: u16, row: u16) {
        self.gesture = Some(DragGesture {
            source: target_id.to_string(),
            origin: (column, row),
            started: false,
            over: None,
        });
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.as_ref().is_some_and(|gesture| gesture.started)
    }

    pub fn source_id(&self) -> Option<&str> {
        self.gesture.as_ref().map(|gesture| gesture.source.as_str())
    }

    pub fn motion(
        &mut self,
        column: u16,
        row: u16,
        catalog: &Catalog,
        toolbar: &mut Toolbar,
    ) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        if !gesture.started {
            let (ox, oy) = gesture.origin;
            if column.abs_diff(ox) <= DRAG_THRESHOLD && row.abs_diff(oy) <= DRAG_THRESHOLD {
                return;
            }
            gesture.started = true;
            toolbar.set_drag_source(Some(gesture.source.clone()));
        }
        let label = catalog
            .get(&gesture.source)
            .map(|target| target.label.clone())
            .unwrap_or_else(|| gesture.source.clone());
        toolbar.set_drag_proxy(Some((label, (column, row))));

        // At most one drop highlight, and never the source itself.
        let over = toolbar
            .target_at(column, row)
            .filter(|id| *id != gesture.source);
        gesture.over = over.clone();
        toolbar.set_drop_highlight(over);
    }

    pub fn release(
        &mut self,
        reorder: &mut ReorderCoordinator,
        toolbar: &mut Toolbar,
        store: &mut dyn SettingsStore,
    ) -> DragOutcome {
        toolbar.clear_drag_visuals();
        let Some(gesture) = self.gesture.take() else {
            return DragOutcome::Aborted;
        };
        if !gesture.started {
            return DragOutcome::Click(gesture.source);
        }
        match gesture.over {
            Some(over) if reorder.splice(&gesture.source, &over) => {
                store.save_order(reorder.order());
                tracing::debug!(source = %gesture.source, over = %over, "reorder persisted");
                DragOutcome::Reordered
            }
            _ => DragOutcome::Aborted,
        }
    }

    pub fn abort(&mut self, toolbar: &mut Toolbar) {
        self.gesture = None;
        toolbar.clear_drag_visuals();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;

    fn catalog() -> Catalog {
        Catalog::new(
            [("a", "A"), ("b", "B"), ("c", "C")]
                .iter()
                .map(|(id, label)| Target {
                    id: (*id).to_string(),
                    url: format!("https://{id}.example/"),
                    label: (*label).to_string(),
                    enabled: true,
                })
                .collect(),
        )
    }

    fn ids(order: &[String]) -> Vec<&str> {
        order.iter().map(String::as_str).collect()
    }

    #[test]
    fn from_persisted_drops_unknown_and_appends_missing() {
        let catalog = catalog();
        let persisted = vec!["c".to_string(), "ghost".to_string(), "a".to_string()];
        let reorder = ReorderCoordinator::from_persisted(&persisted, &catalog);
        assert_eq!(ids(&reorder.order().to_vec()), vec!["c", "a", "b"]);
    }

    #[test]
    fn splice_before_when_dragging_leftward() {
        let catalog = catalog();
        let mut reorder = ReorderCoordinator::from_persisted(&[], &catalog);
        // drag "c" onto "a": source index 2 > target index 0, lands before
        assert!(reorder.splice("c", "a"));
        assert_eq!(ids(&reorder.order().to_vec()), vec!["c", "a", "b"]);
    }

    #[test]
    fn splice_after_when_dragging_rightward() {
        let catalog = catalog();
        let mut reorder = ReorderCoordinator::from_persisted(&[], &catalog);
        // drag "a" onto "c": source index 0 < target index 2, lands after
        assert!(reorder.splice("a", "c"));
        assert_eq!(ids(&reorder.order().to_vec()), vec!["b", "c", "a"]);
    }

    #[test]
    fn display_projects_order_and_enabled() {
        let mut catalog = catalog();
        catalog.set_enabled("b", false);
        let persisted = vec!["c".to_string(), "b".to_string(), "a".to_string()];
        let reorder = ReorderCoordinator::from_persisted(&persisted, &catalog);
        let display: Vec<&str> = reorder
            .display(&catalog)
            .iter()
            .map(|target| target.id.as_str())
            .collect();
        assert_eq!(display, vec!["c", "a"]);
    }

    fn rendered_toolbar(catalog: &Catalog, reorder: &ReorderCoordinator) -> Toolbar {
        let area = Rect {
            x: 0,
            y: 0,
            width: 60,
            height: 4,
        };
        let mut toolbar = Toolbar::new();
        toolbar.split_area(area);
        let display = reorder.display(catalog);
        let mut buf = Buffer::empty(area);
        let mut ui = crate::ui::UiFrame::from_parts(area, &mut buf);
        toolbar.render(&mut ui, &display, None);
        toolbar
    }

    #[test]
    fn press_move_release_reorders_and_persists() {
        let catalog = catalog();
        let mut reorder = ReorderCoordinator::from_persisted(&[], &catalog);
        let mut toolbar = rendered_toolbar(&catalog, &reorder);
        let mut store = MemoryStore::new();
        let mut drag = DragController::new();

        // layout: " A "(0..3) " B "(3..6) " C "(6..9)
        drag.press("c", 7, 0);
        drag.motion(4, 0, &catalog, &mut toolbar);
        assert!(drag.is_dragging());
        drag.motion(1, 0, &catalog, &mut toolbar);
        let outcome = drag.release(&mut reorder, &mut toolbar, &mut store);
        assert_eq!(outcome, DragOutcome::Reordered);
        assert_eq!(ids(&reorder.order().to_vec()), vec!["c", "a", "b"]);
        assert_eq!(store.order(), reorder.order().to_vec());
    }

    #[test]
    fn release_without_threshold_is_a_click() {
        let catalog = catalog();
        let mut reorder = ReorderCoordinator::from_persisted(&[], &catalog);
        let mut toolbar = rendered_toolbar(&catalog, &reorder);
        let mut store = MemoryStore::new();
        let mut drag = DragController::new();

        drag.press("b", 4, 0);
        drag.motion(5, 0, &catalog, &mut toolbar);
        assert!(!drag.is_dragging());
        let outcome = drag.release(&mut reorder, &mut toolbar, &mut store);
        assert_eq!(outcome, DragOutcome::Click("b".to_string()));
        assert!(store.order().is_empty());
    }

    #[test]
    fn drop_outside_any_button_aborts_without_change() {
        let catalog = catalog();
        let mut reorder = ReorderCoordinator::from_persisted(&[], &catalog);
        let mut toolbar = rendered_toolbar(&catalog, &reorder);
        let mut store = MemoryStore::new();
        let mut drag = DragController::new();

        drag.press("a", 1, 0);
        drag.motion(30, 3, &catalog, &mut toolbar);
        let outcome = drag.release(&mut reorder, &mut toolbar, &mut store);
        assert_eq!(outcome, DragOutcome::Aborted);
        assert_eq!(ids(&reorder.order().to_vec()), vec!["a", "b", "c"]);
        assert!(store.order().is_empty());
    }

    #[test]
    fn dropping_on_self_aborts() {
        let catalog = catalog();
        let mut reorder = ReorderCoordinator::from_persisted(&[], &catalog);
        let mut toolbar = rendered_toolbar(&catalog, &reorder);
        let mut store = MemoryStore::new();
        let mut drag = DragController::new();

        drag.press("a", 1, 0);
        drag.motion(4, 0, &catalog, &mut toolbar);
        drag.motion(1, 0, &catalog, &mut toolbar);
        let outcome = drag.release(&mut reorder, &mut toolbar, &mut store);
        assert_eq!(outcome, DragOutcome::Aborted);
        assert_eq!(ids(&reorder.order().to_vec()), vec!["a", "b", "c"]);
    }
}
