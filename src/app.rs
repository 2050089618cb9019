//! Composition root. `App` owns every controller and is the only place where
//! they talk to each other: input routing, per-tick servicing, and rendering
//! all live here, so the controllers themselves stay free of cross-references.

use std::sync::mpsc::Receiver;
use std::time::Instant;

use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Paragraph;

use crate::catalog::{Catalog, Target};
use crate::commands::ControlMessage;
use crate::components::{
    Component, SettingsChange, SettingsItem, SettingsOverlay, SupportOverlay,
};
use crate::event_loop::ControlFlow;
use crate::frames::{FrameHost, PaneHost};
use crate::keybindings::{Action, KeyBindings};
use crate::registry::SessionRegistry;
use crate::reorder::{DragController, DragOutcome, ReorderCoordinator};
use crate::selection::SelectionController;
use crate::shortcuts::{ShortcutDebouncer, StepDirection};
use crate::split::SplitController;
use crate::store::{OPT_REMEMBER_LAST, SettingsStore};
use crate::toolbar::Toolbar;
use crate::ui::{UiFrame, rect_contains};

pub struct App {
    catalog: Catalog,
    store: Box<dyn SettingsStore>,
    host: PaneHost,
    registry: SessionRegistry,
    selection: SelectionController,
    debouncer: ShortcutDebouncer,
    reorder: ReorderCoordinator,
    drag: DragController,
    split: SplitController,
    toolbar: Toolbar,
    support: SupportOverlay,
    settings: SettingsOverlay,
    settings_open: bool,
    bindings: KeyBindings,
    commands: Option<Receiver<ControlMessage>>,
    content: Rect,
    divider: Option<Rect>,
    secondary: Option<Rect>,
    last_target: Option<String>,
}

impl App {
    pub fn new(
        catalog: Catalog,
        store: Box<dyn SettingsStore>,
        commands: Option<Receiver<ControlMessage>>,
    ) -> Self {
        let mut catalog = catalog;
        let reorder = ReorderCoordinator::from_persisted(&store.order(), &catalog);
        catalog.apply_order(&reorder.order().to_vec());
        catalog.take_changed();
        Self {
            catalog,
            store,
            host: PaneHost::new(),
            registry: SessionRegistry::new(),
            selection: SelectionController::new(),
            debouncer: ShortcutDebouncer::new(),
            reorder,
            drag: DragController::new(),
            split: SplitController::new(),
            toolbar: Toolbar::new(),
            support: SupportOverlay::new(),
            settings: SettingsOverlay::new(),
            settings_open: false,
            bindings: KeyBindings::default(),
            commands,
            content: Rect::default(),
            divider: None,
            secondary: None,
            last_target: None,
        }
    }

    /// Resolve and commit the startup selection.
    pub fn startup(&mut self, now: Instant) {
        if let Some(id) = SelectionController::initial_target(&self.catalog, self.store.as_ref()) {
            self.select(&id, now);
        }
    }

    pub fn active_target_id(&self) -> Option<&str> {
        self.selection.active_target_id()
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn split(&self) -> &SplitController {
        &self.split
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn host(&self) -> &PaneHost {
        &self.host
    }

    pub fn order(&self) -> &[String] {
        self.reorder.order()
    }

    pub fn pending_shortcut(&self) -> Option<&str> {
        self.debouncer.pending_target()
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    fn select(&mut self, id: &str, now: Instant) {
        let display = self.reorder.display(&self.catalog);
        self.selection.select_target(
            id,
            &display,
            &mut self.toolbar,
            &mut self.registry,
            &mut self.host,
            self.store.as_mut(),
            now,
        );
        if let Some(active) = self.selection.active_target_id() {
            self.last_target = Some(active.to_string());
        }
        self.sync_exclusions();
    }

    fn open_support(&mut self, now: Instant) {
        if self.split.is_split() {
            return;
        }
        self.debouncer.cancel();
        let display = self.reorder.display(&self.catalog);
        self.selection.select_overlay(
            &display,
            &mut self.toolbar,
            &mut self.registry,
            &mut self.host,
            now,
        );
        self.sync_exclusions();
    }

    fn close_overlay(&mut self, now: Instant) {
        if !self.selection.is_overlay() {
            return;
        }
        match self.last_target.clone() {
            Some(id) if self.catalog.is_enabled(&id) => self.select(&id, now),
            _ => {
                if let Some(first) = self.catalog.first_enabled().map(|t| t.id.clone()) {
                    self.select(&first, now);
                }
            }
        }
    }

    fn toggle_split(&mut self) {
        self.split.toggle(self.selection.is_overlay(), &mut self.host);
        self.sync_exclusions();
    }

    /// Overlay and split are mutually exclusive; each disables the other's
    /// toolbar control while active.
    fn sync_exclusions(&mut self) {
        self.toolbar.set_overlay_enabled(!self.split.is_split());
        self.toolbar.set_split_enabled(!self.selection.is_overlay());
    }

    fn step(&mut self, direction: StepDirection, now: Instant) {
        let visual = self.toolbar.active_target_id().map(str::to_string);
        let stepped = {
            let display = self.reorder.display(&self.catalog);
            let fallback = self
                .selection
                .active_target_id()
                .and_then(|id| self.registry.frame_for(id))
                .and_then(|frame| self.host.current_url(frame));
            self.debouncer
                .step(direction, &display, visual.as_deref(), fallback.as_deref(), now)
        };
        if let Some(id) = stepped {
            let display = self.reorder.display(&self.catalog);
            if let Some(geom) = self.selection.preview_target(&id, &display, &mut self.toolbar) {
                self.toolbar.scroll_to(geom, now);
            }
        }
    }

    fn open_settings(&mut self) {
        let mut rows: Vec<(SettingsItem, String, bool)> = self
            .catalog
            .enumerate()
            .iter()
            .map(|target| {
                (
                    SettingsItem::TargetEnabled(target.id.clone()),
                    target.label.clone(),
                    target.enabled,
                )
            })
            .collect();
        rows.push((
            SettingsItem::Option(OPT_REMEMBER_LAST.to_string()),
            "Remember last selection".to_string(),
            self.store.bool_option(OPT_REMEMBER_LAST),
        ));
        self.settings.set_rows(rows);
        self.settings_open = true;
    }

    fn apply_settings_change(&mut self, change: SettingsChange, now: Instant) {
        match change.item {
            SettingsItem::TargetEnabled(id) => {
                self.catalog.set_enabled(&id, change.checked);
            }
            SettingsItem::Option(name) => {
                self.store.set_bool_option(&name, change.checked);
            }
        }
        if self.catalog.take_changed() {
            // the active target may just have been hidden
            let active_gone = self
                .selection
                .active_target_id()
                .is_some_and(|id| !self.catalog.is_enabled(id));
            if active_gone {
                if let Some(first) = self.catalog.first_enabled().map(|t| t.id.clone()) {
                    self.select(&first, now);
                }
            } else {
                let display = self.reorder.display(&self.catalog);
                self.selection.reposition_indicator(&self.toolbar, &display);
            }
        }
    }

    pub fn handle_event(&mut self, event: &Event, now: Instant) -> ControlFlow {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Release {
                return ControlFlow::Continue;
            }
            if self.bindings.matches(Action::Quit, key) {
                return ControlFlow::Quit;
            }
            if self.settings_open {
                if self.bindings.matches(Action::CloseOverlay, key)
                    || self.bindings.matches(Action::OpenSettings, key)
                {
                    self.settings_open = false;
                    return ControlFlow::Continue;
                }
                if self.settings.handle_event(event) {
                    if let Some(change) = self.settings.take_change() {
                        self.apply_settings_change(change, now);
                    }
                    return ControlFlow::Continue;
                }
                return ControlFlow::Continue;
            }
            if self.bindings.matches(Action::NextTarget, key) {
                self.step(StepDirection::Next, now);
            } else if self.bindings.matches(Action::PrevTarget, key) {
                self.step(StepDirection::Prev, now);
            } else if self.bindings.matches(Action::ToggleSplit, key) {
                self.toggle_split();
            } else if self.bindings.matches(Action::OpenSupport, key) {
                self.open_support(now);
            } else if self.bindings.matches(Action::OpenSettings, key) {
                self.open_settings();
            } else if self.bindings.matches(Action::CloseOverlay, key) {
                self.close_overlay(now);
            }
            return ControlFlow::Continue;
        }

        if let Event::Mouse(mouse) = event {
            self.handle_mouse(mouse, now);
        }
        ControlFlow::Continue
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, now: Instant) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.settings_open {
                    return;
                }
                if self
                    .divider
                    .is_some_and(|rect| rect_contains(rect, mouse.column, mouse.row))
                {
                    let primary = self
                        .selection
                        .active_target_id()
                        .and_then(|id| self.registry.frame_for(id));
                    self.split
                        .begin_resize(mouse.column, self.content.width, primary, &mut self.host);
                    return;
                }
                if self.toolbar.hit_test_split(mouse.column, mouse.row) {
                    self.toggle_split();
                    return;
                }
                if self.toolbar.hit_test_overlay(mouse.column, mouse.row) {
                    self.open_support(now);
                    return;
                }
                if let Some(id) = self.toolbar.target_at(mouse.column, mouse.row) {
                    self.drag.press(&id, mouse.column, mouse.row);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.split.is_resizing() {
                    self.split.track_resize(mouse.column);
                } else {
                    self.drag
                        .motion(mouse.column, mouse.row, &self.catalog, &mut self.toolbar);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.split.is_resizing() {
                    self.split.end_resize(&mut self.host);
                    return;
                }
                self.finish_drag(mouse.column, mouse.row, now);
            }
            MouseEventKind::ScrollLeft => {
                if self.toolbar.contains(mouse.column, mouse.row) {
                    self.toolbar.scroll_by(-4, now);
                }
            }
            MouseEventKind::ScrollRight => {
                if self.toolbar.contains(mouse.column, mouse.row) {
                    self.toolbar.scroll_by(4, now);
                }
            }
            _ => {}
        }
    }

    fn finish_drag(&mut self, column: u16, row: u16, now: Instant) {
        // Dropping a dragged button into the empty secondary pane populates
        // it instead of reordering.
        if self.drag.is_dragging()
            && self.split.is_split()
            && self
                .secondary
                .is_some_and(|rect| rect_contains(rect, column, row))
        {
            if let Some(target) = self.drag_source_target() {
                self.drag.abort(&mut self.toolbar);
                self.split.accept_drop(&target, &mut self.host, now);
                return;
            }
        }
        let outcome = self
            .drag
            .release(&mut self.reorder, &mut self.toolbar, self.store.as_mut());
        match outcome {
            DragOutcome::Click(id) => {
                // a direct click supersedes any pending shortcut switch
                self.debouncer.cancel();
                self.select(&id, now);
            }
            DragOutcome::Reordered => {
                self.catalog.apply_order(&self.reorder.order().to_vec());
                self.catalog.take_changed();
                let display = self.reorder.display(&self.catalog);
                self.selection.reposition_indicator(&self.toolbar, &display);
            }
            DragOutcome::Aborted => {}
        }
    }

    fn drag_source_target(&self) -> Option<Target> {
        self.drag
            .source_id()
            .and_then(|id| self.catalog.get(id))
            .cloned()
    }

    /// Per-tick work: control relay, due timers, frame settles.
    pub fn service(&mut self, now: Instant) {
        loop {
            let message = match &self.commands {
                Some(rx) => match rx.try_recv() {
                    Ok(message) => message,
                    Err(_) => break,
                },
                None => break,
            };
            match message {
                ControlMessage::ModelSwitch { direction } => self.step(direction.into(), now),
                ControlMessage::SelectTarget { id } => {
                    if self.catalog.is_enabled(&id) {
                        self.debouncer.cancel();
                        self.select(&id, now);
                    } else {
                        tracing::warn!(id, "control selection for disabled target ignored");
                    }
                }
            }
        }

        if let Some(id) = self.debouncer.service(now) {
            self.select(&id, now);
        }
        self.host.service();
        for id in self.host.take_settled() {
            self.registry.on_frame_settled(&id);
        }
        self.registry.service(&mut self.host, now);
        self.toolbar.service(now);
        self.split.service(now);
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        let (_, content, _) = self.toolbar.split_area(frame.area());
        self.content = content;
        let display = self.reorder.display(&self.catalog);
        let indicator = self.selection.indicator();
        self.toolbar.render(frame, &display, indicator);
        self.toolbar.render_status(frame);

        let (primary, divider, secondary) = self.split.layout(content);
        self.divider = divider;
        self.secondary = secondary;

        if self.selection.is_overlay() {
            self.support.render(frame, content);
        } else if let Some(id) = self.selection.active_target_id() {
            let label = self
                .catalog
                .get(id)
                .map(|target| target.label.clone())
                .unwrap_or_else(|| id.to_string());
            if let Some(frame_id) = self.registry.frame_for(id) {
                self.host
                    .render_frame(frame, frame_id, primary, &label, true);
            }
            if let Some(loading) = self.registry.loading_label() {
                let notice = format!("Loading {loading}…");
                let area = Rect {
                    x: primary.x.saturating_add(2),
                    y: primary.y.saturating_add(1),
                    width: primary.width.saturating_sub(4),
                    height: 1,
                };
                frame.render_widget(
                    Paragraph::new(notice)
                        .style(Style::default().fg(crate::theme::pane_loading_fg())),
                    area,
                );
            }
        }

        if let Some(divider) = divider {
            for y in divider.y..divider.y.saturating_add(divider.height) {
                frame.render_widget(
                    Paragraph::new("│")
                        .style(Style::default().fg(crate::theme::pane_border())),
                    Rect {
                        x: divider.x,
                        y,
                        width: 1,
                        height: 1,
                    },
                );
            }
        }
        if let Some(secondary_area) = secondary {
            match self.split.secondary_frame() {
                Some(frame_id) if !self.split.awaiting_drop() => {
                    let label = self.split.secondary_label().unwrap_or("").to_string();
                    self.host
                        .render_frame(frame, frame_id, secondary_area, &label, false);
                }
                _ => {
                    let hint = Rect {
                        x: secondary_area.x.saturating_add(2),
                        y: secondary_area.y + secondary_area.height / 2,
                        width: secondary_area.width.saturating_sub(4),
                        height: 1,
                    };
                    frame.render_widget(
                        Paragraph::new("Drop a target here")
                            .style(Style::default().fg(crate::theme::pane_loading_fg())),
                        hint,
                    );
                }
            }
        }

        if self.settings_open {
            self.settings.render(frame, content);
        }
    }
}
