//! Toolbar: the strip of target controls, the support and split controls,
//! the active indicator, and the bottom status bar.
//!
//! The toolbar owns geometry only. Logical order comes from the reorder
//! coordinator, the active mark and indicator geometry are written by the
//! selection controller, and drag visuals are written by the coordinators.
//! Hit rects are rebuilt every frame, mirroring on-screen positions after
//! the horizontal scroll offset is applied.

use std::time::Instant;

use crossterm::event::{Event, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::catalog::Target;
use crate::constants::SCROLL_SETTLE;
use crate::ui::{UiFrame, rect_contains, safe_set_string, truncate_to_width};

const SUPPORT_CHUNK: &str = "[ ? ]";
const SPLIT_CHUNK: &str = "[ ⊟ ]";

/// Which control currently carries the visual active mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveControl {
    Target(String),
    Overlay,
}

/// Indicator geometry in toolbar content coordinates (scroll-independent),
/// so the indicator stays anchored under horizontal scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorGeom {
    pub offset: u16,
    pub width: u16,
}

#[derive(Debug, Clone)]
struct TargetHit {
    id: String,
    rect: Rect,
}

#[derive(Debug)]
pub struct Toolbar {
    area: Rect,
    status_area: Rect,
    hits: Vec<TargetHit>,
    overlay_rect: Option<Rect>,
    split_rect: Option<Rect>,
    active: Option<ActiveControl>,
    overlay_enabled: bool,
    split_enabled: bool,
    scroll: u16,
    scrolling_until: Option<Instant>,
    drag_source: Option<String>,
    drop_highlight: Option<String>,
    drag_proxy: Option<(String, (u16, u16))>,
    hostname: Option<String>,
}

fn chunk_width(label: &str) -> u16 {
    label.chars().count() as u16 + 2
}

/// Content-coordinate layout of the target buttons for `targets`, in order.
/// Pure so the selection controller can reposition the indicator without a
/// render pass.
pub fn button_layout<'a>(targets: &'a [&'a Target]) -> impl Iterator<Item = (&'a str, u16, u16)> {
    let mut x = 0u16;
    targets.iter().map(move |target| {
        let width = chunk_width(&target.label);
        let offset = x;
        x = x.saturating_add(width);
        (target.id.as_str(), offset, width)
    })
}

impl Toolbar {
    pub fn new() -> Self {
        Self {
            area: Rect::default(),
            status_area: Rect::default(),
            hits: Vec::new(),
            overlay_rect: None,
            split_rect: None,
            active: None,
            overlay_enabled: true,
            split_enabled: true,
            scroll: 0,
            scrolling_until: None,
            drag_source: None,
            drop_highlight: None,
            drag_proxy: None,
            hostname: None,
        }
    }

    /// Split `area` into the two-row toolbar, the managed content region, and
    /// the one-row bottom status bar.
    pub fn split_area(&mut self, area: Rect) -> (Rect, Rect, Rect) {
        let top_h = 2u16.min(area.height);
        let bottom_h = 1u16.min(area.height.saturating_sub(top_h));
        let toolbar = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: top_h,
        };
        let status = Rect {
            x: area.x,
            y: area.y.saturating_add(area.height).saturating_sub(bottom_h),
            width: area.width,
            height: bottom_h,
        };
        let content = Rect {
            x: area.x,
            y: area.y.saturating_add(top_h),
            width: area.width,
            height: area.height.saturating_sub(top_h).saturating_sub(bottom_h),
        };
        self.area = toolbar;
        self.status_area = status;
        (toolbar, content, status)
    }

    pub fn begin_frame(&mut self) {
        self.hits.clear();
        self.overlay_rect = None;
        self.split_rect = None;
    }

    pub fn set_active(&mut self, active: Option<ActiveControl>) {
        self.active = active;
    }

    pub fn active(&self) -> Option<&ActiveControl> {
        self.active.as_ref()
    }

    pub fn active_target_id(&self) -> Option<&str> {
        match &self.active {
            Some(ActiveControl::Target(id)) => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn set_overlay_enabled(&mut self, enabled: bool) {
        self.overlay_enabled = enabled;
    }

    pub fn overlay_enabled(&self) -> bool {
        self.overlay_enabled
    }

    pub fn set_split_enabled(&mut self, enabled: bool) {
        self.split_enabled = enabled;
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_by(&mut self, delta: i16, now: Instant) {
        let next = if delta.is_negative() {
            self.scroll.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll.saturating_add(delta as u16)
        };
        self.scroll = next;
        self.scrolling_until = Some(now + SCROLL_SETTLE);
    }

    /// Scroll so the button spanning `[offset, offset+width)` in content
    /// coordinates is centered in the visible strip.
    pub fn scroll_to(&mut self, geom: IndicatorGeom, now: Instant) {
        let view = self.area.width.max(1);
        let center = geom.offset.saturating_add(geom.width / 2);
        self.scroll = center.saturating_sub(view / 2);
        self.scrolling_until = Some(now + SCROLL_SETTLE);
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling_until.is_some()
    }

    /// Expire the scroll-settle deadline.
    pub fn service(&mut self, now: Instant) {
        if let Some(deadline) = self.scrolling_until
            && now >= deadline
        {
            self.scrolling_until = None;
        }
    }

    pub fn set_drag_source(&mut self, id: Option<String>) {
        self.drag_source = id;
    }

    pub fn set_drop_highlight(&mut self, id: Option<String>) {
        self.drop_highlight = id;
    }

    pub fn set_drag_proxy(&mut self, proxy: Option<(String, (u16, u16))>) {
        self.drag_proxy = proxy;
    }

    /// Clear every transient drag visual; called on all drag-end paths,
    /// including aborted drags.
    pub fn clear_drag_visuals(&mut self) {
        self.drag_source = None;
        self.drop_highlight = None;
        self.drag_proxy = None;
    }

    /// Indicator geometry for a control, in content coordinates.
    pub fn indicator_for(
        &self,
        active: &ActiveControl,
        targets: &[&Target],
    ) -> Option<IndicatorGeom> {
        match active {
            ActiveControl::Target(id) => button_layout(targets)
                .find(|(candidate, _, _)| candidate == id)
                .map(|(_, offset, width)| IndicatorGeom { offset, width }),
            ActiveControl::Overlay => {
                // Right-aligned control; anchor relative to the scrolled strip
                // so the indicator lands under it on screen.
                let rect = self.overlay_rect?;
                Some(IndicatorGeom {
                    offset: rect
                        .x
                        .saturating_sub(self.area.x)
                        .saturating_add(self.scroll),
                    width: rect.width,
                })
            }
        }
    }

    pub fn hit_test_target(&self, event: &Event) -> Option<String> {
        let mouse = match event {
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => mouse,
            _ => return None,
        };
        self.target_at(mouse.column, mouse.row)
    }

    pub fn target_at(&self, column: u16, row: u16) -> Option<String> {
        self.hits
            .iter()
            .find(|hit| rect_contains(hit.rect, column, row))
            .map(|hit| hit.id.clone())
    }

    pub fn hit_test_overlay(&self, column: u16, row: u16) -> bool {
        self.overlay_enabled
            && self
                .overlay_rect
                .is_some_and(|rect| rect_contains(rect, column, row))
    }

    pub fn hit_test_split(&self, column: u16, row: u16) -> bool {
        self.split_enabled
            && self
                .split_rect
                .is_some_and(|rect| rect_contains(rect, column, row))
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        rect_contains(self.area, column, row)
    }

    pub fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        targets: &[&Target],
        indicator: Option<IndicatorGeom>,
    ) {
        let area = self.area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.begin_frame();
        frame.fill_style(
            area,
            Style::default()
                .bg(crate::theme::toolbar_bg())
                .fg(crate::theme::toolbar_fg()),
        );

        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let y = area.y;
        let max_x = area.x.saturating_add(area.width);

        // Right-aligned support/split controls claim their columns first.
        let support_width = SUPPORT_CHUNK.chars().count() as u16;
        let split_width = SPLIT_CHUNK.chars().count() as u16;
        let controls_width = support_width.saturating_add(split_width);
        let strip_end = max_x.saturating_sub(controls_width);

        for (id, offset, width) in button_layout(targets) {
            let screen_x = (area.x as i32 + offset as i32) - self.scroll as i32;
            if screen_x + width as i32 <= area.x as i32 || screen_x >= strip_end as i32 {
                continue;
            }
            let x = screen_x.max(area.x as i32) as u16;
            let target = targets
                .iter()
                .find(|target| target.id == id)
                .copied();
            let Some(target) = target else { continue };
            let is_active = self.active_target_id() == Some(id);
            let is_source = self.drag_source.as_deref() == Some(id);
            let is_drop = self.drop_highlight.as_deref() == Some(id);
            let style = if is_drop {
                Style::default()
                    .bg(crate::theme::drop_highlight_bg())
                    .fg(crate::theme::toolbar_fg())
            } else if is_source {
                Style::default()
                    .fg(crate::theme::drag_source_fg())
                    .add_modifier(Modifier::DIM)
            } else if is_active {
                Style::default()
                    .bg(crate::theme::toolbar_active_bg())
                    .fg(crate::theme::toolbar_active_fg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(crate::theme::toolbar_inactive_fg())
            };
            let chunk = format!(" {} ", target.label);
            let visible_width = width.min(strip_end.saturating_sub(x));
            safe_set_string(
                buffer,
                Rect {
                    x: area.x,
                    y: area.y,
                    width: strip_end.saturating_sub(area.x),
                    height: 1,
                },
                x,
                y,
                &chunk,
                style,
            );
            self.hits.push(TargetHit {
                id: id.to_string(),
                rect: Rect {
                    x,
                    y,
                    width: visible_width,
                    height: 1,
                },
            });
        }

        // Support then split, right-aligned.
        let mut cursor = strip_end;
        let support_style = if self.active == Some(ActiveControl::Overlay) {
            Style::default()
                .bg(crate::theme::toolbar_active_bg())
                .fg(crate::theme::toolbar_active_fg())
        } else if self.overlay_enabled {
            Style::default().fg(crate::theme::toolbar_fg())
        } else {
            Style::default()
                .fg(crate::theme::toolbar_inactive_fg())
                .add_modifier(Modifier::DIM)
        };
        safe_set_string(buffer, bounds, cursor, y, SUPPORT_CHUNK, support_style);
        self.overlay_rect = Some(Rect {
            x: cursor,
            y,
            width: support_width,
            height: 1,
        });
        cursor = cursor.saturating_add(support_width);
        let split_style = if self.split_enabled {
            Style::default().fg(crate::theme::toolbar_fg())
        } else {
            Style::default()
                .fg(crate::theme::toolbar_inactive_fg())
                .add_modifier(Modifier::DIM)
        };
        safe_set_string(buffer, bounds, cursor, y, SPLIT_CHUNK, split_style);
        self.split_rect = Some(Rect {
            x: cursor,
            y,
            width: split_width,
            height: 1,
        });

        // Indicator row anchors under the active control, tracking scroll.
        if area.height >= 2
            && let Some(geom) = indicator
        {
            let screen_x = (area.x as i32 + geom.offset as i32) - self.scroll as i32;
            let row = Rect {
                x: area.x,
                y: y.saturating_add(1),
                width: area.width,
                height: 1,
            };
            let line: String = "▔".repeat(geom.width as usize);
            if screen_x + geom.width as i32 > area.x as i32 {
                let x = screen_x.max(area.x as i32) as u16;
                safe_set_string(
                    buffer,
                    row,
                    x,
                    row.y,
                    &line,
                    Style::default().fg(crate::theme::indicator_fg()),
                );
            }
        }

        // Drag proxy follows the pointer above everything else.
        if let Some((label, (column, row))) = self.drag_proxy.clone() {
            let proxy = format!(" {label} ");
            safe_set_string(
                buffer,
                buffer.area,
                column,
                row,
                &proxy,
                Style::default()
                    .bg(crate::theme::drop_highlight_bg())
                    .fg(crate::theme::toolbar_fg())
                    .add_modifier(Modifier::BOLD),
            );
        }
    }

    pub fn render_status(&mut self, frame: &mut UiFrame<'_>) {
        let area = self.status_area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        frame.fill_style(
            area,
            Style::default()
                .bg(crate::theme::status_bg())
                .fg(crate::theme::status_fg()),
        );
        const PKG_NAME: &str = env!("CARGO_PKG_NAME");
        const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
        let hostname = self.hostname.get_or_insert_with(|| {
            hostname::get()
                .ok()
                .and_then(|raw| raw.into_string().ok())
                .unwrap_or_else(|| "unknown-host".to_string())
        });
        let info = format!(
            "{PKG_NAME} {PKG_VERSION} · {} · {hostname}",
            std::env::consts::OS
        );
        let text = truncate_to_width(&info, area.width as usize);
        let text_width = text.chars().count() as u16;
        let x = area
            .x
            .saturating_add(area.width)
            .saturating_sub(text_width)
            .max(area.x);
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        safe_set_string(
            buffer,
            bounds,
            x,
            area.y,
            &text,
            Style::default()
                .bg(crate::theme::status_bg())
                .fg(crate::theme::status_fg()),
        );
    }
}

impl Default for Toolbar {
    fn default() -> Self {
        Self::new()
    }
}
