use crossterm::event::Event;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem};

use crate::components::{Component, centered_rect};
use crate::keybindings::{Action, KeyBindings};
use crate::ui::UiFrame;

/// What a toggle row controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsItem {
    /// Show or hide a target in the toolbar.
    TargetEnabled(String),
    /// A boolean option persisted in the settings store.
    Option(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChange {
    pub item: SettingsItem,
    pub checked: bool,
}

#[derive(Debug, Clone)]
struct Row {
    item: SettingsItem,
    label: String,
    checked: bool,
}

/// Checkbox-list settings overlay. Toggles are reported to the caller via
/// [`SettingsOverlay::take_change`]; the overlay itself holds no authority
/// over the catalog or the store.
#[derive(Debug, Default)]
pub struct SettingsOverlay {
    rows: Vec<Row>,
    selected: usize,
    change: Option<SettingsChange>,
}

impl SettingsOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_rows(&mut self, rows: Vec<(SettingsItem, String, bool)>) {
        self.rows = rows
            .into_iter()
            .map(|(item, label, checked)| Row {
                item,
                label,
                checked,
            })
            .collect();
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
        self.change = None;
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The toggle flipped by the last handled event, if any.
    pub fn take_change(&mut self) -> Option<SettingsChange> {
        self.change.take()
    }

    fn bump_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.selected = 0;
            return;
        }
        if delta.is_negative() {
            self.selected = self.selected.saturating_sub(delta.unsigned_abs());
        } else {
            self.selected = (self.selected + delta as usize).min(self.rows.len() - 1);
        }
    }

    fn toggle_selected(&mut self) -> bool {
        if let Some(row) = self.rows.get_mut(self.selected) {
            row.checked = !row.checked;
            self.change = Some(SettingsChange {
                item: row.item.clone(),
                checked: row.checked,
            });
            return true;
        }
        false
    }
}

impl Component for SettingsOverlay {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        let height = (self.rows.len() as u16).saturating_add(2).max(3);
        let popup = centered_rect(area, 44, height);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Settings ")
            .border_style(Style::default().fg(crate::theme::overlay_border()))
            .style(Style::default().bg(crate::theme::overlay_bg()));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        let items: Vec<ListItem> = self
            .rows
            .iter()
            .enumerate()
            .take(inner.height as usize)
            .map(|(i, row)| {
                let marker = if row.checked { "[x]" } else { "[ ]" };
                let mut li = ListItem::new(format!("{marker} {}", row.label));
                if i == self.selected {
                    li = li.style(Style::default().add_modifier(Modifier::REVERSED));
                }
                li
            })
            .collect();
        frame.render_widget(
            List::new(items).style(Style::default().fg(crate::theme::overlay_fg())),
            inner,
        );
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        let kb = KeyBindings::default();
        if kb.matches(Action::MenuUp, key) {
            self.bump_selection(-1);
            true
        } else if kb.matches(Action::MenuDown, key) {
            self.bump_selection(1);
            true
        } else if kb.matches(Action::ToggleSelection, key) {
            self.toggle_selected()
        } else {
            false
        }
    }
}
