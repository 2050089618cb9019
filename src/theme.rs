use ratatui::style::Color;

// Centralized theme colors. Kept as small helpers so the palette can be
// swapped without touching render code.

pub fn accent() -> Color {
    // Matches the drop-target accent of the hosted-panel look.
    Color::Rgb(0, 255, 157)
}

// Toolbar
pub fn toolbar_bg() -> Color {
    Color::DarkGray
}
pub fn toolbar_fg() -> Color {
    Color::White
}
pub fn toolbar_inactive_fg() -> Color {
    Color::Gray
}
pub fn toolbar_active_bg() -> Color {
    Color::Gray
}
pub fn toolbar_active_fg() -> Color {
    Color::Black
}
pub fn indicator_fg() -> Color {
    accent()
}

// Drag feedback
pub fn drag_source_fg() -> Color {
    Color::DarkGray
}
pub fn drop_highlight_bg() -> Color {
    Color::Blue
}

// Panes
pub fn pane_border() -> Color {
    Color::DarkGray
}
pub fn pane_border_focused() -> Color {
    accent()
}
pub fn pane_loading_fg() -> Color {
    Color::Yellow
}

// Overlay / settings
pub fn overlay_border() -> Color {
    accent()
}
pub fn overlay_bg() -> Color {
    Color::Black
}
pub fn overlay_fg() -> Color {
    Color::White
}

// Bottom status bar
pub fn status_bg() -> Color {
    Color::DarkGray
}
pub fn status_fg() -> Color {
    Color::Black
}
