//! Shared crate-wide constants.

use std::time::Duration;

/// Delay between a shortcut-driven `step` and the committed frame activation.
///
/// Rapid repeated presses within this window collapse into a single commit
/// for the final pending target; only the visual active mark moves per press.
pub const SHORTCUT_COMMIT_DELAY: Duration = Duration::from_millis(450);

/// Duration of the exit animation a deactivated frame plays before its
/// visibility flag is cleared. Timers armed with this delay are never
/// cancelled; the final hidden state is idempotent.
pub const FRAME_EXIT_ANIMATION: Duration = Duration::from_millis(200);

/// Quiet period after the last toolbar scroll event before the toolbar is
/// considered settled again.
pub const SCROLL_SETTLE: Duration = Duration::from_millis(150);

/// Fade-and-collapse duration for the split-view drop placeholder after a
/// successful drop.
pub const DROP_FADE: Duration = Duration::from_millis(300);

/// Lower bound for the primary pane's width share in split view, percent.
pub const MIN_PRIMARY_SHARE: f32 = 20.0;

/// Upper bound for the primary pane's width share in split view, percent.
pub const MAX_PRIMARY_SHARE: f32 = 80.0;

/// Horizontal pointer travel (in cells) before a press on a toolbar control
/// becomes a drag gesture rather than a click.
pub const DRAG_THRESHOLD: u16 = 1;
