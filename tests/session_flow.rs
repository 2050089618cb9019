//! End-to-end flows through the public `App` surface: frame reuse across
//! switches, debounced shortcut bursts, reordering, and persistence across
//! restarts.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use term_deck::app::App;
use term_deck::catalog::{Catalog, Target};
use term_deck::constants::{FRAME_EXIT_ANIMATION, SHORTCUT_COMMIT_DELAY};
use term_deck::store::{JsonStore, MemoryStore, OPT_REMEMBER_LAST, SettingsStore};
use term_deck::ui::UiFrame;

fn targets() -> Vec<Target> {
    [
        ("alpha", "Alpha"),
        ("beta", "Beta"),
        ("gamma", "Gamma"),
    ]
    .iter()
    .map(|(id, label)| Target {
        id: (*id).to_string(),
        url: format!("https://{id}.example/"),
        label: (*label).to_string(),
        enabled: true,
    })
    .collect()
}

fn app_with_store(store: Box<dyn SettingsStore>) -> App {
    App::new(Catalog::new(targets()), store, None)
}

fn render(app: &mut App) {
    let area = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 24,
    };
    let mut buf = Buffer::empty(area);
    let mut ui = UiFrame::from_parts(area, &mut buf);
    app.render(&mut ui);
}

fn alt(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT))
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

#[test]
fn switching_back_and_forth_never_reloads() {
    let mut app = app_with_store(Box::new(MemoryStore::new()));
    let mut t = Instant::now();
    app.startup(t);
    app.service(t);

    for _ in 0..3 {
        app.handle_event(&alt(']'), t);
        t += SHORTCUT_COMMIT_DELAY;
        app.service(t);
        app.handle_event(&alt('['), t);
        t += SHORTCUT_COMMIT_DELAY;
        app.service(t);
    }
    // alpha and beta each created exactly once despite six switches
    assert_eq!(app.active_target_id(), Some("alpha"));
    assert_eq!(app.registry().frame_count(), 2);
}

#[test]
fn shortcut_burst_wraps_and_commits_final_candidate() {
    let mut app = app_with_store(Box::new(MemoryStore::new()));
    let t = Instant::now();
    app.startup(t);
    app.service(t);

    // four Next steps from alpha wrap past gamma back to beta
    for _ in 0..4 {
        app.handle_event(&alt(']'), t);
    }
    assert_eq!(app.pending_shortcut(), Some("beta"));
    assert_eq!(app.active_target_id(), Some("alpha"));

    app.service(t + SHORTCUT_COMMIT_DELAY);
    assert_eq!(app.active_target_id(), Some("beta"));
    // startup frame plus the single committed frame
    assert_eq!(app.registry().frame_count(), 2);
}

#[test]
fn retired_frame_hides_only_after_exit_animation() {
    let mut app = app_with_store(Box::new(MemoryStore::new()));
    let t = Instant::now();
    app.startup(t);
    app.service(t);
    app.handle_event(&alt(']'), t);
    app.service(t + SHORTCUT_COMMIT_DELAY);

    let alpha = app.registry().frame_for("alpha").unwrap();
    assert!(app.host().is_visible(alpha));
    app.service(t + SHORTCUT_COMMIT_DELAY + FRAME_EXIT_ANIMATION);
    assert!(!app.host().is_visible(alpha));

    // coming back shows the same frame again, no reload
    app.handle_event(&alt('['), t + SHORTCUT_COMMIT_DELAY + FRAME_EXIT_ANIMATION);
    let t2 = t + SHORTCUT_COMMIT_DELAY * 2 + FRAME_EXIT_ANIMATION;
    app.service(t2);
    assert_eq!(app.active_target_id(), Some("alpha"));
    assert!(app.host().is_visible(alpha));
    assert_eq!(app.registry().frame_count(), 2);
}

#[test]
fn drag_reorder_persists_and_projects() {
    let mut app = app_with_store(Box::new(MemoryStore::new()));
    let t = Instant::now();
    app.startup(t);
    render(&mut app);

    // layout: " Alpha "(0..7) " Beta "(7..13) " Gamma "(13..20)
    // drag Gamma onto Alpha: source right of target, lands before it
    app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 15, 0), t);
    app.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 8, 0), t);
    app.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 2, 0), t);
    app.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 2, 0), t);

    assert_eq!(app.order(), ["gamma", "alpha", "beta"]);
}

#[test]
fn click_commits_synchronously_and_preempts_shortcut() {
    let mut app = app_with_store(Box::new(MemoryStore::new()));
    let t = Instant::now();
    app.startup(t);
    render(&mut app);

    app.handle_event(&alt(']'), t);
    assert_eq!(app.pending_shortcut(), Some("beta"));

    // click Gamma (13..20 on row 0)
    app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 14, 0), t);
    app.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 14, 0), t);
    assert_eq!(app.active_target_id(), Some("gamma"));
    assert!(app.pending_shortcut().is_none());

    // the abandoned deadline never fires
    app.service(t + SHORTCUT_COMMIT_DELAY);
    assert_eq!(app.active_target_id(), Some("gamma"));
}

#[test]
fn order_and_remember_last_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    {
        let mut store = JsonStore::open(&path);
        store.set_bool_option(OPT_REMEMBER_LAST, true);
        let mut app = app_with_store(Box::new(store));
        let t = Instant::now();
        app.startup(t);
        render(&mut app);

        // reorder, then select beta
        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 15, 0), t);
        app.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 8, 0), t);
        app.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 2, 0), t);
        app.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 2, 0), t);
        app.handle_event(&alt(']'), t);
        app.service(t + SHORTCUT_COMMIT_DELAY);
        assert_eq!(app.active_target_id(), Some("beta"));
    }

    let mut restarted = app_with_store(Box::new(JsonStore::open(&path)));
    restarted.startup(Instant::now());
    assert_eq!(restarted.order(), ["gamma", "alpha", "beta"]);
    assert_eq!(restarted.active_target_id(), Some("beta"));
}

#[test]
fn split_and_overlay_exclude_each_other() {
    let mut app = app_with_store(Box::new(MemoryStore::new()));
    let t = Instant::now();
    app.startup(t);

    let ctrl_s = Event::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
    let f1 = Event::Key(KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE));

    app.handle_event(&ctrl_s, t);
    assert!(app.split().is_split());
    app.handle_event(&f1, t);
    assert!(!app.selection().is_overlay());

    // close the split; now the overlay opens and blocks the split instead
    app.handle_event(&ctrl_s, t);
    app.handle_event(&f1, t);
    assert!(app.selection().is_overlay());
    app.handle_event(&ctrl_s, t);
    assert!(!app.split().is_split());
}
