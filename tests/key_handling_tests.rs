//! Keyboard event handling tests
//!
//! Tests for keyboard input handling including quit keys, search mode,
//! navigation, and the export prompt.

use appcensus::inventory::RankedEntry;
use appcensus::ui::app::InputMode;
use appcensus::ui::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::empty()));
}

fn type_str(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

/// Helper to create a test app with a ranked list
fn create_test_app() -> App {
    let entry = |name: &str, count, known| RankedEntry {
        name: name.to_string(),
        count,
        is_known_shortcut: known,
        last_run: None,
    };
    App::new(vec![
        entry("Notepad", 2, true),
        entry("Calc", 2, true),
        entry("Paint", 10, false),
    ])
}

#[test]
fn test_quit_with_q_key() {
    let mut app = create_test_app();
    assert!(!app.should_quit);
    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit);
}

#[test]
fn test_quit_with_esc_key() {
    let mut app = create_test_app();
    press(&mut app, KeyCode::Esc);
    assert!(app.should_quit);
}

#[test]
fn test_ctrl_c_quits_from_any_mode() {
    let mut app = create_test_app();
    press(&mut app, KeyCode::Char('s'));
    assert_eq!(app.mode, InputMode::Export);

    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
}

#[test]
fn test_vim_navigation() {
    let mut app = create_test_app();
    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('j'));
    assert_eq!(app.selected_index, 2);
    press(&mut app, KeyCode::Char('k'));
    assert_eq!(app.selected_index, 1);
    press(&mut app, KeyCode::Char('G'));
    assert_eq!(app.selected_index, 2);
    press(&mut app, KeyCode::Char('g'));
    assert_eq!(app.selected_index, 0);
}

#[test]
fn test_q_in_search_mode_is_text() {
    let mut app = create_test_app();
    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.mode, InputMode::Search);

    press(&mut app, KeyCode::Char('q'));
    assert!(!app.should_quit);
    assert_eq!(app.search_query, "q");
}

#[test]
fn test_search_enter_keeps_filter() {
    let mut app = create_test_app();
    press(&mut app, KeyCode::Char('/'));
    type_str(&mut app, "pai");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.mode, InputMode::Normal);
    assert_eq!(app.search_query, "pai");
    assert_eq!(app.visible_entries().len(), 1);
}

#[test]
fn test_search_esc_clears_filter() {
    let mut app = create_test_app();
    press(&mut app, KeyCode::Char('/'));
    type_str(&mut app, "pai");
    press(&mut app, KeyCode::Esc);

    assert_eq!(app.mode, InputMode::Normal);
    assert!(!app.should_quit);
    assert_eq!(app.visible_entries().len(), 3);
}

#[test]
fn test_f_toggles_known_only() {
    let mut app = create_test_app();
    press(&mut app, KeyCode::Char('f'));
    assert!(app.known_only);
    assert_eq!(app.visible_entries().len(), 2);
    press(&mut app, KeyCode::Char('f'));
    assert!(!app.known_only);
}

#[test]
fn test_export_prompt_editing_and_cancel() {
    let mut app = create_test_app();
    press(&mut app, KeyCode::Char('s'));
    assert_eq!(app.mode, InputMode::Export);

    for _ in 0.."software.txt".len() {
        press(&mut app, KeyCode::Backspace);
    }
    assert!(app.export_path.is_empty());
    type_str(&mut app, "apps.txt");
    assert_eq!(app.export_path, "apps.txt");

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.mode, InputMode::Normal);
    assert!(!app.should_quit);
    assert_eq!(app.status.as_deref(), Some("Export canceled"));
}
