use crate::tui::app::{App, Focus, View};
use crossterm::event::{KeyCode, KeyEvent};
use flight_lens_core::export::export_json;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Tab => {
            app.cycle_focus();
            return;
        }
        KeyCode::Char('?') => {
            if app.view == View::Help {
                app.view = app.last_panel;
                app.help_scroll = 0;
            } else {
                app.view = View::Help;
            }
            return;
        }
        KeyCode::Char('j') if app.view == View::Help => {
            app.help_scroll += 1;
            return;
        }
        KeyCode::Char('k') if app.view == View::Help => {
            if app.help_scroll > 0 {
                app.help_scroll -= 1;
            }
            return;
        }
        KeyCode::Esc if app.view == View::Help => {
            app.view = app.last_panel;
            app.help_scroll = 0;
            return;
        }
        KeyCode::Char(c @ '1'..='8') => {
            let i = c as usize - '1' as usize;
            app.show(View::PANELS[i]);
            return;
        }
        KeyCode::Char('n') => {
            app.next_panel(true);
            return;
        }
        KeyCode::Char('p') => {
            app.next_panel(false);
            return;
        }
        KeyCode::Char('`') => {
            app.sidebar_visible = !app.sidebar_visible;
            return;
        }
        KeyCode::Char('r') => {
            app.reload();
            return;
        }
        KeyCode::Char('E') => {
            export_snapshot(app);
            return;
        }
        _ => {}
    }
    match app.focus {
        Focus::Sidebar => handle_sidebar(app, key),
        Focus::Main => handle_main(app, key),
    }
}

fn handle_sidebar(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('[') => {
            app.sidebar_width = app.sidebar_width.saturating_sub(1).max(20);
        }
        KeyCode::Char(']') => {
            app.sidebar_width = (app.sidebar_width + 1).min(60);
        }
        KeyCode::Char('j') | KeyCode::Down => app.sidebar_down(),
        KeyCode::Char('k') | KeyCode::Up => app.sidebar_up(),
        KeyCode::Char(' ') | KeyCode::Enter => app.activate(),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('+') => app.adjust(1),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('-') => app.adjust(-1),
        KeyCode::Char('a') => app.select_all(true),
        KeyCode::Char('x') => app.select_all(false),
        KeyCode::Esc => app.show(View::Flights),
        _ => {}
    }
}

fn handle_main(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.main_scroll += 1,
        KeyCode::Char('k') | KeyCode::Up => app.main_scroll = app.main_scroll.saturating_sub(1),
        KeyCode::PageDown => app.main_scroll += 10,
        KeyCode::PageUp => app.main_scroll = app.main_scroll.saturating_sub(10),
        KeyCode::Esc => app.focus = Focus::Sidebar,
        _ => {}
    }
}

// JSON export of the current snapshot to config.export.output_dir
fn export_snapshot(app: &mut App) {
    let Some(snapshot) = &app.snapshot else {
        app.status_msg = "nothing to export".into();
        return;
    };
    let out_dir = std::path::Path::new(&app.config.export.output_dir);
    if let Err(e) = std::fs::create_dir_all(out_dir) {
        app.status_msg = format!("export dir error: {e}");
        return;
    }
    let out_path = out_dir.join("flight-lens-snapshot.json");
    app.status_msg = match export_json(&out_path, snapshot) {
        Ok(()) => format!("exported to {}", out_path.display()),
        Err(e) => format!("export error: {e}"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::tests::loaded_app;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, c: KeyCode) {
        handle_key(app, KeyEvent::new(c, KeyModifiers::NONE));
    }

    #[test]
    fn q_quits() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn digits_switch_panels() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.view, View::Histogram);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.view, View::Boxplot);
    }

    #[test]
    fn help_returns_to_panel() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.view, View::Help);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Correlation);
    }

    #[test]
    fn plus_raises_bins() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.controls.as_ref().unwrap().bins, 11);
    }

    #[test]
    fn tab_moves_focus() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Main);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.main_scroll, 1);
    }

    #[test]
    fn export_writes_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = loaded_app();
        app.config.export.output_dir = dir.path().display().to_string();
        press(&mut app, KeyCode::Char('E'));
        assert!(dir.path().join("flight-lens-snapshot.json").exists(), "{}", app.status_msg);
    }
}
