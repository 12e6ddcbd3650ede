mod click;
mod render;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use banana_tycoon::storage::KeyValueStore;
use banana_tycoon::{Catalog, Session, SessionConfig, SessionEvent};
use click::{handle_key, pixel_y_to_row, ClickState};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

/// Query the grid container's bounding rect and convert pixel coordinates to a row.
fn dom_pixel_to_row(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<u16> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_y = mouse_y as f64 - rect.top();
    let click_x = mouse_x as f64 - rect.left();
    if click_x < 0.0 {
        return None;
    }

    pixel_y_to_row(click_y, rect.height(), cs.terminal_rows)
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
fn save_store() -> Box<dyn KeyValueStore> {
    Box::new(banana_tycoon::storage::LocalStorage)
}

#[cfg(not(target_arch = "wasm32"))]
fn save_store() -> Box<dyn KeyValueStore> {
    Box::new(banana_tycoon::storage::MemoryStore::new())
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let mut session = Session::open(Catalog::standard(), save_store(), SessionConfig::default());
    if let Some(warning) = session.load_outcome().warning() {
        web_sys::console::warn_1(&format!("Banana Tycoon: {warning}").into());
    }
    session.subscribe(|event| {
        if let SessionEvent::WinReached = event {
            web_sys::console::log_1(&"Banana Tycoon: 100,000,000 bananas!".into());
        }
    });

    let session = Rc::new(RefCell::new(session));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let session = session.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }
            let matched_key = dom_pixel_to_row(mouse_event.x, mouse_event.y, &cs)
                .and_then(|row| cs.find_target_key(row));
            drop(cs);

            if let Some(key) = matched_key {
                handle_key(&mut session.borrow_mut(), key);
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let session = session.clone();
        move |key_event| {
            if let KeyCode::Char(c) = key_event.code {
                handle_key(&mut session.borrow_mut(), c);
            }
        }
    });

    terminal.draw_web(move |f| {
        let snap = {
            let mut s = session.borrow_mut();
            s.advance(now_ms());
            s.snapshot()
        };
        let size = f.area();

        let mut cs = click_state.borrow_mut();
        cs.terminal_cols = size.width;
        cs.terminal_rows = size.height;
        cs.clear_targets();

        render::render(&snap, f, size, &mut cs);
    });

    Ok(())
}
