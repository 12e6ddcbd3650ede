/// Click/tap handling and intent dispatch for the banana shell.
///
/// This module separates the pure logic (coordinate conversion, target matching,
/// key-to-intent mapping) from web_sys DOM access so it can be unit tested.

use banana_tycoon::Session;

/// A row on screen that can be tapped/clicked to trigger a key.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    pub row: u16,
    pub key: char,
}

/// Shared state between the render loop and click handler.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn add_target(&mut self, row: u16, key: char) {
        self.targets.push(ClickTarget { row, key });
    }

    /// Find the action key for a given terminal row. Later registrations
    /// (overlays) win over earlier ones.
    pub fn find_target_key(&self, row: u16) -> Option<char> {
        self.targets.iter().rev().find(|t| t.row == row).map(|t| t.key)
    }
}

/// Convert a pixel Y coordinate to a terminal row index.
///
/// `click_y` is relative to the grid container's top edge.
/// Returns `None` if the click is outside the grid or inputs are invalid.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    if grid_height <= 0.0 || terminal_rows == 0 || click_y < 0.0 {
        return None;
    }
    let row = (click_y / (grid_height / terminal_rows as f64)) as u16;
    (row < terminal_rows).then_some(row)
}

/// Determine whether a screen width (in columns) should use narrow layout.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// What the player asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Harvest,
    /// Catalog index of the producer to buy.
    BuyProducer(usize),
    BuyClickUpgrade,
    KeepPlaying,
    StartOver,
}

/// Map a key to an intent. While the win screen is up only its two
/// choices are accepted.
pub fn key_to_intent(key: char, win_pending: bool) -> Option<Intent> {
    if win_pending {
        return match key.to_ascii_lowercase() {
            'c' => Some(Intent::KeepPlaying),
            'r' => Some(Intent::StartOver),
            _ => None,
        };
    }
    match key.to_ascii_lowercase() {
        'h' | ' ' => Some(Intent::Harvest),
        'u' => Some(Intent::BuyClickUpgrade),
        d @ '1'..='9' => Some(Intent::BuyProducer(d as usize - '1' as usize)),
        _ => None,
    }
}

/// Key shown next to the producer at catalog index `idx`.
pub fn producer_key(idx: usize) -> Option<char> {
    char::from_digit(idx as u32 + 1, 10).filter(|c| *c != '0')
}

/// Forward an intent to the session. Returns whether it was applied.
pub fn dispatch(session: &mut Session, intent: Intent) -> bool {
    match intent {
        Intent::Harvest => session.harvest(),
        Intent::BuyProducer(idx) => {
            let id = match session.catalog().producers().get(idx) {
                Some(p) => p.id,
                None => return false,
            };
            session.buy_producer(id)
        }
        Intent::BuyClickUpgrade => session.buy_click_upgrade(),
        Intent::KeepPlaying => session.acknowledge_win_and_continue(),
        Intent::StartOver => session.reset(),
    }
}

/// Handle a key press end to end.
pub fn handle_key(session: &mut Session, key: char) -> bool {
    let win_pending = session.snapshot().win_pending;
    match key_to_intent(key, win_pending) {
        Some(intent) => dispatch(session, intent),
        None => false,
    }
}
