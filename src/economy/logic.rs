//! Banana economy logic — pure functions over [`EconomyState`].
//!
//! Transitions take `&mut EconomyState` and report whether they applied.
//! A rejected transition leaves the state exactly as it was.

use super::catalog::{
    Catalog, ProducerDefinition, BASE_CLICK_VALUE, CLICK_GROWTH, CLICK_UPGRADE_BASE_COST,
    CLICK_UPGRADE_COST_MULTIPLIER, COMPOUND_GROWTH_PER_SECOND, COST_MULTIPLIER, WIN_THRESHOLD,
};
use super::state::EconomyState;

/// ULPs within which a price counts as already whole, so that `100 × 1.15`
/// (114.99999999999999 in binary) prices at 115.
const PRICE_SNAP_ULPS: f64 = 4.0;

fn floor_price(raw: f64) -> f64 {
    let whole = raw.round();
    if (whole - raw).abs() <= whole.abs() * PRICE_SNAP_ULPS * f64::EPSILON {
        whole
    } else {
        raw.floor()
    }
}

/// Per-unit rate of a producer right now.
pub fn unit_rate(state: &EconomyState, producer: &ProducerDefinition) -> f64 {
    if producer.compounding {
        producer.base_rate * state.compound_multiplier
    } else {
        producer.base_rate
    }
}

/// Bananas per second contributed by every owned unit of one producer.
pub fn producer_rate(state: &EconomyState, producer: &ProducerDefinition) -> f64 {
    state.count(producer.id) as f64 * unit_rate(state, producer)
}

/// Total bananas per second. Ids outside the catalog contribute nothing.
pub fn production_rate(state: &EconomyState, catalog: &Catalog) -> f64 {
    catalog
        .producers()
        .iter()
        .map(|p| producer_rate(state, p))
        .sum()
}

/// Bananas gained per harvest at the given upgrade level. Always a whole number ≥ 1.
pub fn click_value(level: u32) -> f64 {
    floor_price(BASE_CLICK_VALUE * CLICK_GROWTH.powf(level as f64)).max(1.0)
}

/// Price of the next unit when `owned` are already held.
pub fn purchase_cost(producer: &ProducerDefinition, owned: u32) -> f64 {
    floor_price(producer.base_cost * COST_MULTIPLIER.powf(owned as f64))
}

/// Price of the click upgrade that takes the level from `level` to `level + 1`.
pub fn upgrade_cost(level: u32) -> f64 {
    floor_price(CLICK_UPGRADE_BASE_COST * CLICK_UPGRADE_COST_MULTIPLIER.powf(level as f64))
}

/// Price of the next unit of `producer` given what the state already owns.
pub fn next_producer_cost(state: &EconomyState, producer: &ProducerDefinition) -> f64 {
    purchase_cost(producer, state.count(producer.id))
}

/// Advance the economy by `delta_ms` of wall-clock time. Returns the income applied.
///
/// The compound multiplier grows first and the new value is used for the
/// compounding producer's income in the same pass, so displayed rate and
/// actual income never disagree by a tick.
pub fn tick(state: &mut EconomyState, catalog: &Catalog, delta_ms: u32) -> f64 {
    if delta_ms == 0 {
        return 0.0;
    }
    let seconds = delta_ms as f64 / 1000.0;

    if state.count(catalog.compounding().id) > 0 {
        // Saturates at f64::MAX; an infinite multiplier could not be saved.
        state.compound_multiplier =
            (state.compound_multiplier * COMPOUND_GROWTH_PER_SECOND.powf(seconds)).min(f64::MAX);
    }

    let income = production_rate(state, catalog) * seconds;
    state.earn(income);
    income
}

/// Manual harvest. Returns the bananas gained.
pub fn harvest(state: &mut EconomyState) -> f64 {
    let value = click_value(state.click_upgrade_level);
    state.earn(value);
    value
}

/// Try to buy one unit of a producer. Returns true if successful.
pub fn buy_producer(state: &mut EconomyState, catalog: &Catalog, producer_id: &str) -> bool {
    let producer = match catalog.get(producer_id) {
        Some(p) => p,
        None => return false,
    };

    let cost = next_producer_cost(state, producer);
    if state.currency < cost {
        return false;
    }

    state.currency -= cost;
    *state
        .producer_counts
        .entry(producer.id.to_string())
        .or_insert(0) += 1;
    true
}

/// Try to buy the next click upgrade. Returns true if successful.
pub fn buy_click_upgrade(state: &mut EconomyState) -> bool {
    let cost = upgrade_cost(state.click_upgrade_level);
    if state.currency < cost {
        return false;
    }
    state.currency -= cost;
    state.click_upgrade_level += 1;
    true
}

pub fn set_custom_artwork(state: &mut EconomyState, artwork: Option<String>) {
    state.custom_artwork_ref = artwork;
}

pub fn acknowledge_win_and_continue(state: &mut EconomyState) {
    state.has_won_acknowledged = true;
}

/// Start over. Only the player's artwork survives.
pub fn reset(state: &mut EconomyState) {
    let artwork = state.custom_artwork_ref.take();
    *state = EconomyState {
        custom_artwork_ref: artwork,
        ..EconomyState::new()
    };
}

/// Whether the win screen should be offered for this state.
pub fn is_win_pending(state: &EconomyState) -> bool {
    state.currency >= WIN_THRESHOLD && !state.has_won_acknowledged
}

/// Format a banana amount with thousands separators, switching to short
/// suffixes once the integer part no longer fits comfortably on screen.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "∞".to_string();
    }
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    const SUFFIXES: &[(f64, &str)] = &[(1e18, "Qi"), (1e15, "Qa"), (1e12, "T")];
    for &(scale, suffix) in SUFFIXES {
        if n >= scale {
            return format!("{:.2}{}", n / scale, suffix);
        }
    }

    let digits = (n.floor() as u64).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let tenths = ((n - n.floor()) * 10.0).floor() as u8;
    if n < 1_000.0 && tenths > 0 {
        format!("{}.{}", grouped, tenths)
    } else {
        grouped
    }
}
