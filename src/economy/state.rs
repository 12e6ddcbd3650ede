/// Banana economy state definitions.

use std::collections::BTreeMap;

/// Everything that survives a reload. Transient UI state lives in the shell.
#[derive(Clone, Debug, PartialEq)]
pub struct EconomyState {
    /// Spendable bananas.
    pub currency: f64,
    /// Bananas earned all-time. Spending never lowers it.
    pub lifetime_currency: f64,
    /// Owned units keyed by producer id. Missing ids mean zero.
    pub producer_counts: BTreeMap<String, u32>,
    pub click_upgrade_level: u32,
    /// Growth factor of the compounding producer (starts at 1.0).
    pub compound_multiplier: f64,
    /// Player dismissed the win screen and kept playing.
    pub has_won_acknowledged: bool,
    /// Player-drawn banana art, passed through untouched.
    pub custom_artwork_ref: Option<String>,
}

impl EconomyState {
    pub fn new() -> Self {
        Self {
            currency: 0.0,
            lifetime_currency: 0.0,
            producer_counts: BTreeMap::new(),
            click_upgrade_level: 0,
            compound_multiplier: 1.0,
            has_won_acknowledged: false,
            custom_artwork_ref: None,
        }
    }

    /// Owned units of the given producer.
    pub fn count(&self, producer_id: &str) -> u32 {
        self.producer_counts.get(producer_id).copied().unwrap_or(0)
    }

    /// Total monkeys owned across all producers.
    pub fn total_producer_count(&self) -> u64 {
        self.producer_counts.values().map(|&c| c as u64).sum()
    }

    /// Credit bananas to both the balance and the lifetime total. Both
    /// saturate at `f64::MAX` so the state always stays saveable.
    pub(crate) fn earn(&mut self, amount: f64) {
        self.currency = (self.currency + amount).min(f64::MAX);
        self.lifetime_currency = (self.lifetime_currency + amount).min(f64::MAX);
    }
}

impl Default for EconomyState {
    fn default() -> Self {
        Self::new()
    }
}
