//! Banana economy save/load.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION` is written into every save. Bump it when a field is added
//!   or its meaning changes.
//! - Loading never rejects a save for its version. Every field is read on its
//!   own and falls back to the fresh-game default when absent or malformed,
//!   so older saves (including the browser game's pre-rename field names)
//!   keep whatever they can.
//! - Only input that is not a JSON object at all is discarded.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::catalog::Catalog;
use super::state::EconomyState;
use crate::storage::{KeyValueStore, StoreError};

/// Save format version.
pub const SAVE_VERSION: u32 = 1;

/// Field names as written to disk, paired with the names used by saves from
/// before the rename.
const CURRENCY: (&str, &str) = ("currency", "bananas");
const LIFETIME: (&str, &str) = ("lifetimeCurrency", "totalLifetimeBananas");
const PRODUCERS: (&str, &str) = ("producerCounts", "monkeyCounts");
const CLICK_LEVEL: (&str, &str) = ("clickUpgradeLevel", "clickUpgradeLevel");
const MULTIPLIER: (&str, &str) = ("compoundMultiplier", "aiBpsMultiplier");
const WON: (&str, &str) = ("hasWonAcknowledged", "hasWon");
const ARTWORK: (&str, &str) = ("customArtworkRef", "customBanana");

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("save data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("save data is not a JSON object")]
    NotAnObject,
    #[error("could not read save data: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("could not serialize save data: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },
    #[error("could not write save data: {0}")]
    Store(#[from] StoreError),
}

/// On-disk shape. Borrowed from the state so encoding never clones.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveRecord<'a> {
    version: u32,
    currency: f64,
    lifetime_currency: f64,
    producer_counts: &'a BTreeMap<String, u32>,
    click_upgrade_level: u32,
    compound_multiplier: f64,
    has_won_acknowledged: bool,
    custom_artwork_ref: Option<&'a str>,
}

/// A decoded save plus the fields that had to fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Restored {
    pub state: EconomyState,
    /// `None` for saves written before versioning.
    pub version: Option<u32>,
    pub defaulted_fields: Vec<&'static str>,
}

/// What happened when the session tried to load its save.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Nothing stored yet.
    NoSave,
    Restored { defaulted_fields: Vec<&'static str> },
    /// Stored data could not be used; the session started fresh.
    Discarded(LoadError),
}

impl LoadOutcome {
    /// A player-facing warning when the save was not restored intact.
    pub fn warning(&self) -> Option<String> {
        match self {
            LoadOutcome::NoSave => None,
            LoadOutcome::Restored { defaulted_fields } if defaulted_fields.is_empty() => None,
            LoadOutcome::Restored { defaulted_fields } => Some(format!(
                "save restored with defaults for: {}",
                defaulted_fields.join(", ")
            )),
            LoadOutcome::Discarded(e) => Some(format!("failed to load save, starting over: {e}")),
        }
    }
}

/// Encode every persisted field as JSON. Equal states encode to identical bytes.
///
/// JSON has no infinity or NaN, so a non-finite amount is refused rather
/// than written as `null` and silently reset on the next load.
pub fn encode(state: &EconomyState) -> Result<String, SaveError> {
    for (field, value) in [
        (CURRENCY.0, state.currency),
        (LIFETIME.0, state.lifetime_currency),
        (MULTIPLIER.0, state.compound_multiplier),
    ] {
        if !value.is_finite() {
            return Err(SaveError::NonFinite { field });
        }
    }
    let json = serde_json::to_string(&SaveRecord {
        version: SAVE_VERSION,
        currency: state.currency,
        lifetime_currency: state.lifetime_currency,
        producer_counts: &state.producer_counts,
        click_upgrade_level: state.click_upgrade_level,
        compound_multiplier: state.compound_multiplier,
        has_won_acknowledged: state.has_won_acknowledged,
        custom_artwork_ref: state.custom_artwork_ref.as_deref(),
    })?;
    Ok(json)
}

/// Decode a save, defaulting each absent or malformed field independently.
pub fn decode(text: &str, catalog: &Catalog) -> Result<Restored, LoadError> {
    let value: Value = serde_json::from_str(text)?;
    let obj = match value {
        Value::Object(obj) => obj,
        _ => return Err(LoadError::NotAnObject),
    };

    let fresh = EconomyState::new();
    let mut fields = Fields {
        obj: &obj,
        defaulted: Vec::new(),
    };

    let state = EconomyState {
        currency: fields.amount(CURRENCY, fresh.currency),
        lifetime_currency: fields.amount(LIFETIME, fresh.lifetime_currency),
        producer_counts: fields.producer_counts(catalog),
        click_upgrade_level: fields.count(CLICK_LEVEL, fresh.click_upgrade_level),
        compound_multiplier: fields.multiplier(MULTIPLIER, fresh.compound_multiplier),
        has_won_acknowledged: fields.flag(WON, fresh.has_won_acknowledged),
        custom_artwork_ref: fields.artwork(ARTWORK),
    };

    Ok(Restored {
        state,
        version: obj
            .get("version")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok()),
        defaulted_fields: fields.defaulted,
    })
}

/// Per-field readers over the top-level save object.
struct Fields<'a> {
    obj: &'a Map<String, Value>,
    defaulted: Vec<&'static str>,
}

impl<'a> Fields<'a> {
    fn lookup(&self, (name, legacy): (&str, &str)) -> Option<&'a Value> {
        self.obj.get(name).or_else(|| self.obj.get(legacy))
    }

    fn fallback<T>(&mut self, name: &'static str, default: T) -> T {
        self.defaulted.push(name);
        default
    }

    /// Non-negative finite number.
    fn amount(&mut self, key: (&'static str, &str), default: f64) -> f64 {
        match self.lookup(key).and_then(Value::as_f64) {
            Some(v) if v.is_finite() && v >= 0.0 => v,
            _ => self.fallback(key.0, default),
        }
    }

    /// Strictly positive finite number.
    fn multiplier(&mut self, key: (&'static str, &str), default: f64) -> f64 {
        match self.lookup(key).and_then(Value::as_f64) {
            Some(v) if v.is_finite() && v > 0.0 => v,
            _ => self.fallback(key.0, default),
        }
    }

    fn count(&mut self, key: (&'static str, &str), default: u32) -> u32 {
        match self.lookup(key).and_then(as_count) {
            Some(v) => v,
            None => self.fallback(key.0, default),
        }
    }

    fn flag(&mut self, key: (&'static str, &str), default: bool) -> bool {
        match self.lookup(key).and_then(Value::as_bool) {
            Some(v) => v,
            None => self.fallback(key.0, default),
        }
    }

    /// An explicit `null` is a valid "no artwork".
    fn artwork(&mut self, key: (&'static str, &str)) -> Option<String> {
        match self.lookup(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) => None,
            _ => self.fallback(key.0, None),
        }
    }

    /// Keeps entries for catalog producers with whole, non-negative counts.
    fn producer_counts(&mut self, catalog: &Catalog) -> BTreeMap<String, u32> {
        let entries = match self.lookup(PRODUCERS) {
            Some(Value::Object(entries)) => entries,
            _ => return self.fallback(PRODUCERS.0, BTreeMap::new()),
        };

        let mut counts = BTreeMap::new();
        for (id, raw) in entries {
            if !catalog.contains(id) {
                debug!(producer = %id, "ignoring unknown producer in save");
                continue;
            }
            match as_count(raw) {
                Some(n) => {
                    counts.insert(id.clone(), n);
                }
                None => debug!(producer = %id, value = %raw, "ignoring malformed producer count"),
            }
        }
        counts
    }
}

/// Whole non-negative number that fits a `u32`. Accepts `3.0` as well as `3`.
fn as_count(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = value.as_f64()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
        Some(f as u32)
    } else {
        None
    }
}

/// Reads and writes the economy under one key of a [`KeyValueStore`].
pub struct PersistenceGateway {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl PersistenceGateway {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored economy. Never fails: anything unusable yields a fresh
    /// state and is reported through the outcome.
    pub fn load(&self, catalog: &Catalog) -> (EconomyState, LoadOutcome) {
        let text = match self.store.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return (EconomyState::new(), LoadOutcome::NoSave),
            Err(e) => {
                warn!(key = %self.key, error = %e, "could not read save; starting fresh");
                return (EconomyState::new(), LoadOutcome::Discarded(e.into()));
            }
        };

        match decode(&text, catalog) {
            Ok(restored) => {
                match restored.version {
                    Some(v) if v == SAVE_VERSION => {}
                    Some(v) => info!(saved = v, current = SAVE_VERSION, "migrating save"),
                    None => info!(current = SAVE_VERSION, "migrating unversioned save"),
                }
                if !restored.defaulted_fields.is_empty() {
                    warn!(
                        fields = ?restored.defaulted_fields,
                        "save had missing or malformed fields; defaults substituted"
                    );
                }
                (
                    restored.state,
                    LoadOutcome::Restored {
                        defaulted_fields: restored.defaulted_fields,
                    },
                )
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding unreadable save");
                if let Err(remove_err) = self.store.remove(&self.key) {
                    warn!(error = %remove_err, "could not remove unreadable save");
                }
                (EconomyState::new(), LoadOutcome::Discarded(e))
            }
        }
    }

    pub fn save(&self, state: &EconomyState) -> Result<(), SaveError> {
        let json = encode(state)?;
        self.store.set(&self.key, &json)?;
        debug!(key = %self.key, bytes = json.len(), "saved");
        Ok(())
    }

    /// Delete the save entry.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::logic;
    use crate::storage::MemoryStore;
    use proptest::collection::btree_map;
    use proptest::prelude::*;

    fn catalog() -> Catalog {
        Catalog::standard()
    }

    fn sample_state() -> EconomyState {
        let mut s = EconomyState::new();
        s.currency = 12_345.6;
        s.lifetime_currency = 99_999.25;
        s.producer_counts.insert("normal".into(), 10);
        s.producer_counts.insert("ai".into(), 2);
        s.click_upgrade_level = 7;
        s.compound_multiplier = 3.141_592_653_589_793;
        s.has_won_acknowledged = true;
        s.custom_artwork_ref = Some("data:image/png;base64,iVBORw0KGgo=".into());
        s
    }

    #[test]
    fn encode_and_decode_roundtrip() {
        let original = sample_state();
        let json = encode(&original).unwrap();
        let restored = decode(&json, &catalog()).unwrap();

        assert_eq!(restored.state, original);
        assert_eq!(restored.version, Some(SAVE_VERSION));
        assert!(restored.defaulted_fields.is_empty());
    }

    #[test]
    fn encoding_uses_camel_case_field_names() {
        let json = encode(&sample_state()).unwrap();
        for name in [
            "\"version\"",
            "\"currency\"",
            "\"lifetimeCurrency\"",
            "\"producerCounts\"",
            "\"clickUpgradeLevel\"",
            "\"compoundMultiplier\"",
            "\"hasWonAcknowledged\"",
            "\"customArtworkRef\"",
        ] {
            assert!(json.contains(name), "missing {name} in {json}");
        }
    }

    #[test]
    fn empty_object_decodes_to_fresh_state() {
        let restored = decode("{}", &catalog()).unwrap();
        assert_eq!(restored.state, EconomyState::new());
        assert_eq!(restored.version, None);
        assert_eq!(restored.defaulted_fields.len(), 7);
    }

    #[test]
    fn unparseable_input_is_an_error() {
        assert!(matches!(decode("not json", &catalog()), Err(LoadError::Parse(_))));
        assert!(matches!(decode("", &catalog()), Err(LoadError::Parse(_))));
        assert!(matches!(decode("[1,2]", &catalog()), Err(LoadError::NotAnObject)));
        assert!(matches!(decode("null", &catalog()), Err(LoadError::NotAnObject)));
    }

    /// A save lacking the fields added later still restores what it has.
    #[test]
    fn missing_later_fields_default_independently() {
        let json = r#"{
            "currency": 500.0,
            "lifetimeCurrency": 800.0,
            "producerCounts": {"normal": 3}
        }"#;
        let restored = decode(json, &catalog()).unwrap();

        assert_eq!(restored.state.currency, 500.0);
        assert_eq!(restored.state.lifetime_currency, 800.0);
        assert_eq!(restored.state.count("normal"), 3);
        assert_eq!(restored.state.click_upgrade_level, 0);
        assert_eq!(restored.state.compound_multiplier, 1.0);
        assert!(!restored.state.has_won_acknowledged);
        assert!(restored.state.custom_artwork_ref.is_none());
        assert_eq!(
            restored.defaulted_fields,
            vec![
                "clickUpgradeLevel",
                "compoundMultiplier",
                "hasWonAcknowledged",
                "customArtworkRef"
            ]
        );
    }

    #[test]
    fn legacy_field_names_are_accepted() {
        let json = r#"{
            "bananas": 1234.5,
            "monkeyCounts": {"normal": 4, "smart": 1},
            "totalLifetimeBananas": 5000,
            "customBanana": "data:image/png;base64,AAAA",
            "clickUpgradeLevel": 2,
            "aiBpsMultiplier": 1.728,
            "hasWon": true
        }"#;
        let restored = decode(json, &catalog()).unwrap();
        let s = restored.state;

        assert_eq!(s.currency, 1234.5);
        assert_eq!(s.lifetime_currency, 5000.0);
        assert_eq!(s.count("normal"), 4);
        assert_eq!(s.count("smart"), 1);
        assert_eq!(s.click_upgrade_level, 2);
        assert!((s.compound_multiplier - 1.728).abs() < 1e-12);
        assert!(s.has_won_acknowledged);
        assert_eq!(s.custom_artwork_ref.as_deref(), Some("data:image/png;base64,AAAA"));
        assert!(restored.defaulted_fields.is_empty());
    }

    #[test]
    fn malformed_fields_fall_back_without_failing_the_load() {
        let json = r#"{
            "currency": "lots",
            "lifetimeCurrency": -5,
            "producerCounts": {"normal": 2, "smart": -1, "cool": 1.5, "gorilla": 9},
            "clickUpgradeLevel": 3.0,
            "compoundMultiplier": 0,
            "hasWonAcknowledged": "yes",
            "customArtworkRef": 42,
            "futureField": {"anything": true}
        }"#;
        let restored = decode(json, &catalog()).unwrap();
        let s = &restored.state;

        assert_eq!(s.currency, 0.0);
        assert_eq!(s.lifetime_currency, 0.0);
        assert_eq!(s.producer_counts.len(), 1);
        assert_eq!(s.count("normal"), 2);
        assert_eq!(s.click_upgrade_level, 3);
        assert_eq!(s.compound_multiplier, 1.0);
        assert!(!s.has_won_acknowledged);
        assert!(s.custom_artwork_ref.is_none());
        assert_eq!(
            restored.defaulted_fields,
            vec![
                "currency",
                "lifetimeCurrency",
                "compoundMultiplier",
                "hasWonAcknowledged",
                "customArtworkRef"
            ]
        );
    }

    #[test]
    fn null_artwork_is_not_a_default() {
        let json = encode(&EconomyState::new()).unwrap();
        assert!(json.contains("\"customArtworkRef\":null"));
        let restored = decode(&json, &catalog()).unwrap();
        assert!(restored.defaulted_fields.is_empty());
    }

    #[test]
    fn encode_refuses_non_finite_amounts() {
        let mut s = sample_state();
        s.currency = f64::INFINITY;
        assert!(matches!(
            encode(&s),
            Err(SaveError::NonFinite { field: "currency" })
        ));

        let mut s = sample_state();
        s.compound_multiplier = f64::NAN;
        assert!(matches!(
            encode(&s),
            Err(SaveError::NonFinite { field: "compoundMultiplier" })
        ));
    }

    #[test]
    fn saturated_idle_game_survives_save_and_load() {
        let catalog = catalog();
        let mut s = EconomyState::new();
        s.producer_counts.insert("ai".into(), 1);
        for _ in 0..42_000 {
            logic::tick(&mut s, &catalog, 100);
        }

        let json = encode(&s).unwrap();
        assert!(!json.contains("null,"), "amount written as null: {json}");
        let restored = decode(&json, &catalog).unwrap();
        assert!(restored.defaulted_fields.is_empty());
        assert_eq!(restored.state, s);
        assert_eq!(restored.state.currency, f64::MAX);
    }

    #[test]
    fn encode_is_deterministic() {
        let s = sample_state();
        assert_eq!(encode(&s).unwrap(), encode(&s.clone()).unwrap());
    }

    // ── Gateway ────────────────────────────────────────────────────

    #[test]
    fn gateway_without_save_starts_fresh() {
        let gateway = PersistenceGateway::new(Box::new(MemoryStore::new()), "k");
        let (state, outcome) = gateway.load(&catalog());
        assert_eq!(state, EconomyState::new());
        assert!(matches!(outcome, LoadOutcome::NoSave));
    }

    #[test]
    fn gateway_save_then_load() {
        let store = MemoryStore::new();
        let gateway = PersistenceGateway::new(Box::new(store.clone()), "k");
        gateway.save(&sample_state()).unwrap();
        assert!(store.get("k").unwrap().is_some());

        let (state, outcome) = gateway.load(&catalog());
        assert_eq!(state, sample_state());
        assert!(matches!(
            outcome,
            LoadOutcome::Restored { ref defaulted_fields } if defaulted_fields.is_empty()
        ));
    }

    #[test]
    fn gateway_discards_and_removes_corrupt_save() {
        let store = MemoryStore::new();
        store.set("k", "{\"currency\": 12").unwrap();
        let gateway = PersistenceGateway::new(Box::new(store.clone()), "k");

        let (state, outcome) = gateway.load(&catalog());

        assert_eq!(state, EconomyState::new());
        assert!(matches!(outcome, LoadOutcome::Discarded(LoadError::Parse(_))));
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn load_warning_only_for_damaged_saves() {
        assert_eq!(LoadOutcome::NoSave.warning(), None);
        let clean = LoadOutcome::Restored {
            defaulted_fields: Vec::new(),
        };
        assert_eq!(clean.warning(), None);

        let partial = LoadOutcome::Restored {
            defaulted_fields: vec!["currency", "compoundMultiplier"],
        };
        assert_eq!(
            partial.warning().as_deref(),
            Some("save restored with defaults for: currency, compoundMultiplier")
        );

        let store = MemoryStore::new();
        store.set("k", "[1, 2]").unwrap();
        let (_, outcome) = PersistenceGateway::new(Box::new(store), "k").load(&catalog());
        let warning = outcome.warning().unwrap();
        assert!(warning.starts_with("failed to load save"), "{warning}");
    }

    #[test]
    fn gateway_clear_removes_entry() {
        let store = MemoryStore::new();
        let gateway = PersistenceGateway::new(Box::new(store.clone()), "k");
        gateway.save(&EconomyState::new()).unwrap();
        gateway.clear().unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    fn arb_state() -> impl Strategy<Value = EconomyState> {
        let ids = prop::sample::select(vec!["normal", "smart", "cool", "rich", "badidas", "ai"]);
        (
            0.0f64..1e15,
            0.0f64..1e15,
            btree_map(ids.prop_map(String::from), 0u32..500, 0..6),
            0u32..60,
            1.0f64..1e9,
            any::<bool>(),
            prop::option::of("[a-zA-Z0-9+/=:;,]{0,40}"),
        )
            .prop_map(
                |(currency, lifetime, counts, level, multiplier, won, artwork)| EconomyState {
                    currency,
                    lifetime_currency: lifetime,
                    producer_counts: counts,
                    click_upgrade_level: level,
                    compound_multiplier: multiplier,
                    has_won_acknowledged: won,
                    custom_artwork_ref: artwork,
                },
            )
    }

    proptest! {
        #[test]
        fn save_load_save_is_idempotent(state in arb_state()) {
            let catalog = catalog();
            let first = encode(&state).unwrap();
            let restored = decode(&first, &catalog).unwrap();
            let second = encode(&restored.state).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(restored.state, state);
        }
    }
}
