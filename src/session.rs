//! Session controller: the single owner of the live economy.
//!
//! Player intents, the tick timer and the autosave timer all funnel through
//! `&mut Session`, so every transition completes before the next begins.
//! Subscribers hear about each change and about the win threshold.

use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::economy::logic;
use crate::economy::{Catalog, EconomyState, LoadOutcome, PersistenceGateway, SaveError};
use crate::storage::KeyValueStore;
use crate::time::FixedTimer;

/// Display-ready view of one producer.
#[derive(Clone, Debug, PartialEq)]
pub struct ProducerView {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub owned: u32,
    pub next_cost: f64,
    /// Bananas per second from all owned units.
    pub rate: f64,
    pub affordable: bool,
}

/// State plus everything the presentation derives from it.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub state: EconomyState,
    pub production_rate: f64,
    pub click_value: f64,
    pub next_upgrade_cost: f64,
    pub total_producer_count: u64,
    /// The win screen has been announced and the player has not chosen yet.
    pub win_pending: bool,
    pub producers: Vec<ProducerView>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    StateChanged(Snapshot),
    /// Fired once per un-acknowledged crossing of the win threshold.
    WinReached,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&SessionEvent)>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub ticks_run: u64,
    pub saves_written: u64,
    pub saves_failed: u64,
}

pub struct Session {
    catalog: Catalog,
    config: SessionConfig,
    state: EconomyState,
    gateway: PersistenceGateway,
    tick_timer: FixedTimer,
    autosave_timer: FixedTimer,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    /// Latched when `WinReached` fires; cleared only by `reset`.
    win_notified: bool,
    load_outcome: LoadOutcome,
    stats: SessionStats,
    shut_down: bool,
}

impl Session {
    /// Start a session from whatever the gateway has stored.
    pub fn new(catalog: Catalog, gateway: PersistenceGateway, config: SessionConfig) -> Self {
        let (state, load_outcome) = gateway.load(&catalog);
        match &load_outcome {
            LoadOutcome::NoSave => info!("no save found; starting a new game"),
            LoadOutcome::Restored { .. } => info!(
                currency = state.currency,
                producers = state.total_producer_count(),
                "save restored"
            ),
            LoadOutcome::Discarded(_) => info!("starting a new game after discarding save"),
        }

        let tick_timer = FixedTimer::new(config.tick_interval_ms as f64, config.max_frame_delta_ms);
        let autosave_timer =
            FixedTimer::new(config.autosave_interval_ms as f64, config.max_frame_delta_ms);

        Self {
            catalog,
            state,
            gateway,
            tick_timer,
            autosave_timer,
            listeners: Vec::new(),
            next_subscription: 0,
            win_notified: false,
            load_outcome,
            stats: SessionStats::default(),
            shut_down: false,
            config,
        }
    }

    /// Convenience: build the gateway from a store and the configured save key.
    pub fn open(catalog: Catalog, store: Box<dyn KeyValueStore>, config: SessionConfig) -> Self {
        let gateway = PersistenceGateway::new(store, config.save_key.clone());
        Self::new(catalog, gateway, config)
    }

    // ── Read access ────────────────────────────────────────────────

    pub fn state(&self) -> &EconomyState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        let producers = self
            .catalog
            .producers()
            .iter()
            .map(|p| {
                let next_cost = logic::next_producer_cost(state, p);
                ProducerView {
                    id: p.id,
                    name: p.name,
                    emoji: p.emoji,
                    owned: state.count(p.id),
                    next_cost,
                    rate: logic::producer_rate(state, p),
                    affordable: state.currency >= next_cost,
                }
            })
            .collect();

        Snapshot {
            state: state.clone(),
            production_rate: logic::production_rate(state, &self.catalog),
            click_value: logic::click_value(state.click_upgrade_level),
            next_upgrade_cost: logic::upgrade_cost(state.click_upgrade_level),
            total_producer_count: state.total_producer_count(),
            win_pending: self.win_notified && !state.has_won_acknowledged,
            producers,
        }
    }

    // ── Subscriptions ──────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: &SessionEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    /// Publish the new state, then check the win threshold.
    fn after_change(&mut self) {
        if !self.listeners.is_empty() {
            let event = SessionEvent::StateChanged(self.snapshot());
            self.emit(&event);
        }
        if !self.win_notified && logic::is_win_pending(&self.state) {
            self.win_notified = true;
            info!(currency = self.state.currency, "win threshold reached");
            self.emit(&SessionEvent::WinReached);
        }
    }

    // ── Player intents ─────────────────────────────────────────────

    pub fn harvest(&mut self) -> bool {
        if self.shut_down {
            return false;
        }
        logic::harvest(&mut self.state);
        self.after_change();
        true
    }

    pub fn buy_producer(&mut self, producer_id: &str) -> bool {
        if self.shut_down {
            return false;
        }
        let bought = logic::buy_producer(&mut self.state, &self.catalog, producer_id);
        if bought {
            debug!(
                producer = %producer_id,
                owned = self.state.count(producer_id),
                "producer bought"
            );
        } else {
            debug!(producer = %producer_id, currency = self.state.currency, "purchase rejected");
        }
        self.after_change();
        bought
    }

    pub fn buy_click_upgrade(&mut self) -> bool {
        if self.shut_down {
            return false;
        }
        let bought = logic::buy_click_upgrade(&mut self.state);
        if bought {
            debug!(level = self.state.click_upgrade_level, "click upgrade bought");
        } else {
            debug!(currency = self.state.currency, "click upgrade rejected");
        }
        self.after_change();
        bought
    }

    pub fn set_custom_artwork(&mut self, artwork: Option<String>) -> bool {
        if self.shut_down {
            return false;
        }
        logic::set_custom_artwork(&mut self.state, artwork);
        self.after_change();
        true
    }

    pub fn acknowledge_win_and_continue(&mut self) -> bool {
        if self.shut_down {
            return false;
        }
        logic::acknowledge_win_and_continue(&mut self.state);
        info!("player chose to keep playing after winning");
        self.after_change();
        true
    }

    /// Start over, keeping the artwork, and persist the fresh game right away.
    pub fn reset(&mut self) -> bool {
        if self.shut_down {
            return false;
        }
        logic::reset(&mut self.state);
        self.win_notified = false;
        info!("game reset");
        if let Err(e) = self.save_now() {
            warn!(error = %e, "could not save after reset");
        }
        self.after_change();
        true
    }

    // ── Clock ──────────────────────────────────────────────────────

    /// Drive both timers from a wall-clock timestamp. Returns the ticks run.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        if self.shut_down {
            return 0;
        }
        let ticks = self.tick_timer.update(now_ms);
        for _ in 0..ticks {
            self.run_tick();
        }
        if self.autosave_timer.update(now_ms) > 0 {
            if let Err(e) = self.save_now() {
                warn!(error = %e, "autosave failed; retrying next cycle");
            }
        }
        ticks
    }

    /// Run exactly one tick quantum regardless of the wall clock.
    pub fn tick_once(&mut self) -> bool {
        if self.shut_down {
            return false;
        }
        self.run_tick();
        true
    }

    fn run_tick(&mut self) {
        logic::tick(&mut self.state, &self.catalog, self.config.tick_interval_ms);
        self.stats.ticks_run += 1;
        self.after_change();
    }

    /// Persist now. Failures are counted and returned; the game carries on.
    pub fn save_now(&mut self) -> Result<(), SaveError> {
        match self.gateway.save(&self.state) {
            Ok(()) => {
                self.stats.saves_written += 1;
                Ok(())
            }
            Err(e) => {
                self.stats.saves_failed += 1;
                Err(e)
            }
        }
    }

    /// Stop the timers, write a final save and detach all subscribers.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.tick_timer.stop();
        self.autosave_timer.stop();
        if let Err(e) = self.save_now() {
            warn!(error = %e, "final save failed");
        }
        self.listeners.clear();
        self.shut_down = true;
        info!(ticks = self.stats.ticks_run, "session shut down");
    }
}
