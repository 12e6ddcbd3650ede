//! Banana Tycoon — an idle banana-harvesting economy.
//!
//! The crate is the simulation core: producers and costs ([`economy`]), the
//! fixed-rate clock ([`time`]), save storage ([`storage`]) and the
//! [`session::Session`] that ties them together. The browser shell in
//! `main.rs` only renders snapshots and forwards player intents.

pub mod config;
pub mod economy;
pub mod session;
pub mod storage;
pub mod time;

pub use config::SessionConfig;
pub use economy::{Catalog, EconomyState};
pub use session::{Session, SessionEvent, Snapshot};
