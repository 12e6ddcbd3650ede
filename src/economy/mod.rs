/// Banana economy — producers, costs, ticking, and saves.

pub mod catalog;
pub mod logic;
pub mod save;
pub mod simulator;
pub mod state;

pub use catalog::{Catalog, CatalogError, ProducerDefinition};
pub use save::{LoadError, LoadOutcome, PersistenceGateway, SaveError};
pub use state::EconomyState;
