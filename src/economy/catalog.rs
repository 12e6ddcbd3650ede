//! Producer catalog and economy tuning constants.

use std::collections::HashSet;

/// Growth applied to a producer's price per unit already owned.
pub const COST_MULTIPLIER: f64 = 1.15;

/// Bananas per harvest before any click upgrade.
pub const BASE_CLICK_VALUE: f64 = 1.0;
/// Click value growth per click upgrade level.
pub const CLICK_GROWTH: f64 = 1.5;

pub const CLICK_UPGRADE_BASE_COST: f64 = 500.0;
pub const CLICK_UPGRADE_COST_MULTIPLIER: f64 = 1.5;

/// Per-second growth of the compounding producer's multiplier.
pub const COMPOUND_GROWTH_PER_SECOND: f64 = 1.2;

/// Balance at which the win screen is offered.
pub const WIN_THRESHOLD: f64 = 100_000_000.0;

/// Static description of one producer type.
#[derive(Clone, Debug, PartialEq)]
pub struct ProducerDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    /// Price of the first unit.
    pub base_cost: f64,
    /// Bananas per second per unit, before multipliers.
    pub base_rate: f64,
    /// Whether this producer's rate scales with the compound multiplier.
    pub compounding: bool,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog has no producers")]
    Empty,
    #[error("duplicate producer id: {0}")]
    DuplicateId(String),
    #[error("producer {id} has invalid base cost {cost}")]
    InvalidCost { id: String, cost: f64 },
    #[error("producer {id} has invalid base rate {rate}")]
    InvalidRate { id: String, rate: f64 },
    #[error("catalog must have exactly one compounding producer, found {0}")]
    CompoundingCount(usize),
}

/// Ordered, validated list of producers. Immutable once built.
#[derive(Clone, Debug)]
pub struct Catalog {
    producers: Vec<ProducerDefinition>,
    compounding_idx: usize,
}

impl Catalog {
    pub fn new(producers: Vec<ProducerDefinition>) -> Result<Self, CatalogError> {
        if producers.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for p in &producers {
            if !seen.insert(p.id) {
                return Err(CatalogError::DuplicateId(p.id.to_string()));
            }
            if !p.base_cost.is_finite() || p.base_cost <= 0.0 {
                return Err(CatalogError::InvalidCost {
                    id: p.id.to_string(),
                    cost: p.base_cost,
                });
            }
            if !p.base_rate.is_finite() || p.base_rate < 0.0 {
                return Err(CatalogError::InvalidRate {
                    id: p.id.to_string(),
                    rate: p.base_rate,
                });
            }
        }

        let compounding: Vec<usize> = producers
            .iter()
            .enumerate()
            .filter(|(_, p)| p.compounding)
            .map(|(i, _)| i)
            .collect();
        if compounding.len() != 1 {
            return Err(CatalogError::CompoundingCount(compounding.len()));
        }

        Ok(Self {
            compounding_idx: compounding[0],
            producers,
        })
    }

    /// The six monkeys of the reference economy.
    pub fn standard() -> Self {
        Self {
            producers: standard_producers(),
            compounding_idx: 5,
        }
    }

    /// All producers in display order.
    pub fn producers(&self) -> &[ProducerDefinition] {
        &self.producers
    }

    pub fn get(&self, id: &str) -> Option<&ProducerDefinition> {
        self.producers.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn compounding(&self) -> &ProducerDefinition {
        &self.producers[self.compounding_idx]
    }

    pub fn len(&self) -> usize {
        self.producers.len()
    }

    /// Always false for a validated catalog.
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }
}

fn standard_producers() -> Vec<ProducerDefinition> {
    vec![
        ProducerDefinition {
            id: "normal",
            name: "Normal Monkey",
            emoji: "🐒",
            description: "A basic monkey. Works for bananas.",
            base_cost: 100.0,
            base_rate: 1.0,
            compounding: false,
        },
        ProducerDefinition {
            id: "smart",
            name: "Smart Monkey",
            emoji: "🤓",
            description: "Optimized banana peeling techniques.",
            base_cost: 1_000.0,
            base_rate: 11.0,
            compounding: false,
        },
        ProducerDefinition {
            id: "cool",
            name: "Cool Looking Monkey",
            emoji: "😎",
            description: "Too cool for school, but gets the job done.",
            base_cost: 10_000.0,
            base_rate: 60.0,
            compounding: false,
        },
        ProducerDefinition {
            id: "rich",
            name: "Rich Monkey",
            emoji: "🧐",
            description: "Invests in banana futures.",
            base_cost: 150_000.0,
            base_rate: 450.0,
            compounding: false,
        },
        ProducerDefinition {
            id: "badidas",
            name: "Badidas Monkey",
            emoji: "👟",
            description: "Runs extremely fast in tracksuits.",
            base_cost: 1_500_000.0,
            base_rate: 2_150.0,
            compounding: false,
        },
        ProducerDefinition {
            id: "ai",
            name: "A-I Monkey",
            emoji: "🤖",
            description: "Self-improving banana algorithm. Grows x1.2/sec!",
            base_cost: 20_000_000.0,
            base_rate: 1.0,
            compounding: true,
        },
    ]
}
