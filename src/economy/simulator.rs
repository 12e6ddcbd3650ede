//! Balance simulator for the banana economy.
//! Run with: cargo test simulate_ -- --nocapture
