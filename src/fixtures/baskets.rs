//! Basket Fixtures

use serde::Deserialize;

/// Wrapper for a basket in YAML
#[derive(Debug, Deserialize)]
pub struct BasketFixture {
    /// Basket lines, in the order they were added
    pub lines: Vec<BasketLineFixture>,
}

/// Basket line fixture from YAML
#[derive(Debug, Deserialize)]
pub struct BasketLineFixture {
    /// Item fixture key
    pub item: String,

    /// Number of units
    pub quantity: u32,
}
