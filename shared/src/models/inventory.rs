//! Inventory models
//!
//! Dealer-side and vendor-side inventory share one shape; the `owner_id`
//! decides which side of a stock transfer a row sits on.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category assigned to items created by a stock transfer when neither the
/// request line nor the dealer item carries one.
pub const DEFAULT_TRANSFER_CATEGORY: &str = "Returns";

/// An inventory item owned by a vendor or a dealer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub owner_id: Uuid,
    /// Surrogate key derived from owner and normalized name; unique per
    /// owner. Legacy rows may still collide on the raw name, so name
    /// lookups take the oldest match.
    pub item_key: String,
    pub name: String,
    /// May go negative on the dealer side during a transfer (no floor check).
    pub quantity: Decimal,
    pub price: Decimal,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub category: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Generate the surrogate key for an inventory item: lowercase, trim, and
/// replace every non `[a-z0-9]` character of the name with `_`.
pub fn normalize_item_key(owner_id: Uuid, name: &str) -> String {
    let normalized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '_' })
        .collect();
    format!("{}_{}", owner_id, normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_lowercases_and_trims() {
        let owner = Uuid::nil();
        assert_eq!(
            normalize_item_key(owner, "  Basmati Rice "),
            format!("{}_basmati_rice", owner)
        );
    }

    #[test]
    fn key_replaces_special_characters() {
        let owner = Uuid::nil();
        assert_eq!(
            normalize_item_key(owner, "Chili (Red) 1kg!"),
            format!("{}_chili__red__1kg_", owner)
        );
    }

    #[test]
    fn key_keeps_digits() {
        let owner = Uuid::nil();
        assert_eq!(
            normalize_item_key(owner, "A4 Paper"),
            format!("{}_a4_paper", owner)
        );
    }
}
