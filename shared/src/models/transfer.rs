//! Stock transfer planning
//!
//! Accepting a stock request moves quantity from the dealer's inventory to
//! the vendor's inside one database transaction. The transaction model
//! forbids reading after writing, so the engine works in two phases: read
//! every item it needs, then apply writes. This module is the pure middle
//! step: it turns the read snapshot into a write plan.
//!
//! Per request line the plan emits exactly one dealer debit and one vendor
//! credit (or create) of the same quantity, so quantity conservation holds
//! by construction.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::inventory::{normalize_item_key, DEFAULT_TRANSFER_CATEGORY};
use super::stock_request::RequestLine;

/// Snapshot of an inventory item captured during the read phase
#[derive(Debug, Clone)]
pub struct ItemSnapshot {
    pub id: Uuid,
    pub name: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

/// One request line together with the items resolved for it
#[derive(Debug, Clone)]
pub struct LineSnapshot {
    pub line: RequestLine,
    /// Dealer item resolved by stored reference, or by the deprecated name
    /// fallback. `None` when neither resolves.
    pub dealer_item: Option<ItemSnapshot>,
    /// Vendor item with the same name, if one exists
    pub vendor_item: Option<ItemSnapshot>,
}

/// A single write the transfer will perform
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOp {
    /// Decrement the dealer's item. May drive the quantity negative; the
    /// observed overdraft behavior is preserved deliberately.
    DebitDealer { item_id: Uuid, quantity: Decimal },
    /// Increment an existing vendor item, leaving the vendor's own price,
    /// description, and category untouched.
    CreditVendor { item_id: Uuid, quantity: Decimal },
    /// Create a vendor item seeded from the request line and dealer item.
    CreateVendorItem { item: NewVendorItem },
}

/// Field values for a vendor item created by a transfer. Descriptive fields
/// are filled by priority: request line, then dealer item, then defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVendorItem {
    pub item_key: String,
    pub name: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub category: String,
    pub image_url: Option<String>,
}

/// Complete write plan for one accepted request
#[derive(Debug, Clone)]
pub struct TransferPlan {
    pub ops: Vec<TransferOp>,
    /// Total quantity moved, used for the dealer notification
    pub total_quantity: Decimal,
}

impl TransferPlan {
    /// Sum of all dealer debits
    pub fn dealer_debit_total(&self) -> Decimal {
        self.ops
            .iter()
            .filter_map(|op| match op {
                TransferOp::DebitDealer { quantity, .. } => Some(*quantity),
                _ => None,
            })
            .sum()
    }

    /// Sum of all vendor credits and initial quantities
    pub fn vendor_credit_total(&self) -> Decimal {
        self.ops
            .iter()
            .filter_map(|op| match op {
                TransferOp::CreditVendor { quantity, .. } => Some(*quantity),
                TransferOp::CreateVendorItem { item } => Some(item.quantity),
                _ => None,
            })
            .sum()
    }
}

/// Reasons a transfer cannot be planned
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// Crediting the vendor without a matching dealer debit would create
    /// quantity out of nothing, so the whole transfer is refused.
    #[error("no dealer inventory entry resolves for item '{0}'")]
    UnresolvedDealerItem(String),
}

/// Build the write plan for accepting a stock request.
pub fn build_transfer_plan(
    vendor_id: Uuid,
    snapshots: &[LineSnapshot],
) -> Result<TransferPlan, PlanError> {
    let mut ops = Vec::with_capacity(snapshots.len() * 2);
    let mut total_quantity = Decimal::ZERO;

    for snapshot in snapshots {
        let line = &snapshot.line;
        let dealer_item = snapshot
            .dealer_item
            .as_ref()
            .ok_or_else(|| PlanError::UnresolvedDealerItem(line.name.clone()))?;

        ops.push(TransferOp::DebitDealer {
            item_id: dealer_item.id,
            quantity: line.quantity,
        });

        match &snapshot.vendor_item {
            Some(vendor_item) => {
                ops.push(TransferOp::CreditVendor {
                    item_id: vendor_item.id,
                    quantity: line.quantity,
                });
            }
            None => {
                ops.push(TransferOp::CreateVendorItem {
                    item: seed_vendor_item(vendor_id, line, dealer_item),
                });
            }
        }

        total_quantity += line.quantity;
    }

    Ok(TransferPlan {
        ops,
        total_quantity,
    })
}

/// Seed a new vendor item: request line data first, dealer item data second,
/// defaults last.
fn seed_vendor_item(vendor_id: Uuid, line: &RequestLine, dealer_item: &ItemSnapshot) -> NewVendorItem {
    let category = dealer_item
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(DEFAULT_TRANSFER_CATEGORY)
        .to_string();

    NewVendorItem {
        item_key: normalize_item_key(vendor_id, &line.name),
        name: line.name.clone(),
        quantity: line.quantity,
        price: line.price.unwrap_or(dealer_item.price),
        description: dealer_item.description.clone(),
        unit: line.unit.clone().or_else(|| dealer_item.unit.clone()),
        category,
        image_url: line
            .image_url
            .clone()
            .or_else(|| dealer_item.image_url.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, qty: i64) -> RequestLine {
        RequestLine {
            name: name.to_string(),
            quantity: Decimal::from(qty),
            source_item_id: None,
            price: None,
            image_url: None,
            unit: None,
        }
    }

    fn item(name: &str, qty: i64) -> ItemSnapshot {
        ItemSnapshot {
            id: Uuid::new_v4(),
            name: name.to_string(),
            quantity: Decimal::from(qty),
            price: Decimal::from(10),
            description: None,
            unit: None,
            category: Some("Grocery".to_string()),
            image_url: None,
        }
    }

    #[test]
    fn plan_debits_and_credits_equally() {
        let vendor = Uuid::new_v4();
        let snapshots = vec![
            LineSnapshot {
                line: line("Rice", 20),
                dealer_item: Some(item("Rice", 100)),
                vendor_item: Some(item("Rice", 5)),
            },
            LineSnapshot {
                line: line("Sugar", 7),
                dealer_item: Some(item("Sugar", 30)),
                vendor_item: None,
            },
        ];

        let plan = build_transfer_plan(vendor, &snapshots).unwrap();
        assert_eq!(plan.ops.len(), 4);
        assert_eq!(plan.dealer_debit_total(), Decimal::from(27));
        assert_eq!(plan.vendor_credit_total(), Decimal::from(27));
        assert_eq!(plan.total_quantity, Decimal::from(27));
    }

    #[test]
    fn missing_dealer_item_refuses_the_transfer() {
        let snapshots = vec![LineSnapshot {
            line: line("Ghost", 5),
            dealer_item: None,
            vendor_item: None,
        }];

        let err = build_transfer_plan(Uuid::new_v4(), &snapshots).unwrap_err();
        assert_eq!(err, PlanError::UnresolvedDealerItem("Ghost".to_string()));
    }

    #[test]
    fn new_vendor_item_defaults_category_to_returns() {
        let vendor = Uuid::new_v4();
        let mut dealer_item = item("Rice", 100);
        dealer_item.category = None;

        let snapshots = vec![LineSnapshot {
            line: line("Rice", 20),
            dealer_item: Some(dealer_item),
            vendor_item: None,
        }];

        let plan = build_transfer_plan(vendor, &snapshots).unwrap();
        match &plan.ops[1] {
            TransferOp::CreateVendorItem { item } => {
                assert_eq!(item.category, DEFAULT_TRANSFER_CATEGORY);
                assert_eq!(item.quantity, Decimal::from(20));
                assert_eq!(item.item_key, normalize_item_key(vendor, "Rice"));
            }
            other => panic!("expected CreateVendorItem, got {:?}", other),
        }
    }

    #[test]
    fn request_line_data_wins_over_dealer_data() {
        let vendor = Uuid::new_v4();
        let mut dealer_item = item("Rice", 100);
        dealer_item.price = Decimal::from(42);
        dealer_item.unit = Some("bag".to_string());
        dealer_item.image_url = Some("dealer.png".to_string());

        let mut rice = line("Rice", 20);
        rice.price = Some(Decimal::from(55));
        rice.unit = Some("kg".to_string());

        let snapshots = vec![LineSnapshot {
            line: rice,
            dealer_item: Some(dealer_item),
            vendor_item: None,
        }];

        let plan = build_transfer_plan(vendor, &snapshots).unwrap();
        match &plan.ops[1] {
            TransferOp::CreateVendorItem { item } => {
                assert_eq!(item.price, Decimal::from(55));
                assert_eq!(item.unit.as_deref(), Some("kg"));
                // Line has no image, dealer item fills the gap
                assert_eq!(item.image_url.as_deref(), Some("dealer.png"));
            }
            other => panic!("expected CreateVendorItem, got {:?}", other),
        }
    }

    #[test]
    fn existing_vendor_item_is_credited_not_reseeded() {
        let vendor = Uuid::new_v4();
        let vendor_item = item("Rice", 5);
        let vendor_item_id = vendor_item.id;

        let snapshots = vec![LineSnapshot {
            line: line("Rice", 20),
            dealer_item: Some(item("Rice", 100)),
            vendor_item: Some(vendor_item),
        }];

        let plan = build_transfer_plan(vendor, &snapshots).unwrap();
        assert_eq!(
            plan.ops[1],
            TransferOp::CreditVendor {
                item_id: vendor_item_id,
                quantity: Decimal::from(20),
            }
        );
    }
}
