//! # Domain Types
//!
//! Enumerations and the payloads received from the external catalog and
//! lot collaborators.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ CatalogProduct  │   │   LotRecord     │   │    BoxSpec      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_id     │   │  lot_id         │   │  units_per_box  │       │
//! │  │  name           │   │  expiry         │   │  box_unit_price │       │
//! │  │  unit_price     │   │  stock_remaining│   └─────────────────┘       │
//! │  │  unit_of_measure│   │  unit_price     │                              │
//! │  │  stock          │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │ UnitOfMeasure   │   │  DiscountMode   │                              │
//! │  │  UNIT KG L BOX  │   │  NONE           │                              │
//! │  └─────────────────┘   │  PER_ITEM       │                              │
//! │                        │  TOTAL_AMOUNT   │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Collaborator payloads are plain data here; `validation` checks them
//! before they become line items.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::quantity::Quantity;

// =============================================================================
// Unit of Measure
// =============================================================================

/// How a product is counted.
///
/// ## Quantity Rules
/// ```text
/// ┌──────────┬──────────────┬─────────┬───────────────────────────────┐
/// │ Unit     │ Entry        │ Minimum │ New line starts at            │
/// ├──────────┼──────────────┼─────────┼───────────────────────────────┤
/// │ UNIT     │ integer      │ 1       │ 1                             │
/// │ KG / L   │ one decimal  │ 0.1     │ 0.1                           │
/// │ BOX      │ boxes+loose  │ 1       │ 0 (pending box/unit entry)    │
/// └──────────┴──────────────┴─────────┴───────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitOfMeasure {
    /// Discrete units.
    #[default]
    Unit,
    /// Sold by weight.
    #[serde(rename = "KG")]
    Kilogram,
    /// Sold by volume.
    #[serde(rename = "L")]
    Liter,
    /// Sold by the box, optionally with loose units.
    Box,
}

impl UnitOfMeasure {
    /// True for weight and volume units, which accept one decimal.
    #[inline]
    pub const fn is_fractional(&self) -> bool {
        matches!(self, UnitOfMeasure::Kilogram | UnitOfMeasure::Liter)
    }

    #[inline]
    pub const fn is_box(&self) -> bool {
        matches!(self, UnitOfMeasure::Box)
    }

    /// Smallest quantity a committed line may hold.
    pub const fn min_quantity(&self) -> Quantity {
        if self.is_fractional() {
            Quantity::ONE_TENTH
        } else {
            Quantity::ONE
        }
    }

    /// Quantity of a freshly selected product.
    pub const fn default_quantity(&self) -> Quantity {
        match self {
            UnitOfMeasure::Box => Quantity::zero(),
            UnitOfMeasure::Kilogram | UnitOfMeasure::Liter => Quantity::ONE_TENTH,
            UnitOfMeasure::Unit => Quantity::ONE,
        }
    }

    /// Parses a typed quantity the way this unit expects it.
    pub fn parse_quantity(&self, raw: &str) -> Option<Quantity> {
        if self.is_fractional() {
            Quantity::parse_decimal(raw)
        } else {
            Quantity::parse_integral(raw)
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            UnitOfMeasure::Unit => "UNIT",
            UnitOfMeasure::Kilogram => "KG",
            UnitOfMeasure::Liter => "L",
            UnitOfMeasure::Box => "BOX",
        }
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for UnitOfMeasure {
    type Err = ValidationError;

    /// Accepts the canonical codes plus the Spanish labels the catalog
    /// backend has historically sent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "UNIT" | "UN" | "UNIDAD" => Ok(UnitOfMeasure::Unit),
            "KG" | "KILO" | "KILOGRAMO" => Ok(UnitOfMeasure::Kilogram),
            "L" | "LT" | "LITRO" => Ok(UnitOfMeasure::Liter),
            "BOX" | "CAJA" => Ok(UnitOfMeasure::Box),
            other => Err(ValidationError::InvalidFormat {
                field: "unit_of_measure".to_string(),
                reason: format!("unknown unit '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Discount Mode
// =============================================================================

/// Where discounts come from when totalling a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountMode {
    /// No discount at all.
    #[default]
    None,
    /// Sum of each line's own discount.
    PerItem,
    /// One manually entered amount for the whole sale.
    TotalAmount,
}

impl fmt::Display for DiscountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountMode::None => write!(f, "none"),
            DiscountMode::PerItem => write!(f, "per_item"),
            DiscountMode::TotalAmount => write!(f, "total_amount"),
        }
    }
}

impl FromStr for DiscountMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(DiscountMode::None),
            "per_item" | "item" => Ok(DiscountMode::PerItem),
            "total_amount" | "total" => Ok(DiscountMode::TotalAmount),
            other => Err(ValidationError::InvalidFormat {
                field: "discount_mode".to_string(),
                reason: format!(
                    "unknown mode '{}', valid options: none, per_item, total_amount",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Catalog Payloads
// =============================================================================

/// Packaging of a product sold by the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BoxSpec {
    /// How many loose units a full box holds.
    pub units_per_box: u32,
    /// Price of one full box.
    pub box_unit_price: Money,
}

/// A product as returned by the catalog lookup on selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub product_id: i64,
    pub name: String,
    pub unit_price: Money,
    pub unit_of_measure: UnitOfMeasure,
    /// Stock available for sale, in the product's unit.
    pub stock: Quantity,
    /// Present only for BOX products.
    #[serde(default)]
    pub box_spec: Option<BoxSpec>,
}

/// One lot of a product, as returned by the lot lookup.
///
/// When a lot is selected its price and remaining stock take precedence
/// over the product's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LotRecord {
    pub lot_id: i64,
    #[ts(as = "Option<String>")]
    pub expiry: Option<NaiveDate>,
    pub stock_remaining: Quantity,
    pub unit_price: Money,
}

impl LotRecord {
    /// True when the lot expires strictly before `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry.map(|date| date < today).unwrap_or(false)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_minimums_and_defaults() {
        assert_eq!(UnitOfMeasure::Kilogram.min_quantity(), Quantity::ONE_TENTH);
        assert_eq!(UnitOfMeasure::Liter.min_quantity(), Quantity::ONE_TENTH);
        assert_eq!(UnitOfMeasure::Unit.min_quantity(), Quantity::ONE);
        assert_eq!(UnitOfMeasure::Box.min_quantity(), Quantity::ONE);

        assert_eq!(UnitOfMeasure::Box.default_quantity(), Quantity::zero());
        assert_eq!(UnitOfMeasure::Kilogram.default_quantity(), Quantity::ONE_TENTH);
        assert_eq!(UnitOfMeasure::Unit.default_quantity(), Quantity::ONE);
    }

    #[test]
    fn test_parse_quantity_by_unit() {
        assert_eq!(
            UnitOfMeasure::Kilogram.parse_quantity("1.5"),
            Some(Quantity::from_tenths(15))
        );
        assert_eq!(
            UnitOfMeasure::Unit.parse_quantity("1.5"),
            Some(Quantity::from_units(1))
        );
    }

    #[test]
    fn test_unit_from_str() {
        assert_eq!("kg".parse::<UnitOfMeasure>().unwrap(), UnitOfMeasure::Kilogram);
        assert_eq!("Caja".parse::<UnitOfMeasure>().unwrap(), UnitOfMeasure::Box);
        assert_eq!("L".parse::<UnitOfMeasure>().unwrap(), UnitOfMeasure::Liter);
        assert!("gallon".parse::<UnitOfMeasure>().is_err());
    }

    #[test]
    fn test_unit_serde_codes() {
        assert_eq!(serde_json::to_string(&UnitOfMeasure::Kilogram).unwrap(), "\"KG\"");
        assert_eq!(serde_json::to_string(&UnitOfMeasure::Liter).unwrap(), "\"L\"");
        assert_eq!(serde_json::to_string(&UnitOfMeasure::Box).unwrap(), "\"BOX\"");
        assert_eq!(serde_json::to_string(&UnitOfMeasure::Unit).unwrap(), "\"UNIT\"");
    }

    #[test]
    fn test_discount_mode_default_and_parse() {
        assert_eq!(DiscountMode::default(), DiscountMode::None);
        assert_eq!("per_item".parse::<DiscountMode>().unwrap(), DiscountMode::PerItem);
        assert_eq!(
            serde_json::to_string(&DiscountMode::TotalAmount).unwrap(),
            "\"TOTAL_AMOUNT\""
        );
        assert!("half".parse::<DiscountMode>().is_err());
    }

    #[test]
    fn test_catalog_product_deserializes_camel_case() {
        let json = r#"{
            "productId": 7,
            "name": "Agua 500ml",
            "unitPrice": 3500,
            "unitOfMeasure": "UNIT",
            "stock": 24
        }"#;
        let product: CatalogProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.product_id, 7);
        assert_eq!(product.stock, Quantity::from_units(24));
        assert!(product.box_spec.is_none());
    }

    #[test]
    fn test_lot_expiry() {
        let lot = LotRecord {
            lot_id: 1,
            expiry: NaiveDate::from_ymd_opt(2026, 1, 31),
            stock_remaining: Quantity::from_units(5),
            unit_price: Money::from_minor(1000),
        };
        let feb = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let jan = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert!(lot.is_expired(feb));
        assert!(!lot.is_expired(jan));
    }
}
