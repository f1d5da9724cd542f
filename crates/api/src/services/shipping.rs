//! Shipping estimator.
//!
//! Pure functions: a postal-region (UF) code and an order total map to a
//! shipping fee and a lead time in days.

use rust_decimal::Decimal;
use serde::Serialize;

/// Lead time when the order qualifies for free shipping.
const FREE_SHIPPING_PRAZO: u32 = 5;
/// Lead time for nearby regions (SP, RJ, MG).
const NEARBY_PRAZO: u32 = 7;
/// Lead time everywhere else, and for unresolvable CEPs.
const DEFAULT_PRAZO: u32 = 10;

/// A shipping fee and lead time estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingQuote {
    pub frete: Decimal,
    /// Lead time in days.
    pub prazo: u32,
}

/// Orders at or above this total ship free.
#[must_use]
pub fn free_shipping_threshold() -> Decimal {
    Decimal::new(150, 0)
}

/// Whether an order total qualifies for free shipping.
#[must_use]
pub fn qualifies_for_free_shipping(total: Decimal) -> bool {
    total >= free_shipping_threshold()
}

/// Per-UF shipping fee; unlisted regions pay the 20.00 default.
fn regional_fee(uf: &str) -> Decimal {
    let cents = match uf {
        "SP" => 10_00,
        "RJ" => 12_00,
        "MG" => 15_00,
        "RS" | "DF" => 18_00,
        "PR" => 16_00,
        "SC" => 17_00,
        "GO" => 20_00,
        "BA" => 22_00,
        "PE" => 25_00,
        "CE" => 28_00,
        "AM" => 35_00,
        _ => 20_00,
    };
    Decimal::new(cents, 2)
}

/// Estimate the shipping fee and lead time for an order.
///
/// The free-shipping threshold applies before any region lookup. A `None`
/// region (unresolvable CEP) falls back to a flat 15.00 fee.
#[must_use]
pub fn quote(uf: Option<&str>, total: Decimal) -> ShippingQuote {
    if qualifies_for_free_shipping(total) {
        return ShippingQuote {
            frete: Decimal::ZERO,
            prazo: FREE_SHIPPING_PRAZO,
        };
    }

    let Some(uf) = uf else {
        return ShippingQuote {
            frete: Decimal::new(15_00, 2),
            prazo: DEFAULT_PRAZO,
        };
    };

    let prazo = if matches!(uf, "SP" | "RJ" | "MG") {
        NEARBY_PRAZO
    } else {
        DEFAULT_PRAZO
    };

    ShippingQuote {
        frete: regional_fee(uf),
        prazo,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal")
    }

    #[test]
    fn test_free_shipping_at_threshold() {
        let q = quote(Some("AM"), dec("150.00"));
        assert_eq!(q, ShippingQuote { frete: Decimal::ZERO, prazo: 5 });
    }

    #[test]
    fn test_free_shipping_above_threshold() {
        let q = quote(None, dec("160.00"));
        assert_eq!(q.frete, Decimal::ZERO);
        assert_eq!(q.prazo, 5);
    }

    #[test]
    fn test_regional_fees() {
        assert_eq!(quote(Some("SP"), dec("100.00")).frete, dec("10.00"));
        assert_eq!(quote(Some("RJ"), dec("100.00")).frete, dec("12.00"));
        assert_eq!(quote(Some("AM"), dec("100.00")).frete, dec("35.00"));
    }

    #[test]
    fn test_default_fee_for_unlisted_region() {
        let q = quote(Some("TO"), dec("100.00"));
        assert_eq!(q, ShippingQuote { frete: dec("20.00"), prazo: 10 });
    }

    #[test]
    fn test_nearby_regions_ship_faster() {
        assert_eq!(quote(Some("SP"), dec("100.00")).prazo, 7);
        assert_eq!(quote(Some("RJ"), dec("100.00")).prazo, 7);
        assert_eq!(quote(Some("MG"), dec("100.00")).prazo, 7);
        assert_eq!(quote(Some("RS"), dec("100.00")).prazo, 10);
    }

    #[test]
    fn test_unresolved_region_fallback() {
        let q = quote(None, dec("100.00"));
        assert_eq!(q, ShippingQuote { frete: dec("15.00"), prazo: 10 });
    }

    #[test]
    fn test_just_below_threshold_pays_shipping() {
        let q = quote(Some("SP"), dec("149.99"));
        assert_eq!(q.frete, dec("10.00"));
    }
}
