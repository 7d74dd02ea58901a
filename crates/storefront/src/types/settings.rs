//! Store settings types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::checkout::DeliveryZone;

/// Store-wide settings fetched from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Base shipping charge for inside-city delivery.
    pub inside_city_charge: Decimal,
    /// Base shipping charge for outside-city delivery.
    pub outside_city_charge: Decimal,
    /// Per-kilogram surcharge rate for inside-city delivery.
    pub inside_city_charge_per_kg: Decimal,
    /// Per-kilogram surcharge rate for outside-city delivery.
    pub outside_city_charge_per_kg: Decimal,
    /// Minimum order subtotal accepted by the store, when enforced.
    pub minimum_order_total: Option<Decimal>,
    /// Minutes a reserved cart is held, when the store reserves stock.
    pub cart_hold_minutes: Option<i64>,
    /// Whether the store collects an advance payment on delivery orders.
    #[serde(default)]
    pub advance_payment: bool,
    /// Amount collected in advance when advance payment is on.
    #[serde(default)]
    pub advance_amount: Decimal,
    /// Whether orders may exceed tracked stock.
    #[serde(default)]
    pub allow_overselling: bool,
    /// Reward-point redemption rules. `None` disables redemption.
    pub reward_point: Option<RewardPointRules>,
}

impl StoreSettings {
    /// Base shipping charge for a delivery zone. Pickup zones are free.
    #[must_use]
    pub fn zone_base_charge(&self, zone: DeliveryZone) -> Decimal {
        match zone {
            DeliveryZone::InsideCity => self.inside_city_charge,
            DeliveryZone::OutsideCity => self.outside_city_charge,
            DeliveryZone::StorePickup | DeliveryZone::PickupPoint => Decimal::ZERO,
        }
    }

    /// Per-kilogram surcharge rate for a delivery zone. Pickup zones are free.
    #[must_use]
    pub fn zone_per_kg_rate(&self, zone: DeliveryZone) -> Decimal {
        match zone {
            DeliveryZone::InsideCity => self.inside_city_charge_per_kg,
            DeliveryZone::OutsideCity => self.outside_city_charge_per_kg,
            DeliveryZone::StorePickup | DeliveryZone::PickupPoint => Decimal::ZERO,
        }
    }
}

/// Reward-point redemption rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardPointRules {
    /// Fewest points redeemable in one order, when enforced.
    pub min_redeem_point: Option<i64>,
    /// Most points redeemable in one order, when enforced.
    pub max_redeem_point: Option<i64>,
    /// Money value of a single reward point.
    pub amount_for_unit_rp: Decimal,
}
