//! Checkout, delivery and order types.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use velvet_tamarind_core::{AddressId, Email, OrderId, PickupPointId};

use super::cart::CartItem;

// =============================================================================
// Delivery & Payment
// =============================================================================

/// Where an order is delivered. Drives the shipping-charge step function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryZone {
    /// Home delivery inside the city.
    #[default]
    InsideCity,
    /// Home delivery outside the city.
    OutsideCity,
    /// Customer collects from a store branch. No shipping charge.
    StorePickup,
    /// Customer collects from a partner pickup point. No shipping charge.
    PickupPoint,
}

impl DeliveryZone {
    /// Whether this zone is a pickup (no shipping charge applies).
    #[must_use]
    pub const fn is_pickup(self) -> bool {
        matches!(self, Self::StorePickup | Self::PickupPoint)
    }
}

impl fmt::Display for DeliveryZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InsideCity => "inside_city",
            Self::OutsideCity => "outside_city",
            Self::StorePickup => "store_pickup",
            Self::PickupPoint => "pickup_point",
        };
        write!(f, "{s}")
    }
}

/// How an order is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash on delivery. The only method settled without a payment handler.
    #[default]
    #[serde(rename = "cod")]
    CashOnDelivery,
    /// Mobile wallet payment.
    #[serde(rename = "wallet")]
    Wallet,
    /// Card payment.
    #[serde(rename = "card")]
    Card,
}

impl PaymentMethod {
    /// All methods, in display order.
    pub const ALL: [Self; 3] = [Self::CashOnDelivery, Self::Wallet, Self::Card];

    /// Whether this method collects cash at delivery time.
    #[must_use]
    pub const fn is_cash(self) -> bool {
        matches!(self, Self::CashOnDelivery)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "Cash on Delivery",
            Self::Wallet => "Mobile Wallet",
            Self::Card => "Credit / Debit Card",
        }
    }

    /// Wire value ("cod", "wallet", "card").
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "cod",
            Self::Wallet => "wallet",
            Self::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_param())
    }
}

// =============================================================================
// Coupon & Gift Card
// =============================================================================

/// A coupon as applied to the session. Applied and cleared as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Discount on the order subtotal.
    pub discount: Decimal,
    /// Discount on the shipping charge.
    pub shipping_charge_discount: Decimal,
}

/// A gift card looked up by number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCard {
    /// Remaining balance on the card.
    pub balance: Decimal,
}

// =============================================================================
// Order Types
// =============================================================================

/// Delivery address supplied inline by a guest customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestAddress {
    /// Recipient name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Contact email, when given.
    pub email: Option<Email>,
    /// Street address.
    pub address: String,
}

/// The order payload posted to the backend.
///
/// Gift card fields keep the backend's `gc_` wire names.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    /// Saved address of a signed-in customer.
    pub address_id: Option<AddressId>,
    /// Order lines.
    pub items: Vec<CartItem>,
    /// Delivery zone.
    pub delivered_to: DeliveryZone,
    /// Free-text note for the rider.
    pub shipping_note: Option<String>,
    /// Order source, always "website" for this SDK.
    pub source: &'static str,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Reward points redeemed against the order.
    pub rp_redeemed: i64,
    /// Applied coupon code, when any.
    pub coupon_code: Option<String>,
    /// Inline address for guest orders.
    pub address: Option<GuestAddress>,
    /// Pickup point for pickup-point delivery.
    #[serde(rename = "pickup_location_id")]
    pub pickup_point_id: Option<PickupPointId>,
    /// Whether a gift card pays part of the order.
    pub has_gift_card: bool,
    /// Gift card number, when one is applied.
    #[serde(rename = "gc_card_no")]
    pub gift_card_number: Option<String>,
    /// Amount drawn from the gift card.
    #[serde(rename = "gc_payment_amount")]
    pub gift_card_amount: Option<Decimal>,
    /// Whether the order is placed without a customer account.
    pub is_guest: bool,
}

/// What happened when an order was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderOutcome {
    /// Order placed; payment collected at delivery.
    Placed { order_id: OrderId },
    /// Order placed and online payment settled.
    PaymentSettled { order_id: OrderId },
    /// Order placed but online payment did not settle; it can be retried.
    PlacedPaymentPending { order_id: OrderId },
}

impl OrderOutcome {
    /// The placed order's ID.
    #[must_use]
    pub const fn order_id(self) -> OrderId {
        match self {
            Self::Placed { order_id }
            | Self::PaymentSettled { order_id }
            | Self::PlacedPaymentPending { order_id } => order_id,
        }
    }
}

/// Derived checkout totals for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckoutTotals {
    /// Sum of cart line subtotals.
    pub subtotal: Decimal,
    /// Base shipping charge for the delivery zone.
    pub shipping_charge: Decimal,
    /// Weight surcharge past the free-shipping threshold.
    pub extra_shipping_charge: Decimal,
    /// Subtotal plus shipping charges.
    pub total: Decimal,
    /// Coupon discount (order plus shipping parts).
    pub discount: Decimal,
    /// Amount covered by redeemed reward points.
    pub reward_amount: Decimal,
    /// Amount drawn from the gift card.
    pub gift_amount: Decimal,
    /// What the customer actually pays, floored at zero.
    pub payable: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_zone_wire_values() {
        assert_eq!(
            serde_json::to_string(&DeliveryZone::InsideCity).unwrap(),
            "\"inside_city\""
        );
        assert_eq!(
            serde_json::to_string(&DeliveryZone::PickupPoint).unwrap(),
            "\"pickup_point\""
        );
        let zone: DeliveryZone = serde_json::from_str("\"outside_city\"").unwrap();
        assert_eq!(zone, DeliveryZone::OutsideCity);
    }

    #[test]
    fn test_payment_method_wire_values() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap(),
            "\"cod\""
        );
        assert_eq!(PaymentMethod::Wallet.to_string(), "wallet");
        assert!(PaymentMethod::CashOnDelivery.is_cash());
        assert!(!PaymentMethod::Card.is_cash());
    }

    #[test]
    fn test_pickup_zones_are_pickup() {
        assert!(DeliveryZone::StorePickup.is_pickup());
        assert!(DeliveryZone::PickupPoint.is_pickup());
        assert!(!DeliveryZone::InsideCity.is_pickup());
        assert!(!DeliveryZone::OutsideCity.is_pickup());
    }

    #[test]
    fn test_order_outcome_order_id() {
        let outcome = OrderOutcome::PlacedPaymentPending {
            order_id: 77.into(),
        };
        assert_eq!(outcome.order_id().as_i64(), 77);
    }

    #[test]
    fn test_order_request_wire_names() {
        let request = OrderRequest {
            address_id: Some(AddressId::new(4)),
            items: vec![CartItem::new(1.into(), 11.into(), 2)],
            delivered_to: DeliveryZone::PickupPoint,
            shipping_note: None,
            source: "website",
            payment_method: PaymentMethod::Wallet,
            rp_redeemed: 50,
            coupon_code: None,
            address: None,
            pickup_point_id: Some(PickupPointId::new(8)),
            has_gift_card: true,
            gift_card_number: Some("GC-1001".to_string()),
            gift_card_amount: Some(Decimal::from(200)),
            is_guest: false,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["pickup_location_id"], 8);
        assert_eq!(value["gc_card_no"], "GC-1001");
        assert_eq!(value["gc_payment_amount"], "200");
        assert_eq!(value["payment_method"], "wallet");
        assert_eq!(value["rp_redeemed"], 50);
    }
}
