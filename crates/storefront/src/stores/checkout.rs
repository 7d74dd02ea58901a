//! Checkout store: delivery, payment and discount state, checkout math and
//! order placement.

use rust_decimal::Decimal;
use tracing::{instrument, warn};
use velvet_tamarind_core::{AddressId, PickupPointId};

use crate::api::ApiClient;
use crate::api::envelope::{ApiMessage, CouponCheckRequest};
use crate::config::DeliveryConfig;
use crate::error::CheckoutError;
use crate::payment::{PaymentHandler, PaymentOutcome, PaymentRequest};
use crate::types::{
    CartItem, CheckoutTotals, Coupon, Customer, DeliveryZone, GiftCard, GuestAddress,
    OrderOutcome, OrderRequest, PaymentMethod, StoreSettings,
};

use super::cart::CartStore;

/// Orders placed through this SDK carry this source marker.
const ORDER_SOURCE: &str = "website";

/// Shipping weight in grams covered by the base charge. Only the excess is
/// billed per kilogram.
const BASE_CHARGE_WEIGHT: Decimal = Decimal::ONE_THOUSAND;

/// Checkout state for the session.
///
/// Direct inputs (zone, addresses, payment method, typed codes) are public
/// fields. Values that only the backend can vouch for (applied coupon, gift
/// card balance, redeemed reward points) are set through the actions that
/// validate them.
#[derive(Debug, Default)]
pub struct CheckoutStore {
    /// Delivery zone, inside-city home delivery by default.
    pub delivery_zone: DeliveryZone,
    /// Saved address of a signed-in customer.
    pub address_id: Option<AddressId>,
    /// Pickup point for pickup-point delivery.
    pub pickup_point_id: Option<PickupPointId>,
    /// Inline address for guest checkout.
    pub guest_address: Option<GuestAddress>,
    /// Selected payment method, cash on delivery by default.
    pub payment_method: PaymentMethod,
    /// Free-text note for the rider.
    pub shipping_note: Option<String>,
    /// Gift card number as typed by the customer.
    pub gift_card_number: String,
    /// Amount the customer wants drawn from the gift card.
    pub gift_amount: Decimal,
    /// Coupon code as typed by the customer.
    pub coupon_code: String,
    gift_card: Option<GiftCard>,
    applied_reward_points: i64,
    redeemed_amount: Decimal,
    coupon: Option<Coupon>,
}

impl CheckoutStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The validated gift card, when one has been looked up.
    #[must_use]
    pub fn gift_card(&self) -> Option<&GiftCard> {
        self.gift_card.as_ref()
    }

    /// The applied coupon, when one has been accepted.
    #[must_use]
    pub fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    /// Reward points applied to this order.
    #[must_use]
    pub fn applied_reward_points(&self) -> i64 {
        self.applied_reward_points
    }

    /// Money value of the applied reward points.
    #[must_use]
    pub fn redeemed_amount(&self) -> Decimal {
        self.redeemed_amount
    }

    // =========================================================================
    // Checkout Math
    // =========================================================================

    /// Base shipping charge for the selected zone. Zero when location-based
    /// shipping is disabled, and for pickup zones.
    #[must_use]
    pub fn shipping_charge(&self, config: &DeliveryConfig, settings: &StoreSettings) -> Decimal {
        if !config.location_based_shipping {
            return Decimal::ZERO;
        }
        settings.zone_base_charge(self.delivery_zone)
    }

    /// Weight surcharge for the part of `total_weight` past the first
    /// kilogram, billed at the zone's per-kilogram rate.
    #[must_use]
    pub fn extra_shipping_charge(
        &self,
        settings: &StoreSettings,
        total_weight: Decimal,
    ) -> Decimal {
        let excess = total_weight - BASE_CHARGE_WEIGHT;
        if excess <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        excess * settings.zone_per_kg_rate(self.delivery_zone) / Decimal::ONE_THOUSAND
    }

    /// Cart subtotal plus shipping charges, before deductions.
    #[must_use]
    pub fn total_amount(
        &self,
        cart: &CartStore,
        config: &DeliveryConfig,
        settings: &StoreSettings,
    ) -> Decimal {
        self.totals(cart, config, settings).total
    }

    /// What the customer pays after coupon, reward and gift deductions.
    #[must_use]
    pub fn payable_total(
        &self,
        cart: &CartStore,
        config: &DeliveryConfig,
        settings: &StoreSettings,
    ) -> Decimal {
        self.totals(cart, config, settings).payable
    }

    /// All derived checkout amounts for display.
    #[must_use]
    pub fn totals(
        &self,
        cart: &CartStore,
        config: &DeliveryConfig,
        settings: &StoreSettings,
    ) -> CheckoutTotals {
        let subtotal = cart.total_price();
        let shipping_charge = self.shipping_charge(config, settings);
        let extra_shipping_charge =
            self.extra_shipping_charge(settings, cart.total_shipping_weight());
        let total = subtotal + shipping_charge + extra_shipping_charge;

        let discount = self
            .coupon
            .as_ref()
            .map_or(Decimal::ZERO, |coupon| {
                coupon.discount + coupon.shipping_charge_discount
            });
        let gift_amount = if self.gift_card.is_some() {
            self.gift_amount
        } else {
            Decimal::ZERO
        };
        let payable =
            (total - discount - self.redeemed_amount - gift_amount).max(Decimal::ZERO);

        CheckoutTotals {
            subtotal,
            shipping_charge,
            extra_shipping_charge,
            total,
            discount,
            reward_amount: self.redeemed_amount,
            gift_amount,
            payable,
        }
    }

    // =========================================================================
    // Reward Points
    // =========================================================================

    /// Apply reward points against the order.
    ///
    /// # Errors
    ///
    /// Returns an error when the customer's balance is too low, when the
    /// store has no redemption rules, or when `points` falls outside the
    /// store's per-order bounds.
    pub fn apply_reward_points(
        &mut self,
        points: i64,
        customer: Option<&Customer>,
        settings: &StoreSettings,
    ) -> Result<(), CheckoutError> {
        let balance = customer.map_or(0, |c| c.total_reward_points);
        if points > balance {
            return Err(CheckoutError::RewardBalanceExceeded {
                requested: points,
                balance,
            });
        }

        let Some(rules) = &settings.reward_point else {
            return Err(CheckoutError::RewardsUnavailable);
        };
        if let Some(minimum) = rules.min_redeem_point
            && points < minimum
        {
            return Err(CheckoutError::RewardBelowMinimum { minimum });
        }
        if let Some(maximum) = rules.max_redeem_point
            && points > maximum
        {
            return Err(CheckoutError::RewardAboveMaximum { maximum });
        }

        self.applied_reward_points = points;
        self.redeemed_amount = rules.amount_for_unit_rp * Decimal::from(points);
        Ok(())
    }

    /// Take applied reward points back off the order.
    pub fn clear_reward_points(&mut self) {
        self.applied_reward_points = 0;
        self.redeemed_amount = Decimal::ZERO;
    }

    // =========================================================================
    // Coupon & Gift Card
    // =========================================================================

    /// Validate the typed coupon code against the order this checkout would
    /// produce, and store the granted discounts.
    ///
    /// Returns the backend's confirmation message for display.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::CouponRejected`] with the backend's message
    /// when the coupon does not apply, or an API error when the call fails.
    #[instrument(skip_all, fields(coupon_code = %self.coupon_code))]
    pub async fn apply_coupon(
        &mut self,
        api: &ApiClient,
        cart: &CartStore,
    ) -> Result<String, CheckoutError> {
        let items = self.order_items(cart);
        let request = CouponCheckRequest {
            address_id: self.address_id,
            items: &items,
            delivered_to: self.delivery_zone,
            shipping_note: self.shipping_note.as_deref(),
            source: ORDER_SOURCE,
            payment_method: self.payment_method,
            coupon_code: &self.coupon_code,
        };

        let response = api.check_coupon(&request).await?;
        let message = envelope_message(response.message.as_ref());
        if !response.status.is_success() {
            return Err(CheckoutError::CouponRejected(message));
        }

        self.coupon = Some(Coupon {
            discount: response.discount.unwrap_or_default(),
            shipping_charge_discount: response.shipping_charge_discount.unwrap_or_default(),
        });
        Ok(message)
    }

    /// Drop the applied coupon and the typed code.
    pub fn clear_coupon(&mut self) {
        self.coupon = None;
        self.coupon_code.clear();
    }

    /// Look up the typed gift card number and store its balance. Applying a
    /// card resets the gift amount; the customer chooses it afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::GiftCardRejected`] when the backend does not
    /// recognize the card, or an API error when the call fails.
    #[instrument(skip_all)]
    pub async fn check_gift_card(&mut self, api: &ApiClient) -> Result<(), CheckoutError> {
        let response = api.gift_card(&self.gift_card_number).await?;
        let message = envelope_message(response.message.as_ref());

        if !response.status.is_success() {
            self.gift_card = None;
            return Err(CheckoutError::GiftCardRejected(message));
        }
        match response.data {
            Some(card) => {
                self.gift_card = Some(card);
                self.gift_amount = Decimal::ZERO;
                Ok(())
            }
            None => {
                self.gift_card = None;
                Err(CheckoutError::GiftCardRejected(
                    "lookup returned no card".to_string(),
                ))
            }
        }
    }

    /// Drop the applied gift card, its typed number and the gift amount.
    pub fn clear_gift_card(&mut self) {
        self.gift_card = None;
        self.gift_card_number.clear();
        self.gift_amount = Decimal::ZERO;
    }

    // =========================================================================
    // Order Placement
    // =========================================================================

    /// Place the order and, for online payment methods, collect payment.
    ///
    /// The cart is cleared as soon as the backend accepts the order. From
    /// that point payment problems do not undo the order; they produce
    /// [`OrderOutcome::PlacedPaymentPending`] and payment can be retried out
    /// of band.
    ///
    /// # Errors
    ///
    /// Returns an error when local validation fails (missing pickup point,
    /// gift amount over the card balance), when the backend rejects the
    /// order, or when the API call fails.
    #[instrument(
        skip_all,
        fields(payment_method = %self.payment_method, delivery_zone = %self.delivery_zone)
    )]
    pub async fn place_order(
        &mut self,
        api: &ApiClient,
        cart: &mut CartStore,
        customer: Option<&Customer>,
        config: &DeliveryConfig,
        settings: &StoreSettings,
        payment: &impl PaymentHandler,
    ) -> Result<OrderOutcome, CheckoutError> {
        if config.custom_pickup_points
            && self.delivery_zone == DeliveryZone::PickupPoint
            && self.pickup_point_id.is_none()
        {
            return Err(CheckoutError::PickupPointRequired);
        }

        if let Some(card) = &self.gift_card
            && self.gift_amount > card.balance
        {
            return Err(CheckoutError::GiftAmountExceedsBalance {
                requested: self.gift_amount,
                balance: card.balance,
            });
        }

        let payable = self.payable_total(cart, config, settings);
        let has_gift_card = self.gift_card.is_some();
        let request = OrderRequest {
            address_id: self.address_id,
            items: self.order_items(cart),
            delivered_to: self.delivery_zone,
            shipping_note: self.shipping_note.clone(),
            source: ORDER_SOURCE,
            payment_method: self.payment_method,
            rp_redeemed: self.applied_reward_points,
            coupon_code: (!self.coupon_code.is_empty()).then(|| self.coupon_code.clone()),
            address: self.guest_address.clone(),
            pickup_point_id: self.pickup_point_id,
            has_gift_card,
            gift_card_number: has_gift_card.then(|| self.gift_card_number.clone()),
            gift_card_amount: has_gift_card.then_some(self.gift_amount),
            is_guest: customer.is_none(),
        };

        let response = api.place_order(&request).await?;
        if !response.status.is_success() {
            return Err(CheckoutError::OrderRejected(envelope_message(
                response.message.as_ref(),
            )));
        }
        let order_id = response.order_id.ok_or_else(|| {
            CheckoutError::OrderRejected("order id missing from response".to_string())
        })?;

        // The order exists from here on.
        cart.clear();

        if self.payment_method.is_cash() {
            return Ok(OrderOutcome::Placed { order_id });
        }

        let collection = PaymentRequest {
            order_id,
            method: self.payment_method,
            amount: payable,
        };
        match payment.collect(collection).await {
            Ok(PaymentOutcome::Settled) => Ok(OrderOutcome::PaymentSettled { order_id }),
            Ok(PaymentOutcome::Declined(reason)) => {
                warn!(%order_id, %reason, "Payment declined, order stays placed");
                Ok(OrderOutcome::PlacedPaymentPending { order_id })
            }
            Err(error) => {
                warn!(%order_id, %error, "Payment collection failed, order stays placed");
                Ok(OrderOutcome::PlacedPaymentPending { order_id })
            }
        }
    }

    /// Order lines for the backend, derived from resolvable cart lines only.
    fn order_items(&self, cart: &CartStore) -> Vec<CartItem> {
        cart.detailed_items()
            .iter()
            .map(|item| CartItem::new(item.product_id, item.variation_id, item.quantity))
            .collect()
    }
}

fn envelope_message(message: Option<&ApiMessage>) -> String {
    message.map(ApiMessage::first).unwrap_or_default().to_string()
}
