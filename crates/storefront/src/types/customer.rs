//! Customer profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use velvet_tamarind_core::{AddressId, CustomerId, Email};

/// A saved delivery address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// Backend address ID.
    pub id: AddressId,
    /// Label ("Home", "Office"), when set.
    pub name: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Street address.
    pub address: String,
    /// Whether this is the customer's default address.
    #[serde(default)]
    pub is_default: bool,
}

/// A signed-in customer's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Backend customer ID.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: Email,
    /// Reward-point balance.
    #[serde(rename = "total_rp", default)]
    pub total_reward_points: i64,
    /// Saved delivery addresses.
    #[serde(default)]
    pub addresses: Vec<Address>,
    /// Account creation time.
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// The customer's default address, falling back to the first saved one.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|a| a.is_default)
            .or_else(|| self.addresses.first())
    }
}
