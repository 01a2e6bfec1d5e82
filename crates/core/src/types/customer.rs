//! Customer accounts and their pricing tiers.
//!
//! Both are provisioned by the back office and only ever read here.

use serde::{Deserialize, Serialize};

use super::id::{CustomerId, PriceGroupId};
use super::user::UserId;

/// A store or account that orders are placed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// User who owns this customer record, if any.
    pub user_id: Option<UserId>,
    /// Assigned price group. `None` means the baseline group.
    pub price_group_id: Option<PriceGroupId>,
}

impl Customer {
    /// The price group that applies to this customer.
    #[must_use]
    pub fn effective_price_group(&self) -> PriceGroupId {
        self.price_group_id.unwrap_or(PriceGroupId::BASELINE)
    }
}

/// A named pricing tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceGroup {
    /// Unique price group ID.
    pub id: PriceGroupId,
    /// Display name (e.g., "Retail", "Wholesale").
    pub name: Option<String>,
    /// Raw name of the product price field this group reads.
    ///
    /// Kept unparsed so that a malformed value surfaces where it is used.
    pub price_column: Option<String>,
}
