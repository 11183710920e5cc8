use serde::{Deserialize, Serialize};

/// Raw warehouse row as fetched from the row source. Any field may be
/// absent or null.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Fallback shape for a dimensional customer record. Only `customer_id` is
/// required; deliberately stricter than the canonical profile, which accepts
/// rows with no identity at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    /// Primary identifier for the customer
    pub customer_id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub loyalty_tier: Option<String>,
}

/// Fallback shape for a fact/event row coming from transactional tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerEvent {
    pub customer_id: String,
    pub event_type: String,
    pub event_timestamp: String,
    pub order_id: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
}
