use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{BridgeError, Result};

/// Default event type stamped on commerce fact rows that carry no explicit type.
pub const DEFAULT_EVENT_TYPE: &str = "commerce.purchases";

/// One identity record inside the XDM identity map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Identity value, e.g. email or CRM ID
    pub id: String,
    /// Identity namespace, e.g. "Email", "CRMID"
    pub namespace: String,
    /// Whether this is the primary identity
    pub primary: bool,
}

/// Identity namespaces to identity list. BTreeMap keeps serialization
/// deterministic across runs.
pub type IdentityMap = BTreeMap<String, Vec<Identity>>;

/// Normalized person name fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonName {
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

/// Basic person-level demographic details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Person {
    pub name: Option<PersonName>,
    pub gender: Option<String>,
}

/// Simple representation of a personal email address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalEmail {
    pub address: String,
    #[serde(rename = "type", default = "PersonalEmail::default_type")]
    pub email_type: String,
}

impl PersonalEmail {
    fn default_type() -> String {
        "personal".to_string()
    }

    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            email_type: Self::default_type(),
        }
    }
}

/// Loyalty membership details carried under the profile `_experience` block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loyalty {
    pub tier: Option<String>,
}

/// Custom profile fields, serialized under `_experience`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileExperience {
    pub loyalty: Loyalty,
}

/// Minimal XDM Individual Profile.
///
/// Every field beyond the identity map is optional; an empty identity map is
/// allowed. Construction cannot fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndividualProfile {
    /// Platform-assigned XDM ID
    #[serde(rename = "xdmId")]
    pub xdm_id: Option<String>,
    #[serde(rename = "identityMap")]
    pub identity_map: IdentityMap,
    pub person: Option<Person>,
    #[serde(rename = "personalEmail")]
    pub personal_email: Option<PersonalEmail>,
    #[serde(rename = "_experience")]
    pub experience: Option<ProfileExperience>,
}

/// Order details inside the commerce block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "orderID")]
    pub order_id: Option<String>,
    #[serde(rename = "priceTotal")]
    pub price_total: Option<f64>,
    #[serde(rename = "currencyCode")]
    pub currency_code: String,
}

/// Commerce metadata that can live on experience events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commerce {
    pub order: Option<Order>,
}

/// Channel details carried under the event `_experience` block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    #[serde(rename = "type")]
    pub channel_type: String,
}

/// Custom event fields, serialized under `_experience`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventExperience {
    pub channel: Channel,
}

/// Minimal XDM Experience Event.
///
/// The adapter only maps fields; `validate` enforces the shape's own
/// required fields (timestamp) before the record is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEvent {
    /// Unique event ID; empty string when the row carries neither an
    /// explicit event id nor an order id.
    #[serde(rename = "_id")]
    pub event_id: String,
    #[serde(rename = "eventType")]
    pub event_type: String,
    /// ISO timestamp; required for a valid event but left optional here so
    /// that mapping never fails
    pub timestamp: Option<String>,
    #[serde(rename = "identityMap")]
    pub identity_map: IdentityMap,
    pub commerce: Option<Commerce>,
    #[serde(rename = "_experience")]
    pub experience: Option<EventExperience>,
}

impl ExperienceEvent {
    /// Checks the fields the target schema requires but the adapter cannot
    /// supply on its own. Only an absent timestamp is rejected; the schema
    /// types it as a string without constraining its content.
    pub fn validate(&self) -> Result<()> {
        if self.timestamp.is_some() {
            Ok(())
        } else {
            Err(BridgeError::MissingField("timestamp".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_without_timestamp_fails_validation() {
        let event = ExperienceEvent {
            event_id: "".to_string(),
            event_type: DEFAULT_EVENT_TYPE.to_string(),
            timestamp: None,
            identity_map: IdentityMap::new(),
            commerce: None,
            experience: None,
        };
        assert!(event.validate().is_err());
    }

    #[test]
    fn event_with_empty_timestamp_passes_validation() {
        let event = ExperienceEvent {
            event_id: "".to_string(),
            event_type: DEFAULT_EVENT_TYPE.to_string(),
            timestamp: Some("".to_string()),
            identity_map: IdentityMap::new(),
            commerce: None,
            experience: None,
        };
        assert!(event.validate().is_ok());
    }

    #[test]
    fn event_serializes_with_external_aliases() {
        let event = ExperienceEvent {
            event_id: "ord-1".to_string(),
            event_type: "purchase".to_string(),
            timestamp: Some("2025-01-01T00:00:00Z".to_string()),
            identity_map: IdentityMap::new(),
            commerce: Some(Commerce {
                order: Some(Order {
                    order_id: Some("ord-1".to_string()),
                    price_total: Some(19.99),
                    currency_code: "USD".to_string(),
                }),
            }),
            experience: Some(EventExperience {
                channel: Channel {
                    channel_type: "web".to_string(),
                },
            }),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["_id"], "ord-1");
        assert_eq!(value["eventType"], "purchase");
        assert_eq!(value["_experience"]["channel"]["type"], "web");
        assert_eq!(value["commerce"]["order"]["orderID"], "ord-1");
        assert_eq!(value["commerce"]["order"]["currencyCode"], "USD");
    }

    #[test]
    fn profile_experience_serializes_loyalty_tier() {
        let profile = IndividualProfile {
            xdm_id: None,
            identity_map: IdentityMap::new(),
            person: None,
            personal_email: None,
            experience: Some(ProfileExperience {
                loyalty: Loyalty {
                    tier: Some("gold".to_string()),
                },
            }),
        };

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["_experience"]["loyalty"]["tier"], "gold");
        assert!(value["xdmId"].is_null());
    }
}
