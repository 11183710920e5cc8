//! Adapters that convert warehouse (dbt/Snowflake) rows into XDM shapes.
//!
//! Mapping never fails: missing fields become `None` or documented
//! defaults. Schema-level validation happens later in the fallback chain.

use serde_json::Value;

use crate::records::RawRecord;
use crate::xdm::{
    Channel, Commerce, EventExperience, ExperienceEvent, Identity, IdentityMap,
    IndividualProfile, Loyalty, Order, Person, PersonName, PersonalEmail, ProfileExperience,
    DEFAULT_EVENT_TYPE,
};

/// Namespace for CRM-assigned customer identifiers.
pub const CRM_ID_NAMESPACE: &str = "CRMID";
/// Namespace for email-address identities.
pub const EMAIL_NAMESPACE: &str = "Email";

/// Reads a row field as a non-empty string, stringifying bare numbers the
/// way the warehouse export sometimes leaves ids.
fn string_field(row: &RawRecord, key: &str) -> Option<String> {
    match row.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a row field as a string, keeping empty strings. The canonical
/// event schema accepts a present-but-empty timestamp.
fn literal_string_field(row: &RawRecord, key: &str) -> Option<String> {
    match row.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn number_field(row: &RawRecord, key: &str) -> Option<f64> {
    row.get(key).and_then(Value::as_f64)
}

/// Groups a flat identity list into the namespace-keyed identity map.
fn build_identity_map(identities: Vec<Identity>) -> IdentityMap {
    let mut identity_map = IdentityMap::new();
    for ident in identities {
        identity_map
            .entry(ident.namespace.clone())
            .or_insert_with(Vec::new)
            .push(ident);
    }
    identity_map
}

/// Maps a customer dimension row into an XDM Individual Profile.
///
/// Builds at most two identities: a CRMID identity from `customer_id`
/// (always primary when present) and an Email identity from `email`,
/// primary only when it is the first identity. All other fields are
/// optional; the conversion always succeeds.
pub fn row_to_profile(row: &RawRecord) -> IndividualProfile {
    let customer_id = string_field(row, "customer_id");
    let email = string_field(row, "email");

    let mut identities: Vec<Identity> = Vec::new();

    if let Some(customer_id) = customer_id {
        identities.push(Identity {
            id: customer_id,
            namespace: CRM_ID_NAMESPACE.to_string(),
            primary: true,
        });
    }

    if let Some(email) = email.clone() {
        // First identity added wins the primary flag
        let primary = identities.is_empty();
        identities.push(Identity {
            id: email,
            namespace: EMAIL_NAMESPACE.to_string(),
            primary,
        });
    }

    let person = Person {
        name: Some(PersonName {
            first_name: string_field(row, "first_name"),
            last_name: string_field(row, "last_name"),
        }),
        gender: None,
    };

    IndividualProfile {
        xdm_id: None,
        identity_map: build_identity_map(identities),
        person: Some(person),
        personal_email: email.map(PersonalEmail::new),
        experience: Some(ProfileExperience {
            loyalty: Loyalty {
                tier: string_field(row, "loyalty_tier"),
            },
        }),
    }
}

/// Maps a transactional fact row into an XDM Experience Event.
///
/// Event id resolves from `event_id`, then `order_id`, then empty string.
/// Event type, currency and channel type fall back to fixed defaults. The
/// timestamp is mapped as-is; a missing timestamp makes the resulting event
/// fail its own validation downstream.
pub fn row_to_event(row: &RawRecord) -> ExperienceEvent {
    let customer_id = string_field(row, "customer_id");
    let email = string_field(row, "email");

    let mut identities: Vec<Identity> = Vec::new();

    if let Some(customer_id) = customer_id {
        identities.push(Identity {
            id: customer_id,
            namespace: CRM_ID_NAMESPACE.to_string(),
            primary: true,
        });
    }

    if let Some(email) = email {
        // Same first-wins rule as the profile path
        let primary = identities.is_empty();
        identities.push(Identity {
            id: email,
            namespace: EMAIL_NAMESPACE.to_string(),
            primary,
        });
    }

    let order_id = string_field(row, "order_id");

    let commerce = Commerce {
        order: Some(Order {
            order_id: order_id.clone(),
            price_total: number_field(row, "amount"),
            currency_code: string_field(row, "currency").unwrap_or_else(|| "USD".to_string()),
        }),
    };

    ExperienceEvent {
        event_id: string_field(row, "event_id").or(order_id).unwrap_or_default(),
        event_type: string_field(row, "event_type")
            .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
        timestamp: literal_string_field(row, "event_timestamp"),
        identity_map: build_identity_map(identities),
        commerce: Some(commerce),
        experience: Some(EventExperience {
            channel: Channel {
                channel_type: string_field(row, "channel_type")
                    .unwrap_or_else(|| "web".to_string()),
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> RawRecord {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn profile_with_customer_id_only_has_primary_crmid() {
        let profile = row_to_profile(&row(json!({"customer_id": "123"})));

        assert_eq!(profile.identity_map.len(), 1);
        let crm = &profile.identity_map[CRM_ID_NAMESPACE];
        assert_eq!(crm.len(), 1);
        assert_eq!(crm[0].id, "123");
        assert!(crm[0].primary);
        assert!(profile.personal_email.is_none());
    }

    #[test]
    fn profile_with_both_ids_marks_only_crmid_primary() {
        let profile = row_to_profile(&row(json!({
            "customer_id": 123,
            "email": "a@example.com"
        })));

        assert_eq!(profile.identity_map.len(), 2);
        assert!(profile.identity_map[CRM_ID_NAMESPACE][0].primary);
        assert!(!profile.identity_map[EMAIL_NAMESPACE][0].primary);
        // Numeric customer ids are stringified
        assert_eq!(profile.identity_map[CRM_ID_NAMESPACE][0].id, "123");
    }

    #[test]
    fn profile_with_email_only_marks_email_primary() {
        let profile = row_to_profile(&row(json!({"email": "a@example.com"})));

        assert_eq!(profile.identity_map.len(), 1);
        assert!(profile.identity_map[EMAIL_NAMESPACE][0].primary);
        assert_eq!(
            profile.personal_email.as_ref().unwrap().address,
            "a@example.com"
        );
    }

    #[test]
    fn profile_with_no_identities_still_succeeds() {
        let profile = row_to_profile(&row(json!({"first_name": "Ada"})));

        assert!(profile.identity_map.is_empty());
        let name = profile.person.unwrap().name.unwrap();
        assert_eq!(name.first_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn profile_carries_loyalty_tier() {
        let profile = row_to_profile(&row(json!({
            "customer_id": "9",
            "loyalty_tier": "gold"
        })));

        let tier = profile.experience.unwrap().loyalty.tier;
        assert_eq!(tier.as_deref(), Some("gold"));
    }

    #[test]
    fn event_id_prefers_event_id_then_order_id_then_empty() {
        let explicit = row_to_event(&row(json!({"event_id": "ev-1", "order_id": "ord-1"})));
        assert_eq!(explicit.event_id, "ev-1");

        let from_order = row_to_event(&row(json!({"order_id": "ord-1"})));
        assert_eq!(from_order.event_id, "ord-1");

        let neither = row_to_event(&row(json!({"customer_id": "1"})));
        assert_eq!(neither.event_id, "");
    }

    #[test]
    fn event_defaults_type_currency_and_channel() {
        let event = row_to_event(&row(json!({
            "customer_id": "1",
            "event_timestamp": "2025-01-01T00:00:00Z"
        })));

        assert_eq!(event.event_type, DEFAULT_EVENT_TYPE);
        let order = event.commerce.unwrap().order.unwrap();
        assert_eq!(order.currency_code, "USD");
        assert_eq!(event.experience.unwrap().channel.channel_type, "web");
    }

    #[test]
    fn event_keeps_empty_timestamp_as_present() {
        let event = row_to_event(&row(json!({
            "customer_id": "1",
            "event_type": "purchase",
            "event_timestamp": ""
        })));

        assert_eq!(event.timestamp.as_deref(), Some(""));
        assert!(event.validate().is_ok());
    }

    #[test]
    fn event_identity_rule_matches_profile_rule() {
        let event = row_to_event(&row(json!({
            "email": "a@example.com",
            "event_timestamp": "2025-01-01T00:00:00Z"
        })));

        assert!(event.identity_map[EMAIL_NAMESPACE][0].primary);

        let event = row_to_event(&row(json!({
            "customer_id": "1",
            "email": "a@example.com",
            "event_timestamp": "2025-01-01T00:00:00Z"
        })));

        assert!(event.identity_map[CRM_ID_NAMESPACE][0].primary);
        assert!(!event.identity_map[EMAIL_NAMESPACE][0].primary);
    }

    #[test]
    fn event_maps_amount_and_order_fields() {
        let event = row_to_event(&row(json!({
            "customer_id": "1",
            "order_id": "ord-7",
            "amount": 42.5,
            "currency": "EUR",
            "event_timestamp": "2025-01-01T00:00:00Z"
        })));

        let order = event.commerce.unwrap().order.unwrap();
        assert_eq!(order.order_id.as_deref(), Some("ord-7"));
        assert_eq!(order.price_total, Some(42.5));
        assert_eq!(order.currency_code, "EUR");
    }
}
