use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Engagement event kinds captured against a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    View,
    WhatsappClick,
    Share,
}

impl EventType {
    /// Strict parse for request input.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "view" => Some(Self::View),
            "whatsapp_click" => Some(Self::WhatsappClick),
            "share" => Some(Self::Share),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::WhatsappClick => "whatsapp_click",
            Self::Share => "share",
        }
    }
}

/// Append-only engagement fact. Never updated or deleted; all displayed
/// counters are COUNT aggregates over these rows, which keeps concurrent
/// writers from losing updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub event_type: EventType,
    pub listing_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(event_type: EventType, listing_id: Option<Uuid>, user_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            listing_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_types_round_trip() {
        for et in [EventType::View, EventType::WhatsappClick, EventType::Share] {
            assert_eq!(EventType::parse(et.as_str()), Some(et));
        }
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        assert_eq!(EventType::parse("click"), None);
    }
}
