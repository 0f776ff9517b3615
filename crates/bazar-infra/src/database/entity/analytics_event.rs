//! Analytics event entity for SeaORM. Append-only; rows are never
//! updated or deleted by application code.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use bazar_core::domain::EventType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "analytics_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_type: String,
    pub listing_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for bazar_core::domain::AnalyticsEvent {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            // Rows are only ever written from typed values; the fallback
            // cannot trigger for data this code produced.
            event_type: EventType::parse(&model.event_type).unwrap_or(EventType::View),
            listing_id: model.listing_id,
            user_id: model.user_id,
            created_at: model.created_at.into(),
        }
    }
}

impl From<bazar_core::domain::AnalyticsEvent> for ActiveModel {
    fn from(event: bazar_core::domain::AnalyticsEvent) -> Self {
        Self {
            id: Set(event.id),
            event_type: Set(event.event_type.as_str().to_string()),
            listing_id: Set(event.listing_id),
            user_id: Set(event.user_id),
            created_at: Set(event.created_at.into()),
        }
    }
}
