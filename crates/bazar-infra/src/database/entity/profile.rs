//! Profile entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use bazar_core::domain::{AccountStatus, PlanTier};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub avatar_url: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub plan: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::listing::Entity")]
    Listings,
}

impl Related<super::listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Profile.
impl From<Model> for bazar_core::domain::Profile {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            phone: model.phone,
            avatar_url: model.avatar_url,
            city: model.city,
            state: model.state,
            plan: PlanTier::parse(&model.plan),
            status: AccountStatus::parse(&model.status),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Profile to SeaORM ActiveModel.
impl From<bazar_core::domain::Profile> for ActiveModel {
    fn from(profile: bazar_core::domain::Profile) -> Self {
        Self {
            id: Set(profile.id),
            username: Set(profile.username),
            email: Set(profile.email),
            password_hash: Set(profile.password_hash),
            phone: Set(profile.phone),
            avatar_url: Set(profile.avatar_url),
            city: Set(profile.city),
            state: Set(profile.state),
            plan: Set(profile.plan.as_str().to_string()),
            status: Set(profile.status.as_str().to_string()),
            created_at: Set(profile.created_at.into()),
            updated_at: Set(profile.updated_at.into()),
        }
    }
}
