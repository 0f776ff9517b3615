//! Listing entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use bazar_core::domain::{Category, ListingStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub category: String,
    pub cep: String,
    pub city: String,
    pub state: String,
    pub neighborhood: Option<String>,
    pub status: String,
    pub expires_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::UserId",
        to = "super::profile::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Profile,
    #[sea_orm(has_many = "super::listing_image::Entity")]
    Images,
    #[sea_orm(has_many = "super::like::Entity")]
    Likes,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::listing_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Listing.
impl From<Model> for bazar_core::domain::Listing {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            description: model.description,
            price: model.price,
            category: Category::parse_lossy(&model.category),
            cep: model.cep,
            city: model.city,
            state: model.state,
            neighborhood: model.neighborhood,
            status: ListingStatus::parse(&model.status),
            expires_at: model.expires_at.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Listing to SeaORM ActiveModel.
impl From<bazar_core::domain::Listing> for ActiveModel {
    fn from(listing: bazar_core::domain::Listing) -> Self {
        Self {
            id: Set(listing.id),
            user_id: Set(listing.user_id),
            title: Set(listing.title),
            description: Set(listing.description),
            price: Set(listing.price),
            category: Set(listing.category.as_str().to_string()),
            cep: Set(listing.cep),
            city: Set(listing.city),
            state: Set(listing.state),
            neighborhood: Set(listing.neighborhood),
            status: Set(listing.status.as_str().to_string()),
            expires_at: Set(listing.expires_at.into()),
            created_at: Set(listing.created_at.into()),
            updated_at: Set(listing.updated_at.into()),
        }
    }
}
