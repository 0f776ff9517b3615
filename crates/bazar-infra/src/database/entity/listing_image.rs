//! Listing image entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "listing_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub listing_id: Uuid,
    pub image_url: String,
    pub thumbnail_url: Option<String>,
    pub position: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::listing::Entity",
        from = "Column::ListingId",
        to = "super::listing::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Listing,
}

impl Related<super::listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for bazar_core::domain::ListingImage {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            listing_id: model.listing_id,
            image_url: model.image_url,
            thumbnail_url: model.thumbnail_url,
            position: model.position,
            created_at: model.created_at.into(),
        }
    }
}

impl From<bazar_core::domain::ListingImage> for ActiveModel {
    fn from(image: bazar_core::domain::ListingImage) -> Self {
        Self {
            id: Set(image.id),
            listing_id: Set(image.listing_id),
            image_url: Set(image.image_url),
            thumbnail_url: Set(image.thumbnail_url),
            position: Set(image.position),
            created_at: Set(image.created_at.into()),
        }
    }
}
