//! SeaORM entities and their conversions to and from domain types.

pub mod analytics_event;
pub mod like;
pub mod listing;
pub mod listing_image;
pub mod profile;
