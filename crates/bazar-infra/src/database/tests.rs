#[cfg(test)]
mod tests {
    use crate::database::entity::listing;
    use crate::database::postgres_repo::PostgresListingRepository;
    use bazar_core::domain::{Category, Listing, ListingStatus};
    use bazar_core::ports::BaseRepository;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn listing_model(id: uuid::Uuid, user_id: uuid::Uuid) -> listing::Model {
        let now = chrono::Utc::now();
        listing::Model {
            id,
            user_id,
            title: "Sofá retrátil".to_owned(),
            description: None,
            price: Decimal::new(80000, 2),
            category: "moveis".to_owned(),
            cep: "01310100".to_owned(),
            city: "São Paulo".to_owned(),
            state: "SP".to_owned(),
            neighborhood: None,
            status: "active".to_owned(),
            expires_at: (now + chrono::TimeDelta::hours(24)).into(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_listing_by_id() {
        let listing_id = uuid::Uuid::new_v4();
        let user_id = uuid::Uuid::new_v4();

        // Mock the query expectation
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![listing_model(listing_id, user_id)]])
            .into_connection();

        let repo = PostgresListingRepository::new(std::sync::Arc::new(db));

        let result: Option<Listing> = repo.find_by_id(listing_id).await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.id, listing_id);
        assert_eq!(found.title, "Sofá retrátil");
        assert_eq!(found.category, Category::Moveis);
        assert_eq!(found.status, ListingStatus::Active);
    }

    #[tokio::test]
    async fn test_stored_status_converts_through_domain_enum() {
        let listing_id = uuid::Uuid::new_v4();
        let mut model = listing_model(listing_id, uuid::Uuid::new_v4());
        model.status = "sold".to_owned();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresListingRepository::new(std::sync::Arc::new(db));
        let found: Listing = repo.find_by_id(listing_id).await.unwrap().unwrap();

        assert_eq!(found.status, ListingStatus::Sold);
    }
}
