use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

use super::quota;
use super::{Category, PlanTier};

/// Listing status lifecycle.
///
/// `active ⇄ sold` (owner toggle), `active → expired` (deadline),
/// `active|expired → active` (renew), `* → removed` (terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Sold,
    Expired,
    Removed,
}

impl ListingStatus {
    /// Lenient parse for stored values. Unknown strings read as removed,
    /// which keeps them out of every feed.
    pub fn parse(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "sold" => Self::Sold,
            "expired" => Self::Expired,
            _ => Self::Removed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Sold => "sold",
            Self::Expired => "expired",
            Self::Removed => "removed",
        }
    }
}

/// Postal-code-derived location attached to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub cep: String,
    pub city: String,
    pub state: String,
    pub neighborhood: Option<String>,
}

/// Validated input for creating a listing.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Category,
    pub location: Location,
}

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 80;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Listing entity - one time-limited classified ad.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Category,
    pub cep: String,
    pub city: String,
    pub state: String,
    pub neighborhood: Option<String>,
    pub status: ListingStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Create a new active listing owned by `user_id`. The expiration
    /// deadline comes from the owner's plan.
    pub fn create(user_id: Uuid, input: NewListing, plan: PlanTier) -> Result<Self, DomainError> {
        let now = Utc::now();
        let listing = Self {
            id: Uuid::new_v4(),
            user_id,
            title: input.title,
            description: input.description,
            price: input.price,
            category: input.category,
            cep: input.location.cep,
            city: input.location.city,
            state: input.location.state,
            neighborhood: input.location.neighborhood,
            status: ListingStatus::Active,
            expires_at: now + quota::listing_duration(plan),
            created_at: now,
            updated_at: now,
        };
        listing.validate()?;
        Ok(listing)
    }

    /// Field validation, run on create and again after partial updates.
    pub fn validate(&self) -> Result<(), DomainError> {
        let title_len = self.title.chars().count();
        if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&title_len) {
            return Err(DomainError::Validation(format!(
                "title must be between {TITLE_MIN_CHARS} and {TITLE_MAX_CHARS} characters"
            )));
        }
        if let Some(desc) = &self.description {
            if desc.chars().count() > DESCRIPTION_MAX_CHARS {
                return Err(DomainError::Validation(format!(
                    "description must be at most {DESCRIPTION_MAX_CHARS} characters"
                )));
            }
        }
        if self.price <= Decimal::ZERO {
            return Err(DomainError::Validation(
                "price must be greater than zero".to_string(),
            ));
        }
        if self.cep.chars().filter(char::is_ascii_digit).count() != 8 {
            return Err(DomainError::Validation(
                "cep must contain exactly 8 digits".to_string(),
            ));
        }
        Ok(())
    }

    /// True once the deadline has passed, whatever the stored status says.
    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Status as a viewer should see it: an active listing past its
    /// deadline reads as expired even before the sweep flips the row.
    pub fn effective_status(&self, now: DateTime<Utc>) -> ListingStatus {
        if self.status == ListingStatus::Active && self.is_past_deadline(now) {
            ListingStatus::Expired
        } else {
            self.status
        }
    }

    /// Owner toggle: active → sold, or sold → active (un-sell).
    /// Un-selling is an explicit allowance and performs no quota check.
    pub fn toggle_sold(&mut self) -> Result<ListingStatus, DomainError> {
        match self.status {
            ListingStatus::Active => {
                self.status = ListingStatus::Sold;
            }
            ListingStatus::Sold => {
                self.status = ListingStatus::Active;
            }
            other => {
                return Err(DomainError::InvalidTransition {
                    from: other.as_str(),
                    to: "sold",
                });
            }
        }
        self.touch();
        Ok(self.status)
    }

    /// Deadline transition: active → expired. Valid only once the
    /// deadline has actually passed.
    pub fn expire(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status != ListingStatus::Active {
            return Err(DomainError::InvalidTransition {
                from: self.status.as_str(),
                to: "expired",
            });
        }
        if !self.is_past_deadline(now) {
            return Err(DomainError::Validation(
                "listing has not reached its deadline".to_string(),
            ));
        }
        self.status = ListingStatus::Expired;
        self.touch();
        Ok(())
    }

    /// Owner renewal: resets the deadline from the owner's current plan
    /// and reactivates. Valid from active (extend) or expired (resurrect);
    /// never from removed, and a sold listing must be un-sold first.
    pub fn renew(&mut self, plan: PlanTier) -> Result<(), DomainError> {
        match self.status {
            ListingStatus::Active | ListingStatus::Expired => {
                self.status = ListingStatus::Active;
                self.expires_at = Utc::now() + quota::listing_duration(plan);
                self.touch();
                Ok(())
            }
            other => Err(DomainError::InvalidTransition {
                from: other.as_str(),
                to: "active",
            }),
        }
    }

    /// Terminal withdrawal. No outgoing transitions from removed.
    pub fn remove(&mut self) -> Result<(), DomainError> {
        if self.status == ListingStatus::Removed {
            return Err(DomainError::InvalidTransition {
                from: "removed",
                to: "removed",
            });
        }
        self.status = ListingStatus::Removed;
        self.touch();
        Ok(())
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn input() -> NewListing {
        NewListing {
            title: "Bicicleta aro 29".to_string(),
            description: Some("Pouco usada".to_string()),
            price: Decimal::new(45000, 2),
            category: Category::Esportes,
            location: Location {
                cep: "01310100".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                neighborhood: Some("Bela Vista".to_string()),
            },
        }
    }

    fn listing() -> Listing {
        Listing::create(Uuid::new_v4(), input(), PlanTier::Free).unwrap()
    }

    #[test]
    fn create_sets_active_with_future_deadline() {
        let l = listing();
        assert_eq!(l.status, ListingStatus::Active);
        assert!(l.expires_at > Utc::now());
        assert_eq!(l.expires_at - l.created_at, TimeDelta::hours(24));
    }

    #[test]
    fn premium_listings_last_a_week() {
        let l = Listing::create(Uuid::new_v4(), input(), PlanTier::Premium).unwrap();
        assert_eq!(l.expires_at - l.created_at, TimeDelta::days(7));
    }

    #[test]
    fn short_title_is_rejected() {
        let mut i = input();
        i.title = "Bike".to_string();
        assert!(matches!(
            Listing::create(Uuid::new_v4(), i, PlanTier::Free),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let mut i = input();
        i.price = Decimal::ZERO;
        assert!(Listing::create(Uuid::new_v4(), i, PlanTier::Free).is_err());
    }

    #[test]
    fn sold_toggle_round_trips() {
        let mut l = listing();
        assert_eq!(l.toggle_sold().unwrap(), ListingStatus::Sold);
        assert_eq!(l.toggle_sold().unwrap(), ListingStatus::Active);
    }

    #[test]
    fn expired_listing_cannot_be_marked_sold() {
        let mut l = listing();
        l.status = ListingStatus::Expired;
        assert!(matches!(
            l.toggle_sold(),
            Err(DomainError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn expire_requires_past_deadline() {
        let mut l = listing();
        assert!(l.expire(Utc::now()).is_err());
        let past_deadline = l.expires_at + TimeDelta::seconds(1);
        l.expire(past_deadline).unwrap();
        assert_eq!(l.status, ListingStatus::Expired);
    }

    #[test]
    fn effective_status_is_lazy_expiration() {
        let l = listing();
        assert_eq!(l.effective_status(Utc::now()), ListingStatus::Active);
        assert_eq!(
            l.effective_status(l.expires_at + TimeDelta::seconds(1)),
            ListingStatus::Expired
        );
    }

    #[test]
    fn renew_resurrects_expired_listing() {
        let mut l = listing();
        let past = l.expires_at + TimeDelta::seconds(1);
        l.expire(past).unwrap();
        l.renew(PlanTier::Free).unwrap();
        assert_eq!(l.status, ListingStatus::Active);
        assert!(l.expires_at > Utc::now());
    }

    #[test]
    fn removed_is_terminal() {
        let mut l = listing();
        l.remove().unwrap();
        assert!(l.toggle_sold().is_err());
        assert!(l.renew(PlanTier::Free).is_err());
        assert!(l.remove().is_err());
    }

    #[test]
    fn unknown_stored_status_reads_as_removed() {
        assert_eq!(ListingStatus::parse("archived"), ListingStatus::Removed);
    }
}
