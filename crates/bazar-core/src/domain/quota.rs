//! Plan quotas - how many listings a tier may hold active at once, and
//! for how long a new listing stays up.

use chrono::TimeDelta;

use super::PlanTier;

/// Maximum number of concurrently active listings per tier.
pub fn active_listing_limit(plan: PlanTier) -> u64 {
    match plan {
        PlanTier::Free => 3,
        PlanTier::Basic => 10,
        PlanTier::Pro => 30,
        PlanTier::Premium => 999_999,
    }
}

/// How long a freshly created (or renewed) listing stays active.
pub fn listing_duration(plan: PlanTier) -> TimeDelta {
    match plan {
        PlanTier::Free => TimeDelta::hours(24),
        PlanTier::Basic => TimeDelta::hours(48),
        PlanTier::Pro => TimeDelta::hours(72),
        PlanTier::Premium => TimeDelta::days(7),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PlanTier; 4] = [
        PlanTier::Free,
        PlanTier::Basic,
        PlanTier::Pro,
        PlanTier::Premium,
    ];

    #[test]
    fn no_tier_is_more_restrictive_than_free() {
        for plan in ALL {
            assert!(active_listing_limit(plan) >= active_listing_limit(PlanTier::Free));
            assert!(listing_duration(plan) >= listing_duration(PlanTier::Free));
        }
    }

    #[test]
    fn limits_are_positive() {
        for plan in ALL {
            assert!(active_listing_limit(plan) > 0);
            assert!(listing_duration(plan) > TimeDelta::zero());
        }
    }

    #[test]
    fn free_tier_table() {
        assert_eq!(active_listing_limit(PlanTier::Free), 3);
        assert_eq!(listing_duration(PlanTier::Free), TimeDelta::hours(24));
    }
}
