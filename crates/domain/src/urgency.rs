use serde::{de::Visitor, Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

pub const HOUR_MILLIS: i64 = 1000 * 60 * 60;
pub const DAY_MILLIS: i64 = HOUR_MILLIS * 24;

/// How close a `Switch` is to its check-in deadline.
///
/// Variants are declared from most to least urgent, so the derived ordering
/// puts `OneHour` first: `OneHour < TwelveHours < .. < FiftyPercent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UrgencyTier {
    OneHour,
    TwelveHours,
    TwentyFourHours,
    ThreeDays,
    SevenDays,
    TwentyFivePercent,
    FiftyPercent,
}

impl UrgencyTier {
    /// Every tier, most urgent first
    pub const LADDER: [UrgencyTier; 7] = [
        UrgencyTier::OneHour,
        UrgencyTier::TwelveHours,
        UrgencyTier::TwentyFourHours,
        UrgencyTier::ThreeDays,
        UrgencyTier::SevenDays,
        UrgencyTier::TwentyFivePercent,
        UrgencyTier::FiftyPercent,
    ];

    /// Stable identifier stored in the dispatch log and sent to webhooks.
    /// Changing these would re-arm every tier that was already dispatched.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneHour => "1_hour",
            Self::TwelveHours => "12_hours",
            Self::TwentyFourHours => "24_hours",
            Self::ThreeDays => "3_days",
            Self::SevenDays => "7_days",
            Self::TwentyFivePercent => "25_percent",
            Self::FiftyPercent => "50_percent",
        }
    }

    pub fn is_percentage_based(&self) -> bool {
        matches!(self, Self::TwentyFivePercent | Self::FiftyPercent)
    }
}

impl Display for UrgencyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Unknown urgency tier: {0}")]
pub struct InvalidUrgencyTier(pub String);

impl FromStr for UrgencyTier {
    type Err = InvalidUrgencyTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::LADDER
            .iter()
            .find(|tier| tier.as_str() == s)
            .copied()
            .ok_or_else(|| InvalidUrgencyTier(s.to_string()))
    }
}

impl Serialize for UrgencyTier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UrgencyTier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct TierVisitor;

        impl<'de> Visitor<'de> for TierVisitor {
            type Value = UrgencyTier;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("An urgency tier such as `1_hour` or `50_percent`")
            }

            fn visit_str<E>(self, value: &str) -> Result<UrgencyTier, E>
            where
                E: serde::de::Error,
            {
                value.parse::<UrgencyTier>().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(TierVisitor)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ClassifyError {
    #[error("Check-in interval must be positive, got {0} millis")]
    InvalidInterval(i64),
}

/// Finds the single `UrgencyTier` that is due for a deadline at `now`.
///
/// The fixed duration tiers are tried first, most urgent first, and the
/// percentage tiers are only reached when none of them match. `SevenDays` is
/// counted in whole days, so a deadline 7.5 days away is still within it.
/// Returns `None` when the deadline has passed or when no threshold has been
/// reached yet.
///
/// `now` must be read once by the caller for a whole evaluation pass.
pub fn classify(
    now: i64,
    deadline: i64,
    interval_length: i64,
) -> Result<Option<UrgencyTier>, ClassifyError> {
    if interval_length <= 0 {
        return Err(ClassifyError::InvalidInterval(interval_length));
    }

    let remaining = deadline.saturating_sub(now);
    if remaining <= 0 {
        return Ok(None);
    }

    let tier = if remaining <= HOUR_MILLIS {
        Some(UrgencyTier::OneHour)
    } else if remaining <= 12 * HOUR_MILLIS {
        Some(UrgencyTier::TwelveHours)
    } else if remaining <= 24 * HOUR_MILLIS {
        Some(UrgencyTier::TwentyFourHours)
    } else if remaining <= 3 * DAY_MILLIS {
        Some(UrgencyTier::ThreeDays)
    } else if remaining / DAY_MILLIS <= 7 {
        Some(UrgencyTier::SevenDays)
    } else if within_percent(remaining, interval_length, 25) {
        Some(UrgencyTier::TwentyFivePercent)
    } else if within_percent(remaining, interval_length, 50) {
        Some(UrgencyTier::FiftyPercent)
    } else {
        None
    };

    Ok(tier)
}

// remaining / interval * 100 <= percent, without floating point rounding at the edges
fn within_percent(remaining: i64, interval_length: i64, percent: i64) -> bool {
    (remaining as i128) * 100 <= (interval_length as i128) * (percent as i128)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1613862000000;
    const MINUTE: i64 = 1000 * 60;

    fn classify_remaining(remaining: i64, interval_length: i64) -> Option<UrgencyTier> {
        classify(NOW, NOW + remaining, interval_length).expect("Valid interval")
    }

    #[test]
    fn classify_is_deterministic() {
        let interval = 30 * DAY_MILLIS;
        for remaining in &[59 * MINUTE, 5 * HOUR_MILLIS, 2 * DAY_MILLIS, 10 * DAY_MILLIS] {
            let first = classify_remaining(*remaining, interval);
            for _ in 0..10 {
                assert_eq!(classify_remaining(*remaining, interval), first);
            }
        }
    }

    #[test]
    fn fixed_duration_tiers_take_priority() {
        let interval = 30 * DAY_MILLIS;
        assert_eq!(
            classify_remaining(59 * MINUTE, interval),
            Some(UrgencyTier::OneHour)
        );
        // 7.5 days is exactly 25% of 30 days
        assert_eq!(
            classify_remaining(7 * DAY_MILLIS + 12 * HOUR_MILLIS, interval),
            Some(UrgencyTier::SevenDays)
        );
        // Short intervals still walk the whole fixed ladder
        assert_eq!(
            classify_remaining(6 * DAY_MILLIS, 10 * DAY_MILLIS),
            Some(UrgencyTier::SevenDays)
        );
        assert_eq!(
            classify_remaining(20 * HOUR_MILLIS, DAY_MILLIS),
            Some(UrgencyTier::TwentyFourHours)
        );
    }

    #[test]
    fn tier_boundaries_are_inclusive() {
        let interval = 365 * DAY_MILLIS;
        let cases = vec![
            (1, Some(UrgencyTier::OneHour)),
            (HOUR_MILLIS, Some(UrgencyTier::OneHour)),
            (HOUR_MILLIS + 1, Some(UrgencyTier::TwelveHours)),
            (12 * HOUR_MILLIS, Some(UrgencyTier::TwelveHours)),
            (12 * HOUR_MILLIS + 1, Some(UrgencyTier::TwentyFourHours)),
            (24 * HOUR_MILLIS, Some(UrgencyTier::TwentyFourHours)),
            (24 * HOUR_MILLIS + 1, Some(UrgencyTier::ThreeDays)),
            (3 * DAY_MILLIS, Some(UrgencyTier::ThreeDays)),
            (3 * DAY_MILLIS + 1, Some(UrgencyTier::SevenDays)),
            (3 * DAY_MILLIS + 12 * HOUR_MILLIS, Some(UrgencyTier::SevenDays)),
            (8 * DAY_MILLIS - 1, Some(UrgencyTier::SevenDays)),
            (8 * DAY_MILLIS, Some(UrgencyTier::TwentyFivePercent)),
        ];
        for (remaining, expected) in cases {
            assert_eq!(
                classify_remaining(remaining, interval),
                expected,
                "remaining: {}",
                remaining
            );
        }
    }

    #[test]
    fn falls_back_to_percentage_tiers() {
        assert_eq!(
            classify_remaining(25 * DAY_MILLIS, 100 * DAY_MILLIS),
            Some(UrgencyTier::TwentyFivePercent)
        );
        assert_eq!(
            classify_remaining(15 * DAY_MILLIS, 30 * DAY_MILLIS),
            Some(UrgencyTier::FiftyPercent)
        );
        assert_eq!(
            classify_remaining(50 * DAY_MILLIS, 100 * DAY_MILLIS),
            Some(UrgencyTier::FiftyPercent)
        );
        assert_eq!(classify_remaining(50 * DAY_MILLIS + 1, 100 * DAY_MILLIS), None);
        assert_eq!(
            classify_remaining(25 * DAY_MILLIS + 1, 100 * DAY_MILLIS),
            Some(UrgencyTier::FiftyPercent)
        );
    }

    #[test]
    fn no_threshold_reached() {
        assert_eq!(classify_remaining(20 * DAY_MILLIS, 30 * DAY_MILLIS), None);
        // Three year interval, two years left
        assert_eq!(
            classify_remaining(2 * 365 * DAY_MILLIS, 3 * 365 * DAY_MILLIS),
            None
        );
    }

    #[test]
    fn expired_deadlines_have_no_tier() {
        for interval in &[HOUR_MILLIS, DAY_MILLIS, 30 * DAY_MILLIS, 1000 * DAY_MILLIS] {
            assert_eq!(classify_remaining(0, *interval), None);
            assert_eq!(classify_remaining(-1, *interval), None);
            assert_eq!(classify_remaining(-40 * DAY_MILLIS, *interval), None);
        }
        assert_eq!(classify(NOW, i64::MIN, DAY_MILLIS), Ok(None));
    }

    #[test]
    fn rejects_non_positive_intervals() {
        assert_eq!(
            classify(NOW, NOW + HOUR_MILLIS, 0),
            Err(ClassifyError::InvalidInterval(0))
        );
        assert_eq!(
            classify(NOW, NOW - HOUR_MILLIS, -5),
            Err(ClassifyError::InvalidInterval(-5))
        );
    }

    #[test]
    fn handles_extreme_values() {
        assert_eq!(
            classify(0, i64::MAX / 2, i64::MAX),
            Ok(Some(UrgencyTier::FiftyPercent))
        );
        assert_eq!(classify(0, i64::MAX, i64::MAX), Ok(None));
        assert_eq!(classify(0, i64::MAX, 1), Ok(None));
    }

    #[test]
    fn tiers_roundtrip_through_their_identifiers() {
        for tier in UrgencyTier::LADDER.iter() {
            assert_eq!(tier.as_str().parse::<UrgencyTier>().unwrap(), *tier);
        }
        assert!("2_hours".parse::<UrgencyTier>().is_err());
    }

    #[test]
    fn ladder_is_ordered_by_urgency() {
        let mut sorted = UrgencyTier::LADDER.to_vec();
        sorted.sort();
        assert_eq!(sorted, UrgencyTier::LADDER.to_vec());
        assert!(UrgencyTier::OneHour < UrgencyTier::FiftyPercent);
        assert!(UrgencyTier::FiftyPercent.is_percentage_based());
        assert!(!UrgencyTier::SevenDays.is_percentage_based());
    }
}
