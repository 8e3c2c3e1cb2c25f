//! Connection score: a 0-100 composite of five engagement components.
//!
//! Each component produces a ratio in `[0, 1]`. The score is the weighted
//! sum of the ratios. Components at or above [`STRENGTH_THRESHOLD`] are
//! reported as strengths, those below [`SUGGESTION_THRESHOLD`] come with a
//! suggestion.

use super::aggregator::{EngagementSummary, MONTH_DAYS};
use crate::models::ConnectionScore;

pub const STRENGTH_THRESHOLD: f64 = 0.75;
pub const SUGGESTION_THRESHOLD: f64 = 0.5;

/// Hours together in the month window that earn the full time component.
pub const MONTHLY_HOURS_GOAL: f64 = 20.0;

/// Days without activity after which the recency component reaches zero.
pub const RECENCY_HORIZON_DAYS: i64 = 14;

struct Component {
    ratio: f64,
    weight: f64,
    strength: &'static str,
    suggestion: &'static str,
}

struct Level {
    min_score: u8,
    name: &'static str,
    description: &'static str,
    encouragement: &'static str,
}

static LEVELS: [Level; 5] = [
    Level {
        min_score: 80,
        name: "Thriving",
        description: "Your family is creating wonderful memories together!",
        encouragement: "You're doing amazing! Keep up the great work.",
    },
    Level {
        min_score: 60,
        name: "Growing",
        description: "Your family is building strong connection habits.",
        encouragement: "Great momentum. A few more shared moments will take you to the top.",
    },
    Level {
        min_score: 40,
        name: "Steady",
        description: "Your family connects regularly, with room to grow.",
        encouragement: "Keep it going. Small, frequent activities add up.",
    },
    Level {
        min_score: 20,
        name: "Drifting",
        description: "Time together has been slipping lately.",
        encouragement: "A quick activity this week can turn things around.",
    },
    Level {
        min_score: 0,
        name: "Getting Started",
        description: "Every family starts somewhere.",
        encouragement: "Plan your first activity together and watch your score grow.",
    },
];

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        return 0.0;
    }
    (numerator / denominator).clamp(0.0, 1.0)
}

fn recency_ratio(days_since_last_activity: Option<i64>) -> f64 {
    match days_since_last_activity {
        None => 0.0,
        Some(days) if days <= 1 => 1.0,
        Some(days) => ratio(
            (RECENCY_HORIZON_DAYS - days) as f64,
            (RECENCY_HORIZON_DAYS - 1) as f64,
        ),
    }
}

fn quality_ratio(summary: &EngagementSummary) -> f64 {
    let average = summary.average_rating_this_month.or_else(|| {
        (summary.rated_activities > 0).then_some(summary.average_rating)
    });
    average.map(|avg| ratio(avg, 5.0)).unwrap_or(0.0)
}

fn reach_ratio(summary: &EngagementSummary) -> f64 {
    if summary.total_pods > 0 {
        ratio(
            f64::from(summary.active_pods_this_month),
            f64::from(summary.total_pods),
        )
    } else {
        ratio(
            f64::from(summary.active_members_this_month),
            f64::from(summary.total_members),
        )
    }
}

fn components(summary: &EngagementSummary) -> [Component; 5] {
    [
        Component {
            ratio: ratio(f64::from(summary.days_active_this_month), MONTH_DAYS as f64),
            weight: 30.0,
            strength: "Consistent activity",
            suggestion: "Aim for a short activity together most days",
        },
        Component {
            ratio: recency_ratio(summary.days_since_last_activity),
            weight: 15.0,
            strength: "Recently connected",
            suggestion: "Plan something together today",
        },
        Component {
            ratio: ratio(summary.hours_this_month, MONTHLY_HOURS_GOAL),
            weight: 20.0,
            strength: "High engagement",
            suggestion: "Try a weekend adventure",
        },
        Component {
            ratio: quality_ratio(summary),
            weight: 15.0,
            strength: "Highly rated time together",
            suggestion: "Pick activities everyone enjoys",
        },
        Component {
            ratio: reach_ratio(summary),
            weight: 20.0,
            strength: "Diverse experiences",
            suggestion: "Involve all pod groups",
        },
    ]
}

pub fn connection_score(summary: &EngagementSummary) -> ConnectionScore {
    let components = components(summary);

    let raw: f64 = components.iter().map(|c| c.ratio * c.weight).sum();
    let score = raw.round().clamp(0.0, 100.0) as u8;

    let level = LEVELS
        .iter()
        .find(|level| score >= level.min_score)
        .unwrap_or(&LEVELS[LEVELS.len() - 1]);

    ConnectionScore {
        score,
        level: level.name.to_string(),
        description: level.description.to_string(),
        encouragement: level.encouragement.to_string(),
        strengths: components
            .iter()
            .filter(|c| c.ratio >= STRENGTH_THRESHOLD)
            .map(|c| c.strength.to_string())
            .collect(),
        suggestions: components
            .iter()
            .filter(|c| c.ratio < SUGGESTION_THRESHOLD)
            .map(|c| c.suggestion.to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TrendDirection, WeeklyTrend};

    fn quiet_summary() -> EngagementSummary {
        EngagementSummary {
            last_activity_at: None,
            days_since_last_activity: None,
            current_streak: 0,
            longest_streak: 0,
            activities_this_week: 0,
            activities_this_month: 0,
            activities_all_time: 0,
            hours_this_week: 0.0,
            hours_this_month: 0.0,
            hours_all_time: 0.0,
            average_rating: 0.0,
            average_rating_this_month: None,
            rated_activities: 0,
            days_active_this_week: 0,
            days_active_this_month: 0,
            weekly_trend: WeeklyTrend {
                daily_counts: [0; 7],
                percent_change: 0.0,
                direction: TrendDirection::Flat,
            },
            most_active_pod: None,
            most_active_inviter: None,
            active_pods_this_month: 0,
            total_pods: 2,
            active_members_this_month: 0,
            total_members: 3,
        }
    }

    fn busy_summary() -> EngagementSummary {
        EngagementSummary {
            days_since_last_activity: Some(0),
            days_active_this_month: 30,
            hours_this_month: 45.0,
            average_rating: 4.8,
            average_rating_this_month: Some(5.0),
            rated_activities: 20,
            active_pods_this_month: 2,
            active_members_this_month: 3,
            ..quiet_summary()
        }
    }

    #[test]
    fn test_no_activity_scores_zero() {
        let score = connection_score(&quiet_summary());

        assert_eq!(score.score, 0);
        assert_eq!(score.level, "Getting Started");
        assert!(score.strengths.is_empty());
        assert_eq!(score.suggestions.len(), 5);
        assert!(score.suggestions.contains(&"Involve all pod groups".to_string()));
    }

    #[test]
    fn test_full_engagement_scores_hundred() {
        let score = connection_score(&busy_summary());

        assert_eq!(score.score, 100);
        assert_eq!(score.level, "Thriving");
        assert_eq!(
            score.description,
            "Your family is creating wonderful memories together!"
        );
        assert_eq!(score.strengths.len(), 5);
        assert!(score.suggestions.is_empty());
    }

    #[test]
    fn test_partial_engagement() {
        let summary = EngagementSummary {
            days_active_this_month: 15,
            hours_this_month: 10.0,
            active_pods_this_month: 1,
            ..busy_summary()
        };
        let score = connection_score(&summary);

        // 15 + 15 + 10 + 15 + 10
        assert_eq!(score.score, 65);
        assert_eq!(score.level, "Growing");
        assert_eq!(
            score.strengths,
            vec!["Recently connected", "Highly rated time together"]
        );
        assert!(score.suggestions.is_empty());
    }

    #[test]
    fn test_recency_decays_to_zero() {
        assert_eq!(recency_ratio(Some(0)), 1.0);
        assert_eq!(recency_ratio(Some(1)), 1.0);
        assert!(recency_ratio(Some(7)) > 0.0 && recency_ratio(Some(7)) < 1.0);
        assert_eq!(recency_ratio(Some(14)), 0.0);
        assert_eq!(recency_ratio(Some(60)), 0.0);
        assert_eq!(recency_ratio(None), 0.0);
    }

    #[test]
    fn test_quality_falls_back_to_all_time_rating() {
        let summary = EngagementSummary {
            average_rating: 4.0,
            average_rating_this_month: None,
            rated_activities: 3,
            ..quiet_summary()
        };
        assert_eq!(quality_ratio(&summary), 0.8);
    }

    #[test]
    fn test_reach_uses_members_without_pods() {
        let summary = EngagementSummary {
            total_pods: 0,
            active_members_this_month: 3,
            total_members: 4,
            ..quiet_summary()
        };
        assert_eq!(reach_ratio(&summary), 0.75);
    }

    #[test]
    fn test_score_always_in_range() {
        let summary = EngagementSummary {
            days_active_this_month: 400,
            hours_this_month: 10_000.0,
            average_rating_this_month: Some(9.0),
            active_pods_this_month: 10,
            ..busy_summary()
        };
        let score = connection_score(&summary);
        assert!(score.score <= 100);
    }
}
