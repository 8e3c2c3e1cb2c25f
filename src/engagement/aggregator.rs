use std::collections::{BTreeSet, HashMap, HashSet};

use time::{Date, Duration, OffsetDateTime, UtcOffset};

use super::streak::{current_streak, longest_streak};
use crate::models::{
    Activity, InviterSummary, Member, Pod, PodSummary, TrendDirection, WeeklyTrend,
};

pub const WEEK_DAYS: i64 = 7;
pub const MONTH_DAYS: i64 = 30;

/// Week-over-week changes within this band (in percent) count as flat.
pub const FLAT_TREND_BAND: f64 = 5.0;

/// Everything the aggregator needs to know about one household.
#[derive(Debug, Clone, Copy)]
pub struct HouseholdLog<'a> {
    pub pods: &'a [Pod],
    pub members: &'a [Member],
    pub activities: &'a [Activity],
}

/// Raw engagement figures for one household at one instant.
///
/// Hours and ratings are unrounded so thresholds are checked against true
/// values. Rounding happens when the response is built.
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementSummary {
    pub last_activity_at: Option<OffsetDateTime>,
    pub days_since_last_activity: Option<i64>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub activities_this_week: u32,
    pub activities_this_month: u32,
    pub activities_all_time: u32,
    pub hours_this_week: f64,
    pub hours_this_month: f64,
    pub hours_all_time: f64,
    pub average_rating: f64,
    pub average_rating_this_month: Option<f64>,
    pub rated_activities: u32,
    pub days_active_this_week: u32,
    pub days_active_this_month: u32,
    pub weekly_trend: WeeklyTrend,
    pub most_active_pod: Option<PodSummary>,
    pub most_active_inviter: Option<InviterSummary>,
    pub active_pods_this_month: u32,
    pub total_pods: u32,
    pub active_members_this_month: u32,
    pub total_members: u32,
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn utc_date(at: OffsetDateTime) -> Date {
    at.to_offset(UtcOffset::UTC).date()
}

/// Whole days between `day` and `today`, or `None` when `day` is in the future.
fn age_in_days(day: Date, today: Date) -> Option<i64> {
    let age = (today - day).whole_days();
    (age >= 0).then_some(age)
}

fn within(day: Date, today: Date, window: i64) -> bool {
    age_in_days(day, today).is_some_and(|age| age < window)
}

pub fn summarize(log: HouseholdLog<'_>, now: OffsetDateTime) -> EngagementSummary {
    let today = utc_date(now);
    let activities: Vec<&Activity> = log
        .activities
        .iter()
        .filter(|a| a.occurred_at <= now)
        .collect();

    let active_days: BTreeSet<Date> = activities.iter().map(|a| utc_date(a.occurred_at)).collect();
    let last_activity_at = activities.iter().map(|a| a.occurred_at).max();
    let days_since_last_activity =
        last_activity_at.and_then(|at| age_in_days(utc_date(at), today));

    let this_week: Vec<&Activity> = activities
        .iter()
        .copied()
        .filter(|a| within(utc_date(a.occurred_at), today, WEEK_DAYS))
        .collect();
    let this_month: Vec<&Activity> = activities
        .iter()
        .copied()
        .filter(|a| within(utc_date(a.occurred_at), today, MONTH_DAYS))
        .collect();

    let ratings: Vec<i16> = activities.iter().filter_map(|a| a.rating).collect();
    let month_ratings: Vec<i16> = this_month.iter().filter_map(|a| a.rating).collect();

    let active_pods_this_month = this_month
        .iter()
        .filter_map(|a| a.pod_id.as_deref())
        .filter(|pod_id| log.pods.iter().any(|p| p.pod_id == *pod_id))
        .collect::<HashSet<_>>()
        .len() as u32;
    let active_members_this_month = log
        .members
        .iter()
        .filter(|m| this_month.iter().any(|a| a.involves(&m.member_id)))
        .count() as u32;

    EngagementSummary {
        last_activity_at,
        days_since_last_activity,
        current_streak: current_streak(&active_days, today),
        longest_streak: longest_streak(&active_days),
        activities_this_week: this_week.len() as u32,
        activities_this_month: this_month.len() as u32,
        activities_all_time: activities.len() as u32,
        hours_this_week: total_hours(&this_week),
        hours_this_month: total_hours(&this_month),
        hours_all_time: total_hours(&activities),
        average_rating: mean(&ratings).unwrap_or(0.0),
        average_rating_this_month: mean(&month_ratings),
        rated_activities: ratings.len() as u32,
        days_active_this_week: distinct_days(&this_week),
        days_active_this_month: distinct_days(&this_month),
        weekly_trend: weekly_trend(&activities, today),
        most_active_pod: most_active_pod(log.pods, &this_month),
        most_active_inviter: most_active_inviter(log.members, &activities),
        active_pods_this_month,
        total_pods: log.pods.len() as u32,
        active_members_this_month,
        total_members: log.members.len() as u32,
    }
}

fn total_hours(activities: &[&Activity]) -> f64 {
    activities.iter().map(|a| a.duration_hours).sum()
}

fn distinct_days(activities: &[&Activity]) -> u32 {
    activities
        .iter()
        .map(|a| utc_date(a.occurred_at))
        .collect::<HashSet<_>>()
        .len() as u32
}

fn mean(ratings: &[i16]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: f64 = ratings.iter().map(|&r| f64::from(r)).sum();
    Some(sum / ratings.len() as f64)
}

fn weekly_trend(activities: &[&Activity], today: Date) -> WeeklyTrend {
    let mut daily_counts = [0u32; 7];
    let mut previous_week = 0u32;

    for activity in activities {
        let Some(age) = age_in_days(utc_date(activity.occurred_at), today) else {
            continue;
        };
        if age < WEEK_DAYS {
            daily_counts[(WEEK_DAYS - 1 - age) as usize] += 1;
        } else if age < 2 * WEEK_DAYS {
            previous_week += 1;
        }
    }

    let this_week: u32 = daily_counts.iter().sum();
    let percent_change = percent_change(this_week, previous_week);

    WeeklyTrend {
        daily_counts,
        percent_change,
        direction: direction(percent_change),
    }
}

pub fn percent_change(current: u32, previous: u32) -> f64 {
    if previous == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }
    let delta = f64::from(current) - f64::from(previous);
    round1(delta / f64::from(previous) * 100.0)
}

pub fn direction(percent_change: f64) -> TrendDirection {
    if percent_change > FLAT_TREND_BAND {
        TrendDirection::Up
    } else if percent_change < -FLAT_TREND_BAND {
        TrendDirection::Down
    } else {
        TrendDirection::Flat
    }
}

fn most_active_pod(pods: &[Pod], this_month: &[&Activity]) -> Option<PodSummary> {
    let mut totals: HashMap<&str, (u32, f64)> = HashMap::new();
    for activity in this_month {
        if let Some(pod_id) = activity.pod_id.as_deref() {
            let entry = totals.entry(pod_id).or_default();
            entry.0 += 1;
            entry.1 += activity.duration_hours;
        }
    }

    let mut candidates: Vec<PodSummary> = pods
        .iter()
        .filter_map(|pod| {
            totals
                .get(pod.pod_id.as_str())
                .map(|&(activity_count, hours)| PodSummary {
                    pod_id: pod.pod_id.clone(),
                    pod_name: pod.pod_name.clone(),
                    icon: pod.icon.clone(),
                    activity_count,
                    total_hours: hours,
                })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.activity_count
            .cmp(&a.activity_count)
            .then(b.total_hours.total_cmp(&a.total_hours))
            .then(a.pod_id.cmp(&b.pod_id))
    });

    candidates.into_iter().next().map(|mut pod| {
        pod.total_hours = round1(pod.total_hours);
        pod
    })
}

fn most_active_inviter(members: &[Member], activities: &[&Activity]) -> Option<InviterSummary> {
    let mut candidates: Vec<InviterSummary> = members
        .iter()
        .map(|member| InviterSummary {
            member_id: member.member_id.clone(),
            member_name: member.member_name.clone(),
            avatar_emoji: member.avatar_emoji.clone(),
            initiated_count: activities
                .iter()
                .filter(|a| a.initiator_id == member.member_id)
                .count() as u32,
            participated_count: activities
                .iter()
                .filter(|a| a.involves(&member.member_id))
                .count() as u32,
        })
        .filter(|summary| summary.initiated_count > 0)
        .collect();

    candidates.sort_by(|a, b| {
        b.initiated_count
            .cmp(&a.initiated_count)
            .then(b.participated_count.cmp(&a.participated_count))
            .then(a.member_id.cmp(&b.member_id))
    });

    candidates.into_iter().next()
}
