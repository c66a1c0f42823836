//! Report aggregation: progress, quality, bug breakdown, and burndown.
//!
//! [`aggregate`] is a pure function over a project's tasks, bugs, and
//! sprints. The worker in `deck-db` feeds it and persists the result
//! exactly once per report request; given identical inputs it always
//! produces the identical snapshot.

use chrono::{Days, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{BugReport, Sprint, Task};
use crate::enums::Priority;

/// Unresolved-bug count above which project health flips to POOR.
const HEALTH_BUG_THRESHOLD: u32 = 5;

/// Everything the aggregator reads: the project's name and all of its
/// tasks, bug reports, and sprints.
#[derive(Debug, Clone)]
pub struct ReportInput {
    pub project_name: String,
    pub tasks: Vec<Task>,
    pub bugs: Vec<BugReport>,
    pub sprints: Vec<Sprint>,
}

/// Task counters.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskStats {
    pub total: u32,
    pub completed: u32,
    pub in_progress: u32,
}

/// Story point totals and completion percentage.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StoryPointStats {
    pub total: u32,
    pub burned: u32,
    /// Rounded to one decimal; 0 when no story points exist.
    pub progress_percent: f64,
}

/// Coarse quality signal derived from unresolved bugs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QualityStats {
    pub active_bugs: u32,
    pub health: Health,
}

/// Project health flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Health {
    Good,
    Poor,
}

/// One histogram slice of the bug-by-priority breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BreakdownSlice {
    pub name: String,
    pub value: u32,
}

/// One day of the sprint burndown series.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BurndownDay {
    pub day: NaiveDate,
    /// Ideal linear decay, rounded to one decimal.
    pub ideal: f64,
    /// Running remaining story points; `None` for days after today.
    pub actual: Option<f64>,
    /// Story points of sprint tasks completed on this day.
    pub completed: u32,
}

/// The computed report snapshot stored on a `ProjectReport`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ReportData {
    pub project_name: String,
    pub tasks: TaskStats,
    pub story_points: StoryPointStats,
    pub quality: QualityStats,
    pub bugs_breakdown: Vec<BreakdownSlice>,
    pub burndown: Vec<BurndownDay>,
}

/// Compute a report snapshot. Deterministic for identical inputs.
#[must_use]
pub fn aggregate(input: &ReportInput, today: NaiveDate) -> ReportData {
    let total_tasks = u32::try_from(input.tasks.len()).unwrap_or(u32::MAX);
    let completed = count_tasks(&input.tasks, |t| t.status.is_completed());
    let in_progress = count_tasks(&input.tasks, |t| t.status.is_in_flight());

    let total_sp: u32 = input.tasks.iter().map(|t| t.story_points).sum();
    let completed_sp: u32 = input
        .tasks
        .iter()
        .filter(|t| t.status.is_completed())
        .map(|t| t.story_points)
        .sum();

    // Guard: no story points means 0% progress, not a division by zero.
    let progress_percent = if total_sp == 0 {
        0.0
    } else {
        round1(f64::from(completed_sp) / f64::from(total_sp) * 100.0)
    };

    let active_bugs = u32::try_from(
        input.bugs.iter().filter(|b| b.status.is_active()).count(),
    )
    .unwrap_or(u32::MAX);
    let health = if active_bugs > HEALTH_BUG_THRESHOLD {
        Health::Poor
    } else {
        Health::Good
    };

    ReportData {
        project_name: input.project_name.clone(),
        tasks: TaskStats {
            total: total_tasks,
            completed,
            in_progress,
        },
        story_points: StoryPointStats {
            total: total_sp,
            burned: completed_sp,
            progress_percent,
        },
        quality: QualityStats {
            active_bugs,
            health,
        },
        bugs_breakdown: bugs_breakdown(&input.bugs),
        burndown: burndown(&input.tasks, &input.sprints, today),
    }
}

fn count_tasks(tasks: &[Task], predicate: impl Fn(&Task) -> bool) -> u32 {
    u32::try_from(tasks.iter().filter(|t| predicate(t)).count()).unwrap_or(u32::MAX)
}

/// Histogram of bug counts by priority. Slices with zero bugs are omitted;
/// order follows ascending severity but is not significant to consumers.
fn bugs_breakdown(bugs: &[BugReport]) -> Vec<BreakdownSlice> {
    Priority::ALL
        .iter()
        .filter_map(|priority| {
            let value =
                u32::try_from(bugs.iter().filter(|b| b.priority == *priority).count()).ok()?;
            (value > 0).then(|| BreakdownSlice {
                name: priority.as_str().to_string(),
                value,
            })
        })
        .collect()
}

/// Day-by-day burndown for the project's reporting sprint.
///
/// The reporting sprint is the active one; with no active sprint the most
/// recently started sprint is used; with no sprints at all the series is
/// empty. Iteration is strictly day-ascending: `actual` is a running
/// subtraction carried from day to day, floored at 0, and undefined for
/// days after `today`.
fn burndown(tasks: &[Task], sprints: &[Sprint], today: NaiveDate) -> Vec<BurndownDay> {
    let Some(sprint) = select_sprint(sprints) else {
        return Vec::new();
    };

    let duration = (sprint.end_date - sprint.start_date).num_days() + 1;
    if duration <= 0 {
        return Vec::new();
    }

    let sprint_tasks: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.sprint_id.as_deref() == Some(sprint.id.as_str()))
        .collect();
    let sprint_total_sp: u32 = sprint_tasks.iter().map(|t| t.story_points).sum();

    #[allow(clippy::cast_precision_loss)]
    let ideal_burn_rate = f64::from(sprint_total_sp) / duration as f64;

    let mut remaining = f64::from(sprint_total_sp);
    let mut series = Vec::with_capacity(usize::try_from(duration).unwrap_or(0));

    for i in 0..duration {
        let day = sprint
            .start_date
            .checked_add_days(Days::new(u64::try_from(i).unwrap_or(0)))
            .unwrap_or(sprint.start_date);

        #[allow(clippy::cast_precision_loss)]
        let ideal = round1((f64::from(sprint_total_sp) - ideal_burn_rate * (i + 1) as f64).max(0.0));

        let completed: u32 = sprint_tasks
            .iter()
            .filter(|t| t.status.is_completed() && t.updated_at.date_naive() == day)
            .map(|t| t.story_points)
            .sum();

        let actual = if day <= today {
            remaining = (remaining - f64::from(completed)).max(0.0);
            Some(remaining)
        } else {
            None
        };

        series.push(BurndownDay {
            day,
            ideal,
            actual,
            completed,
        });
    }

    series
}

/// Active sprint first; otherwise fall back to the most recently started.
fn select_sprint(sprints: &[Sprint]) -> Option<&Sprint> {
    sprints
        .iter()
        .filter(|s| s.is_active)
        .max_by_key(|s| s.start_date)
        .or_else(|| sprints.iter().max_by_key(|s| s.start_date))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::enums::{BugStatus, TaskStatus};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn task(id: &str, status: TaskStatus, sp: u32, sprint: Option<&str>, updated: u32) -> Task {
        Task {
            id: id.to_string(),
            project_id: "prj-1".to_string(),
            sprint_id: sprint.map(String::from),
            assignee_id: None,
            title: id.to_string(),
            description: None,
            status,
            priority: Priority::Medium,
            story_points: sp,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 3, updated, 17, 0, 0).unwrap(),
        }
    }

    fn bug(id: &str, status: BugStatus, priority: Priority) -> BugReport {
        BugReport {
            id: id.to_string(),
            project_id: "prj-1".to_string(),
            task_id: None,
            reporter_id: "usr-qa".to_string(),
            title: id.to_string(),
            description: None,
            status,
            priority,
            is_resolved: !status.is_active(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sprint(id: &str, start: u32, end: u32, active: bool) -> Sprint {
        Sprint {
            id: id.to_string(),
            project_id: "prj-1".to_string(),
            name: id.to_string(),
            goal: None,
            start_date: day(start),
            end_date: day(end),
            is_active: active,
        }
    }

    fn input(tasks: Vec<Task>, bugs: Vec<BugReport>, sprints: Vec<Sprint>) -> ReportInput {
        ReportInput {
            project_name: "Apollo".to_string(),
            tasks,
            bugs,
            sprints,
        }
    }

    #[test]
    fn empty_project_yields_zeroes_not_errors() {
        let data = aggregate(&input(vec![], vec![], vec![]), day(10));
        assert_eq!(data.tasks.total, 0);
        assert_eq!(data.story_points.progress_percent, 0.0);
        assert_eq!(data.quality.active_bugs, 0);
        assert_eq!(data.quality.health, Health::Good);
        assert!(data.bugs_breakdown.is_empty());
        assert!(data.burndown.is_empty());
    }

    #[test]
    fn progress_percent_is_fifty_for_half_burned() {
        let tasks = vec![
            task("tsk-1", TaskStatus::Done, 5, None, 3),
            task("tsk-2", TaskStatus::New, 5, None, 3),
        ];
        let data = aggregate(&input(tasks, vec![], vec![]), day(10));
        assert_eq!(data.story_points.total, 10);
        assert_eq!(data.story_points.burned, 5);
        assert_eq!(data.story_points.progress_percent, 50.0);
    }

    #[test]
    fn in_progress_counts_review_too() {
        let tasks = vec![
            task("tsk-1", TaskStatus::InProgress, 1, None, 3),
            task("tsk-2", TaskStatus::Review, 1, None, 3),
            task("tsk-3", TaskStatus::Testing, 1, None, 3),
            task("tsk-4", TaskStatus::Closed, 1, None, 3),
        ];
        let data = aggregate(&input(tasks, vec![], vec![]), day(10));
        assert_eq!(data.tasks.total, 4);
        assert_eq!(data.tasks.in_progress, 2);
        assert_eq!(data.tasks.completed, 1);
    }

    #[test]
    fn active_bugs_excludes_exactly_closed_and_fixed() {
        let bugs = vec![
            bug("bug-1", BugStatus::New, Priority::High),
            bug("bug-2", BugStatus::Fixed, Priority::High),
            bug("bug-3", BugStatus::Closed, Priority::Low),
            bug("bug-4", BugStatus::Confirmed, Priority::Critical),
        ];
        let data = aggregate(&input(vec![], bugs, vec![]), day(10));
        assert_eq!(data.quality.active_bugs, 2);
    }

    #[test]
    fn health_threshold_is_strictly_greater_than_five() {
        let five: Vec<BugReport> = (0..5)
            .map(|i| bug(&format!("bug-{i}"), BugStatus::New, Priority::Medium))
            .collect();
        let data = aggregate(&input(vec![], five, vec![]), day(10));
        assert_eq!(data.quality.health, Health::Good);

        let six: Vec<BugReport> = (0..6)
            .map(|i| bug(&format!("bug-{i}"), BugStatus::New, Priority::Medium))
            .collect();
        let data = aggregate(&input(vec![], six, vec![]), day(10));
        assert_eq!(data.quality.health, Health::Poor);
    }

    #[test]
    fn breakdown_groups_by_priority() {
        let bugs = vec![
            bug("bug-1", BugStatus::New, Priority::High),
            bug("bug-2", BugStatus::New, Priority::High),
            bug("bug-3", BugStatus::Closed, Priority::Low),
        ];
        let mut data = aggregate(&input(vec![], bugs, vec![]), day(10));
        data.bugs_breakdown.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            data.bugs_breakdown,
            vec![
                BreakdownSlice {
                    name: "HIGH".to_string(),
                    value: 2
                },
                BreakdownSlice {
                    name: "LOW".to_string(),
                    value: 1
                },
            ]
        );
    }

    #[test]
    fn burndown_day_count_is_inclusive() {
        // 5-day sprint, 10 SP total: ideal rate 2/day, day-3 ideal = 4.
        let sprints = vec![sprint("spr-1", 1, 5, true)];
        let tasks = vec![
            task("tsk-1", TaskStatus::Done, 5, Some("spr-1"), 2),
            task("tsk-2", TaskStatus::New, 5, Some("spr-1"), 2),
        ];
        let data = aggregate(&input(tasks, vec![], sprints), day(31));
        assert_eq!(data.burndown.len(), 5);
        assert_eq!(data.burndown[2].ideal, 4.0);
        assert_eq!(data.burndown[4].ideal, 0.0);
    }

    #[test]
    fn actual_is_a_running_subtraction_in_day_order() {
        let sprints = vec![sprint("spr-1", 1, 5, true)];
        let tasks = vec![
            task("tsk-1", TaskStatus::Done, 3, Some("spr-1"), 2),
            task("tsk-2", TaskStatus::Closed, 5, Some("spr-1"), 4),
            task("tsk-3", TaskStatus::New, 2, Some("spr-1"), 1),
        ];
        // Today is day 4: days 1-4 carry actuals, day 5 is undefined.
        let data = aggregate(&input(tasks, vec![], sprints), day(4));

        let actuals: Vec<Option<f64>> = data.burndown.iter().map(|d| d.actual).collect();
        assert_eq!(
            actuals,
            vec![Some(10.0), Some(7.0), Some(7.0), Some(2.0), None]
        );
        assert_eq!(data.burndown[1].completed, 3);
        assert_eq!(data.burndown[3].completed, 5);
    }

    #[test]
    fn no_sprint_means_empty_burndown() {
        let tasks = vec![task("tsk-1", TaskStatus::Done, 3, None, 2)];
        let data = aggregate(&input(tasks, vec![], vec![]), day(10));
        assert!(data.burndown.is_empty());
    }

    #[test]
    fn inactive_sprints_fall_back_to_most_recently_started() {
        let sprints = vec![
            sprint("spr-old", 1, 5, false),
            sprint("spr-new", 10, 14, false),
        ];
        let tasks = vec![task("tsk-1", TaskStatus::New, 8, Some("spr-new"), 10)];
        let data = aggregate(&input(tasks, vec![], sprints), day(12));
        assert_eq!(data.burndown.len(), 5);
        assert_eq!(data.burndown[0].day, day(10));
        assert_eq!(data.burndown[0].ideal, 6.4);
    }

    #[test]
    fn active_sprint_wins_over_later_inactive_one() {
        let sprints = vec![
            sprint("spr-active", 1, 5, true),
            sprint("spr-later", 10, 14, false),
        ];
        let data = aggregate(&input(vec![], vec![], sprints), day(12));
        assert_eq!(data.burndown.first().map(|d| d.day), Some(day(1)));
    }

    #[test]
    fn aggregate_is_deterministic() {
        let make = || {
            input(
                vec![
                    task("tsk-1", TaskStatus::Done, 5, Some("spr-1"), 3),
                    task("tsk-2", TaskStatus::InProgress, 8, Some("spr-1"), 4),
                ],
                vec![bug("bug-1", BugStatus::New, Priority::Critical)],
                vec![sprint("spr-1", 1, 10, true)],
            )
        };
        let a = aggregate(&make(), day(6));
        let b = aggregate(&make(), day(6));
        assert_eq!(a, b);
    }
}
