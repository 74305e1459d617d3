//! JQL filter composition for status reports.
//!
//! Every free-text fragment (project key, assignee, order clause, status and
//! priority names) passes through [`sanitize_value`] before it is embedded.
//! Fixed fragments such as `Done`, `Blocked`, `Highest`, and `High` are
//! constants and are emitted verbatim. Nothing here talks to Jira; callers pass
//! the returned string to whatever executes it.

use crate::error::{GuardrailsError, Result};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Ordering used by [`project_query`] unless the caller overrides it.
pub const DEFAULT_ORDER: &str = "priority DESC, updated DESC";

/// Look-back window for [`completed_query`] when none is given.
pub const DEFAULT_COMPLETED_DAYS: i64 = 7;

const HIGH_PRIORITIES: &str = "priority IN (Highest, High)";
const NOT_DONE: &str = "status != Done";

// ---------------------------------------------------------------------------
// Sanitizer
// ---------------------------------------------------------------------------

static SAFE_VALUE_RE: OnceLock<Regex> = OnceLock::new();

fn safe_value_re() -> &'static Regex {
    SAFE_VALUE_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9 \-_.@]+$").unwrap())
}

/// Validate `value` against the allow-list and escape it for a quoted literal.
///
/// An empty string means "no value" and is returned as-is. Anything outside
/// letters, digits, space, `-`, `_`, `.`, and `@` is rejected with
/// [`GuardrailsError::InvalidInput`].
pub fn sanitize_value(value: &str) -> Result<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    if !safe_value_re().is_match(value) {
        return Err(GuardrailsError::InvalidInput(value.to_string()));
    }
    // Quotes cannot pass the allow-list today; escaping stays after validation
    // so loosening the pattern never lets a raw quote through.
    Ok(value.replace('"', "\"\""))
}

/// Sanitize every element in order, failing on the first invalid one.
pub fn sanitize_list<S: AsRef<str>>(values: &[S]) -> Result<Vec<String>> {
    values.iter().map(|v| sanitize_value(v.as_ref())).collect()
}

/// Parse a days-back argument from user text.
///
/// Non-integers are reported as [`GuardrailsError::InvalidRange`] so callers
/// see the same error kind as for a negative window.
pub fn parse_days_back(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| GuardrailsError::InvalidRange(raw.to_string()))
}

fn check_days_back(days: i64) -> Result<i64> {
    if days < 0 {
        return Err(GuardrailsError::InvalidRange(days.to_string()));
    }
    Ok(days)
}

// ---------------------------------------------------------------------------
// Condition builder
// ---------------------------------------------------------------------------

struct Conditions(Vec<String>);

impl Conditions {
    fn for_project(project_key: &str) -> Result<Self> {
        let key = sanitize_value(project_key)?;
        Ok(Self(vec![format!("project = \"{key}\"")]))
    }

    fn push(&mut self, condition: impl Into<String>) {
        self.0.push(condition.into());
    }

    fn finish(self, order_by: Option<&str>) -> String {
        let mut query = self.0.join(" AND ");
        if let Some(order) = order_by.filter(|o| !o.is_empty()) {
            query.push_str(" ORDER BY ");
            query.push_str(order);
        }
        query
    }
}

fn quoted_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("\"{v}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Project query
// ---------------------------------------------------------------------------

/// How a project query is ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OrderBy {
    /// [`DEFAULT_ORDER`], emitted as a constant.
    #[default]
    Default,
    /// Caller-supplied clause. Sanitized as a single value, so it cannot
    /// contain commas; an empty clause drops `ORDER BY` entirely.
    Custom(String),
    /// No `ORDER BY` clause.
    Unordered,
}

/// Optional filters for [`project_query`].
#[derive(Debug, Clone)]
pub struct ProjectQuery {
    /// Explicit statuses; when non-empty, `exclude_done` is ignored.
    pub statuses: Vec<String>,
    pub exclude_done: bool,
    pub priorities: Vec<String>,
    /// Only issues updated within this many days. Zero means no window.
    pub days_back: Option<i64>,
    /// Assignee id or email; `EMPTY` (any case) selects unassigned issues.
    pub assignee: Option<String>,
    pub order_by: OrderBy,
}

impl Default for ProjectQuery {
    fn default() -> Self {
        Self {
            statuses: Vec::new(),
            exclude_done: true,
            priorities: Vec::new(),
            days_back: None,
            assignee: None,
            order_by: OrderBy::Default,
        }
    }
}

/// General project filter.
pub fn project_query(project_key: &str, opts: &ProjectQuery) -> Result<String> {
    let mut conds = Conditions::for_project(project_key)?;

    if !opts.statuses.is_empty() {
        let statuses = sanitize_list(&opts.statuses)?;
        conds.push(format!("status IN ({})", quoted_list(&statuses)));
    } else if opts.exclude_done {
        conds.push(NOT_DONE);
    }

    if !opts.priorities.is_empty() {
        let priorities = sanitize_list(&opts.priorities)?;
        conds.push(format!("priority IN ({})", quoted_list(&priorities)));
    }

    if let Some(days) = opts.days_back {
        let days = check_days_back(days)?;
        if days > 0 {
            conds.push(format!("updated >= -{days}d"));
        }
    }

    if let Some(assignee) = opts.assignee.as_deref().filter(|a| !a.is_empty()) {
        if assignee.eq_ignore_ascii_case("EMPTY") {
            conds.push("assignee is EMPTY");
        } else {
            let assignee = sanitize_value(assignee)?;
            conds.push(format!("assignee = \"{assignee}\""));
        }
    }

    let order = match &opts.order_by {
        OrderBy::Default => Some(DEFAULT_ORDER.to_string()),
        OrderBy::Custom(clause) => Some(sanitize_value(clause)?),
        OrderBy::Unordered => None,
    };

    Ok(conds.finish(order.as_deref()))
}

// ---------------------------------------------------------------------------
// Scenario queries
// ---------------------------------------------------------------------------

/// Blocked issues, optionally only the high-priority ones.
pub fn blocked_query(project_key: &str, high_priority_only: bool) -> Result<String> {
    let mut conds = Conditions::for_project(project_key)?;
    conds.push("status = Blocked");
    if high_priority_only {
        conds.push(HIGH_PRIORITIES);
    }
    Ok(conds.finish(Some("priority DESC, created ASC")))
}

/// Issues resolved within the last `days_back` days.
pub fn completed_query(project_key: &str, days_back: i64) -> Result<String> {
    let mut conds = Conditions::for_project(project_key)?;
    let days = check_days_back(days_back)?;
    conds.push("status = Done");
    conds.push(format!("resolved >= -{days}d"));
    Ok(conds.finish(Some("resolved DESC")))
}

/// Issues in progress or in review, optionally filtered by priority.
pub fn in_progress_query<S: AsRef<str>>(project_key: &str, priorities: &[S]) -> Result<String> {
    let mut conds = Conditions::for_project(project_key)?;
    conds.push("status IN (\"In Progress\", \"In Review\")");
    if !priorities.is_empty() {
        let priorities = sanitize_list(priorities)?;
        conds.push(format!("priority IN ({})", quoted_list(&priorities)));
    }
    Ok(conds.finish(Some("priority DESC, updated DESC")))
}

/// High-priority items that are blocked or, optionally, overdue.
pub fn risk_query(project_key: &str, include_overdue: bool) -> Result<String> {
    let mut conds = Conditions::for_project(project_key)?;

    let mut risk = vec!["status = Blocked"];
    if include_overdue {
        risk.push("(duedate < now() AND status != Done)");
    }
    conds.push(format!("({})", risk.join(" OR ")));
    conds.push(HIGH_PRIORITIES);

    Ok(conds.finish(Some("priority DESC, duedate ASC")))
}

/// Issues with no assignee.
pub fn unassigned_query(project_key: &str, exclude_done: bool) -> Result<String> {
    let mut conds = Conditions::for_project(project_key)?;
    conds.push("assignee is EMPTY");
    if exclude_done {
        conds.push(NOT_DONE);
    }
    Ok(conds.finish(Some("priority DESC, created ASC")))
}

// ---------------------------------------------------------------------------
// Status report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedQuery {
    pub name: &'static str,
    pub title: &'static str,
    pub jql: String,
}

/// The standard set of queries behind a project status report.
pub fn status_report(project_key: &str) -> Result<Vec<NamedQuery>> {
    Ok(vec![
        NamedQuery {
            name: "open",
            title: "Open Issues",
            jql: project_query(project_key, &ProjectQuery::default())?,
        },
        NamedQuery {
            name: "in_progress",
            title: "High Priority In Progress",
            jql: in_progress_query(project_key, &["Highest", "High"])?,
        },
        NamedQuery {
            name: "blocked",
            title: "Blocked Issues",
            jql: blocked_query(project_key, true)?,
        },
        NamedQuery {
            name: "completed",
            title: "Completed Last Week",
            jql: completed_query(project_key, DEFAULT_COMPLETED_DAYS)?,
        },
        NamedQuery {
            name: "risk",
            title: "Risk Items",
            jql: risk_query(project_key, true)?,
        },
        NamedQuery {
            name: "unassigned",
            title: "Unassigned Open Issues",
            jql: unassigned_query(project_key, true)?,
        },
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn is_invalid_input(r: Result<String>) -> bool {
        matches!(r, Err(GuardrailsError::InvalidInput(_)))
    }

    fn is_invalid_range(r: Result<String>) -> bool {
        matches!(r, Err(GuardrailsError::InvalidRange(_)))
    }

    #[test]
    fn valid_values_pass_through_unchanged() {
        for v in [
            "PROJ",
            "In Progress",
            "jane.doe@example.com",
            "team_a-b",
            "v1.2.3",
            "a",
        ] {
            assert_eq!(sanitize_value(v).unwrap(), v);
        }
    }

    #[test]
    fn empty_value_is_not_an_error() {
        assert_eq!(sanitize_value("").unwrap(), "");
    }

    #[test]
    fn disallowed_characters_are_rejected() {
        for v in [
            "PROJ\"",
            "a;b",
            "x OR (1=1)",
            "a,b",
            "tab\there",
            "line\n",
            "caf\u{e9}",
            "50%",
            "a'b",
        ] {
            match sanitize_value(v) {
                Err(GuardrailsError::InvalidInput(got)) => assert_eq!(got, v),
                other => panic!("expected InvalidInput for {v:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn list_preserves_order_and_length() {
        let out = sanitize_list(&["To Do", "In Progress", "Done"]).unwrap();
        assert_eq!(out, vec!["To Do", "In Progress", "Done"]);
    }

    #[test]
    fn list_fails_on_first_invalid_element() {
        let err = sanitize_list(&["ok", "bad;", "also(bad)"]).unwrap_err();
        match err {
            GuardrailsError::InvalidInput(v) => assert_eq!(v, "bad;"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn project_query_defaults() {
        assert_eq!(
            project_query("PROJ", &ProjectQuery::default()).unwrap(),
            "project = \"PROJ\" AND status != Done ORDER BY priority DESC, updated DESC"
        );
    }

    #[test]
    fn project_query_with_statuses() {
        let opts = ProjectQuery {
            statuses: vec!["To Do".into(), "In Progress".into()],
            ..Default::default()
        };
        assert_eq!(
            project_query("PROJ", &opts).unwrap(),
            "project = \"PROJ\" AND status IN (\"To Do\", \"In Progress\") \
             ORDER BY priority DESC, updated DESC"
        );
    }

    #[test]
    fn project_query_all_filters() {
        let opts = ProjectQuery {
            exclude_done: false,
            priorities: vec!["Highest".into(), "High".into()],
            days_back: Some(14),
            assignee: Some("dev@example.com".into()),
            order_by: OrderBy::Custom("created DESC".into()),
            ..Default::default()
        };
        assert_eq!(
            project_query("PROJ", &opts).unwrap(),
            "project = \"PROJ\" AND priority IN (\"Highest\", \"High\") AND updated >= -14d \
             AND assignee = \"dev@example.com\" ORDER BY created DESC"
        );
    }

    #[test]
    fn project_query_empty_assignee_any_case() {
        for a in ["EMPTY", "empty", "Empty"] {
            let opts = ProjectQuery {
                assignee: Some(a.into()),
                order_by: OrderBy::Unordered,
                ..Default::default()
            };
            assert_eq!(
                project_query("PROJ", &opts).unwrap(),
                "project = \"PROJ\" AND status != Done AND assignee is EMPTY"
            );
        }
    }

    #[test]
    fn project_query_zero_days_adds_no_window() {
        let opts = ProjectQuery {
            days_back: Some(0),
            ..Default::default()
        };
        assert!(!project_query("PROJ", &opts).unwrap().contains("updated >="));
    }

    #[test]
    fn project_query_negative_days_is_range_error() {
        let opts = ProjectQuery {
            days_back: Some(-1),
            ..Default::default()
        };
        assert!(is_invalid_range(project_query("PROJ", &opts)));
    }

    #[test]
    fn project_query_rejects_injection_in_every_free_text_field() {
        assert!(is_invalid_input(project_query(
            "PROJ\" OR project = \"X",
            &ProjectQuery::default()
        )));
        let cases = [
            ProjectQuery {
                statuses: vec!["Done\")".into()],
                ..Default::default()
            },
            ProjectQuery {
                priorities: vec!["High;".into()],
                ..Default::default()
            },
            ProjectQuery {
                assignee: Some("x\" OR 1=1".into()),
                ..Default::default()
            },
            ProjectQuery {
                order_by: OrderBy::Custom("priority DESC, created ASC".into()),
                ..Default::default()
            },
        ];
        for opts in &cases {
            assert!(is_invalid_input(project_query("PROJ", opts)), "{opts:?}");
        }
    }

    #[test]
    fn project_query_empty_custom_order_drops_clause() {
        let opts = ProjectQuery {
            order_by: OrderBy::Custom(String::new()),
            ..Default::default()
        };
        assert_eq!(
            project_query("PROJ", &opts).unwrap(),
            "project = \"PROJ\" AND status != Done"
        );
    }

    #[test]
    fn blocked_query_variants() {
        assert_eq!(
            blocked_query("PROJ", true).unwrap(),
            "project = \"PROJ\" AND status = Blocked AND priority IN (Highest, High) \
             ORDER BY priority DESC, created ASC"
        );
        assert_eq!(
            blocked_query("PROJ", false).unwrap(),
            "project = \"PROJ\" AND status = Blocked ORDER BY priority DESC, created ASC"
        );
    }

    #[test]
    fn completed_query_windows() {
        assert_eq!(
            completed_query("PROJ", DEFAULT_COMPLETED_DAYS).unwrap(),
            "project = \"PROJ\" AND status = Done AND resolved >= -7d ORDER BY resolved DESC"
        );
        assert!(completed_query("PROJ", 0).unwrap().contains("resolved >= -0d"));
        assert!(is_invalid_range(completed_query("PROJ", -3)));
    }

    #[test]
    fn in_progress_query_with_and_without_priorities() {
        let none: [&str; 0] = [];
        assert_eq!(
            in_progress_query("PROJ", &none).unwrap(),
            "project = \"PROJ\" AND status IN (\"In Progress\", \"In Review\") \
             ORDER BY priority DESC, updated DESC"
        );
        assert_eq!(
            in_progress_query("PROJ", &["High"]).unwrap(),
            "project = \"PROJ\" AND status IN (\"In Progress\", \"In Review\") \
             AND priority IN (\"High\") ORDER BY priority DESC, updated DESC"
        );
        assert!(is_invalid_input(in_progress_query("PROJ", &["High)"])));
    }

    #[test]
    fn risk_query_variants() {
        assert_eq!(
            risk_query("PROJ", true).unwrap(),
            "project = \"PROJ\" AND (status = Blocked OR (duedate < now() AND status != Done)) \
             AND priority IN (Highest, High) ORDER BY priority DESC, duedate ASC"
        );
        assert_eq!(
            risk_query("PROJ", false).unwrap(),
            "project = \"PROJ\" AND (status = Blocked) AND priority IN (Highest, High) \
             ORDER BY priority DESC, duedate ASC"
        );
    }

    #[test]
    fn unassigned_query_variants() {
        assert_eq!(
            unassigned_query("PROJ", false).unwrap(),
            "project = \"PROJ\" AND assignee is EMPTY ORDER BY priority DESC, created ASC"
        );
        assert_eq!(
            unassigned_query("PROJ", true).unwrap(),
            "project = \"PROJ\" AND assignee is EMPTY AND status != Done \
             ORDER BY priority DESC, created ASC"
        );
    }

    #[test]
    fn parse_days_back_rejects_non_integers() {
        assert_eq!(parse_days_back("14").unwrap(), 14);
        assert_eq!(parse_days_back("-2").unwrap(), -2);
        for raw in ["1.5", "seven", ""] {
            match parse_days_back(raw) {
                Err(GuardrailsError::InvalidRange(v)) => assert_eq!(v, raw),
                other => panic!("expected InvalidRange for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn status_report_has_six_named_queries() {
        let report = status_report("PROJ").unwrap();
        let names: Vec<_> = report.iter().map(|q| q.name).collect();
        assert_eq!(
            names,
            ["open", "in_progress", "blocked", "completed", "risk", "unassigned"]
        );
        assert!(report.iter().all(|q| q.jql.starts_with("project = \"PROJ\"")));
    }

    #[test]
    fn status_report_propagates_invalid_key() {
        assert!(matches!(
            status_report("bad key!"),
            Err(GuardrailsError::InvalidInput(_))
        ));
    }
}
