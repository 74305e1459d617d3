use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use guardrails_core::jql::{self, OrderBy, ProjectQuery};

#[derive(Subcommand)]
pub enum JqlSubcommand {
    /// General project filter (open issues by default)
    Project {
        /// Jira project key
        key: String,
        /// Only these statuses (repeatable); overrides --include-done
        #[arg(long = "status", value_name = "STATUS")]
        statuses: Vec<String>,
        /// Keep Done issues when no --status is given
        #[arg(long)]
        include_done: bool,
        /// Only these priorities (repeatable)
        #[arg(long = "priority", value_name = "PRIORITY")]
        priorities: Vec<String>,
        /// Only issues updated in the last N days
        #[arg(long, value_name = "N", allow_hyphen_values = true)]
        days_back: Option<String>,
        /// Assignee id or email, or EMPTY for unassigned
        #[arg(long)]
        assignee: Option<String>,
        /// Single-key ORDER BY clause (e.g. "created DESC")
        #[arg(long, conflicts_with = "no_order")]
        order_by: Option<String>,
        /// Omit the ORDER BY clause
        #[arg(long)]
        no_order: bool,
    },
    /// Blocked issues
    Blocked {
        key: String,
        /// Only Highest and High priority
        #[arg(long)]
        high_priority_only: bool,
    },
    /// Issues resolved recently
    Completed {
        key: String,
        #[arg(long, value_name = "N", default_value = "7", allow_hyphen_values = true)]
        days_back: String,
    },
    /// Issues in progress or in review
    InProgress {
        key: String,
        #[arg(long = "priority", value_name = "PRIORITY")]
        priorities: Vec<String>,
    },
    /// High-priority blocked or overdue issues
    Risk {
        key: String,
        /// Only blocked issues, not overdue ones
        #[arg(long)]
        no_overdue: bool,
    },
    /// Issues with no assignee
    Unassigned {
        key: String,
        /// Keep Done issues
        #[arg(long)]
        include_done: bool,
    },
    /// Every query behind a status report
    Report { key: String },
    /// Validate and escape values for embedding in a JQL literal
    Sanitize {
        #[arg(required = true)]
        values: Vec<String>,
    },
}

pub fn run(subcmd: JqlSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        JqlSubcommand::Project {
            key,
            statuses,
            include_done,
            priorities,
            days_back,
            assignee,
            order_by,
            no_order,
        } => {
            let days_back = days_back.as_deref().map(jql::parse_days_back).transpose()?;
            let order_by = match (order_by, no_order) {
                (_, true) => OrderBy::Unordered,
                (Some(clause), false) => OrderBy::Custom(clause),
                (None, false) => OrderBy::Default,
            };
            let opts = ProjectQuery {
                statuses,
                exclude_done: !include_done,
                priorities,
                days_back,
                assignee,
                order_by,
            };
            emit(jql::project_query(&key, &opts), json)
        }
        JqlSubcommand::Blocked {
            key,
            high_priority_only,
        } => emit(jql::blocked_query(&key, high_priority_only), json),
        JqlSubcommand::Completed { key, days_back } => {
            let days = jql::parse_days_back(&days_back)?;
            emit(jql::completed_query(&key, days), json)
        }
        JqlSubcommand::InProgress { key, priorities } => {
            emit(jql::in_progress_query(&key, &priorities), json)
        }
        JqlSubcommand::Risk { key, no_overdue } => emit(jql::risk_query(&key, !no_overdue), json),
        JqlSubcommand::Unassigned { key, include_done } => {
            emit(jql::unassigned_query(&key, !include_done), json)
        }
        JqlSubcommand::Report { key } => report(&key, json),
        JqlSubcommand::Sanitize { values } => sanitize(&values, json),
    }
}

fn emit(query: guardrails_core::Result<String>, json: bool) -> anyhow::Result<()> {
    let query = query.context("failed to build JQL")?;
    tracing::debug!(jql = %query, "composed query");
    if json {
        print_json(&serde_json::json!({ "jql": query }))
    } else {
        println!("{query}");
        Ok(())
    }
}

fn report(key: &str, json: bool) -> anyhow::Result<()> {
    let queries = jql::status_report(key).context("failed to build status report queries")?;

    if json {
        let map: serde_json::Map<String, serde_json::Value> = queries
            .into_iter()
            .map(|q| (q.name.to_string(), serde_json::Value::String(q.jql)))
            .collect();
        return print_json(&map);
    }

    for (i, q) in queries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}:", q.title);
        println!("{}", q.jql);
    }
    Ok(())
}

fn sanitize(values: &[String], json: bool) -> anyhow::Result<()> {
    let sanitized = jql::sanitize_list(values)?;
    if json {
        return print_json(&sanitized);
    }
    for v in sanitized {
        println!("{v}");
    }
    Ok(())
}
