//! Run report rendering
//!
//! Pure formatting: a RunReport goes in, a colored summary table comes out.
//! Every invocation of the tool ends by printing one of these, even on a
//! partial failure.

use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::domain::service::{Outcome, RunReport};

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "OUTCOME")]
    outcome: String,
    #[tabled(rename = "DETAIL")]
    detail: String,
}

/// 按结果着色
fn colorize_outcome(outcome: &Outcome) -> String {
    let text = outcome.as_str();
    match outcome {
        Outcome::Running | Outcome::Copied | Outcome::Archived | Outcome::Recreated => {
            text.green().to_string()
        }
        Outcome::Removed | Outcome::Detached => text.cyan().to_string(),
        Outcome::Preserved | Outcome::Skipped => text.dimmed().to_string(),
        Outcome::Warning | Outcome::Unhealthy => text.yellow().to_string(),
        Outcome::Missing | Outcome::Failed => text.red().to_string(),
    }
}

/// 渲染运行报告
///
/// 纯函数，除格式化外无任何副作用
pub fn render(report: &RunReport) -> String {
    let rows: Vec<ReportRow> = report
        .entries
        .iter()
        .map(|e| ReportRow {
            name: e.name.clone(),
            outcome: colorize_outcome(&e.outcome),
            detail: e.detail.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());

    let verdict = if report.entries.is_empty() {
        "nothing to do".dimmed().to_string()
    } else if report.is_degraded() {
        format!(
            "{} degraded: {} issue(s), see table above",
            "⚠".yellow().bold(),
            report.degraded_count()
        )
    } else {
        format!("{} all targets healthy", "✓".green().bold())
    };

    format!(
        "\n=== {} @ {} ===\n{}\n{}\n",
        report.operation,
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        table,
        verdict
    )
}

/// JSON 形式（给上游系统消费）
pub fn render_json(report: &RunReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}
