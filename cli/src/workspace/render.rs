//! Output formatting for workspace listings.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::workspace::types::Workspace;

const HEADERS: [&str; 4] = ["WORKSPACE ID", "PHASE", "CREATED", "CONTEXT URL"];

/// Renders workspaces as a JSON array of the records as received.
pub fn render_json(workspaces: &[Workspace]) -> Result<String> {
    Ok(serde_json::to_string(workspaces)?)
}

/// Renders workspaces as a table with left and right borders.
///
/// ```text
/// | WORKSPACE ID | PHASE   | CREATED     | CONTEXT URL         |
/// |--------------|---------|-------------|---------------------|
/// | ws-1         | running | 2 hours ago | https://github.com/ |
/// ```
pub fn render_table(workspaces: &[Workspace], now: DateTime<Utc>) -> String {
    let rows: Vec<[String; 4]> = workspaces
        .iter()
        .map(|ws| {
            [
                ws.workspace_id.clone(),
                ws.phase().to_string(),
                ws.created_at()
                    .map_or_else(|| "-".to_string(), |created| format_time_ago(created, now)),
                ws.context_url().to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut table = String::new();
    push_row(&mut table, &HEADERS.map(String::from), &widths);
    push_separator(&mut table, &widths);
    for row in &rows {
        push_row(&mut table, row, &widths);
    }
    table
}

fn push_row(table: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    table.push('|');
    for (cell, width) in cells.iter().zip(widths.iter().copied()) {
        table.push_str(&format!(" {cell:<width$} |"));
    }
    table.push('\n');
}

fn push_separator(table: &mut String, widths: &[usize; 4]) {
    table.push('|');
    for width in widths {
        table.push_str(&"-".repeat(width + 2));
        table.push('|');
    }
    table.push('\n');
}

/// Format a timestamp as relative time.
pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);

    let (count, unit) = if duration.num_days() >= 365 {
        (duration.num_days() / 365, "year")
    } else if duration.num_days() >= 30 {
        (duration.num_days() / 30, "month")
    } else if duration.num_weeks() > 0 {
        (duration.num_weeks(), "week")
    } else if duration.num_days() > 0 {
        (duration.num_days(), "day")
    } else if duration.num_hours() > 0 {
        (duration.num_hours(), "hour")
    } else if duration.num_minutes() > 0 {
        (duration.num_minutes(), "minute")
    } else {
        return "just now".to_string();
    };

    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::workspace::types::{InstanceStatus, WorkspaceInstance, WorkspacePhase};

    fn workspace(id: &str, phase: &str, created_at: DateTime<Utc>, url: &str) -> Workspace {
        let mut ws = Workspace {
            workspace_id: id.to_string(),
            ..Workspace::default()
        };
        ws.context.context_url = url.to_string();
        ws.status.instance = Some(WorkspaceInstance {
            created_at: Some(created_at),
            status: InstanceStatus {
                phase: WorkspacePhase::from_wire(phase),
                ..InstanceStatus::default()
            },
            ..WorkspaceInstance::default()
        });
        ws
    }

    #[test]
    fn table_strips_phase_prefix() {
        let now = Utc::now();
        let workspaces = vec![workspace(
            "ws-1",
            "PHASE_RUNNING",
            now - Duration::hours(2),
            "https://github.com/gitpod-io/gitpod",
        )];

        let table = render_table(&workspaces, now);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("WORKSPACE ID"));
        assert!(lines[1].starts_with("|---"));
        assert!(lines[2].contains("| running |"));
        assert!(lines[2].contains("2 hours ago"));
        assert!(lines[2].contains("https://github.com/gitpod-io/gitpod"));
        assert!(!table.contains("PHASE_"));
    }

    #[test]
    fn table_columns_are_aligned() {
        let now = Utc::now();
        let workspaces = vec![
            workspace("short", "PHASE_STOPPED", now - Duration::days(3), "https://a"),
            workspace(
                "a-much-longer-workspace-id",
                "PHASE_INITIALIZING",
                now - Duration::minutes(1),
                "https://github.com/gitpod-io/website",
            ),
        ];

        let table = render_table(&workspaces, now);
        let widths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();

        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn table_handles_workspace_without_instance() {
        let ws = Workspace {
            workspace_id: "never-started".to_string(),
            ..Workspace::default()
        };

        let table = render_table(&[ws], Utc::now());

        assert!(table.contains("| unspecified |"));
        assert!(table.contains(" - "));
    }

    #[test]
    fn json_is_an_array_of_all_workspaces() {
        let now = Utc::now();
        let workspaces = vec![
            workspace("ws-1", "PHASE_RUNNING", now, "https://a"),
            workspace("ws-2", "PHASE_STOPPED", now, "https://b"),
        ];

        let json = render_json(&workspaces).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["workspaceId"], "ws-1");
        assert_eq!(array[1]["status"]["instance"]["status"]["phase"], "PHASE_STOPPED");
    }

    #[test]
    fn json_of_empty_list_is_empty_array() {
        assert_eq!(render_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn time_ago_formats() {
        let now = Utc::now();

        assert_eq!(format_time_ago(now, now), "just now");
        assert_eq!(format_time_ago(now + Duration::minutes(5), now), "just now");
        assert_eq!(format_time_ago(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_time_ago(now - Duration::minutes(45), now), "45 minutes ago");
        assert_eq!(format_time_ago(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(format_time_ago(now - Duration::days(1), now), "1 day ago");
        assert_eq!(format_time_ago(now - Duration::days(15), now), "2 weeks ago");
        assert_eq!(format_time_ago(now - Duration::days(65), now), "2 months ago");
        assert_eq!(format_time_ago(now - Duration::days(800), now), "2 years ago");
    }
}
