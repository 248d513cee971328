//! Column schema for the issues table

use crate::model::dates::{format_long_date, format_relative};
use crate::model::table::{CellValue, ColumnDef};
use crate::model::{Issue, IssueStatus};
use crate::theme::Theme;
use chrono::{Local, Utc};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

/// Badge colour for a status
pub fn status_style(status: IssueStatus, theme: &Theme) -> Style {
    let color = match status {
        IssueStatus::Open => theme.danger,
        IssueStatus::InProgress => theme.warning,
        IssueStatus::Resolved => theme.success,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn text_column(id: &str, title: &str, read: fn(&Issue) -> &str) -> ColumnDef<Issue> {
    ColumnDef::new(id)
        .header(title)
        .accessor(move |issue: &Issue| CellValue::from(read(issue)))
}

pub fn issue_columns() -> Vec<ColumnDef<Issue>> {
    vec![
        text_column("floor", "Floor", |i| &i.floor).max_width(14),
        text_column("equipment", "Equipment", |i| &i.equipment).max_width(24),
        text_column("description", "Description", |i| &i.description).max_width(48),
        ColumnDef::new("status")
            .header("Status")
            .accessor(|issue: &Issue| CellValue::from(issue.status.label()))
            .cell(|issue, _, theme| {
                Span::styled(format!("● {}", issue.status), status_style(issue.status, theme))
            }),
        ColumnDef::new("first_reported")
            .header("First Reported")
            .accessor(|issue: &Issue| CellValue::from(issue.first_reported))
            .cell(|issue, _, theme| match issue.first_reported {
                Some(reported) => Span::styled(
                    format_long_date(reported.with_timezone(&Local).date_naive()),
                    theme.text(),
                ),
                None => Span::raw(""),
            }),
        // Same ordering as First Reported
        ColumnDef::new("age")
            .header("Age")
            .sortable(false)
            .accessor(|issue: &Issue| CellValue::from(issue.first_reported))
            .cell(|issue, _, theme| match issue.first_reported {
                Some(reported) => Span::styled(format_relative(reported, Utc::now()), theme.dim()),
                None => Span::raw(""),
            }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn issue() -> Issue {
        Issue {
            id: "abc".to_string(),
            floor: "Roof".to_string(),
            equipment: "Fan".to_string(),
            description: "Rattling".to_string(),
            first_reported: Some(Utc::now() - Duration::days(3)),
            reported_by: "unknown".to_string(),
            status: IssueStatus::InProgress,
            expected_resolution_date: None,
            date_resolved: None,
            notes: Vec::new(),
        }
    }

    fn cell(id: &str, issue: &Issue) -> String {
        let columns = issue_columns();
        let col = columns.iter().find(|c| c.id == id).unwrap();
        col.render_cell(issue, &Theme::dark()).content.to_string()
    }

    #[test]
    fn test_column_order() {
        let ids: Vec<String> = issue_columns().into_iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            vec!["floor", "equipment", "description", "status", "first_reported", "age"]
        );
    }

    #[test]
    fn test_only_age_is_unsortable() {
        let unsortable: Vec<String> = issue_columns()
            .into_iter()
            .filter(|c| !c.sortable)
            .map(|c| c.id)
            .collect();
        assert_eq!(unsortable, vec!["age"]);
    }

    #[test]
    fn test_status_badge() {
        assert_eq!(cell("status", &issue()), "● In Progress");
    }

    #[test]
    fn test_age_and_date_cells() {
        assert_eq!(cell("age", &issue()), "3 days ago");

        let mut dated = issue();
        dated.first_reported = Some(Utc.with_ymd_and_hms(2024, 4, 29, 12, 0, 0).unwrap());
        assert!(cell("first_reported", &dated).contains("2024"));

        let mut undated = issue();
        undated.first_reported = None;
        assert_eq!(cell("age", &undated), "");
        assert_eq!(cell("first_reported", &undated), "");
    }
}
