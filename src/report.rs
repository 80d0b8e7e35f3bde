use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{AggregateStats, ProjectProgress};
use crate::progress;

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let kept: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

fn days_label(project: &ProjectProgress, today: NaiveDate) -> String {
    match progress::days_remaining(project.estimated_end_date, today) {
        _ if project.actual_end_date.is_some() => "done".to_string(),
        days if days < 0 => format!("{} overdue", -days),
        days => format!("{days} left"),
    }
}

pub fn render_table(projects: &[ProjectProgress], today: NaiveDate) -> String {
    let mut output = String::new();

    if projects.is_empty() {
        let _ = writeln!(output, "No projects match.");
        return output;
    }

    let _ = writeln!(
        output,
        "{:<12} {:<28} {:<12} {:>5} {:<14} {:<7} {:<16} {:<10} {}",
        "ID", "TITLE", "STATUS", "PROG", "CATEGORY", "PRIO", "ASSIGNEE", "DUE", "DAYS"
    );
    for project in projects {
        let _ = writeln!(
            output,
            "{:<12} {:<28} {:<12} {:>4}% {:<14} {:<7} {:<16} {:<10} {}",
            truncate(&project.id, 12),
            truncate(&project.title, 28),
            project.status,
            project.progress,
            truncate(&project.category, 14),
            project.priority,
            truncate(&project.assignee, 16),
            project.estimated_end_date,
            days_label(project, today)
        );
    }

    output
}

pub fn render_stats(stats: &AggregateStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Projects:         {}", stats.total_projects);
    let _ = writeln!(output, "  todo:           {}", stats.todo_projects);
    let _ = writeln!(output, "  in progress:    {}", stats.in_progress_projects);
    let _ = writeln!(output, "  completed:      {}", stats.completed_projects);
    let _ = writeln!(output, "  on hold:        {}", stats.on_hold_projects);
    let _ = writeln!(output, "  cancelled:      {}", stats.cancelled_projects);
    let _ = writeln!(output, "Overdue:          {}", stats.overdue_projects);
    let _ = writeln!(output, "Completion rate:  {}%", stats.completion_rate);
    let _ = writeln!(output, "Average progress: {}%", stats.average_progress);

    if !stats.categories.is_empty() {
        let _ = writeln!(output, "Categories:");
        for category in &stats.categories {
            let _ = writeln!(
                output,
                "  {}: {} ({} completed)",
                category.name, category.count, category.completed
            );
        }
    }

    output
}

pub fn render_project(project: &ProjectProgress, today: NaiveDate) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{} [{}]", project.title, project.id);
    if !project.description.is_empty() {
        let _ = writeln!(output, "{}", project.description);
    }
    let _ = writeln!(
        output,
        "Status {} at {}% | priority {} | category {} | assignee {}",
        project.status, project.progress, project.priority, project.category, project.assignee
    );
    let _ = writeln!(
        output,
        "Started {} | due {} ({})",
        project.start_date,
        project.estimated_end_date,
        days_label(project, today)
    );
    let _ = writeln!(
        output,
        "{} upvotes, {} comments",
        project.upvotes, project.comments
    );
    let _ = writeln!(output, "Milestones:");
    for milestone in &project.milestones {
        let _ = writeln!(
            output,
            "  [{}] {} (due {})",
            if milestone.completed { "x" } else { " " },
            milestone.name,
            milestone.due_date
        );
    }

    output
}

pub fn build_report(
    filter_label: Option<&str>,
    today: NaiveDate,
    projects: &[ProjectProgress],
) -> String {
    let stats = progress::compute_aggregates(projects, today);
    let mut output = String::new();

    let _ = writeln!(output, "# Idea Progress Report");
    let _ = writeln!(
        output,
        "Generated {} for {}",
        today,
        filter_label.unwrap_or("all projects")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(
        output,
        "- {} projects: {} todo, {} in progress, {} completed, {} on hold",
        stats.total_projects,
        stats.todo_projects,
        stats.in_progress_projects,
        stats.completed_projects,
        stats.on_hold_projects
    );
    let _ = writeln!(output, "- Completion rate: {}%", stats.completion_rate);
    let _ = writeln!(output, "- Average progress: {}%", stats.average_progress);
    let _ = writeln!(output, "- Overdue: {}", stats.overdue_projects);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Categories");
    if stats.categories.is_empty() {
        let _ = writeln!(output, "No projects recorded.");
    } else {
        for category in &stats.categories {
            let _ = writeln!(
                output,
                "- {}: {} projects ({} completed)",
                category.name, category.count, category.completed
            );
        }
    }

    let mut overdue: Vec<&ProjectProgress> = projects
        .iter()
        .filter(|project| progress::is_overdue(project, today))
        .collect();
    overdue.sort_by_key(|project| project.estimated_end_date);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Overdue Projects");
    if overdue.is_empty() {
        let _ = writeln!(output, "Nothing overdue.");
    } else {
        for project in overdue {
            let _ = writeln!(
                output,
                "- {} ({}) due {}, {} days late at {}%",
                project.title,
                project.assignee,
                project.estimated_end_date,
                -progress::days_remaining(project.estimated_end_date, today),
                project.progress
            );
        }
    }

    let mut popular: Vec<&ProjectProgress> = projects.iter().collect();
    popular.sort_by(|a, b| b.upvotes.cmp(&a.upvotes));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Most Upvoted");
    if popular.is_empty() {
        let _ = writeln!(output, "No projects recorded.");
    } else {
        for project in popular.iter().take(5) {
            let _ = writeln!(
                output,
                "- {} with {} upvotes ({})",
                project.title, project.upvotes, project.status
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Projects");
    for project in projects {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "### {} ({}%, {})",
            project.title, project.progress, project.status
        );
        for milestone in &project.milestones {
            let _ = writeln!(
                output,
                "- [{}] {} (due {})",
                if milestone.completed { "x" } else { " " },
                milestone.name,
                milestone.due_date
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Idea, IdeaRecord};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn project(title: &str, status: &str, due: &str, upvotes: i64) -> ProjectProgress {
        let idea = Idea::from_record(IdeaRecord {
            id: Some(title.to_lowercase()),
            title: Some(title.to_string()),
            status: Some(status.to_string()),
            due_date: Some(due.to_string()),
            upvotes: Some(upvotes),
            ..IdeaRecord::default()
        });
        progress::derive_project(&idea, today())
    }

    #[test]
    fn empty_report_has_zeroed_summary() {
        let report = build_report(None, today(), &[]);

        assert!(report.contains("Generated 2026-03-01 for all projects"));
        assert!(report.contains("- 0 projects: 0 todo, 0 in progress, 0 completed, 0 on hold"));
        assert!(report.contains("- Completion rate: 0%"));
        assert!(report.contains("Nothing overdue."));
    }

    #[test]
    fn report_lists_overdue_and_popular_projects() {
        let projects = vec![
            project("Kiosk", "PENDING", "2026-02-20", 3),
            project("Portal", "COMPLETED", "2026-01-10", 9),
            project("Forecast", "IN_PROGRESS", "2026-05-01", 1),
        ];

        let report = build_report(Some("category mobile"), today(), &projects);

        assert!(report.contains("Generated 2026-03-01 for category mobile"));
        assert!(report.contains("- Kiosk (Unassigned) due 2026-02-20, 9 days late at 20%"));
        assert!(!report.contains("- Portal (Unassigned) due"));
        let portal = report.find("- Portal with 9 upvotes").unwrap();
        let kiosk = report.find("- Kiosk with 3 upvotes").unwrap();
        assert!(portal < kiosk);
        assert!(report.contains("### Forecast (60%, in-progress)"));
        assert!(report.contains("- [x] Idea Submission"));
    }

    #[test]
    fn table_shows_days_left_or_overdue() {
        let projects = vec![
            project("Kiosk", "PENDING", "2026-02-27", 0),
            project("Forecast", "IN_PROGRESS", "2026-03-11", 0),
            project("Portal", "COMPLETED", "2026-01-10", 0),
        ];

        let table = render_table(&projects, today());

        assert!(table.starts_with("ID"));
        assert!(table.contains("2 overdue"));
        assert!(table.contains("10 left"));
        assert!(table.contains("done"));
        assert_eq!(render_table(&[], today()), "No projects match.\n");
    }

    #[test]
    fn long_values_are_truncated() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long title", 6), "a ver…");
    }

    #[test]
    fn project_detail_marks_milestones() {
        let detail = render_project(&project("Kiosk", "IN_PROGRESS", "2026-03-04", 2), today());

        assert!(detail.starts_with("Kiosk [kiosk]"));
        assert!(detail.contains("Status in-progress at 60%"));
        assert!(detail.contains("(3 left)"));
        assert!(detail.contains("  [x] Development"));
        assert!(detail.contains("  [ ] Deployment"));
    }
}
