use crate::models::IdeaRecord;

#[allow(clippy::too_many_arguments)]
fn record(
    id: &str,
    title: &str,
    description: &str,
    priority: &str,
    status: &str,
    tags: &[&str],
    assigned_to: &str,
    dates: (&str, &str),
    upvotes: i64,
    comments: i64,
) -> IdeaRecord {
    IdeaRecord {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        priority: Some(priority.to_string()),
        status: Some(status.to_string()),
        tags: Some(tags.iter().map(|tag| tag.to_string()).collect()),
        assigned_to: Some(assigned_to.to_string()),
        created_date: Some(dates.0.to_string()),
        due_date: Some(dates.1.to_string()),
        upvotes: Some(upvotes),
        comments: Some(comments),
    }
}

/// Realistic pipeline used by the in-memory store and `seed`.
pub fn sample_ideas() -> Vec<IdeaRecord> {
    vec![
        record(
            "idea-001",
            "Predictive ticket triage",
            "Route support tickets with a classifier trained on past resolutions",
            "HIGH",
            "IN_PROGRESS",
            &["AI", "backend"],
            "Avery Lee",
            ("2026-01-12", "2026-04-30"),
            14,
            6,
        ),
        record(
            "idea-002",
            "Field inspection app",
            "Offline-first checklist app for site inspectors",
            "MEDIUM",
            "PENDING",
            &["mobile", "frontend"],
            "",
            ("2026-02-03", "2026-06-15"),
            9,
            2,
        ),
        record(
            "idea-003",
            "Self-serve invoice portal",
            "Let customers download and dispute invoices without emailing finance",
            "HIGH",
            "COMPLETED",
            &["frontend", "backend"],
            "Jules Moreno",
            ("2025-09-01", "2025-12-19"),
            22,
            11,
        ),
        record(
            "idea-004",
            "Meeting-free Wednesdays",
            "Block recurring meetings one day a week and measure focus time",
            "LOW",
            "PENDING",
            &[],
            "Kiara Patel",
            ("2026-03-20", "2026-05-01"),
            31,
            17,
        ),
        record(
            "idea-005",
            "Warehouse demand forecast",
            "Weekly SKU demand forecast feeding the replenishment job",
            "MEDIUM",
            "IN_PROGRESS",
            &["ai", "mobile", "backend", "frontend"],
            "Sam Okafor",
            ("2025-11-10", "2026-03-31"),
            7,
            4,
        ),
    ]
}
