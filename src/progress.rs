use chrono::NaiveDate;

use crate::models::{
    AggregateStats, CategorySummary, Idea, IdeaStatus, Milestone, ProjectProgress, ProjectStatus,
};

pub const DEFAULT_CATEGORY: &str = "General";
pub const UNASSIGNED: &str = "Unassigned";
pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy)]
enum Gate {
    Started,
    Finished,
}

impl Gate {
    fn reached(self, status: &IdeaStatus) -> bool {
        match self {
            Gate::Started => matches!(status, IdeaStatus::InProgress | IdeaStatus::Completed),
            Gate::Finished => matches!(status, IdeaStatus::Completed),
        }
    }
}

// Checked in this order, each inserted ahead of "Deployment".
const TAG_MILESTONES: [(&str, &str, Gate); 4] = [
    ("ai", "AI Model Training", Gate::Finished),
    ("mobile", "Mobile Testing", Gate::Finished),
    ("backend", "API Development", Gate::Started),
    ("frontend", "UI/UX Implementation", Gate::Started),
];

pub fn map_idea_status(status: &IdeaStatus) -> ProjectStatus {
    match status {
        IdeaStatus::Pending => ProjectStatus::Todo,
        IdeaStatus::InProgress => ProjectStatus::InProgress,
        IdeaStatus::Completed => ProjectStatus::Completed,
        IdeaStatus::Other(_) => ProjectStatus::Todo,
    }
}

pub fn synthesize_milestones(idea: &Idea, today: NaiveDate) -> Vec<Milestone> {
    let submitted_on = idea.created_date.unwrap_or(today);
    let due_on = idea.due_date.unwrap_or(today);

    let mut milestones = vec![
        Milestone::new("Idea Submission", true, submitted_on),
        Milestone::new(
            "Planning & Analysis",
            idea.status != IdeaStatus::Pending,
            submitted_on,
        ),
        Milestone::new("Development", Gate::Started.reached(&idea.status), due_on),
        Milestone::new(
            "Testing & Review",
            Gate::Finished.reached(&idea.status),
            due_on,
        ),
    ];

    for (tag, name, gate) in TAG_MILESTONES {
        if idea.has_tag(tag) {
            milestones.push(Milestone::new(name, gate.reached(&idea.status), due_on));
        }
    }

    milestones.push(Milestone::new(
        "Deployment",
        Gate::Finished.reached(&idea.status),
        due_on,
    ));
    milestones
}

pub fn calculate_progress(idea: &Idea, milestones: &[Milestone]) -> u8 {
    let completed = milestones.iter().filter(|milestone| milestone.completed).count();
    let base = percent(completed, milestones.len());

    match idea.status {
        IdeaStatus::Pending => base.min(20),
        IdeaStatus::InProgress => base.clamp(25, 80),
        IdeaStatus::Completed => 100,
        IdeaStatus::Other(_) => base,
    }
}

/// Rounded percentage, halves rounding up; 0 when `whole` is 0.
fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u8
}

pub fn derive_project(idea: &Idea, today: NaiveDate) -> ProjectProgress {
    let milestones = synthesize_milestones(idea, today);
    let progress = calculate_progress(idea, &milestones);
    let status = map_idea_status(&idea.status);
    let estimated_end_date = idea.due_date.unwrap_or(today);

    ProjectProgress {
        id: idea.id.clone(),
        title: idea.title.clone(),
        description: idea.description.clone(),
        assignee: if idea.assigned_to.is_empty() {
            UNASSIGNED.to_string()
        } else {
            idea.assigned_to.clone()
        },
        start_date: idea.created_date.unwrap_or(today),
        estimated_end_date,
        actual_end_date: (status == ProjectStatus::Completed).then_some(estimated_end_date),
        status,
        progress,
        category: idea
            .tags
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        priority: idea.priority.as_lower().to_string(),
        milestones,
        tags: idea.tags.clone(),
        upvotes: idea.upvotes,
        comments: idea.comments,
    }
}

/// One project per idea, in input order.
pub fn derive_project_progress(ideas: &[Idea], today: NaiveDate) -> Vec<ProjectProgress> {
    ideas.iter().map(|idea| derive_project(idea, today)).collect()
}

pub fn compute_aggregates(projects: &[ProjectProgress], today: NaiveDate) -> AggregateStats {
    let mut stats = AggregateStats {
        total_projects: projects.len(),
        ..AggregateStats::default()
    };
    let mut progress_total = 0usize;

    for project in projects {
        match project.status {
            ProjectStatus::Todo => stats.todo_projects += 1,
            ProjectStatus::InProgress => stats.in_progress_projects += 1,
            ProjectStatus::Completed => stats.completed_projects += 1,
            ProjectStatus::OnHold => stats.on_hold_projects += 1,
            ProjectStatus::Cancelled => stats.cancelled_projects += 1,
        }

        if is_overdue(project, today) {
            stats.overdue_projects += 1;
        }

        progress_total += project.progress as usize;

        let completed = usize::from(project.status == ProjectStatus::Completed);
        match stats
            .categories
            .iter_mut()
            .find(|category| category.name == project.category)
        {
            Some(category) => {
                category.count += 1;
                category.completed += completed;
            }
            None => stats.categories.push(CategorySummary {
                name: project.category.clone(),
                count: 1,
                completed,
            }),
        }
    }

    stats.completion_rate = percent(stats.completed_projects, stats.total_projects);
    stats.average_progress = if projects.is_empty() {
        0
    } else {
        (progress_total as f64 / projects.len() as f64).round() as u8
    };
    stats
}

pub fn is_overdue(project: &ProjectProgress, today: NaiveDate) -> bool {
    project.status != ProjectStatus::Completed && project.estimated_end_date < today
}

/// Negative once the end date has passed.
pub fn days_remaining(estimated_end_date: NaiveDate, today: NaiveDate) -> i64 {
    (estimated_end_date - today).num_days()
}

pub fn filter_projects(
    projects: &[ProjectProgress],
    category_filter: &str,
    status_filter: &str,
) -> Vec<ProjectProgress> {
    let category_needle = category_filter.to_lowercase();

    projects
        .iter()
        .filter(|project| {
            category_filter == ALL || project.category.to_lowercase().contains(&category_needle)
        })
        .filter(|project| status_filter == ALL || project.status.as_str() == status_filter)
        .cloned()
        .collect()
}
