use thiserror::Error;

use crate::models::{IdeaStatus, ProjectStatus};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("project is completed; it cannot be moved back to {target}")]
    Reopen { target: ProjectStatus },
}

/// The write needed against the backing idea to show `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub idea_status: IdeaStatus,
    /// The idea has no state for `target`, so it is stored as pending and
    /// reads back as `todo` on the next refresh.
    pub collapsed: bool,
}

pub fn plan_status_change(
    current: ProjectStatus,
    target: ProjectStatus,
) -> Result<StatusChange, TransitionError> {
    if current == ProjectStatus::Completed && target != ProjectStatus::Completed {
        return Err(TransitionError::Reopen { target });
    }

    let (idea_status, collapsed) = match target {
        ProjectStatus::Todo => (IdeaStatus::Pending, false),
        ProjectStatus::InProgress => (IdeaStatus::InProgress, false),
        ProjectStatus::Completed => (IdeaStatus::Completed, false),
        ProjectStatus::OnHold | ProjectStatus::Cancelled => (IdeaStatus::Pending, true),
    };

    Ok(StatusChange {
        idea_status,
        collapsed,
    })
}
