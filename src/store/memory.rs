use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{sample_ideas, IdeaStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{IdeaRecord, IdeaStatus, NewIdea};

/// Mock store kept in process memory. Changes are lost on exit.
pub struct MemoryIdeaStore {
    ideas: RwLock<Vec<IdeaRecord>>,
}

impl MemoryIdeaStore {
    pub fn new(ideas: Vec<IdeaRecord>) -> Self {
        Self {
            ideas: RwLock::new(ideas),
        }
    }

    pub fn seeded() -> Self {
        Self::new(sample_ideas())
    }

    async fn modify<F>(&self, id: &str, apply: F) -> StoreResult<IdeaRecord>
    where
        F: FnOnce(&mut IdeaRecord) + Send,
    {
        let mut ideas = self.ideas.write().await;
        let idea = ideas
            .iter_mut()
            .find(|idea| idea.id.as_deref() == Some(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        apply(idea);
        Ok(idea.clone())
    }
}

#[async_trait]
impl IdeaStore for MemoryIdeaStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_ideas(&self) -> StoreResult<Vec<IdeaRecord>> {
        Ok(self.ideas.read().await.clone())
    }

    async fn get_idea(&self, id: &str) -> StoreResult<IdeaRecord> {
        self.ideas
            .read()
            .await
            .iter()
            .find(|idea| idea.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create_idea(&self, idea: &NewIdea) -> StoreResult<IdeaRecord> {
        let record = IdeaRecord {
            id: Some(Uuid::new_v4().to_string()),
            title: Some(idea.title.clone()),
            description: Some(idea.description.clone()),
            priority: Some(idea.priority.as_str().to_string()),
            status: Some(IdeaStatus::Pending.as_str().to_string()),
            tags: Some(idea.tags.clone()),
            assigned_to: Some(idea.assigned_to.clone()),
            created_date: Some(Utc::now().date_naive().to_string()),
            due_date: idea.due_date.map(|date| date.to_string()),
            upvotes: Some(0),
            comments: Some(0),
        };

        self.ideas.write().await.push(record.clone());
        Ok(record)
    }

    async fn update_idea_status(&self, id: &str, status: &IdeaStatus) -> StoreResult<IdeaRecord> {
        let status = status.as_str().to_string();
        self.modify(id, move |idea| idea.status = Some(status)).await
    }

    async fn upvote_idea(&self, id: &str) -> StoreResult<IdeaRecord> {
        self.modify(id, |idea| idea.upvotes = Some(idea.upvotes.unwrap_or(0) + 1))
            .await
    }

    async fn delete_idea(&self, id: &str) -> StoreResult<()> {
        let mut ideas = self.ideas.write().await;
        let before = ideas.len();
        ideas.retain(|idea| idea.id.as_deref() != Some(id));

        if ideas.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Idea, Priority};

    fn new_idea() -> NewIdea {
        NewIdea {
            title: "Dark mode".to_string(),
            description: String::new(),
            priority: Priority::Low,
            tags: vec!["frontend".to_string()],
            assigned_to: String::new(),
            due_date: None,
        }
    }

    #[tokio::test]
    async fn created_ideas_start_pending() {
        let store = MemoryIdeaStore::new(Vec::new());
        let created = store.create_idea(&new_idea()).await.unwrap();

        let idea = Idea::from_record(created.clone());
        assert_eq!(idea.status, IdeaStatus::Pending);
        assert_eq!(idea.priority, Priority::Low);
        assert_eq!(idea.created_date, Some(Utc::now().date_naive()));

        let listed = store.list_ideas().await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn status_updates_and_upvotes_are_persisted() {
        let store = MemoryIdeaStore::seeded();

        store
            .update_idea_status("idea-002", &IdeaStatus::InProgress)
            .await
            .unwrap();
        store.upvote_idea("idea-002").await.unwrap();

        let idea = store.get_idea("idea-002").await.unwrap();
        assert_eq!(idea.status.as_deref(), Some("IN_PROGRESS"));
        assert_eq!(idea.upvotes, Some(10));
    }

    #[tokio::test]
    async fn missing_ideas_report_not_found() {
        let store = MemoryIdeaStore::seeded();

        assert!(matches!(
            store.get_idea("nope").await,
            Err(StoreError::NotFound(id)) if id == "nope"
        ));
        assert!(matches!(
            store.upvote_idea("nope").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_idea("nope").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_the_idea() {
        let store = MemoryIdeaStore::seeded();
        let before = store.list_ideas().await.unwrap().len();

        store.delete_idea("idea-004").await.unwrap();

        assert_eq!(store.list_ideas().await.unwrap().len(), before - 1);
    }
}
