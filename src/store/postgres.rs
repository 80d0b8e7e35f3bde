use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

use super::{sample_ideas, IdeaStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{parse_date, IdeaRecord, IdeaStatus, NewIdea};

const IDEA_COLUMNS: &str = "id, title, description, priority, status, tags, assigned_to, \
                            created_date, due_date, upvotes, comments";

pub struct PgIdeaStore {
    pool: PgPool,
}

impl PgIdeaStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Creates or upgrades the `idea_progress` schema.
    pub async fn init_schema(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Inserts the sample pipeline; ideas already present are left alone.
    pub async fn seed(&self) -> StoreResult<usize> {
        let mut inserted = 0usize;

        for record in sample_ideas() {
            let source_key = record.id.clone().map(|id| format!("seed-{id}"));
            if self.insert_record(&record, source_key.as_deref()).await? {
                inserted += 1;
            }
        }

        tracing::info!(inserted, "seeded ideas");
        Ok(inserted)
    }

    pub async fn import_csv(&self, csv_path: &Path) -> StoreResult<usize> {
        let file = std::fs::File::open(csv_path)?;
        let rows = read_csv_ideas(file)?;
        let mut inserted = 0usize;

        for row in rows {
            if self
                .insert_record(&row.record, Some(&row.source_key))
                .await?
            {
                inserted += 1;
            } else {
                tracing::debug!(source_key = %row.source_key, "skipping duplicate idea");
            }
        }

        tracing::info!(inserted, path = %csv_path.display(), "imported ideas");
        Ok(inserted)
    }

    async fn insert_record(
        &self,
        record: &IdeaRecord,
        source_key: Option<&str>,
    ) -> StoreResult<bool> {
        let id = record
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let result = sqlx::query(
            r#"
            INSERT INTO idea_progress.ideas
            (id, title, description, priority, status, tags, assigned_to,
             created_date, due_date, upvotes, comments, source_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.priority)
        .bind(&record.status)
        .bind(record.tags.clone().unwrap_or_default())
        .bind(&record.assigned_to)
        .bind(record.created_date.as_deref().and_then(parse_date))
        .bind(record.due_date.as_deref().and_then(parse_date))
        .bind(count_column(record.upvotes))
        .bind(count_column(record.comments))
        .bind(source_key)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch_one_by_id(&self, sql: &str, id: &str) -> StoreResult<IdeaRecord> {
        let row = sqlx::query(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        Ok(record_from_row(&row)?)
    }
}

fn count_column(value: Option<i64>) -> i32 {
    value.unwrap_or(0).clamp(0, i32::MAX as i64) as i32
}

fn record_from_row(row: &PgRow) -> Result<IdeaRecord, sqlx::Error> {
    let created_date: Option<NaiveDate> = row.try_get("created_date")?;
    let due_date: Option<NaiveDate> = row.try_get("due_date")?;
    let upvotes: i32 = row.try_get("upvotes")?;
    let comments: i32 = row.try_get("comments")?;

    Ok(IdeaRecord {
        id: Some(row.try_get("id")?),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        priority: row.try_get("priority")?,
        status: row.try_get("status")?,
        tags: Some(row.try_get("tags")?),
        assigned_to: row.try_get("assigned_to")?,
        created_date: created_date.map(|date| date.to_string()),
        due_date: due_date.map(|date| date.to_string()),
        upvotes: Some(i64::from(upvotes)),
        comments: Some(i64::from(comments)),
    })
}

#[async_trait]
impl IdeaStore for PgIdeaStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list_ideas(&self) -> StoreResult<Vec<IdeaRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {IDEA_COLUMNS} FROM idea_progress.ideas ORDER BY created_date NULLS LAST, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut ideas = Vec::with_capacity(rows.len());
        for row in rows {
            ideas.push(record_from_row(&row)?);
        }

        tracing::debug!(count = ideas.len(), "fetched ideas");
        Ok(ideas)
    }

    async fn get_idea(&self, id: &str) -> StoreResult<IdeaRecord> {
        self.fetch_one_by_id(
            &format!("SELECT {IDEA_COLUMNS} FROM idea_progress.ideas WHERE id = $1"),
            id,
        )
        .await
    }

    async fn create_idea(&self, idea: &NewIdea) -> StoreResult<IdeaRecord> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO idea_progress.ideas
            (id, title, description, priority, status, tags, assigned_to, created_date, due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {IDEA_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&idea.title)
        .bind(&idea.description)
        .bind(idea.priority.as_str())
        .bind(IdeaStatus::Pending.as_str())
        .bind(&idea.tags)
        .bind(&idea.assigned_to)
        .bind(Utc::now().date_naive())
        .bind(idea.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(record_from_row(&row)?)
    }

    async fn update_idea_status(&self, id: &str, status: &IdeaStatus) -> StoreResult<IdeaRecord> {
        let row = sqlx::query(&format!(
            "UPDATE idea_progress.ideas SET status = $2, updated_at = now() \
             WHERE id = $1 RETURNING {IDEA_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        Ok(record_from_row(&row)?)
    }

    async fn upvote_idea(&self, id: &str) -> StoreResult<IdeaRecord> {
        self.fetch_one_by_id(
            &format!(
                "UPDATE idea_progress.ideas SET upvotes = upvotes + 1, updated_at = now() \
                 WHERE id = $1 RETURNING {IDEA_COLUMNS}"
            ),
            id,
        )
        .await
    }

    async fn delete_idea(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM idea_progress.ideas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CsvIdeaRow {
    title: String,
    description: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    tags: Option<String>,
    assigned_to: Option<String>,
    created_date: Option<String>,
    due_date: Option<String>,
    upvotes: Option<i64>,
    comments: Option<i64>,
    source_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CsvIdea {
    pub record: IdeaRecord,
    pub source_key: String,
}

/// Parses the import format; `tags` are separated by `;`.
pub(crate) fn read_csv_ideas<R: Read>(input: R) -> StoreResult<Vec<CsvIdea>> {
    let mut reader = csv::Reader::from_reader(input);
    let mut ideas = Vec::new();

    for result in reader.deserialize::<CsvIdeaRow>() {
        let row = result?;
        let tags = row
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();

        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        ideas.push(CsvIdea {
            record: IdeaRecord {
                id: None,
                title: Some(row.title),
                description: row.description,
                priority: row.priority,
                status: row.status,
                tags: Some(tags),
                assigned_to: row.assigned_to,
                created_date: row.created_date,
                due_date: row.due_date,
                upvotes: row.upvotes,
                comments: row.comments,
            },
            source_key,
        });
    }

    Ok(ideas)
}
