use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::json;

use super::IdeaStore;
use crate::error::{StoreError, StoreResult};
use crate::models::{IdeaRecord, IdeaStatus, NewIdea};

/// Client for the external idea REST service.
#[derive(Clone)]
pub struct HttpIdeaStore {
    http_client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpIdeaStore {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> StoreResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StoreError::network)?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%method, %url, "idea service request");

        let builder = self.http_client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, id: Option<&str>) -> StoreResult<Response> {
        let response = builder.send().await.map_err(StoreError::network)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }
        if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
            return Err(StoreError::NotFound(id.to_string()));
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        Err(StoreError::Http {
            status: status.as_u16(),
            body,
        })
    }

    async fn fetch_record(
        &self,
        builder: RequestBuilder,
        id: Option<&str>,
    ) -> StoreResult<IdeaRecord> {
        self.send(builder, id)
            .await?
            .json::<IdeaRecord>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl IdeaStore for HttpIdeaStore {
    fn backend(&self) -> &'static str {
        "http"
    }

    async fn list_ideas(&self) -> StoreResult<Vec<IdeaRecord>> {
        let ideas = self
            .send(self.request(Method::GET, "ideas"), None)
            .await?
            .json::<Vec<IdeaRecord>>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        tracing::debug!(count = ideas.len(), "fetched ideas");
        Ok(ideas)
    }

    async fn get_idea(&self, id: &str) -> StoreResult<IdeaRecord> {
        self.fetch_record(self.request(Method::GET, &format!("ideas/{id}")), Some(id))
            .await
    }

    async fn create_idea(&self, idea: &NewIdea) -> StoreResult<IdeaRecord> {
        self.fetch_record(self.request(Method::POST, "ideas").json(idea), None)
            .await
    }

    async fn update_idea_status(&self, id: &str, status: &IdeaStatus) -> StoreResult<IdeaRecord> {
        let builder = self
            .request(Method::PATCH, &format!("ideas/{id}/status"))
            .json(&json!({ "status": status.as_str() }));
        self.fetch_record(builder, Some(id)).await
    }

    async fn upvote_idea(&self, id: &str) -> StoreResult<IdeaRecord> {
        self.fetch_record(
            self.request(Method::POST, &format!("ideas/{id}/upvote")),
            Some(id),
        )
        .await
    }

    async fn delete_idea(&self, id: &str) -> StoreResult<()> {
        self.send(self.request(Method::DELETE, &format!("ideas/{id}")), Some(id))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer, token: Option<&str>) -> HttpIdeaStore {
        HttpIdeaStore::new(
            &format!("{}/", server.uri()),
            token.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn lists_ideas_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ideas"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "Chatbot", "status": "IN_PROGRESS", "tags": ["ai"]},
                {"id": "b-2", "title": null}
            ])))
            .mount(&server)
            .await;

        let ideas = store(&server, Some("secret")).list_ideas().await.unwrap();

        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0].id.as_deref(), Some("1"));
        assert_eq!(ideas[1].id.as_deref(), Some("b-2"));
        assert_eq!(ideas[1].title, None);
    }

    #[tokio::test]
    async fn status_update_sends_backend_status() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/ideas/7/status"))
            .and(body_json(json!({"status": "COMPLETED"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 7, "status": "COMPLETED"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let idea = store(&server, None)
            .update_idea_status("7", &IdeaStatus::Completed)
            .await
            .unwrap();

        assert_eq!(idea.status.as_deref(), Some("COMPLETED"));
    }

    #[tokio::test]
    async fn create_posts_camel_case_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ideas"))
            .and(body_json(json!({
                "title": "Dark mode",
                "description": "",
                "priority": "HIGH",
                "tags": ["frontend"],
                "assignedTo": "Dana",
                "dueDate": "2026-05-01"
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"id": "n-1", "title": "Dark mode"})),
            )
            .mount(&server)
            .await;

        let created = store(&server, None)
            .create_idea(&NewIdea {
                title: "Dark mode".to_string(),
                description: String::new(),
                priority: Priority::High,
                tags: vec!["frontend".to_string()],
                assigned_to: "Dana".to_string(),
                due_date: chrono::NaiveDate::from_ymd_opt(2026, 5, 1),
            })
            .await
            .unwrap();

        assert_eq!(created.id.as_deref(), Some("n-1"));
    }

    #[tokio::test]
    async fn missing_idea_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ideas/42/upvote"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = store(&server, None).upvote_idea("42").await;
        assert!(matches!(result, Err(StoreError::NotFound(id)) if id == "42"));
    }

    #[tokio::test]
    async fn server_errors_keep_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ideas"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let result = store(&server, None).list_ideas().await;
        match result {
            Err(StoreError::Http { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_payload_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ideas/3"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result = store(&server, None).get_idea("3").await;
        assert!(matches!(result, Err(StoreError::InvalidResponse(_))));
    }
}
