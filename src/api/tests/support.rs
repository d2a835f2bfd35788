//! Shared fixture for router tests.

use crate::{
    actor::Actor,
    agent::domain::AgentId,
    api::{AppState, router},
    project::domain::ProjectId,
    provider::ProviderCatalog,
    task::domain::TaskId,
    user::domain::UserId,
};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use rstest::fixture;
use serde_json::{Value, json};
use tower::ServiceExt;

pub(super) struct Api {
    router: Router,
}

#[fixture]
pub(super) fn api() -> Api {
    Api {
        router: router(AppState::in_memory(ProviderCatalog::builtin())),
    }
}

/// Records created by [`Api::seed`].
pub(super) struct Seed {
    pub owner: UserId,
    pub project: ProjectId,
}

impl Seed {
    pub const fn actor(&self) -> Actor {
        Actor::User(self.owner)
    }
}

pub(super) fn id_of(body: &Value) -> i64 {
    body["id"].as_i64().expect("response carries an id")
}

impl Api {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        actor: Option<Actor>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(acting) = actor {
            builder = builder.extension(acting);
        }
        let request = match body {
            Some(json_body) => builder
                .header("content-type", "application/json")
                .body(Body::from(json_body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be JSON")
        };
        (status, value)
    }

    pub async fn seed(&self) -> Seed {
        let bootstrap = Some(Actor::User(UserId::new(0)));
        let (status, user) = self
            .send(
                Method::POST,
                "/api/users",
                bootstrap,
                Some(json!({ "username": "owner", "email": "owner@example.com" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{user}");
        let owner = UserId::new(id_of(&user));

        let (status, project) = self
            .send(
                Method::POST,
                "/api/projects",
                Some(Actor::User(owner)),
                Some(json!({ "name": "Apollo", "description": "Moonshot" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{project}");
        Seed {
            owner,
            project: ProjectId::new(id_of(&project)),
        }
    }

    pub async fn task(&self, seed: &Seed, title: &str) -> TaskId {
        let (status, task) = self
            .send(
                Method::POST,
                "/api/tasks",
                Some(seed.actor()),
                Some(json!({ "project_id": seed.project, "title": title })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{task}");
        TaskId::new(id_of(&task))
    }

    pub async fn agent(&self, seed: &Seed, name: &str) -> AgentId {
        let (status, agent) = self
            .send(
                Method::POST,
                "/api/agents",
                Some(seed.actor()),
                Some(json!({
                    "name": name,
                    "project_id": seed.project,
                    "role": "backend_developer",
                    "level": "senior",
                    "provider": "openai",
                    "model": "gpt-4o",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{agent}");
        AgentId::new(id_of(&agent))
    }
}
