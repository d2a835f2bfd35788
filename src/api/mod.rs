//! HTTP surface.
//!
//! Every route lives under `/api` and expects an authenticated [`Actor`] in
//! the request extensions; authentication itself happens in front of the
//! router. Requests without an actor are rejected with 401.
//!
//! [`Actor`]: crate::actor::Actor

mod error;
mod extract;
mod handlers;
mod state;

pub use error::ApiError;
pub use extract::CurrentActor;
pub use state::{
    AgentRegistry, AppState, Dispatcher, PgPool, Planning, ProjectCatalog, Stores, TaskBoard,
    TaskLifecycle, UserDirectory,
};

use axum::{
    Router,
    routing::{get, post},
};
use handlers::{agents, plans, projects, providers, reports, tasks, users};
use tower_http::trace::TraceLayer;

/// Builds the `/api` router over the given state.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/projects/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/projects/{id}/stats", get(projects::project_stats))
        .route("/projects/{id}/tasks", get(projects::project_tasks))
        .route("/projects/{id}/agents", get(projects::project_agents))
        .route(
            "/projects/{id}/execution-plan",
            get(plans::active_plan)
                .post(plans::create_plan)
                .put(plans::update_active_plan),
        )
        .route("/projects/{id}/execution-plans", get(plans::list_plans))
        .route("/execution-plans/{id}", get(plans::get_plan))
        .route(
            "/execution-plans/{id}/assignments",
            get(plans::plan_assignments),
        )
        .route("/projects/{id}/reports", get(reports::list_reports))
        .route(
            "/projects/{id}/reports/daily",
            get(reports::daily_reports).post(reports::generate_daily),
        )
        .route(
            "/projects/{id}/reports/weekly",
            get(reports::weekly_reports).post(reports::generate_weekly),
        )
        .route(
            "/projects/{id}/reports/generate",
            post(reports::generate_report),
        )
        .route(
            "/agents",
            get(agents::list_agents).post(agents::register_agent),
        )
        .route(
            "/agents/{id}",
            get(agents::get_agent)
                .put(agents::update_agent)
                .delete(agents::delete_agent),
        )
        .route("/agents/{id}/next-task", get(agents::next_task))
        .route("/agents/{id}/task-complete", post(agents::task_complete))
        .route("/agents/{id}/context", get(agents::agent_context))
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/tasks/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/tasks/{id}/start", post(tasks::start_task))
        .route("/tasks/{id}/done", post(tasks::complete_task))
        .route("/tasks/{id}/close", post(tasks::close_task))
        .route("/tasks/{id}/wontdo", post(tasks::wont_do_task))
        .route("/tasks/{id}/reopen", post(tasks::reopen_task))
        .route("/tasks/{id}/assign", post(tasks::assign_task))
        .route("/tasks/{id}/reviewer", post(tasks::set_reviewer))
        .route(
            "/tasks/{id}/activities",
            get(tasks::list_activities).post(tasks::add_progress),
        )
        .route("/providers", get(providers::list_providers))
        .route("/providers/{name}", get(providers::get_provider))
        .route("/providers/{name}/models", get(providers::list_models))
}

#[cfg(test)]
mod tests;
