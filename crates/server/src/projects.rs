//! Charity project API endpoints

use api_types::project::{ProjectNew, ProjectUpdate, ProjectView, ProjectsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{EngineError, Project, users};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// Project mutations are reserved to superusers.
pub(crate) fn require_superuser(user: &users::Model) -> Result<(), ServerError> {
    if user.is_superuser {
        Ok(())
    } else {
        Err(ServerError::Engine(EngineError::Forbidden(
            "superuser required".to_string(),
        )))
    }
}

fn view(project: Project) -> ProjectView {
    ProjectView {
        id: project.id,
        name: project.name,
        description: project.description,
        target_amount: project.funding.target_amount,
        allocated_amount: project.funding.allocated_amount,
        fully_funded: project.funding.fully_funded,
        opened_at: project.funding.opened_at,
        closed_at: project.funding.closed_at,
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ProjectNew>,
) -> Result<Json<ProjectView>, ServerError> {
    require_superuser(&user)?;

    let project = state
        .engine
        .create_project(&payload.name, &payload.description, payload.target_amount)
        .await?;

    Ok(Json(view(project)))
}

pub async fn list(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ProjectsResponse>, ServerError> {
    let projects = state.engine.list_projects().await?;

    Ok(Json(ProjectsResponse {
        projects: projects.into_iter().map(view).collect(),
    }))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<ProjectUpdate>,
) -> Result<Json<ProjectView>, ServerError> {
    require_superuser(&user)?;

    let project = state
        .engine
        .update_project(
            project_id,
            engine::ProjectUpdate {
                name: payload.name,
                description: payload.description,
                target_amount: payload.target_amount,
            },
        )
        .await?;

    Ok(Json(view(project)))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(project_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    require_superuser(&user)?;

    state.engine.delete_project(project_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
