use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Donation, EngineError, Project, ResultEngine, donations,
    investing::{allocate, close_if_fully_funded},
    projects,
};

use super::{
    Engine, normalize_project_name, normalize_required_text, open_donations, validate_target_amount,
    with_tx,
};

/// Partial update of an open project. Absent fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<i64>,
}

/// Update only the funding columns of a touched donation.
fn donation_funding_update(donation: &Donation) -> donations::ActiveModel {
    donations::ActiveModel {
        id: ActiveValue::Set(donation.id.to_string()),
        allocated_amount: ActiveValue::Set(donation.funding.allocated_amount),
        fully_funded: ActiveValue::Set(donation.funding.fully_funded),
        closed_at: ActiveValue::Set(donation.funding.closed_at),
        ..Default::default()
    }
}

impl Engine {
    /// Create a project and immediately fill it from the open donations,
    /// oldest donation first.
    pub async fn create_project(
        &self,
        name: &str,
        description: &str,
        target_amount: i64,
    ) -> ResultEngine<Project> {
        let name = normalize_project_name(name)?;
        let description = normalize_required_text(description, "description")?;
        validate_target_amount(target_amount)?;

        with_tx!(self, |db_tx| {
            if projects::Entity::find()
                .filter(projects::Column::Name.eq(name.as_str()))
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(name));
            }

            let now = Utc::now();
            let mut project = Project::new(name, description, target_amount, now);

            let mut sources = open_donations(&db_tx).await?;
            let touched = allocate(&mut project, &mut sources, now);

            projects::ActiveModel::from(&project).insert(&db_tx).await?;
            for index in touched {
                donation_funding_update(&sources[index]).update(&db_tx).await?;
            }

            tracing::debug!(project = %project.id, "created project");
            Ok(project)
        })
    }

    /// Update an open project.
    ///
    /// The target amount can only move to a value covering what is already
    /// allocated; landing exactly on the allocated amount closes the project.
    /// Afterwards the open donations are re-run against the project, since a
    /// raised target may have new room to fill.
    pub async fn update_project(
        &self,
        project_id: Uuid,
        update: ProjectUpdate,
    ) -> ResultEngine<Project> {
        with_tx!(self, |db_tx| {
            let model = projects::Entity::find_by_id(project_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("project not exists".to_string()))?;
            let mut project = Project::try_from(model)?;

            if project.funding.fully_funded {
                return Err(EngineError::ClosedEntity(project.name));
            }

            if let Some(name) = update.name {
                let name = normalize_project_name(&name)?;
                let duplicate = projects::Entity::find()
                    .filter(projects::Column::Name.eq(name.as_str()))
                    .filter(projects::Column::Id.ne(project_id.to_string()))
                    .one(&db_tx)
                    .await?;
                if duplicate.is_some() {
                    return Err(EngineError::ExistingKey(name));
                }
                project.name = name;
            }

            if let Some(description) = update.description {
                project.description = normalize_required_text(&description, "description")?;
            }

            if let Some(target_amount) = update.target_amount {
                validate_target_amount(target_amount)?;
                if target_amount < project.funding.allocated_amount {
                    return Err(EngineError::InvalidAmount(format!(
                        "target_amount {target_amount} is below the {} already allocated",
                        project.funding.allocated_amount
                    )));
                }
                project.funding.target_amount = target_amount;
            }

            let now = Utc::now();
            close_if_fully_funded(&mut project, now);

            let mut sources = open_donations(&db_tx).await?;
            let touched = allocate(&mut project, &mut sources, now);

            projects::ActiveModel::from(&project).update(&db_tx).await?;
            for index in touched {
                donation_funding_update(&sources[index]).update(&db_tx).await?;
            }

            tracing::debug!(project = %project.id, "updated project");
            Ok(project)
        })
    }

    /// Delete a project that never received funds and is still open.
    pub async fn delete_project(&self, project_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = projects::Entity::find_by_id(project_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("project not exists".to_string()))?;

            if model.fully_funded {
                return Err(EngineError::ClosedEntity(model.name));
            }
            if model.allocated_amount > 0 {
                return Err(EngineError::HasAllocations(model.name));
            }

            projects::Entity::delete_by_id(project_id.to_string())
                .exec(&db_tx)
                .await?;

            tracing::debug!(project = %project_id, "deleted project");
            Ok(())
        })
    }

    /// Return a single project.
    pub async fn project(&self, project_id: Uuid) -> ResultEngine<Project> {
        let model = projects::Entity::find_by_id(project_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("project not exists".to_string()))?;
        Project::try_from(model)
    }

    /// Return every project, oldest first.
    pub async fn list_projects(&self) -> ResultEngine<Vec<Project>> {
        projects::Entity::find()
            .order_by_asc(projects::Column::OpenedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Project::try_from)
            .collect()
    }
}
