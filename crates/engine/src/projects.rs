//! The module contains the representation of a charity project.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError,
    investing::{FundingState, Investable},
};

/// A charity project collecting donations toward a fixed target.
///
/// The funding bookkeeping (target, allocated amount, close state) lives in
/// [`FundingState`]; a project adds a unique name and a description.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    /// Stable identifier, generated once and persisted.
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub funding: FundingState,
}

impl Project {
    pub fn new(
        name: String,
        description: String,
        target_amount: i64,
        opened_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            funding: FundingState::new(target_amount, opened_at),
        }
    }
}

impl Investable for Project {
    fn funding(&self) -> &FundingState {
        &self.funding
    }

    fn funding_mut(&mut self) -> &mut FundingState {
        &mut self.funding
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "charity_projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub target_amount: i64,
    pub allocated_amount: i64,
    pub fully_funded: bool,
    pub opened_at: DateTimeUtc,
    pub closed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Project> for ActiveModel {
    fn from(project: &Project) -> Self {
        Self {
            id: ActiveValue::Set(project.id.to_string()),
            name: ActiveValue::Set(project.name.clone()),
            description: ActiveValue::Set(project.description.clone()),
            target_amount: ActiveValue::Set(project.funding.target_amount),
            allocated_amount: ActiveValue::Set(project.funding.allocated_amount),
            fully_funded: ActiveValue::Set(project.funding.fully_funded),
            opened_at: ActiveValue::Set(project.funding.opened_at),
            closed_at: ActiveValue::Set(project.funding.closed_at),
        }
    }
}

impl TryFrom<Model> for Project {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::KeyNotFound(format!("invalid project id {}", model.id)))?;

        Ok(Self {
            id,
            name: model.name,
            description: model.description,
            funding: FundingState {
                target_amount: model.target_amount,
                allocated_amount: model.allocated_amount,
                fully_funded: model.fully_funded,
                opened_at: model.opened_at,
                closed_at: model.closed_at,
            },
        })
    }
}
