//! The module contains the representation of a donation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError,
    investing::{FundingState, Investable},
};

/// Money given by a user, distributed to open projects oldest first.
///
/// A donation tracks how much of itself has been allocated to projects with
/// the same [`FundingState`] a project uses to track how much it collected.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    /// Username of the donor.
    pub user_id: String,
    pub comment: Option<String>,
    pub funding: FundingState,
}

impl Donation {
    pub fn new(
        user_id: String,
        target_amount: i64,
        comment: Option<String>,
        opened_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            comment,
            funding: FundingState::new(target_amount, opened_at),
        }
    }
}

impl Investable for Donation {
    fn funding(&self) -> &FundingState {
        &self.funding
    }

    fn funding_mut(&mut self) -> &mut FundingState {
        &mut self.funding
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub comment: Option<String>,
    pub target_amount: i64,
    pub allocated_amount: i64,
    pub fully_funded: bool,
    pub opened_at: DateTimeUtc,
    pub closed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Donation> for ActiveModel {
    fn from(donation: &Donation) -> Self {
        Self {
            id: ActiveValue::Set(donation.id.to_string()),
            user_id: ActiveValue::Set(donation.user_id.clone()),
            comment: ActiveValue::Set(donation.comment.clone()),
            target_amount: ActiveValue::Set(donation.funding.target_amount),
            allocated_amount: ActiveValue::Set(donation.funding.allocated_amount),
            fully_funded: ActiveValue::Set(donation.funding.fully_funded),
            opened_at: ActiveValue::Set(donation.funding.opened_at),
            closed_at: ActiveValue::Set(donation.funding.closed_at),
        }
    }
}

impl TryFrom<Model> for Donation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::KeyNotFound(format!("invalid donation id {}", model.id)))?;

        Ok(Self {
            id,
            user_id: model.user_id,
            comment: model.comment,
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
