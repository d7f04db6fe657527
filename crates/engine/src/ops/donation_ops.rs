use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{Donation, Project, ResultEngine, donations, investing::allocate, projects};

use super::{Engine, normalize_optional_text, open_projects, validate_target_amount, with_tx};

/// Update only the funding columns of a touched project.
fn project_funding_update(project: &Project) -> projects::ActiveModel {
    projects::ActiveModel {
        id: ActiveValue::Set(project.id.to_string()),
        allocated_amount: ActiveValue::Set(project.funding.allocated_amount),
        fully_funded: ActiveValue::Set(project.funding.fully_funded),
        closed_at: ActiveValue::Set(project.funding.closed_at),
        ..Default::default()
    }
}

impl Engine {
    /// Record a donation and immediately distribute it over the open
    /// projects, oldest project first.
    pub async fn create_donation(
        &self,
        user_id: &str,
        target_amount: i64,
        comment: Option<&str>,
    ) -> ResultEngine<Donation> {
        validate_target_amount(target_amount)?;
        let comment = normalize_optional_text(comment);

        with_tx!(self, |db_tx| {
            let now = Utc::now();
            let mut donation = Donation::new(user_id.to_string(), target_amount, comment, now);

            let mut sources = open_projects(&db_tx).await?;
            let touched = allocate(&mut donation, &mut sources, now);

            donations::ActiveModel::from(&donation).insert(&db_tx).await?;
            for index in touched {
                project_funding_update(&sources[index]).update(&db_tx).await?;
            }

            tracing::debug!(donation = %donation.id, user = user_id, "created donation");
            Ok(donation)
        })
    }

    /// Return every donation, oldest first.
    pub async fn list_donations(&self) -> ResultEngine<Vec<Donation>> {
        donations::Entity::find()
            .order_by_asc(donations::Column::OpenedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Donation::try_from)
            .collect()
    }

    /// Return the donations made by one user, oldest first.
    pub async fn donations_for_user(&self, user_id: &str) -> ResultEngine<Vec<Donation>> {
        donations::Entity::find()
            .filter(donations::Column::UserId.eq(user_id))
            .order_by_asc(donations::Column::OpenedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Donation::try_from)
            .collect()
    }
}
