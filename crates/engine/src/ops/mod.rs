use sea_orm::{DatabaseConnection, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{Donation, EngineError, Project, ResultEngine, donations, projects};

mod donation_ops;
mod project_ops;

pub use project_ops::ProjectUpdate;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Business operations over projects and donations.
///
/// Every operation runs in a single DB transaction: read the open
/// counterpart entities, run one allocation, persist the touched rows.
/// There is no row locking or versioning on top of that; two transactions
/// that read the same open set before either commits are serialized only as
/// far as the underlying store serializes them.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidField(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Project names are unique and capped at 100 characters.
fn normalize_project_name(value: &str) -> ResultEngine<String> {
    let name = normalize_required_text(value, "project name")?;
    if name.chars().count() > 100 {
        return Err(EngineError::InvalidField(
            "project name must not exceed 100 characters".to_string(),
        ));
    }
    Ok(name)
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn validate_target_amount(target_amount: i64) -> ResultEngine<()> {
    if target_amount <= 0 {
        return Err(EngineError::InvalidAmount(
            "target_amount must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Open donations, oldest first. The FIFO order the allocation relies on.
async fn open_donations(db_tx: &DatabaseTransaction) -> ResultEngine<Vec<Donation>> {
    donations::Entity::find()
        .filter(donations::Column::FullyFunded.eq(false))
        .order_by_asc(donations::Column::OpenedAt)
        .all(db_tx)
        .await?
        .into_iter()
        .map(Donation::try_from)
        .collect()
}

/// Open projects, oldest first.
async fn open_projects(db_tx: &DatabaseTransaction) -> ResultEngine<Vec<Project>> {
    projects::Entity::find()
        .filter(projects::Column::FullyFunded.eq(false))
        .order_by_asc(projects::Column::OpenedAt)
        .all(db_tx)
        .await?
        .into_iter()
        .map(Project::try_from)
        .collect()
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
