pub use donations::Donation;
pub use error::EngineError;
pub use investing::{FundingState, Investable, allocate, close_if_fully_funded};
pub use ops::{Engine, EngineBuilder, ProjectUpdate};
pub use projects::Project;

pub mod donations;
mod error;
mod investing;
mod ops;
pub mod projects;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
