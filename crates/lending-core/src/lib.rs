pub mod currency;
pub mod error;
pub mod pagination;
pub mod record;
pub mod types;

#[cfg(feature = "amortisation")]
pub mod amortisation;

#[cfg(feature = "amortisation")]
pub mod schedule;

#[cfg(feature = "portfolio")]
pub mod portfolio;

pub use error::LendingError;
pub use types::*;

/// Standard result type for all lending-core operations
pub type LendingResult<T> = Result<T, LendingError>;
