pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "sroi")]
pub mod sroi;

#[cfg(feature = "sensitivity")]
pub mod scenarios;

pub use error::SroiError;
pub use types::*;

/// Standard result type for all sroi-core operations
pub type SroiEngineResult<T> = Result<T, SroiError>;
