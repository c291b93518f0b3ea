pub mod buy_vs_rent;
pub mod cash_allocation;
pub mod error;
pub mod mortgage;
pub mod tax;
pub mod types;

pub use error::HearthError;
pub use types::*;

/// Standard result type for all hearth operations
pub type HearthResult<T> = Result<T, HearthError>;
