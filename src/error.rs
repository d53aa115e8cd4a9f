/// Errors returned by the catalog and the simulation engine.
///
/// Every variant is recoverable: the caller is expected to correct its input
/// (pick a listed intervention, supply positive numbers) and try again.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("intervention '{name}' not found in catalog")]
    NotFound { name: String },

    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("throughput at minute {minute} is not positive, wait time is undefined")]
    DegenerateStep { minute: u32 },

    #[error("cannot aggregate an empty series")]
    EmptySeries,

    #[error("intervention '{name}' is registered more than once")]
    DuplicateName { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
