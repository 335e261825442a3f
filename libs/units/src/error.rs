use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("cannot convert unit {from} to {to}")]
    Incompatible { from: String, to: String },

    #[error("unit name '{0}' is already registered")]
    DuplicateName(String),

    #[error("auto-conversion group must not be empty")]
    EmptyGroup,

    #[error("auto-conversion group mixes families '{0}' and '{1}'")]
    MixedGroup(String, String),

    #[error("numeric overflow")]
    Overflow,
}
