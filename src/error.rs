#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: String,
        value: f64,
        reason: &'static str,
    },
    #[error("node `{0}` already exists")]
    DuplicateNode(String),
    #[error("node `{0}` does not exist")]
    UnknownNode(String),
    #[error("node `{0}` is not being dragged")]
    NotDragging(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn invalid(name: impl Into<String>, value: f64, reason: &'static str) -> Error {
    Error::InvalidParameter {
        name: name.into(),
        value,
        reason,
    }
}
