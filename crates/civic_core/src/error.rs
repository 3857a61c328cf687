use crate::schema::IssueStatus;

#[derive(Debug, thiserror::Error)]
pub enum CivicError {
    #[error("Issue not found: {0}")]
    IssueNotFound(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: IssueStatus, to: IssueStatus },

    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("Invalid timestamp {value}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: time::error::Parse,
    },
}

pub type Result<T> = std::result::Result<T, CivicError>;
