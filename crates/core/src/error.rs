use aahara_types::Identity;
use records::Role;

#[derive(Debug, thiserror::Error)]
pub enum CoordinationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("account not found: {0}")]
    AccountNotFound(Identity),

    #[error("expected a {expected} account, found {found}")]
    RoleMismatch { expected: Role, found: Role },

    #[error("patient {patient} is already assigned to dietitian {held_by}")]
    AlreadyAssignedElsewhere { patient: Identity, held_by: Identity },

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),

    #[error("failed to write document: {0}")]
    FileWrite(std::io::Error),

    #[error("failed to read document: {0}")]
    FileRead(std::io::Error),

    #[error("record error: {0}")]
    Record(#[from] records::RecordError),

    #[error("text error: {0}")]
    Text(#[from] aahara_types::TextError),
}

pub type CoordResult<T> = std::result::Result<T, CoordinationError>;
