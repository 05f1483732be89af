use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PickerError {
    #[error("participant name is empty")]
    EmptyName,

    #[error("participant {name} is already on the roster")]
    DuplicateName { name: String },

    #[error("roster is full ({max} participants)")]
    RosterFull { max: u32 },

    #[error("at least 2 participants are required to draw, roster has {count}")]
    InsufficientParticipants { count: usize },

    /// Reported while decoding a stored snapshot. Never returned from a load.
    #[error("corrupt snapshot field {field}: {reason}")]
    CorruptSnapshot { field: String, reason: String },
}
