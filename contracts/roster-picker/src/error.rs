use cosmwasm_std::StdError;
use picker_common::PickerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Picker(#[from] PickerError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("draw {draw_id} is still in progress")]
    DrawInProgress { draw_id: u64 },

    #[error("no draw is in progress")]
    NoDrawInProgress,

    #[error("draw {draw_id} resolves at {resolve_at} (ns)")]
    DrawNotReady { draw_id: u64, resolve_at: u64 },

    #[error("draw {draw_id} not found")]
    DrawNotFound { draw_id: u64 },

    #[error("stats reset must be confirmed")]
    ResetNotConfirmed,

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid hex: {field}")]
    InvalidHex { field: String },
}
