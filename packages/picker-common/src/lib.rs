pub mod avatar;
pub mod entropy;
pub mod error;
pub mod ledger;
pub mod roster;
pub mod selector;
pub mod snapshot;
pub mod types;

pub use entropy::{HashEntropy, SeedBuilder};
pub use error::PickerError;
pub use ledger::{PenaltyTable, StatsLedger};
pub use roster::Roster;
pub use selector::{draw, ticket_pool, RandomSource};
pub use snapshot::{DecodedSnapshot, Snapshot};
pub use types::{DrawOutcome, DrawStatus, PenaltyPolicy, StatEntry, TicketRange, TicketWeights};
