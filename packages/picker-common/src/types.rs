use cosmwasm_schema::cw_serde;
use cosmwasm_std::Decimal;

/// Tickets an unpenalized participant holds in every draw.
pub const DEFAULT_BASE_TICKETS: u32 = 10;
/// Multiplier written for the winner of a draw, applied to their next draw.
pub const DEFAULT_PENALTY_FACTOR: Decimal = Decimal::raw(500_000_000_000_000_000);
pub const DEFAULT_MAX_PARTICIPANTS: u32 = 30;
pub const DEFAULT_DRAW_DELAY_MS: u64 = 3_000;

/// Lifecycle of a single draw.
#[cw_serde]
pub enum DrawStatus {
    /// Winner fixed, waiting for the reveal delay to pass.
    Drawing,
    Resolved,
}

/// How penalty entries of non-winners behave after a draw.
#[cw_serde]
#[derive(Default)]
pub enum PenaltyPolicy {
    /// Entries stay until the participant wins again and is re-penalized.
    #[default]
    Persist,
    /// Every entry is cleared before the winner's penalty is written.
    ClearAfterDraw,
}

/// Weighting parameters of the ticket pool.
#[cw_serde]
#[derive(Copy)]
pub struct TicketWeights {
    pub base_tickets: u32,
    pub penalty_factor: Decimal,
}

impl Default for TicketWeights {
    fn default() -> Self {
        Self {
            base_tickets: DEFAULT_BASE_TICKETS,
            penalty_factor: DEFAULT_PENALTY_FACTOR,
        }
    }
}

/// A participant's contiguous slice of the ticket pool: `[cumulative_start, cumulative_end)`.
#[cw_serde]
pub struct TicketRange {
    pub name: String,
    pub tickets: u64,
    pub cumulative_start: u64,
    pub cumulative_end: u64,
}

impl TicketRange {
    pub fn contains(&self, ticket: u64) -> bool {
        ticket >= self.cumulative_start && ticket < self.cumulative_end
    }
}

/// Result of one weighted draw.
#[cw_serde]
pub struct DrawOutcome {
    pub winner: String,
    /// Index of the winning ticket in the pool.
    pub ticket: u64,
    pub pool_size: u64,
    /// Tickets the winner held in this draw.
    pub tickets: u64,
}

#[cw_serde]
pub struct StatEntry {
    pub name: String,
    pub wins: u32,
    pub win_rate: Decimal,
}
