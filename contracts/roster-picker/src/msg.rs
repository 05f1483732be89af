use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Decimal, Timestamp};
use picker_common::snapshot::SnapshotData;
use picker_common::{PenaltyPolicy, StatEntry, TicketRange};

use crate::state::{Draw, PickerConfig};

/// Every field falls back to the library default when omitted.
#[cw_serde]
#[derive(Default)]
pub struct InstantiateMsg {
    pub max_participants: Option<u32>,
    pub draw_delay_ms: Option<u64>,
    pub base_tickets: Option<u32>,
    pub penalty_factor: Option<Decimal>,
    pub penalty_policy: Option<PenaltyPolicy>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Add a name to the roster. Surrounding whitespace is trimmed.
    AddParticipant { name: String },
    /// Take a name off the roster. Its stats and penalty are kept.
    RemoveParticipant { name: String },
    /// Free text appended to the winner announcement.
    SetContext { context: String },
    /// Fix a winner now and reveal it after the delay.
    StartDraw {
        /// Overrides the configured reveal delay for this draw
        delay_ms: Option<u64>,
        /// Extra hex-encoded bytes mixed into the draw seed
        entropy_hex: Option<String>,
    },
    /// Reveal the pending draw once its delay has passed. Anyone can call.
    ResolveDraw {},
    /// Clear all win counts. Irreversible, so it must be confirmed.
    ResetStats { confirm: bool },
    /// Update configuration. Admin only.
    UpdateConfig {
        admin: Option<String>,
        max_participants: Option<u32>,
        draw_delay_ms: Option<u64>,
        base_tickets: Option<u32>,
        penalty_factor: Option<Decimal>,
        penalty_policy: Option<PenaltyPolicy>,
    },
}

/// Parameters for update_config, grouped to keep the function signature short.
pub struct UpdateConfigParams {
    pub admin: Option<String>,
    pub max_participants: Option<u32>,
    pub draw_delay_ms: Option<u64>,
    pub base_tickets: Option<u32>,
    pub penalty_factor: Option<Decimal>,
    pub penalty_policy: Option<PenaltyPolicy>,
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(PickerConfig)]
    Config {},
    #[returns(RosterResponse)]
    Roster {},
    #[returns(StatsResponse)]
    Stats {},
    #[returns(Decimal)]
    WinRate { name: String },
    #[returns(PenaltiesResponse)]
    Penalties {},
    /// Ticket layout the next draw would use.
    #[returns(TicketPoolResponse)]
    TicketPool {},
    #[returns(DrawStateResponse)]
    DrawState {},
    #[returns(Draw)]
    Draw { draw_id: u64 },
    #[returns(DrawHistoryResponse)]
    DrawHistory {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Known names matching `query` that are not on the roster.
    #[returns(Vec<String>)]
    Suggestions { query: String, limit: Option<u32> },
    #[returns(SnapshotData)]
    Snapshot {},
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct ParticipantCard {
    pub name: String,
    pub avatar: String,
    pub wins: u32,
    pub win_rate: Decimal,
    /// Tickets held in the next draw
    pub tickets: u64,
    /// True while a penalty below 1.0 applies to the next draw
    pub penalized: bool,
}

#[cw_serde]
pub struct RosterResponse {
    pub participants: Vec<ParticipantCard>,
    pub max_participants: u32,
    pub can_draw: bool,
}

#[cw_serde]
pub struct StatsResponse {
    pub total_wins: u64,
    /// Descending by wins
    pub entries: Vec<StatEntry>,
}

#[cw_serde]
pub struct PenaltiesResponse {
    pub penalties: Vec<(String, Decimal)>,
}

#[cw_serde]
pub struct TicketPoolResponse {
    pub pool_size: u64,
    pub ranges: Vec<TicketRange>,
}

#[cw_serde]
pub enum DrawPhase {
    Idle,
    Drawing { draw_id: u64, resolve_at: Timestamp },
}

#[cw_serde]
pub struct DrawStateResponse {
    pub phase: DrawPhase,
    pub next_draw_id: u64,
    pub total_draws_completed: u64,
}

#[cw_serde]
pub struct DrawHistoryResponse {
    pub draws: Vec<Draw>,
}
