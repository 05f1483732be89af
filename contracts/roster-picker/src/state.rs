use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Api, StdError, StdResult, Storage, Timestamp};
use cw_storage_plus::{Item, Map};
use picker_common::{DecodedSnapshot, DrawStatus, PenaltyPolicy, Snapshot, TicketRange, TicketWeights};

/// Fixed storage key of the persisted snapshot.
pub const SNAPSHOT_KEY: &str = "picker_snapshot";

pub const CONFIG: Item<PickerConfig> = Item::new("config");
pub const DRAW_STATE: Item<DrawStateInfo> = Item::new("draw_state");
pub const DRAWS: Map<u64, Draw> = Map::new("draws");

#[cw_serde]
pub struct PickerConfig {
    pub admin: Addr,
    pub max_participants: u32,
    /// Default reveal delay, used when a draw request does not set one
    pub draw_delay_ms: u64,
    pub weights: TicketWeights,
    pub penalty_policy: PenaltyPolicy,
}

#[cw_serde]
#[derive(Default)]
pub struct DrawStateInfo {
    pub next_draw_id: u64,
    pub total_draws_completed: u64,
    /// Draw currently between start and resolution. At most one.
    pub in_flight: Option<u64>,
}

#[cw_serde]
pub struct Draw {
    pub id: u64,
    pub status: DrawStatus,
    pub requested_by: Addr,
    /// Fixed when the draw starts; the reveal delay never changes it.
    pub winner: String,
    pub ticket: u64,
    pub pool_size: u64,
    pub pool: Vec<TicketRange>,
    /// sha256 of the seed material, hex-encoded
    pub seed: String,
    pub started_at: Timestamp,
    pub resolve_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
    pub display_text: Option<String>,
}

/// Read the snapshot. Absent means empty; malformed fields are dropped and reported
/// through `api.debug`, never returned as an error.
pub fn load_snapshot(storage: &dyn Storage, api: &dyn Api) -> DecodedSnapshot {
    let Some(bytes) = storage.get(SNAPSHOT_KEY.as_bytes()) else {
        return DecodedSnapshot::default();
    };
    let decoded = Snapshot::decode(&bytes);
    for issue in &decoded.issues {
        api.debug(&format!("roster-picker: recovered snapshot: {issue}"));
    }
    decoded
}

/// Overwrite the stored snapshot as a whole.
pub fn save_snapshot(storage: &mut dyn Storage, snapshot: &Snapshot) -> StdResult<()> {
    let bytes = snapshot
        .encode()
        .map_err(|err| StdError::serialize_err("Snapshot", err))?;
    storage.set(SNAPSHOT_KEY.as_bytes(), &bytes);
    Ok(())
}
