use cosmwasm_std::{to_json_binary, Binary, Deps, Order, StdResult};
use cw_storage_plus::Bound;
use picker_common::selector::ticket_count;
use picker_common::snapshot::DEFAULT_SUGGESTION_LIMIT;
use picker_common::ticket_pool;

use crate::msg::{
    DrawHistoryResponse, DrawPhase, DrawStateResponse, ParticipantCard, PenaltiesResponse,
    RosterResponse, StatsResponse, TicketPoolResponse,
};
use crate::state::{load_snapshot, CONFIG, DRAWS, DRAW_STATE};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_roster(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let snapshot = load_snapshot(deps.storage, deps.api).snapshot;

    let participants = snapshot
        .roster
        .iter()
        .map(|name| ParticipantCard {
            name: name.to_string(),
            avatar: snapshot.avatar(name).to_string(),
            wins: snapshot.stats.wins(name),
            win_rate: snapshot.stats.win_rate(name),
            tickets: ticket_count(&config.weights, snapshot.penalties.get(name)),
            penalized: snapshot.penalties.is_penalized(name),
        })
        .collect();

    to_json_binary(&RosterResponse {
        participants,
        max_participants: config.max_participants,
        can_draw: snapshot.roster.len() >= 2,
    })
}

pub fn query_stats(deps: Deps) -> StdResult<Binary> {
    let snapshot = load_snapshot(deps.storage, deps.api).snapshot;
    to_json_binary(&StatsResponse {
        total_wins: snapshot.stats.total_wins(),
        entries: snapshot.stats.ranked(),
    })
}

pub fn query_win_rate(deps: Deps, name: String) -> StdResult<Binary> {
    let snapshot = load_snapshot(deps.storage, deps.api).snapshot;
    to_json_binary(&snapshot.stats.win_rate(name.trim()))
}

pub fn query_penalties(deps: Deps) -> StdResult<Binary> {
    let snapshot = load_snapshot(deps.storage, deps.api).snapshot;
    to_json_binary(&PenaltiesResponse {
        penalties: snapshot.penalties.to_pairs(),
    })
}

pub fn query_ticket_pool(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let snapshot = load_snapshot(deps.storage, deps.api).snapshot;
    let ranges = ticket_pool(&snapshot.roster, &snapshot.penalties, &config.weights);
    to_json_binary(&TicketPoolResponse {
        pool_size: ranges.last().map(|r| r.cumulative_end).unwrap_or(0),
        ranges,
    })
}

pub fn query_draw_state(deps: Deps) -> StdResult<Binary> {
    let state = DRAW_STATE.load(deps.storage)?;
    let phase = match state.in_flight {
        Some(draw_id) => {
            let draw = DRAWS.load(deps.storage, draw_id)?;
            DrawPhase::Drawing {
                draw_id,
                resolve_at: draw.resolve_at,
            }
        }
        None => DrawPhase::Idle,
    };
    to_json_binary(&DrawStateResponse {
        phase,
        next_draw_id: state.next_draw_id,
        total_draws_completed: state.total_draws_completed,
    })
}

pub fn query_draw(deps: Deps, draw_id: u64) -> StdResult<Binary> {
    let draw = DRAWS.load(deps.storage, draw_id)?;
    to_json_binary(&draw)
}

pub fn query_draw_history(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let draws: Vec<_> = DRAWS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, draw)| draw)
        .collect();

    to_json_binary(&DrawHistoryResponse { draws })
}

pub fn query_suggestions(deps: Deps, query: String, limit: Option<u32>) -> StdResult<Binary> {
    let limit = limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT).min(50) as usize;
    let snapshot = load_snapshot(deps.storage, deps.api).snapshot;
    to_json_binary(&snapshot.suggestions(&query, limit))
}

pub fn query_snapshot(deps: Deps) -> StdResult<Binary> {
    let snapshot = load_snapshot(deps.storage, deps.api).snapshot;
    to_json_binary(&snapshot.to_data())
}
