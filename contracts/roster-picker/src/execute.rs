use cosmwasm_std::{Decimal, DepsMut, Env, Event, MessageInfo, Response, Storage};
use picker_common::{draw, ticket_pool, DrawStatus, SeedBuilder, Snapshot};

use crate::error::ContractError;
use crate::msg::UpdateConfigParams;
use crate::state::{
    load_snapshot, save_snapshot, Draw, DrawStateInfo, PickerConfig, CONFIG, DRAWS, DRAW_STATE,
};

/// Check tunables before they are stored.
pub fn validate_config(config: &PickerConfig) -> Result<(), ContractError> {
    if config.max_participants < 2 {
        return Err(ContractError::InvalidConfig {
            reason: format!(
                "max_participants must be at least 2, got {}",
                config.max_participants
            ),
        });
    }
    if config.weights.base_tickets == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "base_tickets must be at least 1".to_string(),
        });
    }
    let factor = config.weights.penalty_factor;
    if factor.is_zero() || factor > Decimal::one() {
        return Err(ContractError::InvalidConfig {
            reason: format!("penalty_factor must be in (0, 1], got {factor}"),
        });
    }
    Ok(())
}

/// Roster and stats are frozen while a draw waits for its reveal.
fn ensure_idle(storage: &dyn Storage) -> Result<DrawStateInfo, ContractError> {
    let state = DRAW_STATE.load(storage)?;
    if let Some(draw_id) = state.in_flight {
        return Err(ContractError::DrawInProgress { draw_id });
    }
    Ok(state)
}

/// Load the snapshot, flagging the response when stored data had to be discarded.
fn open_snapshot(deps: &DepsMut, response: Response) -> (Snapshot, Response) {
    let deps = deps.as_ref();
    let decoded = load_snapshot(deps.storage, deps.api);
    if decoded.is_clean() {
        (decoded.snapshot, response)
    } else {
        let response = response.add_attribute("snapshot_recovered", "true");
        (decoded.snapshot, response)
    }
}

pub fn add_participant(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    name: String,
) -> Result<Response, ContractError> {
    ensure_idle(deps.storage)?;
    let config = CONFIG.load(deps.storage)?;
    let (mut snapshot, response) = open_snapshot(&deps, Response::new());

    let mut rng = SeedBuilder::new("roster-picker/avatar")
        .u64(env.block.height)
        .u64(env.block.time.nanos())
        .part(info.sender.as_bytes())
        .part(name.as_bytes())
        .finish();
    let name = snapshot.add_participant(&name, config.max_participants, &mut rng)?;
    save_snapshot(deps.storage, &snapshot)?;

    Ok(response
        .add_attribute("action", "add_participant")
        .add_attribute("name", name.clone())
        .add_event(
            Event::new("picker_participant_added")
                .add_attribute("name", name.clone())
                .add_attribute("avatar", snapshot.avatar(&name))
                .add_attribute("roster_size", snapshot.roster.len().to_string()),
        ))
}

pub fn remove_participant(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    name: String,
) -> Result<Response, ContractError> {
    ensure_idle(deps.storage)?;
    let (mut snapshot, response) = open_snapshot(&deps, Response::new());

    let name = name.trim().to_string();
    let removed = snapshot.remove_participant(&name);
    save_snapshot(deps.storage, &snapshot)?;

    Ok(response
        .add_attribute("action", "remove_participant")
        .add_attribute("name", name.clone())
        .add_event(
            Event::new("picker_participant_removed")
                .add_attribute("name", name)
                .add_attribute("removed", removed.to_string())
                .add_attribute("roster_size", snapshot.roster.len().to_string()),
        ))
}

pub fn set_context(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    context: String,
) -> Result<Response, ContractError> {
    ensure_idle(deps.storage)?;
    let (mut snapshot, response) = open_snapshot(&deps, Response::new());

    snapshot.context = context;
    save_snapshot(deps.storage, &snapshot)?;

    Ok(response
        .add_attribute("action", "set_context")
        .add_event(
            Event::new("picker_context_set").add_attribute("context", snapshot.context.clone()),
        ))
}

/// Start a draw. The winner is chosen here; the delay only postpones the reveal.
/// A zero delay resolves in the same call.
pub fn start_draw(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    delay_ms: Option<u64>,
    entropy_hex: Option<String>,
) -> Result<Response, ContractError> {
    let mut state = ensure_idle(deps.storage)?;
    let config = CONFIG.load(deps.storage)?;
    let (snapshot, response) = open_snapshot(&deps, Response::new());

    let entropy = match entropy_hex {
        Some(hex_str) => hex::decode(&hex_str).map_err(|_| ContractError::InvalidHex {
            field: "entropy_hex".to_string(),
        })?,
        None => vec![],
    };

    let draw_id = state.next_draw_id;
    let tx_index = env.transaction.as_ref().map(|tx| tx.index as u64).unwrap_or(0);
    let mut rng = SeedBuilder::new("roster-picker/draw")
        .u64(draw_id)
        .u64(env.block.height)
        .u64(env.block.time.nanos())
        .u64(tx_index)
        .part(info.sender.as_bytes())
        .part(&entropy)
        .finish();
    let seed = rng.seed_hex();

    let outcome = draw(&snapshot.roster, &snapshot.penalties, &config.weights, &mut rng)?;
    let pool = ticket_pool(&snapshot.roster, &snapshot.penalties, &config.weights);

    let delay_ms = delay_ms.unwrap_or(config.draw_delay_ms);
    let resolve_at = env.block.time.plus_nanos(delay_ms.saturating_mul(1_000_000));

    let record = Draw {
        id: draw_id,
        status: DrawStatus::Drawing,
        requested_by: info.sender.clone(),
        winner: outcome.winner.clone(),
        ticket: outcome.ticket,
        pool_size: outcome.pool_size,
        pool,
        seed: seed.clone(),
        started_at: env.block.time,
        resolve_at,
        resolved_at: None,
        display_text: None,
    };
    DRAWS.save(deps.storage, draw_id, &record)?;

    state.next_draw_id += 1;
    state.in_flight = Some(draw_id);
    DRAW_STATE.save(deps.storage, &state)?;

    // Carries what the reveal animation needs.
    let response = response
        .add_attribute("action", "start_draw")
        .add_attribute("draw_id", draw_id.to_string())
        .add_event(
            Event::new("picker_draw_started")
                .add_attribute("draw_id", draw_id.to_string())
                .add_attribute("ticket", outcome.ticket.to_string())
                .add_attribute("pool_size", outcome.pool_size.to_string())
                .add_attribute("participants", snapshot.roster.len().to_string())
                .add_attribute("delay_ms", delay_ms.to_string())
                .add_attribute("resolve_at", resolve_at.nanos().to_string())
                .add_attribute("seed", seed),
        );

    if delay_ms == 0 {
        let resolved = finish_draw(&mut deps, &env, state, record)?;
        return Ok(response.add_event(resolved));
    }
    Ok(response)
}

/// Reveal the in-flight draw once its delay has passed.
pub fn resolve_draw(
    mut deps: DepsMut,
    env: Env,
    _info: MessageInfo,
) -> Result<Response, ContractError> {
    let state = DRAW_STATE.load(deps.storage)?;
    let draw_id = state.in_flight.ok_or(ContractError::NoDrawInProgress)?;
    let record = DRAWS
        .may_load(deps.storage, draw_id)?
        .ok_or(ContractError::DrawNotFound { draw_id })?;

    if env.block.time < record.resolve_at {
        return Err(ContractError::DrawNotReady {
            draw_id,
            resolve_at: record.resolve_at.nanos(),
        });
    }

    let resolved = finish_draw(&mut deps, &env, state, record)?;
    Ok(Response::new()
        .add_attribute("action", "resolve_draw")
        .add_attribute("draw_id", draw_id.to_string())
        .add_event(resolved))
}

/// Apply the fixed outcome: record the win, penalize the winner, persist, go idle.
fn finish_draw(
    deps: &mut DepsMut,
    env: &Env,
    mut state: DrawStateInfo,
    mut record: Draw,
) -> Result<Event, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut snapshot = load_snapshot(deps.storage, deps.api).snapshot;

    snapshot.record_draw(
        &record.winner,
        config.weights.penalty_factor,
        &config.penalty_policy,
    );
    let display_text = snapshot.display_text(&record.winner);
    save_snapshot(deps.storage, &snapshot)?;

    record.status = DrawStatus::Resolved;
    record.resolved_at = Some(env.block.time);
    record.display_text = Some(display_text.clone());
    DRAWS.save(deps.storage, record.id, &record)?;

    state.in_flight = None;
    state.total_draws_completed += 1;
    DRAW_STATE.save(deps.storage, &state)?;

    Ok(Event::new("picker_draw_resolved")
        .add_attribute("draw_id", record.id.to_string())
        .add_attribute("winner", record.winner.clone())
        .add_attribute("display_text", display_text)
        .add_attribute("wins", snapshot.stats.wins(&record.winner).to_string())
        .add_attribute(
            "next_penalty",
            snapshot.penalties.get(&record.winner).to_string(),
        )
        .add_attribute("timestamp", env.block.time.seconds().to_string()))
}

/// Clear the stats ledger. Penalties, roster and history stay.
pub fn reset_stats(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    confirm: bool,
) -> Result<Response, ContractError> {
    if !confirm {
        return Err(ContractError::ResetNotConfirmed);
    }
    ensure_idle(deps.storage)?;
    let (mut snapshot, response) = open_snapshot(&deps, Response::new());

    let cleared_wins = snapshot.stats.total_wins();
    snapshot.stats.reset();
    save_snapshot(deps.storage, &snapshot)?;

    Ok(response
        .add_attribute("action", "reset_stats")
        .add_event(
            Event::new("picker_stats_reset").add_attribute("cleared_wins", cleared_wins.to_string()),
        ))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    params: UpdateConfigParams,
) -> Result<Response, ContractError> {
    let UpdateConfigParams {
        admin,
        max_participants,
        draw_delay_ms,
        base_tickets,
        penalty_factor,
        penalty_policy,
    } = params;

    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }
    // Weights and policy are read again when the in-flight draw resolves.
    ensure_idle(deps.storage)?;

    if let Some(admin) = admin {
        config.admin = deps.api.addr_validate(&admin)?;
    }
    if let Some(max) = max_participants {
        config.max_participants = max;
    }
    if let Some(delay) = draw_delay_ms {
        config.draw_delay_ms = delay;
    }
    if let Some(base) = base_tickets {
        config.weights.base_tickets = base;
    }
    if let Some(factor) = penalty_factor {
        config.weights.penalty_factor = factor;
    }
    if let Some(policy) = penalty_policy {
        config.penalty_policy = policy;
    }

    validate_config(&config)?;
    let roster_size = load_snapshot(deps.storage, deps.api).snapshot.roster.len();
    if (config.max_participants as usize) < roster_size {
        return Err(ContractError::InvalidConfig {
            reason: format!(
                "max_participants {} is below the current roster size {roster_size}",
                config.max_participants
            ),
        });
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_event(
            Event::new("picker_config_updated")
                .add_attribute("max_participants", config.max_participants.to_string())
                .add_attribute("draw_delay_ms", config.draw_delay_ms.to_string())
                .add_attribute("base_tickets", config.weights.base_tickets.to_string())
                .add_attribute("penalty_factor", config.weights.penalty_factor.to_string()),
        ))
}
