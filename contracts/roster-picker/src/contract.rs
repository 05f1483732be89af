use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};
use picker_common::types::{
    DEFAULT_BASE_TICKETS, DEFAULT_DRAW_DELAY_MS, DEFAULT_MAX_PARTICIPANTS, DEFAULT_PENALTY_FACTOR,
};
use picker_common::TicketWeights;

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, UpdateConfigParams};
use crate::query;
use crate::state::{DrawStateInfo, PickerConfig, CONFIG, DRAW_STATE};

const CONTRACT_NAME: &str = "crates.io:roster-picker";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = PickerConfig {
        admin: info.sender.clone(),
        max_participants: msg.max_participants.unwrap_or(DEFAULT_MAX_PARTICIPANTS),
        draw_delay_ms: msg.draw_delay_ms.unwrap_or(DEFAULT_DRAW_DELAY_MS),
        weights: TicketWeights {
            base_tickets: msg.base_tickets.unwrap_or(DEFAULT_BASE_TICKETS),
            penalty_factor: msg.penalty_factor.unwrap_or(DEFAULT_PENALTY_FACTOR),
        },
        penalty_policy: msg.penalty_policy.unwrap_or_default(),
    };
    execute::validate_config(&config)?;
    CONFIG.save(deps.storage, &config)?;
    DRAW_STATE.save(deps.storage, &DrawStateInfo::default())?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "roster-picker")
        .add_attribute("admin", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::AddParticipant { name } => execute::add_participant(deps, env, info, name),
        ExecuteMsg::RemoveParticipant { name } => {
            execute::remove_participant(deps, env, info, name)
        }
        ExecuteMsg::SetContext { context } => execute::set_context(deps, env, info, context),
        ExecuteMsg::StartDraw {
            delay_ms,
            entropy_hex,
        } => execute::start_draw(deps, env, info, delay_ms, entropy_hex),
        ExecuteMsg::ResolveDraw {} => execute::resolve_draw(deps, env, info),
        ExecuteMsg::ResetStats { confirm } => execute::reset_stats(deps, env, info, confirm),
        ExecuteMsg::UpdateConfig {
            admin,
            max_participants,
            draw_delay_ms,
            base_tickets,
            penalty_factor,
            penalty_policy,
        } => execute::update_config(
            deps,
            env,
            info,
            UpdateConfigParams {
                admin,
                max_participants,
                draw_delay_ms,
                base_tickets,
                penalty_factor,
                penalty_policy,
            },
        ),
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Roster {} => query::query_roster(deps),
        QueryMsg::Stats {} => query::query_stats(deps),
        QueryMsg::WinRate { name } => query::query_win_rate(deps, name),
        QueryMsg::Penalties {} => query::query_penalties(deps),
        QueryMsg::TicketPool {} => query::query_ticket_pool(deps),
        QueryMsg::DrawState {} => query::query_draw_state(deps),
        QueryMsg::Draw { draw_id } => query::query_draw(deps, draw_id),
        QueryMsg::DrawHistory { start_after, limit } => {
            query::query_draw_history(deps, start_after, limit)
        }
        QueryMsg::Suggestions { query, limit } => query::query_suggestions(deps, query, limit),
        QueryMsg::Snapshot {} => query::query_snapshot(deps),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
