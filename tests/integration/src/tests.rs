//! Integration tests for the roster picker.
//!
//! These tests drive the contract entry points directly using
//! `cosmwasm_std::testing` mocks, and exercise the draw engine from
//! `picker-common` over many draws to check its long-run behavior.
//!
//! Run:
//! ```bash
//! cargo test -p picker-integration-tests
//! ```

use std::collections::BTreeMap;

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{from_json, Decimal, Env, MemoryStorage, OwnedDeps, Response, Storage};
use picker_common::snapshot::SnapshotData;
use picker_common::{draw, HashEntropy, PenaltyPolicy, PenaltyTable, Roster, TicketWeights};
use roster_picker::contract::{execute, instantiate, query};
use roster_picker::msg::{
    DrawHistoryResponse, ExecuteMsg, InstantiateMsg, PenaltiesResponse, QueryMsg, RosterResponse,
    StatsResponse,
};
use roster_picker::state::SNAPSHOT_KEY;
use roster_picker::ContractError;

type Deps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Helpers ───

fn setup(msg: InstantiateMsg) -> Deps {
    let mut deps = mock_dependencies();
    let admin = deps.api.addr_make("admin");
    instantiate(deps.as_mut(), mock_env(), message_info(&admin, &[]), msg).unwrap();
    deps
}

fn env_at(step: u64) -> Env {
    let mut env = mock_env();
    env.block.height += step;
    env.block.time = env.block.time.plus_seconds(step * 10);
    env
}

fn run(deps: &mut Deps, env: Env, msg: ExecuteMsg) -> Result<Response, ContractError> {
    let user = deps.api.addr_make("user");
    execute(deps.as_mut(), env, message_info(&user, &[]), msg)
}

fn add_all(deps: &mut Deps, names: &[&str]) {
    for name in names {
        run(
            deps,
            mock_env(),
            ExecuteMsg::AddParticipant {
                name: name.to_string(),
            },
        )
        .unwrap();
    }
}

fn instant_draw(deps: &mut Deps, step: u64) -> String {
    let res = run(
        deps,
        env_at(step),
        ExecuteMsg::StartDraw {
            delay_ms: Some(0),
            entropy_hex: None,
        },
    )
    .unwrap();
    let event = res
        .events
        .iter()
        .find(|e| e.ty == "picker_draw_resolved")
        .expect("zero-delay draw resolves immediately");
    event
        .attributes
        .iter()
        .find(|a| a.key == "winner")
        .map(|a| a.value.clone())
        .unwrap()
}

fn query_json<T: serde::de::DeserializeOwned>(deps: &Deps, msg: QueryMsg) -> T {
    from_json(query(deps.as_ref(), mock_env(), msg).unwrap()).unwrap()
}

fn penalties(deps: &Deps) -> BTreeMap<String, Decimal> {
    let res: PenaltiesResponse = query_json(deps, QueryMsg::Penalties {});
    res.penalties.into_iter().collect()
}

fn frequencies(
    roster: &Roster,
    table: &PenaltyTable,
    draws: u32,
    seed: &[u8],
) -> BTreeMap<String, u32> {
    let mut rng = HashEntropy::new(seed);
    let weights = TicketWeights::default();
    let mut counts = BTreeMap::new();
    for _ in 0..draws {
        let outcome = draw(roster, table, &weights, &mut rng).unwrap();
        *counts.entry(outcome.winner).or_insert(0u32) += 1;
    }
    counts
}

// ─── Engine ───

#[test]
fn test_unpenalized_frequencies_converge_to_uniform() {
    for n in [2usize, 3, 5, 8] {
        let roster = Roster::from_names((0..n).map(|i| format!("p{i}")));
        let draws = 40_000u32;
        let counts = frequencies(&roster, &PenaltyTable::default(), draws, b"uniform");

        let expected = draws as f64 / n as f64;
        for name in roster.iter() {
            let got = *counts.get(name).unwrap_or(&0) as f64;
            assert!(
                (got - expected).abs() / expected < 0.06,
                "n={n} {name}: {got} vs {expected}"
            );
        }
    }
}

#[test]
fn test_penalized_winner_has_half_weight() {
    let roster = Roster::from_names(vec!["Anna".to_string(), "Boris".to_string()]);
    let mut table = PenaltyTable::default();
    table.set_next_penalty("Anna", Decimal::percent(50));

    let draws = 30_000u32;
    let counts = frequencies(&roster, &table, draws, b"anna-boris");
    let anna = counts["Anna"] as f64 / draws as f64;
    assert!((anna - 1.0 / 3.0).abs() < 0.015, "anna share {anna}");
}

#[test]
fn test_minimum_ticket_keeps_everyone_drawable() {
    let roster = Roster::from_names(vec!["Anna".to_string(), "Boris".to_string()]);
    let mut table = PenaltyTable::default();
    table.set_next_penalty("Anna", Decimal::zero());

    let counts = frequencies(&roster, &table, 11_000, b"floor");
    // 1 ticket against 10.
    let anna = counts.get("Anna").copied().unwrap_or(0);
    assert!((700..1_300).contains(&anna), "anna won {anna} times");
}

// ─── Contract ───

#[test]
fn test_anna_boris_scenario() {
    let mut deps = setup(InstantiateMsg::default());
    add_all(&mut deps, &["Anna", "Boris"]);

    let roster: RosterResponse = query_json(&deps, QueryMsg::Roster {});
    assert!(roster.can_draw);
    assert!(roster.participants.iter().all(|p| p.tickets == 10 && !p.penalized));

    let winner = instant_draw(&mut deps, 1);
    let loser = if winner == "Anna" { "Boris" } else { "Anna" };

    let roster: RosterResponse = query_json(&deps, QueryMsg::Roster {});
    let card = |name: &str| {
        roster
            .participants
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .unwrap()
    };
    assert_eq!(card(&winner).tickets, 5);
    assert!(card(&winner).penalized);
    assert_eq!(card(&winner).win_rate, Decimal::one());
    assert_eq!(card(loser).tickets, 10);
    assert!(!card(loser).penalized);
}

#[test]
fn test_many_draws_keep_ledger_consistent() {
    let mut deps = setup(InstantiateMsg::default());
    add_all(&mut deps, &["Anna", "Boris", "Vera", "Gleb"]);

    for k in 1..=40u64 {
        let before = penalties(&deps);
        let winner = instant_draw(&mut deps, k);
        let after = penalties(&deps);

        assert_eq!(after[&winner], Decimal::percent(50));
        for (name, factor) in &before {
            if *name != winner {
                assert_eq!(after.get(name), Some(factor), "{name} changed");
            }
        }
        for name in after.keys() {
            assert!(before.contains_key(name) || *name == winner);
        }

        let stats: StatsResponse = query_json(&deps, QueryMsg::Stats {});
        assert_eq!(stats.total_wins, k);
        assert!(stats
            .entries
            .windows(2)
            .all(|pair| pair[0].wins >= pair[1].wins));
    }

    let history: DrawHistoryResponse = query_json(
        &deps,
        QueryMsg::DrawHistory {
            start_after: Some(9),
            limit: Some(5),
        },
    );
    let ids: Vec<u64> = history.draws.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![10, 11, 12, 13, 14]);
}

#[test]
fn test_clear_after_draw_policy() {
    let mut deps = setup(InstantiateMsg {
        penalty_policy: Some(PenaltyPolicy::ClearAfterDraw),
        ..InstantiateMsg::default()
    });
    add_all(&mut deps, &["Anna", "Boris", "Vera"]);

    for k in 1..=10u64 {
        let winner = instant_draw(&mut deps, k);
        let table = penalties(&deps);
        assert_eq!(table.len(), 1);
        assert_eq!(table[&winner], Decimal::percent(50));
    }
}

#[test]
fn test_single_participant_cannot_draw() {
    let mut deps = setup(InstantiateMsg::default());
    add_all(&mut deps, &["Anna"]);

    let err = run(
        &mut deps,
        mock_env(),
        ExecuteMsg::StartDraw {
            delay_ms: None,
            entropy_hex: None,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ContractError::Picker(picker_common::PickerError::InsufficientParticipants { .. })
    ));

    let stats: StatsResponse = query_json(&deps, QueryMsg::Stats {});
    assert_eq!(stats.total_wins, 0);
}

#[test]
fn test_delay_does_not_change_outcome() {
    // Same block, same sender, same entropy: the winner is fixed at start no
    // matter when the reveal happens.
    let mut winners = vec![];
    for delay in [1_000u64, 60_000] {
        let mut deps = setup(InstantiateMsg::default());
        add_all(&mut deps, &["Anna", "Boris", "Vera"]);
        run(
            &mut deps,
            mock_env(),
            ExecuteMsg::StartDraw {
                delay_ms: Some(delay),
                entropy_hex: Some(hex::encode(b"fixed")),
            },
        )
        .unwrap();

        let mut late = mock_env();
        late.block.time = late.block.time.plus_seconds(3_600);
        let res = run(&mut deps, late, ExecuteMsg::ResolveDraw {}).unwrap();
        let winner = res
            .events
            .iter()
            .flat_map(|e| e.attributes.iter())
            .find(|a| a.key == "winner")
            .map(|a| a.value.clone())
            .unwrap();
        winners.push(winner);
    }
    assert_eq!(winners[0], winners[1]);
}

#[test]
fn test_snapshot_round_trip_is_stable() {
    let mut deps = setup(InstantiateMsg::default());
    add_all(&mut deps, &["Anna", "Boris", "Vera"]);
    run(
        &mut deps,
        mock_env(),
        ExecuteMsg::SetContext {
            context: "picks the music".to_string(),
        },
    )
    .unwrap();
    instant_draw(&mut deps, 1);
    instant_draw(&mut deps, 2);
    run(
        &mut deps,
        mock_env(),
        ExecuteMsg::RemoveParticipant {
            name: "Vera".to_string(),
        },
    )
    .unwrap();

    let first: SnapshotData = query_json(&deps, QueryMsg::Snapshot {});
    assert_eq!(first.participants, vec!["Anna", "Boris"]);
    assert_eq!(first.all_time_participants, vec!["Anna", "Boris", "Vera"]);
    assert_eq!(first.context, "picks the music");
    assert_eq!(first.stats.iter().map(|(_, w)| *w).sum::<u32>(), 2);

    // Setting the same context rewrites the snapshot without changing it.
    run(
        &mut deps,
        mock_env(),
        ExecuteMsg::SetContext {
            context: first.context.clone(),
        },
    )
    .unwrap();
    let second: SnapshotData = query_json(&deps, QueryMsg::Snapshot {});
    assert_eq!(first, second);
}

#[test]
fn test_stored_snapshot_writes_penalties_as_numbers() {
    let mut deps = setup(InstantiateMsg::default());
    add_all(&mut deps, &["Anna", "Boris"]);
    let winner = instant_draw(&mut deps, 1);

    let bytes = deps.storage.get(SNAPSHOT_KEY.as_bytes()).unwrap();
    let stored: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(stored["participants"], serde_json::json!(["Anna", "Boris"]));
    assert_eq!(stored["stats"], serde_json::json!([[winner.clone(), 1]]));
    assert_eq!(stored["penalties"], serde_json::json!([[winner, 0.5]]));
}

#[test]
fn test_suggestions_from_history() {
    let mut deps = setup(InstantiateMsg::default());
    add_all(&mut deps, &["Anna", "Annabel", "Boris", "Joanna"]);
    run(
        &mut deps,
        mock_env(),
        ExecuteMsg::RemoveParticipant {
            name: "Annabel".to_string(),
        },
    )
    .unwrap();
    run(
        &mut deps,
        mock_env(),
        ExecuteMsg::RemoveParticipant {
            name: "Joanna".to_string(),
        },
    )
    .unwrap();

    let hits: Vec<String> = query_json(
        &deps,
        QueryMsg::Suggestions {
            query: "ANN".to_string(),
            limit: None,
        },
    );
    assert_eq!(hits, vec!["Annabel", "Joanna"]);

    let hits: Vec<String> = query_json(
        &deps,
        QueryMsg::Suggestions {
            query: "ann".to_string(),
            limit: Some(1),
        },
    );
    assert_eq!(hits, vec!["Annabel"]);
}

#[test]
fn test_reset_then_rates_are_zero() {
    let mut deps = setup(InstantiateMsg::default());
    add_all(&mut deps, &["Anna", "Boris"]);
    for k in 1..=5 {
        instant_draw(&mut deps, k);
    }
    run(&mut deps, mock_env(), ExecuteMsg::ResetStats { confirm: true }).unwrap();

    let stats: StatsResponse = query_json(&deps, QueryMsg::Stats {});
    assert_eq!(stats.total_wins, 0);
    assert!(stats.entries.is_empty());

    let roster: RosterResponse = query_json(&deps, QueryMsg::Roster {});
    assert!(roster
        .participants
        .iter()
        .all(|p| p.wins == 0 && p.win_rate == Decimal::zero()));
}
