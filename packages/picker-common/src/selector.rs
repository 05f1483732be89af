use cosmwasm_std::Decimal;

use crate::error::PickerError;
use crate::ledger::PenaltyTable;
use crate::roster::Roster;
use crate::types::{DrawOutcome, TicketRange, TicketWeights};

/// Source of uniformly distributed ticket indices.
pub trait RandomSource {
    /// Return an index in `[0, pool_size)`. `pool_size` is never zero.
    fn next_ticket(&mut self, pool_size: u64) -> u64;
}

/// Tickets held for a multiplier: `max(1, round(base_tickets * factor))`, rounding half up.
pub fn ticket_count(weights: &TicketWeights, factor: Decimal) -> u64 {
    let half = Decimal::percent(50);
    let rounded = factor
        .checked_mul(Decimal::from_ratio(weights.base_tickets, 1u32))
        .and_then(|weighted| weighted.checked_add(half))
        .map(|weighted| weighted.to_uint_floor().u128())
        .unwrap_or(u32::MAX as u128);
    // Cap per-participant tickets so the summed pool always fits in a u64.
    rounded.clamp(1, u32::MAX as u128) as u64
}

/// Lay out the ticket pool for the roster in roster order.
pub fn ticket_pool(
    roster: &Roster,
    penalties: &PenaltyTable,
    weights: &TicketWeights,
) -> Vec<TicketRange> {
    let mut cursor = 0u64;
    roster
        .iter()
        .map(|name| {
            let tickets = ticket_count(weights, penalties.get(name));
            let range = TicketRange {
                name: name.to_string(),
                tickets,
                cumulative_start: cursor,
                cumulative_end: cursor + tickets,
            };
            cursor += tickets;
            range
        })
        .collect()
}

/// Draw one winner from the roster.
///
/// The winning index is taken uniformly over the whole pool, so each participant
/// wins with probability `tickets / pool_size`.
pub fn draw<R: RandomSource + ?Sized>(
    roster: &Roster,
    penalties: &PenaltyTable,
    weights: &TicketWeights,
    rng: &mut R,
) -> Result<DrawOutcome, PickerError> {
    if roster.len() < 2 {
        return Err(PickerError::InsufficientParticipants {
            count: roster.len(),
        });
    }

    let pool = ticket_pool(roster, penalties, weights);
    let pool_size = pool.last().map(|r| r.cumulative_end).unwrap_or(0);
    // An out-of-range index from a misbehaving source lands on the last ticket.
    let ticket = rng.next_ticket(pool_size).min(pool_size - 1);

    let range = pool
        .iter()
        .find(|r| r.contains(ticket))
        .or_else(|| pool.last())
        .ok_or(PickerError::InsufficientParticipants { count: 0 })?;

    Ok(DrawOutcome {
        winner: range.name.clone(),
        ticket,
        pool_size,
        tickets: range.tickets,
    })
}
