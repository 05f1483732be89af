use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Decimal;
use serde_json::{Map as JsonMap, Number, Value};

use crate::avatar::{pick_avatar, FALLBACK_AVATAR};
use crate::error::PickerError;
use crate::ledger::{PenaltyTable, StatsLedger};
use crate::roster::Roster;
use crate::selector::RandomSource;
use crate::types::PenaltyPolicy;

/// Suggestions returned when the caller does not ask for a specific amount.
pub const DEFAULT_SUGGESTION_LIMIT: u32 = 5;

/// Wire form of the persisted state.
///
/// Pair arrays are maps on load; their order carries no meaning.
#[cw_serde]
#[derive(Default)]
pub struct SnapshotData {
    pub participants: Vec<String>,
    #[serde(rename = "allTimeParticipants")]
    pub all_time_participants: Vec<String>,
    pub stats: Vec<(String, u32)>,
    pub context: String,
    pub avatars: Vec<(String, String)>,
    pub penalties: Vec<(String, Decimal)>,
}

/// Everything the picker keeps between operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub roster: Roster,
    pub known: BTreeSet<String>,
    pub stats: StatsLedger,
    pub penalties: PenaltyTable,
    pub context: String,
    pub avatars: BTreeMap<String, String>,
}

/// A snapshot recovered from storage plus whatever had to be discarded on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedSnapshot {
    pub snapshot: Snapshot,
    pub issues: Vec<PickerError>,
}

impl DecodedSnapshot {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl Snapshot {
    /// Add a participant to the roster, remembering the name and giving it an avatar
    /// the first time it is ever seen.
    pub fn add_participant<R: RandomSource + ?Sized>(
        &mut self,
        raw: &str,
        max_participants: u32,
        rng: &mut R,
    ) -> Result<String, PickerError> {
        let name = self.roster.add(raw, max_participants)?;
        if !self.avatars.contains_key(&name) {
            self.avatars.insert(name.clone(), pick_avatar(rng));
        }
        self.known.insert(name.clone());
        Ok(name)
    }

    /// Take a participant off the roster. Stats, penalties and avatar are kept.
    pub fn remove_participant(&mut self, name: &str) -> bool {
        self.roster.remove(name)
    }

    /// Apply a resolved draw: one more win and a fresh penalty for the winner.
    pub fn record_draw(&mut self, winner: &str, factor: Decimal, policy: &PenaltyPolicy) {
        self.stats.record_win(winner);
        self.penalties.apply_draw(winner, factor, policy);
    }

    pub fn avatar(&self, name: &str) -> &str {
        self.avatars
            .get(name)
            .map(String::as_str)
            .unwrap_or(FALLBACK_AVATAR)
    }

    /// Announcement text: `"{winner}, {context}"`, or just the winner without context.
    pub fn display_text(&self, winner: &str) -> String {
        let context = self.context.trim();
        if context.is_empty() {
            winner.to_string()
        } else {
            format!("{winner}, {context}")
        }
    }

    /// Known names containing `query` (case-insensitive) that are not on the roster.
    pub fn suggestions(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return vec![];
        }
        self.known
            .iter()
            .filter(|name| name.to_lowercase().contains(&query) && !self.roster.contains(name))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn to_data(&self) -> SnapshotData {
        SnapshotData {
            participants: self.roster.names().to_vec(),
            all_time_participants: self.known.iter().cloned().collect(),
            stats: self.stats.to_pairs(),
            context: self.context.clone(),
            avatars: self
                .avatars
                .iter()
                .map(|(name, avatar)| (name.clone(), avatar.clone()))
                .collect(),
            penalties: self.penalties.to_pairs(),
        }
    }

    /// Encode for storage. Same shape as [`SnapshotData`], except that penalty
    /// multipliers are written as JSON numbers.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut root = serde_json::to_value(self.to_data())?;
        let penalties = self
            .penalties
            .iter()
            .map(|(name, factor)| -> Result<Value, serde_json::Error> {
                let factor: Number = serde_json::from_str(&factor.to_string())?;
                Ok(Value::Array(vec![
                    Value::String(name.to_string()),
                    Value::Number(factor),
                ]))
            })
            .collect::<Result<Vec<_>, _>>()?;
        root["penalties"] = Value::Array(penalties);
        serde_json::to_vec(&root)
    }

    /// Decode stored bytes without ever failing.
    ///
    /// Each field is read on its own and list fields entry by entry. A missing or
    /// `null` field is empty; anything malformed is dropped and reported in `issues`.
    pub fn decode(bytes: &[u8]) -> DecodedSnapshot {
        let root: JsonMap<String, Value> = match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return DecodedSnapshot {
                    snapshot: Snapshot::default(),
                    issues: vec![corrupt("$", format!("expected object, got {}", kind(&other)))],
                }
            }
            Err(err) => {
                return DecodedSnapshot {
                    snapshot: Snapshot::default(),
                    issues: vec![corrupt("$", err.to_string())],
                }
            }
        };

        let mut issues = vec![];
        let participants = list_field(&root, "participants", &mut issues, name_entry);
        let known = list_field(&root, "allTimeParticipants", &mut issues, name_entry);
        let stats = list_field(&root, "stats", &mut issues, |entry| match pair(entry)? {
            (name, Value::Number(n)) => n
                .as_u64()
                .and_then(|wins| u32::try_from(wins).ok())
                .map(|wins| (name.clone(), wins)),
            _ => None,
        });
        let context = match root.get("context") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(context)) => context.clone(),
            Some(other) => {
                issues.push(corrupt(
                    "context",
                    format!("expected string, got {}", kind(other)),
                ));
                String::new()
            }
        };
        let avatars = list_field(&root, "avatars", &mut issues, |entry| match pair(entry)? {
            (name, Value::String(avatar)) => Some((name.clone(), avatar.clone())),
            _ => None,
        });
        // Decimal strings from older writes are still accepted.
        let penalties = list_field(&root, "penalties", &mut issues, |entry| {
            let (name, value) = pair(entry)?;
            let factor = match value {
                Value::String(s) => Decimal::from_str(s).ok(),
                Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
                _ => None,
            };
            factor.map(|factor| (name.clone(), factor))
        });

        let (roster, dropped) = Roster::from_stored(participants);
        for name in dropped {
            issues.push(corrupt(
                "participants",
                format!("blank or repeated name {name:?}"),
            ));
        }

        let snapshot = Snapshot {
            roster,
            known: known.into_iter().collect(),
            stats: StatsLedger::from_entries(stats),
            penalties: PenaltyTable::from_entries(penalties),
            context,
            avatars: avatars.into_iter().collect(),
        };
        DecodedSnapshot { snapshot, issues }
    }
}

fn corrupt(field: &str, reason: impl Into<String>) -> PickerError {
    PickerError::CorruptSnapshot {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn name_entry(entry: &Value) -> Option<String> {
    entry.as_str().map(str::to_string)
}

/// `[name, value]`
fn pair(entry: &Value) -> Option<(&String, &Value)> {
    match entry.as_array().map(Vec::as_slice) {
        Some([Value::String(name), value]) => Some((name, value)),
        _ => None,
    }
}

/// Read an array field one entry at a time. Entries `parse` rejects are skipped and
/// reported; a non-array field is reported and read as empty.
fn list_field<T>(
    root: &JsonMap<String, Value>,
    name: &str,
    issues: &mut Vec<PickerError>,
    parse: impl Fn(&Value) -> Option<T>,
) -> Vec<T> {
    let entries = match root.get(name) {
        None | Some(Value::Null) => return vec![],
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            issues.push(corrupt(name, format!("expected array, got {}", kind(other))));
            return vec![];
        }
    };

    let mut parsed = Vec::with_capacity(entries.len());
    for entry in entries {
        match parse(entry) {
            Some(value) => parsed.push(value),
            None => issues.push(corrupt(name, format!("bad entry {entry}"))),
        }
    }
    parsed
}
