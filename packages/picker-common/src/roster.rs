use crate::error::PickerError;

/// Ordered list of names eligible for the next draw.
///
/// Insertion order is kept for display and for laying out the ticket pool; it has
/// no effect on the probability of any participant being drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Build a roster from stored names, dropping blanks and repeats.
    pub fn from_names<I: IntoIterator<Item = String>>(names: I) -> Self {
        Self::from_stored(names).0
    }

    /// Like [`Roster::from_names`], but also hands back every name that was dropped,
    /// as it was stored.
    pub fn from_stored<I: IntoIterator<Item = String>>(names: I) -> (Self, Vec<String>) {
        let mut roster = Self::default();
        let mut dropped = vec![];
        for raw in names {
            let name = raw.trim();
            if name.is_empty() || roster.contains(name) {
                dropped.push(raw);
            } else {
                roster.names.push(name.to_string());
            }
        }
        (roster, dropped)
    }

    /// Add a name, trimmed at the edges. Returns the name as stored.
    ///
    /// Checks run in order: empty name, full roster, duplicate.
    pub fn add(&mut self, raw: &str, max_participants: u32) -> Result<String, PickerError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(PickerError::EmptyName);
        }
        if self.names.len() >= max_participants as usize {
            return Err(PickerError::RosterFull {
                max: max_participants,
            });
        }
        if self.contains(name) {
            return Err(PickerError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.names.push(name.to_string());
        Ok(name.to_string())
    }

    /// Remove a name. Returns false if it was not on the roster.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.names.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}
