use crate::selector::RandomSource;

/// Emoji handed out to participants the first time they are added.
pub const AVATAR_POOL: [&str; 19] = [
    "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁", "🐷", "🐸", "🐵", "🦄",
    "🐔", "🐧", "🐦", "🐤",
];

/// Shown when a participant has no assigned avatar.
pub const FALLBACK_AVATAR: &str = "🙂";

pub fn pick_avatar<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    let idx = rng.next_ticket(AVATAR_POOL.len() as u64) as usize;
    AVATAR_POOL[idx.min(AVATAR_POOL.len() - 1)].to_string()
}
