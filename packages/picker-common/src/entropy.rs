use sha2::{Digest, Sha256};

use crate::selector::RandomSource;

/// Deterministic SHA-256 counter stream.
///
/// `block_n = sha256(0x02 || seed || counter_u64_be)`; each call consumes one block
/// and reduces its first 16 bytes modulo the requested bound. Not suitable where an
/// adversary controls the seed; it only needs to be unbiased and reproducible.
#[derive(Debug, Clone)]
pub struct HashEntropy {
    seed: [u8; 32],
    counter: u64,
}

impl HashEntropy {
    pub fn new(seed_material: &[u8]) -> Self {
        Self {
            seed: Sha256::digest(seed_material).into(),
            counter: 0,
        }
    }

    /// Hex form of the derived seed, for logging alongside a draw.
    pub fn seed_hex(&self) -> String {
        hex::encode(self.seed)
    }

    pub fn next_block(&mut self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update([0x02]);
        hasher.update(self.seed);
        hasher.update(self.counter.to_be_bytes());
        self.counter = self.counter.wrapping_add(1);
        hasher.finalize().into()
    }
}

impl RandomSource for HashEntropy {
    fn next_ticket(&mut self, pool_size: u64) -> u64 {
        if pool_size == 0 {
            return 0;
        }
        let block = self.next_block();
        let mut raw = [0u8; 16];
        raw.copy_from_slice(&block[0..16]);
        (u128::from_be_bytes(raw) % pool_size as u128) as u64
    }
}

/// Builder for seed material made of length-prefixed parts.
#[derive(Debug, Default, Clone)]
pub struct SeedBuilder {
    bytes: Vec<u8>,
}

impl SeedBuilder {
    pub fn new(domain: &str) -> Self {
        Self::default().part(domain.as_bytes())
    }

    pub fn part(mut self, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
        self.bytes.extend_from_slice(data);
        self
    }

    pub fn u64(self, value: u64) -> Self {
        self.part(&value.to_be_bytes())
    }

    pub fn finish(self) -> HashEntropy {
        HashEntropy::new(&self.bytes)
    }
}
