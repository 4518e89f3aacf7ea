use rand::Rng;

/// Base-36 alphabet, letters folded to uppercase
pub const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Source of candidate meeting codes. Uniqueness is the caller's job.
pub trait CodeGenerator: Send + Sync {
    fn next_code(&self) -> String;
}

/// Draws each character independently from the thread-local RNG
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        RandomCodeGenerator { length }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        RandomCodeGenerator::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn next_code(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.length)
            .map(|_| char::from(CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())]))
            .collect()
    }
}

/// Codes are case-insensitive on input; storage keys are uppercase
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
