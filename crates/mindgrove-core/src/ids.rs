//! Node/edge id allocation.

#[derive(Debug, Clone, Default)]
pub enum IdGenerator {
    /// Random v4 UUIDs.
    #[default]
    Uuid,
    /// `<prefix>-<n>` with `n` counting up from 1. Deterministic, for tests and fixtures.
    Sequential { prefix: String, next: u64 },
}

impl IdGenerator {
    pub fn sequential(prefix: impl Into<String>) -> Self {
        IdGenerator::Sequential {
            prefix: prefix.into(),
            next: 1,
        }
    }

    pub fn next_id(&mut self) -> String {
        match self {
            IdGenerator::Uuid => uuid::Uuid::new_v4().to_string(),
            IdGenerator::Sequential { prefix, next } => {
                let id = format!("{prefix}-{next}");
                *next += 1;
                id
            }
        }
    }

    /// Allocates an id not present in `taken`. Sequential generators can collide with ids that
    /// came in through an import.
    pub fn next_unused(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let id = self.next_id();
            if !taken(&id) {
                return id;
            }
        }
    }
}
