use crate::ids::Lamport;

/// First value of a fresh tree's clock. Timestamp 0 is reserved for the root sentinel, so the
/// first minted node carries `INITIAL_LAMPORT + 1`.
pub const INITIAL_LAMPORT: Lamport = 1;

/// Per-tree Lamport clock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LamportClock {
    counter: Lamport,
}

impl Default for LamportClock {
    fn default() -> Self {
        Self {
            counter: INITIAL_LAMPORT,
        }
    }
}

impl LamportClock {
    pub fn tick(&mut self) -> Lamport {
        self.counter += 1;
        self.counter
    }

    pub fn observe(&mut self, external: Lamport) {
        self.counter = self.counter.max(external);
    }

    pub fn now(&self) -> Lamport {
        self.counter
    }
}
