/// Configuration for a combat run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatConfig {
    /// RNG seed for deterministic combat.
    pub seed: u64,
    /// Team A wins initiative iff its best roll meets this.
    pub initiative_dc: i32,
    /// Rounds after which the combat ends as a draw.
    pub max_rounds: u32,
    /// Maximum combat log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            initiative_dc: 10,
            max_rounds: 1000,
            max_events: 0,
        }
    }
}

impl CombatConfig {
    /// Set the RNG seed for deterministic combat.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the initiative difficulty for team A.
    pub fn with_initiative_dc(mut self, dc: i32) -> Self {
        self.initiative_dc = dc;
        self
    }

    /// Set the round cap.
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Set the maximum combat log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }
}
