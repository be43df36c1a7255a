//! Hook for ongoing effects a running pump applies each powered tick.

/// Invoked exactly once per tick in which the pump is active and powered.
pub trait ActiveEffects {
    fn apply_active(&mut self, dt: f64);
}

impl ActiveEffects for () {
    fn apply_active(&mut self, _dt: f64) {}
}

/// Counts activations and accumulates active time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountingEffects {
    pub activations: u64,
    pub active_time: f64,
}

impl ActiveEffects for CountingEffects {
    fn apply_active(&mut self, dt: f64) {
        self.activations += 1;
        self.active_time += dt;
    }
}
