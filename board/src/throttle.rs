//! Emission throttle: when a locally-mutated draft goes on the wire.
//!
//! Sending a frame per pointer-move (tens per second) floods the socket;
//! sending only on pointer-up makes collaborators wait a whole gesture.
//! The compromise: while a stroke is being drawn, emit whenever its
//! flattened coordinate count reaches a multiple of the period. This is a
//! throughput/latency trade-off, not a correctness requirement — pointer-up
//! always emits unconditionally, which is what guarantees convergence.

#[cfg(test)]
#[path = "throttle_test.rs"]
mod throttle_test;

/// Default emission period in flattened coordinates (one point = two
/// coordinates, so 16 means every 8th point).
pub const DEFAULT_EMIT_PERIOD: usize = 16;

/// Periodic emission decision for in-progress strokes.
#[derive(Debug, Clone, Copy)]
pub struct EmitThrottle {
    period: usize,
}

impl Default for EmitThrottle {
    fn default() -> Self {
        Self { period: DEFAULT_EMIT_PERIOD }
    }
}

impl EmitThrottle {
    /// A throttle emitting every `period` coordinates. A period below 2 is
    /// clamped to 2 (emit on every appended point).
    #[must_use]
    pub fn new(period: usize) -> Self {
        Self { period: period.max(2) }
    }

    /// Whether a stroke whose flattened coordinate count just reached
    /// `coord_count` should be emitted now.
    #[must_use]
    pub fn should_emit(self, coord_count: usize) -> bool {
        coord_count > 0 && coord_count % self.period == 0
    }
}
