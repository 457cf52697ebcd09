//! Tunables for one evaluation pass.
use stencil_math::{DEFAULT_PRECISION, MAX_PRECISION};

/// Hard upper bound on `for` iterations.
pub const FOR_CEILING: usize = 10_000;
/// Hard upper bound on `foreach` iterations.
pub const FOREACH_CEILING: usize = 10_000;
/// Hard upper bound on `while` iterations.
pub const WHILE_CEILING: usize = 100;
/// Vertical gap between loop-generated siblings.
pub const DEFAULT_STACK_GAP: f64 = 5.0;

/// Configuration for an assembly run.
///
/// Ceilings may be lowered but never raised above the hard bounds; setters
/// clamp silently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    for_ceiling: usize,
    foreach_ceiling: usize,
    while_ceiling: usize,
    stack_gap: f64,
    math_precision: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            for_ceiling: FOR_CEILING,
            foreach_ceiling: FOREACH_CEILING,
            while_ceiling: WHILE_CEILING,
            stack_gap: DEFAULT_STACK_GAP,
            math_precision: DEFAULT_PRECISION,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_for_ceiling(mut self, ceiling: usize) -> Self {
        self.for_ceiling = ceiling.min(FOR_CEILING);
        self
    }

    pub fn with_foreach_ceiling(mut self, ceiling: usize) -> Self {
        self.foreach_ceiling = ceiling.min(FOREACH_CEILING);
        self
    }

    pub fn with_while_ceiling(mut self, ceiling: usize) -> Self {
        self.while_ceiling = ceiling.min(WHILE_CEILING);
        self
    }

    /// Negative or non-finite gaps fall back to the default.
    pub fn with_stack_gap(mut self, gap: f64) -> Self {
        self.stack_gap = if gap.is_finite() && gap >= 0.0 { gap } else { DEFAULT_STACK_GAP };
        self
    }

    pub fn with_math_precision(mut self, precision: usize) -> Self {
        self.math_precision = precision.min(MAX_PRECISION);
        self
    }

    pub fn for_ceiling(&self) -> usize {
        self.for_ceiling
    }

    pub fn foreach_ceiling(&self) -> usize {
        self.foreach_ceiling
    }

    pub fn while_ceiling(&self) -> usize {
        self.while_ceiling
    }

    pub fn stack_gap(&self) -> f64 {
        self.stack_gap
    }

    pub fn math_precision(&self) -> usize {
        self.math_precision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceilings_cannot_be_raised() {
        let config = EngineConfig::new()
            .with_for_ceiling(1_000_000)
            .with_while_ceiling(5)
            .with_math_precision(99)
            .with_stack_gap(-3.0);
        assert_eq!(config.for_ceiling(), FOR_CEILING);
        assert_eq!(config.while_ceiling(), 5);
        assert_eq!(config.math_precision(), MAX_PRECISION);
        assert_eq!(config.stack_gap(), DEFAULT_STACK_GAP);
    }
}
