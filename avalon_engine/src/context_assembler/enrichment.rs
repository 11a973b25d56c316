//! Context enrichment - advisory text injected into a seat's decision context.

use avalon_rules::Seat;

use crate::agent::PhaseKind;

/// Adds advisory text to a seat's context without touching engine state or
/// control flow.
pub trait ContextEnrichment {
    fn advisory(&self, seat: &Seat, phase: PhaseKind) -> Option<String>;
}

/// Enrichment that adds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnrichment;

impl ContextEnrichment for NoEnrichment {
    fn advisory(&self, _seat: &Seat, _phase: PhaseKind) -> Option<String> {
        None
    }
}

/// Fixed advisory text for every seat, e.g. house rules or strategy notes.
#[derive(Debug, Clone, Default)]
pub struct StaticAdvice(pub String);

impl ContextEnrichment for StaticAdvice {
    fn advisory(&self, _seat: &Seat, _phase: PhaseKind) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.clone())
        }
    }
}
