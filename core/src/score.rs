//! Compliance scoring: 100 minus a fixed penalty per violated rule family.

use crate::validator::{ValidationVerdict, ViolationKind};

pub const MAX_SCORE: u8 = 100;

/// Penalty for one violation family.
pub fn penalty(kind: ViolationKind) -> u8 {
    match kind {
        ViolationKind::TooLong => 30,
        ViolationKind::ForbiddenTermPresent => 30,
        ViolationKind::MissingOpener => 20,
    }
}

/// Score a verdict in `0..=100`. Each family is penalised once, however many
/// times it occurs.
pub fn score(verdict: &ValidationVerdict) -> u8 {
    let total: u32 = [
        ViolationKind::TooLong,
        ViolationKind::ForbiddenTermPresent,
        ViolationKind::MissingOpener,
    ]
    .into_iter()
    .filter(|kind| verdict.has(*kind))
    .map(|kind| u32::from(penalty(kind)))
    .sum();

    MAX_SCORE.saturating_sub(u8::try_from(total).unwrap_or(u8::MAX))
}
