// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Classify
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Lost/survived classification of raw tracking output.

use scraper_types::model::ElementRef;

/// Losses of one tracking call, parallel sequences in particle order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LostParticles {
    pub turns: Vec<usize>,
    pub indices: Vec<ElementRef>,
}

impl LostParticles {
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// The tracker's survivor sentinel: full turn count at the injection element.
pub fn is_survivor(
    loss_turn: usize,
    loss_index: ElementRef,
    turn_count: usize,
    injection_index: ElementRef,
) -> bool {
    loss_turn == turn_count && loss_index == injection_index
}

/// Keep every particle except those carrying the survivor sentinel.
///
/// A particle lost on the last turn at any element other than the
/// injection element is still lost.
pub fn classify_losses(
    loss_turn: &[usize],
    loss_index: &[ElementRef],
    turn_count: usize,
    injection_index: ElementRef,
) -> LostParticles {
    let mut lost = LostParticles::default();
    for (&turn, &index) in loss_turn.iter().zip(loss_index) {
        if !is_survivor(turn, index, turn_count, injection_index) {
            lost.turns.push(turn);
            lost.indices.push(index);
        }
    }
    lost
}
