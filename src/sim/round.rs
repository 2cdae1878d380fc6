//! Round generation: pick letters, place them, choose the one to find

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::bounds::PlayAreaBounds;
use super::placement::{PlacementStrategy, place};
use crate::error::RoundError;

/// One letter of the alphabet
pub type Symbol = char;

/// Letters a round draws from, in a fixed order.
///
/// Duplicates are allowed; a target matches when its symbol equals the
/// round's target symbol, so duplicate letters are all correct answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    symbols: Vec<Symbol>,
}

impl Alphabet {
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
        }
    }

    /// `A` through `Z`
    pub fn latin_uppercase() -> Self {
        Self::new('A'..='Z')
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether any letter appears more than once
    pub fn has_duplicates(&self) -> bool {
        let mut seen = self.symbols.clone();
        seen.sort_unstable();
        seen.windows(2).any(|w| w[0] == w[1])
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::latin_uppercase()
    }
}

/// Feedback shown on a clicked target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeedbackState {
    #[default]
    None,
    Correct,
    Incorrect,
}

/// A placed, clickable letter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Unique within its round only
    pub id: u32,
    pub symbol: Symbol,
    /// Center, in viewport coordinates
    pub pos: Vec2,
    pub feedback: FeedbackState,
}

/// Target dimensions used for placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sizing {
    pub target_size: f32,
    pub min_separation: f32,
}

impl Default for Sizing {
    fn default() -> Self {
        use crate::consts::{DEFAULT_MIN_SEPARATION, DEFAULT_TARGET_SIZE};
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            min_separation: DEFAULT_MIN_SEPARATION,
        }
    }
}

/// One set of placed targets plus the letter to find
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based count of rounds generated this game
    pub number: u32,
    pub targets: Vec<Target>,
    /// `None` once the round has been cleared for transition
    pub target_symbol: Option<Symbol>,
    /// Id of the target the letter was drawn from
    pub designated_id: Option<u32>,
    /// Some target had to be placed without meeting the separation
    pub overlapped: bool,
}

impl Round {
    pub fn target(&self, id: u32) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn target_mut(&mut self, id: u32) -> Option<&mut Target> {
        self.targets.iter_mut().find(|t| t.id == id)
    }

    /// Targets a click would count as correct
    pub fn matching_targets(&self) -> impl Iterator<Item = &Target> {
        let symbol = self.target_symbol;
        self.targets
            .iter()
            .filter(move |t| Some(t.symbol) == symbol)
    }

    /// Drop targets and the letter so stale UI has nothing to click
    pub fn clear(&mut self) {
        self.targets.clear();
        self.target_symbol = None;
        self.designated_id = None;
    }

    pub fn is_cleared(&self) -> bool {
        self.targets.is_empty() && self.target_symbol.is_none()
    }
}

/// Build a round of `count_per_round` distinct draws from `alphabet`.
///
/// The draw count is clamped to the alphabet size. The target letter is read
/// from a randomly chosen placed target, so it is always on screen.
pub fn generate<R: Rng + ?Sized>(
    alphabet: &Alphabet,
    count_per_round: usize,
    bounds: &PlayAreaBounds,
    sizing: &Sizing,
    number: u32,
    rng: &mut R,
) -> Result<Round, RoundError> {
    let count = count_per_round.min(alphabet.len());
    if count == 0 {
        return Err(RoundError::EmptyAlphabet);
    }

    let mut drawn = alphabet.symbols().to_vec();
    drawn.shuffle(rng);
    drawn.truncate(count);

    let mut targets: Vec<Target> = Vec::with_capacity(count);
    let mut positions: Vec<Vec2> = Vec::with_capacity(count);
    let mut overlapped = false;

    for (i, symbol) in drawn.into_iter().enumerate() {
        let placed = place(
            &positions,
            bounds,
            sizing.target_size,
            sizing.min_separation,
            rng,
        )?;
        overlapped |= placed.strategy == PlacementStrategy::Overlap;
        positions.push(placed.pos);
        targets.push(Target {
            id: i as u32 + 1,
            symbol,
            pos: placed.pos,
            feedback: FeedbackState::None,
        });
    }

    let designated = &targets[rng.random_range(0..targets.len())];
    let target_symbol = designated.symbol;
    let designated_id = designated.id;

    log::debug!(
        "Round {number}: {} targets, find '{target_symbol}'{}",
        targets.len(),
        if overlapped { " (overlap fallback)" } else { "" }
    );

    Ok(Round {
        number,
        targets,
        target_symbol: Some(target_symbol),
        designated_id: Some(designated_id),
        overlapped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    fn sizing(size: f32, sep: f32) -> Sizing {
        Sizing {
            target_size: size,
            min_separation: sep,
        }
    }

    #[test]
    fn test_three_letters_in_small_square() {
        let alphabet = Alphabet::new(['a', 'b', 'c']);
        let bounds = PlayAreaBounds::new(300.0, 300.0);
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let round =
                generate(&alphabet, 3, &bounds, &sizing(40.0, 50.0), 1, &mut rng).unwrap();

            assert_eq!(round.targets.len(), 3);
            assert!(!round.overlapped);
            for (i, a) in round.targets.iter().enumerate() {
                for b in &round.targets[i + 1..] {
                    assert!(a.pos.distance(b.pos) >= 50.0);
                }
            }
            let symbol = round.target_symbol.unwrap();
            assert!(['a', 'b', 'c'].contains(&symbol));
            assert_eq!(round.matching_targets().count(), 1);
        }
    }

    #[test]
    fn test_count_clamped_to_alphabet() {
        let alphabet = Alphabet::new(['x', 'y']);
        let bounds = PlayAreaBounds::new(500.0, 500.0);
        let mut rng = Pcg32::seed_from_u64(5);
        let round = generate(&alphabet, 10, &bounds, &Sizing::default(), 1, &mut rng).unwrap();
        assert_eq!(round.targets.len(), 2);
        let symbols: HashSet<_> = round.targets.iter().map(|t| t.symbol).collect();
        assert_eq!(symbols.len(), 2);
    }

    #[test]
    fn test_letters_never_repeat_within_round() {
        let alphabet = Alphabet::latin_uppercase();
        let bounds = PlayAreaBounds::new(1280.0, 800.0);
        let mut rng = Pcg32::seed_from_u64(11);
        let round = generate(&alphabet, 12, &bounds, &Sizing::default(), 1, &mut rng).unwrap();
        let symbols: HashSet<_> = round.targets.iter().map(|t| t.symbol).collect();
        assert_eq!(symbols.len(), 12);
    }

    #[test]
    fn test_ids_unique_and_designated_present() {
        let alphabet = Alphabet::latin_uppercase();
        let bounds = PlayAreaBounds::new(1024.0, 768.0);
        let mut rng = Pcg32::seed_from_u64(21);
        let round = generate(&alphabet, 8, &bounds, &Sizing::default(), 4, &mut rng).unwrap();
        let ids: HashSet<_> = round.targets.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 8);
        let designated = round.target(round.designated_id.unwrap()).unwrap();
        assert_eq!(Some(designated.symbol), round.target_symbol);
        assert_eq!(round.number, 4);
    }

    #[test]
    fn test_duplicate_letters_all_match() {
        let alphabet = Alphabet::new(['q', 'q', 'q']);
        assert!(alphabet.has_duplicates());
        let bounds = PlayAreaBounds::new(600.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(8);
        let round = generate(&alphabet, 3, &bounds, &Sizing::default(), 1, &mut rng).unwrap();
        assert_eq!(round.matching_targets().count(), 3);
    }

    #[test]
    fn test_empty_alphabet() {
        let bounds = PlayAreaBounds::new(300.0, 300.0);
        let mut rng = Pcg32::seed_from_u64(0);
        let err = generate(&Alphabet::new([]), 3, &bounds, &Sizing::default(), 1, &mut rng);
        assert_eq!(err, Err(RoundError::EmptyAlphabet));

        let err = generate(&Alphabet::default(), 0, &bounds, &Sizing::default(), 1, &mut rng);
        assert_eq!(err, Err(RoundError::EmptyAlphabet));
    }

    #[test]
    fn test_collapsed_bounds() {
        let bounds = PlayAreaBounds::new(0.0, 300.0);
        let mut rng = Pcg32::seed_from_u64(0);
        let err = generate(&Alphabet::default(), 3, &bounds, &Sizing::default(), 1, &mut rng);
        assert!(matches!(err, Err(RoundError::InvalidBounds { .. })));
    }

    #[test]
    fn test_clear() {
        let bounds = PlayAreaBounds::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(2);
        let mut round =
            generate(&Alphabet::default(), 5, &bounds, &Sizing::default(), 1, &mut rng).unwrap();
        round.clear();
        assert!(round.is_cleared());
        assert_eq!(round.matching_targets().count(), 0);
    }
}
