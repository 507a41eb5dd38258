//! Placement Priority Score.
//!
//! ```text
//! PPS(i) = w_freq · (freq_i · weight_i) / max_j (freq_j · weight_j)
//!        + w_cooc · Σ_{p placed} cooc(i, p) / max_j Σ_{k≠j} cooc(j, k)
//! ```
//!
//! The frequency maximum runs over items that need at least one block; the
//! affinity normaliser is the largest total co-occurrence of any item and is
//! fixed for the whole run. A zero normaliser yields a zero term.

use crate::config::PriorityWeights;
use crate::demand::ItemDemand;

/// Scores items for "what to place next".
///
/// # Examples
///
/// ```
/// use u_slotting::config::PriorityWeights;
/// use u_slotting::demand::ItemDemand;
/// use u_slotting::placement::PriorityScorer;
///
/// let a = ItemDemand::new("A", 1.0, 2.0, 5, 20, 2);
/// let b = ItemDemand::new("B", 1.0, 8.0, 1, 10, 1);
/// let scorer = PriorityScorer::new(&[&a, &b], 0, PriorityWeights::new(0.5, 0.5));
///
/// assert_eq!(scorer.freq_term(0), 1.0); // 5·2 is the maximum
/// assert_eq!(scorer.freq_term(1), 0.8); // 1·8 / 10
/// assert!(scorer.score(0, 0.0) > scorer.score(1, 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct PriorityScorer {
    freq_terms: Vec<f64>,
    cooc_normalizer: f64,
    weights: PriorityWeights,
}

impl PriorityScorer {
    /// Creates a scorer over `items`, indexed by their position in the slice.
    ///
    /// `cooc_normalizer` is the largest per-item co-occurrence total.
    pub fn new(items: &[&ItemDemand], cooc_normalizer: u32, weights: PriorityWeights) -> Self {
        let max_freq = items
            .iter()
            .filter(|i| i.required_blocks > 0)
            .map(|i| i.freq_weight())
            .fold(0.0_f64, f64::max);

        let freq_terms = items
            .iter()
            .map(|i| {
                if max_freq > 0.0 {
                    i.freq_weight() / max_freq
                } else {
                    0.0
                }
            })
            .collect();

        Self {
            freq_terms,
            cooc_normalizer: f64::from(cooc_normalizer),
            weights,
        }
    }

    /// Normalised frequency term of item `idx`.
    pub fn freq_term(&self, idx: usize) -> f64 {
        self.freq_terms[idx]
    }

    /// Normalised affinity term for an affinity sum.
    pub fn cooc_term(&self, affinity_sum: f64) -> f64 {
        if self.cooc_normalizer > 0.0 {
            affinity_sum / self.cooc_normalizer
        } else {
            0.0
        }
    }

    /// PPS of item `idx` given its summed co-occurrence with placed items.
    pub fn score(&self, idx: usize, affinity_sum: f64) -> f64 {
        self.weights.w_freq * self.freq_term(idx) + self.weights.w_cooc * self.cooc_term(affinity_sum)
    }

    /// Number of scored items.
    pub fn len(&self) -> usize {
        self.freq_terms.len()
    }

    /// Returns `true` if no items are scored.
    pub fn is_empty(&self) -> bool {
        self.freq_terms.is_empty()
    }
}
