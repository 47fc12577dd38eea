//! Selection distribution with enforced invariants.

use crate::{MctsError, Result};

/// Tolerance for policy sum validation.
const POLICY_SUM_TOLERANCE: f64 = 1e-9;

/// A probability distribution over candidate moves, indexed like the
/// candidate list it was built from.
///
/// Invariant: All values are non-negative and sum to 1.0.
///
/// # Example
/// ```
/// use montecarlo_core::Policy;
///
/// let policy = Policy::from_scores(&[1.0, 3.0]).unwrap();
/// assert!((policy.get_or_zero(1) - 0.75).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Policy(Vec<f64>);

impl Policy {
    /// Create a new policy from a probability distribution.
    ///
    /// # Errors
    /// Returns `MctsError::InvalidPolicy` if:
    /// - Any value is negative or not finite
    /// - Values don't sum to 1.0
    /// - Vector is empty
    pub fn new(probs: Vec<f64>) -> Result<Self> {
        if probs.is_empty() {
            return Err(MctsError::InvalidPolicy(
                "policy cannot be empty".to_string(),
            ));
        }

        if probs.iter().any(|&p| !p.is_finite() || p < 0.0) {
            return Err(MctsError::InvalidPolicy(
                "policy contains negative or non-finite values".to_string(),
            ));
        }

        let sum: f64 = probs.iter().sum();
        if (sum - 1.0).abs() > POLICY_SUM_TOLERANCE {
            return Err(MctsError::InvalidPolicy(format!(
                "policy sum {} is not 1.0 (tolerance {})",
                sum, POLICY_SUM_TOLERANCE
            )));
        }

        Ok(Self(probs))
    }

    /// Create a policy proportional to the given scores.
    ///
    /// Scores are divided by their sum. If any score is negative, every score
    /// is first shifted up by the magnitude of the smallest one, so the
    /// lowest-scoring candidate gets probability 0 and is excluded from this
    /// draw. When all (shifted) scores are zero the distribution is uniform.
    ///
    /// # Errors
    /// Returns error if `scores` is empty or contains a non-finite value.
    pub fn from_scores(scores: &[f64]) -> Result<Self> {
        if scores.is_empty() {
            return Err(MctsError::InvalidPolicy(
                "policy cannot be empty".to_string(),
            ));
        }

        if scores.iter().any(|s| !s.is_finite()) {
            return Err(MctsError::InvalidPolicy(
                "scores contain non-finite values".to_string(),
            ));
        }

        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let shift = if min < 0.0 { -min } else { 0.0 };

        let sum: f64 = scores.iter().map(|&s| s + shift).sum();
        if sum == 0.0 {
            return Self::uniform(scores.len());
        }

        Self::new(scores.iter().map(|&s| (s + shift) / sum).collect())
    }

    /// Create a uniform policy over the given number of candidates.
    ///
    /// # Errors
    /// Returns error if num_candidates is zero.
    pub fn uniform(num_candidates: usize) -> Result<Self> {
        if num_candidates == 0 {
            return Err(MctsError::InvalidPolicy(
                "cannot create uniform policy with 0 candidates".to_string(),
            ));
        }

        let prob = 1.0 / num_candidates as f64;
        Ok(Self(vec![prob; num_candidates]))
    }

    /// Uniform over the candidates flagged in `mask`, zero elsewhere.
    ///
    /// # Errors
    /// Returns error if no candidate is flagged.
    pub fn uniform_over(mask: &[bool]) -> Result<Self> {
        let flagged = mask.iter().filter(|&&m| m).count();
        if flagged == 0 {
            return Err(MctsError::InvalidPolicy(
                "cannot create uniform policy with 0 flagged candidates".to_string(),
            ));
        }

        let prob = 1.0 / flagged as f64;
        Ok(Self(
            mask.iter().map(|&m| if m { prob } else { 0.0 }).collect(),
        ))
    }

    /// Get the probability at the given index, returning 0 if out of bounds.
    pub fn get_or_zero(&self, index: usize) -> f64 {
        self.0.get(index).copied().unwrap_or(0.0)
    }

    /// Get the number of candidates in this policy.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the policy is empty (should never be true for valid policies).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the candidate whose cumulative mass first reaches `threshold`.
    ///
    /// `threshold` is expected in `[0, 1)`; it is typically a uniform draw.
    /// Zero-probability candidates are never returned.
    pub fn index_at(&self, threshold: f64) -> usize {
        let mut cumulative = 0.0;
        let mut last_positive = 0;

        for (i, &p) in self.0.iter().enumerate() {
            if p <= 0.0 {
                continue;
            }
            cumulative += p;
            last_positive = i;
            if cumulative > threshold {
                return i;
            }
        }

        // Rounding left the cumulative sum just below the threshold
        last_positive
    }

    /// Get the underlying probabilities.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_valid() {
        let policy = Policy::new(vec![0.25, 0.5, 0.25]).unwrap();
        assert_eq!(policy.len(), 3);
        assert_eq!(policy.get_or_zero(1), 0.5);
        assert_eq!(policy.get_or_zero(3), 0.0);
    }

    #[test]
    fn test_policy_rejects_bad_input() {
        assert!(Policy::new(vec![]).is_err());
        assert!(Policy::new(vec![-0.5, 1.5]).is_err());
        assert!(Policy::new(vec![0.3, 0.3]).is_err());
    }

    #[test]
    fn test_from_scores_normalizes() {
        let policy = Policy::from_scores(&[2.0, 6.0]).unwrap();
        assert!((policy.get_or_zero(0) - 0.25).abs() < 1e-12);
        assert!((policy.get_or_zero(1) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_from_scores_all_zero_is_uniform() {
        let policy = Policy::from_scores(&[0.0, 0.0, 0.0, 0.0]).unwrap();
        for i in 0..4 {
            assert!((policy.get_or_zero(i) - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_from_scores_single_zero() {
        let policy = Policy::from_scores(&[0.0]).unwrap();
        assert_eq!(policy.as_slice(), &[1.0]);
    }

    #[test]
    fn test_from_scores_shifts_negative() {
        let policy = Policy::from_scores(&[-1.0, 1.0]).unwrap();
        assert_eq!(policy.get_or_zero(0), 0.0);
        assert!((policy.get_or_zero(1) - 1.0).abs() < 1e-12);

        // The minimum is excluded even when the other scores are close to it
        let close = Policy::from_scores(&[-2.0, -1.0, 0.0]).unwrap();
        assert_eq!(close.get_or_zero(0), 0.0);
        assert!((close.get_or_zero(1) - 1.0 / 3.0).abs() < 1e-12);
        for threshold in [0.0, 0.25, 0.5, 0.999] {
            assert_ne!(close.index_at(threshold), 0);
        }

        let equal = Policy::from_scores(&[-3.0, -3.0]).unwrap();
        assert!((equal.get_or_zero(0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_from_scores_rejects_non_finite() {
        assert!(Policy::from_scores(&[]).is_err());
        assert!(Policy::from_scores(&[1.0, f64::NAN]).is_err());
        assert!(Policy::from_scores(&[f64::INFINITY]).is_err());
    }

    #[test]
    fn test_uniform_over_mask() {
        let policy = Policy::uniform_over(&[false, true, false, true]).unwrap();
        assert_eq!(policy.as_slice(), &[0.0, 0.5, 0.0, 0.5]);
        assert!(Policy::uniform_over(&[false, false]).is_err());
    }

    #[test]
    fn test_index_at_skips_zero_mass() {
        let policy = Policy::new(vec![0.0, 0.5, 0.0, 0.5]).unwrap();
        assert_eq!(policy.index_at(0.0), 1);
        assert_eq!(policy.index_at(0.49), 1);
        assert_eq!(policy.index_at(0.5), 3);
        assert_eq!(policy.index_at(0.999_999), 3);
        // Past the end due to rounding
        assert_eq!(policy.index_at(1.0), 3);
    }
}
