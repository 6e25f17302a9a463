//! Dense complex amplitude vector over the search-variable bits

use crate::error::SolverError;
use num_complex::Complex64;

/// State vector of `2^bits` complex amplitudes, indexed by the
/// variable-bit bitstring (bit 0 least significant). Ancilla registers are
/// never part of this vector; the oracle replay handles them positionally.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    bits: usize,
    amplitudes: Vec<Complex64>,
}

impl StateVector {
    /// The all-zeros basis state |0...0>.
    pub fn zero_state(bits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << bits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self { bits, amplitudes }
    }

    /// The uniform superposition over all basis states.
    pub fn uniform(bits: usize) -> Self {
        let dimension = 1usize << bits;
        let amplitude = Complex64::new(1.0 / (dimension as f64).sqrt(), 0.0);
        Self {
            bits,
            amplitudes: vec![amplitude; dimension],
        }
    }

    /// Wrap raw amplitudes; the length must be a power of two.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> Result<Self, SolverError> {
        if amplitudes.is_empty() || !amplitudes.len().is_power_of_two() {
            return Err(SolverError::Shape {
                detail: format!(
                    "state vector length {} is not a power of two",
                    amplitudes.len()
                ),
            });
        }
        let bits = amplitudes.len().trailing_zeros() as usize;
        Ok(Self { bits, amplitudes })
    }

    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Dimension of the vector, `2^bits`.
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    pub fn amplitude(&self, index: usize) -> Complex64 {
        self.amplitudes[index]
    }

    /// Probability of measuring one basis state.
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes[index].norm_sqr()
    }

    /// The full probability distribution, index order.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Sum of all probabilities; 1 within tolerance for a valid state.
    pub fn norm_squared(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.norm_squared() - 1.0).abs() <= tolerance
    }

    /// The measurement winner: the maximum-probability basis state, ties
    /// broken toward the lowest index. Deterministic; no sampling.
    pub fn max_probability_state(&self) -> (usize, f64) {
        let mut best_index = 0;
        let mut best_probability = self.probability(0);
        for index in 1..self.amplitudes.len() {
            let probability = self.probability(index);
            if probability > best_probability {
                best_index = index;
                best_probability = probability;
            }
        }
        (best_index, best_probability)
    }

    /// The `k` most probable basis states, descending probability, ties
    /// toward the lowest index.
    pub fn top_states(&self, k: usize) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = self.probabilities().into_iter().enumerate().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        ranked.truncate(k);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn test_zero_state() {
        let state = StateVector::zero_state(3);
        assert_eq!(state.bits(), 3);
        assert_eq!(state.dimension(), 8);
        assert!((state.probability(0) - 1.0).abs() < TOLERANCE);
        assert!(state.is_normalized(TOLERANCE));
    }

    #[test]
    fn test_zero_bits_state_is_a_single_amplitude() {
        let state = StateVector::zero_state(0);
        assert_eq!(state.dimension(), 1);
        assert!(state.is_normalized(TOLERANCE));
    }

    #[test]
    fn test_uniform_state() {
        let state = StateVector::uniform(4);
        assert_eq!(state.dimension(), 16);
        assert!(state.is_normalized(1e-9));
        for index in 0..16 {
            assert!((state.probability(index) - 1.0 / 16.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_from_amplitudes_validates_length() {
        assert!(StateVector::from_amplitudes(vec![]).is_err());
        assert!(StateVector::from_amplitudes(vec![Complex64::new(1.0, 0.0); 3]).is_err());

        let state =
            StateVector::from_amplitudes(vec![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)])
                .unwrap();
        assert_eq!(state.bits(), 1);
        assert!((state.probability(1) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_max_probability_breaks_ties_low() {
        // uniform: every probability equal, index 0 must win
        let state = StateVector::uniform(3);
        assert_eq!(state.max_probability_state().0, 0);

        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 4];
        amplitudes[2] = Complex64::new(0.8, 0.0);
        amplitudes[3] = Complex64::new(0.6, 0.0);
        let state = StateVector::from_amplitudes(amplitudes).unwrap();
        let (winner, probability) = state.max_probability_state();
        assert_eq!(winner, 2);
        assert!((probability - 0.64).abs() < TOLERANCE);
    }

    #[test]
    fn test_top_states_ordering() {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 8];
        amplitudes[1] = Complex64::new(0.6, 0.0);
        amplitudes[5] = Complex64::new(0.8, 0.0);
        let state = StateVector::from_amplitudes(amplitudes).unwrap();

        let top = state.top_states(3);
        assert_eq!(top[0].0, 5);
        assert_eq!(top[1].0, 1);
        // remaining entries are zero-probability ties, lowest index first
        assert_eq!(top[2].0, 0);
    }
}
