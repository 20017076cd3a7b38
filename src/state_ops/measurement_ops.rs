#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::errors::{SimulationError, SimulationResult};
use crate::utils::extract_bits;
use crate::{into_iter, iter, iter_mut, Complex, Precision};
use num_traits::Zero;
use rand::Rng;

/// Get total magnitude of state.
pub fn prob_magnitude<P: Precision>(input: &[Complex<P>]) -> P {
    iter!(input).map(Complex::<P>::norm_sqr).sum()
}

/// What a normalization check did to the state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Normalization {
    /// Total probability was within tolerance of 1.
    Unchanged,
    /// Total probability had drifted and the state was rescaled. Holds the mass before.
    Renormalized(f64),
}

/// Ensure `state` has total probability 1 within `tolerance`, rescaling it if it is off by more
/// than that. Drift past `limit` cannot be trusted and is an error.
pub fn check_normalization<P: Precision>(
    state: &mut [Complex<P>],
    tolerance: f64,
    limit: f64,
) -> SimulationResult<Normalization> {
    let mass = prob_magnitude(state).to_f64_lossy();
    let drift = (mass - 1.0).abs();
    if !(drift <= limit) {
        Err(SimulationError::NumericDrift { mass, limit })
    } else if drift > tolerance {
        let scale = P::from_f64_lossy(mass.sqrt().recip());
        iter_mut!(state).for_each(|c| *c = *c * scale);
        Ok(Normalization::Renormalized(mass))
    } else {
        Ok(Normalization::Unchanged)
    }
}

/// Calculate the probability of a given measurement. `measured` gives the bits which have been
/// measured from the qubits at `indices` in the order supplied by `indices` (the first index in
/// the lowest bit). `input` gives the state from which to measure, representing a total of `n`
/// qubits.
///
/// Keep in mind that qubits are big-endian to match kron product standards.
/// `|abc>` means `q0=a`, `q1=b`, `q2=c`
///
/// # Examples
/// ```
/// use qcircuit::state_ops::matrix_ops::from_reals;
/// use qcircuit::state_ops::measurement_ops::measure_prob;
///
/// // Make the state |10>, index 0 is always |1> and index 1 is always |0>
/// let input = from_reals(&[0.0, 0.0, 1.0, 0.0]);
///
/// let p = measure_prob(2, 0, &[0], &input);
/// assert_eq!(p, 0.0);
///
/// let p = measure_prob(2, 1, &[0], &input);
/// assert_eq!(p, 1.0);
///
/// let p = measure_prob(2, 1, &[0, 1], &input);
/// assert_eq!(p, 1.0);
///
/// let p = measure_prob(2, 2, &[1, 0], &input);
/// assert_eq!(p, 1.0);
/// ```
pub fn measure_prob<P: Precision>(
    n: usize,
    measured: usize,
    indices: &[usize],
    input: &[Complex<P>],
) -> P {
    let template: usize = indices
        .iter()
        .cloned()
        .enumerate()
        .fold(0, |acc, (i, index)| -> usize {
            let sel_bit = (measured >> i) & 1;
            acc | (sel_bit << (n - 1 - index))
        });
    let remaining_indices: Vec<usize> = (0..n).filter(|i| !indices.contains(i)).collect();

    let f = |remaining_index_bits: usize| -> Option<P> {
        let tmp_index: usize =
            remaining_indices
                .iter()
                .cloned()
                .enumerate()
                .fold(0, |acc, (i, index)| -> usize {
                    let sel_bit = (remaining_index_bits >> i) & 1;
                    acc | (sel_bit << (n - 1 - index))
                });
        let amp = input[tmp_index + template];
        if amp == Complex::zero() {
            None
        } else {
            Some(amp.norm_sqr())
        }
    };

    let r = 0usize..1 << remaining_indices.len();
    into_iter!(r).filter_map(f).sum()
}

/// Select a basis state of `input`: draw uniformly from `[0, 1)` and walk the basis states in
/// index order, returning the first at which the cumulative probability exceeds the draw.
pub fn sample_index<P: Precision, R: Rng + ?Sized>(input: &[Complex<P>], rng: &mut R) -> usize {
    let draw = P::from_f64_lossy(rng.gen::<f64>());
    let mut cumulative = P::zero();
    let mut last_nonzero = 0;
    for (i, c) in input.iter().enumerate() {
        let p = c.norm_sqr();
        if p.is_zero() {
            continue;
        }
        cumulative += p;
        last_nonzero = i;
        if cumulative > draw {
            return i;
        }
    }
    // Rounding left the total a hair under the draw.
    last_nonzero
}

/// Sample a measurement of qubits at `indices` from a state `input` of `n` qubits. Returns the
/// bits in order given by `indices`, the first index in the lowest bit. See `measure_prob` for
/// details.
///
/// # Examples
/// ```
/// use qcircuit::state_ops::matrix_ops::from_reals;
/// use qcircuit::state_ops::measurement_ops::soft_measure;
///
/// let mut rng = rand::thread_rng();
/// // Make the state |10>, index 0 is always |1> and index 1 is always |0>
/// let input = from_reals(&[0.0, 0.0, 1.0, 0.0]);
///
/// assert_eq!(soft_measure(2, &[0], &input, &mut rng), 1);
/// assert_eq!(soft_measure(2, &[1], &input, &mut rng), 0);
/// assert_eq!(soft_measure(2, &[0, 1], &input, &mut rng), 0b01);
/// assert_eq!(soft_measure(2, &[1, 0], &input, &mut rng), 0b10);
/// ```
pub fn soft_measure<P: Precision, R: Rng + ?Sized>(
    n: usize,
    indices: &[usize],
    input: &[Complex<P>],
    rng: &mut R,
) -> usize {
    let measured_indx = sample_index(input, rng);
    let indices: Vec<_> = indices.iter().map(|indx| n - 1 - indx).collect();
    extract_bits(measured_indx, &indices)
}

/// Samples a measured value from `input`, then calls `measure_state` to collapse `output`.
/// Returns the measured value and its probability.
pub fn measure<P: Precision, R: Rng + ?Sized>(
    n: usize,
    indices: &[usize],
    input: &[Complex<P>],
    output: &mut [Complex<P>],
    rng: &mut R,
) -> (usize, P) {
    let m = soft_measure(n, indices, input, rng);
    let p = measure_prob(n, m, indices, input);
    let measured = (m, p);
    measure_state(n, indices, measured, input, output);
    measured
}

/// Normalize the output state such that it matches only states which produce the `measured`
/// result and has the same magnitude.
/// This is done by zeroing out the states which cannot give `measured`, and dividing the remaining
/// by the `sqrt(1/p)` for p=`measured_prob`. See `measure_prob` for details.
pub fn measure_state<P: Precision>(
    n: usize,
    indices: &[usize],
    measured: (usize, P),
    input: &[Complex<P>],
    output: &mut [Complex<P>],
) {
    let (measured, measured_prob) = measured;
    if !measured_prob.is_zero() {
        let p_mult = P::one() / measured_prob.sqrt();

        let row_mask: usize = indices.iter().map(|index| 1 << (n - 1 - index)).sum();
        let measured_mask: usize = indices
            .iter()
            .enumerate()
            .map(|(i, index)| {
                let sel_bit = (measured >> i) & 1;
                sel_bit << (n - 1 - index)
            })
            .sum();

        let f = |(row, (input, output)): (usize, (&Complex<P>, &mut Complex<P>))| {
            // Select the bits we are measuring.
            let measured_bits = row & row_mask;
            // Is there a difference between them and the actually measured value?
            if (measured_bits ^ measured_mask) != 0 {
                // This is not a valid measurement, zero out the entry.
                *output = Complex::default();
            } else {
                // Scale the entry.
                *output = (*input) * p_mult;
            }
        };

        iter!(input).zip(iter_mut!(output)).enumerate().for_each(f);
    }
}

#[cfg(test)]
mod measurement_tests {
    use super::*;
    use crate::state_ops::matrix_ops::from_reals;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn round(c: Complex<f64>) -> Complex<f64> {
        Complex {
            re: c.re.round(),
            im: c.im.round(),
        }
    }

    fn approx_eq(a: &[Complex<f64>], b: &[Complex<f64>], prec: i32) {
        let prec = 10.0f64.powi(-prec);
        let a: Vec<Complex<f64>> = a.iter().map(|f| round(f * prec) / prec).collect();
        let b: Vec<Complex<f64>> = b.iter().map(|f| round(f * prec) / prec).collect();
        assert_eq!(a, b)
    }

    #[test]
    fn test_measure_state() {
        let n = 2;
        let m = 0;
        let input = from_reals(&[0.5, 0.5, 0.5, 0.5]);
        let p = measure_prob(n, m, &[0], &input);
        assert!((p - 0.5f64).abs() < f64::EPSILON);

        let mut output = input.clone();
        measure_state(n, &[0], (m, p), &input, &mut output);

        let half: f64 = 1.0 / 2.0;
        approx_eq(
            &output,
            &from_reals(&[half.sqrt(), half.sqrt(), 0.0, 0.0]),
            10,
        );
    }

    #[test]
    fn test_measure_state2() {
        let n = 2;
        let m = 1;
        let input = from_reals(&[0.5, 0.5, 0.5, 0.5]);
        let p = measure_prob(n, m, &[0], &input);
        assert!((p - 0.5f64).abs() < f64::EPSILON);

        let mut output = input.clone();
        measure_state(n, &[0], (m, p), &input, &mut output);

        let half: f64 = 1.0 / 2.0;
        approx_eq(
            &output,
            &from_reals(&[0.0, 0.0, half.sqrt(), half.sqrt()]),
            10,
        );
    }

    #[test]
    fn test_sample_index_skips_zero_states() {
        let mut rng = StdRng::seed_from_u64(7);
        let input = from_reals(&[0.0, 0.0, 0.0, 1.0]);
        for _ in 0..20 {
            assert_eq!(sample_index(&input, &mut rng), 3);
        }
    }

    #[test]
    fn test_renormalizes_small_drift() {
        let mut state = from_reals(&[0.7f64, 0.7]);
        let result = check_normalization(&mut state, 1e-6, 1e-1).unwrap();
        assert!(matches!(result, Normalization::Renormalized(_)));
        assert!((prob_magnitude(&state) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_large_drift() {
        let mut state = from_reals(&[0.5, 0.5]);
        let err = check_normalization(&mut state, 1e-6, 1e-3).unwrap_err();
        assert!(matches!(err, SimulationError::NumericDrift { .. }));
    }

    #[test]
    fn test_normalized_state_untouched() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let mut state = from_reals(&[h, h]);
        let result = check_normalization(&mut state, 1e-6, 1e-3).unwrap();
        assert_eq!(result, Normalization::Unchanged);
    }
}
