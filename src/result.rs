use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{SimulationError, SimulationResult};
use crate::qubit::Qubit;
use crate::types::Representation;
use crate::utils::flip_bits;
use crate::{Complex, Precision};

/// The bits of a single measurement outcome, first measured qubit first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bitstring(Vec<bool>);

impl Bitstring {
    /// Wrap `bits`.
    pub fn new(bits: Vec<bool>) -> Self {
        Bitstring(bits)
    }

    /// Parse a string of `0` and `1` characters.
    ///
    /// ```
    /// use qcircuit::Bitstring;
    /// let b = Bitstring::parse("10").unwrap();
    /// assert_eq!(b.bits(), &[true, false]);
    /// assert!(Bitstring::parse("1x").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Some(false),
                '1' => Some(true),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Bitstring)
    }

    /// The bits in measurement order.
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    /// Interpret the bits as a big-endian integer (first bit most significant).
    pub fn value(&self) -> usize {
        self.0
            .iter()
            .fold(0, |acc, bit| (acc << 1) | usize::from(*bit))
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no bits.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0
            .iter()
            .try_for_each(|b| write!(f, "{}", if *b { '1' } else { '0' }))
    }
}

/// Occurrence counts of each distinct outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: BTreeMap<Bitstring, usize>,
}

impl Histogram {
    /// Count the outcomes in `records`.
    pub fn from_records<'a, It>(records: It) -> Self
    where
        It: IntoIterator<Item = &'a Bitstring>,
    {
        let mut counts = BTreeMap::new();
        records
            .into_iter()
            .for_each(|b| *counts.entry(b.clone()).or_insert(0) += 1);
        Histogram { counts }
    }

    /// Occurrences of the outcome written as `bits`, for instance `"01"`.
    pub fn count(&self, bits: &str) -> usize {
        Bitstring::parse(bits)
            .map(|b| self.get(&b))
            .unwrap_or(0)
    }

    /// Occurrences of `bits`.
    pub fn get(&self, bits: &Bitstring) -> usize {
        self.counts.get(bits).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing was counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Outcomes and counts in outcome order.
    pub fn iter(&self) -> impl Iterator<Item = (&Bitstring, usize)> {
        self.counts.iter().map(|(b, c)| (b, *c))
    }

    /// Outcomes sorted by descending count, ties in outcome order.
    pub fn most_common(&self) -> Vec<(&Bitstring, usize)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self
            .most_common()
            .into_iter()
            .map(|(b, c)| format!("'{}': {}", b, c))
            .collect::<Vec<_>>();
        write!(f, "Counter({{{}}})", entries.join(", "))
    }
}

/// Outcomes of running a circuit for a number of repetitions.
///
/// `measurements(key)[r]` is the outcome of the measurement recorded under `key` in
/// repetition `r`.
#[derive(Clone, Debug, PartialEq)]
pub struct RunResult {
    repetitions: usize,
    records: BTreeMap<String, Vec<Bitstring>>,
}

impl RunResult {
    pub(crate) fn new(repetitions: usize, records: BTreeMap<String, Vec<Bitstring>>) -> Self {
        RunResult {
            repetitions,
            records,
        }
    }

    /// Number of repetitions run.
    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// Keys with recorded measurements, in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Per-repetition outcomes recorded under `key`.
    pub fn measurements(&self, key: &str) -> SimulationResult<&[Bitstring]> {
        self.records
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| SimulationError::UnknownKey(key.to_string()))
    }

    /// Count how often each outcome was recorded under `key`. Calling this does not change the
    /// result, so repeated calls agree.
    pub fn histogram(&self, key: &str) -> SimulationResult<Histogram> {
        self.measurements(key)
            .map(|records| Histogram::from_records(records))
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self
            .records
            .iter()
            .map(|(key, outcomes)| {
                let width = outcomes.first().map_or(0, Bitstring::len);
                let columns = (0..width)
                    .map(|j| {
                        outcomes
                            .iter()
                            .map(|o| if o.bits()[j] { '1' } else { '0' })
                            .collect::<String>()
                    })
                    .collect::<Vec<_>>();
                format!("{}={}", key, columns.join(", "))
            })
            .collect::<Vec<_>>();
        write!(f, "{}", lines.join("\n"))
    }
}

/// A statevector over an ordered list of qubits. The first qubit is the most significant bit of
/// the amplitude index.
#[derive(Clone, Debug, PartialEq)]
pub struct StateVector<P: Precision> {
    qubits: Vec<Qubit>,
    amplitudes: Vec<Complex<P>>,
}

impl<P: Precision> StateVector<P> {
    pub(crate) fn new(qubits: Vec<Qubit>, amplitudes: Vec<Complex<P>>) -> Self {
        debug_assert_eq!(amplitudes.len(), 1 << qubits.len());
        StateVector { qubits, amplitudes }
    }

    /// Qubits in significance order.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Amplitudes indexed big-endian by `qubits()`.
    pub fn amplitudes(&self) -> &[Complex<P>] {
        &self.amplitudes
    }

    /// Probability of each basis state.
    pub fn probabilities(&self) -> Vec<P> {
        self.amplitudes.iter().map(Complex::norm_sqr).collect()
    }

    /// Sum of all probabilities, 1 for a normalized state.
    pub fn total_probability(&self) -> P {
        self.amplitudes.iter().map(Complex::norm_sqr).sum()
    }

    /// Amplitude of the basis state given by one bit per qubit, in qubit order.
    pub fn amplitude(&self, bits: &Bitstring) -> Option<Complex<P>> {
        if bits.len() == self.qubits.len() {
            self.amplitudes.get(bits.value()).copied()
        } else {
            None
        }
    }

    /// Consume the state and return amplitudes in the requested qubit order.
    pub fn into_amplitudes(self, order: Representation) -> Vec<Complex<P>> {
        match order {
            Representation::BigEndian => self.amplitudes,
            Representation::LittleEndian => {
                let n = self.qubits.len();
                (0..self.amplitudes.len())
                    .map(|i| self.amplitudes[flip_bits(n, i)])
                    .collect()
            }
        }
    }
}

/// The outcome of a single simulated pass: the final state and what each measurement saw.
#[derive(Clone, Debug, PartialEq)]
pub struct StateVectorResult<P: Precision> {
    /// Final state after every moment.
    pub state: StateVector<P>,
    /// Measurement outcome per key.
    pub measurements: BTreeMap<String, Bitstring>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> Bitstring {
        Bitstring::parse(s).unwrap()
    }

    fn sample_result() -> RunResult {
        let mut records = BTreeMap::new();
        records.insert(
            "z".to_string(),
            vec![bits("00"), bits("11"), bits("11"), bits("00"), bits("11")],
        );
        RunResult::new(5, records)
    }

    #[test]
    fn test_histogram_counts() {
        let r = sample_result();
        let h = r.histogram("z").unwrap();
        assert_eq!(h.count("11"), 3);
        assert_eq!(h.count("00"), 2);
        assert_eq!(h.count("01"), 0);
        assert_eq!(h.total(), 5);
        assert_eq!(h.to_string(), "Counter({'11': 3, '00': 2})");
    }

    #[test]
    fn test_histogram_idempotent() {
        let r = sample_result();
        assert_eq!(r.histogram("z").unwrap(), r.histogram("z").unwrap());
        assert_eq!(r, sample_result());
    }

    #[test]
    fn test_unknown_key() {
        let r = sample_result();
        assert_eq!(
            r.histogram("m"),
            Err(SimulationError::UnknownKey("m".to_string()))
        );
    }

    #[test]
    fn test_display_columns_per_qubit() {
        assert_eq!(sample_result().to_string(), "z=01101, 01101");
    }

    #[test]
    fn test_bitstring_value_is_big_endian() {
        assert_eq!(bits("10").value(), 2);
        assert_eq!(bits("011").value(), 3);
        assert_eq!(bits("10").to_string(), "10");
    }

    #[test]
    fn test_little_endian_reorders() {
        let mut amps = vec![Complex::new(0.0, 0.0); 4];
        // |q0 q1> = |10>
        amps[0b10] = Complex::new(1.0, 0.0);
        let state = StateVector::new(Qubit::line_range(2), amps);
        assert_eq!(state.amplitude(&bits("10")), Some(Complex::new(1.0, 0.0)));
        let little = state.into_amplitudes(Representation::LittleEndian);
        assert_eq!(little[0b01], Complex::new(1.0, 0.0));
    }
}
