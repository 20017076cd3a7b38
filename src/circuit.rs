use std::collections::BTreeSet;

use tracing::trace;

use crate::errors::{CircuitError, CircuitResult};
use crate::gate::Gate;
use crate::moment::Moment;
use crate::qubit::Qubit;

/// An ordered sequence of moments.
///
/// Gates added with [`Circuit::append`] slide into the earliest moment they can occupy without
/// passing a gate that shares one of their qubits. Moments added with
/// [`Circuit::append_moment`] are kept verbatim.
///
/// ```
/// use qcircuit::{Circuit, Gate, Qubit};
///
/// let mut circuit = Circuit::new();
/// circuit.append_all(Qubit::line_range(4).into_iter().map(Gate::h))?;
/// // None overlap, so all four share a single moment.
/// assert_eq!(circuit.depth(), 1);
/// # Ok::<(), qcircuit::errors::CircuitError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Circuit {
    moments: Vec<Moment>,
    measurement_keys: Vec<String>,
}

impl Circuit {
    /// An empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a circuit by appending each gate with earliest-moment insertion.
    pub fn from_gates<It>(gates: It) -> CircuitResult<Self>
    where
        It: IntoIterator<Item = Gate>,
    {
        let mut circuit = Self::new();
        circuit.append_all(gates)?;
        Ok(circuit)
    }

    /// Build a circuit from explicit moments, one time step each.
    pub fn from_moments<It>(moments: It) -> CircuitResult<Self>
    where
        It: IntoIterator<Item = Moment>,
    {
        let mut circuit = Self::new();
        moments
            .into_iter()
            .try_for_each(|m| circuit.append_moment(m))?;
        Ok(circuit)
    }

    /// Insert `gate` into the earliest moment after the last moment acting on any of its qubits,
    /// or into a new moment at the end if there is none.
    pub fn append(&mut self, gate: Gate) -> CircuitResult<()> {
        gate.validate()?;
        self.check_key_free(&gate)?;
        let start = self
            .moments
            .iter()
            .rposition(|m| m.operates_on(gate.qubits()))
            .map_or(0, |i| i + 1);
        trace!(%gate, moment = start, "slotting gate");
        let key = gate.key().map(str::to_string);
        if start < self.moments.len() {
            self.moments[start].add_gate(gate)?;
        } else {
            self.moments.push(Moment::new([gate])?);
        }
        self.measurement_keys.extend(key);
        Ok(())
    }

    /// Append each of `gates` in order. Either all gates are added or, on error, none are.
    pub fn append_all<It>(&mut self, gates: It) -> CircuitResult<()>
    where
        It: IntoIterator<Item = Gate>,
    {
        let mut staged = self.clone();
        gates.into_iter().try_for_each(|g| staged.append(g))?;
        *self = staged;
        Ok(())
    }

    /// Append `moment` as its own time step at the end, without searching for earlier slots.
    pub fn append_moment(&mut self, moment: Moment) -> CircuitResult<()> {
        let mut keys = vec![];
        for gate in moment.gates() {
            self.check_key_free(gate)?;
            if let Some(key) = gate.key() {
                if keys.iter().any(|k| k == key) {
                    return Err(CircuitError::DuplicateMeasurementKey(key.to_string()));
                }
                keys.push(key.to_string());
            }
        }
        self.moments.push(moment);
        self.measurement_keys.extend(keys);
        Ok(())
    }

    /// Add `gate` to the existing moment at `index`. A qubit conflict with that moment is an
    /// error; the gate is never moved elsewhere.
    pub fn insert_into_moment(&mut self, index: usize, gate: Gate) -> CircuitResult<()> {
        self.check_key_free(&gate)?;
        let depth = self.moments.len();
        let moment = self
            .moments
            .get_mut(index)
            .ok_or(CircuitError::MomentIndexOutOfRange { index, depth })?;
        let key = gate.key().map(str::to_string);
        moment.add_gate(gate)?;
        self.measurement_keys.extend(key);
        Ok(())
    }

    fn check_key_free(&self, gate: &Gate) -> CircuitResult<()> {
        match gate.key() {
            Some(key) if self.measurement_keys.iter().any(|k| k == key) => {
                Err(CircuitError::DuplicateMeasurementKey(key.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// The moments in execution order.
    pub fn moments(&self) -> &[Moment] {
        &self.moments
    }

    /// Number of moments.
    pub fn depth(&self) -> usize {
        self.moments.len()
    }

    /// Total number of gates across all moments.
    pub fn num_gates(&self) -> usize {
        self.moments.iter().map(Moment::len).sum()
    }

    /// Whether the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.moments.iter().all(Moment::is_empty)
    }

    /// Every qubit referenced by the circuit, in qubit order.
    pub fn all_qubits(&self) -> BTreeSet<Qubit> {
        self.moments.iter().flat_map(Moment::qubits).cloned().collect()
    }

    /// Measurement keys in the order they were added.
    pub fn measurement_keys(&self) -> &[String] {
        &self.measurement_keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_slides_past_unrelated_moments() {
        let qs = Qubit::line_range(3);
        let mut c = Circuit::new();
        c.append(Gate::h(qs[0])).unwrap();
        c.append(Gate::cnot(qs[0], qs[1]).unwrap()).unwrap();
        // q2 is untouched, so X lands in the first moment.
        c.append(Gate::x(qs[2])).unwrap();
        assert_eq!(c.depth(), 2);
        assert_eq!(c.moments()[0].len(), 2);
        assert!(c.moments()[0].operates_on_qubit(&qs[2]));
    }

    #[test]
    fn test_gate_never_passes_a_conflicting_gate() {
        let qs = Qubit::line_range(2);
        let mut c = Circuit::new();
        c.append(Gate::h(qs[0])).unwrap();
        c.append(Gate::cnot(qs[0], qs[1]).unwrap()).unwrap();
        // Moment 0 is free on q1 but the CNOT in moment 1 already touches it.
        c.append(Gate::x(qs[1])).unwrap();
        assert_eq!(c.depth(), 3);
        assert_eq!(c.moments()[2].gates(), &[Gate::x(qs[1])]);
    }

    #[test]
    fn test_explicit_moments_kept_verbatim() {
        let qs = Qubit::line_range(3);
        let c = Circuit::from_moments(qs.iter().map(|q| Moment::new([Gate::h(*q)]).unwrap()))
            .unwrap();
        assert_eq!(c.depth(), 3);
        assert!(c.moments().iter().all(|m| m.len() == 1));
    }

    #[test]
    fn test_insert_into_moment_conflict() {
        let qs = Qubit::line_range(2);
        let mut c = Circuit::from_gates([Gate::h(qs[0])]).unwrap();
        assert_eq!(
            c.insert_into_moment(0, Gate::x(qs[0])),
            Err(CircuitError::MomentConflict(qs[0]))
        );
        c.insert_into_moment(0, Gate::x(qs[1])).unwrap();
        assert_eq!(c.depth(), 1);
        assert_eq!(
            c.insert_into_moment(4, Gate::x(qs[1])),
            Err(CircuitError::MomentIndexOutOfRange { index: 4, depth: 1 })
        );
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let q = Qubit::line(0);
        let mut c = Circuit::new();
        c.append(Gate::measure_with_key([q], "m").unwrap()).unwrap();
        assert_eq!(
            c.append(Gate::measure_with_key([Qubit::line(1)], "m").unwrap()),
            Err(CircuitError::DuplicateMeasurementKey("m".to_string()))
        );
        assert_eq!(c.measurement_keys(), &["m".to_string()]);
    }

    #[test]
    fn test_append_all_is_atomic() {
        let q = Qubit::line(0);
        let mut c = Circuit::new();
        let bad = Gate::Measurement {
            targets: vec![],
            key: "m".to_string(),
        };
        assert!(c.append_all([Gate::h(q), bad]).is_err());
        assert!(c.is_empty());
        assert_eq!(c.depth(), 0);
    }
}
