use crate::errors::{CircuitError, CircuitResult};
use crate::gate::Gate;
use crate::qubit::Qubit;

/// One time step of a circuit: gates which act on pairwise disjoint qubits and therefore
/// happen simultaneously.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Moment {
    gates: Vec<Gate>,
}

impl Moment {
    /// An empty moment.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a moment from `gates`, rejecting any two which share a qubit.
    ///
    /// ```
    /// use qcircuit::{Gate, Moment, Qubit};
    /// let q = Qubit::line(0);
    /// assert!(Moment::new([Gate::h(q), Gate::x(q)]).is_err());
    /// ```
    pub fn new<It>(gates: It) -> CircuitResult<Self>
    where
        It: IntoIterator<Item = Gate>,
    {
        gates
            .into_iter()
            .try_fold(Self::empty(), |moment, gate| moment.with_gate(gate))
    }

    /// Add `gate` to this moment.
    pub fn with_gate(mut self, gate: Gate) -> CircuitResult<Self> {
        self.add_gate(gate)?;
        Ok(self)
    }

    pub(crate) fn add_gate(&mut self, gate: Gate) -> CircuitResult<()> {
        gate.validate()?;
        if let Some(q) = gate.qubits().iter().find(|q| self.operates_on_qubit(q)) {
            return Err(CircuitError::MomentConflict(*q));
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Whether any gate here acts on `q`.
    pub fn operates_on_qubit(&self, q: &Qubit) -> bool {
        self.gates.iter().any(|g| g.qubits().contains(q))
    }

    /// Whether any gate here acts on any of `qubits`.
    pub fn operates_on(&self, qubits: &[Qubit]) -> bool {
        self.gates.iter().any(|g| g.acts_on_any(qubits))
    }

    /// The gates of this moment in insertion order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// All qubits touched by this moment.
    pub fn qubits(&self) -> impl Iterator<Item = &Qubit> {
        self.gates.iter().flat_map(|g| g.qubits())
    }

    /// The gate acting on `q`, if any.
    pub fn gate_on(&self, q: &Qubit) -> Option<&Gate> {
        self.gates.iter().find(|g| g.qubits().contains(q))
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether this moment has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disjoint_gates_share_moment() {
        let qs = Qubit::line_range(3);
        let m = Moment::new(qs.iter().map(|q| Gate::h(*q))).unwrap();
        assert_eq!(m.len(), 3);
        assert!(m.operates_on(&[qs[2]]));
        assert!(!m.operates_on(&[Qubit::line(7)]));
    }

    #[test]
    fn test_conflict_rejected() {
        let qs = Qubit::line_range(2);
        let m = Moment::new([Gate::cnot(qs[0], qs[1]).unwrap()]).unwrap();
        let err = m.with_gate(Gate::x(qs[1])).unwrap_err();
        assert_eq!(err, CircuitError::MomentConflict(qs[1]));
    }
}
