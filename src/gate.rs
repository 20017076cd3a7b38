use crate::errors::{CircuitError, CircuitResult};
use crate::qubit::Qubit;
use smallvec::SmallVec;
use std::fmt;

/// Target qubits of a unitary gate. Gates act on one or two qubits, so these stay inline.
pub type Targets = SmallVec<[Qubit; 2]>;

/// The unitary effect of a gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateKind {
    /// A pauli X (bit flip) gate.
    X,
    /// A pauli Y gate.
    Y,
    /// A pauli Z gate.
    Z,
    /// A hadamard gate.
    H,
    /// A conditional phase gate by pi/2.
    S,
    /// A conditional phase gate by pi/4.
    T,
    /// A rotation about Z by the given angle in radians.
    Rz(f64),
    /// A controlled pauli X gate, first qubit is control.
    CNOT,
    /// A controlled pauli Z gate.
    CZ,
    /// A swap gate between two qubits.
    SWAP,
}

impl GateKind {
    /// Number of qubits this kind acts on.
    pub fn num_qubits(&self) -> usize {
        match self {
            GateKind::CNOT | GateKind::CZ | GateKind::SWAP => 2,
            _ => 1,
        }
    }

    /// Short name used in diagrams and errors.
    pub fn name(&self) -> String {
        match self {
            GateKind::X => "X".to_string(),
            GateKind::Y => "Y".to_string(),
            GateKind::Z => "Z".to_string(),
            GateKind::H => "H".to_string(),
            GateKind::S => "S".to_string(),
            GateKind::T => "T".to_string(),
            GateKind::Rz(theta) => format!("Rz({:.3})", theta),
            GateKind::CNOT => "CNOT".to_string(),
            GateKind::CZ => "CZ".to_string(),
            GateKind::SWAP => "SWAP".to_string(),
        }
    }

    /// Apply this kind to `targets`, checking arity and that no qubit repeats.
    pub fn on<It>(self, targets: It) -> CircuitResult<Gate>
    where
        It: IntoIterator<Item = Qubit>,
    {
        let targets: Targets = targets.into_iter().collect();
        check_targets(&targets)?;
        if targets.len() != self.num_qubits() {
            return Err(CircuitError::ArityMismatch {
                gate: self.name(),
                expected: self.num_qubits(),
                provided: targets.len(),
            });
        }
        Ok(Gate::Unitary {
            kind: self,
            targets,
        })
    }
}

/// An immutable operation on a set of qubits.
///
/// Gates are a closed set: either a unitary drawn from [`GateKind`] or a computational basis
/// measurement recorded under a key. Use the constructors, which validate the targets.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    /// A unitary operation.
    Unitary {
        /// The unitary applied.
        kind: GateKind,
        /// Ordered targets (control first for controlled gates).
        targets: Targets,
    },
    /// A measurement in the computational basis.
    Measurement {
        /// Ordered targets, the first target is the leftmost bit of the outcome.
        targets: Vec<Qubit>,
        /// Key under which outcomes are recorded.
        key: String,
    },
}

impl Gate {
    /// Pauli X on `q`.
    pub fn x(q: Qubit) -> Self {
        Self::single(GateKind::X, q)
    }

    /// Pauli Y on `q`.
    pub fn y(q: Qubit) -> Self {
        Self::single(GateKind::Y, q)
    }

    /// Pauli Z on `q`.
    pub fn z(q: Qubit) -> Self {
        Self::single(GateKind::Z, q)
    }

    /// Hadamard on `q`.
    pub fn h(q: Qubit) -> Self {
        Self::single(GateKind::H, q)
    }

    /// S phase gate on `q`.
    pub fn s(q: Qubit) -> Self {
        Self::single(GateKind::S, q)
    }

    /// T phase gate on `q`.
    pub fn t(q: Qubit) -> Self {
        Self::single(GateKind::T, q)
    }

    /// Z rotation by `theta` on `q`.
    pub fn rz(q: Qubit, theta: f64) -> Self {
        Self::single(GateKind::Rz(theta), q)
    }

    /// Controlled X with `control` and `target`.
    pub fn cnot(control: Qubit, target: Qubit) -> CircuitResult<Self> {
        GateKind::CNOT.on([control, target])
    }

    /// Controlled Z between `a` and `b`.
    pub fn cz(a: Qubit, b: Qubit) -> CircuitResult<Self> {
        GateKind::CZ.on([a, b])
    }

    /// Swap the states of `a` and `b`.
    pub fn swap(a: Qubit, b: Qubit) -> CircuitResult<Self> {
        GateKind::SWAP.on([a, b])
    }

    /// Measure `qubits` under the default key, the qubit names joined by commas.
    ///
    /// ```
    /// use qcircuit::{Gate, Qubit};
    /// let m = Gate::measure(Qubit::line_range(2)).unwrap();
    /// assert_eq!(m.key(), Some("q(0),q(1)"));
    /// ```
    pub fn measure<It>(qubits: It) -> CircuitResult<Self>
    where
        It: IntoIterator<Item = Qubit>,
    {
        let targets: Vec<Qubit> = qubits.into_iter().collect();
        let key = targets
            .iter()
            .map(Qubit::to_string)
            .collect::<Vec<_>>()
            .join(",");
        Self::measure_with_key(targets, key)
    }

    /// Measure `qubits`, recording outcomes under `key`.
    pub fn measure_with_key<It, S>(qubits: It, key: S) -> CircuitResult<Self>
    where
        It: IntoIterator<Item = Qubit>,
        S: Into<String>,
    {
        let targets: Vec<Qubit> = qubits.into_iter().collect();
        check_targets(&targets)?;
        Ok(Gate::Measurement {
            targets,
            key: key.into(),
        })
    }

    fn single(kind: GateKind, q: Qubit) -> Self {
        let mut targets = Targets::new();
        targets.push(q);
        Gate::Unitary { kind, targets }
    }

    /// The qubits this gate acts on, in order.
    pub fn qubits(&self) -> &[Qubit] {
        match self {
            Gate::Unitary { targets, .. } => targets.as_slice(),
            Gate::Measurement { targets, .. } => targets.as_slice(),
        }
    }

    /// The measurement key, if this is a measurement.
    pub fn key(&self) -> Option<&str> {
        match self {
            Gate::Unitary { .. } => None,
            Gate::Measurement { key, .. } => Some(key.as_str()),
        }
    }

    /// Whether this gate is a measurement.
    pub fn is_measurement(&self) -> bool {
        matches!(self, Gate::Measurement { .. })
    }

    /// Whether this gate acts on any of `qubits`.
    pub fn acts_on_any(&self, qubits: &[Qubit]) -> bool {
        self.qubits().iter().any(|q| qubits.contains(q))
    }

    /// Re-check the invariants the constructors enforce. Variants can be built directly, so
    /// containers call this before accepting a gate.
    pub fn validate(&self) -> CircuitResult<()> {
        check_targets(self.qubits())?;
        if let Gate::Unitary { kind, targets } = self {
            if targets.len() != kind.num_qubits() {
                return Err(CircuitError::ArityMismatch {
                    gate: kind.name(),
                    expected: kind.num_qubits(),
                    provided: targets.len(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qubits = self
            .qubits()
            .iter()
            .map(Qubit::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        match self {
            Gate::Unitary { kind, .. } => write!(f, "{}({})", kind.name(), qubits),
            Gate::Measurement { key, .. } => write!(f, "measure({}, key={:?})", qubits, key),
        }
    }
}

fn check_targets(targets: &[Qubit]) -> CircuitResult<()> {
    if targets.is_empty() {
        return Err(CircuitError::EmptyTargets);
    }
    for (i, q) in targets.iter().enumerate() {
        if targets[..i].contains(q) {
            return Err(CircuitError::DuplicateQubit(*q));
        }
    }
    Ok(())
}
