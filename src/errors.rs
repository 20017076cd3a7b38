use crate::qubit::Qubit;
use thiserror::Error;

/// An error from building a gate, moment or circuit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CircuitError {
    /// A gate was given no qubits to act on.
    #[error("gate must act on at least one qubit")]
    EmptyTargets,
    /// A gate names the same qubit twice.
    #[error("qubit {0} appears more than once in the gate targets")]
    DuplicateQubit(Qubit),
    /// A gate kind was given the wrong number of qubits.
    #[error("{gate} acts on {expected} qubit(s), {provided} provided")]
    ArityMismatch {
        /// Name of the gate kind.
        gate: String,
        /// Number of qubits the gate acts on.
        expected: usize,
        /// Number of qubits given.
        provided: usize,
    },
    /// Two gates in the same moment share a qubit.
    #[error("qubit {0} is already used by another gate in this moment")]
    MomentConflict(Qubit),
    /// A moment index past the end of the circuit.
    #[error("moment index {index} out of range for circuit with {depth} moments")]
    MomentIndexOutOfRange {
        /// Requested moment.
        index: usize,
        /// Number of moments in the circuit.
        depth: usize,
    },
    /// Two measurements record under the same key.
    #[error("measurement key {0:?} is used more than once")]
    DuplicateMeasurementKey(String),
}

/// A result which may contain a circuit error.
pub type CircuitResult<T> = Result<T, CircuitError>;

/// An error from running a circuit or reading its results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The repetition count must be positive.
    #[error("repetitions must be positive, got {0}")]
    InvalidRepetitions(usize),
    /// The circuit acts on no qubits, so there is no state to simulate.
    #[error("circuit references no qubits")]
    EmptyCircuit,
    /// The circuit references more qubits than the simulator will hold.
    #[error("circuit references {qubits} qubits, the limit is {limit}")]
    TooManyQubits {
        /// Qubits referenced by the circuit.
        qubits: usize,
        /// Configured maximum.
        limit: usize,
    },
    /// Total probability drifted past the hard limit.
    #[error("probability mass {mass} drifted beyond the limit of {limit} from 1")]
    NumericDrift {
        /// Observed total probability.
        mass: f64,
        /// Allowed deviation from 1.
        limit: f64,
    },
    /// No measurement was recorded under this key.
    #[error("no measurement recorded under key {0:?}")]
    UnknownKey(String),
    /// A construction error surfaced while simulating.
    #[error(transparent)]
    Circuit(#[from] CircuitError),
}

/// A result which may contain a simulation error.
pub type SimulationResult<T> = Result<T, SimulationError>;
