/// Unitary operators on a subset of qubits and their application to a state.
pub mod matrix_ops;
/// Probabilities, sampling and collapse of a state under measurement.
pub mod measurement_ops;
