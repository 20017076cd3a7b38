#![forbid(unsafe_code)]
#![deny(
    missing_debug_implementations,
    unstable_features,
    unused_import_braces,
    missing_docs
)]

//! A small gate-model circuit simulator.
//!
//! Circuits are built from [`Gate`]s acting on [`Qubit`]s. Gates are grouped into [`Moment`]s,
//! sets of gates on disjoint qubits which happen at the same time. Appending a gate to a
//! [`Circuit`] slides it into the earliest moment it can occupy. A [`Simulator`] then runs the
//! circuit from `|0...0>` as many times as asked, sampling every measurement, and returns a
//! [`RunResult`] from which outcome histograms can be read.
//!
//! # Example (Bell state)
//! ```
//! use qcircuit::prelude::*;
//!
//! # fn main() -> SimulationResult<()> {
//! let q = Qubit::line_range(2);
//! let circuit = Circuit::from_gates([
//!     Gate::h(q[0]),
//!     Gate::cnot(q[0], q[1])?,
//!     Gate::measure_with_key(q.clone(), "z")?,
//! ])?;
//! println!("{}", circuit);
//!
//! let mut simulator = Simulator::seeded(1234);
//! let result = simulator.run(&circuit, 50)?;
//! let counts = result.histogram("z")?;
//!
//! // Both qubits always agree.
//! assert_eq!(counts.count("00") + counts.count("11"), 50);
//! println!("{}", counts);
//! # Ok(())
//! # }
//! ```

/// Circuits as ordered sequences of moments.
pub mod circuit;
/// Simulator configuration.
pub mod config;
mod diagram;
/// Circuit construction and simulation error types.
pub mod errors;
/// Gate kinds and gates bound to qubits.
pub mod gate;
/// Sets of simultaneous gates on disjoint qubits.
pub mod moment;
/// Qubit identities.
pub mod qubit;
mod rayon_helper;
/// Measurement records, histograms and statevectors.
pub mod result;
/// The statevector simulator.
pub mod simulator;
/// Lower-level state operations.
pub mod state_ops;
/// Reusable types.
pub mod types;
/// Utility functions for bit and index manipulation
pub mod utils;

pub use circuit::Circuit;
pub use config::SimulatorConfig;
pub use gate::{Gate, GateKind};
pub use moment::Moment;
pub use num_complex::Complex;
pub use qubit::Qubit;
pub use rand;
pub use result::{Bitstring, Histogram, RunResult, StateVector, StateVectorResult};
pub use simulator::Simulator;
pub use types::*;

/// Commonly used types and traits.
/// ```
/// use qcircuit::prelude::*;
/// ```
pub mod prelude {
    pub use super::*;
    pub use crate::errors::*;
}
