use num_traits::{Float, NumAssign};
use std::fmt::{Debug, Display};
use std::iter::{Product, Sum};

/// The float precision of the simulation.
pub trait Precision:
    Default + NumAssign + Float + Sum + Send + Sync + Display + Product + Debug
{
    /// Convert from f64, rounding if this precision is narrower.
    fn from_f64_lossy(x: f64) -> Self;

    /// Widen to f64.
    fn to_f64_lossy(self) -> f64;
}

impl Precision for f64 {
    fn from_f64_lossy(x: f64) -> Self {
        x
    }

    fn to_f64_lossy(self) -> f64 {
        self
    }
}

impl Precision for f32 {
    fn from_f64_lossy(x: f64) -> Self {
        x as f32
    }

    fn to_f64_lossy(self) -> f64 {
        f64::from(self)
    }
}

/// Order of qubits returned by `StateVector::into_amplitudes` and other similar methods.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Representation {
    /// Qubit with index 0 is the least significant index bit.
    LittleEndian,
    /// Qubit with index 0 is the most significant index bit.
    BigEndian,
}
