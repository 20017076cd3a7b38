//! Simulator configuration

/// Configuration for the statevector simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorConfig {
    /// Random number generator seed for reproducibility
    ///
    /// If None, the simulator seeds itself from entropy. Set to Some(seed) for deterministic
    /// results.
    ///
    /// Default: None
    pub seed: Option<u64>,

    /// Allowed deviation of total probability from 1 before a sampling step
    ///
    /// States further off than this are renormalized before sampling.
    ///
    /// Default: 1e-6
    pub normalization_tolerance: f64,

    /// Deviation of total probability from 1 treated as fatal
    ///
    /// Default: 1e-3
    pub drift_limit: f64,

    /// Run repetitions on the rayon thread pool
    ///
    /// Has no effect without the `parallel` feature. Results do not depend on this setting.
    ///
    /// Default: true
    pub parallel_repetitions: bool,

    /// Largest number of qubits a circuit may reference
    ///
    /// Each repetition holds two statevectors of `2^n` amplitudes, so circuits beyond this are
    /// rejected before anything is allocated.
    ///
    /// Default: 26
    pub max_qubits: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            normalization_tolerance: 1e-6,
            drift_limit: 1e-3,
            parallel_repetitions: true,
            max_qubits: 26,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the renormalization tolerance
    pub fn with_normalization_tolerance(mut self, tolerance: f64) -> Self {
        self.normalization_tolerance = tolerance;
        self
    }

    /// Set the fatal drift limit
    pub fn with_drift_limit(mut self, limit: f64) -> Self {
        self.drift_limit = limit;
        self
    }

    /// Enable or disable parallel repetitions
    pub fn with_parallel_repetitions(mut self, parallel: bool) -> Self {
        self.parallel_repetitions = parallel;
        self
    }

    /// Set the largest simulated qubit count
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }
}
