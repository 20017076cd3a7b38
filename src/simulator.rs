#[cfg(feature = "parallel")]
use rayon::prelude::*;

use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};

use num_traits::{One, Zero};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

use crate::circuit::Circuit;
use crate::config::SimulatorConfig;
use crate::errors::{SimulationError, SimulationResult};
use crate::gate::{Gate, GateKind};
use crate::qubit::Qubit;
use crate::result::{Bitstring, RunResult, StateVector, StateVectorResult};
use crate::state_ops::matrix_ops::{apply_op, MatrixOp};
use crate::state_ops::measurement_ops::{check_normalization, measure, Normalization};
use crate::{Complex, Precision};

/// A circuit lowered onto state indices, ready to be replayed.
struct Program<P: Precision> {
    qubits: Vec<Qubit>,
    moments: Vec<Vec<Step<P>>>,
    keys: Vec<String>,
}

enum Step<P: Precision> {
    Unitary(MatrixOp<Complex<P>>),
    Measure { indices: Vec<usize>, key: String },
}

type Outcomes = BTreeMap<String, Bitstring>;

fn unitary_op<P: Precision>(kind: GateKind, indices: Vec<usize>) -> MatrixOp<Complex<P>> {
    let l = Complex::one();
    let o = Complex::zero();
    let i = Complex::i();
    let x = |index: usize| MatrixOp::new_matrix([index], [o, l, l, o]);
    let z = |index: usize| MatrixOp::new_matrix([index], [l, o, o, -l]);
    match kind {
        GateKind::X => x(indices[0]),
        GateKind::Y => MatrixOp::new_matrix(indices, [o, -i, i, o]),
        GateKind::Z => z(indices[0]),
        GateKind::H => {
            let nl = l * P::from_f64_lossy(std::f64::consts::FRAC_1_SQRT_2);
            MatrixOp::new_matrix(indices, [nl, nl, nl, -nl])
        }
        GateKind::S => MatrixOp::new_matrix(indices, [l, o, o, i]),
        GateKind::T => {
            let t = Complex::from_polar(P::one(), P::from_f64_lossy(std::f64::consts::FRAC_PI_4));
            MatrixOp::new_matrix(indices, [l, o, o, t])
        }
        GateKind::Rz(theta) => {
            let h_theta = P::from_f64_lossy(theta * 0.5);
            MatrixOp::new_matrix(
                indices,
                [
                    Complex::from_polar(P::one(), -h_theta),
                    o,
                    o,
                    Complex::from_polar(P::one(), h_theta),
                ],
            )
        }
        GateKind::CNOT => MatrixOp::new_control([indices[0]], x(indices[1])),
        GateKind::CZ => MatrixOp::new_control([indices[0]], z(indices[1])),
        GateKind::SWAP => MatrixOp::new_swap([indices[0]], [indices[1]]),
    }
}

impl<P: Precision> Program<P> {
    fn compile(circuit: &Circuit, max_qubits: usize) -> SimulationResult<Self> {
        let qubits: Vec<Qubit> = circuit.all_qubits().into_iter().collect();
        if qubits.is_empty() {
            return Err(SimulationError::EmptyCircuit);
        }
        // Index arithmetic shifts by the qubit count.
        let limit = max_qubits.min(usize::BITS as usize - 1);
        if qubits.len() > limit {
            return Err(SimulationError::TooManyQubits {
                qubits: qubits.len(),
                limit,
            });
        }
        let index: HashMap<Qubit, usize> =
            qubits.iter().enumerate().map(|(i, q)| (*q, i)).collect();
        let lookup = |targets: &[Qubit]| -> Vec<usize> { targets.iter().map(|q| index[q]).collect() };

        let moments = circuit
            .moments()
            .iter()
            .map(|moment| {
                moment
                    .gates()
                    .iter()
                    .map(|gate| match gate {
                        Gate::Unitary { kind, targets } => {
                            Step::Unitary(unitary_op(*kind, lookup(targets)))
                        }
                        Gate::Measurement { targets, key } => Step::Measure {
                            indices: lookup(targets),
                            key: key.clone(),
                        },
                    })
                    .collect()
            })
            .collect();

        Ok(Program {
            qubits,
            moments,
            keys: circuit.measurement_keys().to_vec(),
        })
    }

    fn n(&self) -> usize {
        self.qubits.len()
    }
}

/// A statevector simulator.
///
/// Each repetition of [`Simulator::run`] replays the whole circuit from `|0...0>`, so every
/// measurement samples an independent outcome. Seeding the simulator makes runs reproducible,
/// whether or not repetitions execute in parallel.
///
/// ```
/// use qcircuit::{Circuit, Gate, Qubit, Simulator};
///
/// let q = Qubit::grid(0, 0);
/// let circuit = Circuit::from_gates([Gate::x(q), Gate::measure_with_key([q], "m")?])?;
/// let result = Simulator::seeded(1).run(&circuit, 20)?;
/// assert_eq!(result.histogram("m")?.count("1"), 20);
/// # Ok::<(), qcircuit::errors::SimulationError>(())
/// ```
#[derive(Debug)]
pub struct Simulator<P: Precision = f64> {
    config: SimulatorConfig,
    rng: StdRng,
    states_allocated: AtomicUsize,
    phantom: PhantomData<P>,
}

impl Simulator {
    /// A double precision simulator seeded from entropy.
    pub fn new() -> Self {
        Self::from_config(SimulatorConfig::default())
    }

    /// A double precision simulator with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::from_config(SimulatorConfig::default().with_seed(seed))
    }

    /// A double precision simulator with `config`.
    pub fn with_config(config: SimulatorConfig) -> Self {
        Self::from_config(config)
    }
}

impl<P: Precision> Default for Simulator<P> {
    fn default() -> Self {
        Self::from_config(SimulatorConfig::default())
    }
}

impl<P: Precision> Simulator<P> {
    /// A simulator of any precision with `config`.
    pub fn from_config(config: SimulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Simulator {
            config,
            rng,
            states_allocated: AtomicUsize::new(0),
            phantom: PhantomData,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Number of state buffers this simulator has allocated so far.
    pub fn states_allocated(&self) -> usize {
        self.states_allocated.load(Ordering::Relaxed)
    }

    /// Run `circuit` `repetitions` times and collect every measurement outcome.
    pub fn run(&mut self, circuit: &Circuit, repetitions: usize) -> SimulationResult<RunResult> {
        if repetitions == 0 {
            return Err(SimulationError::InvalidRepetitions(repetitions));
        }
        let program = Program::<P>::compile(circuit, self.config.max_qubits)?;
        debug!(
            qubits = program.n(),
            moments = program.moments.len(),
            repetitions,
            "running circuit"
        );

        let seeds: Vec<u64> = (0..repetitions).map(|_| self.rng.gen()).collect();
        let trials = self.replay_all(&program, seeds)?;

        let mut records: BTreeMap<String, Vec<Bitstring>> = program
            .keys
            .iter()
            .map(|k| (k.clone(), Vec::with_capacity(repetitions)))
            .collect();
        for trial in trials {
            for (key, bits) in trial {
                records.entry(key).or_default().push(bits);
            }
        }
        debug!(keys = records.len(), "run complete");
        Ok(RunResult::new(repetitions, records))
    }

    /// Simulate `circuit` once and return the final state along with the outcome of each
    /// measurement, which collapses the state as it goes.
    pub fn simulate(&mut self, circuit: &Circuit) -> SimulationResult<StateVectorResult<P>> {
        let program = Program::<P>::compile(circuit, self.config.max_qubits)?;
        debug!(
            qubits = program.n(),
            moments = program.moments.len(),
            "simulating circuit"
        );
        let mut rng = StdRng::seed_from_u64(self.rng.gen());
        let (state, measurements) = self.evolve(&program, &mut rng)?;
        Ok(StateVectorResult {
            state: StateVector::new(program.qubits, state),
            measurements,
        })
    }

    /// Replay the program once per seed. Output order follows `seeds`, whatever order the
    /// repetitions finish in.
    fn replay_all(&self, program: &Program<P>, seeds: Vec<u64>) -> SimulationResult<Vec<Outcomes>> {
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel_repetitions && seeds.len() > 1 {
                return seeds
                    .into_par_iter()
                    .map(|seed| self.replay(program, seed))
                    .collect();
            }
        }
        seeds
            .into_iter()
            .map(|seed| self.replay(program, seed))
            .collect()
    }

    fn replay(&self, program: &Program<P>, seed: u64) -> SimulationResult<Outcomes> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.evolve(program, &mut rng).map(|(_, outcomes)| outcomes)
    }

    fn allocate(&self, n: usize) -> Vec<Complex<P>> {
        self.states_allocated.fetch_add(1, Ordering::Relaxed);
        vec![Complex::zero(); 1 << n]
    }

    fn evolve<R: Rng>(
        &self,
        program: &Program<P>,
        rng: &mut R,
    ) -> SimulationResult<(Vec<Complex<P>>, Outcomes)> {
        let n = program.n();
        let mut state = self.allocate(n);
        let mut arena = self.allocate(n);
        state[0] = Complex::one();

        let mut outcomes = Outcomes::new();
        for (m, moment) in program.moments.iter().enumerate() {
            trace!(moment = m, steps = moment.len(), "applying moment");
            self.apply_moment(n, moment, &mut state, &mut arena, rng, &mut outcomes)?;
        }
        Ok((state, outcomes))
    }

    /// Apply every step of one moment. Steps act on disjoint qubits so their order is free.
    fn apply_moment<R: Rng>(
        &self,
        n: usize,
        moment: &[Step<P>],
        state: &mut Vec<Complex<P>>,
        arena: &mut Vec<Complex<P>>,
        rng: &mut R,
        outcomes: &mut Outcomes,
    ) -> SimulationResult<()> {
        for step in moment {
            match step {
                Step::Unitary(op) => apply_op(n, op, state, arena),
                Step::Measure { indices, key } => {
                    self.normalize(state)?;
                    let (measured, p) = measure(n, indices, state, arena, rng);
                    trace!(key = key.as_str(), measured, p = p.to_f64_lossy(), "measured");
                    let bits = (0..indices.len()).map(|i| (measured >> i) & 1 == 1).collect();
                    outcomes.insert(key.clone(), Bitstring::new(bits));
                }
            }
            std::mem::swap(state, arena);
        }
        Ok(())
    }

    fn normalize(&self, state: &mut [Complex<P>]) -> SimulationResult<()> {
        let normalization = check_normalization(
            state,
            self.config.normalization_tolerance,
            self.config.drift_limit,
        )?;
        if let Normalization::Renormalized(mass) = normalization {
            warn!(mass, "renormalized state before sampling");
        }
        Ok(())
    }
}
