use qcircuit::prelude::*;

fn qubits() -> (Qubit, Qubit, Qubit) {
    let q = Qubit::line_range(3);
    (q[0], q[1], q[2])
}

#[test]
fn independent_gates_share_a_moment() -> CircuitResult<()> {
    let (a, b, c) = qubits();
    let circuit = Circuit::from_gates([Gate::h(a), Gate::h(b), Gate::cz(a, b)?, Gate::h(c)])?;

    assert_eq!(circuit.depth(), 2);
    let first = &circuit.moments()[0];
    assert_eq!(first.len(), 3);
    assert!(first.operates_on(&[a, b, c]));
    assert_eq!(first.gate_on(&c), Some(&Gate::h(c)));
    assert_eq!(circuit.moments()[1].gates(), &[Gate::cz(a, b)?]);
    Ok(())
}

#[test]
fn gates_never_pass_an_earlier_gate_on_their_qubits() -> CircuitResult<()> {
    let (a, b, c) = qubits();
    let circuit = Circuit::from_gates([Gate::cnot(a, b)?, Gate::x(c), Gate::cnot(b, c)?])?;

    assert_eq!(circuit.depth(), 2);
    assert_eq!(
        circuit.moments()[0].gates(),
        &[Gate::cnot(a, b)?, Gate::x(c)]
    );
    assert_eq!(circuit.moments()[1].gates(), &[Gate::cnot(b, c)?]);
    Ok(())
}

#[test]
fn gate_slots_after_last_conflict_not_first_gap() -> CircuitResult<()> {
    let (a, b, _) = qubits();
    let mut circuit = Circuit::from_gates([Gate::x(a), Gate::cz(a, b)?])?;
    // Moment 0 has room on b, but CZ in moment 1 already acts on b.
    circuit.append(Gate::y(b))?;

    assert_eq!(circuit.depth(), 3);
    assert!(!circuit.moments()[0].operates_on_qubit(&b));
    assert_eq!(circuit.moments()[2].gates(), &[Gate::y(b)]);
    Ok(())
}

#[test]
fn repeated_gate_on_one_qubit_opens_new_moments() -> CircuitResult<()> {
    let (a, _, _) = qubits();
    let circuit = Circuit::from_gates([Gate::x(a), Gate::x(a), Gate::x(a)])?;
    assert_eq!(circuit.depth(), 3);
    assert_eq!(circuit.num_gates(), 3);
    Ok(())
}

#[test]
fn explicit_moments_are_kept_verbatim() -> CircuitResult<()> {
    let (a, b, _) = qubits();
    let circuit = Circuit::from_moments([
        Moment::new([Gate::x(a)])?,
        Moment::empty(),
        Moment::new([Gate::x(b)])?,
    ])?;
    assert_eq!(circuit.depth(), 3);
    assert!(circuit.moments()[1].is_empty());
    assert_eq!(circuit.num_gates(), 2);
    Ok(())
}

#[test]
fn conflicting_gates_cannot_share_a_moment() {
    let (a, b, _) = qubits();
    let moment = Moment::new([Gate::x(a), Gate::cnot(b, a).unwrap()]);
    assert_eq!(moment, Err(CircuitError::MomentConflict(a)));
}

#[test]
fn insert_into_existing_moment() -> CircuitResult<()> {
    let (a, b, c) = qubits();
    let mut circuit = Circuit::from_gates([Gate::x(a), Gate::x(a)])?;
    circuit.insert_into_moment(1, Gate::h(b))?;
    assert!(circuit.moments()[1].operates_on_qubit(&b));

    assert_eq!(
        circuit.insert_into_moment(0, Gate::cz(a, c)?),
        Err(CircuitError::MomentConflict(a))
    );
    assert_eq!(
        circuit.insert_into_moment(5, Gate::h(c)),
        Err(CircuitError::MomentIndexOutOfRange { index: 5, depth: 2 })
    );
    Ok(())
}

#[test]
fn malformed_gates_are_rejected() {
    let (a, b, _) = qubits();
    assert_eq!(Gate::cnot(a, a), Err(CircuitError::DuplicateQubit(a)));
    assert_eq!(
        GateKind::SWAP.on([a]),
        Err(CircuitError::ArityMismatch {
            gate: "SWAP".to_string(),
            expected: 2,
            provided: 1
        })
    );
    assert_eq!(
        Gate::measure(Vec::<Qubit>::new()),
        Err(CircuitError::EmptyTargets)
    );
    assert!(GateKind::CZ.on([a, b]).is_ok());
}

#[test]
fn measurement_keys_must_be_unique() -> CircuitResult<()> {
    let (a, b, _) = qubits();
    let mut circuit = Circuit::from_gates([Gate::measure_with_key([a], "m")?])?;
    assert_eq!(
        circuit.append(Gate::measure_with_key([b], "m")?),
        Err(CircuitError::DuplicateMeasurementKey("m".to_string()))
    );
    assert_eq!(circuit.measurement_keys(), &["m".to_string()]);
    Ok(())
}

#[test]
fn all_qubits_are_sorted() -> CircuitResult<()> {
    let grid = Qubit::grid_square(2);
    let circuit = Circuit::from_gates([Gate::x(grid[3]), Gate::x(grid[0])])?;
    let all: Vec<Qubit> = circuit.all_qubits().into_iter().collect();
    assert_eq!(all, vec![Qubit::grid(0, 0), Qubit::grid(1, 1)]);
    Ok(())
}

#[test]
fn bell_circuit_diagram() -> CircuitResult<()> {
    let q = Qubit::line_range(2);
    let circuit = Circuit::from_gates([
        Gate::h(q[0]),
        Gate::cnot(q[0], q[1])?,
        Gate::measure_with_key(q.clone(), "z")?,
    ])?;
    let diagram = circuit.to_string();
    let lines: Vec<&str> = diagram.lines().collect();
    assert_eq!(lines.first(), Some(&"q(0): ──H──@──M('z')──"));
    assert_eq!(lines.last(), Some(&"q(1): ─────X──M───────"));
    Ok(())
}
