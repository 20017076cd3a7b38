use qcircuit::prelude::*;

fn main() -> SimulationResult<()> {
    tracing_subscriber::fmt::init();

    let q = Qubit::line_range(2);
    let circuit = Circuit::from_gates([
        Gate::h(q[0]),
        Gate::cnot(q[0], q[1])?,
        Gate::measure_with_key(q.clone(), "z")?,
    ])?;
    println!("Circuit:\n{}\n", circuit);

    let mut simulator = Simulator::new();
    let result = simulator.run(&circuit, 50)?;
    println!("Results:\n{}\n", result);
    println!("Histogram: {}", result.histogram("z")?);

    // A single pass, keeping the collapsed state around.
    let unmeasured = Circuit::from_gates([Gate::h(q[0]), Gate::cnot(q[0], q[1])?])?;
    let out = simulator.simulate(&unmeasured)?;
    for (index, p) in out.state.probabilities().iter().enumerate() {
        println!("|{:02b}>: {:.3}", index, p);
    }
    Ok(())
}
