use qcircuit::prelude::*;

fn main() -> SimulationResult<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let grid = Qubit::grid_square(3);
    for q in &grid {
        print!("{} ", q);
    }
    println!();

    // Gates slide into the earliest moment they can.
    let (a, b, c) = (grid[0], grid[1], grid[2]);
    let circuit = Circuit::from_gates([
        Gate::h(a),
        Gate::h(b),
        Gate::cz(a, b)?,
        Gate::h(c),
        Gate::x(a),
        Gate::cnot(b, c)?,
    ])?;
    println!("{}\n", circuit);
    for (i, moment) in circuit.moments().iter().enumerate() {
        let gates = moment
            .gates()
            .iter()
            .map(Gate::to_string)
            .collect::<Vec<_>>();
        println!("moment {}: {}", i, gates.join(" and "));
    }

    // Explicit moments are kept as given.
    let spread = Circuit::from_moments([
        Moment::new([Gate::x(a)])?,
        Moment::empty(),
        Moment::new([Gate::x(b), Gate::measure_with_key([a], "m")?])?,
    ])?;
    println!("\n{}\n", spread);

    let result = Simulator::seeded(42).run(&spread, 10)?;
    println!("{}\n", result);

    // A chain of swaps walks an excitation down the line.
    let line = Qubit::line_range(4);
    let mut chain = Circuit::from_gates([Gate::x(line[0])])?;
    chain.append_all(
        line.windows(2)
            .map(|w| Gate::swap(w[0], w[1]))
            .collect::<Result<Vec<_>, _>>()?,
    )?;
    println!("{}\n", chain);
    chain.append(Gate::measure_with_key(line.clone(), "line")?)?;
    let counts = Simulator::seeded(42).run(&chain, 10)?.histogram("line")?;
    println!("{}\n", counts);

    // One Hadamard per moment, placed by hand.
    let staircase = Circuit::from_moments(
        line.iter()
            .map(|q| Moment::new([Gate::h(*q)]))
            .collect::<Result<Vec<_>, _>>()?,
    )?;
    println!("{}", staircase);
    println!("depth {}", staircase.depth());
    Ok(())
}
