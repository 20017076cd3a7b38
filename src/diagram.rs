//! Text diagrams of circuits: one wire per qubit, one column per moment.
//!
//! ```text
//! q(0): ──H──@──M('z')──
//!            │  │
//! q(1): ─────X──M───────
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::circuit::Circuit;
use crate::gate::{Gate, GateKind};
use crate::moment::Moment;
use crate::qubit::Qubit;

const WIRE: char = '─';
const VERTICAL: char = '│';
const CROSSING: &str = "┼";

/// Symbols drawn on each target wire of `gate`, in target order.
fn wire_symbols(gate: &Gate) -> Vec<String> {
    match gate {
        Gate::Unitary { kind, .. } => match kind {
            GateKind::CNOT => vec!["@".to_string(), "X".to_string()],
            GateKind::CZ => vec!["@".to_string(), "@".to_string()],
            GateKind::SWAP => vec!["×".to_string(), "×".to_string()],
            kind => vec![kind.name()],
        },
        Gate::Measurement { targets, key } => {
            let mut symbols = vec![format!("M('{}')", key)];
            symbols.extend((1..targets.len()).map(|_| "M".to_string()));
            symbols
        }
    }
}

/// The column drawn for one moment.
struct Column {
    width: usize,
    symbols: HashMap<usize, String>,
    /// Gaps `r` (between row `r` and `r + 1`) spanned by a multi-qubit gate.
    spans: Vec<usize>,
}

impl Column {
    fn new(moment: &Moment, rows: &HashMap<Qubit, usize>) -> Self {
        let mut symbols = HashMap::new();
        let mut spans = vec![];
        for gate in moment.gates() {
            let gate_rows: Vec<usize> = gate.qubits().iter().map(|q| rows[q]).collect();
            for (row, symbol) in gate_rows.iter().zip(wire_symbols(gate)) {
                symbols.insert(*row, symbol);
            }
            if gate_rows.len() > 1 {
                let lo = *gate_rows.iter().min().unwrap_or(&0);
                let hi = *gate_rows.iter().max().unwrap_or(&0);
                spans.extend(lo..hi);
                (lo + 1..hi)
                    .filter(|r| !gate_rows.contains(r))
                    .for_each(|r| {
                        symbols.entry(r).or_insert_with(|| CROSSING.to_string());
                    });
            }
        }
        let width = symbols
            .values()
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(1);
        Column {
            width,
            symbols,
            spans,
        }
    }

    fn push_wire(&self, line: &mut String, row: usize) {
        line.push(WIRE);
        line.push(WIRE);
        let drawn = match self.symbols.get(&row) {
            Some(symbol) => {
                line.push_str(symbol);
                symbol.chars().count()
            }
            None => 0,
        };
        line.extend(std::iter::repeat(WIRE).take(self.width - drawn));
    }

    fn push_gap(&self, line: &mut String, gap: usize) {
        line.push_str("  ");
        if self.spans.contains(&gap) {
            line.push(VERTICAL);
            line.extend(std::iter::repeat(' ').take(self.width - 1));
        } else {
            line.extend(std::iter::repeat(' ').take(self.width));
        }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qubits: Vec<Qubit> = self.all_qubits().into_iter().collect();
        let rows: HashMap<Qubit, usize> =
            qubits.iter().enumerate().map(|(i, q)| (*q, i)).collect();
        let labels: Vec<String> = qubits.iter().map(Qubit::to_string).collect();
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let columns: Vec<Column> = self
            .moments()
            .iter()
            .map(|m| Column::new(m, &rows))
            .collect();

        let mut lines = vec![];
        for (row, label) in labels.iter().enumerate() {
            if row > 0 {
                let mut gap = " ".repeat(label_width + 2);
                columns.iter().for_each(|c| c.push_gap(&mut gap, row - 1));
                lines.push(gap.trim_end().to_string());
            }
            let mut line = format!("{:<width$}: ", label, width = label_width);
            columns.iter().for_each(|c| c.push_wire(&mut line, row));
            line.push(WIRE);
            line.push(WIRE);
            lines.push(line);
        }
        write!(f, "{}", lines.join("\n"))
    }
}
