use std::fmt;

/// An addressable qubit. Qubits carry no state, only identity: two qubits are the same qubit
/// exactly when they compare equal.
///
/// Qubits are ordered line qubits first (by index), then grid qubits (row-major). This order
/// fixes the layout of the simulated state: the smallest qubit in a circuit is the most
/// significant bit of a basis index.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Qubit {
    /// A qubit on a line, identified by its position.
    Line(usize),
    /// A qubit on a 2D grid, identified by its coordinate.
    Grid {
        /// Row of the qubit.
        row: i32,
        /// Column of the qubit.
        col: i32,
    },
}

impl Qubit {
    /// A qubit on a line at `index`.
    pub fn line(index: usize) -> Self {
        Qubit::Line(index)
    }

    /// A qubit on a grid at `(row, col)`.
    pub fn grid(row: i32, col: i32) -> Self {
        Qubit::Grid { row, col }
    }

    /// Line qubits `0..n`.
    ///
    /// ```
    /// use qcircuit::Qubit;
    /// let qs = Qubit::line_range(3);
    /// assert_eq!(qs, vec![Qubit::line(0), Qubit::line(1), Qubit::line(2)]);
    /// ```
    pub fn line_range(n: usize) -> Vec<Self> {
        (0..n).map(Qubit::Line).collect()
    }

    /// All grid qubits of a `length` by `length` square anchored at `(0, 0)`, row-major.
    pub fn grid_square(length: i32) -> Vec<Self> {
        (0..length)
            .flat_map(|row| (0..length).map(move |col| Qubit::Grid { row, col }))
            .collect()
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qubit::Line(index) => write!(f, "q({})", index),
            Qubit::Grid { row, col } => write!(f, "q({}, {})", row, col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_square_is_row_major() {
        let qs = Qubit::grid_square(3);
        assert_eq!(qs.len(), 9);
        assert_eq!(qs[1], Qubit::grid(0, 1));
        assert_eq!(qs[3], Qubit::grid(1, 0));
        let mut sorted = qs.clone();
        sorted.sort();
        assert_eq!(sorted, qs);
    }

    #[test]
    fn test_line_before_grid() {
        assert!(Qubit::line(100) < Qubit::grid(0, 0));
        assert!(Qubit::line(1) < Qubit::line(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(Qubit::line(4).to_string(), "q(4)");
        assert_eq!(Qubit::grid(0, 2).to_string(), "q(0, 2)");
    }
}
