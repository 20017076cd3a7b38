#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::utils::{full_to_sub, sub_to_full};
use crate::{iter_mut, Complex, Precision};
use num_traits::{One, Zero};
use std::fmt;
use std::iter::Sum;
use std::ops::Mul;

/// Ops which can be applied to quantum states.
#[derive(Clone, PartialEq)]
pub enum MatrixOp<P> {
    /// Indices, Matrix data (row major, `2^k` by `2^k` for `k` indices)
    Matrix(Vec<usize>, Vec<P>),
    /// A indices, B indices, each with n entries
    Swap(usize, Vec<usize>),
    /// (n) Control indices, Op indices, Op
    Control(usize, Vec<usize>, Box<MatrixOp<P>>),
}

impl<P> MatrixOp<P> {
    /// Make a new dense matrix op
    pub fn new_matrix<Indx, Dat>(indices: Indx, data: Dat) -> Self
    where
        Indx: Into<Vec<usize>>,
        Dat: Into<Vec<P>>,
    {
        let indices = indices.into();
        let data = data.into();
        debug_assert_eq!(data.len(), 1 << (2 * indices.len()));
        Self::Matrix(indices, data)
    }

    /// Make a new swap op exchanging the qubits of `a` with those of `b`
    pub fn new_swap<IndxA, IndxB>(a: IndxA, b: IndxB) -> Self
    where
        IndxA: Into<Vec<usize>>,
        IndxB: Into<Vec<usize>>,
    {
        let mut a = a.into();
        let n = a.len();
        let b = b.into();
        debug_assert_eq!(a.len(), b.len());
        a.extend(b);
        Self::Swap(n, a)
    }

    /// Make a new op applying `op` only where every qubit in `c` is `|1>`.
    /// Nested controls are collapsed into one.
    pub fn new_control<Indx>(c: Indx, op: MatrixOp<P>) -> Self
    where
        Indx: Into<Vec<usize>>,
    {
        let mut c = c.into();
        let cn = c.len();
        match op {
            MatrixOp::Control(ocn, oindices, op) => {
                c.extend(oindices);
                Self::Control(cn + ocn, c, op)
            }
            op => {
                c.extend_from_slice(op.indices());
                Self::Control(cn, c, Box::new(op))
            }
        }
    }

    /// Get the indices acted on by this op, controls first.
    pub fn indices(&self) -> &[usize] {
        match self {
            MatrixOp::Matrix(i, _) => i,
            MatrixOp::Swap(_, i) => i,
            MatrixOp::Control(_, i, _) => i,
        }
    }
}

impl<P> MatrixOp<P>
where
    P: Clone + Zero + One,
{
    /// Sums `f` over all nonzero entries `(column, value)` of `row` of this op's matrix, where the
    /// op acts on `nindices` qubits.
    pub fn sum_for_op_cols<T>(&self, nindices: usize, row: usize, f: &dyn Fn((usize, P)) -> T) -> T
    where
        T: Sum,
    {
        match self {
            MatrixOp::Matrix(_, data) => {
                let side = 1 << nindices;
                data[row * side..(row + 1) * side]
                    .iter()
                    .cloned()
                    .enumerate()
                    .filter(|(_, val)| !val.is_zero())
                    .map(f)
                    .sum()
            }
            MatrixOp::Swap(n, _) => {
                let low_mask = (1 << n) - 1;
                let col = ((row & low_mask) << n) | (row >> n);
                std::iter::once((col, P::one())).map(f).sum()
            }
            MatrixOp::Control(n_control, _, op) => {
                let n_op = nindices - n_control;
                let control_mask = (1 << n_control) - 1;
                if row >> n_op == control_mask {
                    let op_row = row & ((1 << n_op) - 1);
                    let high = control_mask << n_op;
                    let g = |(col, val): (usize, P)| f((high | col, val));
                    op.sum_for_op_cols(n_op, op_row, &g)
                } else {
                    std::iter::once((row, P::one())).map(f).sum()
                }
            }
        }
    }
}

impl<P> fmt::Debug for MatrixOp<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (name, indices) = match self {
            MatrixOp::Matrix(indices, _) => ("Matrix".to_string(), indices.clone()),
            MatrixOp::Swap(_, indices) => ("Swap".to_string(), indices.clone()),
            MatrixOp::Control(num_c_indices, indices, op) => {
                let name = format!("C({:?})", *op);
                (name, indices[..*num_c_indices].to_vec())
            }
        };
        let int_strings = indices.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        write!(f, "{}[{}]", name, int_strings.join(", "))
    }
}

/// Apply `op` to the `input` state of `n` qubits, storing the results in `output`.
pub fn apply_op<P>(n: usize, op: &MatrixOp<P>, input: &[P], output: &mut [P])
where
    P: Clone + One + Zero + Sum + Mul<Output = P> + Send + Sync,
{
    let mat_indices = op.indices();
    let nindices = mat_indices.len();

    let row_fn = |(row, outputloc): (usize, &mut P)| {
        let matrow = full_to_sub(n, mat_indices, row);
        // Maps from an op matrix column to the value at that column for the row above.
        let f = |(i, val): (usize, P)| -> P {
            let colbits = sub_to_full(n, mat_indices, i, row);
            val * input[colbits].clone()
        };
        *outputloc = op.sum_for_op_cols(nindices, matrow, &f);
    };

    iter_mut!(output).enumerate().for_each(row_fn);
}

/// Make a complex vector from real parts.
pub fn from_reals<P: Precision>(data: &[P]) -> Vec<Complex<P>> {
    data.iter().map(|x| Complex::new(*x, P::zero())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_op(index: usize) -> MatrixOp<Complex<f64>> {
        let (o, l) = (Complex::zero(), Complex::one());
        MatrixOp::new_matrix([index], [o, l, l, o])
    }

    fn apply(n: usize, op: &MatrixOp<Complex<f64>>, input: &[f64]) -> Vec<Complex<f64>> {
        let input = from_reals(input);
        let mut output = input.clone();
        apply_op(n, op, &input, &mut output);
        output
    }

    #[test]
    fn test_x_on_most_significant_qubit() {
        // |00> -> |10>
        let out = apply(2, &x_op(0), &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(out, from_reals(&[0.0, 0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_control_only_fires_when_set() {
        let cnot = MatrixOp::new_control([0], x_op(1));
        assert_eq!(cnot.indices(), &[0, 1]);
        // |10> -> |11>
        let out = apply(2, &cnot, &[0.0, 0.0, 1.0, 0.0]);
        assert_eq!(out, from_reals(&[0.0, 0.0, 0.0, 1.0]));
        // |01> unchanged
        let out = apply(2, &cnot, &[0.0, 1.0, 0.0, 0.0]);
        assert_eq!(out, from_reals(&[0.0, 1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_nested_controls_collapse() {
        let toffoli = MatrixOp::new_control([0], MatrixOp::new_control([1], x_op(2)));
        match &toffoli {
            MatrixOp::Control(2, indices, _) => assert_eq!(indices, &vec![0, 1, 2]),
            other => panic!("unexpected op {:?}", other),
        }
        // |110> -> |111>
        let mut input = vec![0.0; 8];
        input[0b110] = 1.0;
        let out = apply(3, &toffoli, &input);
        assert_eq!(out[0b111], Complex::one());
    }

    #[test]
    fn test_swap_non_adjacent() {
        let swap = MatrixOp::<Complex<f64>>::new_swap([0], [2]);
        // |100> -> |001>
        let mut input = vec![0.0; 8];
        input[0b100] = 1.0;
        let out = apply(3, &swap, &input);
        assert_eq!(out[0b001], Complex::one());
        assert_eq!(out[0b100], Complex::zero());
    }
}
