//! Dense two-dimensional arrays of wire values
//!
//! `Dense` holds all wire values of one layer across all copies of the
//! circuit. The first dimension `n0` indexes copies and the second `n1`
//! indexes wires; element `(i0, i1)` lives at `v[i1 * n0 + i0]`.
//!
//! Binding fixes the lowest variable of the first dimension to a field
//! element, halving `n0` (rounding up). When `n0` is odd the last entry of
//! each row is paired with an implicit zero.

use super::affine_interpolation;
use ark_ff::Field;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dense<F: Field> {
    pub n0: usize,
    pub n1: usize,
    pub v: Vec<F>,
}

impl<F: Field> Dense<F> {
    /// All-zero array of shape `n0 x n1`.
    pub fn new(n0: usize, n1: usize) -> Self {
        Self {
            n0,
            n1,
            v: vec![F::zero(); n0 * n1],
        }
    }

    /// Single-copy array holding `values` as its wires.
    pub fn from_wires(values: Vec<F>) -> Self {
        Self {
            n0: 1,
            n1: values.len(),
            v: values,
        }
    }

    pub fn at(&self, j: usize) -> F {
        self.v[j]
    }

    /// `v[i] <- v[2i] + r (v[2i+1] - v[2i])` along the first dimension.
    pub fn bind(&mut self, r: F) {
        let n0 = self.n0;
        let mut rd = 0;
        let mut wr = 0;
        for _ in 0..self.n1 {
            let mut i0 = 0;
            while 2 * i0 + 1 < n0 {
                self.v[wr] = affine_interpolation(r, self.v[rd], self.v[rd + 1]);
                i0 += 1;
                rd += 2;
                wr += 1;
            }
            if 2 * i0 < n0 {
                self.v[wr] = affine_interpolation(r, self.v[rd], F::zero());
                rd += 1;
                wr += 1;
            }
        }
        self.n0 = (n0 + 1) / 2;
        self.v.truncate(self.n0 * self.n1);
    }

    pub fn bind_all(&mut self, r: &[F]) {
        for &ri in r {
            self.bind(ri);
        }
    }

    /// Element `(p0, p1)`, or zero when `p0` is past the first dimension.
    pub fn at_corners(&self, p0: usize, p1: usize) -> F {
        if p0 < self.n0 {
            self.v[p1 * self.n0 + p0]
        } else {
            F::zero()
        }
    }

    /// The pair `(p0, p1)`, `(p0 + 1, p1)` as the two evaluations of a
    /// linear polynomial.
    pub fn t2_at_corners(&self, p0: usize, p1: usize) -> [F; 2] {
        [self.at_corners(p0, p1), self.at_corners(p0 + 1, p1)]
    }

    /// Reinterpret a fully bound first dimension: the `n1` values become
    /// `n0 x (n1 / n0)`.
    pub fn reshape(&mut self, n0: usize) {
        assert_eq!(self.n0, 1, "reshape requires n0 == 1");
        assert!(n0 > 0, "n0 > 0");
        let was_n1 = self.n1;
        self.n0 = n0;
        self.n1 = was_n1 / n0;
        assert_eq!(self.n1 * n0, was_n1, "reshape must preserve the size");
    }

    /// The only element of a fully bound array.
    pub fn scalar(&self) -> F {
        assert_eq!(self.n0, 1, "n0 == 1");
        assert_eq!(self.n1, 1, "n1 == 1");
        self.v[0]
    }
}

/// Appends values to a single-copy [`Dense`] in wire order.
pub struct DenseFiller<'a, F: Field> {
    pos: usize,
    w: &'a mut Dense<F>,
}

impl<'a, F: Field> DenseFiller<'a, F> {
    pub fn new(w: &'a mut Dense<F>) -> Self {
        assert_eq!(w.n0, 1, "DenseFiller requires a single copy");
        Self { pos: 0, w }
    }

    pub fn push(&mut self, x: F) -> &mut Self {
        assert!(self.pos < self.w.n1, "DenseFiller overflow");
        self.w.v[self.pos] = x;
        self.pos += 1;
        self
    }

    pub fn push_all(&mut self, xs: &[F]) -> &mut Self {
        for &x in xs {
            self.push(x);
        }
        self
    }

    /// Push the `bits` low bits of `x`, least significant first.
    pub fn push_bits(&mut self, x: u64, bits: usize) -> &mut Self {
        for i in 0..bits {
            self.push(F::from((x >> i) & 1));
        }
        self
    }

    pub fn size(&self) -> usize {
        self.pos
    }
}
