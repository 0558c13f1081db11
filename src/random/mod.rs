//! Sources of randomness
//!
//! [`RandomEngine`] is the single capability the protocol needs: a stream
//! of uniform bytes. Field elements, bounded naturals and k-subsets are
//! derived from that stream by rejection sampling, so two engines that
//! produce the same bytes produce the same samples.
//!
//! - [`RngEngine`] wraps any `rand` generator (OS entropy or a seeded PRG).
//! - [`Transcript`] derives the stream from a Fiat-Shamir hash.

pub mod transcript;

pub use transcript::{Transcript, TranscriptVersion};

use crate::field::ZkField;
use rand::RngCore;

pub trait RandomEngine {
    /// Fill `buf` with uniform bytes.
    fn bytes(&mut self, buf: &mut [u8]);

    /// Sample a uniform field element.
    fn elt<F: ZkField>(&mut self) -> F {
        let mut buf = vec![0u8; F::BYTES];
        let mask = F::top_byte_mask();
        loop {
            self.bytes(&mut buf);
            if let Some(top) = buf.last_mut() {
                *top &= mask;
            }
            if let Some(e) = F::from_bytes_field(&buf) {
                return e;
            }
        }
    }

    /// Sample a uniform element of the subfield of `F`.
    fn subfield_elt<F: ZkField>(&mut self) -> F {
        let mut buf = vec![0u8; F::SUBFIELD_BYTES];
        let mask = if F::SUBFIELD_BYTES == F::BYTES {
            F::top_byte_mask()
        } else {
            0xff
        };
        loop {
            self.bytes(&mut buf);
            if let Some(top) = buf.last_mut() {
                *top &= mask;
            }
            if let Some(e) = F::from_bytes_subfield(&buf) {
                return e;
            }
        }
    }

    fn elts<F: ZkField>(&mut self, n: usize) -> Vec<F> {
        (0..n).map(|_| self.elt()).collect()
    }

    /// Uniform natural in `[0, n)`.
    fn nat(&mut self, n: usize) -> usize {
        assert!(n > 0, "nat(0)");

        // minimum number of bytes covering n
        let mut len = 0;
        let mut nn = n;
        while nn != 0 {
            nn >>= 8;
            len += 1;
        }
        let mask = minimal_mask(n);

        let mut buf = [0u8; std::mem::size_of::<usize>()];
        loop {
            self.bytes(&mut buf[..len]);
            let r = buf[..len]
                .iter()
                .rev()
                .fold(0usize, |acc, &b| (acc << 8) | b as usize)
                & mask;
            if r < n {
                return r;
            }
        }
    }

    /// `k` distinct naturals in `[0, n)`, in sampling order.
    fn choose(&mut self, n: usize, k: usize) -> Vec<usize> {
        assert!(n >= k, "choose: n >= k");
        let mut a: Vec<usize> = (0..n).collect();
        let mut res = Vec::with_capacity(k);
        for i in 0..k {
            let j = i + self.nat(n - i);
            a.swap(i, j);
            res.push(a[i]);
        }
        res
    }
}

/// The smallest all-ones bitmask `m` with `n & m == n`.
fn minimal_mask(n: usize) -> usize {
    let mut mask = 0usize;
    while n & mask != n {
        mask = (mask << 1) | 1;
    }
    mask
}

/// Adapter from a `rand` generator to [`RandomEngine`].
pub struct RngEngine<R: RngCore> {
    rng: R,
}

impl<R: RngCore> RngEngine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore> RandomEngine for RngEngine<R> {
    fn bytes(&mut self, buf: &mut [u8]) {
        self.rng.fill_bytes(buf);
    }
}
