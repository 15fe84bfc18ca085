//! Read-only series capabilities consumed by the evaluators.
//!
//! Evaluators never own the backing storage: they see K/D/J triples and
//! prices through these accessors, so a `Vec<KdjValue>`, three separate
//! line slices, or a growing streaming buffer all work unchanged.

use crate::indicators::kdj::KdjValue;

/// Indexed access to K, D and J lines of equal length.
pub trait KdjSeries {
    fn len(&self) -> usize;
    fn k(&self, i: usize) -> f64;
    fn d(&self, i: usize) -> f64;
    fn j(&self, i: usize) -> f64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Indexed access to a price series.
pub trait PriceSeries {
    fn len(&self) -> usize;
    fn at(&self, i: usize) -> f64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KdjSeries for [KdjValue] {
    fn len(&self) -> usize {
        <[KdjValue]>::len(self)
    }

    fn k(&self, i: usize) -> f64 {
        self[i].k
    }

    fn d(&self, i: usize) -> f64 {
        self[i].d
    }

    fn j(&self, i: usize) -> f64 {
        self[i].j
    }
}

impl KdjSeries for Vec<KdjValue> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn k(&self, i: usize) -> f64 {
        self[i].k
    }

    fn d(&self, i: usize) -> f64 {
        self[i].d
    }

    fn j(&self, i: usize) -> f64 {
        self[i].j
    }
}

/// K, D and J held as three separate line slices.
#[derive(Debug, Clone, Copy)]
pub struct KdjLines<'a> {
    pub k: &'a [f64],
    pub d: &'a [f64],
    pub j: &'a [f64],
}

impl<'a> KdjLines<'a> {
    /// The lines must share one length.
    pub fn new(k: &'a [f64], d: &'a [f64], j: &'a [f64]) -> Self {
        assert!(
            k.len() == d.len() && d.len() == j.len(),
            "K/D/J lines must have equal length"
        );
        Self { k, d, j }
    }
}

impl KdjSeries for KdjLines<'_> {
    fn len(&self) -> usize {
        self.k.len()
    }

    fn k(&self, i: usize) -> f64 {
        self.k[i]
    }

    fn d(&self, i: usize) -> f64 {
        self.d[i]
    }

    fn j(&self, i: usize) -> f64 {
        self.j[i]
    }
}

impl PriceSeries for [f64] {
    fn len(&self) -> usize {
        <[f64]>::len(self)
    }

    fn at(&self, i: usize) -> f64 {
        self[i]
    }
}

impl PriceSeries for Vec<f64> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn at(&self, i: usize) -> f64 {
        self[i]
    }
}

impl<const N: usize> PriceSeries for [f64; N] {
    fn len(&self) -> usize {
        N
    }

    fn at(&self, i: usize) -> f64 {
        self[i]
    }
}
