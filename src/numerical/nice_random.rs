//! "Nice" random numbers: positive and negative, never large, with small
//! denominators. A `_lh` suffix means likelihood.
use log::warn;
use num::rational::Rational64;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::{Cell, RefCell};

#[derive(Debug, Clone, PartialEq)]
pub struct NiceRandomParams {
    /// likelihood of a pure integer (approximate: 10/2 reduces to 5)
    pub integer_lh: f64,
    /// likelihoods of 1, 2, 3, ... digits
    pub digit_lh: Vec<f64>,
    pub negative_lh: f64,
    pub zero_ok: bool,
}

impl Default for NiceRandomParams {
    fn default() -> Self {
        NiceRandomParams {
            integer_lh: 0.5,
            digit_lh: vec![0.5, 0.5],
            negative_lh: 0.5,
            zero_ok: true,
        }
    }
}

pub fn nice_random_integer<R: Rng + ?Sized>(
    rng: &mut R,
    digit_lh: &[f64],
    negative_lh: f64,
    zero_ok: bool,
) -> i64 {
    let digits = match WeightedIndex::new(digit_lh) {
        Ok(dist) => dist.sample(rng) + 1,
        Err(e) => {
            warn!("unusable digit likelihoods {:?} ({}), using one digit", digit_lh, e);
            1
        }
    };
    let b = 10i64.pow(digits as u32);
    let a = if digits == 1 && zero_ok { 0 } else { b / 10 };
    let n = rng.random_range(a..b);
    if rng.random::<f64>() < negative_lh { -n } else { n }
}

pub fn nice_random_rational<R: Rng + ?Sized>(rng: &mut R, params: &NiceRandomParams) -> Rational64 {
    let n = nice_random_integer(rng, &params.digit_lh, params.negative_lh, params.zero_ok);
    let mut d = 1;
    if n != 0 && rng.random::<f64>() >= params.integer_lh {
        d = nice_random_integer(rng, &params.digit_lh, 0.0, false);
    }
    Rational64::new(n, d)
}

/// Where illustrative coefficients come from.
pub trait RationalSource {
    fn next_rational(&self) -> Rational64;
}

/// nice random rationals from an owned generator
pub struct NiceRandomRationals {
    rng: RefCell<StdRng>,
    params: NiceRandomParams,
}

impl NiceRandomRationals {
    pub fn new(params: NiceRandomParams) -> Self {
        NiceRandomRationals {
            rng: RefCell::new(StdRng::from_os_rng()),
            params,
        }
    }

    /// reproducible sequence
    pub fn seeded(seed: u64, params: NiceRandomParams) -> Self {
        NiceRandomRationals {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            params,
        }
    }
}

impl Default for NiceRandomRationals {
    fn default() -> Self {
        NiceRandomRationals::new(NiceRandomParams::default())
    }
}

impl RationalSource for NiceRandomRationals {
    fn next_rational(&self) -> Rational64 {
        nice_random_rational(&mut *self.rng.borrow_mut(), &self.params)
    }
}

/// Cycles through a fixed list; for tests.
pub struct FixedRationals {
    values: Vec<Rational64>,
    next: Cell<usize>,
}

impl FixedRationals {
    pub fn new(values: Vec<Rational64>) -> Self {
        FixedRationals {
            values,
            next: Cell::new(0),
        }
    }
}

impl RationalSource for FixedRationals {
    fn next_rational(&self) -> Rational64 {
        if self.values.is_empty() {
            return Rational64::from_integer(0);
        }
        let i = self.next.get();
        self.next.set((i + 1) % self.values.len());
        self.values[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integer_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let n = nice_random_integer(&mut rng, &[0.5, 0.5], 0.5, false);
            assert!(n != 0);
            assert!(n.abs() < 100);
        }
        for _ in 0..200 {
            let n = nice_random_integer(&mut rng, &[1.0], 0.0, true);
            assert!((0..10).contains(&n));
        }
    }

    #[test]
    fn test_negative_likelihood() {
        let mut rng = StdRng::seed_from_u64(7);
        let trials = 4000;
        let negatives = (0..trials)
            .filter(|_| nice_random_integer(&mut rng, &[0.0, 1.0], 0.25, true) < 0)
            .count();
        assert_relative_eq!(negatives as f64 / trials as f64, 0.25, epsilon = 0.05);
    }

    #[test]
    fn test_rational_denominators_small() {
        let source = NiceRandomRationals::seeded(3, NiceRandomParams::default());
        for _ in 0..300 {
            let r = source.next_rational();
            assert!(*r.denom() > 0 && *r.denom() < 100);
            assert!(r.numer().abs() < 100);
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = NiceRandomRationals::seeded(11, NiceRandomParams::default());
        let b = NiceRandomRationals::seeded(11, NiceRandomParams::default());
        let xs: Vec<_> = (0..10).map(|_| a.next_rational()).collect();
        let ys: Vec<_> = (0..10).map(|_| b.next_rational()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_fixed_source_cycles() {
        let s = FixedRationals::new(vec![Rational64::new(1, 2), Rational64::from_integer(-3)]);
        let got: Vec<_> = (0..3).map(|_| s.next_rational()).collect();
        assert_eq!(
            got,
            vec![
                Rational64::new(1, 2),
                Rational64::from_integer(-3),
                Rational64::new(1, 2)
            ]
        );
    }
}
