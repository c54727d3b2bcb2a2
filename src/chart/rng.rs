//! Random number generation for the placement variation.
//!
//! Only the randomness relaxation of [`super::placement`] draws random numbers, to try alternative
//! lanes. The [`Rng`] trait keeps that draw pluggable.
//!
//! # Implementations
//!
//! ## [`RngMock`]
//!
//! A deterministic mock returning predefined values in rotation, for tests.
//!
//! ## [`RandRng`]
//!
//! An implementation using the [`rand`] crate. Seed it for reproducible charts.
//!
//! [`rand`]: https://crates.io/crates/rand

use core::ops::RangeInclusive;

/// A random number generator for the placement variation.
///
/// # Contract
///
/// - The generated number must be within the specified `range` (inclusive).
/// - Returning a number outside the range is clamped by the caller, so it only biases the choice.
pub trait Rng {
    /// Generates a random integer within the specified `range`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use saber_step::chart::rng::{Rng, RngMock};
    ///
    /// let mut rng = RngMock([2]);
    /// assert_eq!(rng.generate(0..=3), 2);
    /// ```
    fn generate(&mut self, range: RangeInclusive<usize>) -> usize;
}

impl<R: Rng + ?Sized> Rng for &mut R {
    fn generate(&mut self, range: RangeInclusive<usize>) -> usize {
        (**self).generate(range)
    }
}

/// A deterministic mock random number generator for testing.
///
/// This implementation returns values from a predefined array in rotation. An empty array
/// always gives the start of the range.
///
/// # Examples
///
/// ```rust
/// use saber_step::chart::rng::{Rng, RngMock};
///
/// let mut rng = RngMock([1, 2]);
///
/// // Returns values in rotation: 1, 2, 1, 2, ...
/// assert_eq!(rng.generate(0..=3), 1);
/// assert_eq!(rng.generate(0..=3), 2);
/// assert_eq!(rng.generate(0..=3), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RngMock<const N: usize>(pub [usize; N]);

impl<const N: usize> Rng for RngMock<N> {
    fn generate(&mut self, range: RangeInclusive<usize>) -> usize {
        let Some(first) = self.0.first().copied() else {
            return *range.start();
        };
        self.0.rotate_left(1);
        first
    }
}

/// A random number generator using the [`rand`] crate.
///
/// It wraps any type implementing [`rand::RngCore`] and generates numbers within the specified
/// range using rejection sampling.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "rand")]
/// # {
/// use saber_step::chart::rng::{Rng, RandRng};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = RandRng(StdRng::seed_from_u64(42));
/// let n = rng.generate(1..=3);
/// assert!((1..=3).contains(&n));
/// # }
/// ```
///
/// [`rand`]: https://crates.io/crates/rand
#[cfg(feature = "rand")]
#[derive(Debug, Clone)]
pub struct RandRng<R>(pub R);

#[cfg(feature = "rand")]
impl<R: rand::RngCore> Rng for RandRng<R> {
    fn generate(&mut self, range: RangeInclusive<usize>) -> usize {
        let (start, end) = (*range.start(), *range.end());
        if end <= start {
            return start;
        }
        let width = (end - start + 1) as u64;
        // largest multiple of `width` representable, to keep the draw unbiased
        let zone = u64::MAX - (u64::MAX % width);
        loop {
            let n = self.0.next_u64();
            if n < zone {
                return start + (n % width) as usize;
            }
        }
    }
}

/// Picks a lane index in `0..4` other than `exclude`, uniformly.
pub(crate) fn lane_index_excluding(rng: &mut impl Rng, exclude: usize) -> usize {
    let pick = rng.generate(0..=2).min(2);
    if pick >= exclude { pick + 1 } else { pick }
}
