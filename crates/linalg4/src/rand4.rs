//! Reproducible uniform draws of vectors and matrices.
//!
//! Purpose
//! - One sampler for randomized cross-checks, benches and the CLI, so a
//!   failing case can be replayed from its seed.
//!
//! Why this design
//! - A master `StdRng` hands out one child seed per sample; the child seed is
//!   the replay token, so `regenerate_*` does not need the stream position.
//! - Values are drawn in `f64` and cast, so an `f32` and an `f64` sample from
//!   the same seed agree up to the narrowing cast.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::mat4::Matrix4;
use crate::scalar::Scalar;
use crate::vec4::Vector4;

#[derive(Debug, Clone, PartialEq)]
pub enum SampleError {
    InvalidParams { reason: String },
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid sampler params: {reason}"),
        }
    }
}

impl std::error::Error for SampleError {}

/// Entries are drawn uniformly from `[low, high)` in `f64`.
///
/// `f32` samples are rounded to nearest after the draw, so they lie in the
/// closed range between the `f32` values nearest to `low` and `high`; a draw
/// just below `high` may round to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformCfg {
    pub low: f64,
    pub high: f64,
}

impl Default for UniformCfg {
    fn default() -> Self {
        Self {
            low: -1.0,
            high: 1.0,
        }
    }
}

impl UniformCfg {
    pub fn validate(&self) -> Result<(), SampleError> {
        if !(self.low.is_finite() && self.high.is_finite()) {
            return Err(SampleError::InvalidParams {
                reason: "bounds must be finite".into(),
            });
        }
        if self.low >= self.high {
            return Err(SampleError::InvalidParams {
                reason: format!("low < high required, got [{}, {})", self.low, self.high),
            });
        }
        Ok(())
    }
}

/// Seed that regenerates one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedReplay {
    pub seed: u64,
}

/// Caller validates `cfg`.
pub fn random_vector<T: Scalar, R: Rng>(rng: &mut R, cfg: &UniformCfg) -> Vector4<T> {
    Vector4::from_array(std::array::from_fn(|_| {
        T::cast_from(rng.gen_range(cfg.low..cfg.high))
    }))
}

/// Caller validates `cfg`. Entries are drawn row by row.
pub fn random_matrix<T: Scalar, R: Rng>(rng: &mut R, cfg: &UniformCfg) -> Matrix4<T> {
    Matrix4::from_rows(std::array::from_fn(|_| {
        std::array::from_fn(|_| T::cast_from(rng.gen_range(cfg.low..cfg.high)))
    }))
}

/// Streaming sampler with per-sample replay tokens.
pub struct Sampler4 {
    cfg: UniformCfg,
    master_rng: StdRng,
}

impl Sampler4 {
    pub fn new(cfg: UniformCfg, seed: u64) -> Result<Self, SampleError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            master_rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn cfg(&self) -> &UniformCfg {
        &self.cfg
    }

    pub fn next_matrix<T: Scalar>(&mut self) -> (Matrix4<T>, SeedReplay) {
        let replay = SeedReplay {
            seed: self.master_rng.next_u64(),
        };
        (self.regenerate_matrix(&replay), replay)
    }

    pub fn next_vector<T: Scalar>(&mut self) -> (Vector4<T>, SeedReplay) {
        let replay = SeedReplay {
            seed: self.master_rng.next_u64(),
        };
        (self.regenerate_vector(&replay), replay)
    }

    pub fn regenerate_matrix<T: Scalar>(&self, replay: &SeedReplay) -> Matrix4<T> {
        random_matrix(&mut StdRng::seed_from_u64(replay.seed), &self.cfg)
    }

    pub fn regenerate_vector<T: Scalar>(&self, replay: &SeedReplay) -> Vector4<T> {
        random_vector(&mut StdRng::seed_from_u64(replay.seed), &self.cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_bounds() {
        for (low, high) in [(1.0, 1.0), (2.0, -2.0), (f64::NAN, 1.0), (0.0, f64::INFINITY)] {
            assert!(Sampler4::new(UniformCfg { low, high }, 0).is_err(), "{low} {high}");
        }
    }

    #[test]
    fn replay_regenerates_bitwise() {
        let mut s = Sampler4::new(UniformCfg::default(), 7).unwrap();
        let (m, token) = s.next_matrix::<f64>();
        let _ = s.next_matrix::<f64>();
        assert_eq!(s.regenerate_matrix::<f64>(&token), m);
        let (v, token) = s.next_vector::<f32>();
        assert_eq!(s.regenerate_vector::<f32>(&token), v);
    }

    #[test]
    fn samples_stay_in_range() {
        let cfg = UniformCfg {
            low: 2.0,
            high: 3.0,
        };
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..32 {
            let m: Matrix4<f64> = random_matrix(&mut rng, &cfg);
            assert!(m.as_slice().iter().all(|&x| (2.0..3.0).contains(&x)));
        }
    }

    #[test]
    fn single_precision_upper_bound_is_closed() {
        let cfg = UniformCfg {
            low: 1.0 - 1e-9,
            high: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(5);
        let d: Vector4<f64> = random_vector(&mut rng, &cfg);
        assert!(d.as_slice().iter().all(|&x| x < 1.0));
        let f: Vector4<f32> = random_vector(&mut rng, &cfg);
        assert_eq!(f, Vector4::splat(1.0));
    }

    #[test]
    fn precisions_share_a_stream() {
        let s = Sampler4::new(UniformCfg::default(), 3).unwrap();
        let token = SeedReplay { seed: 99 };
        let d = s.regenerate_matrix::<f64>(&token);
        let f = s.regenerate_matrix::<f32>(&token);
        assert_eq!(d.cast::<f32>(), f);
    }
}
