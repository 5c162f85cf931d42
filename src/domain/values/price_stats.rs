//! Historical price statistics and the normal distribution used for the
//! confidence band.
//!
//! The band is `mean ± 2σ` over the 30/90/180-day average buy-box prices,
//! with σ the population standard deviation (divide by N). The cumulative
//! probability at each bound comes from the error function, approximated with
//! Abramowitz & Stegun 7.1.26 (max absolute error 1.5e-7), which is well
//! inside the 2dp percentage precision written to the sheet.

use serde::Serialize;

/// Width of the confidence band in standard deviations.
pub const BAND_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl PriceStats {
    /// Mean and population standard deviation. `None` for an empty sample.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            std_dev: variance.sqrt(),
        })
    }

    pub fn upper_bound(&self) -> f64 {
        self.mean + BAND_WIDTH * self.std_dev
    }

    pub fn lower_bound(&self) -> f64 {
        self.mean - BAND_WIDTH * self.std_dev
    }

    /// P(X <= x) for X ~ N(mean, std_dev²).
    pub fn cdf(&self, x: f64) -> f64 {
        normal_cdf(x, self.mean, self.std_dev)
    }
}

/// Error function, A&S 7.1.26.
pub fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Cumulative distribution of a normal with the given mean and standard
/// deviation. A zero (or negative) deviation is a point mass at the mean;
/// the probability exactly at the mean is reported as 0.5.
pub fn normal_cdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    if std_dev.is_nan() || std_dev <= 0.0 {
        return if x < mean {
            0.0
        } else if x > mean {
            1.0
        } else {
            0.5
        };
    }
    0.5 * (1.0 + erf((x - mean) / (std_dev * std::f64::consts::SQRT_2)))
}
