use crate::types::Vector3;

use super::SampleLog;

pub fn sqr(x: f64) -> f64 {
    x * x
}

/// Square root that keeps the sign of a negative operand instead of yielding NaN.
pub fn signed_sqrt(x: f64) -> f64 {
    if x < 0.0 {
        -(-x).sqrt()
    } else {
        x.sqrt()
    }
}

pub fn vector_length(v: Vector3) -> f64 {
    v.length()
}

/// Removes the zero run's variance from a measured deviation, per axis.
///
/// A measurement quieter than the zero run gives a negative result rather than NaN.
pub fn deviation_with_zero(deviation: Vector3, zero_deviation: Vector3) -> Vector3 {
    deviation.zip_with(zero_deviation, |d, z| signed_sqrt(sqr(d) - sqr(z)))
}

impl SampleLog {
    /// Arithmetic mean of the buffered samples in double precision.
    ///
    /// Must run before `compute_deviation`, which centers on the cached mean.
    pub fn compute_mean(&mut self) {
        let samples = self.samples();
        self.mean = if samples.is_empty() {
            Vector3::ZERO
        } else {
            let (mut sx, mut sy, mut sz) = (0.0f64, 0.0f64, 0.0f64);
            for s in samples {
                sx += s.x as f64;
                sy += s.y as f64;
                sz += s.z as f64;
            }
            let n = samples.len() as f64;
            Vector3::new(sx / n, sy / n, sz / n)
        };

        self.mean_with_zero = self.mean - self.zero_mean;
    }

    /// Bessel-corrected standard deviation around the mean of the last `compute_mean`.
    pub fn compute_deviation(&mut self) {
        let samples = self.samples();
        let mean = self.mean;
        self.deviation = if samples.len() > 1 {
            let (mut qx, mut qy, mut qz) = (0.0f64, 0.0f64, 0.0f64);
            for s in samples {
                qx += sqr(s.x as f64 - mean.x);
                qy += sqr(s.y as f64 - mean.y);
                qz += sqr(s.z as f64 - mean.z);
            }
            let n = (samples.len() - 1) as f64;
            Vector3::new((qx / n).sqrt(), (qy / n).sqrt(), (qz / n).sqrt())
        } else {
            Vector3::ZERO
        };

        self.deviation_with_zero = deviation_with_zero(self.deviation, self.zero_deviation);
    }

    pub fn analyze(&mut self) {
        self.compute_mean();
        self.compute_deviation();
    }
}
