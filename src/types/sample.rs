use serde::{Deserialize, Serialize};

/// One timestamped 3-axis reading as delivered by a sensor feed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Sample {
    pub timestamp: i64, // nanoseconds
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Sample {
    pub fn new(timestamp: i64, x: f32, y: f32, z: f32) -> Self {
        Self { timestamp, x, y, z }
    }

    /// Magnitude computed in double precision.
    pub fn length(&self) -> f64 {
        let (x, y, z) = (self.x as f64, self.y as f64, self.z as f64);
        (x * x + y * y + z * z).sqrt()
    }
}

/// Double precision vector used for means, deviations and the zero baseline.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }

    pub fn zip_with(self, other: Vector3, f: impl Fn(f64, f64) -> f64) -> Self {
        Self::new(f(self.x, other.x), f(self.y, other.y), f(self.z, other.z))
    }
}

impl std::ops::Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl From<Sample> for Vector3 {
    fn from(sample: Sample) -> Self {
        Self::new(sample.x as f64, sample.y as f64, sample.z as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_vector_length() {
        assert_abs_diff_eq!(Vector3::new(3.0, 4.0, 12.0).length(), 13.0);
        assert_eq!(Vector3::ZERO.length(), 0.0);
    }

    #[test]
    fn test_sample_length_uses_double_precision() {
        let sample = Sample::new(0, 3.0, 4.0, 0.0);
        assert_abs_diff_eq!(sample.length(), 5.0);
        assert_abs_diff_eq!(Vector3::from(sample).length(), sample.length());
    }

    #[test]
    fn test_sample_from_json_payload() {
        let sample: Sample =
            serde_json::from_str(r#"{"timestamp": 1500000000, "x": 0.5, "y": -9.81, "z": 0.0}"#)
                .unwrap();
        assert_eq!(sample.timestamp, 1_500_000_000);
        assert_eq!(sample.x, 0.5);
        assert_eq!(sample.y, -9.81);
    }

    #[test]
    fn test_vector_sub() {
        let d = Vector3::new(1.0, 2.0, 3.0) - Vector3::new(0.5, 2.0, 4.0);
        assert_eq!(d, Vector3::new(0.5, 0.0, -1.0));
    }
}
