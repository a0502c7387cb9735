/*!
# `Squish` - Encoding Quality.
*/

use crate::SquishError;
use std::fmt;



#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
/// # Encoding Quality.
///
/// Squish works with normalized qualities in the range of `(0, 1]`, the same
/// way a browser canvas does, but individual encoders have their own ideas
/// about how things should be.
///
/// This struct provides a consistent interface for everyone to work with.
pub struct Quality(f32);

impl fmt::Display for Quality {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:.2}", self.0)
	}
}

impl TryFrom<f32> for Quality {
	type Error = SquishError;

	#[inline]
	fn try_from(src: f32) -> Result<Self, Self::Error> { Self::new(src) }
}

impl From<Quality> for f32 {
	#[inline]
	fn from(src: Quality) -> Self { src.0 }
}

/// ## Instantiation.
impl Quality {
	/// # Maximum Quality.
	pub const MAX: Self = Self(1.0);

	/// # New.
	///
	/// ## Errors
	///
	/// Returns an error if the value is not finite, or falls outside `(0, 1]`.
	pub fn new(quality: f32) -> Result<Self, SquishError> {
		if quality.is_finite() && 0.0 < quality && quality <= 1.0 {
			Ok(Self(quality))
		}
		else { Err(SquishError::Quality) }
	}
}

/// ## Getters.
impl Quality {
	#[inline]
	#[must_use]
	/// # Raw Value.
	pub const fn get(self) -> f32 { self.0 }

	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped.
	#[must_use]
	/// # JPEG Quality.
	///
	/// JPEG encoders work in whole numbers from `1..=100`. The normalized value
	/// is scaled and rounded to the nearest, so `0.92` becomes `92`.
	pub fn jpeg(self) -> u8 {
		(self.0 * 100.0).round().clamp(1.0, 100.0) as u8
	}

	#[inline]
	#[must_use]
	/// # WebP Quality.
	///
	/// `libwebp` takes a float from `0.0..=100.0`.
	pub fn webp(self) -> f32 { (self.0 * 100.0).clamp(0.0, 100.0) }
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_new() {
		assert!(Quality::new(0.92).is_ok());
		assert!(Quality::new(1.0).is_ok());
		assert!(Quality::new(f32::MIN_POSITIVE).is_ok());

		for bad in [0.0, -0.1, 1.01, f32::NAN, f32::INFINITY] {
			assert_eq!(Quality::new(bad), Err(SquishError::Quality));
		}
	}

	#[test]
	fn t_scales() {
		let q = Quality::new(0.92).unwrap();
		assert_eq!(q.jpeg(), 92);
		assert!((q.webp() - 92.0).abs() < 0.001);

		// Really small values still give JPEG something to work with.
		assert_eq!(Quality::new(0.001).unwrap().jpeg(), 1);
		assert_eq!(Quality::MAX.jpeg(), 100);
	}

	#[test]
	fn t_display() {
		assert_eq!(Quality::new(0.1).unwrap().to_string(), "0.10");
		assert_eq!(Quality::MAX.to_string(), "1.00");
	}
}
