/*!
# `Squish` - Compression Settings.
*/

use crate::{
	DEFAULT_INITIAL_QUALITY,
	DEFAULT_MIN_QUALITY,
	DEFAULT_QUALITY_STEP,
	ImageKind,
	MIN_QUALITY_STEP,
	Quality,
	SquishError,
};
use std::num::NonZeroUsize;



#[derive(Debug, Clone, Copy, PartialEq)]
/// # Compression Settings.
///
/// This holds the byte budget and the quality ladder used by
/// [`encode_to_budget`](crate::encode_to_budget) to get there.
///
/// Values are not checked until use; call [`CompressionSpec::validate`] to
/// check them early.
///
/// ## Examples
///
/// ```
/// use squish_core::{CompressionSpec, ImageKind};
///
/// let spec = CompressionSpec::default()
///     .with_target_size(100 * 1024)
///     .with_min_quality(0.5)
///     .with_kind(ImageKind::Jpeg);
///
/// assert!(spec.validate().is_ok());
/// assert_eq!(spec.max_attempts().unwrap().get(), 10);
/// ```
pub struct CompressionSpec {
	/// # Byte Budget.
	target_size: Option<usize>,

	/// # Starting Quality.
	initial_quality: f32,

	/// # Decrement Per Attempt.
	quality_step: f32,

	/// # Quality Floor.
	min_quality: f32,

	/// # Output Format.
	kind: ImageKind,
}

impl Default for CompressionSpec {
	#[inline]
	fn default() -> Self {
		Self {
			target_size: None,
			initial_quality: DEFAULT_INITIAL_QUALITY,
			quality_step: DEFAULT_QUALITY_STEP,
			min_quality: DEFAULT_MIN_QUALITY,
			kind: ImageKind::Jpeg,
		}
	}
}

/// ## Setters.
impl CompressionSpec {
	#[must_use]
	/// # With Target Size.
	///
	/// Set the byte budget. Without one, images are encoded exactly once at the
	/// initial quality.
	pub const fn with_target_size(mut self, size: usize) -> Self {
		self.target_size = Some(size);
		self
	}

	#[must_use]
	/// # Without Target Size.
	pub const fn without_target_size(mut self) -> Self {
		self.target_size = None;
		self
	}

	#[must_use]
	/// # With Initial Quality.
	pub const fn with_initial_quality(mut self, quality: f32) -> Self {
		self.initial_quality = quality;
		self
	}

	#[must_use]
	/// # With Quality Step.
	pub const fn with_quality_step(mut self, step: f32) -> Self {
		self.quality_step = step;
		self
	}

	#[must_use]
	/// # With Minimum Quality.
	pub const fn with_min_quality(mut self, quality: f32) -> Self {
		self.min_quality = quality;
		self
	}

	#[must_use]
	/// # With Output Kind.
	pub const fn with_kind(mut self, kind: ImageKind) -> Self {
		self.kind = kind;
		self
	}
}

/// ## Getters.
impl CompressionSpec {
	#[inline]
	#[must_use]
	/// # Target Size.
	pub const fn target_size(&self) -> Option<usize> { self.target_size }

	#[inline]
	#[must_use]
	/// # Initial Quality.
	pub const fn initial_quality(&self) -> f32 { self.initial_quality }

	#[inline]
	#[must_use]
	/// # Quality Step.
	pub const fn quality_step(&self) -> f32 { self.quality_step }

	#[inline]
	#[must_use]
	/// # Minimum Quality.
	pub const fn min_quality(&self) -> f32 { self.min_quality }

	#[inline]
	#[must_use]
	/// # Output Kind.
	pub const fn kind(&self) -> ImageKind { self.kind }
}

/// ## Validation.
impl CompressionSpec {
	/// # Validate.
	///
	/// ## Errors
	///
	/// This will return an error if either quality falls outside `(0, 1]`, if
	/// the floor is higher than the initial quality, if the step is not a
	/// number of at least [`MIN_QUALITY_STEP`], or if the target size is zero.
	pub fn validate(&self) -> Result<(), SquishError> {
		self.checked().map(|_| ())
	}

	/// # Maximum Attempts.
	///
	/// Return the upper bound on the number of encoding passes this
	/// configuration can require: `⌈(initial − min) / step⌉ + 1`.
	///
	/// ## Errors
	///
	/// This will return an error if the settings are invalid.
	pub fn max_attempts(&self) -> Result<NonZeroUsize, SquishError> {
		let (top, bottom, step, _) = self.checked()?;
		Ok(max_attempts(top, bottom, step))
	}

	/// # Checked Values.
	///
	/// Validate and return the starting quality, floor, step, and target, in
	/// that order.
	pub(crate) fn checked(&self)
	-> Result<(Quality, Quality, f32, Option<NonZeroUsize>), SquishError> {
		let initial = Quality::new(self.initial_quality)?;
		let bottom = Quality::new(self.min_quality)?;
		if bottom > initial { return Err(SquishError::QualityRange); }

		if ! self.quality_step.is_finite() || self.quality_step < MIN_QUALITY_STEP {
			return Err(SquishError::QualityStep);
		}

		let target = match self.target_size {
			Some(size) => Some(NonZeroUsize::new(size).ok_or(SquishError::TargetSize)?),
			None => None,
		};

		// The floor can't be higher than the start at this point, but the
		// ladder is defined to start at the larger of the two all the same.
		let top =
			if initial < bottom { bottom }
			else { initial };

		Ok((top, bottom, self.quality_step, target))
	}
}



#[allow(
	clippy::cast_possible_truncation,
	clippy::cast_precision_loss,
	clippy::cast_sign_loss,
)] // The float is positive and the cast saturates.
/// # Maximum Attempts.
///
/// Shared between the public getter and the quality ladder.
pub(crate) fn max_attempts(top: Quality, bottom: Quality, step: f32) -> NonZeroUsize {
	let span = f64::from(top.get()) - f64::from(bottom.get());
	let rungs = (span / f64::from(step)).ceil().max(0.0) as usize;
	NonZeroUsize::MIN.saturating_add(rungs)
}
