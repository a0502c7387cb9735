/*!
# `Squish` - Resizing.
*/

use crate::{
	Input,
	MAX_PIXELS,
	SquishError,
};
use image::{
	imageops::{
		self,
		FilterType,
	},
	ImageBuffer,
	Rgba,
};
use std::borrow::Cow;



#[derive(Debug, Default, Clone, Copy, Eq, Hash, PartialEq)]
/// # Resize Settings.
///
/// This holds the (optional) target width and height for an image.
///
/// | Width | Height | Result |
/// | ----- | ------ | ------ |
/// | None | None | Original dimensions. |
/// | Some | None | Height is scaled to preserve the aspect ratio. |
/// | None | Some | Width is scaled to preserve the aspect ratio. |
/// | Some | Some | Used as-is, even if that distorts the image. |
///
/// Targets of zero are invalid and will fail with
/// [`SquishError::TargetWidth`] or [`SquishError::TargetHeight`] when used.
///
/// ## Examples
///
/// ```
/// use squish_core::ResizeSpec;
///
/// let spec = ResizeSpec::default().with_width(400);
/// assert_eq!(spec.dimensions(800, 600), Ok((400, 300)));
/// ```
pub struct ResizeSpec {
	/// # Target Width.
	width: Option<u32>,

	/// # Target Height.
	height: Option<u32>,
}

/// ## Instantiation.
impl ResizeSpec {
	#[must_use]
	/// # New.
	pub const fn new(width: Option<u32>, height: Option<u32>) -> Self {
		Self { width, height }
	}

	#[must_use]
	/// # With Width.
	pub const fn with_width(mut self, width: u32) -> Self {
		self.width = Some(width);
		self
	}

	#[must_use]
	/// # With Height.
	pub const fn with_height(mut self, height: u32) -> Self {
		self.height = Some(height);
		self
	}
}

/// ## Getters.
impl ResizeSpec {
	#[inline]
	#[must_use]
	/// # Target Width.
	pub const fn width(&self) -> Option<u32> { self.width }

	#[inline]
	#[must_use]
	/// # Target Height.
	pub const fn height(&self) -> Option<u32> { self.height }

	#[inline]
	#[must_use]
	/// # Is Passthrough?
	///
	/// Returns `true` if neither dimension is set.
	pub const fn is_passthrough(&self) -> bool {
		self.width.is_none() && self.height.is_none()
	}

	/// # Output Dimensions.
	///
	/// Compute the output width and height for a source of the given size.
	/// A derived dimension is rounded to the nearest pixel, but never below
	/// one.
	///
	/// ## Errors
	///
	/// This will return an error if a target is zero, the source has a zero
	/// dimension, or the result would exceed [`MAX_PIXELS`].
	pub fn dimensions(&self, width: u32, height: u32) -> Result<(u32, u32), SquishError> {
		if self.width == Some(0) { return Err(SquishError::TargetWidth); }
		if self.height == Some(0) { return Err(SquishError::TargetHeight); }
		if width == 0 || height == 0 { return Err(SquishError::Image); }

		let out = match (self.width, self.height) {
			(None, None) => return Ok((width, height)),
			(Some(w), None) => (w, scale(height, w, width)?),
			(None, Some(h)) => (scale(width, h, height)?, h),
			(Some(w), Some(h)) => (w, h),
		};

		if u64::from(out.0) * u64::from(out.1) <= MAX_PIXELS { Ok(out) }
		else { Err(SquishError::Overflow) }
	}
}



impl Input {
	/// # Resize.
	///
	/// Scale the image to the dimensions described by `spec` using a Lanczos3
	/// filter.
	///
	/// If the dimensions would not change, the original is borrowed as-is
	/// rather than re-rasterized.
	///
	/// ## Errors
	///
	/// See [`ResizeSpec::dimensions`].
	pub fn resize(&self, spec: ResizeSpec) -> Result<Cow<'_, Self>, SquishError> {
		let (src_w, src_h) = self.dimensions();
		let (src_w, src_h) = (src_w.get(), src_h.get());
		let (width, height) = spec.dimensions(src_w, src_h)?;

		if width == src_w && height == src_h { return Ok(Cow::Borrowed(self)); }

		log::debug!("Resizing {src_w}x{src_h} to {width}x{height}.");

		let buf = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(src_w, src_h, &**self)
			.ok_or(SquishError::Image)?;
		let out = imageops::resize(&buf, width, height, FilterType::Lanczos3);

		Self::from_rgba(width, height, out.into_raw()).map(Cow::Owned)
	}
}



#[allow(
	clippy::cast_possible_truncation,
	clippy::cast_sign_loss,
)] // Range is checked.
/// # Scale Dimension.
///
/// Return `round(side × target / base)`, raised to at least one.
fn scale(side: u32, target: u32, base: u32) -> Result<u32, SquishError> {
	let out = (f64::from(side) * f64::from(target) / f64::from(base)).round();
	if out <= f64::from(u32::MAX) { Ok((out as u32).max(1)) }
	else { Err(SquishError::Overflow) }
}



#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn t_dimensions() {
		let spec = ResizeSpec::default();
		assert!(spec.is_passthrough());
		assert_eq!(spec.dimensions(800, 600), Ok((800, 600)));

		assert_eq!(spec.with_width(400).dimensions(800, 600), Ok((400, 300)));
		assert_eq!(spec.with_height(300).dimensions(800, 600), Ok((400, 300)));
		assert_eq!(spec.with_width(333).dimensions(1000, 1000), Ok((333, 333)));

		// 600 * 401 / 800 = 300.75
		assert_eq!(spec.with_width(401).dimensions(800, 600), Ok((401, 301)));

		// Both given means both are used.
		assert_eq!(
			spec.with_width(100).with_height(100).dimensions(800, 600),
			Ok((100, 100)),
		);

		// Really skinny images still get a pixel.
		assert_eq!(spec.with_width(10).dimensions(10_000, 1), Ok((10, 1)));
	}

	#[test]
	fn t_dimensions_invalid() {
		let spec = ResizeSpec::default();
		assert_eq!(spec.with_width(0).dimensions(800, 600), Err(SquishError::TargetWidth));
		assert_eq!(spec.with_height(0).dimensions(800, 600), Err(SquishError::TargetHeight));
		assert_eq!(spec.with_width(10).dimensions(0, 600), Err(SquishError::Image));
		assert_eq!(spec.dimensions(800, 0), Err(SquishError::Image));
		assert_eq!(
			spec.with_width(100_000).dimensions(1, 100_000),
			Err(SquishError::Overflow),
		);
		assert!(spec.with_width(0).dimensions(800, 600).unwrap_err().is_config());
	}

	#[test]
	fn t_resize() {
		let pixels: Vec<u8> = (0..80_u32 * 60)
			.flat_map(|i| [(i % 256) as u8, 50, 200, 255])
			.collect();
		let input = Input::from_rgba(80, 60, pixels).unwrap();

		let out = input.resize(ResizeSpec::default().with_width(40)).unwrap();
		assert!(matches!(out, Cow::Owned(_)));
		assert_eq!(out.width(), 40);
		assert_eq!(out.height(), 30);
		assert_eq!(out.len(), 40 * 30 * 4);
		assert!(! out.has_alpha());

		// No change, no copy.
		let out = input.resize(ResizeSpec::default()).unwrap();
		assert!(matches!(out, Cow::Borrowed(_)));
		let out = input.resize(ResizeSpec::new(Some(80), Some(60))).unwrap();
		assert!(matches!(out, Cow::Borrowed(_)));

		assert_eq!(
			input.resize(ResizeSpec::default().with_width(0)).map(|_| ()),
			Err(SquishError::TargetWidth),
		);
	}

	proptest! {
		#[test]
		fn t_ratio(
			src_w in 1_u32..=4000,
			src_h in 1_u32..=4000,
			target in 1_u32..=4000,
		) {
			let exact = f64::from(src_h) * f64::from(target) / f64::from(src_w);
			match ResizeSpec::default().with_width(target).dimensions(src_w, src_h) {
				Ok((w, h)) => {
					prop_assert_eq!(w, target);
					prop_assert!(1 <= h);
					prop_assert!((f64::from(h) - exact).abs() <= 1.0);
				},
				Err(e) => {
					prop_assert_eq!(e, SquishError::Overflow);
					prop_assert!(f64::from(target) * exact.round() > MAX_PIXELS as f64);
				},
			}
		}
	}
}
