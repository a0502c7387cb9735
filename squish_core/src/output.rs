/*!
# `Squish` - Encoded Output.
*/

use crate::Quality;
use std::{
	num::NonZeroUsize,
	ops::Deref,
};



#[derive(Debug, Clone, PartialEq)]
/// # Output Image.
///
/// This struct holds the raw file data for an encoded image along with the
/// quality used to create it and the budget it was measured against.
///
/// Once returned, the data is immutable. Both `AsRef<[u8]>` and `Deref` are
/// implemented to provide raw access to it.
pub struct Output {
	data: Box<[u8]>,
	quality: Quality,
	target: Option<NonZeroUsize>,
	attempts: NonZeroUsize,
}

impl AsRef<[u8]> for Output {
	#[inline]
	fn as_ref(&self) -> &[u8] { self }
}

impl Deref for Output {
	type Target = [u8];

	#[inline]
	fn deref(&self) -> &Self::Target { &self.data }
}

impl From<Output> for Vec<u8> {
	#[inline]
	fn from(src: Output) -> Self { src.data.into_vec() }
}

/// ## Instantiation.
impl Output {
	#[inline]
	/// # New.
	///
	/// The data is expected to be non-empty; the budget loop never hands out
	/// anything else.
	pub(crate) fn new(
		data: Vec<u8>,
		quality: Quality,
		target: Option<NonZeroUsize>,
		attempts: NonZeroUsize,
	) -> Self {
		debug_assert!(! data.is_empty(), "BUG: empty output.");
		Self {
			data: data.into_boxed_slice(),
			quality,
			target,
			attempts,
		}
	}
}

/// ## Getters.
impl Output {
	#[inline]
	#[must_use]
	/// # Attempts.
	///
	/// The number of encoding passes it took to arrive at this output,
	/// including this one.
	pub const fn attempts(&self) -> NonZeroUsize { self.attempts }

	#[inline]
	#[must_use]
	/// # Budget Met?
	///
	/// Returns `true` if the output fits within the requested byte budget, or
	/// if there was no budget to begin with.
	///
	/// A `false` here means the quality floor was reached without getting
	/// small enough; the output is then the best effort at that floor.
	pub fn met(&self) -> bool {
		self.target.map_or(true, |t| self.data.len() <= t.get())
	}

	#[inline]
	#[must_use]
	/// # Quality.
	///
	/// Return the quality used to encode the data.
	pub const fn quality(&self) -> Quality { self.quality }

	#[inline]
	#[must_use]
	/// # Size.
	///
	/// Return the byte size of the image.
	pub fn size(&self) -> usize { self.data.len() }

	#[inline]
	#[must_use]
	/// # Target Size.
	///
	/// Return the byte budget the output was measured against, if any.
	pub const fn target_size(&self) -> Option<NonZeroUsize> { self.target }
}
