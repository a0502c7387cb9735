/*!
# `Squish` - Input Image
*/

use crate::{
	ColorKind,
	ImageKind,
	SquishError,
};
use std::{
	fmt,
	num::{
		NonZeroU32,
		NonZeroUsize,
	},
	ops::Deref,
};



#[derive(Clone, PartialEq, Eq)]
/// # Input Image.
///
/// This struct holds _decoded_ image data in the form of a contiguous RGBA
/// (4-byte) slice. Once built, it is never modified; resizing returns a new
/// instance.
///
/// Both `AsRef<[u8]>` and `Deref` traits are implemented to provide raw access
/// to the pixel slice. Other attributes, like dimension and color information,
/// have dedicated getters.
///
/// Instantiation from a file uses `TryFrom<&[u8]>`, which expects the raw
/// (undecoded) file bytes. Only JPEG and PNG sources can be decoded. Already
/// decoded pixels can be used via [`Input::from_rgba`].
///
/// ## Examples
///
/// ```no_run
/// use squish_core::Input;
///
/// let raw = std::fs::read("/path/to/my.jpg").unwrap();
/// let input = Input::try_from(raw.as_slice()).unwrap();
/// ```
pub struct Input {
	/// # Image Pixels.
	pixels: Vec<u8>,

	/// # Image Width.
	width: NonZeroU32,

	/// # Image Height.
	height: NonZeroU32,

	/// # Color Kind.
	color: ColorKind,

	/// # Source Kind.
	kind: Option<ImageKind>,

	/// # Original File Size.
	size: Option<NonZeroUsize>,
}

impl AsRef<[u8]> for Input {
	#[inline]
	fn as_ref(&self) -> &[u8] { self }
}

impl fmt::Debug for Input {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Input")
		.field("width", &self.width)
		.field("height", &self.height)
		.field("color", &self.color)
		.field("kind", &self.kind)
		.field("size", &self.size)
		.finish_non_exhaustive()
	}
}

impl Deref for Input {
	type Target = [u8];

	#[inline]
	fn deref(&self) -> &Self::Target { &self.pixels }
}

impl TryFrom<&[u8]> for Input {
	type Error = SquishError;

	fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
		let kind = ImageKind::try_from(src)?;
		let (buf, width, height, color) = kind.decode(src)?;

		// Decoders should never succeed with nothing, but just in case…
		let width = u32::try_from(width).map_err(|_| SquishError::Overflow)
			.and_then(|w| NonZeroU32::new(w).ok_or(SquishError::Image))?;
		let height = u32::try_from(height).map_err(|_| SquishError::Overflow)
			.and_then(|h| NonZeroU32::new(h).ok_or(SquishError::Image))?;

		Ok(Self {
			pixels: buf,
			width,
			height,
			color,
			kind: Some(kind),
			size: NonZeroUsize::new(src.len()),
		})
	}
}

/// ## Instantiation.
impl Input {
	/// # From RGBA.
	///
	/// Build an image from an already-decoded RGBA buffer, four bytes per
	/// pixel, row by row.
	///
	/// ## Errors
	///
	/// This will return an error if either dimension is zero, or if the
	/// buffer length does not match the dimensions.
	pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SquishError> {
		let width = NonZeroU32::new(width).ok_or(SquishError::Image)?;
		let height = NonZeroU32::new(height).ok_or(SquishError::Image)?;

		let size = usize::try_from(width.get()).ok()
			.zip(usize::try_from(height.get()).ok())
			.and_then(|(w, h)| w.checked_mul(h))
			.and_then(|x| x.checked_mul(4))
			.ok_or(SquishError::Overflow)?;
		if pixels.len() != size { return Err(SquishError::Overflow); }

		let color = ColorKind::from_rgba(&pixels);
		Ok(Self {
			pixels,
			width,
			height,
			color,
			kind: None,
			size: None,
		})
	}
}

/// ## Getters.
impl Input {
	#[inline]
	#[must_use]
	/// # Color Kind.
	///
	/// This returns a [`ColorKind`] variant representing the channels actually
	/// used by the image.
	pub const fn color(&self) -> ColorKind { self.color }

	#[inline]
	#[must_use]
	/// # Has Alpha?
	///
	/// This returns true if any pixel has an alpha value other than `255`.
	pub const fn has_alpha(&self) -> bool { self.color.has_alpha() }

	#[inline]
	#[must_use]
	/// # Height.
	pub const fn height(&self) -> usize { self.height.get() as usize }

	#[inline]
	#[must_use]
	/// # Is Greyscale?
	///
	/// This returns true if the R, G, and B values of each individual pixel
	/// are equal. For example, `(1, 1, 1)` is greyscale, while `(1, 2, 1)` is
	/// not.
	pub const fn is_greyscale(&self) -> bool { self.color.is_greyscale() }

	#[inline]
	#[must_use]
	/// # Source Kind.
	///
	/// This returns the source image format, or `None` if the image was built
	/// from raw pixels (or resized).
	pub const fn kind(&self) -> Option<ImageKind> { self.kind }

	#[inline]
	#[must_use]
	/// # Original File Size.
	///
	/// This returns the size of the original raw image file, if any.
	pub const fn size(&self) -> Option<NonZeroUsize> { self.size }

	#[inline]
	#[must_use]
	/// # Take Pixels.
	///
	/// Consume the instance, stealing the pixels as an owned buffer.
	pub fn take_pixels(self) -> Vec<u8> { self.pixels }

	#[inline]
	#[must_use]
	/// # Width.
	pub const fn width(&self) -> usize { self.width.get() as usize }
}

/// ## Crate Getters.
impl Input {
	#[inline]
	/// # Dimensions.
	pub(crate) const fn dimensions(&self) -> (NonZeroU32, NonZeroU32) {
		(self.width, self.height)
	}

	#[cfg(feature = "webp")]
	#[inline]
	/// # Height (`i32`).
	///
	/// `libwebp` wants its dimensions signed.
	///
	/// ## Errors
	///
	/// This will return an error if the result does not fit within the `i32`
	/// range.
	pub(crate) fn height_i32(&self) -> Result<i32, SquishError> {
		i32::try_from(self.height.get()).map_err(|_| SquishError::Overflow)
	}

	#[cfg(feature = "webp")]
	#[inline]
	/// # Width (`i32`).
	///
	/// ## Errors
	///
	/// This will return an error if the result does not fit within the `i32`
	/// range.
	pub(crate) fn width_i32(&self) -> Result<i32, SquishError> {
		i32::try_from(self.width.get()).map_err(|_| SquishError::Overflow)
	}
}
