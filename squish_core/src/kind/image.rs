/*!
# `Squish` - Image Kind
*/

use crate::{
	ImageJpeg,
	Input,
	Quality,
	SquishError,
	traits::{
		DecoderResult,
		Encoder,
		LossyEncoder,
	},
};
use std::fmt;

#[cfg(feature = "png")]  use crate::ImagePng;
#[cfg(feature = "webp")] use crate::ImageWebp;



/// # PNG Signature.
const MAGIC_PNG: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// # JPEG SOI (Plus First Marker Prefix).
const MAGIC_JPEG: [u8; 3] = [0xFF, 0xD8, 0xFF];



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Image Kind.
///
/// This identifies both the format of a source file and the format an
/// [`Output`](crate::Output) should be encoded to.
///
/// JPEG and PNG sources can be decoded (given the corresponding crate
/// features); JPEG and `WebP` can be encoded.
pub enum ImageKind {
	/// # JPEG.
	Jpeg,

	/// # PNG.
	Png,

	/// # WebP.
	Webp,
}

impl AsRef<str> for ImageKind {
	#[inline]
	fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for ImageKind {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl TryFrom<&[u8]> for ImageKind {
	type Error = SquishError;

	/// # From Raw Bytes.
	///
	/// This examines the first few bytes of the raw image file to see what
	/// magic its headers contain.
	fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
		if src.starts_with(&MAGIC_PNG) { Ok(Self::Png) }
		else if 12 <= src.len() && src[..4] == *b"RIFF" && src[8..12] == *b"WEBP" {
			Ok(Self::Webp)
		}
		// JPEG is fussier in the middle, but the start is always the same.
		else if 4 <= src.len() && src.starts_with(&MAGIC_JPEG) { Ok(Self::Jpeg) }
		else { Err(SquishError::Image) }
	}
}

/// ## Information.
impl ImageKind {
	#[inline]
	#[must_use]
	/// # Can Decode?
	///
	/// Returns `true` if decoding is supported for this image type.
	pub const fn can_decode(self) -> bool {
		match self {
			Self::Jpeg => cfg!(feature = "jpeg"),
			Self::Png => cfg!(feature = "png"),
			Self::Webp => false,
		}
	}

	#[inline]
	#[must_use]
	/// # Can Encode?
	///
	/// Returns `true` if encoding is supported for this image type.
	pub const fn can_encode(self) -> bool {
		match self {
			Self::Jpeg => true,
			Self::Png => false,
			Self::Webp => cfg!(feature = "webp"),
		}
	}
}

/// ## Getters.
impl ImageKind {
	#[must_use]
	/// # As String Slice.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Jpeg => "JPEG",
			Self::Png => "PNG",
			Self::Webp => "WebP",
		}
	}

	#[must_use]
	/// # File Extension.
	pub const fn extension(self) -> &'static str {
		match self {
			Self::Jpeg => "jpg",
			Self::Png => "png",
			Self::Webp => "webp",
		}
	}

	#[must_use]
	/// # Media Type.
	pub const fn mime(self) -> &'static str {
		match self {
			Self::Jpeg => "image/jpeg",
			Self::Png => "image/png",
			Self::Webp => "image/webp",
		}
	}
}

/// ## Decoding.
impl ImageKind {
	/// # Decode.
	///
	/// Decode a raw image of this kind into RGBA pixels (and width, height,
	/// and color type).
	///
	/// ## Errors
	///
	/// This will bubble up any decoder errors encountered, including cases
	/// where decoding is unsupported for the format.
	pub(crate) fn decode(self, raw: &[u8]) -> Result<DecoderResult, SquishError> {
		#[cfg(any(feature = "jpeg", feature = "png"))]
		use crate::traits::Decoder;

		match self {
			#[cfg(feature = "jpeg")] Self::Jpeg => ImageJpeg::decode(raw),
			#[cfg(feature = "png")]  Self::Png => ImagePng::decode(raw),
			_ => Err(SquishError::ImageDecode(self)),
		}
	}
}

impl Encoder for ImageKind {
	/// # Encode.
	///
	/// Encode the image in this format at the given quality. Non-empty output
	/// is checked for the right magic before being handed back.
	///
	/// ## Errors
	///
	/// This will bubble up any encoder errors encountered, including cases
	/// where encoding is unsupported for the format.
	fn encode(&self, input: &Input, quality: Quality) -> Result<Vec<u8>, SquishError> {
		let out = match self {
			Self::Jpeg => ImageJpeg::encode_lossy(input, quality)?,
			#[cfg(feature = "webp")] Self::Webp => ImageWebp::encode_lossy(input, quality)?,
			_ => return Err(SquishError::ImageEncode(*self)),
		};

		// Emptiness is the budget loop's call to make.
		if out.is_empty() || Self::try_from(out.as_slice()) == Ok(*self) { Ok(out) }
		else { Err(SquishError::Encode) }
	}
}
