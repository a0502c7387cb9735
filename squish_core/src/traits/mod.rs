/*!
# `Squish` - Traits.
*/

use crate::{
	ColorKind,
	Input,
	Quality,
	SquishError,
};



/// # The result type for `Decoder::decode`.
pub(crate) type DecoderResult = (Vec<u8>, usize, usize, ColorKind);

/// # Decoder.
///
/// This is implemented for image formats capable of decoding raw image data
/// into RGBA pixels.
pub(crate) trait Decoder {
	/// # Decode.
	///
	/// Decode the bytes from a raw image file into a contiguous `u8` buffer
	/// using 4 bytes (RGBA) per pixel.
	///
	/// RGB, greyscale, etc., should be upscaled accordingly.
	///
	/// ## Errors
	///
	/// Return any errors encountered during decoding.
	fn decode(raw: &[u8]) -> Result<DecoderResult, SquishError>;
}

/// # Lossy Encoder.
///
/// This is implemented for the individual image formats capable of encoding
/// RGBA pixels into a raw image at a given quality.
pub(crate) trait LossyEncoder {
	/// # Encode Lossy.
	///
	/// ## Errors
	///
	/// Return any errors encountered during encoding.
	fn encode_lossy(input: &Input, quality: Quality) -> Result<Vec<u8>, SquishError>;
}

/// # Encoder.
///
/// This is the seam the budget loop works through: anything that can turn an
/// [`Input`] into encoded bytes at a given [`Quality`].
///
/// [`ImageKind`](crate::ImageKind) implements it for the built-in formats, but
/// custom implementations are welcome so long as they are deterministic. The
/// same input at the same quality should always produce the same bytes, and
/// lower qualities should not (usually) produce bigger files.
///
/// ## Examples
///
/// ```
/// use squish_core::{Encoder, Input, Quality, SquishError};
///
/// /// # Pretend to encode, producing one byte per percent of quality.
/// struct Counter;
///
/// impl Encoder for Counter {
///     fn encode(&self, _input: &Input, quality: Quality)
///     -> Result<Vec<u8>, SquishError> {
///         Ok(vec![0; usize::from(quality.jpeg())])
///     }
/// }
///
/// let input = Input::from_rgba(1, 1, vec![0, 0, 0, 255]).unwrap();
/// let out = Counter.encode(&input, Quality::MAX).unwrap();
/// assert_eq!(out.len(), 100);
/// ```
pub trait Encoder {
	/// # Encode.
	///
	/// Encode the image at the given quality, returning the raw file bytes.
	///
	/// An empty return value is treated as a failure by the budget loop.
	///
	/// ## Errors
	///
	/// Return any errors encountered during encoding.
	fn encode(&self, input: &Input, quality: Quality) -> Result<Vec<u8>, SquishError>;
}
