/*!
# `Squish` - JPEG Images.

Decoding uses [`jpeg-decoder`](https://crates.io/crates/jpeg-decoder), while
encoding goes through the baseline encoder of the [`image`](https://crates.io/crates/image)
crate.
*/

use crate::{
	Input,
	Quality,
	SquishError,
	traits::LossyEncoder,
};
use image::{
	codecs::jpeg::JpegEncoder,
	ExtendedColorType,
};

#[cfg(feature = "jpeg")]
use crate::{
	ColorKind,
	traits::{
		Decoder,
		DecoderResult,
	},
};



/// # JPEG Image.
pub(crate) struct ImageJpeg;

#[cfg(feature = "jpeg")]
impl Decoder for ImageJpeg {
	/// # Decode.
	fn decode(mut raw: &[u8]) -> Result<DecoderResult, SquishError> {
		use jpeg_decoder::PixelFormat;
		use rgb::{
			ComponentSlice,
			FromSlice,
		};

		let mut jecoder = jpeg_decoder::Decoder::new(&mut raw);
		let pixels = jecoder.decode()
			.map_err(|_| SquishError::Decode)?;
		let info = jecoder.info().ok_or(SquishError::Decode)?;

		let width: usize = info.width.into();
		let height: usize = info.height.into();
		let size = width.checked_mul(height).and_then(|x| x.checked_mul(4))
			.ok_or(SquishError::Overflow)?;

		let mut out: Vec<u8> = Vec::new();
		out.try_reserve_exact(size).map_err(|_| SquishError::Overflow)?;

		let color = match info.pixel_format {
			// Upscale greyscale to RGBA.
			PixelFormat::L8 => {
				for &px in &pixels { out.extend_from_slice(&[px, px, px, 255]); }
				ColorKind::Grey
			},
			// Upscale RGB to RGBA, keeping an eye out for actual color.
			PixelFormat::RGB24 => {
				let mut any_color = false;
				for px in pixels.as_rgb() {
					any_color = any_color || px.r != px.g || px.r != px.b;
					out.extend_from_slice(px.with_alpha(255).as_slice());
				}

				if any_color { ColorKind::Rgb }
				else { ColorKind::Grey }
			},
			// CMYK and 16-bit lossless aren't supported.
			PixelFormat::CMYK32 | PixelFormat::L16 => return Err(SquishError::Color),
		};

		// Make sure the buffer was actually filled to the right size.
		if out.len() == size { Ok((out, width, height, color)) }
		else { Err(SquishError::Decode) }
	}
}

impl LossyEncoder for ImageJpeg {
	/// # Encode Lossy.
	///
	/// JPEG has no alpha channel, so translucent pixels are composited onto
	/// black first, the same as a browser canvas does on JPEG export.
	/// Greyscale sources are written with a single channel.
	fn encode_lossy(input: &Input, quality: Quality) -> Result<Vec<u8>, SquishError> {
		let width = u32::try_from(input.width()).map_err(|_| SquishError::Overflow)?;
		let height = u32::try_from(input.height()).map_err(|_| SquishError::Overflow)?;

		let (buf, kind) =
			if input.is_greyscale() {
				let buf: Vec<u8> = input.chunks_exact(4)
					.map(|px| flatten(px[0], px[3]))
					.collect();
				(buf, ExtendedColorType::L8)
			}
			else {
				let buf: Vec<u8> = input.chunks_exact(4)
					.flat_map(|px| [
						flatten(px[0], px[3]),
						flatten(px[1], px[3]),
						flatten(px[2], px[3]),
					])
					.collect();
				(buf, ExtendedColorType::Rgb8)
			};

		let mut out = Vec::new();
		JpegEncoder::new_with_quality(&mut out, quality.jpeg())
			.encode(&buf, width, height, kind)
			.map_err(|_| SquishError::Encode)?;

		Ok(out)
	}
}



#[allow(
	clippy::cast_lossless,
	clippy::cast_possible_truncation,
	clippy::integer_division,
)] // Max 255.
#[inline]
/// # Flatten Channel.
///
/// Composite a single color channel onto black, rounding to the nearest.
const fn flatten(c: u8, a: u8) -> u8 {
	match a {
		255 => c,
		0 => 0,
		_ => ((c as u16 * a as u16 + 127) / 255) as u8,
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_flatten() {
		assert_eq!(flatten(200, 255), 200);
		assert_eq!(flatten(200, 0), 0);
		assert_eq!(flatten(255, 128), 128);
		assert_eq!(flatten(100, 51), 20);
	}

	#[test]
	fn t_encode() {
		let pixels: Vec<u8> = (0..64_u8)
			.flat_map(|i| [i * 4, 255 - i * 4, i, 255])
			.collect();
		let input = Input::from_rgba(8, 8, pixels).unwrap();

		let hi = ImageJpeg::encode_lossy(&input, Quality::new(0.92).unwrap()).unwrap();
		assert!(hi.starts_with(&[0xFF, 0xD8, 0xFF]));
		assert!(hi.ends_with(&[0xFF, 0xD9]));

		// Same in, same out.
		let again = ImageJpeg::encode_lossy(&input, Quality::new(0.92).unwrap()).unwrap();
		assert_eq!(hi, again);
	}

	#[cfg(feature = "jpeg")]
	#[test]
	fn t_round_trip() {
		// A greyscale source should come back as grey, at the same size.
		let pixels: Vec<u8> = (0..12_u8 * 7)
			.flat_map(|i| [i, i, i, 255])
			.collect();
		let input = Input::from_rgba(12, 7, pixels).unwrap();
		let raw = ImageJpeg::encode_lossy(&input, Quality::MAX).unwrap();

		let (buf, width, height, color) = ImageJpeg::decode(&raw).unwrap();
		assert_eq!((width, height), (12, 7));
		assert_eq!(buf.len(), 12 * 7 * 4);
		assert_eq!(color, ColorKind::Grey);
	}

	#[cfg(feature = "jpeg")]
	#[test]
	fn t_decode_garbage() {
		assert!(ImageJpeg::decode(&[0xFF, 0xD8, 0xFF, 0x00, 0x01, 0x02]).is_err());
	}
}
