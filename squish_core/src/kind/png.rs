/*!
# `Squish` - PNG Images.
*/

use crate::{
	ColorKind,
	SquishError,
	traits::{
		Decoder,
		DecoderResult,
	},
};



/// # PNG Image.
pub(crate) struct ImagePng;

impl Decoder for ImagePng {
	/// # Decode.
	fn decode(raw: &[u8]) -> Result<DecoderResult, SquishError> {
		let img = lodepng::decode32(raw).map_err(|_| SquishError::Decode)?;

		let size = img.width.checked_mul(img.height)
			.and_then(|x| x.checked_mul(4))
			.ok_or(SquishError::Overflow)?;

		let out: Vec<u8> = img.buffer.iter()
			.flat_map(|px| [px.r, px.g, px.b, px.a])
			.collect();

		// Make sure the buffer was actually filled to the right size.
		if out.len() != size { return Err(SquishError::Decode); }

		let color = ColorKind::from_rgba(&out);
		Ok((out, img.width, img.height, color))
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_decode() {
		let pixels: Vec<u8> = [[255, 0, 0, 255], [0, 0, 0, 0], [7, 7, 7, 255]]
			.iter()
			.cycle()
			.take(6)
			.flatten()
			.copied()
			.collect();
		let raw = lodepng::encode32(&pixels, 3, 2).unwrap();

		let (buf, width, height, color) = ImagePng::decode(&raw).unwrap();
		assert_eq!((width, height), (3, 2));
		assert_eq!(buf, pixels);
		assert_eq!(color, ColorKind::Rgba);
	}

	#[test]
	fn t_decode_garbage() {
		let raw = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n', 0, 0, 0, 0, 0];
		assert_eq!(ImagePng::decode(&raw), Err(SquishError::Decode));
	}
}
