/*!
# `Squish`: `WebP` Handling

This uses [`libwebp-sys2`](https://crates.io/crates/libwebp-sys2) bindings to Google's
`libwebp`. Operations should be equivalent to the corresponding `cwebp` output.
*/

use crate::{
	Input,
	Quality,
	SquishError,
	traits::LossyEncoder,
};
use libwebp_sys::{
	WEBP_MAX_DIMENSION,
	WebPConfig,
	WebPConfigInit,
	WebPEncode,
	WebPMemoryWrite,
	WebPMemoryWriter,
	WebPMemoryWriterClear,
	WebPMemoryWriterInit,
	WebPPicture,
	WebPPictureFree,
	WebPPictureImportRGBA,
	WebPPictureInit,
	WebPValidateConfig,
};
use std::os::raw::c_int;



/// # `WebP` Image.
pub(crate) struct ImageWebp;

impl LossyEncoder for ImageWebp {
	#[allow(unsafe_code)]
	/// # Encode Lossy.
	fn encode_lossy(input: &Input, quality: Quality) -> Result<Vec<u8>, SquishError> {
		// Setup.
		let config = make_config(quality)?;
		let mut picture = LibWebpPicture::try_from(input)?;
		let writer = LibWebpWriter::from(&mut picture.0);

		// Encode!
		maybe_die(unsafe { WebPEncode(&config, &mut picture.0) })?;

		// Copy the output before the writer frees it.
		let out =
			if writer.0.mem.is_null() || writer.0.size == 0 { Vec::new() }
			else {
				unsafe { std::slice::from_raw_parts(writer.0.mem, writer.0.size) }
					.to_vec()
			};

		// Clean-up.
		drop(picture);
		drop(writer);

		Ok(out)
	}
}



/// # Picture Wrapper.
///
/// This `C` struct is Rust-wrapped to help with garbage cleanup, but while
/// we're here, may as well provide initialization code too.
struct LibWebpPicture(WebPPicture);

impl TryFrom<&Input> for LibWebpPicture {
	type Error = SquishError;

	#[allow(unsafe_code)]
	fn try_from(img: &Input) -> Result<Self, Self::Error> {
		// Check the source dimensions.
		let width = img.width_i32()?;
		let height = img.height_i32()?;
		if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
			return Err(SquishError::Overflow);
		}

		// The buffer should be exactly four bytes per pixel.
		let raw: &[u8] = img;
		let expected = usize::try_from(width).ok()
			.zip(usize::try_from(height).ok())
			.and_then(|(w, h)| w.checked_mul(h))
			.and_then(|x| x.checked_mul(4))
			.ok_or(SquishError::Overflow)?;
		if expected != raw.len() { return Err(SquishError::Encode); }

		// Set up the picture struct.
		let mut out = Self(unsafe { std::mem::zeroed() });
		maybe_die(unsafe { WebPPictureInit(&mut out.0) })?;

		out.0.use_argb = 1;
		out.0.width = width;
		out.0.height = height;
		out.0.argb_stride = width; // Stride always matches width for us.

		// Fill the pixel buffers.
		maybe_die(unsafe {
			WebPPictureImportRGBA(
				&mut out.0,
				raw.as_ptr().cast(), // This doesn't actually mutate.
				width << 2,
			)
		})?;

		// A few more sanity checks.
		if out.0.use_argb != 1 || ! out.0.y.is_null() || out.0.argb.is_null() {
			return Err(SquishError::Encode);
		}

		Ok(out)
	}
}

impl Drop for LibWebpPicture {
	#[allow(unsafe_code)]
	#[inline]
	fn drop(&mut self) { unsafe { WebPPictureFree(&mut self.0); } }
}



/// # Writer Wrapper.
///
/// The writer is boxed so its address stays put while `libwebp` holds a
/// pointer to it.
struct LibWebpWriter(Box<WebPMemoryWriter>);

impl From<&mut WebPPicture> for LibWebpWriter {
	#[allow(unsafe_code)]
	fn from(picture: &mut WebPPicture) -> Self {
		// A Writer wrapper function. (It has to be "safe".)
		extern "C" fn on_write(
			data: *const u8,
			data_size: usize,
			picture: *const WebPPicture,
		) -> c_int {
			unsafe { WebPMemoryWrite(data, data_size, picture) }
		}

		// Hook in the writer.
		let mut writer = Self(Box::new(unsafe { std::mem::zeroed() }));
		unsafe { WebPMemoryWriterInit(&mut *writer.0); }

		picture.writer = Some(on_write);
		picture.custom_ptr = std::ptr::addr_of_mut!(*writer.0).cast::<std::ffi::c_void>();

		writer
	}
}

impl Drop for LibWebpWriter {
	#[allow(unsafe_code)]
	#[inline]
	fn drop(&mut self) { unsafe { WebPMemoryWriterClear(&mut *self.0); } }
}



#[allow(unsafe_code)]
/// # Make Config.
///
/// This generates a lossy encoder configuration profile, roughly equivalent
/// to:
///
/// ```bash
/// cwebp -m 4 -q {QUALITY}
/// ```
fn make_config(quality: Quality) -> Result<WebPConfig, SquishError> {
	let mut config: WebPConfig = unsafe { std::mem::zeroed() };
	maybe_die(unsafe { WebPConfigInit(&mut config) })?;

	config.quality = quality.webp();
	config.method = 4;

	maybe_die(unsafe { WebPValidateConfig(&config) })?;
	Ok(config)
}

#[inline]
/// # Verify Encoder Status.
///
/// This converts unsuccessful `libwebp` function results into proper Rust
/// errors.
const fn maybe_die(res: c_int) -> Result<(), SquishError> {
	if 0 == res { Err(SquishError::Encode) }
	else { Ok(()) }
}
