/*!
# `Squish` - Library

This crate resizes decoded images and re-encodes them at steadily decreasing
qualities until the output fits within a byte budget, or the quality floor is
reached, whichever comes first.

## Examples

```no_run
use squish_core::{
	CompressionSpec,
	ResizeSpec,
};

let raw = std::fs::read("/path/to/photo.jpg").unwrap();
let out = squish_core::squish(
	&raw,
	ResizeSpec::default().with_width(1200),
	CompressionSpec::default().with_target_size(250 * 1024),
).unwrap();

println!("{} bytes at quality {}; budget met: {}", out.size(), out.quality(), out.met());
```
*/

#![warn(clippy::filetype_is_file)]
#![warn(clippy::integer_division)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::suboptimal_flops)]
#![warn(clippy::unneeded_field_pattern)]
#![warn(macro_use_extern_crate)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(non_ascii_idents)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_extern_crates)]
#![warn(unused_import_braces)]

#![allow(clippy::module_name_repetitions)]



mod budget;
mod compression;
mod error;
mod input;
mod kind;
mod ladder;
mod output;
mod quality;
mod resize;
pub(crate) mod traits;

pub use budget::{
	BudgetIter,
	encode_to_budget,
	encode_to_budget_until,
};
pub use compression::CompressionSpec;
pub use error::SquishError;
pub use input::Input;
pub use kind::{
	color::ColorKind,
	image::ImageKind,
};
pub use output::Output;
pub use quality::Quality;
pub use resize::ResizeSpec;
pub use traits::Encoder;

pub(crate) use kind::jpeg::ImageJpeg;
#[cfg(feature = "png")] pub(crate) use kind::png::ImagePng;
#[cfg(feature = "webp")] pub(crate) use kind::webp::ImageWebp;



/// # Default Initial Quality.
pub const DEFAULT_INITIAL_QUALITY: f32 = 0.92;

/// # Default Quality Floor.
pub const DEFAULT_MIN_QUALITY: f32 = 0.1;

/// # Default Quality Step.
pub const DEFAULT_QUALITY_STEP: f32 = 0.05;

/// # Minimum Quality Step.
///
/// Smaller steps would take thousands of near-identical passes to cover the
/// range, and below `f32` resolution would stop moving altogether.
pub const MIN_QUALITY_STEP: f32 = 0.0001;

/// # Maximum Pixels.
///
/// Resizing will refuse to produce a canvas larger than this (`16384²`).
pub const MAX_PIXELS: u64 = 16_384 * 16_384;



/// # Squish!
///
/// This is a convenience wrapper covering the whole pipeline: decode the raw
/// image file, resize it per `resize`, then encode it to the budget described
/// by `compression` using its [`ImageKind`].
///
/// ## Errors
///
/// This will bubble up any decoding, resizing, configuration, or encoding
/// errors encountered along the way. Missing the byte budget is not an
/// error; check [`Output::met`].
pub fn squish(
	raw: &[u8],
	resize: ResizeSpec,
	compression: CompressionSpec,
) -> Result<Output, SquishError> {
	// Check the settings before doing any expensive work.
	compression.validate()?;

	let input = Input::try_from(raw)?;
	let input = input.resize(resize)?;
	encode_to_budget(&compression.kind(), &input, &compression)
}
