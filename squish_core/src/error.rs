/*!
# `Squish` - Error
*/

use crate::ImageKind;
use std::{
	error::Error,
	fmt,
};



#[cfg(feature = "bin")]
/// # Help Text.
const HELP: &str = concat!(r"
   .-------.
  /  .---.  \    ", "\x1b[38;5;199mSquish\x1b[0;38;5;69m v", env!("CARGO_PKG_VERSION"), "\x1b[0m", r#"
 |  / ~~~ \  |   Resize and re-encode JPEG/PNG images
 |  \_____/  |   until they fit a byte budget.
  \  '---'  /
   '-------'

USAGE:
    squish [FLAGS] [OPTIONS] <PATH(S)>...

FLAGS:
    -h, --help            Print help information and exit.
    -v, --verbose         Log every encoding attempt to STDERR.
    -V, --version         Print version information and exit.
        --webp            Encode WebP instead of JPEG.

OPTIONS:
    -W, --width <NUM>     Target width in pixels. If no height is given, the
                          height is scaled to preserve the aspect ratio.
    -H, --height <NUM>    Target height in pixels. If no width is given, the
                          width is scaled to preserve the aspect ratio.
    -s, --size <SIZE>     Byte budget for each output. A K/KB or M/MB suffix
                          may be used, e.g. "250K". Without a budget, each
                          image is encoded once at the initial quality.
    -q, --quality <NUM>   Initial encoder quality, between 0 and 1.
                          [default: 0.92]
        --min-quality <NUM>
                          The quality floor, between 0 and 1. [default: 0.1]
        --step <NUM>      Quality decrement per attempt. [default: 0.05]
    -l, --list <FILE>     Read image and/or directory paths from this text
                          file, one path per line, instead of or in addition
                          to those specified inline via <PATH(S)>.

TRAILING ARGS:
    <PATH(S)>...          Image and/or directory paths to squish. Directories
                          will be crawled recursively. Results are saved next
                          to their sources with a new extension appended.
"#);



#[derive(Debug, Copy, Clone, Eq, PartialEq)]
/// # Errors.
pub enum SquishError {
	/// # Operation cancelled.
	Cancelled,

	/// # Unsupported color.
	Color,

	/// # Decoding failed.
	Decode,

	/// # Encoding failed.
	Encode,

	/// # Invalid image.
	Image,

	/// # Decoding not supported.
	ImageDecode(ImageKind),

	/// # Encoding not supported.
	ImageEncode(ImageKind),

	/// # No output was produced.
	NoBest,

	/// # Image dimensions are too big.
	Overflow,

	/// # Invalid quality.
	Quality,

	/// # Quality floor above the initial quality.
	QualityRange,

	/// # Invalid quality step.
	QualityStep,

	/// # Invalid target height.
	TargetHeight,

	/// # Invalid target size.
	TargetSize,

	/// # Invalid target width.
	TargetWidth,

	#[cfg(feature = "bin")]
	/// # Invalid CLI value.
	CliArg(&'static str),

	#[cfg(feature = "bin")]
	/// # No images found.
	NoPaths,

	#[cfg(feature = "bin")]
	/// # I/O read error.
	Read,

	#[cfg(feature = "bin")]
	/// # I/O write error.
	Write,

	#[cfg(feature = "bin")]
	/// # Print Help (Not an Error).
	PrintHelp,

	#[cfg(feature = "bin")]
	/// # Print Version (Not an Error).
	PrintVersion,
}

impl Error for SquishError {}

impl AsRef<str> for SquishError {
	#[inline]
	fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for SquishError {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		#[cfg(feature = "bin")]
		if let Self::CliArg(s) = self {
			return write!(f, "Invalid value for {s}.");
		}

		f.write_str(self.as_str())
	}
}

impl SquishError {
	#[must_use]
	/// # As Str.
	///
	/// Return the error as an English string slice.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Cancelled => "The operation was cancelled.",
			Self::Color => "Unsupported color encoding format.",
			Self::Decode => "The image could not be decoded.",
			Self::Encode => "The image could not be encoded.",
			Self::Image => "Invalid image.",
			Self::ImageDecode(k) => match k {
				ImageKind::Jpeg => "Squish was built without JPEG decoding support.",
				ImageKind::Png => "Squish was built without PNG decoding support.",
				ImageKind::Webp => "Squish cannot decode WebP images.",
			},
			Self::ImageEncode(k) => match k {
				ImageKind::Jpeg => "Squish cannot encode JPEG images.",
				ImageKind::Png => "Squish cannot encode PNG images.",
				ImageKind::Webp => "Squish was built without WebP encoding support.",
			},
			Self::NoBest => "No encoded output is available.",
			Self::Overflow => "The image dimensions are out of range.",
			Self::Quality => "Qualities must be greater than zero and no greater than one.",
			Self::QualityRange => "The minimum quality cannot exceed the initial quality.",
			Self::QualityStep => "The quality step must be at least 0.0001.",
			Self::TargetHeight => "The target height must be a positive integer.",
			Self::TargetSize => "The target size must be at least one byte.",
			Self::TargetWidth => "The target width must be a positive integer.",

			#[cfg(feature = "bin")] Self::CliArg(_) => "Invalid CLI argument.",
			#[cfg(feature = "bin")] Self::NoPaths => "No JPEG or PNG images were found.",
			#[cfg(feature = "bin")] Self::Read => "Unable to read the source file.",
			#[cfg(feature = "bin")] Self::Write => "Unable to save the file.",
			#[cfg(feature = "bin")] Self::PrintHelp => HELP,
			#[cfg(feature = "bin")] Self::PrintVersion => concat!("Squish v", env!("CARGO_PKG_VERSION")),
		}
	}

	#[must_use]
	/// # Is Configuration Error?
	///
	/// Returns `true` for errors caused by an invalid [`ResizeSpec`](crate::ResizeSpec)
	/// or [`CompressionSpec`](crate::CompressionSpec) rather than by the image
	/// itself.
	pub const fn is_config(self) -> bool {
		matches!(
			self,
			Self::Quality | Self::QualityRange | Self::QualityStep |
			Self::TargetHeight | Self::TargetSize | Self::TargetWidth
		)
	}

	#[must_use]
	/// # Is Image Error?
	///
	/// Returns `true` for errors caused by a missing, undecodable, or
	/// degenerate source image.
	pub const fn is_image(self) -> bool {
		matches!(
			self,
			Self::Color | Self::Decode | Self::Image | Self::ImageDecode(_) |
			Self::Overflow
		)
	}

	#[must_use]
	/// # Is Encoding Error?
	pub const fn is_encode(self) -> bool {
		matches!(self, Self::Encode | Self::ImageEncode(_))
	}
}
