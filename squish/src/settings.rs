/*!
# Squish: Settings
*/

use argyle::Argument;
use dowser::{
	Dowser,
	Extension,
};
use squish_core::{
	CompressionSpec,
	ImageKind,
	ResizeSpec,
	SquishError,
};
use std::path::{
	Path,
	PathBuf,
};



// The E_JPEG, E_JPG, and E_PNG constants are generated by build.rs.
include!(concat!(env!("OUT_DIR"), "/squish-extensions.rs"));



/// # Runtime Settings.
///
/// This holds everything parsed from the command line.
pub(super) struct Settings {
	/// # Resize Settings.
	pub(super) resize: ResizeSpec,

	/// # Compression Settings.
	pub(super) compression: CompressionSpec,

	/// # Verbose Logging.
	pub(super) verbose: bool,

	/// # Source Paths.
	pub(super) paths: Vec<PathBuf>,

	/// # Unreadable Path Lists.
	pub(super) bad_lists: Vec<String>,
}

impl Settings {
	/// # New.
	///
	/// Parse the CLI arguments and return a new instance, unless `--help` or
	/// `--version` were requested instead.
	///
	/// ## Errors
	///
	/// This will return an error if any values are invalid or no images are
	/// found.
	pub(super) fn new() -> Result<Self, SquishError> {
		let mut paths = Dowser::default();
		let mut resize = ResizeSpec::default();
		let mut compression = CompressionSpec::default();
		let mut verbose = false;
		let mut bad_lists = Vec::new();

		let args = argyle::args()
			.with_keywords(include!(concat!(env!("OUT_DIR"), "/argyle.rs")));
		for arg in args {
			match arg {
				Argument::Key("-h" | "--help") => return Err(SquishError::PrintHelp),
				Argument::Key("-v" | "--verbose") => { verbose = true; },
				Argument::Key("-V" | "--version") => return Err(SquishError::PrintVersion),
				Argument::Key("--webp") => {
					compression = compression.with_kind(ImageKind::Webp);
				},

				Argument::KeyWithValue("-W" | "--width", s) => {
					resize = resize.with_width(parse_dimension(&s, "--width")?);
				},
				Argument::KeyWithValue("-H" | "--height", s) => {
					resize = resize.with_height(parse_dimension(&s, "--height")?);
				},
				Argument::KeyWithValue("-s" | "--size", s) => {
					compression = compression.with_target_size(parse_size(&s)?);
				},
				Argument::KeyWithValue("-q" | "--quality", s) => {
					compression = compression.with_initial_quality(parse_float(&s, "--quality")?);
				},
				Argument::KeyWithValue("--min-quality", s) => {
					compression = compression.with_min_quality(parse_float(&s, "--min-quality")?);
				},
				Argument::KeyWithValue("--step", s) => {
					compression = compression.with_quality_step(parse_float(&s, "--step")?);
				},
				Argument::KeyWithValue("-l" | "--list", s) => {
					if let Some(s) = read_list(&mut paths, s) { bad_lists.push(s); }
				},

				// Assume paths.
				Argument::Other(s) => { paths = paths.with_path(s); },
				Argument::InvalidUtf8(s) => { paths = paths.with_path(s); },

				// Nothing else is relevant.
				_ => {},
			}
		}

		// Catch bad settings before doing any work.
		check_resize(resize)?;
		compression.validate()?;
		if ! compression.kind().can_encode() {
			return Err(SquishError::ImageEncode(compression.kind()));
		}

		let kind = compression.kind();
		let mut paths: Vec<PathBuf> = paths
			.filter(|p| is_jpeg_png(p) && ! is_squished(p, kind))
			.collect();
		if paths.is_empty() { return Err(SquishError::NoPaths); }
		paths.sort();

		Ok(Self { resize, compression, verbose, paths, bad_lists })
	}
}



/// # Check Resize Settings.
///
/// Zero dimensions can be caught early; everything else depends on the
/// source.
const fn check_resize(resize: ResizeSpec) -> Result<(), SquishError> {
	if matches!(resize.width(), Some(0)) { Err(SquishError::TargetWidth) }
	else if matches!(resize.height(), Some(0)) { Err(SquishError::TargetHeight) }
	else { Ok(()) }
}

/// # Read Path List.
///
/// Add the paths listed in a text file to the crawl, returning the file name
/// back if it couldn't be read.
fn read_list(paths: &mut Dowser, src: String) -> Option<String> {
	if paths.read_paths_from_file(&src).is_ok() { None }
	else { Some(src) }
}

/// # Is JPEG/PNG File.
fn is_jpeg_png(path: &Path) -> bool {
	Extension::try_from3(path).map_or_else(
		|| Extension::try_from4(path) == Some(E_JPEG),
		|e| e == E_JPG || e == E_PNG
	)
}

/// # Is Squished File?
///
/// Outputs are saved as the source path plus a new extension, e.g.
/// `photo.png.jpg`. Those should not be picked up again by later runs.
fn is_squished(path: &Path, kind: ImageKind) -> bool {
	path.extension().is_some_and(|e| e.eq_ignore_ascii_case(kind.extension())) &&
	path.file_stem().is_some_and(|s| is_jpeg_png(Path::new(s)))
}

/// # Parse Dimension.
fn parse_dimension(src: &str, key: &'static str) -> Result<u32, SquishError> {
	src.trim().parse::<u32>().map_err(|_| SquishError::CliArg(key))
}

/// # Parse Float.
fn parse_float(src: &str, key: &'static str) -> Result<f32, SquishError> {
	src.trim().parse::<f32>()
		.ok()
		.filter(|f| f.is_finite())
		.ok_or(SquishError::CliArg(key))
}

#[allow(
	clippy::cast_possible_truncation,
	clippy::cast_precision_loss,
	clippy::cast_sign_loss,
)] // Range is checked.
/// # Parse Size.
///
/// Byte budgets can be given as plain byte counts, or with a `K`/`KB` or
/// `M`/`MB` suffix. Units are binary, so `1K` is `1024` bytes. Fractions are
/// allowed with suffixes, e.g. `1.5M`, and are rounded to the nearest byte.
fn parse_size(src: &str) -> Result<usize, SquishError> {
	let src = src.trim();
	let split = src.find(|c: char| c.is_ascii_alphabetic()).unwrap_or(src.len());
	let (num, unit) = src.split_at(split);

	let scale: f64 = match unit.trim().to_ascii_uppercase().as_str() {
		"" | "B" => 1.0,
		"K" | "KB" => 1024.0,
		"M" | "MB" => 1_048_576.0,
		_ => return Err(SquishError::CliArg("--size")),
	};

	let num = num.trim().parse::<f64>().map_err(|_| SquishError::CliArg("--size"))?;
	let bytes = (num * scale).round();
	if bytes.is_finite() && 0.0 <= bytes && bytes <= usize::MAX as f64 {
		Ok(bytes as usize)
	}
	else { Err(SquishError::CliArg("--size")) }
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_parse_size() {
		for (raw, expected) in [
			("2048", 2048),
			("100K", 102_400),
			("100kb", 102_400),
			("100 KB", 102_400),
			("1M", 1_048_576),
			("1.5mb", 1_572_864),
			(" 50K ", 51_200),
			("0", 0),
		] {
			assert_eq!(parse_size(raw), Ok(expected), "{raw}");
		}

		for raw in ["", "K", "-5K", "12G", "ten", "1KK", "NaN"] {
			assert_eq!(parse_size(raw), Err(SquishError::CliArg("--size")), "{raw}");
		}
	}

	#[test]
	fn t_parse_numbers() {
		assert_eq!(parse_dimension("800", "--width"), Ok(800));
		assert_eq!(parse_dimension("-1", "--width"), Err(SquishError::CliArg("--width")));
		assert_eq!(parse_float("0.75", "--quality"), Ok(0.75));
		assert_eq!(parse_float("inf", "--quality"), Err(SquishError::CliArg("--quality")));
	}

	#[test]
	fn t_check_resize() {
		assert!(check_resize(ResizeSpec::default()).is_ok());
		assert_eq!(
			check_resize(ResizeSpec::default().with_width(0)),
			Err(SquishError::TargetWidth),
		);
		assert_eq!(
			check_resize(ResizeSpec::new(Some(10), Some(0))),
			Err(SquishError::TargetHeight),
		);
	}

	#[test]
	fn t_read_list() {
		let mut paths = Dowser::default();
		assert_eq!(
			read_list(&mut paths, "/nowhere/squish-missing-list.txt".to_owned()),
			Some("/nowhere/squish-missing-list.txt".to_owned()),
		);
	}

	#[test]
	fn t_is_squished() {
		for p in ["/tmp/photo.png.jpg", "/tmp/photo.jpg.jpg", "/tmp/photo.jpeg.JPG"] {
			assert!(is_squished(Path::new(p), ImageKind::Jpeg), "{p}");
		}

		for p in ["/tmp/photo.jpg", "/tmp/photo.png", "/tmp/photo.v2.jpg", "/tmp/photo.gif.jpg"] {
			assert!(! is_squished(Path::new(p), ImageKind::Jpeg), "{p}");
		}

		// WebP outputs are never crawled, but a JPEG named like one isn't one.
		assert!(! is_squished(Path::new("/tmp/photo.png.jpg"), ImageKind::Webp));
		assert!(is_squished(Path::new("/tmp/photo.png.webp"), ImageKind::Webp));
	}

	#[test]
	fn t_is_jpeg_png() {
		assert!(is_jpeg_png(Path::new("/tmp/photo.jpg")));
		assert!(is_jpeg_png(Path::new("/tmp/photo.jpeg")));
		assert!(is_jpeg_png(Path::new("/tmp/photo.png")));
		assert!(! is_jpeg_png(Path::new("/tmp/photo.webp")));
		assert!(! is_jpeg_png(Path::new("/tmp/photo.png.txt")));
	}
}
