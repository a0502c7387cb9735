/*!
# `Squish` - Cli
*/

use dactyl::{
	NiceElapsed,
	NiceU64,
};
use fyi_msg::Msg;
use squish_core::{
	Output,
	SquishError,
};
use std::{
	borrow::Cow,
	ffi::OsStr,
	path::Path,
	time::Duration,
};



#[must_use]
/// # File Name.
///
/// This extracts the file name from a path. If for some reason it doesn't have
/// one, "?" is returned so that _something_ can be printed.
pub(super) fn file_name(path: &Path) -> Cow<str> {
	path.file_name().map_or_else(|| Cow::Borrowed("?"), OsStr::to_string_lossy)
}

/// # Print Path Title.
///
/// This prints the source image path with a nice ANSI-colored border, like:
///
/// ```ignore
/// +---------------------+
/// | /path/to/source.png |
/// +---------------------+
/// ```
pub(super) fn print_header_path(path: &Path) {
	let txt = path.to_string_lossy();
	let dashes = "-".repeat(txt.len() + 2);

	println!("\x1b[38;5;199m+{dashes}+\n| \x1b[0m{txt} \x1b[38;5;199m|\n+{dashes}+\x1b[0m");
}

/// # Print Error.
pub(super) fn print_error(err: SquishError) {
	Msg::warning(err.as_str())
		.with_indent(1)
		.print();
}

/// # Print Success.
///
/// This reports the new file, its quality and size, and whether or not it
/// made budget, like:
///
/// ```ignore
/// Success: Created photo.jpg at quality 0.72. (51,200 → 48,211 bytes, 6 attempts.)
/// ```
pub(super) fn print_success(src_size: usize, output: &Output, dst_path: &Path) {
	Msg::success(format!(
		"Created \x1b[1m{}\x1b[0m at quality {}.",
		file_name(dst_path),
		output.quality(),
	))
		.with_indent(1)
		.with_suffix(success_suffix(
			src_size,
			output.size(),
			output.attempts().get(),
			output.target_size().map(|t| (t.get(), output.met())),
		))
		.print();
}

/// # Success Suffix.
///
/// The dimmed size/attempt summary trailing a success line. The budget, if
/// any, is paired with whether or not it was met.
fn success_suffix(
	src_size: usize,
	dst_size: usize,
	attempts: usize,
	budget: Option<(usize, bool)>,
) -> String {
	let budget = match budget {
		None => String::new(),
		Some((t, true)) => format!(
			" \x1b[2m(Budget: {} bytes.)\x1b[0m",
			NiceU64::from(t).as_str(),
		),
		Some((t, false)) => format!(
			" \x1b[93m(Over budget: {} bytes.)\x1b[0m",
			NiceU64::from(t).as_str(),
		),
	};

	format!(
		" \x1b[2m({} \u{2192} {} bytes, {} attempt{}.)\x1b[0m{}",
		NiceU64::from(src_size).as_str(),
		NiceU64::from(dst_size).as_str(),
		attempts,
		if attempts == 1 { "" } else { "s" },
		budget,
	)
}

/// # Print Summary.
pub(super) fn print_summary(good: usize, bad: usize, time: Duration) {
	Msg::plain(format!(
		"\x1b[2mSquished {} of {} image{} in {}.\x1b[0m",
		NiceU64::from(good).as_str(),
		NiceU64::from(good + bad).as_str(),
		if good + bad == 1 { "" } else { "s" },
		NiceElapsed::from(time).as_str(),
	))
		.with_indent(1)
		.print();
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_success_suffix() {
		let s = success_suffix(120_000, 48_211, 6, Some((51_200, true)));
		assert!(s.contains("120,000 \u{2192} 48,211 bytes, 6 attempts."));
		assert!(s.contains("(Budget: 51,200 bytes.)"));

		let s = success_suffix(900, 850, 1, Some((100, false)));
		assert!(s.contains("850 bytes, 1 attempt."));
		assert!(s.contains("(Over budget: 100 bytes.)"));

		let s = success_suffix(900, 850, 2, None);
		assert!(! s.contains("udget"));
	}

	#[test]
	fn t_file_name() {
		assert_eq!(file_name(Path::new("/tmp/photo.png.jpg")), "photo.png.jpg");
		assert_eq!(file_name(Path::new("/")), "?");
	}
}
