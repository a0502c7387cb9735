/*!
# `Squish`

Resize and re-encode JPEG and PNG images until they fit within a byte budget.
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
#![warn(unused_crate_dependencies)]
#![warn(unused_extern_crates)]
#![warn(unused_import_braces)]

#![allow(clippy::module_name_repetitions)]



mod cli;
mod settings;

use fyi_msg::Msg;
use log::warn;
use settings::Settings;
use squish_core::{
	Output,
	SquishError,
};
use std::{
	path::{
		Path,
		PathBuf,
	},
	time::Instant,
};
use tracing_subscriber::{
	fmt,
	EnvFilter,
};



/// # Main.
///
/// This lets us bubble up startup errors so they can be pretty-printed.
fn main() {
	match _main() {
		Ok(()) => {},
		Err(e @ (SquishError::PrintHelp | SquishError::PrintVersion)) => {
			println!("{e}");
		},
		Err(e) => {
			Msg::error(e.to_string()).eprint();
			std::process::exit(1);
		},
	}
}

#[inline]
/// # Actual Main.
///
/// Parse the settings, then squish each image in turn. Per-image failures are
/// reported but do not stop the run.
fn _main() -> Result<(), SquishError> {
	let settings = Settings::new()?;
	init_logging(settings.verbose);
	for list in &settings.bad_lists {
		warn!("Unable to read path list {list}.");
	}

	let now = Instant::now();
	let mut good = 0_usize;
	let mut bad = 0_usize;
	for path in &settings.paths {
		cli::print_header_path(path);
		match squish_file(path, &settings) {
			Ok((src_size, out, dst)) => {
				cli::print_success(src_size, &out, &dst);
				println!();
				good += 1;
			},
			Err(e) => {
				cli::print_error(e);
				bad += 1;
			},
		}
	}

	cli::print_summary(good, bad, now.elapsed());
	Ok(())
}

/// # Initialize Logging.
///
/// Log records go to STDERR. The level is `warn` by default, or `debug` with
/// `-v`/`--verbose`, but `RUST_LOG` wins if set.
fn init_logging(verbose: bool) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

	let _res = fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.try_init();
}

/// # Squish File.
///
/// Read, squish, and save a single image, returning the original file size,
/// the output, and where it was saved.
///
/// ## Errors
///
/// This will return an error if the file can't be read or saved, or if any
/// of the image processing steps fail.
fn squish_file(src: &Path, settings: &Settings)
-> Result<(usize, Output, PathBuf), SquishError> {
	let raw = std::fs::read(src).map_err(|_| SquishError::Read)?;
	let out = squish_core::squish(&raw, settings.resize, settings.compression)?;

	let mut dst = src.to_path_buf();
	dst.as_mut_os_string().push(".");
	dst.as_mut_os_string().push(settings.compression.kind().extension());

	write_atomic::write_file(&dst, &out).map_err(|_| SquishError::Write)?;
	Ok((raw.len(), out, dst))
}
