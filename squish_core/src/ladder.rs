/*!
# `Squish` - Quality Ladder.
*/

use crate::{
	compression::max_attempts,
	Quality,
};



/// # Snap Tolerance.
///
/// Rungs this close to the floor are treated as the floor itself. This keeps
/// floating point drift from squeezing in an extra (and pointless) pass just
/// above or below the bottom.
const SNAP: f64 = 1e-6;



#[derive(Debug, Clone)]
/// # Quality Ladder.
///
/// This yields the strictly decreasing sequence of qualities to try, starting
/// at the top and stepping down until it lands on the bottom.
///
/// Each rung is computed from the top as `top − step × n` rather than by
/// repeated subtraction, and the sequence is hard-capped at
/// `⌈(top − bottom) / step⌉ + 1` rungs, the last of which is always the
/// floor.
pub(crate) struct QualityLadder {
	top: f64,
	bottom: Quality,
	step: f64,
	rung: usize,
	cap: usize,
	done: bool,
}

impl QualityLadder {
	/// # New.
	///
	/// The values are expected to have been validated already; see
	/// [`CompressionSpec::checked`](crate::CompressionSpec::checked).
	pub(crate) fn new(top: Quality, bottom: Quality, step: f32) -> Self {
		debug_assert!(bottom <= top, "BUG: the floor is above the top.");
		debug_assert!(0.0 < step, "BUG: the step must be positive.");

		Self {
			top: f64::from(top.get()),
			bottom,
			step: f64::from(step),
			rung: 0,
			cap: max_attempts(top, bottom, step).get(),
			done: false,
		}
	}

	#[inline]
	/// # Cap.
	///
	/// The maximum number of rungs this ladder will ever yield.
	pub(crate) const fn cap(&self) -> usize { self.cap }

	#[inline]
	/// # Is Done?
	///
	/// Returns `true` once the floor has been yielded.
	pub(crate) const fn is_done(&self) -> bool { self.done }

	#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
	/// # Next Rung.
	///
	/// Return the next quality to try, or `None` if the floor has already
	/// been reached.
	pub(crate) fn next(&mut self) -> Option<Quality> {
		if self.done { return None; }

		let n = self.rung;
		self.rung += 1;

		let raw = self.top - self.step * n as f64;
		let floor = f64::from(self.bottom.get());

		// The last permitted rung is always the floor, as is anything at or
		// below it.
		if self.rung >= self.cap || raw <= floor + SNAP {
			self.done = true;
			return Some(self.bottom);
		}

		// This is within (floor, top], so can't fail, but just in case…
		Quality::new(raw as f32).ok().or_else(|| {
			self.done = true;
			Some(self.bottom)
		})
	}
}
