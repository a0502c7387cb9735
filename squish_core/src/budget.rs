/*!
# `Squish` - Budget Encoding.
*/

use crate::{
	CompressionSpec,
	Encoder,
	Input,
	ladder::QualityLadder,
	Output,
	Quality,
	SquishError,
};
use std::{
	fmt,
	num::NonZeroUsize,
	sync::atomic::{
		AtomicBool,
		Ordering::Acquire,
	},
	time::{
		Duration,
		Instant,
	},
};



/// # Budget Encoding Iterator.
///
/// This is a step-wise driver for the size-seeking encode loop. Each call to
/// [`BudgetIter::advance`] encodes the source at the next quality on the
/// ladder (starting at the initial quality and stepping down toward the
/// floor), returning the candidate.
///
/// The loop finishes as soon as a candidate fits within the byte budget, there
/// is no budget at all, or the floor has been tried. Once [`BudgetIter::is_done`]
/// returns `true`, the instance can be consumed with [`BudgetIter::take`] to
/// collect the final [`Output`].
///
/// Encoders are given one retry per quality; if the second try also fails or
/// comes back empty, the error is returned and the loop is over.
///
/// Most callers will want [`encode_to_budget`] instead, which does all of
/// this in one go.
pub struct BudgetIter<'a, E: Encoder + ?Sized> {
	encoder: &'a E,
	src: &'a Input,

	ladder: QualityLadder,
	target: Option<NonZeroUsize>,

	best: Option<Output>,
	attempts: usize,
	done: bool,
	time: Duration,
}

impl<E: Encoder + ?Sized> fmt::Debug for BudgetIter<'_, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BudgetIter")
		.field("src", &self.src)
		.field("ladder", &self.ladder)
		.field("target", &self.target)
		.field("best", &self.best)
		.field("attempts", &self.attempts)
		.field("done", &self.done)
		.field("time", &self.time)
		.finish_non_exhaustive()
	}
}

/// ## Instantiation.
impl<'a, E: Encoder + ?Sized> BudgetIter<'a, E> {
	/// # New.
	///
	/// ## Errors
	///
	/// This will return an error if the compression settings are invalid.
	pub fn new(encoder: &'a E, src: &'a Input, spec: &CompressionSpec)
	-> Result<Self, SquishError> {
		let (top, bottom, step, target) = spec.checked()?;

		Ok(Self {
			encoder,
			src,

			ladder: QualityLadder::new(top, bottom, step),
			target,

			best: None,
			attempts: 0,
			done: false,
			time: Duration::ZERO,
		})
	}
}

/// ## Getters.
impl<E: Encoder + ?Sized> BudgetIter<'_, E> {
	#[inline]
	#[must_use]
	/// # Attempts.
	///
	/// Return the number of successful encoding passes so far. Retries are
	/// not counted separately.
	pub const fn attempts(&self) -> usize { self.attempts }

	#[inline]
	#[must_use]
	/// # Candidate.
	///
	/// Return a reference to the most recent output, if any.
	pub const fn candidate(&self) -> Option<&Output> { self.best.as_ref() }

	#[inline]
	#[must_use]
	/// # Is Done?
	///
	/// Returns `true` once the budget has been met, the floor has been
	/// reached, or an error has occurred.
	pub const fn is_done(&self) -> bool { self.done || self.ladder.is_done() }

	#[inline]
	#[must_use]
	/// # Max Attempts.
	///
	/// Return the most encoding passes this iterator will ever make.
	pub const fn max_attempts(&self) -> usize { self.ladder.cap() }

	#[inline]
	#[must_use]
	/// # Target Size.
	pub const fn target_size(&self) -> Option<NonZeroUsize> { self.target }

	#[inline]
	#[must_use]
	/// # Computation Time.
	///
	/// Return the total amount of time spent encoding, retries included.
	pub const fn time(&self) -> Duration { self.time }

	#[allow(clippy::missing_const_for_fn)] // Doesn't work.
	/// # Take the Result.
	///
	/// Consume the iterator and return the most recent output.
	///
	/// ## Errors
	///
	/// This will return an error if nothing has been successfully encoded yet.
	pub fn take(self) -> Result<Output, SquishError> {
		self.best.ok_or(SquishError::NoBest)
	}
}

/// ## Iteration.
impl<E: Encoder + ?Sized> BudgetIter<'_, E> {
	/// # Encode the Next Quality!
	///
	/// This is the tick method for the "iterator". Each call encodes the
	/// source at the next quality, returning a reference to the result, or
	/// `None` once the loop has finished.
	///
	/// ## Errors
	///
	/// This will return an error if the encoder fails twice in a row, after
	/// which the loop is considered done.
	pub fn advance(&mut self) -> Result<Option<&Output>, SquishError> {
		if self.is_done() { return Ok(None); }
		let Some(quality) = self.ladder.next() else { return Ok(None); };

		// Start a timer.
		let now = Instant::now();
		let res = self.attempt(quality);
		self.time += now.elapsed();

		let data = match res {
			Ok(data) => data,
			Err(e) => {
				self.done = true;
				return Err(e);
			},
		};

		let attempts = NonZeroUsize::MIN.saturating_add(self.attempts);
		self.attempts = attempts.get();

		let out = Output::new(data, quality, self.target, attempts);
		log::debug!(
			"Attempt #{attempts}: quality {quality}, {} bytes (budget: {}).",
			out.size(),
			self.target.map_or_else(|| "none".to_owned(), |t| format!("{t} bytes")),
		);

		if out.met() { self.done = true; }
		Ok(Some(&*self.best.insert(out)))
	}

	/// # Encode With Retry.
	///
	/// Encode the source at the given quality, trying one more time if the
	/// first pass fails or comes back empty.
	fn attempt(&self, quality: Quality) -> Result<Vec<u8>, SquishError> {
		match self.encoder.encode(self.src, quality) {
			Ok(data) if ! data.is_empty() => return Ok(data),
			Ok(_) => log::warn!("Encoding at quality {quality} produced nothing; retrying."),
			// Retrying won't help with unsupported formats.
			Err(e @ SquishError::ImageEncode(_)) => return Err(e),
			Err(e) => log::warn!("Encoding at quality {quality} failed ({e}); retrying."),
		}

		match self.encoder.encode(self.src, quality) {
			Ok(data) if ! data.is_empty() => Ok(data),
			Ok(_) => Err(SquishError::Encode),
			Err(e) => Err(e),
		}
	}
}



/// # Encode to Budget.
///
/// Encode `input` with `encoder` at decreasing qualities until the result
/// fits within the byte budget of `spec`, or the quality floor is reached.
/// Without a budget, the image is encoded exactly once at the initial
/// quality.
///
/// Missing the budget is not an error; check [`Output::met`].
///
/// ## Examples
///
/// ```
/// use squish_core::{CompressionSpec, ImageKind, Input};
///
/// let pixels: Vec<u8> = (0..=255_u8).flat_map(|i| [i, 255 - i, i / 2, 255]).collect();
/// let input = Input::from_rgba(16, 16, pixels).unwrap();
/// let spec = CompressionSpec::default().with_target_size(100 * 1024);
///
/// let out = squish_core::encode_to_budget(&ImageKind::Jpeg, &input, &spec).unwrap();
/// assert!(out.met());
/// assert_eq!(out.attempts().get(), 1);
/// ```
///
/// ## Errors
///
/// This will return an error if the compression settings are invalid or the
/// encoder fails.
pub fn encode_to_budget<E: Encoder + ?Sized>(
	encoder: &E,
	input: &Input,
	spec: &CompressionSpec,
) -> Result<Output, SquishError> {
	run(BudgetIter::new(encoder, input, spec)?, None)
}

/// # Encode to Budget (Cancellable).
///
/// This works just like [`encode_to_budget`], except the `stop` flag is
/// checked before each attempt. If it has been set, the loop is abandoned.
///
/// ## Errors
///
/// In addition to the errors returned by [`encode_to_budget`], this will
/// return [`SquishError::Cancelled`] if `stop` is set before the loop
/// finishes.
pub fn encode_to_budget_until<E: Encoder + ?Sized>(
	encoder: &E,
	input: &Input,
	spec: &CompressionSpec,
	stop: &AtomicBool,
) -> Result<Output, SquishError> {
	run(BudgetIter::new(encoder, input, spec)?, Some(stop))
}

/// # Run to Completion.
fn run<E: Encoder + ?Sized>(mut iter: BudgetIter<'_, E>, stop: Option<&AtomicBool>)
-> Result<Output, SquishError> {
	while ! iter.is_done() {
		if stop.is_some_and(|s| s.load(Acquire)) {
			log::debug!("Cancelled after {} attempt(s).", iter.attempts());
			return Err(SquishError::Cancelled);
		}
		iter.advance()?;
	}

	let time = iter.time();
	let out = iter.take()?;
	log::debug!(
		"Finished: quality {}, {} bytes, {} attempt(s), budget met: {}, {:.3}s.",
		out.quality(),
		out.size(),
		out.attempts(),
		out.met(),
		time.as_secs_f64(),
	);
	Ok(out)
}



#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use std::cell::{
		Cell,
		RefCell,
	};

	/// # Always the same size.
	struct Fixed(usize);

	impl Encoder for Fixed {
		fn encode(&self, _input: &Input, _quality: Quality)
		-> Result<Vec<u8>, SquishError> {
			Ok(vec![1; self.0])
		}
	}

	/// # A thousand bytes per quality point.
	struct Linear;

	impl Encoder for Linear {
		fn encode(&self, _input: &Input, quality: Quality)
		-> Result<Vec<u8>, SquishError> {
			Ok(vec![1; usize::from(quality.jpeg()) * 1000])
		}
	}

	/// # Fails the first N calls.
	struct Flaky {
		fail: usize,
		calls: Cell<usize>,
		error: Option<SquishError>,
	}

	impl Flaky {
		const fn new(fail: usize, error: Option<SquishError>) -> Self {
			Self { fail, calls: Cell::new(0), error }
		}
	}

	impl Encoder for Flaky {
		fn encode(&self, _input: &Input, _quality: Quality)
		-> Result<Vec<u8>, SquishError> {
			let calls = self.calls.get() + 1;
			self.calls.set(calls);

			if calls <= self.fail {
				// Some errors, some empties.
				self.error.map_or_else(|| Ok(Vec::new()), Err)
			}
			else { Ok(vec![1; 10]) }
		}
	}

	/// # Record the qualities asked for.
	struct Recorder(RefCell<Vec<f32>>, usize);

	impl Encoder for Recorder {
		fn encode(&self, _input: &Input, quality: Quality)
		-> Result<Vec<u8>, SquishError> {
			self.0.borrow_mut().push(quality.get());
			Ok(vec![1; self.1])
		}
	}

	/// # Raise the stop flag after the first encode.
	struct Stopper<'a>(&'a AtomicBool);

	impl Encoder for Stopper<'_> {
		fn encode(&self, _input: &Input, _quality: Quality)
		-> Result<Vec<u8>, SquishError> {
			self.0.store(true, std::sync::atomic::Ordering::Release);
			Ok(vec![1; 1_000_000])
		}
	}

	fn input() -> Input {
		let pixels: Vec<u8> = (0..32_u32 * 24)
			.flat_map(|i| {
				let v = (i * 7 % 256) as u8;
				[v, 255 - v, v / 3, 255]
			})
			.collect();
		Input::from_rgba(32, 24, pixels).unwrap()
	}

	#[test]
	fn t_already_small() {
		// A 50KB image with a 100KiB budget is good on the first go.
		let spec = CompressionSpec::default().with_target_size(100 * 1024);
		let out = encode_to_budget(&Fixed(50_000), &input(), &spec).unwrap();

		assert_eq!(out.attempts().get(), 1);
		assert_eq!(out.quality().get(), 0.92);
		assert_eq!(out.size(), 50_000);
		assert!(out.met());
	}

	#[test]
	fn t_never_small() {
		// A 200KB image that won't shrink should bottom out at the floor.
		let spec = CompressionSpec::default().with_target_size(50 * 1024);
		let out = encode_to_budget(&Fixed(200_000), &input(), &spec).unwrap();

		assert_eq!(out.attempts().get(), 18);
		assert_eq!(out.quality().get(), 0.1);
		assert_eq!(out.size(), 200_000);
		assert_eq!(out.target_size(), NonZeroUsize::new(50 * 1024));
		assert!(! out.met());
	}

	#[test]
	fn t_no_budget() {
		let spec = CompressionSpec::default();
		let out = encode_to_budget(&Fixed(200_000), &input(), &spec).unwrap();
		assert_eq!(out.attempts().get(), 1);
		assert_eq!(out.quality().get(), 0.92);
		assert!(out.met());

		// Same deal when the start is the floor.
		let spec = spec.with_initial_quality(0.3).with_min_quality(0.3);
		let out = encode_to_budget(&Fixed(200_000), &input(), &spec).unwrap();
		assert_eq!(out.attempts().get(), 1);
		assert_eq!(out.quality().get(), 0.3);
	}

	#[test]
	fn t_achievable() {
		let spec = CompressionSpec::default().with_target_size(50_000);
		let out = encode_to_budget(&Linear, &input(), &spec).unwrap();

		// 0.92, 0.87, … 0.52 are all too big; 0.47 fits.
		assert!(out.met());
		assert!(out.size() <= 50_000);
		assert_eq!(out.size(), 47_000);
		assert_eq!(out.attempts().get(), 10);
		assert_eq!(out.quality().jpeg(), 47);
	}

	#[test]
	fn t_monotonic() {
		let rec = Recorder(RefCell::new(Vec::new()), 500);
		let spec = CompressionSpec::default()
			.with_target_size(100)
			.with_initial_quality(0.8)
			.with_quality_step(0.07);
		let out = encode_to_budget(&rec, &input(), &spec).unwrap();

		let tried = rec.0.into_inner();
		assert_eq!(tried.len(), out.attempts().get());
		assert!(tried.len() <= spec.max_attempts().unwrap().get());
		assert!(tried.windows(2).all(|w| w[1] < w[0]));
		assert_eq!(tried.first().copied(), Some(0.8));
		assert_eq!(tried.last().copied(), Some(0.1));
	}

	#[test]
	fn t_retry() {
		// One failure is forgiven.
		let spec = CompressionSpec::default();
		for error in [Some(SquishError::Encode), None] {
			let enc = Flaky::new(1, error);
			let out = encode_to_budget(&enc, &input(), &spec).unwrap();
			assert_eq!(out.attempts().get(), 1);
			assert_eq!(out.size(), 10);
			assert_eq!(enc.calls.get(), 2);
		}

		// Two are not.
		let enc = Flaky::new(2, None);
		assert_eq!(encode_to_budget(&enc, &input(), &spec), Err(SquishError::Encode));
		assert_eq!(enc.calls.get(), 2);

		let enc = Flaky::new(2, Some(SquishError::Color));
		assert_eq!(encode_to_budget(&enc, &input(), &spec), Err(SquishError::Color));

		// Unsupported formats don't get a second chance.
		let enc = Flaky::new(2, Some(SquishError::ImageEncode(crate::ImageKind::Png)));
		assert_eq!(
			encode_to_budget(&enc, &input(), &spec),
			Err(SquishError::ImageEncode(crate::ImageKind::Png)),
		);
		assert_eq!(enc.calls.get(), 1);
	}

	#[test]
	fn t_iter() {
		let src = input();
		let spec = CompressionSpec::default()
			.with_target_size(100)
			.with_min_quality(0.8);
		let mut iter = BudgetIter::new(&Fixed(500), &src, &spec).unwrap();
		assert!(! iter.is_done());
		assert_eq!(iter.candidate(), None);
		assert_eq!(iter.target_size(), NonZeroUsize::new(100));
		assert_eq!(iter.max_attempts(), 4);

		let mut qualities = Vec::new();
		while let Some(out) = iter.advance().unwrap() {
			qualities.push(out.quality().get());
		}

		assert!(iter.is_done());
		assert_eq!(iter.attempts(), qualities.len());
		assert_eq!(qualities.len(), 4); // 0.92, 0.87, 0.82, 0.8
		assert_eq!(iter.advance(), Ok(None));

		let out = iter.take().unwrap();
		assert_eq!(out.quality().get(), 0.8);
	}

	#[test]
	fn t_no_best() {
		let src = input();
		let iter = BudgetIter::new(&Fixed(1), &src, &CompressionSpec::default()).unwrap();
		assert_eq!(iter.take(), Err(SquishError::NoBest));
	}

	#[test]
	fn t_invalid() {
		let src = input();
		let spec = CompressionSpec::default().with_quality_step(0.0);
		assert_eq!(
			encode_to_budget(&Fixed(1), &src, &spec),
			Err(SquishError::QualityStep),
		);
		assert!(BudgetIter::new(&Fixed(1), &src, &spec).is_err());
	}

	#[test]
	fn t_cancel() {
		let spec = CompressionSpec::default().with_target_size(10);

		let stop = AtomicBool::new(true);
		assert_eq!(
			encode_to_budget_until(&Fixed(1), &input(), &spec, &stop),
			Err(SquishError::Cancelled),
		);

		// Raised mid-loop.
		let stop = AtomicBool::new(false);
		assert_eq!(
			encode_to_budget_until(&Stopper(&stop), &input(), &spec, &stop),
			Err(SquishError::Cancelled),
		);

		// Never raised.
		let stop = AtomicBool::new(false);
		let out = encode_to_budget_until(&Fixed(5), &input(), &spec, &stop).unwrap();
		assert!(out.met());
	}

	#[test]
	fn t_idempotent() {
		let src = input();
		let spec = CompressionSpec::default().with_target_size(600);
		let a = encode_to_budget(&crate::ImageKind::Jpeg, &src, &spec).unwrap();
		let b = encode_to_budget(&crate::ImageKind::Jpeg, &src, &spec).unwrap();
		assert_eq!(a, b);
		assert!(a.starts_with(&[0xFF, 0xD8, 0xFF]));
	}

	proptest! {
		#[test]
		fn t_terminates(
			a in 0.01_f32..=1.0,
			b in 0.01_f32..=1.0,
			step in 0.005_f32..=0.5,
		) {
			let (initial, min) = if a < b { (b, a) } else { (a, b) };
			let spec = CompressionSpec::default()
				.with_target_size(1)
				.with_initial_quality(initial)
				.with_min_quality(min)
				.with_quality_step(step);

			let src = Input::from_rgba(1, 1, vec![0, 0, 0, 255]).unwrap();
			let out = encode_to_budget(&Fixed(2), &src, &spec).unwrap();

			prop_assert!(out.attempts() <= spec.max_attempts().unwrap());
			prop_assert_eq!(out.quality().get(), min);
			prop_assert!(! out.met());
		}

		#[test]
		fn t_achievable_any(
			budget in 1_usize..=120_000,
			a in 0.01_f32..=1.0,
			b in 0.01_f32..=1.0,
			step in 0.005_f32..=0.5,
		) {
			let (initial, min) = if a < b { (b, a) } else { (a, b) };
			let spec = CompressionSpec::default()
				.with_target_size(budget)
				.with_initial_quality(initial)
				.with_min_quality(min)
				.with_quality_step(step);

			let floor = Linear.encode(&input(), Quality::new(min).unwrap()).unwrap().len();
			let out = encode_to_budget(&Linear, &input(), &spec).unwrap();
			prop_assert!(out.attempts() <= spec.max_attempts().unwrap());

			if floor <= budget {
				prop_assert!(out.met());
				prop_assert!(out.size() <= budget);
			}
			else {
				prop_assert!(! out.met());
				prop_assert_eq!(out.quality().get(), min);
			}
		}
	}
}
