/*!
# `Squish` - Color Kind
*/



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Source Image Color.
///
/// This is a list of color types, or, more specifically, which color
/// channels are actually used by a given image.
///
/// Alpha ([`ColorKind::GreyAlpha`] and [`ColorKind::Rgba`]) requires at least
/// one alpha value being less than `255`.
///
/// Greyscale ([`ColorKind::Grey`] and [`ColorKind::GreyAlpha`]) requires that
/// every RGB set have equal R, G, and B values.
pub enum ColorKind {
	/// # Greyscale.
	Grey,
	/// # Greyscale with Alpha.
	GreyAlpha,
	/// # RGB.
	Rgb,
	/// # RGB with Alpha.
	Rgba,
}

/// # Getters.
impl ColorKind {
	#[inline]
	#[must_use]
	/// # Is Color?
	///
	/// An image is color if it contains at least one pixel with an R, G,
	/// and/or B that are not all the same.
	pub const fn is_color(self) -> bool {
		matches!(self, Self::Rgb | Self::Rgba)
	}

	#[inline]
	#[must_use]
	/// # Is Greyscale?
	pub const fn is_greyscale(self) -> bool {
		matches!(self, Self::Grey | Self::GreyAlpha)
	}

	#[inline]
	#[must_use]
	/// # Has Alpha?
	///
	/// If any pixel is less than fully opaque, this is true.
	pub const fn has_alpha(self) -> bool {
		matches!(self, Self::GreyAlpha | Self::Rgba)
	}
}

/// # Setters.
impl ColorKind {
	#[must_use]
	/// # From RGBA.
	///
	/// Scan a 4-byte pixel slice to see whether any color or alpha channels
	/// are in use. The scan stops early once both have been found.
	pub fn from_rgba(src: &[u8]) -> Self {
		let mut color = false;
		let mut alpha = false;
		for px in src.chunks_exact(4) {
			color = color || px[0] != px[1] || px[0] != px[2];
			alpha = alpha || px[3] != 255;
			if color && alpha { return Self::Rgba; }
		}

		match (color, alpha) {
			(true, _) => Self::Rgb,
			(false, true) => Self::GreyAlpha,
			(false, false) => Self::Grey,
		}
	}
}
