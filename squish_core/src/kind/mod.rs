/*!
# `Squish` - Kinds
*/

pub(super) mod color;
pub(super) mod image;
pub(super) mod jpeg;
#[cfg(feature = "png")]  pub(super) mod png;
#[cfg(feature = "webp")] pub(super) mod webp;
