use vek::Extent2;

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Derives the size of an internal render target from the main buffer size.
///
/// A preferred width or height wins over the scale. If only one of them is
/// set, the other follows the aspect ratio of the base size.
#[derive(Clone, Debug, PartialEq)]
pub struct Resizer {
	pub base: Extent2<u32>,
	pub scale: f32,
	pub preferred_width: Option<u32>,
	pub preferred_height: Option<u32>,
}

impl Resizer {
	pub fn new(scale: f32) -> Self {
		Self {
			base: Extent2::new(1, 1),
			scale,
			preferred_width: None,
			preferred_height: None,
		}
	}

	fn aspect(&self) -> f32 {
		self.base.w as f32 / self.base.h.max(1) as f32
	}

	pub fn width(&self) -> u32 {
		let width = match (self.preferred_width, self.preferred_height) {
			(Some(w), _) => w as f32,
			(None, Some(h)) => h as f32 * self.aspect(),
			(None, None) => self.base.w as f32 * self.scale,
		};

		(width.round() as u32).max(1)
	}

	pub fn height(&self) -> u32 {
		let height = match (self.preferred_width, self.preferred_height) {
			(_, Some(h)) => h as f32,
			(Some(w), None) => w as f32 / self.aspect(),
			(None, None) => self.base.h as f32 * self.scale,
		};

		(height.round() as u32).max(1)
	}

	pub fn size(&self) -> Extent2<u32> {
		Extent2::new(self.width(), self.height())
	}
}

impl Default for Resizer {
	fn default() -> Self {
		Self::new(1.0)
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scales_the_base_size() {
		let mut resizer = Resizer::new(0.5);
		resizer.base = Extent2::new(800, 600);
		assert_eq!(resizer.size(), Extent2::new(400, 300));
	}

	#[test]
	fn preferred_sizes_keep_the_aspect_ratio() {
		let mut resizer = Resizer::new(0.5);
		resizer.base = Extent2::new(800, 400);

		resizer.preferred_height = Some(100);
		assert_eq!(resizer.size(), Extent2::new(200, 100));

		resizer.preferred_height = None;
		resizer.preferred_width = Some(100);
		assert_eq!(resizer.size(), Extent2::new(100, 50));
	}

	#[test]
	fn never_collapses_to_zero() {
		let mut resizer = Resizer::new(0.1);
		resizer.base = Extent2::new(4, 4);
		assert_eq!(resizer.size(), Extent2::new(1, 1));
	}
}
