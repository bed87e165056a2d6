use vek::{Extent2, Vec4};

use super::{blend::BlendFunction, Effect, EffectOptions, EffectShader};
use crate::{core::disposable::Disposable, libs::uniform::Uniform};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Snaps UV coordinates to a grid of cells `granularity` pixels wide.
///
/// Only transforms UVs, so it works for every effect merged after it.
#[derive(Disposable)]
pub struct PixelationEffect {
	shader: EffectShader,
	active: Uniform,
	cells: Uniform,
	granularity: u32,
	resolution: Extent2<u32>,
}

impl PixelationEffect {
	pub fn new(granularity: u32) -> Self {
		let active = Uniform::new(false);
		let cells = Uniform::new(Vec4::new(1.0, 1.0, 1.0, 1.0));

		let shader = EffectShader::new(
			"PixelationEffect",
			include_str!("../shader/effects/pixelation.frag"),
			EffectOptions {
				blend_function: BlendFunction::Normal,
				uniforms: [("active".to_owned(), active.clone()), ("d".to_owned(), cells.clone())]
					.into_iter()
					.collect(),
				..Default::default()
			},
		);

		let mut effect = Self {
			shader,
			active,
			cells,
			granularity: 0,
			resolution: Extent2::new(1, 1),
		};
		effect.set_granularity(granularity);
		effect
	}

	pub fn granularity(&self) -> u32 {
		self.granularity
	}

	/// Rounded up to an even number, 0 turns the effect off.
	pub fn set_granularity(&mut self, granularity: u32) {
		self.granularity = granularity + granularity % 2;
		self.active.set(self.granularity > 0);
		self.update_cells();
	}

	fn update_cells(&self) {
		let x = self.granularity as f32 / self.resolution.w.max(1) as f32;
		let y = self.granularity as f32 / self.resolution.h.max(1) as f32;

		let inverse = |v: f32| if v > 0.0 { 1.0 / v } else { 0.0 };
		self.cells.set(Vec4::new(x, y, inverse(x), inverse(y)));
	}
}

impl Effect for PixelationEffect {
	fn shader(&self) -> &EffectShader {
		&self.shader
	}

	fn shader_mut(&mut self) -> &mut EffectShader {
		&mut self.shader
	}

	fn set_size(&mut self, width: u32, height: u32) {
		self.resolution = Extent2::new(width, height);
		self.update_cells();
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
	use crate::libs::uniform::UniformValue;

	#[test]
	fn granularity_is_even_and_sized() {
		let mut pixelation = PixelationEffect::new(5);
		assert_eq!(pixelation.granularity(), 6);

		pixelation.set_size(600, 300);
		let UniformValue::Vec4(cells) = *pixelation.cells.get() else {
			panic!("cell size is a vec4");
		};
		assert!((cells.x - 0.01).abs() < 1e-6);
		assert!((cells.y - 0.02).abs() < 1e-6);
		assert!((cells.z - 100.0).abs() < 1e-3);
		assert!((cells.w - 50.0).abs() < 1e-3);

		pixelation.set_granularity(0);
		assert_eq!(*pixelation.active.get(), UniformValue::Bool(false));
	}
}
