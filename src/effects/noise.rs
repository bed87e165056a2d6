use super::{blend::BlendFunction, Effect, EffectOptions, EffectShader};
use crate::core::disposable::Disposable;

/// Film grain. Animated through the `time` uniform of the pass.
#[derive(Disposable)]
pub struct NoiseEffect {
	shader: EffectShader,
}

impl NoiseEffect {
	pub fn new(blend_function: BlendFunction, premultiply: bool) -> Self {
		let mut shader = EffectShader::new(
			"NoiseEffect",
			include_str!("../shader/effects/noise.frag"),
			EffectOptions {
				blend_function,
				..Default::default()
			},
		);

		if premultiply {
			shader.set_define("PREMULTIPLY", "1");
		}

		Self { shader }
	}

	pub fn premultiply(&self) -> bool {
		self.shader.define("PREMULTIPLY").is_some()
	}

	/// Multiplies the noise with the input color.
	pub fn set_premultiply(&mut self, premultiply: bool) {
		if premultiply {
			self.shader.set_define("PREMULTIPLY", "1");
		} else {
			self.shader.remove_define("PREMULTIPLY");
		}
	}
}

impl Default for NoiseEffect {
	fn default() -> Self {
		Self::new(BlendFunction::Screen, false)
	}
}

impl Effect for NoiseEffect {
	fn shader(&self) -> &EffectShader {
		&self.shader
	}

	fn shader_mut(&mut self) -> &mut EffectShader {
		&mut self.shader
	}
}
