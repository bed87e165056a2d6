use super::{blend::BlendFunction, Effect, EffectOptions, EffectShader};
use crate::{core::disposable::Disposable, libs::uniform::Uniform};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[derive(Clone, Debug)]
pub struct VignetteOptions {
	pub blend_function: BlendFunction,
	/// Uses Eskil's vignette technique instead of a smooth radial falloff.
	pub eskil: bool,
	pub offset: f32,
	pub darkness: f32,
}

impl Default for VignetteOptions {
	fn default() -> Self {
		Self {
			blend_function: BlendFunction::Normal,
			eskil: false,
			offset: 0.5,
			darkness: 0.5,
		}
	}
}

/// Darkens the edges of the image.
#[derive(Disposable)]
pub struct VignetteEffect {
	shader: EffectShader,
	offset: Uniform,
	darkness: Uniform,
}

impl VignetteEffect {
	pub fn new(options: VignetteOptions) -> Self {
		let offset = Uniform::new(options.offset);
		let darkness = Uniform::new(options.darkness);

		let mut shader = EffectShader::new(
			"VignetteEffect",
			include_str!("../shader/effects/vignette.frag"),
			EffectOptions {
				blend_function: options.blend_function,
				uniforms: [("offset".to_owned(), offset.clone()), ("darkness".to_owned(), darkness.clone())]
					.into_iter()
					.collect(),
				..Default::default()
			},
		);

		if options.eskil {
			shader.set_define("ESKIL", "1");
		}

		Self {
			shader,
			offset,
			darkness,
		}
	}

	pub fn eskil(&self) -> bool {
		self.shader.define("ESKIL").is_some()
	}

	/// Changes the shader code, the pass recompiles on its next render.
	pub fn set_eskil(&mut self, eskil: bool) {
		if eskil {
			self.shader.set_define("ESKIL", "1");
		} else {
			self.shader.remove_define("ESKIL");
		}
	}

	pub fn offset(&self) -> f32 {
		self.offset.float()
	}

	pub fn set_offset(&self, offset: f32) {
		self.offset.set(offset);
	}

	pub fn darkness(&self) -> f32 {
		self.darkness.float()
	}

	pub fn set_darkness(&self, darkness: f32) {
		self.darkness.set(darkness);
	}
}

impl Default for VignetteEffect {
	fn default() -> Self {
		Self::new(VignetteOptions::default())
	}
}

impl Effect for VignetteEffect {
	fn shader(&self) -> &EffectShader {
		&self.shader
	}

	fn shader_mut(&mut self) -> &mut EffectShader {
		&mut self.shader
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
	fn eskil_mode_is_a_code_change() {
		let mut vignette = VignetteEffect::default();
		assert!(!vignette.eskil());

		vignette.set_eskil(true);
		assert!(vignette.eskil());
		assert_eq!(vignette.shader().revision(), 1);

		vignette.set_darkness(0.8);
		assert_eq!(vignette.shader().uniform("darkness").map(Uniform::float), Some(0.8));
		assert_eq!(vignette.shader().revision(), 1);
	}
}
