use vek::Vec2;

use super::{blend::BlendFunction, Effect, EffectAttributes, EffectOptions, EffectShader};
use crate::{core::disposable::Disposable, libs::uniform::Uniform};

/// Shifts the red and blue channels in opposite directions.
///
/// Samples the input at offsets computed in the vertex shader, which makes it
/// a convolution effect.
#[derive(Disposable)]
pub struct ChromaticAberrationEffect {
	shader: EffectShader,
	offset: Uniform,
}

impl ChromaticAberrationEffect {
	pub fn new(blend_function: BlendFunction, offset: Vec2<f32>) -> Self {
		let offset = Uniform::new(offset);

		let shader = EffectShader::new(
			"ChromaticAberrationEffect",
			include_str!("../shader/effects/chromatic_aberration.frag"),
			EffectOptions {
				attributes: EffectAttributes::CONVOLUTION,
				blend_function,
				uniforms: [("offset".to_owned(), offset.clone())].into_iter().collect(),
				vertex_shader: Some(include_str!("../shader/effects/chromatic_aberration.vert").to_owned()),
				..Default::default()
			},
		);

		Self { shader, offset }
	}

	pub fn offset(&self) -> Vec2<f32> {
		self.offset.get().as_vec2().unwrap_or_default()
	}

	pub fn set_offset(&self, offset: Vec2<f32>) {
		self.offset.set(offset);
	}
}

impl Default for ChromaticAberrationEffect {
	fn default() -> Self {
		Self::new(BlendFunction::Normal, Vec2::new(0.001, 0.0005))
	}
}

impl Effect for ChromaticAberrationEffect {
	fn shader(&self) -> &EffectShader {
		&self.shader
	}

	fn shader_mut(&mut self) -> &mut EffectShader {
		&mut self.shader
	}
}
