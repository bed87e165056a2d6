use super::{blend::BlendFunction, Effect, EffectAttributes, EffectOptions, EffectShader};
use crate::core::disposable::Disposable;

/// Shows the depth buffer.
#[derive(Disposable)]
pub struct DepthEffect {
	shader: EffectShader,
}

impl DepthEffect {
	pub fn new(blend_function: BlendFunction, inverted: bool) -> Self {
		let mut shader = EffectShader::new(
			"DepthEffect",
			include_str!("../shader/effects/depth.frag"),
			EffectOptions {
				attributes: EffectAttributes::DEPTH,
				blend_function,
				..Default::default()
			},
		);

		if inverted {
			shader.set_define("INVERTED", "1");
		}

		Self { shader }
	}

	pub fn inverted(&self) -> bool {
		self.shader.define("INVERTED").is_some()
	}

	pub fn set_inverted(&mut self, inverted: bool) {
		if inverted {
			self.shader.set_define("INVERTED", "1");
		} else {
			self.shader.remove_define("INVERTED");
		}
	}
}

impl Default for DepthEffect {
	fn default() -> Self {
		Self::new(BlendFunction::Normal, false)
	}
}

impl Effect for DepthEffect {
	fn shader(&self) -> &EffectShader {
		&self.shader
	}

	fn shader_mut(&mut self) -> &mut EffectShader {
		&mut self.shader
	}
}
