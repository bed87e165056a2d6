use super::{Pass, PassBase};
use crate::{
	core::{context::RenderContext, disposable::Disposable, material::ShaderMaterial, render_target::RenderTarget},
	libs::uniform::UniformValue,
};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Renders a fullscreen material, feeding the input buffer to the uniform
/// named by `input`.
#[derive(Disposable)]
pub struct ShaderPass {
	#[owned]
	base: PassBase,
	input: String,
}

impl ShaderPass {
	pub fn new(material: ShaderMaterial) -> Self {
		Self::with_input(material, "inputBuffer")
	}

	pub fn with_input(material: ShaderMaterial, input: impl Into<String>) -> Self {
		let mut base = PassBase::new("ShaderPass");
		base.set_fullscreen_material(material);

		Self {
			base,
			input: input.into(),
		}
	}

	pub fn input(&self) -> &str {
		&self.input
	}

	pub fn set_input(&mut self, input: impl Into<String>) {
		self.input = input.into();
	}

	pub fn material(&self) -> Option<&ShaderMaterial> {
		self.base.fullscreen_material()
	}
}

impl Pass for ShaderPass {
	fn base(&self) -> &PassBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut PassBase {
		&mut self.base
	}

	fn render(
		&mut self,
		renderer: &mut dyn RenderContext,
		input_buffer: &RenderTarget,
		output_buffer: &RenderTarget,
		_delta: f32,
		_stencil_test: bool,
	) {
		if let Some(material) = self.base.fullscreen_material() {
			material.set_uniform(&self.input, UniformValue::Texture(Some(input_buffer.texture.handle)));
		}

		renderer.render(&self.base.scene, &self.base.camera, self.base.output(output_buffer));
	}
}
