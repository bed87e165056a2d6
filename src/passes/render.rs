use super::{clear::ClearPass, Pass, PassBase, PassKind};
use crate::core::{
	context::RenderContext,
	disposable::Disposable,
	material::ShaderMaterial,
	render_target::RenderTarget,
	scene::{Camera, Scene},
};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Renders a scene into the input buffer, which is where the rest of the
/// chain picks it up. Needs no swap.
#[derive(Disposable)]
pub struct RenderPass {
	#[owned]
	base: PassBase,
	#[owned]
	clear_pass: ClearPass,
	/// Rendered in place of every material in the scene.
	pub override_material: Option<ShaderMaterial>,
	/// Clears the target before rendering.
	pub clear: bool,
}

impl RenderPass {
	pub fn new(scene: Scene, camera: Camera) -> Self {
		let mut base = PassBase::with_scene("RenderPass", scene, camera);
		base.needs_swap = false;

		Self {
			base,
			clear_pass: ClearPass::default(),
			override_material: None,
			clear: true,
		}
	}

	pub fn clear_pass(&self) -> &ClearPass {
		&self.clear_pass
	}

	pub fn clear_pass_mut(&mut self) -> &mut ClearPass {
		&mut self.clear_pass
	}
}

impl Pass for RenderPass {
	fn base(&self) -> &PassBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut PassBase {
		&mut self.base
	}

	fn kind(&self) -> PassKind {
		PassKind::Scene
	}

	fn render(
		&mut self,
		renderer: &mut dyn RenderContext,
		input_buffer: &RenderTarget,
		_output_buffer: &RenderTarget,
		_delta: f32,
		_stencil_test: bool,
	) {
		let target = (!self.base.render_to_screen).then_some(input_buffer);

		if self.clear {
			self.clear_pass.clear(renderer, target);
		}

		// Restored after rendering
		let scene_override = self.override_material.clone().map(|material| {
			self.base.scene.override_material.replace(material)
		});

		renderer.render(&self.base.scene, &self.base.camera, target);

		if let Some(previous) = scene_override {
			self.base.scene.override_material = previous;
		}
	}
}
