use super::{clear::ClearPass, Pass, PassBase, PassKind};
use crate::core::{
	context::{CompareFunction, RenderContext, StencilOp},
	disposable::Disposable,
	render_target::RenderTarget,
	scene::{Camera, Scene},
};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Writes the shape of a scene into the stencil buffer of both buffers, so
/// that the following passes only affect the masked pixels. Inverted, they
/// affect everything but the mask.
///
/// The stencil test stays enabled until a
/// [`ClearMaskPass`](super::clear_mask::ClearMaskPass) runs.
#[derive(Disposable)]
pub struct MaskPass {
	#[owned]
	base: PassBase,
	#[owned]
	clear_pass: ClearPass,
	pub inverted: bool,
	/// Clears the stencil before writing the mask.
	pub clear: bool,
}

impl MaskPass {
	pub fn new(scene: Scene, camera: Camera) -> Self {
		let mut base = PassBase::with_scene("MaskPass", scene, camera);
		base.needs_swap = false;

		Self {
			base,
			clear_pass: ClearPass::new(false, false, true),
			inverted: false,
			clear: true,
		}
	}
}

impl Pass for MaskPass {
	fn base(&self) -> &PassBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut PassBase {
		&mut self.base
	}

	fn kind(&self) -> PassKind {
		PassKind::Mask
	}

	fn render(
		&mut self,
		renderer: &mut dyn RenderContext,
		input_buffer: &RenderTarget,
		output_buffer: &RenderTarget,
		_delta: f32,
		_stencil_test: bool,
	) {
		let write_value = if self.inverted { 0 } else { 1 };
		let clear_value = 1 - write_value;

		{
			let buffers = renderer.buffers();

			// Leave color and depth alone
			buffers.set_color_mask(false);
			buffers.set_depth_mask(false);
			buffers.set_color_locked(true);
			buffers.set_depth_locked(true);

			buffers.set_stencil_test(true);
			buffers.set_stencil_op(StencilOp::Replace, StencilOp::Replace, StencilOp::Replace);
			buffers.set_stencil_func(CompareFunction::Always, write_value, 0xffffffff);
			buffers.set_stencil_clear(clear_value);
			buffers.set_stencil_locked(true);
		}

		let targets = if self.base.render_to_screen {
			vec![None]
		} else {
			vec![Some(input_buffer), Some(output_buffer)]
		};

		if self.clear {
			for target in targets.iter() {
				self.clear_pass.clear(renderer, *target);
			}
		}

		for target in targets {
			renderer.render(&self.base.scene, &self.base.camera, target);
		}

		let buffers = renderer.buffers();
		buffers.set_color_locked(false);
		buffers.set_depth_locked(false);

		// Only render where the stencil is set to 1 from now on
		buffers.set_stencil_locked(false);
		buffers.set_stencil_func(CompareFunction::Equal, 1, 0xffffffff);
		buffers.set_stencil_op(StencilOp::Keep, StencilOp::Keep, StencilOp::Keep);
		buffers.set_stencil_locked(true);
	}
}
