use super::{Pass, PassBase, PassKind};
use crate::core::{context::RenderContext, disposable::Disposable, render_target::RenderTarget};

/// Disables the stencil test a [`MaskPass`](super::mask::MaskPass) enabled.
#[derive(Disposable)]
pub struct ClearMaskPass {
	#[owned]
	base: PassBase,
}

impl ClearMaskPass {
	pub fn new() -> Self {
		let mut base = PassBase::new("ClearMaskPass");
		base.needs_swap = false;

		Self { base }
	}
}

impl Default for ClearMaskPass {
	fn default() -> Self {
		Self::new()
	}
}

impl Pass for ClearMaskPass {
	fn base(&self) -> &PassBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut PassBase {
		&mut self.base
	}

	fn kind(&self) -> PassKind {
		PassKind::ClearMask
	}

	fn render(
		&mut self,
		renderer: &mut dyn RenderContext,
		_input_buffer: &RenderTarget,
		_output_buffer: &RenderTarget,
		_delta: f32,
		_stencil_test: bool,
	) {
		let buffers = renderer.buffers();
		buffers.set_stencil_locked(false);
		buffers.set_stencil_test(false);
	}
}
