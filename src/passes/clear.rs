use vek::Rgb;

use super::{Pass, PassBase};
use crate::core::{
	context::RenderContext,
	disposable::Disposable,
	render_target::RenderTarget,
};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Clears the input buffer, or the screen.
///
/// An override color or alpha is only applied for the clear itself, the
/// renderer's own clear values are restored afterwards.
#[derive(Disposable)]
pub struct ClearPass {
	#[owned]
	base: PassBase,
	pub color: bool,
	pub depth: bool,
	pub stencil: bool,
	pub override_clear_color: Option<Rgb<f32>>,
	pub override_clear_alpha: Option<f32>,
	saved_clear_color: Rgb<f32>,
}

impl ClearPass {
	pub fn new(color: bool, depth: bool, stencil: bool) -> Self {
		let mut base = PassBase::new("ClearPass");
		base.needs_swap = false;

		Self {
			base,
			color,
			depth,
			stencil,
			override_clear_color: None,
			override_clear_alpha: None,
			saved_clear_color: Rgb::new(0.0, 0.0, 0.0),
		}
	}

	/// Clears the target, `None` being the screen.
	pub fn clear(&mut self, renderer: &mut dyn RenderContext, target: Option<&RenderTarget>) {
		let clear_alpha = renderer.clear_alpha();

		match (self.override_clear_color, self.override_clear_alpha) {
			(Some(color), alpha) => {
				self.saved_clear_color = renderer.clear_color();
				renderer.set_clear_color(color);
				renderer.set_clear_alpha(alpha.unwrap_or(clear_alpha));
			}
			(None, Some(alpha)) => renderer.set_clear_alpha(alpha),
			(None, None) => {}
		}

		renderer.set_render_target(target);
		renderer.clear(self.color, self.depth, self.stencil);

		match (self.override_clear_color, self.override_clear_alpha) {
			(Some(_), _) => {
				renderer.set_clear_color(self.saved_clear_color);
				renderer.set_clear_alpha(clear_alpha);
			}
			(None, Some(_)) => renderer.set_clear_alpha(clear_alpha),
			(None, None) => {}
		}
	}
}

impl Default for ClearPass {
	fn default() -> Self {
		Self::new(true, true, false)
	}
}

impl Pass for ClearPass {
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
		_output_buffer: &RenderTarget,
		_delta: f32,
		_stencil_test: bool,
	) {
		let target = (!self.base.render_to_screen).then_some(input_buffer);
		self.clear(renderer, target);
	}
}
