use vek::{Extent2, Rgb};

use super::{
	render_target::RenderTarget,
	scene::{Camera, Scene},
};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Limits reported by the GPU, used to warn early about shaders that won't
/// compile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Capabilities {
	pub max_fragment_uniforms: usize,
	pub max_vertex_uniforms: usize,
	pub max_varyings: usize,
}

impl Default for Capabilities {
	fn default() -> Self {
		// WebGL 1 minimums
		Self {
			max_fragment_uniforms: 16,
			max_vertex_uniforms: 128,
			max_varyings: 8,
		}
	}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StencilOp {
	Keep,
	Zero,
	Replace,
	Increment,
	Decrement,
	Invert,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompareFunction {
	Never,
	Less,
	Equal,
	LessEqual,
	Greater,
	NotEqual,
	GreaterEqual,
	Always,
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Fixed-function state of the color, depth and stencil buffers.
///
/// A locked buffer ignores further mask changes until it is unlocked.
pub trait BufferState {
	fn set_color_mask(&mut self, write: bool);
	fn set_color_locked(&mut self, locked: bool);

	fn set_depth_mask(&mut self, write: bool);
	fn set_depth_locked(&mut self, locked: bool);

	fn set_stencil_test(&mut self, enabled: bool);
	fn set_stencil_op(&mut self, fail: StencilOp, z_fail: StencilOp, z_pass: StencilOp);
	fn set_stencil_func(&mut self, func: CompareFunction, reference: u32, mask: u32);
	fn set_stencil_clear(&mut self, value: u32);
	fn set_stencil_locked(&mut self, locked: bool);
}

/// The renderer the pipeline draws with.
///
/// Everything GPU-side lives behind this trait. Render targets, textures and
/// materials are plain descriptions identified by their handles, and the
/// implementation creates, compiles and caches the GPU objects for them.
pub trait RenderContext {
	/// Draws the scene into the target, or onto the screen for `None`.
	fn render(&mut self, scene: &Scene, camera: &Camera, target: Option<&RenderTarget>);

	/// Binds a target for subsequent clears. `None` binds the screen.
	fn set_render_target(&mut self, target: Option<&RenderTarget>);

	fn clear(&mut self, color: bool, depth: bool, stencil: bool);

	fn clear_color(&self) -> Rgb<f32>;
	fn set_clear_color(&mut self, color: Rgb<f32>);
	fn clear_alpha(&self) -> f32;
	fn set_clear_alpha(&mut self, alpha: f32);

	fn auto_clear(&self) -> bool;
	fn set_auto_clear(&mut self, auto_clear: bool);

	/// The size of the canvas in logical pixels.
	fn size(&self) -> Extent2<u32>;
	fn set_size(&mut self, size: Extent2<u32>, update_style: bool);

	/// The size of the canvas in physical pixels.
	fn drawing_buffer_size(&self) -> Extent2<u32>;

	/// Whether the default frame buffer has an alpha channel.
	fn has_alpha(&self) -> bool;

	fn capabilities(&self) -> Capabilities;

	fn buffers(&mut self) -> &mut dyn BufferState;
}
