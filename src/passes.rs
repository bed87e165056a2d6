pub mod clear;
pub mod clear_mask;
pub mod effect;
pub mod kawase_blur;
pub mod mask;
pub mod render;
pub mod shader;

use std::mem;

use anyhow::Result;

use crate::core::{
	context::RenderContext,
	disposable::Disposable,
	material::ShaderMaterial,
	render_target::{DepthPacking, DepthTexture, RenderTarget, TextureDataType},
	scene::{Camera, Mesh, Scene},
};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// What the composer needs to know about a pass beyond its flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PassKind {
	Generic,
	/// Renders a scene and fills the depth buffer of its target.
	Scene,
	/// Enables the stencil test for the passes that follow.
	Mask,
	/// Disables the stencil test again.
	ClearMask,
}

/// The state every pass carries.
///
/// By default the scene holds a single fullscreen mesh, created by the first
/// call to [`PassBase::set_fullscreen_material`], and the camera frames it
/// exactly.
#[derive(Debug)]
pub struct PassBase {
	pub name: String,
	pub scene: Scene,
	pub camera: Camera,
	/// Whether the composer swaps the buffers after this pass.
	pub needs_swap: bool,
	pub needs_depth_texture: bool,
	/// Renders to the screen instead of the output buffer.
	pub render_to_screen: bool,
	/// Disabled passes are skipped entirely, not even their effects update.
	pub enabled: bool,
	screen: Option<usize>,
}

impl PassBase {
	pub fn new(name: impl Into<String>) -> Self {
		Self::with_scene(name, Scene::new(), Camera::fullscreen())
	}

	pub fn with_scene(name: impl Into<String>, scene: Scene, camera: Camera) -> Self {
		Self {
			name: name.into(),
			scene,
			camera,
			needs_swap: true,
			needs_depth_texture: false,
			render_to_screen: false,
			enabled: true,
			screen: None,
		}
	}

	pub fn fullscreen_material(&self) -> Option<&ShaderMaterial> {
		self.screen
			.and_then(|index| self.scene.meshes.get(index))
			.map(|mesh| &mesh.material)
	}

	pub fn fullscreen_material_mut(&mut self) -> Option<&mut ShaderMaterial> {
		self.screen
			.and_then(|index| self.scene.meshes.get_mut(index))
			.map(|mesh| &mut mesh.material)
	}

	/// Puts the material on the fullscreen mesh and hands back the previous one.
	/// The mesh itself is only created once.
	pub fn swap_fullscreen_material(&mut self, material: ShaderMaterial) -> Option<ShaderMaterial> {
		match self.fullscreen_material_mut() {
			Some(current) => Some(mem::replace(current, material)),
			None => {
				self.scene.meshes.push(Mesh::fullscreen(material));
				self.screen = Some(self.scene.meshes.len() - 1);
				None
			}
		}
	}

	pub fn set_fullscreen_material(&mut self, material: ShaderMaterial) {
		self.swap_fullscreen_material(material);
	}

	/// Where a pass writes when it doesn't write into its input.
	pub fn output<'a>(&self, output_buffer: &'a RenderTarget) -> Option<&'a RenderTarget> {
		(!self.render_to_screen).then_some(output_buffer)
	}
}

impl Disposable for PassBase {
	fn dispose(&mut self) {
		if let Some(material) = self.fullscreen_material_mut() {
			material.dispose();
		}
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// A single step of the post-processing chain.
///
/// `render` is the only place a pass issues draw calls. The buffers are lent
/// for the duration of the call.
pub trait Pass: Disposable {
	fn base(&self) -> &PassBase;
	fn base_mut(&mut self) -> &mut PassBase;

	fn kind(&self) -> PassKind {
		PassKind::Generic
	}

	fn name(&self) -> &str {
		&self.base().name
	}

	fn render(
		&mut self,
		renderer: &mut dyn RenderContext,
		input_buffer: &RenderTarget,
		output_buffer: &RenderTarget,
		delta: f32,
		stencil_test: bool,
	);

	fn set_size(&mut self, _width: u32, _height: u32) {}

	/// Called once when the pass is added to a composer.
	fn initialize(
		&mut self,
		_renderer: &mut dyn RenderContext,
		_alpha: bool,
		_frame_buffer_type: TextureDataType,
	) -> Result<()> {
		Ok(())
	}

	fn set_depth_texture(&mut self, _depth_texture: Option<&DepthTexture>, _depth_packing: DepthPacking) {}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/
