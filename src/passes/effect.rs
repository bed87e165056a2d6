use anyhow::Result;
use log::{debug, error, trace, warn};

use super::{Pass, PassBase};
use crate::{
	core::{
		context::RenderContext,
		disposable::Disposable,
		render_target::{DepthPacking, DepthTexture, RenderTarget, TextureDataType},
		scene::Camera,
	},
	effects::{
		integration::{self, ShaderSections},
		Effect,
	},
	materials::effect::{self as effect_material, EffectMaterial},
};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Merges any number of effects into one fullscreen shader.
///
/// Effects are ordered by their attributes, highest first, and merged once on
/// construction. Changing the code of an effect later triggers a full rebuild
/// the next time the pass renders.
#[derive(Disposable)]
pub struct EffectPass {
	#[owned]
	base: PassBase,
	#[owned]
	effects: Vec<Box<dyn Effect>>,
	main_camera: Camera,
	sections: ShaderSections,
	revisions: Vec<u64>,
	uniform_count: usize,
	varying_count: usize,
	skip_rendering: bool,
	depth_texture: Option<DepthTexture>,
	depth_packing: DepthPacking,
	dithering: bool,
	encode_output: bool,
	high_precision: bool,
	/// Where the time uniform restarts once it exceeds `max_time`.
	pub min_time: f32,
	pub max_time: f32,
}

impl EffectPass {
	pub fn new(camera: &Camera, mut effects: Vec<Box<dyn Effect>>) -> Result<Self> {
		// Stable, so effects with equal attributes keep their order
		effects.sort_by(|a, b| b.shader().attributes().bits().cmp(&a.shader().attributes().bits()));

		let mut pass = Self {
			base: PassBase::new("EffectPass"),
			effects,
			main_camera: camera.clone(),
			sections: ShaderSections::new(),
			revisions: Vec::new(),
			uniform_count: 0,
			varying_count: 0,
			skip_rendering: false,
			depth_texture: None,
			depth_packing: DepthPacking::Basic,
			dithering: false,
			encode_output: true,
			high_precision: false,
			min_time: 1.0,
			max_time: 1000.0,
		};

		pass.update_material()?;
		Ok(pass)
	}

	pub fn effects(&self) -> &[Box<dyn Effect>] {
		&self.effects
	}

	/// Effects can be reconfigured through here, code changes are picked up on
	/// the next render or an explicit [`EffectPass::recompile`].
	pub fn effects_mut(&mut self) -> &mut [Box<dyn Effect>] {
		&mut self.effects
	}

	/// True if no effect made it into the shader, nothing gets drawn then.
	pub fn skip_rendering(&self) -> bool {
		self.skip_rendering
	}

	pub fn uniform_count(&self) -> usize {
		self.uniform_count
	}

	pub fn varying_count(&self) -> usize {
		self.varying_count
	}

	/// The merged code of the current material.
	pub fn sections(&self) -> &ShaderSections {
		&self.sections
	}

	pub fn dithering(&self) -> bool {
		self.dithering
	}

	pub fn set_dithering(&mut self, dithering: bool) {
		self.dithering = dithering;
		if let Some(material) = self.base.fullscreen_material_mut() {
			material.dithering = dithering;
			material.needs_update = true;
		}
	}

	pub fn encode_output(&self) -> bool {
		self.encode_output
	}

	pub fn set_encode_output(&mut self, encode_output: bool) {
		self.encode_output = encode_output;
		if let Some(material) = self.base.fullscreen_material_mut() {
			material.set_encode_output(encode_output);
		}
	}

	pub fn main_camera(&self) -> &Camera {
		&self.main_camera
	}

	pub fn set_main_camera(&mut self, camera: &Camera) {
		self.main_camera = camera.clone();
		if let Some(material) = self.base.fullscreen_material_mut() {
			material.adopt_camera_settings(camera);
		}
	}

	fn effect_revisions(&self) -> Vec<u64> {
		self.effects.iter().map(|effect| effect.shader().revision()).collect()
	}

	/// Merges the effects into a new material. The current material stays in
	/// place if merging fails.
	fn update_material(&mut self) -> Result<()> {
		let merged = integration::merge(&self.effects)?;

		let mut material = effect_material::create(
			&merged.sections,
			&merged.defines,
			&merged.uniforms,
			Some(&self.main_camera),
			self.dithering,
		)?;
		material.extensions.extend(merged.extensions.iter().copied());
		material.set_encode_output(self.encode_output);
		material.set_high_precision(self.high_precision);

		self.base.needs_depth_texture = merged.needs_depth_texture();
		self.skip_rendering = merged.skip_rendering();
		self.base.needs_swap = !self.skip_rendering;
		self.uniform_count = merged.uniform_count();
		self.varying_count = merged.varying_count;
		self.sections = merged.sections;
		self.revisions = self.effect_revisions();

		if let Some(mut previous) = self.base.swap_fullscreen_material(material) {
			previous.dispose();
		}

		debug!(
			"Merged {} of {} effects, {} uniforms and {} varyings",
			merged.integrated,
			self.effects.len(),
			self.uniform_count,
			self.varying_count
		);

		Ok(())
	}

	/// Rebuilds the material from scratch, keeping its size and depth texture.
	pub fn recompile(&mut self) -> Result<()> {
		let resolution = self.base.fullscreen_material().map(|material| material.resolution());

		self.update_material()?;

		if let Some(material) = self.base.fullscreen_material_mut() {
			if let Some(resolution) = resolution {
				material.set_size(resolution.w, resolution.h);
			}
			material.set_depth_texture(self.depth_texture.as_ref(), self.depth_packing);
		}

		Ok(())
	}
}

impl Pass for EffectPass {
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
		delta: f32,
		_stencil_test: bool,
	) {
		for effect in self.effects.iter_mut() {
			effect.update(renderer, input_buffer, delta);
		}

		let revisions = self.effect_revisions();
		if revisions != self.revisions {
			// Don't retry every frame if the new configuration doesn't merge
			self.revisions = revisions;

			if let Err(e) = self.recompile() {
				error!("Could not recompile {}, keeping the previous shader: {:#}", self.base.name, e);
			}
		}

		if self.skip_rendering && !self.base.render_to_screen {
			trace!("Skipping {}", self.base.name);
			return;
		}

		if let Some(material) = self.base.fullscreen_material() {
			material.set_input_buffer(&input_buffer.texture);
			material.advance_time(delta, self.min_time, self.max_time);
		}

		renderer.render(&self.base.scene, &self.base.camera, self.base.output(output_buffer));
	}

	fn set_size(&mut self, width: u32, height: u32) {
		if let Some(material) = self.base.fullscreen_material_mut() {
			material.set_size(width, height);
		}

		for effect in self.effects.iter_mut() {
			effect.set_size(width, height);
		}
	}

	fn initialize(
		&mut self,
		renderer: &mut dyn RenderContext,
		alpha: bool,
		frame_buffer_type: TextureDataType,
	) -> Result<()> {
		for effect in self.effects.iter_mut() {
			effect.initialize(renderer, alpha, frame_buffer_type);
		}

		self.high_precision = frame_buffer_type != TextureDataType::UnsignedByte;
		self.recompile()?;

		let capabilities = renderer.capabilities();

		let max_uniforms = capabilities.max_fragment_uniforms.min(capabilities.max_vertex_uniforms);
		if self.uniform_count > max_uniforms {
			warn!(
				"The current rendering context doesn't support more than {} uniforms, but {} were defined",
				max_uniforms, self.uniform_count
			);
		}

		if self.varying_count > capabilities.max_varyings {
			warn!(
				"The current rendering context doesn't support more than {} varyings, but {} were defined",
				capabilities.max_varyings, self.varying_count
			);
		}

		Ok(())
	}

	fn set_depth_texture(&mut self, depth_texture: Option<&DepthTexture>, depth_packing: DepthPacking) {
		self.depth_texture = depth_texture.cloned();
		self.depth_packing = depth_packing;

		if let Some(material) = self.base.fullscreen_material_mut() {
			material.set_depth_texture(depth_texture, depth_packing);
		}

		for effect in self.effects.iter_mut() {
			effect.set_depth_texture(depth_texture, depth_packing);
		}
	}
}
