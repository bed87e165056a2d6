pub mod blend;
pub mod bloom;
pub mod chromatic_aberration;
pub mod depth;
pub mod integration;
pub mod noise;
pub mod pixelation;
pub mod vignette;

use bitflags::bitflags;
use hashlink::{LinkedHashMap, LinkedHashSet};

use self::blend::{BlendFunction, BlendMode};
use crate::{
	core::{
		context::RenderContext,
		disposable::Disposable,
		material::Extension,
		render_target::{DepthPacking, DepthTexture, RenderTarget, TextureDataType},
	},
	libs::uniform::Uniform,
};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

bitflags! {
	/// Requirements an effect places on the pass it is merged into.
	#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
	pub struct EffectAttributes: u8 {
		const NONE = 0;
		/// Reads the shared depth texture.
		const DEPTH = 1;
		/// Samples neighbouring texels, only one such effect fits in a pass.
		const CONVOLUTION = 2;
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[derive(Clone, Debug)]
pub struct EffectOptions {
	pub attributes: EffectAttributes,
	pub blend_function: BlendFunction,
	pub opacity: f32,
	pub defines: LinkedHashMap<String, String>,
	pub uniforms: LinkedHashMap<String, Uniform>,
	pub extensions: LinkedHashSet<Extension>,
	pub vertex_shader: Option<String>,
}

impl Default for EffectOptions {
	fn default() -> Self {
		Self {
			attributes: EffectAttributes::NONE,
			blend_function: BlendFunction::Screen,
			opacity: 1.0,
			defines: LinkedHashMap::new(),
			uniforms: LinkedHashMap::new(),
			extensions: LinkedHashSet::new(),
			vertex_shader: None,
		}
	}
}

/// The shader side of an effect: GLSL snippets, macros, uniforms and the
/// way the result is blended.
///
/// The fragment shader provides `mainImage` and/or `mainUv`, the optional
/// vertex shader may provide `mainSupport`. Every change that alters the
/// generated code bumps the revision, which the owning pass compares to
/// decide whether it needs to recompile.
#[derive(Clone, Debug)]
pub struct EffectShader {
	name: String,
	attributes: EffectAttributes,
	blend_mode: BlendMode,
	fragment_shader: String,
	vertex_shader: Option<String>,
	defines: LinkedHashMap<String, String>,
	uniforms: LinkedHashMap<String, Uniform>,
	extensions: LinkedHashSet<Extension>,
	revision: u64,
}

impl EffectShader {
	pub fn new(name: impl Into<String>, fragment_shader: impl Into<String>, options: EffectOptions) -> Self {
		Self {
			name: name.into(),
			attributes: options.attributes,
			blend_mode: BlendMode::with_opacity(options.blend_function, options.opacity),
			fragment_shader: fragment_shader.into(),
			vertex_shader: options.vertex_shader,
			defines: options.defines,
			uniforms: options.uniforms,
			extensions: options.extensions,
			revision: 0,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn revision(&self) -> u64 {
		self.revision
	}

	fn touch(&mut self) {
		self.revision += 1;
	}

	pub fn attributes(&self) -> EffectAttributes {
		self.attributes
	}

	pub fn set_attributes(&mut self, attributes: EffectAttributes) {
		if self.attributes != attributes {
			self.attributes = attributes;
			self.touch();
		}
	}

	pub fn blend_mode(&self) -> &BlendMode {
		&self.blend_mode
	}

	pub fn set_blend_function(&mut self, blend_function: BlendFunction) {
		if self.blend_mode.blend_function != blend_function {
			self.blend_mode.blend_function = blend_function;
			self.touch();
		}
	}

	pub fn fragment_shader(&self) -> &str {
		&self.fragment_shader
	}

	pub fn set_fragment_shader(&mut self, fragment_shader: impl Into<String>) {
		self.fragment_shader = fragment_shader.into();
		self.touch();
	}

	pub fn vertex_shader(&self) -> Option<&str> {
		self.vertex_shader.as_deref()
	}

	pub fn set_vertex_shader(&mut self, vertex_shader: Option<String>) {
		self.vertex_shader = vertex_shader;
		self.touch();
	}

	pub fn defines(&self) -> &LinkedHashMap<String, String> {
		&self.defines
	}

	pub fn define(&self, key: &str) -> Option<&str> {
		self.defines.get(key).map(String::as_str)
	}

	pub fn set_define(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();

		if self.defines.get(&key) != Some(&value) {
			self.defines.insert(key, value);
			self.touch();
		}
	}

	pub fn remove_define(&mut self, key: &str) {
		if self.defines.remove(key).is_some() {
			self.touch();
		}
	}

	pub fn uniforms(&self) -> &LinkedHashMap<String, Uniform> {
		&self.uniforms
	}

	pub fn uniform(&self, name: &str) -> Option<&Uniform> {
		self.uniforms.get(name)
	}

	/// Declares a new uniform. Setting the value of an existing one goes through
	/// the [`Uniform`] itself and needs no recompile.
	pub fn add_uniform(&mut self, name: impl Into<String>, uniform: Uniform) {
		self.uniforms.insert(name.into(), uniform);
		self.touch();
	}

	pub fn extensions(&self) -> &LinkedHashSet<Extension> {
		&self.extensions
	}

	pub fn add_extension(&mut self, extension: Extension) {
		if self.extensions.insert(extension) {
			self.touch();
		}
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// A unit of image processing that an `EffectPass` merges with others into
/// one shader.
///
/// Disposing an effect releases the resources it created, never the ones it
/// was handed.
pub trait Effect: Disposable {
	fn shader(&self) -> &EffectShader;
	fn shader_mut(&mut self) -> &mut EffectShader;

	fn name(&self) -> &str {
		self.shader().name()
	}

	/// Runs once per frame before the merged shader draws, even if the pass ends
	/// up skipping the draw.
	fn update(&mut self, _renderer: &mut dyn RenderContext, _input_buffer: &RenderTarget, _delta: f32) {}

	fn set_size(&mut self, _width: u32, _height: u32) {}

	fn initialize(&mut self, _renderer: &mut dyn RenderContext, _alpha: bool, _frame_buffer_type: TextureDataType) {}

	fn set_depth_texture(&mut self, _depth_texture: Option<&DepthTexture>, _depth_packing: DepthPacking) {}
}

/// An effect made of nothing but caller-supplied GLSL.
#[derive(Disposable)]
pub struct ShaderEffect {
	shader: EffectShader,
}

impl ShaderEffect {
	pub fn new(name: impl Into<String>, fragment_shader: impl Into<String>, options: EffectOptions) -> Self {
		Self {
			shader: EffectShader::new(name, fragment_shader, options),
		}
	}
}

impl Effect for ShaderEffect {
	fn shader(&self) -> &EffectShader {
		&self.shader
	}

	fn shader_mut(&mut self) -> &mut EffectShader {
		&mut self.shader
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[cfg(test)]
mod tests {
	use super::*;

	const IMAGE: &str = "void mainImage(const in vec4 inputColor, const in vec2 uv, out vec4 outputColor) { outputColor = inputColor; }";

	#[test]
	fn defaults() {
		let effect = ShaderEffect::new("Plain", IMAGE, EffectOptions::default());
		let shader = effect.shader();

		assert_eq!(effect.name(), "Plain");
		assert_eq!(shader.attributes(), EffectAttributes::NONE);
		assert_eq!(shader.blend_mode().blend_function, BlendFunction::Screen);
		assert_eq!(shader.blend_mode().opacity.float(), 1.0);
		assert!(shader.vertex_shader().is_none());
		assert!(shader.defines().is_empty());
		assert!(shader.uniforms().is_empty());
		assert!(shader.extensions().is_empty());
	}

	#[test]
	fn code_changes_bump_the_revision() {
		let mut shader = EffectShader::new("Plain", IMAGE, EffectOptions::default());

		shader.set_define("SAMPLES", "4");
		assert_eq!(shader.revision(), 1);
		shader.set_define("SAMPLES", "4");
		assert_eq!(shader.revision(), 1);

		shader.set_blend_function(BlendFunction::Normal);
		shader.add_uniform("strength", Uniform::new(1.0));
		shader.add_extension(Extension::Derivatives);
		assert_eq!(shader.revision(), 4);

		// Uniform values are shared, not part of the code
		shader.blend_mode().opacity.set(0.5);
		shader.uniform("strength").unwrap().set(2.0);
		assert_eq!(shader.revision(), 4);
	}

	#[test]
	fn attributes_order_by_bits() {
		let mut attributes = vec![
			EffectAttributes::NONE,
			EffectAttributes::DEPTH | EffectAttributes::CONVOLUTION,
			EffectAttributes::DEPTH,
			EffectAttributes::CONVOLUTION,
		];
		attributes.sort_by(|a, b| b.bits().cmp(&a.bits()));

		assert_eq!(
			attributes,
			vec![
				EffectAttributes::DEPTH | EffectAttributes::CONVOLUTION,
				EffectAttributes::CONVOLUTION,
				EffectAttributes::DEPTH,
				EffectAttributes::NONE,
			]
		);
	}
}
