use anyhow::Result;
use hashlink::LinkedHashMap;
use vek::{Extent2, Vec2};

use crate::{
	core::{
		embed::ShaderAssets,
		handle::Handle,
		material::ShaderMaterial,
		render_target::{DepthPacking, DepthTexture, Texture},
		scene::Camera,
	},
	effects::integration::{Section, ShaderSections},
	error::MergeError,
	libs::{
		shader::ShaderBuilder,
		uniform::{Uniform, UniformValue},
	},
};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

const FRAGMENT_TEMPLATE: &str = "/materials/effect/effect.frag";
const VERTEX_TEMPLATE: &str = "/materials/effect/effect.vert";

/// Fills the effect templates with merged effect code.
///
/// Every [`Section`] has to be present, a missing one is a
/// [`MergeError::MissingSection`].
pub fn create(
	sections: &ShaderSections,
	defines: &LinkedHashMap<String, String>,
	uniforms: &LinkedHashMap<String, Uniform>,
	camera: Option<&Camera>,
	dithering: bool,
) -> Result<ShaderMaterial> {
	let mut fragment = ShaderBuilder::new();
	fragment.include_path(FRAGMENT_TEMPLATE);
	let mut vertex = ShaderBuilder::new();
	vertex.include_path(VERTEX_TEMPLATE);

	for section in Section::ALL {
		let code = sections.get(&section).ok_or(MergeError::MissingSection(section))?;

		match section {
			Section::VertexHead | Section::VertexMainSupport => vertex.substitute(section.placeholder(), code.as_str()),
			_ => fragment.substitute(section.placeholder(), code.as_str()),
		};
	}

	let mut material = ShaderMaterial::new(
		"EffectMaterial",
		vertex.build_source(&ShaderAssets)?,
		fragment.build_source(&ShaderAssets)?,
	)
	.with_define("DEPTH_PACKING", "0")
	.with_define("ENCODE_OUTPUT", "1")
	.with_uniform("inputBuffer", Uniform::texture(None))
	.with_uniform("depthBuffer", Uniform::texture(None))
	.with_uniform("resolution", Uniform::new(Vec2::new(1.0, 1.0)))
	.with_uniform("texelSize", Uniform::new(Vec2::new(1.0, 1.0)))
	.with_uniform("cameraNear", Uniform::new(0.3))
	.with_uniform("cameraFar", Uniform::new(1000.0))
	.with_uniform("aspect", Uniform::new(1.0))
	.with_uniform("time", Uniform::new(0.0));

	for (key, value) in defines {
		material.defines.insert(key.clone(), value.clone());
	}

	for (name, uniform) in uniforms {
		material.uniforms.insert(name.clone(), uniform.clone());
	}

	if let Some(camera) = camera {
		material.adopt_camera_settings(camera);
	}

	material.dithering = dithering;

	Ok(material)
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Operations on a material built by [`create`].
pub trait EffectMaterial {
	fn set_size(&mut self, width: u32, height: u32);
	fn resolution(&self) -> Extent2<u32>;

	fn set_depth_texture(&mut self, depth_texture: Option<&DepthTexture>, depth_packing: DepthPacking);
	fn depth_texture(&self) -> Option<Handle>;
	fn depth_packing(&self) -> DepthPacking;

	fn adopt_camera_settings(&mut self, camera: &Camera);
	fn set_input_buffer(&self, texture: &Texture);

	/// Adds `delta` to the time uniform and wraps it back to `min_time` once it
	/// passes `max_time`. Returns the new time.
	fn advance_time(&self, delta: f32, min_time: f32, max_time: f32) -> f32;

	fn set_encode_output(&mut self, encode_output: bool);
	fn set_high_precision(&mut self, high_precision: bool);
}

impl EffectMaterial for ShaderMaterial {
	fn set_size(&mut self, width: u32, height: u32) {
		let w = width.max(1) as f32;
		let h = height.max(1) as f32;

		self.set_uniform("resolution", Vec2::new(w, h));
		self.set_uniform("texelSize", Vec2::new(1.0 / w, 1.0 / h));
		self.set_uniform("aspect", w / h);
	}

	fn resolution(&self) -> Extent2<u32> {
		self.uniform("resolution")
			.and_then(|u| u.get().as_vec2())
			.map(|r| Extent2::new(r.x as u32, r.y as u32))
			.unwrap_or(Extent2::new(1, 1))
	}

	fn set_depth_texture(&mut self, depth_texture: Option<&DepthTexture>, depth_packing: DepthPacking) {
		self.set_uniform("depthBuffer", UniformValue::Texture(depth_texture.map(|t| t.handle)));

		match depth_texture {
			Some(_) => self.set_define("DEPTH_PACKING", depth_packing.define_value()),
			None => self.set_define("DEPTH_PACKING", "0"),
		}
	}

	fn depth_texture(&self) -> Option<Handle> {
		self.uniform("depthBuffer").and_then(|u| u.get().as_texture())
	}

	fn depth_packing(&self) -> DepthPacking {
		match self.define("DEPTH_PACKING") {
			Some("3201") => DepthPacking::Rgba,
			_ => DepthPacking::Basic,
		}
	}

	fn adopt_camera_settings(&mut self, camera: &Camera) {
		self.set_uniform("cameraNear", camera.near);
		self.set_uniform("cameraFar", camera.far);

		if camera.is_perspective() {
			self.set_define("PERSPECTIVE_CAMERA", "1");
		} else {
			self.remove_define("PERSPECTIVE_CAMERA");
		}
	}

	fn set_input_buffer(&self, texture: &Texture) {
		self.set_uniform("inputBuffer", UniformValue::Texture(Some(texture.handle)));
	}

	fn advance_time(&self, delta: f32, min_time: f32, max_time: f32) -> f32 {
		let mut time = self.uniform("time").map(Uniform::float).unwrap_or_default() + delta;

		if time > max_time {
			time = min_time;
		}

		self.set_uniform("time", time);
		time
	}

	fn set_encode_output(&mut self, encode_output: bool) {
		if encode_output {
			self.set_define("ENCODE_OUTPUT", "1");
		} else {
			self.remove_define("ENCODE_OUTPUT");
		}
	}

	fn set_high_precision(&mut self, high_precision: bool) {
		if high_precision {
			self.set_define("FRAMEBUFFER_PRECISION_HIGH", "1");
		} else {
			self.remove_define("FRAMEBUFFER_PRECISION_HIGH");
		}
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/
