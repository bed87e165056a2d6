use anyhow::Result;
use vek::Vec2;

use super::load_shader;
use crate::{core::material::ShaderMaterial, libs::uniform::Uniform};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// One iteration of a Kawase blur: four bilinear taps at a distance of
/// `kernel + 0.5` texels, scaled by `scale`.
pub fn create() -> Result<ShaderMaterial> {
	Ok(ShaderMaterial::new(
		"KawaseBlurMaterial",
		load_shader("/materials/convolution/kawase.vert")?,
		load_shader("/materials/convolution/kawase.frag")?,
	)
	.with_uniform("inputBuffer", Uniform::texture(None))
	.with_uniform("texelSize", Uniform::new(Vec2::new(1.0, 1.0)))
	.with_uniform("scale", Uniform::new(1.0))
	.with_uniform("kernel", Uniform::new(0.0)))
}

pub fn set_texel_size(material: &ShaderMaterial, width: u32, height: u32) {
	material.set_uniform(
		"texelSize",
		Vec2::new(1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32),
	);
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/
