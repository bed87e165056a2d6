use anyhow::Result;

use super::{load_shader, FULLSCREEN_VERTEX_SHADER};
use crate::{core::material::ShaderMaterial, libs::uniform::Uniform};

/// Copies the `inputBuffer` texture, scaled by `opacity`.
pub fn create() -> Result<ShaderMaterial> {
	Ok(ShaderMaterial::new(
		"CopyMaterial",
		load_shader(FULLSCREEN_VERTEX_SHADER)?,
		load_shader("/materials/copy/copy.frag")?,
	)
	.with_uniform("inputBuffer", Uniform::texture(None))
	.with_uniform("opacity", Uniform::new(1.0)))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn copies_at_full_opacity() {
		let material = create().unwrap();

		assert_eq!(material.uniform("opacity").map(Uniform::float), Some(1.0));
		assert!(material.fragment_shader.contains("opacity * texel"));
		assert!(material.vertex_shader.contains("vUv"));
		assert!(!material.depth_write);
	}
}
