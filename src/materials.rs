pub mod convolution;
pub mod copy;
pub mod effect;
pub mod luminance;

use anyhow::{Context, Result};

use crate::{core::embed::ShaderAssets, libs::shader::ShaderBuilder};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

pub const FULLSCREEN_VERTEX_SHADER: &str = "/materials/common/fullscreen.vert";

/// Builds an embedded shader file with its includes resolved.
pub fn load_shader(path: &str) -> Result<String> {
	ShaderBuilder::new()
		.include_path(path)
		.build_source(&ShaderAssets)
		.with_context(|| format!("Could not build shader {}", path))
}
