use std::borrow::Cow;

use rust_embed::Embed;

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// The GLSL templates and shared chunks under `src/shader/`.
#[derive(Embed)]
#[folder = "src/shader/"]
#[prefix = "/"]
pub struct ShaderAssets;

/// Where `ShaderBuilder` looks up the files named by `#include` directives.
///
/// Paths are absolute unix paths rooted at the shader folder.
pub trait ShaderFiles {
	fn load(&self, path: &str) -> Option<Cow<'static, [u8]>>;
}

impl<T: Embed> ShaderFiles for T {
	fn load(&self, path: &str) -> Option<Cow<'static, [u8]>> {
		<T as Embed>::get(path).map(|file| file.data)
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

	#[test]
	fn finds_embedded_files_by_absolute_path() {
		assert!(ShaderAssets.load("/common/packing.glsl").is_some());
		assert!(ShaderAssets.load("common/packing.glsl").is_none());
		assert!(ShaderAssets.load("/common/missing.glsl").is_none());
	}
}
