use anyhow::Result;

use super::{load_shader, FULLSCREEN_VERTEX_SHADER};
use crate::{core::material::ShaderMaterial, libs::uniform::Uniform};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Extracts the luminance of the input.
///
/// With a threshold, luminance below it is cut off with a smooth falloff of
/// `smoothing`. With `color_output`, the input color scaled by the luminance is
/// written instead of a grey value.
pub fn create(color_output: bool, threshold: Option<f32>) -> Result<ShaderMaterial> {
	let mut material = ShaderMaterial::new(
		"LuminanceMaterial",
		load_shader(FULLSCREEN_VERTEX_SHADER)?,
		load_shader("/materials/luminance/luminance.frag")?,
	)
	.with_uniform("inputBuffer", Uniform::texture(None))
	.with_uniform("threshold", Uniform::new(threshold.unwrap_or_default()))
	.with_uniform("smoothing", Uniform::new(0.0));

	if threshold.is_some() {
		material.set_define("THRESHOLD", "1");
	}

	if color_output {
		material.set_define("COLOR", "1");
	}

	Ok(material)
}

pub fn set_threshold(material: &mut ShaderMaterial, threshold: Option<f32>) {
	match threshold {
		Some(threshold) => {
			material.set_uniform("threshold", threshold);
			material.set_define("THRESHOLD", "1");
		}
		None => material.remove_define("THRESHOLD"),
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
	fn threshold_toggles_its_define() {
		let mut material = create(true, None).unwrap();
		assert_eq!(material.define("COLOR"), Some("1"));
		assert_eq!(material.define("THRESHOLD"), None);

		set_threshold(&mut material, Some(0.8));
		assert_eq!(material.define("THRESHOLD"), Some("1"));
		assert_eq!(material.uniform("threshold").map(Uniform::float), Some(0.8));

		set_threshold(&mut material, None);
		assert_eq!(material.define("THRESHOLD"), None);
	}
}
