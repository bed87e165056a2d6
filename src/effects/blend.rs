use crate::libs::uniform::Uniform;

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// How the output of an effect is combined with the color it received.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendFunction {
	/// Leaves the effect out of the merged shader.
	Skip,
	Add,
	Alpha,
	Average,
	ColorBurn,
	ColorDodge,
	Darken,
	Difference,
	Exclusion,
	Lighten,
	Multiply,
	Divide,
	Negation,
	Normal,
	Overlay,
	Reflect,
	#[default]
	Screen,
	SoftLight,
	Subtract,
}

impl BlendFunction {
	pub const ALL: [BlendFunction; 19] = [
		BlendFunction::Skip,
		BlendFunction::Add,
		BlendFunction::Alpha,
		BlendFunction::Average,
		BlendFunction::ColorBurn,
		BlendFunction::ColorDodge,
		BlendFunction::Darken,
		BlendFunction::Difference,
		BlendFunction::Exclusion,
		BlendFunction::Lighten,
		BlendFunction::Multiply,
		BlendFunction::Divide,
		BlendFunction::Negation,
		BlendFunction::Normal,
		BlendFunction::Overlay,
		BlendFunction::Reflect,
		BlendFunction::Screen,
		BlendFunction::SoftLight,
		BlendFunction::Subtract,
	];

	/// The numeric id, used to give every blend function its own GLSL name.
	pub fn id(&self) -> u32 {
		*self as u32
	}

	/// The GLSL source defining `vec4 blend(const in vec4 x, const in vec4 y,
	/// const in float opacity)`, or `None` for [`BlendFunction::Skip`].
	#[rustfmt::skip]
	pub fn shader_code(&self) -> Option<&'static str> {
		match self {
			BlendFunction::Skip       => None,
			BlendFunction::Add        => Some(include_str!("../shader/blend/add.frag")),
			BlendFunction::Alpha      => Some(include_str!("../shader/blend/alpha.frag")),
			BlendFunction::Average    => Some(include_str!("../shader/blend/average.frag")),
			BlendFunction::ColorBurn  => Some(include_str!("../shader/blend/color_burn.frag")),
			BlendFunction::ColorDodge => Some(include_str!("../shader/blend/color_dodge.frag")),
			BlendFunction::Darken     => Some(include_str!("../shader/blend/darken.frag")),
			BlendFunction::Difference => Some(include_str!("../shader/blend/difference.frag")),
			BlendFunction::Exclusion  => Some(include_str!("../shader/blend/exclusion.frag")),
			BlendFunction::Lighten    => Some(include_str!("../shader/blend/lighten.frag")),
			BlendFunction::Multiply   => Some(include_str!("../shader/blend/multiply.frag")),
			BlendFunction::Divide     => Some(include_str!("../shader/blend/divide.frag")),
			BlendFunction::Negation   => Some(include_str!("../shader/blend/negation.frag")),
			BlendFunction::Normal     => Some(include_str!("../shader/blend/normal.frag")),
			BlendFunction::Overlay    => Some(include_str!("../shader/blend/overlay.frag")),
			BlendFunction::Reflect    => Some(include_str!("../shader/blend/reflect.frag")),
			BlendFunction::Screen     => Some(include_str!("../shader/blend/screen.frag")),
			BlendFunction::SoftLight  => Some(include_str!("../shader/blend/soft_light.frag")),
			BlendFunction::Subtract   => Some(include_str!("../shader/blend/subtract.frag")),
		}
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[derive(Clone, Debug, PartialEq)]
pub struct BlendMode {
	pub blend_function: BlendFunction,
	/// Shared with the merged material, so changing it needs no recompile.
	pub opacity: Uniform,
}

impl BlendMode {
	pub fn new(blend_function: BlendFunction) -> Self {
		Self::with_opacity(blend_function, 1.0)
	}

	pub fn with_opacity(blend_function: BlendFunction, opacity: f32) -> Self {
		Self {
			blend_function,
			opacity: Uniform::new(opacity),
		}
	}

	pub fn shader_code(&self) -> Option<&'static str> {
		self.blend_function.shader_code()
	}
}

impl Default for BlendMode {
	fn default() -> Self {
		Self::new(BlendFunction::default())
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
	fn every_function_but_skip_has_a_blend_body() {
		for blend_function in BlendFunction::ALL {
			match blend_function.shader_code() {
				None => assert_eq!(blend_function, BlendFunction::Skip),
				Some(code) => {
					assert!(!code.trim().is_empty());
					assert!(
						code.contains("vec4 blend(const in vec4 x, const in vec4 y, const in float opacity)"),
						"{:?} has no blend function",
						blend_function
					);
				}
			}
		}
	}

	#[test]
	fn ids_follow_declaration_order() {
		for (i, blend_function) in BlendFunction::ALL.iter().enumerate() {
			assert_eq!(blend_function.id(), i as u32);
		}
		assert_eq!(BlendFunction::Normal.id(), 13);
		assert_eq!(BlendFunction::Subtract.id(), 18);
	}

	#[test]
	fn defaults_to_opaque_screen() {
		let blend_mode = BlendMode::default();
		assert_eq!(blend_mode.blend_function, BlendFunction::Screen);
		assert_eq!(blend_mode.opacity.float(), 1.0);
	}
}
