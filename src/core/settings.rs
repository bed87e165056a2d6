use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::render_target::TextureDataType;

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// How an `EffectComposer` sets up its frame buffers.
///
/// Can be read from a RON document, missing fields keep their defaults:
///
/// ```ron
/// (
///     stencil_buffer: true,
///     multisampling: 4,
///     frame_buffer_type: HalfFloat,
/// )
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerSettings {
	pub depth_buffer: bool,
	pub stencil_buffer: bool,
	/// Number of MSAA samples, 0 disables multisampling.
	pub multisampling: u32,
	pub frame_buffer_type: TextureDataType,
	/// Makes the last pass added render to the screen.
	pub auto_render_to_screen: bool,
}

impl Default for ComposerSettings {
	fn default() -> Self {
		Self {
			depth_buffer: true,
			stencil_buffer: false,
			multisampling: 0,
			frame_buffer_type: TextureDataType::UnsignedByte,
			auto_render_to_screen: true,
		}
	}
}

impl ComposerSettings {
	pub fn from_ron(source: &str) -> Result<Self> {
		ron::from_str(source).context("Could not parse composer settings")
	}

	pub fn to_ron(&self) -> Result<String> {
		ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).context("Could not serialize composer settings")
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/
