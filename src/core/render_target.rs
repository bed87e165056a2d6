use log::debug;
use serde::{Deserialize, Serialize};
use vek::Extent2;

use super::{disposable::Disposable, handle::Handle};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureFormat {
	Rgb,
	#[default]
	Rgba,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureDataType {
	#[default]
	UnsignedByte,
	HalfFloat,
	Float,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
	Nearest,
	#[default]
	Linear,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DepthFormat {
	#[default]
	Depth,
	DepthStencil,
}

/// How depth values are stored in a depth texture. The numeric values are the
/// ones the GLSL `DEPTH_PACKING` define compares against.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DepthPacking {
	#[default]
	Basic = 3200,
	Rgba = 3201,
}

impl DepthPacking {
	pub fn define_value(&self) -> String {
		(*self as u32).to_string()
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// A color texture. Cloning copies the reference, [`Texture::duplicate`]
/// describes new storage with the same settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
	pub handle: Handle,
	pub name: String,
	pub format: TextureFormat,
	pub data_type: TextureDataType,
	pub filter: FilterMode,
	pub generate_mipmaps: bool,
}

impl Texture {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			handle: Handle::unique(),
			name: name.into(),
			format: TextureFormat::default(),
			data_type: TextureDataType::default(),
			filter: FilterMode::default(),
			generate_mipmaps: false,
		}
	}

	pub fn duplicate(&self) -> Self {
		Self {
			handle: Handle::unique(),
			..self.clone()
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct DepthTexture {
	pub handle: Handle,
	pub format: DepthFormat,
	disposed: bool,
}

impl DepthTexture {
	pub fn new(format: DepthFormat) -> Self {
		Self {
			handle: Handle::unique(),
			format,
			disposed: false,
		}
	}

	pub fn duplicate(&self) -> Self {
		Self::new(self.format)
	}

	pub fn is_disposed(&self) -> bool {
		self.disposed
	}
}

impl Disposable for DepthTexture {
	fn dispose(&mut self) {
		if !self.disposed {
			debug!("Disposing depth texture {:?}", self.handle);
			self.disposed = true;
		}
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[derive(Clone, Debug, PartialEq)]
pub struct RenderTargetOptions {
	pub depth_buffer: bool,
	pub stencil_buffer: bool,
	pub format: TextureFormat,
	pub data_type: TextureDataType,
	pub filter: FilterMode,
	pub samples: u32,
}

impl Default for RenderTargetOptions {
	fn default() -> Self {
		Self {
			depth_buffer: true,
			stencil_buffer: false,
			format: TextureFormat::Rgba,
			data_type: TextureDataType::UnsignedByte,
			filter: FilterMode::Linear,
			samples: 0,
		}
	}
}

/// A 2D texture-backed frame buffer, described on this side and materialised
/// by the render context the first time it is used.
#[derive(Debug, PartialEq)]
pub struct RenderTarget {
	pub handle: Handle,
	size: Extent2<u32>,
	pub texture: Texture,
	pub depth_buffer: bool,
	pub stencil_buffer: bool,
	pub depth_texture: Option<DepthTexture>,
	pub samples: u32,
	disposed: bool,
}

impl RenderTarget {
	pub fn new(width: u32, height: u32, options: RenderTargetOptions) -> Self {
		let mut texture = Texture::new("");
		texture.format = options.format;
		texture.data_type = options.data_type;
		texture.filter = options.filter;

		Self {
			handle: Handle::unique(),
			size: Extent2::new(width, height),
			texture,
			depth_buffer: options.depth_buffer,
			stencil_buffer: options.stencil_buffer,
			depth_texture: None,
			samples: options.samples,
			disposed: false,
		}
	}

	/// Names the color texture, which shows up in GPU debuggers.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.texture.name = name.into();
		self
	}

	pub fn size(&self) -> Extent2<u32> {
		self.size
	}

	pub fn width(&self) -> u32 {
		self.size.w
	}

	pub fn height(&self) -> u32 {
		self.size.h
	}

	pub fn set_size(&mut self, width: u32, height: u32) {
		self.size = Extent2::new(width, height);
	}

	pub fn is_disposed(&self) -> bool {
		self.disposed
	}
}

/// The clone describes new GPU storage with the same size and settings. An
/// attached depth texture is duplicated as well, since sharing it between two
/// targets loses depth information.
impl Clone for RenderTarget {
	fn clone(&self) -> Self {
		Self {
			handle: Handle::unique(),
			size: self.size,
			texture: self.texture.duplicate(),
			depth_buffer: self.depth_buffer,
			stencil_buffer: self.stencil_buffer,
			depth_texture: self.depth_texture.as_ref().map(DepthTexture::duplicate),
			samples: self.samples,
			disposed: false,
		}
	}
}

impl Disposable for RenderTarget {
	fn dispose(&mut self) {
		if !self.disposed {
			debug!("Disposing render target '{}' {:?}", self.texture.name, self.handle);
			self.disposed = true;
		}
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
	fn clone_refers_to_new_storage() {
		let mut target = RenderTarget::new(4, 2, RenderTargetOptions::default()).with_name("Buffer");
		target.depth_texture = Some(DepthTexture::new(DepthFormat::Depth));

		let clone = target.clone();
		assert_ne!(clone.handle, target.handle);
		assert_ne!(clone.texture.handle, target.texture.handle);
		assert_eq!(clone.texture.name, "Buffer");
		assert_eq!(clone.size(), target.size());
		assert_ne!(
			clone.depth_texture.as_ref().map(|t| t.handle),
			target.depth_texture.as_ref().map(|t| t.handle)
		);
	}

	#[test]
	fn disposing_twice_is_harmless() {
		let mut target = RenderTarget::new(1, 1, RenderTargetOptions::default());
		target.dispose();
		target.dispose();
		assert!(target.is_disposed());
	}
}
