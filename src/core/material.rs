use hashlink::{LinkedHashMap, LinkedHashSet};
use log::debug;

use super::disposable::Disposable;
use crate::libs::uniform::{Uniform, UniformValue};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Shader language extensions a material may need enabled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Extension {
	Derivatives,
	FragDepth,
	DrawBuffers,
	ShaderTextureLod,
}

impl Extension {
	pub fn name(&self) -> &'static str {
		match self {
			Extension::Derivatives => "derivatives",
			Extension::FragDepth => "fragDepth",
			Extension::DrawBuffers => "drawBuffers",
			Extension::ShaderTextureLod => "shaderTextureLOD",
		}
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Everything the render context needs to compile and run a shader program.
///
/// Defines are emitted as `#define KEY VALUE` lines ahead of both shaders.
/// Changing a define or the sources sets `needs_update`, which tells the
/// render context to recompile.
#[derive(Clone, Debug)]
pub struct ShaderMaterial {
	pub name: String,
	pub vertex_shader: String,
	pub fragment_shader: String,
	pub defines: LinkedHashMap<String, String>,
	pub uniforms: LinkedHashMap<String, Uniform>,
	pub extensions: LinkedHashSet<Extension>,
	pub depth_test: bool,
	pub depth_write: bool,
	pub dithering: bool,
	pub needs_update: bool,
	disposed: bool,
}

impl ShaderMaterial {
	pub fn new(name: impl Into<String>, vertex_shader: impl Into<String>, fragment_shader: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			vertex_shader: vertex_shader.into(),
			fragment_shader: fragment_shader.into(),
			defines: LinkedHashMap::new(),
			uniforms: LinkedHashMap::new(),
			extensions: LinkedHashSet::new(),
			depth_test: false,
			depth_write: false,
			dithering: false,
			needs_update: true,
			disposed: false,
		}
	}

	pub fn with_uniform(mut self, name: impl Into<String>, uniform: Uniform) -> Self {
		self.uniforms.insert(name.into(), uniform);
		self
	}

	pub fn with_define(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.defines.insert(key.into(), value.into());
		self
	}

	pub fn uniform(&self, name: &str) -> Option<&Uniform> {
		self.uniforms.get(name)
	}

	/// Writes to an existing uniform. Returns false if there is no such uniform.
	pub fn set_uniform(&self, name: &str, value: impl Into<UniformValue>) -> bool {
		match self.uniforms.get(name) {
			Some(uniform) => {
				uniform.set(value);
				true
			}
			None => false,
		}
	}

	pub fn define(&self, key: &str) -> Option<&str> {
		self.defines.get(key).map(String::as_str)
	}

	pub fn set_define(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();

		if self.defines.get(&key) != Some(&value) {
			self.defines.insert(key, value);
			self.needs_update = true;
		}
	}

	pub fn remove_define(&mut self, key: &str) {
		if self.defines.remove(key).is_some() {
			self.needs_update = true;
		}
	}

	pub fn is_disposed(&self) -> bool {
		self.disposed
	}
}

impl Disposable for ShaderMaterial {
	fn dispose(&mut self) {
		if !self.disposed {
			debug!("Disposing material '{}'", self.name);
			self.disposed = true;
		}
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/
