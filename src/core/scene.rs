use super::{handle::Handle, material::ShaderMaterial};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Projection {
	Orthographic {
		left: f32,
		right: f32,
		top: f32,
		bottom: f32,
	},
	Perspective {
		fov: f32,
		aspect: f32,
	},
}

/// A camera as far as post-processing is concerned: a handle the render
/// context knows, plus the clip planes some effects need to linearise depth.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
	pub handle: Handle,
	pub projection: Projection,
	pub near: f32,
	pub far: f32,
}

impl Camera {
	pub fn orthographic(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
		Self {
			handle: Handle::unique(),
			projection: Projection::Orthographic { left, right, top, bottom },
			near,
			far,
		}
	}

	pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
		Self {
			handle: Handle::unique(),
			projection: Projection::Perspective { fov, aspect },
			near,
			far,
		}
	}

	/// Frames exactly the [-1, 1] square.
	pub fn fullscreen() -> Self {
		Self::orthographic(-1.0, 1.0, 1.0, -1.0, 0.0, 1.0)
	}

	pub fn is_perspective(&self) -> bool {
		matches!(self.projection, Projection::Perspective { .. })
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Geometry {
	/// A single triangle covering the [-1, 1] square, with UVs in [0, 1] over
	/// the visible part.
	FullscreenTriangle,
}

#[derive(Clone, Debug)]
pub struct Mesh {
	pub geometry: Geometry,
	pub material: ShaderMaterial,
	pub frustum_culled: bool,
}

impl Mesh {
	pub fn fullscreen(material: ShaderMaterial) -> Self {
		Self {
			geometry: Geometry::FullscreenTriangle,
			material,
			frustum_culled: false,
		}
	}
}

/// A scene handle. Scenes rendered by a `RenderPass` are opaque to this crate
/// and carry no meshes, passes keep their fullscreen mesh here.
#[derive(Clone, Debug)]
pub struct Scene {
	pub handle: Handle,
	pub meshes: Vec<Mesh>,
	/// Replaces the material of every object while rendering.
	pub override_material: Option<ShaderMaterial>,
}

impl Scene {
	pub fn new() -> Self {
		Self {
			handle: Handle::unique(),
			meshes: Vec::new(),
			override_material: None,
		}
	}
}

impl Default for Scene {
	fn default() -> Self {
		Self::new()
	}
}
