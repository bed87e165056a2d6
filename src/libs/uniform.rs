use std::{
	cell::{Ref, RefCell},
	fmt,
	hash::{Hash, Hasher},
	rc::Rc,
};

use vek::{Vec2, Vec3, Vec4};

use crate::core::handle::Handle;

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

pub trait ShaderType {
	fn type_name() -> &'static str;
}

#[rustfmt::skip] impl ShaderType for bool      {fn type_name() -> &'static str {"bool"}}
#[rustfmt::skip] impl ShaderType for i32       {fn type_name() -> &'static str {"int"}}
#[rustfmt::skip] impl ShaderType for f32       {fn type_name() -> &'static str {"float"}}
#[rustfmt::skip] impl ShaderType for Vec2<f32> {fn type_name() -> &'static str {"vec2"}}
#[rustfmt::skip] impl ShaderType for Vec3<f32> {fn type_name() -> &'static str {"vec3"}}
#[rustfmt::skip] impl ShaderType for Vec4<f32> {fn type_name() -> &'static str {"vec4"}}
#[rustfmt::skip] impl ShaderType for Handle    {fn type_name() -> &'static str {"sampler2D"}}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[derive(Clone, Debug, PartialEq)]
pub enum UniformValue {
	Bool(bool),
	Int(i32),
	Float(f32),
	Vec2(Vec2<f32>),
	Vec3(Vec3<f32>),
	Vec4(Vec4<f32>),
	/// A sampler, `None` until a texture gets bound.
	Texture(Option<Handle>),
}

impl UniformValue {
	pub fn glsl_type(&self) -> &'static str {
		match self {
			UniformValue::Bool(_) => bool::type_name(),
			UniformValue::Int(_) => i32::type_name(),
			UniformValue::Float(_) => f32::type_name(),
			UniformValue::Vec2(_) => Vec2::<f32>::type_name(),
			UniformValue::Vec3(_) => Vec3::<f32>::type_name(),
			UniformValue::Vec4(_) => Vec4::<f32>::type_name(),
			UniformValue::Texture(_) => Handle::type_name(),
		}
	}

	pub fn as_float(&self) -> Option<f32> {
		match self {
			UniformValue::Float(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_vec2(&self) -> Option<Vec2<f32>> {
		match self {
			UniformValue::Vec2(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_texture(&self) -> Option<Handle> {
		match self {
			UniformValue::Texture(t) => *t,
			_ => None,
		}
	}

	/// The raw value as the render context uploads it. Textures have no bytes,
	/// they are bound by handle instead.
	pub fn bytes(&self) -> Vec<u8> {
		match self {
			UniformValue::Bool(v) => bytemuck::bytes_of(&(*v as u32)).to_owned(),
			UniformValue::Int(v) => bytemuck::bytes_of(v).to_owned(),
			UniformValue::Float(v) => bytemuck::bytes_of(v).to_owned(),
			UniformValue::Vec2(v) => bytemuck::cast_slice(&v.into_array()).to_owned(),
			UniformValue::Vec3(v) => bytemuck::cast_slice(&v.into_array()).to_owned(),
			UniformValue::Vec4(v) => bytemuck::cast_slice(&v.into_array()).to_owned(),
			UniformValue::Texture(_) => Vec::new(),
		}
	}
}

#[rustfmt::skip] impl From<bool>      for UniformValue {fn from(v: bool) -> Self {UniformValue::Bool(v)}}
#[rustfmt::skip] impl From<i32>       for UniformValue {fn from(v: i32) -> Self {UniformValue::Int(v)}}
#[rustfmt::skip] impl From<f32>       for UniformValue {fn from(v: f32) -> Self {UniformValue::Float(v)}}
#[rustfmt::skip] impl From<Vec2<f32>> for UniformValue {fn from(v: Vec2<f32>) -> Self {UniformValue::Vec2(v)}}
#[rustfmt::skip] impl From<Vec3<f32>> for UniformValue {fn from(v: Vec3<f32>) -> Self {UniformValue::Vec3(v)}}
#[rustfmt::skip] impl From<Vec4<f32>> for UniformValue {fn from(v: Vec4<f32>) -> Self {UniformValue::Vec4(v)}}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// A shared uniform slot.
///
/// Clones point at the same value, which is how an effect keeps updating a
/// uniform after it has been merged into a pass material. Equality and
/// hashing are by identity.
#[derive(Clone)]
pub struct Uniform(Rc<RefCell<UniformValue>>);

impl Uniform {
	pub fn new(value: impl Into<UniformValue>) -> Self {
		Self(Rc::new(RefCell::new(value.into())))
	}

	pub fn texture(texture: Option<Handle>) -> Self {
		Self::new(UniformValue::Texture(texture))
	}

	pub fn get(&self) -> Ref<'_, UniformValue> {
		self.0.borrow()
	}

	pub fn set(&self, value: impl Into<UniformValue>) {
		*self.0.borrow_mut() = value.into();
	}

	/// Shorthand for float uniforms, `0.0` for anything else.
	pub fn float(&self) -> f32 {
		self.get().as_float().unwrap_or_default()
	}
}

impl PartialEq for Uniform {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl Eq for Uniform {}

impl Hash for Uniform {
	fn hash<H: Hasher>(&self, state: &mut H) {
		Rc::as_ptr(&self.0).hash(state);
	}
}

impl fmt::Debug for Uniform {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Uniform").field(&*self.get()).finish()
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/
