use std::mem;

use anyhow::Result;

use super::{Pass, PassBase};
use crate::{
	core::{
		context::RenderContext,
		disposable::Disposable,
		material::ShaderMaterial,
		render_target::{FilterMode, RenderTarget, RenderTargetOptions, TextureDataType, TextureFormat},
		resizer::Resizer,
	},
	libs::uniform::UniformValue,
	materials::{convolution, effect::EffectMaterial},
};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Blur strength presets. Each one is a sequence of kernel offsets, one
/// iteration per offset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum KernelSize {
	VerySmall,
	Small,
	Medium,
	#[default]
	Large,
	VeryLarge,
	Huge,
}

impl KernelSize {
	#[rustfmt::skip]
	pub fn kernel(&self) -> &'static [f32] {
		match self {
			KernelSize::VerySmall => &[0.0, 0.0],
			KernelSize::Small     => &[0.0, 1.0, 1.0],
			KernelSize::Medium    => &[0.0, 1.0, 1.0, 2.0],
			KernelSize::Large     => &[0.0, 1.0, 2.0, 2.0, 3.0],
			KernelSize::VeryLarge => &[0.0, 1.0, 2.0, 3.0, 4.0, 4.0, 5.0],
			KernelSize::Huge      => &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 7.0, 8.0, 9.0, 10.0],
		}
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// A Kawase blur, ping-ponging between two reduced-resolution targets and
/// writing the last iteration into the output buffer.
#[derive(Disposable)]
pub struct KawaseBlurPass {
	#[owned]
	base: PassBase,
	#[owned]
	render_target_a: RenderTarget,
	#[owned]
	render_target_b: RenderTarget,
	/// Only in the fullscreen mesh during the last iteration with dithering on.
	#[owned]
	dithered_material: ShaderMaterial,
	pub resolution: Resizer,
	pub kernel_size: KernelSize,
	/// Applies dithering to the last iteration against banding.
	pub dithering: bool,
}

impl KawaseBlurPass {
	pub fn new(kernel_size: KernelSize, resolution_scale: f32) -> Result<Self> {
		let options = RenderTargetOptions {
			depth_buffer: false,
			stencil_buffer: false,
			filter: FilterMode::Linear,
			..Default::default()
		};

		let render_target_a = RenderTarget::new(1, 1, options).with_name("Blur.Target.A");
		let render_target_b = render_target_a.clone().with_name("Blur.Target.B");

		let mut dithered_material = convolution::create()?;
		dithered_material.dithering = true;

		let mut base = PassBase::new("KawaseBlurPass");
		base.set_fullscreen_material(convolution::create()?);

		Ok(Self {
			base,
			render_target_a,
			render_target_b,
			dithered_material,
			resolution: Resizer::new(resolution_scale),
			kernel_size,
			dithering: false,
		})
	}

	/// Spreads every tap further apart.
	pub fn set_scale(&mut self, scale: f32) {
		self.dithered_material.set_uniform("scale", scale);
		if let Some(material) = self.base.fullscreen_material() {
			material.set_uniform("scale", scale);
		}
	}

	pub fn render_targets(&self) -> (&RenderTarget, &RenderTarget) {
		(&self.render_target_a, &self.render_target_b)
	}
}

fn swap_material(base: &mut PassBase, material: &mut ShaderMaterial) {
	if let Some(current) = base.fullscreen_material_mut() {
		mem::swap(current, material);
	}
}

fn draw(
	base: &PassBase,
	renderer: &mut dyn RenderContext,
	kernel: f32,
	source: &RenderTarget,
	target: Option<&RenderTarget>,
) {
	if let Some(material) = base.fullscreen_material() {
		material.set_uniform("kernel", kernel);
		material.set_uniform("inputBuffer", UniformValue::Texture(Some(source.texture.handle)));
	}

	renderer.render(&base.scene, &base.camera, target);
}

impl Pass for KawaseBlurPass {
	fn base(&self) -> &PassBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut PassBase {
		&mut self.base
	}

	fn render(
		&mut self,
		renderer: &mut dyn RenderContext,
		input_buffer: &RenderTarget,
		output_buffer: &RenderTarget,
		_delta: f32,
		_stencil_test: bool,
	) {
		let kernel = self.kernel_size.kernel();
		let (last, iterations) = match kernel.split_last() {
			Some(split) => split,
			None => return,
		};

		let mut source = input_buffer;
		for (i, kernel) in iterations.iter().enumerate() {
			// Alternate between the internal targets
			let destination = if i % 2 == 0 { &self.render_target_a } else { &self.render_target_b };
			draw(&self.base, renderer, *kernel, source, Some(destination));
			source = destination;
		}

		if self.dithering {
			swap_material(&mut self.base, &mut self.dithered_material);
		}

		let target = self.base.output(output_buffer);
		draw(&self.base, renderer, *last, source, target);

		if self.dithering {
			swap_material(&mut self.base, &mut self.dithered_material);
		}
	}

	fn set_size(&mut self, width: u32, height: u32) {
		self.resolution.base = vek::Extent2::new(width, height);
		let (w, h) = (self.resolution.width(), self.resolution.height());

		self.render_target_a.set_size(w, h);
		self.render_target_b.set_size(w, h);

		convolution::set_texel_size(&self.dithered_material, w, h);
		if let Some(material) = self.base.fullscreen_material() {
			convolution::set_texel_size(material, w, h);
		}
	}

	fn initialize(
		&mut self,
		_renderer: &mut dyn RenderContext,
		alpha: bool,
		frame_buffer_type: TextureDataType,
	) -> Result<()> {
		self.render_target_a.texture.data_type = frame_buffer_type;
		self.render_target_b.texture.data_type = frame_buffer_type;

		if frame_buffer_type != TextureDataType::UnsignedByte {
			self.dithered_material.set_high_precision(true);
			if let Some(material) = self.base.fullscreen_material_mut() {
				material.set_high_precision(true);
			}
		} else if !alpha {
			self.render_target_a.texture.format = TextureFormat::Rgb;
			self.render_target_b.texture.format = TextureFormat::Rgb;
		}

		Ok(())
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/
