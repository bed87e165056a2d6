use anyhow::Result;
use log::warn;

use super::{blend::BlendFunction, Effect, EffectOptions, EffectShader};
use crate::{
	core::{
		context::RenderContext,
		disposable::Disposable,
		render_target::{RenderTarget, RenderTargetOptions, TextureDataType, TextureFormat},
	},
	libs::uniform::Uniform,
	materials::luminance,
	passes::{
		kawase_blur::{KawaseBlurPass, KernelSize},
		shader::ShaderPass,
		Pass,
	},
};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[derive(Clone, Debug)]
pub struct BloomOptions {
	pub blend_function: BlendFunction,
	pub luminance_threshold: f32,
	pub luminance_smoothing: f32,
	pub resolution_scale: f32,
	pub intensity: f32,
	pub kernel_size: KernelSize,
}

impl Default for BloomOptions {
	fn default() -> Self {
		Self {
			blend_function: BlendFunction::Screen,
			luminance_threshold: 0.9,
			luminance_smoothing: 0.025,
			resolution_scale: 0.5,
			intensity: 1.0,
			kernel_size: KernelSize::Large,
		}
	}
}

/// Makes bright areas glow.
///
/// Each frame the bright parts of the input are extracted into a
/// reduced-resolution target and blurred there. The shader only samples that
/// target, so the effect itself is a plain image effect.
#[derive(Disposable)]
pub struct BloomEffect {
	shader: EffectShader,
	#[owned]
	render_target: RenderTarget,
	#[owned]
	luminance_pass: ShaderPass,
	#[owned]
	blur_pass: KawaseBlurPass,
	intensity: Uniform,
}

impl BloomEffect {
	pub fn new(options: BloomOptions) -> Result<Self> {
		let render_target = RenderTarget::new(
			1,
			1,
			RenderTargetOptions {
				depth_buffer: false,
				..Default::default()
			},
		)
		.with_name("Bloom.Target");

		let intensity = Uniform::new(options.intensity);

		let shader = EffectShader::new(
			"BloomEffect",
			include_str!("../shader/effects/bloom.frag"),
			EffectOptions {
				blend_function: options.blend_function,
				uniforms: [
					("map".to_owned(), Uniform::texture(Some(render_target.texture.handle))),
					("intensity".to_owned(), intensity.clone()),
				]
				.into_iter()
				.collect(),
				..Default::default()
			},
		);

		let material = luminance::create(true, Some(options.luminance_threshold))?;
		material.set_uniform("smoothing", options.luminance_smoothing);

		Ok(Self {
			shader,
			render_target,
			luminance_pass: ShaderPass::new(material),
			blur_pass: KawaseBlurPass::new(options.kernel_size, options.resolution_scale)?,
			intensity,
		})
	}

	pub fn intensity(&self) -> f32 {
		self.intensity.float()
	}

	pub fn set_intensity(&self, intensity: f32) {
		self.intensity.set(intensity);
	}

	pub fn render_target(&self) -> &RenderTarget {
		&self.render_target
	}

	pub fn blur_pass(&self) -> &KawaseBlurPass {
		&self.blur_pass
	}

	pub fn blur_pass_mut(&mut self) -> &mut KawaseBlurPass {
		&mut self.blur_pass
	}

	pub fn set_luminance_threshold(&mut self, threshold: f32) {
		if let Some(material) = self.luminance_pass.base_mut().fullscreen_material_mut() {
			luminance::set_threshold(material, Some(threshold));
		}
	}

	pub fn set_luminance_smoothing(&self, smoothing: f32) {
		if let Some(material) = self.luminance_pass.material() {
			material.set_uniform("smoothing", smoothing);
		}
	}
}

impl Effect for BloomEffect {
	fn shader(&self) -> &EffectShader {
		&self.shader
	}

	fn shader_mut(&mut self) -> &mut EffectShader {
		&mut self.shader
	}

	fn update(&mut self, renderer: &mut dyn RenderContext, input_buffer: &RenderTarget, delta: f32) {
		let target = &self.render_target;

		self.luminance_pass.render(renderer, input_buffer, target, delta, false);
		self.blur_pass.render(renderer, target, target, delta, false);
	}

	fn set_size(&mut self, width: u32, height: u32) {
		self.blur_pass.set_size(width, height);

		let size = self.blur_pass.resolution.size();
		self.render_target.set_size(size.w, size.h);
	}

	fn initialize(&mut self, renderer: &mut dyn RenderContext, alpha: bool, frame_buffer_type: TextureDataType) {
		if let Err(err) = self.blur_pass.initialize(renderer, alpha, frame_buffer_type) {
			warn!("Failed to initialize the bloom blur: {err:#}");
		}

		self.render_target.texture.data_type = frame_buffer_type;
		if !alpha && frame_buffer_type == TextureDataType::UnsignedByte {
			self.render_target.texture.format = TextureFormat::Rgb;
		}
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/
