mod common;

use common::{Call, RecordingContext};
use postfx::{
	core::{
		context::{CompareFunction, RenderContext, StencilOp},
		material::ShaderMaterial,
		render_target::{RenderTarget, RenderTargetOptions, TextureDataType, TextureFormat},
		scene::{Camera, Scene},
	},
	libs::uniform::{Uniform, UniformValue},
	materials::copy,
	passes::{
		clear::ClearPass,
		clear_mask::ClearMaskPass,
		kawase_blur::{KawaseBlurPass, KernelSize},
		mask::MaskPass,
		render::RenderPass,
		shader::ShaderPass,
		Pass,
	},
};
use vek::Rgb;

fn setup() -> (RecordingContext, RenderTarget, RenderTarget) {
	common::init();
	let input = RenderTarget::new(640, 480, RenderTargetOptions::default());
	let output = input.clone();
	(RecordingContext::new(640, 480), input, output)
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[test]
fn clear_pass_restores_the_clear_values() {
	let (mut renderer, input, output) = setup();
	renderer.set_clear_color(Rgb::new(0.1, 0.2, 0.3));

	let mut pass = ClearPass::default();
	pass.override_clear_color = Some(Rgb::new(1.0, 0.0, 0.0));
	pass.override_clear_alpha = Some(0.0);
	pass.render(&mut renderer, &input, &output, 0.016, false);

	assert_eq!(renderer.clear_color(), Rgb::new(0.1, 0.2, 0.3));
	assert_eq!(renderer.clear_alpha(), 1.0);
	assert_eq!(
		renderer.calls(),
		vec![
			Call::SetRenderTarget(Some(input.handle)),
			Call::Clear {
				color: true,
				depth: true,
				stencil: false
			},
		]
	);
}

#[test]
fn clear_pass_can_clear_the_screen() {
	let (mut renderer, input, output) = setup();

	let mut pass = ClearPass::new(true, false, false);
	pass.base_mut().render_to_screen = true;
	pass.render(&mut renderer, &input, &output, 0.016, false);

	assert_eq!(renderer.calls()[0], Call::SetRenderTarget(None));
}

#[test]
fn mask_pass_writes_the_stencil_of_both_buffers() {
	let (mut renderer, input, output) = setup();
	let scene = Scene::new();
	let scene_handle = scene.handle;

	let mut pass = MaskPass::new(scene, Camera::fullscreen());
	assert!(!pass.base().needs_swap);
	pass.render(&mut renderer, &input, &output, 0.016, false);

	let stencil_clear = Call::Clear {
		color: false,
		depth: false,
		stencil: true,
	};

	assert_eq!(
		renderer.calls(),
		vec![
			Call::ColorMask(false),
			Call::DepthMask(false),
			Call::ColorLocked(true),
			Call::DepthLocked(true),
			Call::StencilTest(true),
			Call::StencilOp(StencilOp::Replace, StencilOp::Replace, StencilOp::Replace),
			Call::StencilFunc(CompareFunction::Always, 1),
			Call::StencilClear(0),
			Call::StencilLocked(true),
			Call::SetRenderTarget(Some(input.handle)),
			stencil_clear.clone(),
			Call::SetRenderTarget(Some(output.handle)),
			stencil_clear,
			Call::Render {
				scene: scene_handle,
				target: Some(input.handle)
			},
			Call::Render {
				scene: scene_handle,
				target: Some(output.handle)
			},
			Call::ColorLocked(false),
			Call::DepthLocked(false),
			Call::StencilLocked(false),
			Call::StencilFunc(CompareFunction::Equal, 1),
			Call::StencilOp(StencilOp::Keep, StencilOp::Keep, StencilOp::Keep),
			Call::StencilLocked(true),
		]
	);
}

#[test]
fn inverted_masks_write_zeros() {
	let (mut renderer, input, output) = setup();

	let mut pass = MaskPass::new(Scene::new(), Camera::fullscreen());
	pass.inverted = true;
	pass.clear = false;
	pass.render(&mut renderer, &input, &output, 0.016, false);

	let calls = renderer.calls();
	assert!(calls.contains(&Call::StencilFunc(CompareFunction::Always, 0)));
	assert!(calls.contains(&Call::StencilClear(1)));
	assert!(!calls.iter().any(|call| matches!(call, Call::Clear { .. })));
}

#[test]
fn clear_mask_pass_disables_the_stencil_test() {
	let (mut renderer, input, output) = setup();

	ClearMaskPass::new().render(&mut renderer, &input, &output, 0.016, true);

	assert_eq!(renderer.calls(), vec![Call::StencilLocked(false), Call::StencilTest(false)]);
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[test]
fn render_pass_draws_into_the_input_buffer() {
	let (mut renderer, input, output) = setup();
	let scene = Scene::new();
	let scene_handle = scene.handle;

	let mut pass = RenderPass::new(scene, Camera::fullscreen());
	pass.override_material = Some(ShaderMaterial::new("Override", "", ""));
	assert!(!pass.base().needs_swap);

	pass.render(&mut renderer, &input, &output, 0.016, false);

	assert_eq!(renderer.renders(), vec![(scene_handle, Some(input.handle))]);
	assert!(pass.base().scene.override_material.is_none());
}

#[test]
fn shader_pass_feeds_the_named_uniform() {
	let (mut renderer, input, output) = setup();

	let material = copy::create().unwrap().with_uniform("source", Uniform::texture(None));
	let mut pass = ShaderPass::with_input(material, "source");
	pass.render(&mut renderer, &input, &output, 0.016, false);

	let source = pass.material().and_then(|m| m.uniform("source")).map(|u| u.get().clone());
	assert_eq!(source, Some(UniformValue::Texture(Some(input.texture.handle))));
	assert_eq!(renderer.renders().last().map(|(_, target)| *target), Some(Some(output.handle)));
}

#[test]
fn kawase_blur_iterates_over_its_kernel() {
	let (mut renderer, input, output) = setup();

	let mut pass = KawaseBlurPass::new(KernelSize::Medium, 0.5).unwrap();
	pass.set_size(640, 480);
	pass.render(&mut renderer, &input, &output, 0.016, false);

	let (a, b) = pass.render_targets();
	let targets = renderer
		.renders()
		.into_iter()
		.map(|(_, target)| target)
		.collect::<Vec<_>>();

	assert_eq!(
		targets,
		vec![Some(a.handle), Some(b.handle), Some(a.handle), Some(output.handle)]
	);
}

#[test]
fn kawase_blur_follows_the_frame_buffer_type() {
	let (mut renderer, _, _) = setup();

	let mut pass = KawaseBlurPass::new(KernelSize::Small, 0.5).unwrap();
	pass.initialize(&mut renderer, false, TextureDataType::UnsignedByte).unwrap();
	assert_eq!(pass.render_targets().0.texture.format, TextureFormat::Rgb);

	let mut pass = KawaseBlurPass::new(KernelSize::Small, 0.5).unwrap();
	pass.initialize(&mut renderer, false, TextureDataType::HalfFloat).unwrap();
	assert_eq!(pass.render_targets().1.texture.data_type, TextureDataType::HalfFloat);
	assert_eq!(pass.render_targets().1.texture.format, TextureFormat::Rgba);
	assert_eq!(
		pass.base()
			.fullscreen_material()
			.and_then(|m| m.define("FRAMEBUFFER_PRECISION_HIGH")),
		Some("1")
	);
}
