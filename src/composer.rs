use std::mem;

use anyhow::Result;
use log::{debug, trace};
use vek::Extent2;

use crate::{
	core::{
		context::{CompareFunction, RenderContext},
		disposable::Disposable,
		handle::Handle,
		render_target::{DepthFormat, DepthPacking, DepthTexture, RenderTarget, RenderTargetOptions, TextureDataType, TextureFormat},
		settings::ComposerSettings,
	},
	materials::copy,
	passes::{shader::ShaderPass, Pass, PassKind},
};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Identifies a pass inside the composer it was added to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PassId(Handle);

struct PassEntry {
	id: PassId,
	pass: Box<dyn Pass>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StencilState {
	Unmasked,
	Masked,
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Runs a chain of passes over two ping-pong frame buffers.
///
/// Passes read from the input buffer and write into the output buffer, the
/// two are swapped after every pass that asks for it. The buffers themselves
/// never move, the swapping happens on the composer's side for the duration
/// of a frame.
pub struct EffectComposer<R: RenderContext> {
	renderer: R,
	settings: ComposerSettings,
	input_buffer: Option<RenderTarget>,
	output_buffer: Option<RenderTarget>,
	passes: Vec<PassEntry>,
	copy_pass: ShaderPass,
}

impl<R: RenderContext> EffectComposer<R> {
	/// Takes over the renderer. Automatic clearing is turned off, the passes
	/// clear what they need themselves.
	pub fn new(mut renderer: R, settings: ComposerSettings) -> Result<Self> {
		renderer.set_auto_clear(false);

		let input_buffer = create_buffer(&renderer, &settings);
		let output_buffer = input_buffer.clone();

		debug!(
			"Created composer buffers of {}x{}",
			input_buffer.width(),
			input_buffer.height()
		);

		Ok(Self {
			renderer,
			settings,
			input_buffer: Some(input_buffer),
			output_buffer: Some(output_buffer),
			passes: Vec::new(),
			copy_pass: ShaderPass::new(copy::create()?),
		})
	}

	pub fn renderer(&self) -> &R {
		&self.renderer
	}

	pub fn renderer_mut(&mut self) -> &mut R {
		&mut self.renderer
	}

	pub fn settings(&self) -> &ComposerSettings {
		&self.settings
	}

	/// `None` once the composer has been disposed.
	pub fn input_buffer(&self) -> Option<&RenderTarget> {
		self.input_buffer.as_ref()
	}

	pub fn output_buffer(&self) -> Option<&RenderTarget> {
		self.output_buffer.as_ref()
	}

	/// The depth textures attached to the input and output buffer, if any pass
	/// asked for one.
	pub fn depth_textures(&self) -> Option<(&DepthTexture, &DepthTexture)> {
		let input = self.input_buffer.as_ref()?.depth_texture.as_ref()?;
		let output = self.output_buffer.as_ref()?.depth_texture.as_ref()?;
		Some((input, output))
	}

	/// Copies the unmasked pixels over when a pass swaps under an active mask.
	pub fn copy_pass(&self) -> &ShaderPass {
		&self.copy_pass
	}

	pub fn passes(&self) -> impl Iterator<Item = &dyn Pass> {
		self.passes.iter().map(|entry| entry.pass.as_ref())
	}

	pub fn pass(&self, id: PassId) -> Option<&dyn Pass> {
		self.passes.iter().find(|entry| entry.id == id).map(|entry| entry.pass.as_ref())
	}

	pub fn pass_mut(&mut self, id: PassId) -> Option<&mut (dyn Pass + 'static)> {
		self.passes.iter_mut().find(|entry| entry.id == id).map(|entry| entry.pass.as_mut())
	}

	/// Swaps the renderer for another one and hands the previous one back.
	/// The buffers are resized if the new drawing buffer differs in size.
	pub fn replace_renderer(&mut self, mut renderer: R) -> R {
		renderer.set_auto_clear(false);

		let previous_size = self.renderer.drawing_buffer_size();
		let previous = mem::replace(&mut self.renderer, renderer);

		if self.renderer.drawing_buffer_size() != previous_size {
			self.set_size(None);
		}

		previous
	}

	pub fn multisampling(&self) -> u32 {
		self.input_buffer
			.as_ref()
			.map_or(self.settings.multisampling, |buffer| buffer.samples)
	}

	/// Changes the number of MSAA samples, recreating both buffers.
	pub fn set_multisampling(&mut self, samples: u32) {
		self.settings.multisampling = samples;

		if self.input_buffer.as_ref().is_some_and(|buffer| buffer.samples != samples) {
			self.reset_buffers();
		}
	}

	/*
	--------------------------------------------------------------------------------
	||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
	--------------------------------------------------------------------------------
	*/

	/// Adds a pass at the end, or at `index` if given.
	///
	/// The pass is sized and initialized first and only added if that works.
	pub fn add_pass(&mut self, pass: impl Pass + 'static, index: Option<usize>) -> Result<PassId> {
		self.add_boxed_pass(Box::new(pass), index)
	}

	pub fn add_boxed_pass(&mut self, mut pass: Box<dyn Pass>, index: Option<usize>) -> Result<PassId> {
		let size = self.renderer.drawing_buffer_size();
		let alpha = self.renderer.has_alpha();

		pass.set_size(size.w, size.h);
		pass.initialize(&mut self.renderer, alpha, self.settings.frame_buffer_type)?;

		if self.settings.auto_render_to_screen {
			if let Some(last) = self.passes.last_mut() {
				last.pass.base_mut().render_to_screen = false;
			}

			// A pass that already renders to the screen takes over
			if pass.base().render_to_screen {
				self.settings.auto_render_to_screen = false;
			}
		}

		let index = index.unwrap_or(self.passes.len()).min(self.passes.len());
		let id = PassId(Handle::unique());

		debug!("Adding {} at {}", pass.name(), index);
		self.passes.insert(index, PassEntry { id, pass });

		if self.settings.auto_render_to_screen {
			if let Some(last) = self.passes.last_mut() {
				last.pass.base_mut().render_to_screen = true;
			}
		}

		let needs_depth_texture = self.passes[index].pass.base().needs_depth_texture;
		if needs_depth_texture && self.depth_textures().is_none() {
			self.create_depth_textures();
		}

		self.assign_depth_textures();

		Ok(id)
	}

	/// Takes the pass out of the chain without disposing it.
	pub fn remove_pass(&mut self, id: PassId) -> Option<Box<dyn Pass>> {
		let index = self.passes.iter().position(|entry| entry.id == id)?;
		let was_last = index + 1 == self.passes.len();

		let mut pass = self.passes.remove(index).pass;
		debug!("Removed {}", pass.name());

		if pass.base().needs_depth_texture {
			pass.set_depth_texture(None, DepthPacking::Basic);
		}

		if self.passes.iter().any(|entry| entry.pass.base().needs_depth_texture) {
			self.assign_depth_textures();
		} else {
			self.delete_depth_texture();
		}

		if self.settings.auto_render_to_screen && was_last {
			pass.base_mut().render_to_screen = false;
			if let Some(last) = self.passes.last_mut() {
				last.pass.base_mut().render_to_screen = true;
			}
		}

		Some(pass)
	}

	/// Takes all passes out of the chain without disposing them.
	pub fn remove_all_passes(&mut self) -> Vec<Box<dyn Pass>> {
		self.delete_depth_texture();
		self.passes.drain(..).map(|entry| entry.pass).collect()
	}

	/// Removes the depth textures from the buffers and the passes and releases
	/// them.
	pub fn delete_depth_texture(&mut self) {
		let mut released = false;

		for buffer in [self.input_buffer.as_mut(), self.output_buffer.as_mut()].into_iter().flatten() {
			if let Some(mut depth_texture) = buffer.depth_texture.take() {
				depth_texture.dispose();
				released = true;
			}
		}

		if released {
			for entry in self.passes.iter_mut() {
				if entry.pass.base().needs_depth_texture {
					entry.pass.set_depth_texture(None, DepthPacking::Basic);
				}
			}
		}
	}

	fn create_depth_textures(&mut self) {
		let format = if self.settings.stencil_buffer {
			DepthFormat::DepthStencil
		} else {
			DepthFormat::Depth
		};

		let depth_texture = DepthTexture::new(format);
		let counterpart = depth_texture.duplicate();

		debug!("Created depth textures {:?} and {:?}", depth_texture.handle, counterpart.handle);

		if let Some(buffer) = self.input_buffer.as_mut() {
			buffer.depth_texture = Some(depth_texture);
		}

		if let Some(buffer) = self.output_buffer.as_mut() {
			buffer.depth_texture = Some(counterpart);
		}
	}

	/// Hands every pass that reads depth the depth texture of the buffer the
	/// most recent scene pass before it rendered into.
	fn assign_depth_textures(&mut self) {
		let (Some(input_buffer), Some(output_buffer)) = (self.input_buffer.as_ref(), self.output_buffer.as_ref()) else {
			return;
		};

		let (Some(front), Some(back)) = (input_buffer.depth_texture.as_ref(), output_buffer.depth_texture.as_ref())
		else {
			return;
		};

		let mut swapped = false;
		let mut scene_swapped = false;

		for entry in self.passes.iter_mut() {
			if entry.pass.base().needs_depth_texture {
				let depth_texture = if scene_swapped { back } else { front };
				entry.pass.set_depth_texture(Some(depth_texture), DepthPacking::Basic);
			}

			if entry.pass.kind() == PassKind::Scene {
				scene_swapped = swapped;
			}

			if entry.pass.base().needs_swap {
				swapped = !swapped;
			}
		}
	}

	/*
	--------------------------------------------------------------------------------
	||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
	--------------------------------------------------------------------------------
	*/

	/// Renders all enabled passes in order.
	///
	/// While a mask is active, a pass that swaps the buffers leaves the pixels
	/// outside the mask behind in the old input buffer. They are copied over
	/// before the swap so the next pass sees a complete image.
	pub fn render(&mut self, delta: f32) {
		let (Some(mut input_buffer), Some(mut output_buffer)) = (self.input_buffer.as_ref(), self.output_buffer.as_ref())
		else {
			return;
		};

		let mut stencil = StencilState::Unmasked;

		for entry in self.passes.iter_mut() {
			let pass = &mut entry.pass;

			if !pass.base().enabled {
				continue;
			}

			trace!("Rendering {}", pass.name());
			pass.render(
				&mut self.renderer,
				input_buffer,
				output_buffer,
				delta,
				stencil == StencilState::Masked,
			);

			if pass.base().needs_swap {
				if stencil == StencilState::Masked {
					self.copy_pass.base_mut().render_to_screen = pass.base().render_to_screen;
					self.renderer.buffers().set_stencil_func(CompareFunction::NotEqual, 1, 0xffffffff);
					self.copy_pass.render(&mut self.renderer, input_buffer, output_buffer, delta, true);
					self.renderer.buffers().set_stencil_func(CompareFunction::Equal, 1, 0xffffffff);
				}

				mem::swap(&mut input_buffer, &mut output_buffer);
			}

			match pass.kind() {
				PassKind::Mask => stencil = StencilState::Masked,
				PassKind::ClearMask => stencil = StencilState::Unmasked,
				_ => {}
			}
		}
	}

	/// Resizes the renderer, the buffers and every pass. `None` keeps the
	/// current renderer size and only brings everything else in line with it.
	pub fn set_size(&mut self, size: Option<Extent2<u32>>) {
		let size = size.unwrap_or_else(|| self.renderer.size());
		self.renderer.set_size(size, true);

		let drawing_buffer_size = self.renderer.drawing_buffer_size();
		let (width, height) = (drawing_buffer_size.w, drawing_buffer_size.h);

		debug!("Resizing composer to {}x{}", width, height);

		for buffer in [self.input_buffer.as_mut(), self.output_buffer.as_mut()].into_iter().flatten() {
			buffer.set_size(width, height);
		}

		for entry in self.passes.iter_mut() {
			entry.pass.set_size(width, height);
		}
	}

	/// Disposes everything, passes included, and starts over with fresh buffers
	/// and a fresh copy pass.
	pub fn reset(&mut self) -> Result<()> {
		self.dispose();

		let input_buffer = create_buffer(&self.renderer, &self.settings);
		self.output_buffer = Some(input_buffer.clone());
		self.input_buffer = Some(input_buffer);
		self.copy_pass = ShaderPass::new(copy::create()?);

		Ok(())
	}

	fn reset_buffers(&mut self) {
		let had_depth_textures = self.depth_textures().is_some();

		self.delete_depth_texture();
		self.input_buffer.dispose();
		self.output_buffer.dispose();

		let input_buffer = create_buffer(&self.renderer, &self.settings);
		self.output_buffer = Some(input_buffer.clone());
		self.input_buffer = Some(input_buffer);

		if had_depth_textures {
			self.create_depth_textures();
			self.assign_depth_textures();
		}
	}
}

/// Releases the passes, the buffers, the depth textures and the copy pass.
/// Rendering afterwards does nothing.
impl<R: RenderContext> Disposable for EffectComposer<R> {
	fn dispose(&mut self) {
		for entry in self.passes.iter_mut() {
			entry.pass.dispose();
		}
		self.passes.clear();

		self.delete_depth_texture();
		self.input_buffer.dispose();
		self.output_buffer.dispose();
		self.copy_pass.dispose();
	}
}

fn create_buffer<R: RenderContext>(renderer: &R, settings: &ComposerSettings) -> RenderTarget {
	let size = renderer.drawing_buffer_size();

	let format = if renderer.has_alpha() || settings.frame_buffer_type != TextureDataType::UnsignedByte {
		TextureFormat::Rgba
	} else {
		TextureFormat::Rgb
	};

	RenderTarget::new(
		size.w,
		size.h,
		RenderTargetOptions {
			depth_buffer: settings.depth_buffer,
			stencil_buffer: settings.stencil_buffer,
			format,
			data_type: settings.frame_buffer_type,
			samples: settings.multisampling,
			..Default::default()
		},
	)
	.with_name("EffectComposer.Buffer")
}
