#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use postfx::{
	core::{
		context::{BufferState, Capabilities, CompareFunction, RenderContext, StencilOp},
		disposable::Disposable,
		handle::Handle,
		render_target::{DepthPacking, DepthTexture, RenderTarget, TextureDataType},
		scene::{Camera, Scene},
	},
	passes::{Pass, PassBase, PassKind},
};
use vek::{Extent2, Rgb};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

pub fn init() {
	let _ = env_logger::builder().is_test(true).try_init();
}

/// Everything the pipeline asked the renderer to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
	Render { scene: Handle, target: Option<Handle> },
	SetRenderTarget(Option<Handle>),
	Clear { color: bool, depth: bool, stencil: bool },
	SetSize(Extent2<u32>),
	ColorMask(bool),
	ColorLocked(bool),
	DepthMask(bool),
	DepthLocked(bool),
	StencilTest(bool),
	StencilOp(StencilOp, StencilOp, StencilOp),
	StencilFunc(CompareFunction, u32),
	StencilClear(u32),
	StencilLocked(bool),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub struct RecordingBuffers {
	log: CallLog,
}

impl BufferState for RecordingBuffers {
	fn set_color_mask(&mut self, write: bool) {
		self.log.borrow_mut().push(Call::ColorMask(write));
	}

	fn set_color_locked(&mut self, locked: bool) {
		self.log.borrow_mut().push(Call::ColorLocked(locked));
	}

	fn set_depth_mask(&mut self, write: bool) {
		self.log.borrow_mut().push(Call::DepthMask(write));
	}

	fn set_depth_locked(&mut self, locked: bool) {
		self.log.borrow_mut().push(Call::DepthLocked(locked));
	}

	fn set_stencil_test(&mut self, enabled: bool) {
		self.log.borrow_mut().push(Call::StencilTest(enabled));
	}

	fn set_stencil_op(&mut self, fail: StencilOp, z_fail: StencilOp, z_pass: StencilOp) {
		self.log.borrow_mut().push(Call::StencilOp(fail, z_fail, z_pass));
	}

	fn set_stencil_func(&mut self, func: CompareFunction, reference: u32, _mask: u32) {
		self.log.borrow_mut().push(Call::StencilFunc(func, reference));
	}

	fn set_stencil_clear(&mut self, value: u32) {
		self.log.borrow_mut().push(Call::StencilClear(value));
	}

	fn set_stencil_locked(&mut self, locked: bool) {
		self.log.borrow_mut().push(Call::StencilLocked(locked));
	}
}

/// A renderer that draws nothing and writes down every call instead.
pub struct RecordingContext {
	pub log: CallLog,
	pub size: Extent2<u32>,
	pub pixel_ratio: u32,
	pub alpha: bool,
	pub capabilities: Capabilities,
	clear_color: Rgb<f32>,
	clear_alpha: f32,
	auto_clear: bool,
	buffers: RecordingBuffers,
}

impl RecordingContext {
	pub fn new(width: u32, height: u32) -> Self {
		let log = CallLog::default();

		Self {
			log: log.clone(),
			size: Extent2::new(width, height),
			pixel_ratio: 1,
			alpha: true,
			capabilities: Capabilities::default(),
			clear_color: Rgb::new(0.0, 0.0, 0.0),
			clear_alpha: 1.0,
			auto_clear: true,
			buffers: RecordingBuffers { log },
		}
	}

	pub fn calls(&self) -> Vec<Call> {
		self.log.borrow().clone()
	}

	pub fn renders(&self) -> Vec<(Handle, Option<Handle>)> {
		self.log
			.borrow()
			.iter()
			.filter_map(|call| match call {
				Call::Render { scene, target } => Some((*scene, *target)),
				_ => None,
			})
			.collect()
	}

	pub fn forget(&self) {
		self.log.borrow_mut().clear();
	}
}

impl RenderContext for RecordingContext {
	fn render(&mut self, scene: &Scene, _camera: &Camera, target: Option<&RenderTarget>) {
		self.log.borrow_mut().push(Call::Render {
			scene: scene.handle,
			target: target.map(|t| t.handle),
		});
	}

	fn set_render_target(&mut self, target: Option<&RenderTarget>) {
		self.log.borrow_mut().push(Call::SetRenderTarget(target.map(|t| t.handle)));
	}

	fn clear(&mut self, color: bool, depth: bool, stencil: bool) {
		self.log.borrow_mut().push(Call::Clear { color, depth, stencil });
	}

	fn clear_color(&self) -> Rgb<f32> {
		self.clear_color
	}

	fn set_clear_color(&mut self, color: Rgb<f32>) {
		self.clear_color = color;
	}

	fn clear_alpha(&self) -> f32 {
		self.clear_alpha
	}

	fn set_clear_alpha(&mut self, alpha: f32) {
		self.clear_alpha = alpha;
	}

	fn auto_clear(&self) -> bool {
		self.auto_clear
	}

	fn set_auto_clear(&mut self, auto_clear: bool) {
		self.auto_clear = auto_clear;
	}

	fn size(&self) -> Extent2<u32> {
		self.size
	}

	fn set_size(&mut self, size: Extent2<u32>, _update_style: bool) {
		self.size = size;
		self.log.borrow_mut().push(Call::SetSize(size));
	}

	fn drawing_buffer_size(&self) -> Extent2<u32> {
		Extent2::new(self.size.w * self.pixel_ratio, self.size.h * self.pixel_ratio)
	}

	fn has_alpha(&self) -> bool {
		self.alpha
	}

	fn capabilities(&self) -> Capabilities {
		self.capabilities
	}

	fn buffers(&mut self) -> &mut dyn BufferState {
		&mut self.buffers
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[derive(Clone, Debug, PartialEq)]
pub enum PassEvent {
	Render {
		input: Handle,
		output: Handle,
		stencil_test: bool,
	},
	SetSize(u32, u32),
	Initialize,
	DepthTexture(Option<Handle>),
	Dispose,
}

pub type EventLog = Rc<RefCell<Vec<PassEvent>>>;

/// A pass that only writes down what the composer did with it.
pub struct RecordingPass {
	base: PassBase,
	kind: PassKind,
	events: EventLog,
}

impl RecordingPass {
	pub fn new(name: &str, needs_swap: bool) -> (Self, EventLog) {
		let events = EventLog::default();

		let mut base = PassBase::new(name);
		base.needs_swap = needs_swap;

		let pass = Self {
			base,
			kind: PassKind::Generic,
			events: events.clone(),
		};

		(pass, events)
	}

	pub fn with_kind(mut self, kind: PassKind) -> Self {
		self.kind = kind;
		self
	}

	pub fn reading_depth(mut self) -> Self {
		self.base.needs_depth_texture = true;
		self
	}
}

impl Disposable for RecordingPass {
	fn dispose(&mut self) {
		self.events.borrow_mut().push(PassEvent::Dispose);
	}
}

impl Pass for RecordingPass {
	fn base(&self) -> &PassBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut PassBase {
		&mut self.base
	}

	fn kind(&self) -> PassKind {
		self.kind
	}

	fn render(
		&mut self,
		_renderer: &mut dyn RenderContext,
		input_buffer: &RenderTarget,
		output_buffer: &RenderTarget,
		_delta: f32,
		stencil_test: bool,
	) {
		self.events.borrow_mut().push(PassEvent::Render {
			input: input_buffer.handle,
			output: output_buffer.handle,
			stencil_test,
		});
	}

	fn set_size(&mut self, width: u32, height: u32) {
		self.events.borrow_mut().push(PassEvent::SetSize(width, height));
	}

	fn initialize(
		&mut self,
		_renderer: &mut dyn RenderContext,
		_alpha: bool,
		_frame_buffer_type: TextureDataType,
	) -> anyhow::Result<()> {
		self.events.borrow_mut().push(PassEvent::Initialize);
		Ok(())
	}

	fn set_depth_texture(&mut self, depth_texture: Option<&DepthTexture>, _depth_packing: DepthPacking) {
		self.events
			.borrow_mut()
			.push(PassEvent::DepthTexture(depth_texture.map(|t| t.handle)));
	}
}

pub fn count(events: &EventLog, event: &PassEvent) -> usize {
	events.borrow().iter().filter(|e| *e == event).count()
}

pub fn renders(events: &EventLog) -> Vec<PassEvent> {
	events
		.borrow()
		.iter()
		.filter(|e| matches!(e, PassEvent::Render { .. }))
		.cloned()
		.collect()
}
