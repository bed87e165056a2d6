use std::sync::atomic::{AtomicU64, Ordering};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Identifies a resource that lives on the render context's side (a texture,
/// a render target, a scene, a camera).
///
/// The render context uses handles to find the GPU objects backing the plain
/// descriptions this crate passes around.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(u64);

impl Handle {
	pub fn unique() -> Self {
		Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
	}

	pub fn id(&self) -> u64 {
		self.0
	}
}
