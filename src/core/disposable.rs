pub use postfx_derive::Disposable;

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Something that holds on to GPU-side resources and can release them.
///
/// Disposing twice must be harmless.
pub trait Disposable {
	fn dispose(&mut self);
}

/// Lists the resources a value created itself and is therefore responsible
/// for releasing. Borrowed resources never show up here.
///
/// Usually derived together with [`Disposable`] through
/// `#[derive(Disposable)]` and `#[owned]` field attributes.
pub trait Owner {
	fn owned_resources(&mut self) -> Vec<&mut dyn Disposable>;
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Disposes the value and leaves `None` behind, so the resource can't be
/// reused or released a second time.
impl<T: Disposable> Disposable for Option<T> {
	fn dispose(&mut self) {
		if let Some(mut resource) = self.take() {
			resource.dispose();
		}
	}
}

impl<T: Disposable> Disposable for Vec<T> {
	fn dispose(&mut self) {
		for resource in self.iter_mut() {
			resource.dispose();
		}
	}
}

impl<T: Disposable + ?Sized> Disposable for Box<T> {
	fn dispose(&mut self) {
		(**self).dispose();
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/
