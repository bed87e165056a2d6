pub mod context;
pub mod disposable;
pub mod embed;
pub mod handle;
pub mod material;
pub mod render_target;
pub mod resizer;
pub mod scene;
pub mod settings;
