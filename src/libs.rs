pub mod shader;
pub mod uniform;
