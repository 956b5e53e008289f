pub mod layouts;
pub mod program;
pub mod reflect;
pub mod uniform;

pub use layouts::SharedLayouts;
pub use program::ShaderProgram;
pub use reflect::{ShaderMetadata, UniformSlot, ValueKind};
pub use uniform::UniformId;
