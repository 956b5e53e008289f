pub mod buffer;
pub mod mipmap;
pub mod pool;
pub mod texture;

pub use mipmap::MipmapGenerator;
pub use pool::{Assets, MeshHandle, ShaderHandle, TextureHandle};
pub use texture::{FilterMode, Texture, TextureDesc, WrapMode};
