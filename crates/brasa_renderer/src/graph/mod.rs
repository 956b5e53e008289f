pub mod frame_packet;
pub mod pass;
pub mod targets;

pub use frame_packet::{DrawCommand, FramePacket};
pub use pass::{PassNode, RenderPass};
pub use targets::{ColorAttachment, DepthAttachment, Framebuffer, TargetConfig, TargetState};
