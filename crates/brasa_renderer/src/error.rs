//! Fatal configuration errors raised during pipeline setup.
//!
//! Following the error taxonomy of this renderer: configuration problems
//! (incomplete framebuffers, shader compile failures) are unrecoverable and
//! surface as `RenderError`; uniform lookup misses are silent no-ops and
//! never reach this type; resource misuse (use-after-free, double-free) is
//! made unrepresentable by ownership instead of being checked at runtime.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// A WGSL stage failed to parse or validate.  `log` carries the full
    /// compiler diagnostic, including source spans.
    #[error("shader compilation failed ({stage}):\n{log}")]
    ShaderCompile { stage: &'static str, log: String },

    /// A render pass declared an attachment set that cannot form a valid
    /// framebuffer.  This is a programming error, not a runtime condition —
    /// initialization aborts.
    #[error("incomplete framebuffer for pass '{pass}': {reason}")]
    IncompleteFramebuffer { pass: String, reason: String },

    /// No suitable GPU adapter or device could be acquired.
    #[error("graphics context error: {0}")]
    Context(String),
}
