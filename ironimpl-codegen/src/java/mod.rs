//! Java source generation modules.

pub mod body;
pub mod emitter;
pub mod signature;

pub use body::ReturnCategory;
pub use emitter::{GeneratedSource, SourceEmitter};
pub use signature::SignatureRenderer;
