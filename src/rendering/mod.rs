pub mod pipeline;
#[cfg(test)]
pub(crate) mod recording;

// Re-export main types
pub use pipeline::{Renderer, RenderPipeline, Rgba, RED, TRANSPARENT};
