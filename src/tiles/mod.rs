pub mod cache;
pub mod source;

// Re-exports for convenience
pub use cache::{CachedTileSource, TileCache};
pub use source::{EmptyTileSource, ProviderTileSource, TileSource};
