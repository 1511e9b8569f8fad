pub mod color;
pub mod extractor;
pub mod types;

pub use color::{hex_to_rgba, rgba_to_hex};
pub use extractor::Extractor;
pub use types::{
    Complexity, ComponentNode, DesignTokens, Dimension, Direction, Display, ExtractMetadata,
    ExtractedDesign, LayoutInfo, NodeRole, PaddingBox, StyleInfo,
};
