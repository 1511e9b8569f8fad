pub mod client;
pub mod guard;
pub mod reference;
pub mod types;

pub use client::{DesignClient, DesignSource};
pub use guard::{check_tree, TreeStats, WalkLimits};
pub use reference::{normalize_node_id, DesignRef};
pub use types::{
    AxisAlign, BoundingBox, DesignNode, Effect, EffectType, LayoutMode, LayoutWrap, Paint,
    PaintType, Rgba, TextStyle, Vector,
};
