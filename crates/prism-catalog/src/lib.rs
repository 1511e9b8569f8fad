pub mod model;
pub mod scanner;

pub use model::{
    CatalogComponent, CatalogSource, ComponentCategory, PropSpec, VariantAxis,
};
pub use scanner::{
    CatalogScanner, ComponentParser, GithubRepoSource, ReactComponentParser, SourceFile,
};
