pub mod codegen;
pub mod guide;
pub mod types;

pub use codegen::{
    build_generation_prompt, parse_generated_code, sanitize_component_name, CodeGenerator,
    GenerateOptions, GeneratedComponent, ParsedCode, SplitStrategy,
};
pub use guide::GuideBuilder;
pub use types::{ComponentUsage, GuideTokens, ImplementationGuide, QuickPrompt};
