pub mod error;
pub mod interface;
pub mod utils;

pub use error::{ErrorCategory, IfaceError, LlmError, Result};
pub use interface::{
    Access, GLOBAL_NAMESPACE, InterfaceKind, InterfaceRecord, MethodRecord, NamespacePath,
    SourceSpan, SourceUnit, UnitExtraction,
};
pub use utils::{collapse_whitespace, escape_pipes, tail_with_ellipsis, truncate_with_ellipsis};
