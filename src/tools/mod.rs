pub mod echo;
pub mod registry;

pub use echo::*;
pub use registry::*;

/// How strictly tool arguments are checked against their declared schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArgumentPolicy {
    /// Missing required strings are treated as empty.
    #[default]
    Lenient,
    Strict,
}
