//! DOT rendering
//!
//! [`traversal`] linearizes the containment tree, [`DotSerializer`] turns the
//! visit sequence into text.

mod serializer;
mod walk;
mod writer;

pub use serializer::DotSerializer;
pub use walk::{Visit, traversal};
pub use writer::DotWriter;
