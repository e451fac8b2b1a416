/**
 * Module Resolver
 * Resolves dotted module names to source files on the search path
 */
pub mod path;

pub use path::{PathResolver, ResolvedModule, NAMESPACE_DIR, PACKAGE_INIT, SOURCE_SUFFIX};
