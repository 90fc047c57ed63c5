//! GitLab API model types.

mod build;
mod project;
mod tag;

pub use build::*;
pub use project::*;
pub use tag::*;
