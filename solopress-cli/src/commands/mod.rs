//! CLI command implementations.

pub mod build;
pub mod init;
pub mod new;

pub use build::build_site;
pub use init::init_project;
pub use new::new_content;
