pub mod error;
pub mod index;
pub mod sidecar;
pub mod site;
pub mod templates;

pub use error::BuildError;
pub use sidecar::IndexMeta;
pub use site::{BuildReport, BuiltPage, SiteConfig, build_site, build_with_templates};
pub use templates::load_templates;
