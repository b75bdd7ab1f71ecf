//! Configuration module

mod site;

pub use site::ComponentConfig;
pub use site::HighlightConfig;
pub use site::IndexConfig;
pub use site::OrderField;
pub use site::SiteConfig;
