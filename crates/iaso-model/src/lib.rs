#![deny(unsafe_code)]

pub mod descriptor;
pub mod error;
pub mod mapping;
pub mod truthy;

pub use descriptor::{Bind, DescriptorNode, FormVersion, Label, NodeKind, display_text};
pub use error::{ModelError, Result};
pub use mapping::{MappingSet, MappingValue, NEVER_MAPPED_TYPE};
pub use truthy::is_truthy;
