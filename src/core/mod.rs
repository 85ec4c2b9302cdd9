//! Shared building blocks: numeric coercion, CNPJ handling, the XML element
//! tree with namespace-agnostic lookups, input sources and configuration.

mod config;
mod error;
pub mod numeric;
mod source;
pub mod taxid;
pub mod xml;

pub use config::*;
pub use error::*;
pub use numeric::{normalize_number, normalize_text};
pub use source::*;
pub use taxid::{digits_only, format_cnpj, normalize_cnpj};
pub use xml::{XmlNode, local_name, tag_text};
