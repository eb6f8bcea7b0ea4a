pub mod person_kind;
pub mod reference_kind;

pub use person_kind::PersonKind;
pub use reference_kind::{CategoryRef, ReferenceKind};
