//! Identifier grammar and reference scanner for requirements traceability.
//!
//! Every traceable artifact — a requirement, a specification, or a test — is
//! named by a typed, hierarchical identifier such as `REQ-purpose` or
//! `SPC-scan-text`. Free-form documentation embeds `[[...]]` references to
//! those names; extracting them is the first step in building a
//! traceability graph. This crate defines the name grammar and the scanner;
//! resolving references against an actual artifact set is the consumer's
//! concern.

pub mod name;
pub use name::{Error as NameError, Kind, Name, SubName};

/// Scanning text for bracketed references to artifacts.
pub mod reference;
pub use reference::{Reference, References, references, subnames};
