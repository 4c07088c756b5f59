//! Content pipeline for faqkit.
//!
//! Turns the markdown trees discovered by `faqkit-discovery` into enhanced,
//! cross-referenced and validated items, and assembles them into the keyed
//! [`SiteData`](assembler::SiteData) structure (see [`pipeline::run_build`]).

pub mod assembler;
pub mod crossref;
pub mod enhance;
pub mod items;
pub mod parser;
pub mod pipeline;
pub mod registry;
pub mod schema;
pub mod validator;
