//! Bill-of-materials component hierarchy
//!
//! Components (projects, assemblies, parts, bought hardware) live in an
//! arena-backed tree, carry typed fields and hierarchical tags, and are
//! exposed to views through [`application::ComponentModel`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
