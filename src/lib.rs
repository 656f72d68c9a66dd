//! # POLYBUNDLE
//!
//! Bundles Lua scripts for Polytoria into a single self-contained script.
//!
//! Polytoria has no module loader, so every `require("...")` is resolved at
//! build time. Each required module is evaluated once into a shared
//! `__module_env` table and every require call is rewritten into a lookup in
//! that table.
//!
//! ## Pipeline
//!
//! - **Resolve**: map each request to a file ([`crate::core::PathResolver`])
//! - **Discover**: walk requires from the entries, rejecting cycles ([`crate::core::GraphBuilder`])
//! - **Key**: label each module by its root-relative path ([`crate::core::KeyAssigner`])
//! - **Rewrite**: replace require calls with table lookups ([`crate::core::ReferenceRewriter`])
//! - **Assemble**: emit modules, then one coroutine per script ([`crate::formatters::LuaBundleFormatter`])

pub mod core;
pub mod formatters;
pub mod parsers;
pub mod project;
