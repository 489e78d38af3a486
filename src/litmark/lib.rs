//! # Litmark Architecture
//!
//! Litmark is the **directive-derivation core** of a literate-markdown
//! pipeline. A host toolchain parses a document, hands each fenced code
//! block's attribute bag (and source code) to this crate, and receives back
//! a directive record telling it what to render for that block. Litmark
//! itself never touches the document, never runs code, and never renders
//! anything.
//!
//! ## The Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host document parser (external)                            │
//! │  - Extracts per-block attribute bags and source code        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  AttributeBag
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Directive Deriver (directives.rs)                          │
//! │  - Decides whether the block is a literate block at all     │
//! │  - Maps attributes to requested output formats              │
//! │  - Mints isolated context names via ContextAllocator        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  AttributeDerivatives (or None)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Expression Resolver (resolve.rs)                           │
//! │  - Replaces "automatic" output requests with the symbols    │
//! │    the block's code introduces (via SymbolSource)           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  resolved AttributeDerivatives
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host rendering/evaluation engine (external)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Pure Core, External Edges
//!
//! Both core operations are pure functions over plain data:
//!
//! - [`directives::derive_directives`] never mutates the caller's bag and
//!   has exactly one side effect: minting an autogenerated context name when
//!   a block asks for isolation.
//! - [`resolve::resolve_expressions`] returns a structurally new record and
//!   leaves its input untouched.
//!
//! Everything with an outside surface sits behind a seam:
//!
//! - Code analysis is the [`symbols::SymbolSource`] trait. Production hosts
//!   plug in a real analyzer; tests use [`symbols::StaticSymbols`].
//! - Context-name allocation is [`context::ContextAllocator`], owned by
//!   whatever orchestrates per-document processing.
//!
//! ## Module Overview
//!
//! - [`attributes`]: The attribute bag model (`AttrValue`, `AttributeBag`)
//! - [`model`]: Core data types (`OutputFormat`, `AttributeDerivatives`)
//! - [`directives`]: Attribute-to-directive derivation
//! - [`resolve`]: Automatic output-expression resolution
//! - [`symbols`]: The code-analysis seam (`SymbolSource`)
//! - [`context`]: Autogenerated context-name allocation
//! - [`error`]: Error types

pub mod attributes;
pub mod context;
pub mod directives;
pub mod error;
pub mod model;
pub mod resolve;
pub mod symbols;
