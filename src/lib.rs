//! A library for design space exploration of embedded systems. As of now, the library supports:
//!  - Specifications consisting of an application graph (tasks and messages), an architecture
//!    graph (resources and links), candidate mappings and per-message routings.
//!  - Attributed elements with typed parameters (ranges, discrete selections, unique ids).
//!  - Model transforms: resource and function filters, deep copy, shallow clone and a
//!    directed view of mixed architectures.
//!  - An XML round-trip of the whole specification (the wire format is part of the contract).
//!  - A symbolic encoder that compiles a specification into a linear pseudo-Boolean
//!    constraint system whose models correspond to valid implementations. The constraint
//!    system is handed to an external solver; this crate never evaluates it.
//!
//! The usual pipeline is: read a specification from XML, optionally narrow it down with the
//! filters in [model::ops], encode it with [encoding::encode], solve externally, and write
//! the implementation back to XML.

#[macro_use]
extern crate lazy_static;

/// The specification data model: attributed elements, graphs, mappings and routings.
pub mod model;

/// Import and export of specifications (XML wire format, TGFF benchmark adapter).
pub mod io;

/// The symbolic layer: decision variables, pseudo-Boolean constraints and the encoder.
pub mod encoding;
