//! Core library for vlsigen
//!
//! This crate implements the **Functional Core** of the vlsigen application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`vlsigen_core`** (this crate): Pure transformation functions over model output
//! - **`vlsigen`**: Model calls, CLI and MCP server (the Imperative Shell)
//!
//! Every function in [`generate`] is pure: the same raw response and prompt
//! always produce the same [`generate::GenerationResult`], and no call keeps
//! state between invocations. Compiled regular expressions are shared
//! read-only, so any number of threads may interpret responses concurrently.
//! Only [`project`] touches the filesystem.
//!
//! # Module Organization
//!
//! - [`generate`]: Sanitizing, naming, module scanning, testbench synthesis
//!   and response interpretation
//! - [`project`]: Listing and saving `.v` files in a project directory
//!
//! # Example Usage
//!
//! ```rust
//! use vlsigen_core::generate::{interpret, GenerationResult};
//!
//! let raw = "module counter(input clk, output [3:0] q);\nendmodule";
//! let result = interpret(raw, "generate a 4-bit counter with reset");
//!
//! let (main, testbench) = result.file_pair().unwrap();
//! assert_eq!(main.name, "4-bit-counter.v");
//! assert_eq!(testbench.name, "4-bit-counter-testbench.v");
//! assert!(testbench.content.contains("counter uut ("));
//! ```

pub mod error;
pub mod generate;
pub mod project;

pub use error::Error;
