//! `copyright_core` is the core library for the
//! [copyright](https://github.com/ifiokjr/copyright) notice checker. It
//! resolves per-directory `.copyrightrc.yaml` files, finds copyright notices
//! described by a template, and decides whether the years they record are
//! out of date or could be written more compactly.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Directory tree
//!   → Config resolver (walks up to the rc file declaring `root: true`)
//!   → Tree walk (include/exclude filters, one config per directory)
//!   → Notice pattern (template with an `{intervals}` placeholder → regex)
//!   → Scanner (notices with line numbers and parsed year intervals)
//!   → Analyzer (ordered, human-readable corrections per notice)
//!   → Apply (rewrites only the notices that changed)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: rc file loading, the merge algebra and upward resolution.
//! - [`tree`]: walking a subtree and pairing files with their config.
//! - [`intervals`]: year and year range values.
//! - [`pattern`]: compiling notice templates.
//! - [`scanner`]: locating notices in text.
//! - [`analyzer`]: computing corrections.
//! - [`apply`]: rewriting text.
//! - [`pipeline`]: all of the above for one file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use copyright_core::pipeline::Pipeline;
//! use copyright_core::tree::iterate;
//! use std::path::Path;
//!
//! let mut pipeline = Pipeline::new();
//! for file in iterate(Path::new(".")).unwrap() {
//! 	let file = file.unwrap();
//! 	let text = std::fs::read_to_string(&file.path).unwrap();
//! 	let outcome = pipeline.process(&text, &file.config, Some(2024)).unwrap();
//!
//! 	for (line, change) in outcome.changes() {
//! 		println!("{}: {line}: {change}", file.path.display());
//! 	}
//! }
//! ```

pub use analyzer::Analyzer;
pub use analyzer::Update;
pub use config::Config;
pub use config::ResolvedConfig;
pub use error::*;
pub use intervals::Interval;
pub use pattern::NoticePattern;
pub use scanner::Notice;
pub use scanner::Scanner;
pub use tree::File;

pub mod analyzer;
pub mod apply;
pub mod config;
#[allow(unused_assignments)]
mod error;
pub mod intervals;
pub mod pattern;
pub mod pipeline;
pub mod scanner;
pub mod tree;
