//! Readers that build breakpoint graphs from genome-order files.
//!
//! ## GRIMM
//!
//! ```text
//! # comment
//! >A
//! 1 -2 3 $      # linear chromosome
//! 4 5 @         # circular chromosome
//! >B
//! 1 2 3 $
//! ```
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `>name` | Starts a genome |
//! | `x` / `+x` | Block `x` in forward orientation (tail, then head) |
//! | `-x` | Block `x` reversed (head, then tail) |
//! | `$` | Ends a linear chromosome; both ends are capped with infinity vertices |
//! | `@` | Ends a circular chromosome; the last block joins the first |
//!
//! ## Example
//!
//! ```rust
//! use quartet_solver::parsing::grimm::parse_grimm_text;
//!
//! let graph = parse_grimm_text(">A\n1 2 @\n>B\n1 -2 @\n").unwrap();
//! assert_eq!(graph.genomes().len(), 2);
//! ```

pub mod grimm;

pub use grimm::{parse_grimm_file, parse_grimm_text, ParseError};
