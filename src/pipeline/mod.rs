//! Stage helpers used by [`crate::workflow::run_workflow`].
//!
//! ## Data Flow
//!
//! ```text
//! discover ──▶ extract(*) ──▶ consolidate ──▶ prompt ──▶ provider ──▶ validate
//! (read_dir)   (per file)     (one string)    (template+schema+text)
//! ```
//!
//! 1. [`discover`]    — list matching documents in the input folder, in a
//!    stable order
//! 2. [`consolidate`] — fold every extracted document into one delimited string
//! 3. [`prompt`]      — load the instruction template and assemble the prompt
//!
//! Extraction, dispatch and validation live in [`crate::extract`],
//! [`crate::provider`] and [`crate::schema`].

pub mod consolidate;
pub mod discover;
pub mod prompt;
