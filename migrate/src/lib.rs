//! Rule-driven source migration engine.
//!
//! Applies ordered, idempotent text transformations to a declared set
//! of files. The architecture keeps a strict separation:
//!
//! - **[`rule`]**: Pure transformation logic (guards, edits, ordered
//!   application). No I/O, fully testable in isolation.
//! - **[`manifest`]**: Declarative TOML configuration, validated and
//!   compiled once at load; immutable during a run.
//! - **[`transform`]**: The single component allowed to touch the
//!   filesystem (read, conditional atomic write-back).
//! - **[`runner`] / [`report`]**: Orchestration and aggregation for
//!   the CLI.
//!
//! Runs are stateless: whether a rule still applies is decided by
//! inspecting content, never by external markers or run history.

pub mod logging;
pub mod manifest;
pub mod report;
pub mod rule;
pub mod runner;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod transform;
