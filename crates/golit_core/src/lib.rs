//! golit_core: Core source-location types for the golit Go literal scanner.
//!
//! Provides byte-offset spans and ranges plus a line map used to turn offsets
//! into the `line:col` positions Go tooling reports.

pub mod text;

pub use text::{LineMap, Position, TextPos, TextRange, TextSpan};
