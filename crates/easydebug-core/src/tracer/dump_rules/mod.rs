/*!
# Dump Rules

The two rules behind the tool's modes: injection adds a dump after every
binding, extraction removes every helper call and the helper itself.
*/

pub mod extract;
pub mod inject;

pub use extract::ExtractDumps;
pub use inject::InjectDumps;
