// Shared test support code for the refresher cases.

pub mod common;
pub mod source;
pub mod storage;

pub use common::*;
pub use source::Source;
pub use storage::ScriptedStorage;
