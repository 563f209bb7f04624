// Package model provides the refreshable value snapshot.

pub mod refreshable;


// Re-export main types
pub use refreshable::Refreshable;
