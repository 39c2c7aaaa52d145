//! Utility functions for the search client

pub mod url;
pub mod time;

pub use self::url::*;
pub use self::time::*;
