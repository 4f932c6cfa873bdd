
pub use harness::*;
