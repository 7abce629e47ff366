pub mod classifier;

pub use classifier::{classify, DestructiveOp, Verdict};
