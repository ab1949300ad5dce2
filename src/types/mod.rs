//! Core types used across the QPAY kit.

mod amount;
mod fields;

pub use amount::*;
pub use fields::*;

/// String-keyed map for loosely structured gateway data, such as callback
/// parameters and toolkit replies.
pub type Record<V> = std::collections::HashMap<String, V>;
