pub mod builtins;
pub mod function;

pub mod prelude {
    pub use super::{builtins::*, function::*};
}
