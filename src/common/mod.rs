mod node;
mod slot;

pub use node::*;
pub use slot::*;
