pub mod error;
pub mod keys;
pub mod reference;
pub mod result;
pub mod types;
pub mod visitor;

pub use error::*;
pub use reference::*;
pub use result::*;
pub use types::*;
pub use visitor::*;
