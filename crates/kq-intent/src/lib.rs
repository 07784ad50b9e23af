pub mod action;
pub mod adhoc;
pub mod intent;
pub mod names;
pub mod resource;

pub use action::*;
pub use adhoc::*;
pub use intent::*;
pub use names::*;
pub use resource::*;
