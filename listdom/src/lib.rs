pub mod element;
pub mod surface;
pub mod transitions;
pub mod types;

pub use element::{Content, Element, Fragment};
pub use surface::{ElementSurface, LocatorKey, LocatorParseError, Surface};
pub use transitions::{Easing, TransitionConfig, Transitions};
pub use types::*;
