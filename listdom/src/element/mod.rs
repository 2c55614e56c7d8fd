mod content;
mod fragment;
mod node;

pub use content::Content;
pub use fragment::Fragment;
pub use node::Element;
