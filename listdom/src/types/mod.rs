mod style;

pub use style::Style;
