mod svg;

pub use svg::{SvgAxisOptions, axis_to_svg};
