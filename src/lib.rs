mod color;
mod error;
mod feature;
mod geometry;
mod layer;
mod parser;
mod registry;
mod style;
mod types;
mod workflow;
pub mod spacial;

#[cfg(feature = "egui")]
mod renderer;

#[cfg(feature = "egui")]
mod drawing;

#[cfg(feature = "egui")]
mod ui;

pub use color::*;
#[cfg(feature = "egui")]
pub use drawing::*;
pub use error::*;
pub use feature::*;
/// re-export 'geo_types' crate
pub use geo_types;
pub use geometry::*;
pub use layer::*;
pub use parser::*;
pub use registry::*;
#[cfg(feature = "egui")]
pub use renderer::*;
pub use spacial::Position;
pub use style::*;
pub use types::*;
#[cfg(feature = "egui")]
pub use ui::*;
/// re-export 'wkt' crate
pub use wkt;
pub use workflow::*;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
