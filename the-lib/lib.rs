//! Rendering core for the picker: turns a ranked, paginated result set and a
//! prompt template into one coherent screen frame.
//!
//! The pipeline, leaves first: [`fields`] splits a line into spans, [`fold`]
//! collapses selected fields, [`remap`] moves match offsets into folded
//! coordinates, [`page`] picks the visible window, [`prompt`] expands the
//! prompt template and [`render`] composes the frame on a [`surface`].

pub mod error;
pub mod fields;
pub mod fold;
pub mod markup;
pub mod model;
pub mod page;
pub mod prompt;
pub mod remap;
pub mod render;
pub mod style;
pub mod surface;

pub use error::{
  DrawError,
  RenderError,
};
