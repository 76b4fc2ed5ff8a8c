//! Drawing the result list and prompt onto a [`crate::surface::Surface`].

pub mod config;
pub mod frame;
pub mod result_line;

pub use config::RenderConfig;
pub use frame::{
  FrameComposer,
  FrameReport,
};
pub use result_line::{
  RowState,
  render_result,
};
