use thiserror::Error;

/// Errors raised by a drawing surface.
///
/// None of these are fatal: the frame composer recovers per row and at worst
/// replaces a row with an error banner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
  /// A write started outside the surface.
  #[error("write at row {row}, col {col} is outside the {width}x{height} surface")]
  OutOfBounds {
    row:    usize,
    col:    usize,
    width:  usize,
    height: usize,
  },

  /// A row stepped upwards from `origin` past the first row.
  #[error("row {origin} - {offset} is above the surface")]
  AboveTop { origin: usize, offset: usize },

  /// The underlying terminal rejected a queued command.
  #[error("terminal write failed: {0}")]
  Io(String),
}

impl From<std::io::Error> for DrawError {
  fn from(err: std::io::Error) -> Self {
    Self::Io(err.to_string())
  }
}

/// Errors that abort a single refresh.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
  /// Flushing the composed frame to the terminal failed.
  #[error("failed to flush frame: {0}")]
  Flush(#[source] DrawError),
}

/// A field separator pattern that cannot split lines.
#[derive(Error, Debug)]
pub enum SeparatorError {
  #[error("invalid field separator '{pattern}': {source}")]
  Invalid {
    pattern: String,
    #[source]
    source:  regex::Error,
  },
  #[error("field separator '{pattern}' matches the empty string")]
  MatchesEmpty { pattern: String },
}

pub type Result<T> = std::result::Result<T, DrawError>;
