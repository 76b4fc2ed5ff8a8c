//! `config.toml` loading.
//!
//! ```toml
//! prompt = "<bold>QUERY</bold>> %q"
//! separator = " >< "
//! fold-fields = [1]
//! results-top-down = true
//!
//! [theme]
//! selected = ["reverse"]
//! ```

use std::{
  io,
  path::{
    Path,
    PathBuf,
  },
};

use serde::Deserialize;
use the_lib::{
  error::SeparatorError,
  fields::Separator,
  render::RenderConfig,
  style::Theme,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("failed to read {}: {source}", .path.display())]
  Read {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("failed to parse {}: {source}", .path.display())]
  Parse {
    path:   PathBuf,
    #[source]
    source: toml::de::Error,
  },
  #[error(transparent)]
  Separator(#[from] SeparatorError),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  pub prompt:           Option<String>,
  pub rprompt:          Option<String>,
  pub separator:        Option<String>,
  /// Treat `separator` as a regular expression.
  pub separator_regex:  bool,
  pub fold_fields:      Vec<usize>,
  pub placeholder:      Option<String>,
  pub results_top_down: Option<bool>,
  pub prompt_on_top:    Option<bool>,
  pub theme:            Theme,
}

/// Settings given on the command line; they win over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
  pub prompt:        Option<String>,
  pub rprompt:       Option<String>,
  pub separator:     Option<String>,
  pub fold:          Option<Vec<usize>>,
  pub bottom_up:     bool,
  pub prompt_bottom: bool,
}

impl Config {
  /// Reads `path`; a missing file is the default config.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let text = match std::fs::read_to_string(path) {
      Ok(text) => text,
      Err(err) if err.kind() == io::ErrorKind::NotFound => {
        log::debug!("no config at {}", path.display());
        return Ok(Self::default());
      },
      Err(source) => {
        return Err(ConfigError::Read {
          path: path.to_path_buf(),
          source,
        });
      },
    };
    Self::parse(&text).map_err(|source| {
      ConfigError::Parse {
        path: path.to_path_buf(),
        source,
      }
    })
  }

  pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(text)
  }

  pub fn render_config(&self, overrides: &Overrides) -> Result<RenderConfig, ConfigError> {
    let mut config = RenderConfig {
      theme: self.theme,
      ..RenderConfig::default()
    };

    if let Some(prompt) = overrides.prompt.as_ref().or(self.prompt.as_ref()) {
      config.prompt = prompt.clone();
    }
    if let Some(rprompt) = overrides.rprompt.as_ref().or(self.rprompt.as_ref()) {
      config.rprompt = rprompt.clone();
    }
    if let Some(placeholder) = &self.placeholder {
      config.placeholder = placeholder.clone();
    }
    if let Some(separator) = overrides.separator.as_ref().or(self.separator.as_ref()) {
      config.separator = if self.separator_regex {
        Separator::pattern(separator)?
      } else {
        Separator::literal(separator)?
      };
    }

    let fold = overrides.fold.as_deref().unwrap_or(&self.fold_fields);
    config.fold = fold.iter().copied().collect();

    config.results_top_down = !overrides.bottom_up && self.results_top_down.unwrap_or(true);
    config.prompt_on_top = !overrides.prompt_bottom && self.prompt_on_top.unwrap_or(true);
    Ok(config)
  }
}

#[cfg(test)]
mod test {
  use the_lib::style::{
    Color,
    Modifier,
  };

  use super::*;

  #[test]
  fn parses_every_key() {
    let config = Config::parse(
      r#"
      prompt = "> %q"
      rprompt = "%i"
      separator = '\s*\|\s*'
      separator-regex = true
      fold-fields = [0, 2]
      placeholder = "~"
      results-top-down = false
      prompt-on-top = false

      [theme]
      selected = ["reverse", "on_blue"]
      "#,
    )
    .unwrap();

    let render = config.render_config(&Overrides::default()).unwrap();
    assert_eq!(render.prompt, "> %q");
    assert_eq!(render.rprompt, "%i");
    assert_eq!(render.placeholder, "~");
    assert!(render.fold.contains(0) && render.fold.contains(2));
    assert!(!render.results_top_down);
    assert!(!render.prompt_on_top);
    assert_eq!(render.theme.selected.modifiers, Modifier::REVERSE);
    assert_eq!(render.theme.selected.bg, Some(Color::Blue));
    // untouched theme entries keep their defaults
    assert_eq!(render.theme.marked, Theme::default().marked);
  }

  #[test]
  fn rejects_unknown_keys() {
    assert!(Config::parse("promt = \"x\"").is_err());
    assert!(Config::parse("[theme]\nfoo = []").is_err());
  }

  #[test]
  fn overrides_win() {
    let config = Config::parse("prompt = \"file\"\nfold-fields = [1]").unwrap();
    let overrides = Overrides {
      prompt: Some("cli".into()),
      fold: Some(vec![3]),
      bottom_up: true,
      ..Overrides::default()
    };
    let render = config.render_config(&overrides).unwrap();
    assert_eq!(render.prompt, "cli");
    assert!(render.fold.contains(3) && !render.fold.contains(1));
    assert!(!render.results_top_down);
    assert!(render.prompt_on_top);
  }

  #[test]
  fn bad_separator_is_an_error() {
    let config = Config::parse("separator = \"(\"\nseparator-regex = true").unwrap();
    assert!(matches!(
      config.render_config(&Overrides::default()),
      Err(ConfigError::Separator(_))
    ));
  }

  #[test]
  fn missing_file_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("config.toml")).unwrap();
    assert_eq!(config, Config::default());
  }

  #[test]
  fn broken_file_names_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "prompt = ").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(err.to_string().contains("config.toml"), "{err}");
  }
}
