//! `the-picker`: an interactive filter for lines read from a file or stdin.
//!
//! The interface is drawn on stderr; the chosen lines are printed to stdout
//! when the picker exits.

mod config;
mod ctx;
mod input;
mod matcher;
mod terminal;
mod theme;

use std::{
  fs::File,
  io::{
    self,
    BufRead,
    BufReader,
    Write,
  },
  path::PathBuf,
  sync::Arc,
  thread,
  time::Duration,
};

use clap::{
  ArgAction,
  Parser,
};
use crossterm::event::{
  self,
  Event,
};
use eyre::{
  Result,
  WrapErr,
};
use parking_lot::Mutex;
use the_lib::{
  render::FrameComposer,
  surface::Surface,
};

use crate::{
  config::{
    Config,
    Overrides,
  },
  ctx::Ctx,
  terminal::Terminal,
};

/// Lines handed to the shared state per lock.
const READ_BATCH: usize = 1000;

#[derive(Parser, Debug)]
#[command(name = "the-picker", about, long_about = None)]
struct Cli {
  /// Prompt template, e.g. "QUERY> %q"
  #[arg(long, value_name = "TEMPLATE")]
  prompt: Option<String>,

  /// Template drawn right-aligned on the prompt row
  #[arg(long, value_name = "TEMPLATE")]
  rprompt: Option<String>,

  /// Fields to collapse into the placeholder (comma separated)
  #[arg(long, value_name = "FIELDS", value_delimiter = ',')]
  fold: Option<Vec<usize>>,

  /// Field separator for --fold
  #[arg(long, value_name = "SEP")]
  separator: Option<String>,

  /// List results from the bottom of the screen upwards
  #[arg(long)]
  bottom_up: bool,

  /// Draw the prompt on the last row
  #[arg(long)]
  prompt_bottom: bool,

  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  verbosity: u8,

  /// Save logs to a specific file
  #[arg(long = "log-file", value_name = "FILE")]
  log_file: Option<PathBuf>,

  /// Load configuration from a specific file
  #[arg(short = 'c', long = "config", value_name = "FILE")]
  config_file: Option<PathBuf>,

  /// File to read lines from; stdin when absent
  input: Option<PathBuf>,
}

impl Cli {
  fn overrides(&self) -> Overrides {
    Overrides {
      prompt:        self.prompt.clone(),
      rprompt:       self.rprompt.clone(),
      separator:     self.separator.clone(),
      fold:          self.fold.clone(),
      bottom_up:     self.bottom_up,
      prompt_bottom: self.prompt_bottom,
    }
  }
}

fn setup_logging(verbosity: u8) -> Result<()> {
  let level = match verbosity {
    0 => log::LevelFilter::Warn,
    1 => log::LevelFilter::Info,
    2 => log::LevelFilter::Debug,
    _ => log::LevelFilter::Trace,
  };

  fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.target(),
        record.level(),
        message
      ))
    })
    .level(level)
    .chain(fern::log_file(the_loader::log_file())?)
    .apply()?;
  Ok(())
}

fn spawn_reader(input: Option<PathBuf>, ctx: Arc<Mutex<Ctx>>) -> Result<()> {
  let reader: Box<dyn BufRead + Send> = match &input {
    Some(path) => {
      let file =
        File::open(path).wrap_err_with(|| format!("failed to open {}", path.display()))?;
      Box::new(BufReader::new(file))
    },
    None => Box::new(BufReader::new(io::stdin())),
  };

  thread::Builder::new()
    .name("reader".into())
    .spawn(move || read_lines(reader, &ctx))?;
  Ok(())
}

fn read_lines(mut reader: Box<dyn BufRead + Send>, ctx: &Mutex<Ctx>) {
  let mut batch = Vec::with_capacity(READ_BATCH);
  let mut buf = Vec::new();
  loop {
    buf.clear();
    match reader.read_until(b'\n', &mut buf) {
      Ok(0) => break,
      Ok(_) => {
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        batch.push(String::from_utf8_lossy(line).into_owned());
        if batch.len() == READ_BATCH {
          ctx.lock().push_lines(batch.drain(..));
        }
      },
      Err(err) => {
        log::error!("failed to read input: {err}");
        break;
      },
    }
  }
  let mut ctx = ctx.lock();
  ctx.push_lines(batch);
  log::info!("read {} lines", ctx.line_count());
}

fn run(composer: &FrameComposer, ctx: &Mutex<Ctx>, terminal: &mut Terminal) -> Result<()> {
  loop {
    if ctx.lock().should_quit {
      return Ok(());
    }

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) => input::handle_key(&mut ctx.lock(), key),
        Event::Resize(width, height) => {
          terminal.resize(width, height);
          ctx.lock().resize(terminal.y_end() - terminal.y_begin());
        },
        _ => {},
      }
    }

    let needs_render = std::mem::take(&mut ctx.lock().needs_render);
    if needs_render {
      match composer.refresh(ctx, terminal) {
        Ok(report) => {
          for (row, err) in &report.failed_rows {
            log::debug!("row {row} not drawn: {err}");
          }
        },
        Err(err) => log::error!("{err}"),
      }
    }
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  the_loader::initialize_config_file(cli.config_file.clone());
  the_loader::initialize_log_file(cli.log_file.clone());
  setup_logging(cli.verbosity).wrap_err("failed to set up logging")?;

  let config_file = the_loader::config_file();
  let config = Config::load(&config_file).unwrap_or_else(|err| {
    eprintln!("{err}; using the default config");
    log::warn!("{err}");
    Config::default()
  });
  let render_config = config
    .render_config(&cli.overrides())
    .wrap_err("invalid render settings")?;
  let composer = FrameComposer::new(render_config);

  let mut terminal = Terminal::new()?;
  let ctx = Arc::new(Mutex::new(Ctx::new(
    terminal.y_end() - terminal.y_begin(),
  )));
  spawn_reader(cli.input.clone(), Arc::clone(&ctx))?;

  terminal.enter_raw_mode()?;
  let result = run(&composer, &ctx, &mut terminal);
  terminal.leave_raw_mode()?;
  result?;

  let selection = ctx.lock().selection.take();
  if let Some(lines) = selection {
    let mut stdout = io::stdout().lock();
    for line in lines {
      writeln!(stdout, "{line}")?;
    }
  }
  Ok(())
}
