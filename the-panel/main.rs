//! Print the breadcrumbs of a line in a file.
//!
//! ```text
//! the-crumbs src/parser.py --line 120
//! the-crumbs --goto "    42:  def parse(self):"
//! ```

use std::{
  env,
  fs,
  path::PathBuf,
};

use anyhow::{
  Context,
  Result,
  bail,
};
use clap::Parser;
use log::LevelFilter;
use ropey::Rope;
use the_crumbs::{
  Settings,
  SettingsError,
};
use the_crumbs_core::{
  format_breadcrumbs,
  indent::DEFAULT_TAB_WIDTH,
  parse_crumb_line,
  resolve,
};

#[derive(Debug, Parser)]
#[command(name = "the-crumbs")]
#[command(about = "Show the lines that open the indentation level of a line")]
struct Cli {
  /// File to read
  file: Option<PathBuf>,

  /// 1-based line to resolve
  #[arg(short, long, value_name = "N")]
  line: Option<usize>,

  /// Columns per tab stop
  #[arg(long, default_value_t = DEFAULT_TAB_WIDTH)]
  tab_width: u16,

  /// Override `max_scan_lines` from the settings
  #[arg(long, value_name = "N")]
  max_scan_lines: Option<usize>,

  /// Load settings from a specific file
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Trace resolution decisions
  #[arg(long)]
  debug: bool,

  /// Print the line number a rendered breadcrumb row points at
  #[arg(long, value_name = "ROW")]
  goto: Option<String>,
}

fn load_settings(cli: &Cli) -> Result<Settings> {
  let mut settings = match &cli.config {
    Some(path) => {
      let text = fs::read_to_string(path).map_err(SettingsError::Io);
      let missing = Err(SettingsError::Io(std::io::ErrorKind::NotFound.into()));
      Settings::load(text, missing)
        .with_context(|| format!("failed to load settings from {}", path.display()))?
    },
    None => Settings::load_user_or_default(),
  };

  if let Some(max_scan_lines) = cli.max_scan_lines {
    if max_scan_lines == 0 {
      bail!("--max-scan-lines must be at least 1");
    }
    settings.max_scan_lines = max_scan_lines;
  }
  settings.debug |= cli.debug;
  Ok(settings)
}

/// Install the logger before anything can log. Without `RUST_LOG` it lets
/// through warnings only until [`raise_to_debug`] is called.
fn init_logging() -> Result<()> {
  let from_env = env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some();
  let logger = env_logger::Builder::new()
    .filter_level(LevelFilter::Debug)
    .parse_default_env()
    .build();
  let level = if from_env {
    logger.filter()
  } else {
    LevelFilter::Warn
  };
  log::set_boxed_logger(Box::new(logger))?;
  log::set_max_level(level);
  Ok(())
}

fn raise_to_debug() {
  if log::max_level() < LevelFilter::Debug {
    log::set_max_level(LevelFilter::Debug);
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging()?;
  let settings = load_settings(&cli)?;
  if settings.debug {
    raise_to_debug();
  }

  if let Some(row) = &cli.goto {
    match parse_crumb_line(row) {
      Some(line) => println!("{line}"),
      None => bail!("not a breadcrumb row: {row:?}"),
    }
    return Ok(());
  }

  let (Some(path), Some(line)) = (&cli.file, cli.line) else {
    bail!("a FILE and --line are required");
  };
  if line == 0 {
    bail!("line numbers start at 1");
  }

  let text =
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let rope = Rope::from_str(&text);
  let options = settings.resolve_options(cli.tab_width);
  log::debug!("resolving {}:{line} with {options:?}", path.display());

  print!(
    "{}",
    format_breadcrumbs(1, || resolve(line - 1, &rope, options))
  );
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn warnings_get_through_before_settings_are_loaded() {
    init_logging().unwrap();
    assert!(log::log_enabled!(log::Level::Warn));

    raise_to_debug();
    assert!(log::max_level() >= LevelFilter::Debug);
  }
}
