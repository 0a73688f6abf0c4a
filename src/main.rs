//! `csscompress`: walks a directory and writes a minified sibling for every
//! CSS file in it.

use clap::Parser;
use csstree::printer::{NewlineMode, PrinterOptions};
use csstree::stylesheet::{CssVersion, ParserOptions, StyleSheet};
use csstree::traits::ToCss;
use encoding_rs::{Encoding, UTF_8};
use std::path::{Path, PathBuf};
use std::process;
use walkdir::WalkDir;

#[derive(Parser)]
#[clap(name = "csscompress", version, about = "Minify the CSS files in a directory")]
struct Cli {
  /// The directory to scan.
  directory: PathBuf,

  /// Descend into subdirectories.
  #[clap(short, long)]
  recursive: bool,

  /// Marker inserted before the extension of the output file:
  /// `style.css` becomes `style.min.css`.
  #[clap(long, default_value = "min")]
  suffix: String,

  /// Compress even when an up-to-date output file already exists.
  #[clap(short, long)]
  force: bool,

  /// Fallback charset for files without a BOM or `@charset` rule.
  #[clap(long, default_value = "utf-8")]
  source_encoding: String,

  /// Charset of the written output files.
  #[clap(long, default_value = "utf-8")]
  target_encoding: String,

  /// Recover from malformed input the way browsers do.
  #[clap(long)]
  browser_compliant: bool,

  /// Emit pretty-printed output instead of minified output.
  #[clap(long)]
  pretty: bool,

  /// Skip rules with empty bodies.
  #[clap(long)]
  remove_unnecessary_code: bool,

  /// Force url() tokens to be quoted.
  #[clap(long)]
  quote_urls: bool,

  /// Banner comment emitted at the top of every output file.
  #[clap(long)]
  header: Option<String>,

  /// Fail on constructs that require CSS 3 (@supports, calc(), …).
  #[clap(long)]
  css21_compat: bool,
}

fn lookup_encoding(label: &str) -> &'static Encoding {
  match Encoding::for_label(label.as_bytes()) {
    Some(encoding) => encoding,
    None => {
      log::warn!("unknown charset \"{}\", falling back to utf-8", label);
      UTF_8
    }
  }
}

fn output_path(source: &Path, suffix: &str) -> PathBuf {
  let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("out");
  source.with_file_name(format!("{}.{}.css", stem, suffix))
}

fn is_compressed(path: &Path, suffix: &str) -> bool {
  let marker = format!(".{}", suffix);
  path
    .file_stem()
    .and_then(|s| s.to_str())
    .map(|stem| stem.ends_with(&marker))
    .unwrap_or(false)
}

fn is_up_to_date(source: &Path, target: &Path) -> bool {
  let (source_time, target_time) = match (source.metadata(), target.metadata()) {
    (Ok(s), Ok(t)) => (s.modified(), t.modified()),
    _ => return false,
  };
  matches!((source_time, target_time), (Ok(s), Ok(t)) if t >= s)
}

fn compress_file(cli: &Cli, path: &Path) -> Result<bool, String> {
  let target = output_path(path, &cli.suffix);
  if !cli.force && is_up_to_date(path, &target) {
    return Ok(false);
  }

  let parser_options = ParserOptions {
    browser_compliant: cli.browser_compliant,
    fallback_encoding: lookup_encoding(&cli.source_encoding),
    ..ParserOptions::default()
  };
  let printer_options = PrinterOptions {
    minify: !cli.pretty,
    remove_empty_rules: cli.remove_unnecessary_code,
    quote_urls: cli.quote_urls,
    header: cli.header.clone(),
    newline: NewlineMode::Platform,
    version: if cli.css21_compat {
      CssVersion::Css21
    } else {
      CssVersion::Css30
    },
    ..PrinterOptions::default()
  };

  let sheet = StyleSheet::parse_file(path, &parser_options).map_err(|e| e.to_string())?;
  let css = sheet.to_css_string(&printer_options).map_err(|e| e.to_string())?;
  let (bytes, _, _) = lookup_encoding(&cli.target_encoding).encode(&css);
  std::fs::write(&target, &bytes).map_err(|e| e.to_string())?;
  Ok(true)
}

fn main() {
  env_logger::init();
  let cli = Cli::parse();

  if !cli.directory.is_dir() {
    eprintln!("csscompress: {} is not a directory", cli.directory.display());
    process::exit(1);
  }

  let interactive = atty::is(atty::Stream::Stdout);
  let max_depth = if cli.recursive { usize::MAX } else { 1 };
  let mut compressed = 0u32;
  let mut failed = 0u32;

  for entry in WalkDir::new(&cli.directory)
    .max_depth(max_depth)
    .into_iter()
    .filter_map(Result::ok)
  {
    let path = entry.path();
    if !entry.file_type().is_file()
      || path.extension().and_then(|e| e.to_str()) != Some("css")
      || is_compressed(path, &cli.suffix)
    {
      continue;
    }
    match compress_file(&cli, path) {
      Ok(true) => {
        compressed += 1;
        if interactive {
          println!("compressed {}", path.display());
        }
      }
      Ok(false) => {}
      // Per-file failures never abort the run.
      Err(message) => {
        failed += 1;
        log::error!("{}: {}", path.display(), message);
      }
    }
  }

  if interactive {
    println!("{} file(s) compressed, {} failed", compressed, failed);
  }
}
