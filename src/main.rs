//! # Vitae CLI
//!
//! Usage:
//!   vitae --profile profile.json [--layout layout.json] -o resume.pdf
//!   vitae --profile profile.json --theme aqua --lang ar --font-dir fonts/
//!   vitae --example > layout.json

use std::env;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use vitae::{DocumentBuilder, Engine, Layout, Profile, Result, Theme};

const DEMO_LAYOUT: &str = include_str!("../demos/layout.json");

const USAGE: &str = "\
Usage: vitae --profile <profile.json> [options]

Options:
  --layout <file>      Layout JSON (default: built-in two-column layout)
  --theme <name|file>  Built-in theme (default, classic, aqua) or theme JSON
  --lang <code>        Document language, e.g. en, de, ar (default: en)
  --rtl                Force right-to-left layout
  --font-dir <dir>     Register .ttf/.otf files from a directory
  -o <file>            Output path (default: resume.pdf)
  --example            Print the built-in layout and exit";

#[derive(Debug, Default)]
struct Args {
    profile: Option<String>,
    layout: Option<String>,
    theme: Option<String>,
    lang: Option<String>,
    rtl: bool,
    font_dir: Option<String>,
    output: Option<String>,
    example: bool,
}

fn parse_args(raw: &[String]) -> std::result::Result<Args, String> {
    let mut args = Args::default();
    let mut iter = raw.iter().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} needs a value", arg))
        };
        match arg.as_str() {
            "--profile" => args.profile = Some(value()?),
            "--layout" => args.layout = Some(value()?),
            "--theme" => args.theme = Some(value()?),
            "--lang" => args.lang = Some(value()?),
            "--font-dir" => args.font_dir = Some(value()?),
            "-o" | "--output" => args.output = Some(value()?),
            "--rtl" => args.rtl = true,
            "--example" => args.example = true,
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }
    Ok(args)
}

/// A built-in theme name, or a path to a (possibly partial) theme file.
fn load_theme(arg: &str) -> Result<Theme> {
    if let Some(theme) = Theme::built_in(arg) {
        return Ok(theme);
    }
    if Path::new(arg).is_file() {
        return Theme::from_json(&fs::read_to_string(arg)?);
    }
    Ok(Theme::resolve(arg))
}

fn run(args: Args) -> Result<()> {
    let profile_path = args.profile.as_deref().unwrap_or("profile.json");
    let profile = Profile::from_json(&fs::read_to_string(profile_path)?)?;
    let layout = match args.layout.as_deref() {
        Some(path) => Layout::from_json(&fs::read_to_string(path)?)?,
        None => Layout::from_json(DEMO_LAYOUT)?,
    };

    let mut engine = Engine::builder();
    if let Some(dir) = &args.font_dir {
        engine = engine.with_font_dir(dir);
    }
    let engine = engine.build()?;

    let mut builder = DocumentBuilder::new(&engine)
        .lang(args.lang.as_deref().unwrap_or("en"))
        .rtl(args.rtl);
    if let Some(theme) = &args.theme {
        builder = builder.theme(load_theme(theme)?);
    }

    let output_path = args.output.as_deref().unwrap_or("resume.pdf");
    let doc = builder.render(&profile, &layout)?;
    fs::write(output_path, &doc.pdf)?;
    eprintln!(
        "✓ Written {} bytes ({} page(s)) to {}",
        doc.pdf.len(),
        doc.page_count,
        output_path
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let raw: Vec<String> = env::args().collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("✗ {}\n\n{}", msg, USAGE);
            return ExitCode::from(2);
        }
    };

    if args.example {
        print!("{}", DEMO_LAYOUT);
        return ExitCode::SUCCESS;
    }
    if args.profile.is_none() {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ Failed to render résumé: {}", e);
            ExitCode::FAILURE
        }
    }
}
