//! Squeeze - CLI

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use squeeze::util::logger::{self, LogLevel};
use squeeze::util::span::SourceFile;
use squeeze::{minify, CommentPolicy, ErrorPresenter, MinifyError, MinifyOptions, SourceMapOptions, NAME, VERSION};

/// Minify ECMAScript 5 source files
#[derive(Parser, Debug)]
#[command(name = NAME)]
#[command(version = VERSION)]
#[command(about = "Parse, compress, mangle and print ECMAScript 5 source", long_about = None)]
struct Args {
    /// Input files, concatenated in order; stdin when empty
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,

    /// Write a source map to this file
    #[arg(long, value_name = "FILE")]
    source_map: Option<PathBuf>,

    /// Map describing the input, composed into the output map
    #[arg(long, value_name = "FILE")]
    in_source_map: Option<PathBuf>,

    /// `sourceRoot` recorded in the map
    #[arg(long, value_name = "URL")]
    source_map_root: Option<String>,

    /// URL written in the `sourceMappingURL` annotation
    #[arg(long, value_name = "URL")]
    source_map_url: Option<String>,

    /// Embed the input text in the map
    #[arg(long)]
    source_map_include_sources: bool,

    /// Skip renaming
    #[arg(long)]
    no_mangle: bool,

    /// Skip compression
    #[arg(long)]
    no_compress: bool,

    /// Compress and mangle top-level bindings
    #[arg(long)]
    toplevel: bool,

    /// Keep function names
    #[arg(long)]
    keep_fnames: bool,

    /// Beautify the output
    #[arg(short, long)]
    beautify: bool,

    /// Comments to keep: all, none, jsdoc, copyright or a regular expression
    #[arg(long, value_name = "POLICY", value_parser = parse_comment_policy)]
    comments: Option<CommentPolicy>,

    /// Global constant, NAME=JSON; repeatable
    #[arg(short, long = "define", value_name = "NAME=VALUE")]
    defines: Vec<String>,

    /// JSON file with the full option set; flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More logging; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_comment_policy(value: &str) -> Result<CommentPolicy, String> {
    Ok(match value {
        "all" => CommentPolicy::All,
        "none" => CommentPolicy::None,
        "jsdoc" => CommentPolicy::Jsdoc,
        "copyright" => CommentPolicy::Copyright,
        pattern => {
            regex::Regex::new(pattern).map_err(|e| e.to_string())?;
            CommentPolicy::Regex(pattern.to_string())
        }
    })
}

fn build_options(args: &Args) -> Result<MinifyOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("Failed to read config: {}", path.display()))?;
            MinifyOptions::from_json(&json).with_context(|| format!("Invalid config: {}", path.display()))?
        }
        None => MinifyOptions::default(),
    };

    if args.no_compress {
        options = options.without_compress();
    }
    if args.no_mangle {
        options = options.without_mangle();
    }
    if args.toplevel {
        options = options.toplevel();
    }
    if args.keep_fnames {
        options = options.keep_fnames();
    }
    if args.beautify {
        options.output.beautify = true;
    }
    if let Some(policy) = &args.comments {
        options.output.comments = policy.clone();
    }
    if let Some(compress) = &mut options.compress {
        for define in &args.defines {
            let (name, value) = define.split_once('=').unwrap_or((define.as_str(), "true"));
            let value = serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
            compress.global_defs.insert(name.to_string(), value);
        }
    }
    if let [file] = args.files.as_slice() {
        options.parse.source_name = Some(file.display().to_string());
    }

    if args.source_map.is_some() {
        let input_map = match &args.in_source_map {
            Some(path) => Some(
                fs::read_to_string(path).with_context(|| format!("Failed to read source map: {}", path.display()))?,
            ),
            None => None,
        };
        let base = options.source_map.take().unwrap_or_default();
        options.source_map = Some(SourceMapOptions {
            file: args.output.as_ref().map(|path| path.display().to_string()).or(base.file),
            root: args.source_map_root.clone().or(base.root),
            input_map: input_map.or(base.input_map),
            sources_content: args.source_map_include_sources || base.sources_content,
            map_url: args.source_map_url.clone().or(base.map_url),
            ..base
        });
    }
    Ok(options)
}

fn read_input(files: &[PathBuf]) -> Result<String> {
    if files.is_empty() {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source).context("Failed to read stdin")?;
        return Ok(source);
    }
    let mut sources = Vec::with_capacity(files.len());
    for file in files {
        sources.push(fs::read_to_string(file).with_context(|| format!("Failed to read: {}", file.display()))?);
    }
    Ok(sources.join("\n"))
}

fn report(
    error: &MinifyError,
    source: &str,
    args: &Args,
    context_lines: usize,
) {
    let name = match args.files.as_slice() {
        [file] => file.display().to_string(),
        _ => "<stdin>".to_string(),
    };
    let presenter = ErrorPresenter::default()
        .with_context_lines(context_lines)
        .with_colors(io::stderr().is_terminal());
    eprint!("{}", presenter.render(error, &SourceFile::new(name, source.to_string())));
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    logger::init_with_level(LogLevel::from_verbosity(args.verbose));
    tracing::info!("{} {}", NAME, VERSION);

    let options = build_options(&args)?;
    let source = read_input(&args.files)?;

    let output = match minify(&source, &options) {
        Ok(output) => output,
        Err(error) => {
            report(&error, &source, &args, options.error_context_lines);
            return Ok(ExitCode::FAILURE);
        }
    };

    match &args.output {
        Some(path) => fs::write(path, &output.code).with_context(|| format!("Failed to write: {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.code.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    if let (Some(path), Some(map)) = (&args.source_map, &output.map) {
        fs::write(path, map).with_context(|| format!("Failed to write source map: {}", path.display()))?;
    }
    Ok(ExitCode::SUCCESS)
}
