mod test_runner;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use capsule::{BuildReport, SiteConfig};
use zwc::Warning;

const SUBCOMMANDS: &[&str] = &["build", "page", "test", "help"];

#[derive(Parser)]
#[command(name = "zwc", version, about = "Compile .zwc markup into an HTML capsule")]
struct Cli {
    /// Disable colored warning output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build every page and directory index
    Build(BuildArgs),

    /// Compile a single markup file to stdout
    Page(PageArgs),

    /// Run .test.zwc fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct BuildArgs {
    /// Directory of markup sources
    #[arg(short, long, default_value = "rawpages")]
    input: PathBuf,

    /// Directory generated pages are written to
    #[arg(short, long, default_value = "genpages")]
    output: PathBuf,

    /// Directory of numbered template fragments
    #[arg(short, long, default_value = "templates")]
    templates: PathBuf,

    /// Suppress warnings (fatal errors are still reported)
    #[arg(short, long)]
    quiet: bool,
}

impl Default for BuildArgs {
    fn default() -> Self {
        let defaults = SiteConfig::default();
        BuildArgs {
            input: defaults.input,
            output: defaults.output,
            templates: defaults.templates,
            quiet: false,
        }
    }
}

#[derive(clap::Args)]
struct PageArgs {
    /// Markup file to compile
    file: PathBuf,

    /// Directory of numbered template fragments
    #[arg(short, long, default_value = "templates")]
    templates: PathBuf,

    /// Print only the compiled body fragment, without page boilerplate
    #[arg(long)]
    body_only: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.zwc file or directory containing them
    path: String,

    /// Run only fixtures in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // `zwc page.zwc` works like `zwc page page.zwc`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(pos) = args
        .iter()
        .skip(1)
        .position(|a| !a.starts_with('-'))
        .map(|p| p + 1)
    {
        if !SUBCOMMANDS.contains(&args[pos].as_str()) && args[pos].ends_with(".zwc") {
            args.insert(pos, "page".to_string());
        }
    }

    let cli = Cli::parse_from(&args);
    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    match cli.command.unwrap_or_else(|| Command::Build(BuildArgs::default())) {
        Command::Build(build_args) => do_build(build_args, color_choice),
        Command::Page(page_args) => do_page(page_args, color_choice),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

fn do_build(args: BuildArgs, color_choice: ColorChoice) {
    let config = SiteConfig {
        input: args.input,
        output: args.output,
        templates: args.templates,
    };
    log::debug!(
        "building {} into {} with templates from {}",
        config.input.display(),
        config.output.display(),
        config.templates.display()
    );

    let report = match capsule::build_site(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    if !args.quiet {
        emit_report(&report, color_choice);
    }
    eprintln!(
        "built {} pages ({} warnings)",
        report.pages.len(),
        report.warning_count()
    );
}

fn do_page(args: PageArgs, color_choice: ColorChoice) {
    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file.display(), e);
            process::exit(1);
        }
    };

    let store = match capsule::load_templates(&args.templates) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.display().to_string(), source.clone());

    let (html, warnings) = if args.body_only {
        let compiled = zwc::Compiler::new(&store, zwc::standard_syntax())
            .with_source_id(file_id)
            .compile(&source);
        (compiled.html, compiled.warnings)
    } else {
        let fallback = args
            .file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (page, warnings) = zwc::compile_page(&source, &fallback, &store, file_id);
        (page.html, warnings)
    };

    let writer = StandardStream::stderr(color_choice);
    emit_warnings(&writer, &files, &warnings);
    print!("{}", html);
}

fn emit_report(report: &BuildReport, color_choice: ColorChoice) {
    let mut files = SimpleFiles::new();
    for page in &report.pages {
        files.add(page.source.display().to_string(), page.text.clone());
    }

    let writer = StandardStream::stderr(color_choice);
    for page in &report.pages {
        emit_warnings(&writer, &files, &page.warnings);
    }
}

fn emit_warnings(
    writer: &StandardStream,
    files: &SimpleFiles<String, String>,
    warnings: &[Warning],
) {
    let config = term::Config::default();
    for warning in warnings {
        if warning.span.is_some() {
            let diagnostic = warning.to_diagnostic();
            let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic);
        } else {
            eprintln!("warning: {}", warning);
        }
    }
}
