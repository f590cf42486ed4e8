//! pdf2epub CLI - convert PDF documents to EPUB e-books

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf2epub::convert::{ConvertOptions, Converter};
use pdf2epub::layout::{DEFAULT_INDENT_THRESHOLD, DEFAULT_MAX_BODY_X0};
use pdf2epub::model::{DEFAULT_AUTHOR, DEFAULT_LANGUAGE};
use pdf2epub::render::{pages_to_json, JsonFormat};
use pdf2epub::{has_pdf_extension, BookOptions, DocumentInfo, ExtractOptions, PageSelection};

#[derive(Parser, Debug)]
#[command(name = "pdf2epub")]
#[command(version)]
#[command(about = "Convert PDF files to EPUB format", long_about = None)]
#[command(after_help = "Examples:
  pdf2epub input.pdf
  pdf2epub input.pdf -o output.epub
  pdf2epub input.pdf --title \"My Book\" --author \"John Doe\"
  pdf2epub input.pdf --chapter-pages 5")]
struct Cli {
    /// Path to the input PDF file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output EPUB file path (default: input filename with .epub extension)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Book title (default: input filename without extension)
    #[arg(short, long)]
    title: Option<String>,

    /// Book author
    #[arg(short, long, default_value = DEFAULT_AUTHOR)]
    author: String,

    /// Book language code
    #[arg(short, long, default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Number of PDF pages per EPUB chapter
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    chapter_pages: u32,

    /// Minimum x-position (in points) for a line to count as an indented paragraph start
    #[arg(long, default_value_t = DEFAULT_INDENT_THRESHOLD, allow_negative_numbers = true)]
    indent_threshold: f32,

    /// Lines starting right of this x-position are treated as headers or marginalia and skipped
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_X0, allow_negative_numbers = true)]
    max_body_x0: f32,

    /// Page range to convert (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Use whole-page text extraction instead of layout reconstruction
    #[arg(long)]
    plain_text: bool,

    /// Fall back to plain text (then an empty page) when a page cannot be read
    #[arg(long)]
    lenient: bool,

    /// Disable parallel paragraph reconstruction
    #[arg(long)]
    sequential: bool,

    /// Also write the extracted page records as JSON
    #[arg(long, value_name = "FILE")]
    dump_pages: Option<PathBuf>,

    /// Print detailed progress information
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(pdf2epub::Error::InputNotFound(cli.input.clone()).into());
    }

    if !has_pdf_extension(&cli.input) {
        eprintln!(
            "{} Input file '{}' does not have .pdf extension",
            "Warning:".yellow().bold(),
            cli.input.display()
        );
    }

    let options = build_options(cli)?;
    let converter = Converter::new(options);
    let parser = converter.open(&cli.input)?;
    if cli.verbose {
        print_config(cli, converter.options(), &parser.info());
    }

    let pb = progress_bar(cli.verbose);
    let pages = parser.extract_pages_with_progress(|done, total| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    })?;
    pb.finish_and_clear();

    if cli.verbose {
        let words: usize = pages.iter().map(|p| p.word_count()).sum();
        println!("  Extracted {} pages ({} words)", pages.len(), words);
    }

    if let Some(ref path) = cli.dump_pages {
        write_page_dump(path, &pages)?;
        if cli.verbose {
            println!("  Page records written to {}", path.display());
        }
    }

    let report = converter.write_book(&cli.input, &pages)?;

    if cli.verbose {
        println!("  Total chapters: {}", report.chapter_count);
        println!("  Identifier: {}", report.metadata.identifier);
    }
    println!(
        "{} {}",
        "Successfully created:".green().bold(),
        report.output.display()
    );

    Ok(())
}

fn build_options(cli: &Cli) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
    let page_selection = match cli.pages {
        Some(ref p) => PageSelection::parse(p)?,
        None => PageSelection::All,
    };

    let mut extract = ExtractOptions::new()
        .with_indent_threshold(cli.indent_threshold)
        .with_max_body_x0(cli.max_body_x0)
        .with_pages(page_selection);
    if cli.plain_text {
        extract = extract.plain_text();
    }
    if cli.lenient {
        extract = extract.lenient();
    }
    if cli.sequential {
        extract = extract.sequential();
    }

    let mut book = BookOptions::new()
        .with_author(cli.author.clone())
        .with_language(cli.language.clone())
        .with_chapter_pages(cli.chapter_pages as usize);
    if let Some(ref title) = cli.title {
        book = book.with_title(title.clone());
    }

    let mut options = ConvertOptions::new().with_extract(extract).with_book(book);
    if let Some(ref output) = cli.output {
        options = options.with_output(output.clone());
    }
    options.validate()?;
    Ok(options)
}

fn print_config(cli: &Cli, options: &ConvertOptions, info: &DocumentInfo) {
    println!("{}", "Conversion Settings".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Input".bold(), cli.input.display());

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| pdf2epub::default_output_path(&cli.input));
    println!("{}: {}", "Output".bold(), output.display());

    let title = options
        .book
        .title
        .clone()
        .unwrap_or_else(|| pdf2epub::default_title(&cli.input));
    println!("{}: {}", "Title".bold(), title);
    println!("{}: {}", "Author".bold(), options.book.author);
    println!("{}: {}", "Language".bold(), options.book.language);
    println!("{}: {}", "Pages per chapter".bold(), options.book.chapter_pages);
    println!(
        "{}: {}",
        "Indent threshold".bold(),
        options.extract.segment.indent_threshold
    );
    println!(
        "{}: {}",
        "Max body x0".bold(),
        options.extract.segment.max_body_x0
    );

    println!("{}: PDF {}", "Format".bold(), info.pdf_version);
    println!("{}: {}", "Pages".bold(), info.page_count);
    if let Some(ref producer) = info.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    println!();
}

fn progress_bar(visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} pages {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message("Extracting...");
    pb
}

fn write_page_dump(path: &Path, pages: &[pdf2epub::Page]) -> Result<(), Box<dyn std::error::Error>> {
    let json = pages_to_json(pages, JsonFormat::Pretty)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["pdf2epub", "book.pdf"]).unwrap();
        assert_eq!(cli.author, "Unknown");
        assert_eq!(cli.language, "en");
        assert_eq!(cli.chapter_pages, 1);
        assert_eq!(cli.indent_threshold, 45.0);
        assert_eq!(cli.max_body_x0, 100.0);
        assert!(!cli.verbose);

        let options = build_options(&cli).unwrap();
        assert!(options.output.is_none());
        assert!(options.book.title.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "pdf2epub",
            "book.pdf",
            "-o",
            "out.epub",
            "-t",
            "Title",
            "-a",
            "Author",
            "-l",
            "fr",
            "--chapter-pages",
            "5",
            "--indent-threshold",
            "30",
            "--max-body-x0",
            "120",
            "--pages",
            "1-3",
            "--lenient",
            "-v",
        ])
        .unwrap();

        let options = build_options(&cli).unwrap();
        assert_eq!(options.output, Some(PathBuf::from("out.epub")));
        assert_eq!(options.book.title.as_deref(), Some("Title"));
        assert_eq!(options.book.author, "Author");
        assert_eq!(options.book.language, "fr");
        assert_eq!(options.book.chapter_pages, 5);
        assert_eq!(options.extract.segment.indent_threshold, 30.0);
        assert_eq!(options.extract.segment.max_body_x0, 120.0);
        assert_eq!(options.extract.pages, PageSelection::Range(1..=3));
    }

    #[test]
    fn test_zero_chapter_pages_rejected() {
        assert!(Cli::try_parse_from(["pdf2epub", "book.pdf", "--chapter-pages", "0"]).is_err());
    }

    #[test]
    fn test_bad_page_range_rejected() {
        let cli = Cli::try_parse_from(["pdf2epub", "book.pdf", "--pages", "5-2"]).unwrap();
        assert!(build_options(&cli).is_err());
    }

    #[test]
    fn test_missing_input_fails() {
        let cli = Cli::try_parse_from(["pdf2epub", "/no/such/book.pdf"]).unwrap();
        let err = run(&cli).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }

    #[test]
    fn test_huge_page_range_accepted() {
        let cli =
            Cli::try_parse_from(["pdf2epub", "book.pdf", "--pages", "1,2-4000000000"]).unwrap();
        let options = build_options(&cli).unwrap();
        assert!(options.extract.pages.includes(3_999_999_999));
    }

    #[test]
    fn test_unreadable_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.pdf");
        fs::write(&input, b"not really a pdf").unwrap();

        let cli = Cli::try_parse_from(["pdf2epub", input.to_str().unwrap()]).unwrap();
        assert!(run(&cli).is_err());
        assert!(!dir.path().join("scan.epub").exists());
    }
}
