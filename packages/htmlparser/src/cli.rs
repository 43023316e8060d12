//! Command-line interface for the HTML parser.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser as ClapParser, Subcommand};
use console::style;

use crate::dump::to_yaml;
use crate::error::Result;
use crate::factory::StringNodeFactory;
use crate::feedback::TracingFeedback;
use crate::filters::{NodeFilter, OrFilter, TagNameFilter};
use crate::list::NodeList;
use crate::page::Page;
use crate::parser::Parser;
use crate::visitors::TextExtractingVisitor;

/// HTML parser - extract tags, text and node trees from HTML documents.
#[derive(ClapParser)]
#[command(name = "htmlparser")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every node matching the given tag names.
    Extract {
        /// HTML file to read, or `-` for stdin
        file: PathBuf,

        /// Tag name to match (repeatable; default: every top-level node)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Print plain text instead of HTML
        #[arg(long)]
        text: bool,
    },

    /// Print the plain text of a document.
    Text {
        /// HTML file to read, or `-` for stdin
        file: PathBuf,

        /// Decode character references
        #[arg(long)]
        decode: bool,

        /// Remove tab, newline and carriage return characters
        #[arg(long)]
        strip_escapes: bool,

        /// Convert non-breaking spaces to plain spaces
        #[arg(long)]
        nbsp: bool,
    },

    /// Print the top-level node tree as YAML.
    Dump {
        /// HTML file to read, or `-` for stdin
        file: PathBuf,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Extract { file, tags, text } => extract_command(&file, &tags, text, &mut out),
        Commands::Text {
            file,
            decode,
            strip_escapes,
            nbsp,
        } => text_command(&file, decode, strip_escapes, nbsp, &mut out),
        Commands::Dump { file } => dump_command(&file, &mut out),
    }
}

/// Read `path` into a page, with `-` meaning stdin.
fn load_page(path: &Path) -> Result<Page> {
    if path.as_os_str() == "-" {
        let mut html = String::new();
        io::stdin().read_to_string(&mut html)?;
        return Ok(Page::new(html));
    }
    let html = std::fs::read_to_string(path)?;
    let url = format!("file://{}", path.display());
    Ok(Page::with_url(html, url))
}

fn parser_for(page: Page) -> Parser {
    let mut parser = Parser::default().with_feedback(Arc::new(TracingFeedback));
    parser.set_page(page);
    parser
}

/// Execute the extract command.
fn extract_command(path: &Path, tags: &[String], text: bool, out: &mut dyn Write) -> Result<()> {
    let mut parser = parser_for(load_page(path)?);

    let mut top = NodeList::new();
    parser.parse(None, |node| top.add(node.id()))?;

    let matches = if tags.is_empty() {
        top
    } else {
        let filter = OrFilter::new(
            tags.iter()
                .map(|name| Box::new(TagNameFilter::new(name.as_str())) as Box<dyn NodeFilter>)
                .collect(),
        );
        let open_tags = |node: crate::nodes::NodeRef<'_>| !node.is_end_tag() && filter.accept(node);
        top.extract_all_nodes_that_match(parser.arena(), &open_tags, true)
    };

    for node in matches.iter().filter_map(|id| parser.arena().node(id)) {
        let rendered = if text {
            node.to_plain_text()
        } else {
            node.to_html()
        };
        writeln!(out, "{rendered}")?;
    }
    tracing::info!(matches = matches.len(), "extract finished");
    Ok(())
}

/// Execute the text command.
fn text_command(
    path: &Path,
    decode: bool,
    strip_escapes: bool,
    nbsp: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let mut factory = StringNodeFactory::with_defaults();
    factory.set_decode(decode);
    factory.set_remove_escapes(strip_escapes);
    factory.set_convert_nbsp(nbsp);

    let mut parser = parser_for(load_page(path)?).with_node_factory(factory);
    let mut visitor = TextExtractingVisitor::new();
    parser.visit_all_nodes_with(&mut visitor)?;

    writeln!(out, "{}", visitor.text())?;
    Ok(())
}

/// Execute the dump command.
fn dump_command(path: &Path, out: &mut dyn Write) -> Result<()> {
    let mut parser = parser_for(load_page(path)?);
    let top = parser.extract_all_nodes_that_match(&|_: crate::nodes::NodeRef<'_>| true)?;

    if let Some(url) = parser.url() {
        eprintln!("{} {}", style("Dumping").bold(), style(url).cyan());
    }
    eprintln!(
        "  Encoding: {}, top-level nodes: {}",
        style(parser.encoding()).green(),
        top.len()
    );

    out.write_all(to_yaml(parser.arena(), top.as_slice())?.as_bytes())?;
    Ok(())
}
