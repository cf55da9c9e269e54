use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use mdtext::{BlockNode, InlineTextStyles, RenderContext};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

mod config;
mod rules;
mod watch;

use config::Config;
use rules::RuleSet;

#[derive(Parser)]
#[command(
    name = "mdtext",
    version,
    about = "Rewrite Markdown trees and render them as styled text"
)]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Path to a config file (default: ./mdtext.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum RenderFormat {
    Terminal,
    Plain,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum TreeFormat {
    Markdown,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a document as styled text
    Render {
        /// Path to the .md file or .json tree
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value = "terminal")]
        format: RenderFormat,

        /// Base URL for resolving relative links (overrides config)
        #[arg(long)]
        base_url: Option<String>,

        /// Re-render whenever the file changes
        #[arg(long)]
        watch: bool,
    },

    /// Apply rewrite rules and print the resulting tree
    Rewrite {
        /// Path to the .md file or .json tree
        file: String,

        /// Remove all images
        #[arg(long)]
        drop_images: bool,

        /// Replace links with their text
        #[arg(long)]
        unwrap_links: bool,

        /// Remove raw HTML, inline and block
        #[arg(long)]
        drop_html: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "markdown")]
        format: TreeFormat,
    },

    /// List link destinations in files or directories
    Links {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Validate document(s)
    Validate {
        /// Path to the .md file(s) or .json tree(s)
        #[arg(required = true)]
        files: Vec<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    let config = config::load_config(&cwd, cli.config.as_deref())?;

    match cli.command {
        Commands::Render {
            file,
            format,
            base_url,
            watch,
        } => {
            let ctx = render_context(&config, base_url.as_deref())?;
            let rules = RuleSet::from_flags(config.rewrite, false, false, false);
            if watch {
                watch::watch_and_render(&file, cli.quiet, || {
                    handle_render(&file, format, &ctx, rules)
                })?;
            } else {
                handle_render(&file, format, &ctx, rules)?;
            }
        }
        Commands::Rewrite {
            file,
            drop_images,
            unwrap_links,
            drop_html,
            format,
        } => {
            let rules = RuleSet::from_flags(config.rewrite, drop_images, unwrap_links, drop_html);
            handle_rewrite(&file, rules, format)?;
        }
        Commands::Links { paths } => {
            handle_links(&paths, cli.quiet)?;
        }
        Commands::Validate { files } => {
            handle_validate(&files)?;
        }
    }

    Ok(())
}

/// Build the render context from config, with `--base-url` taking precedence.
fn render_context(config: &Config, base_url: Option<&str>) -> Result<RenderContext> {
    let styles = InlineTextStyles::from_sheet(config.styles.clone());
    let ctx = RenderContext::new(styles);
    match base_url.or(config.base_url.as_deref()) {
        Some(url) => Ok(ctx.with_base_url_str(url)?),
        None => Ok(ctx),
    }
}

/// Read a document: `.json` files hold a serialized tree, anything else is Markdown.
fn load_blocks(file: &str) -> Result<Vec<BlockNode>> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read '{}': {}", file, e))?;

    let is_json = Path::new(file)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        mdtext::from_json(&content).with_context(|| format!("Failed to decode tree in '{}'", file))
    } else {
        Ok(mdtext::parse(&content))
    }
}

fn handle_render(
    file: &str,
    format: RenderFormat,
    ctx: &RenderContext,
    rules: RuleSet,
) -> Result<()> {
    let blocks = rules.apply(load_blocks(file)?);

    let output = match format {
        RenderFormat::Terminal => mdtext::render_term::to_terminal(&blocks, ctx),
        RenderFormat::Plain => mdtext::render_blocks(&blocks, ctx)
            .iter()
            .map(|text| text.plain())
            .collect::<Vec<_>>()
            .join("\n\n"),
        RenderFormat::Json => serde_json::to_string_pretty(&mdtext::render_blocks(&blocks, ctx))?,
    };

    println!("{output}");
    Ok(())
}

fn handle_rewrite(file: &str, rules: RuleSet, format: TreeFormat) -> Result<()> {
    let blocks = rules.apply(load_blocks(file)?);

    match format {
        TreeFormat::Markdown => print!("{}", mdtext::to_markdown(&blocks)),
        TreeFormat::Json => println!("{}", mdtext::to_json(&blocks)?),
    }
    Ok(())
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "md" | "markdown"))
}

fn handle_links(paths: &[String], quiet: bool) -> Result<()> {
    let mut total = 0;

    for root in paths {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk '{}'", root))?;
            let path = entry.path();
            // Explicit file arguments are always read; directories only yield Markdown files.
            if !entry.file_type().is_file() || (entry.depth() > 0 && !is_markdown(path)) {
                continue;
            }

            let file = path.to_string_lossy();
            let blocks = load_blocks(&file)?;
            for destination in mdtext::link_destinations(&blocks) {
                println!("{}: {}", file, destination);
                total += 1;
            }
        }
    }

    if !quiet {
        eprintln!("{} {} link(s)", "Found".green().bold(), total);
    }
    Ok(())
}

fn handle_validate(files: &[String]) -> Result<()> {
    let mut has_errors = false;

    for file in files {
        let blocks = load_blocks(file)?;
        let diagnostics = mdtext::validate(&blocks);

        if diagnostics.is_empty() {
            println!("{}: {}", file, "OK".green());
        } else {
            for diag in &diagnostics {
                let severity_str = match diag.severity {
                    mdtext::Severity::Error => {
                        has_errors = true;
                        format!("{}", "error".red().bold())
                    }
                    mdtext::Severity::Warning => {
                        format!("{}", "warning".yellow().bold())
                    }
                    mdtext::Severity::Info => {
                        format!("{}", "info".cyan().bold())
                    }
                };

                let code_str = match &diag.code {
                    Some(c) => format!("[{}] ", c),
                    None => String::new(),
                };

                println!("{file}: {severity_str}: {code_str}{}", diag.message);
            }
        }
    }

    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}
