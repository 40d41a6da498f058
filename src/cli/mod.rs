//! Command-line interface for folio.
//!
//! Provides commands for listing catalogs, showing a single document,
//! surfacing the featured item, searching, and inspecting configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config;
use crate::domain::ContentItem;
use crate::library::{Catalog, Resolver};

/// folio - Markdown content resolution for the company website
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Content root (overrides config file)
    #[arg(long, global = true, env = config::CONTENT_ROOT_ENV)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List items, newest first
    List {
        /// Content kind (all kinds if not specified)
        #[arg(short, long)]
        kind: Option<String>,

        /// Only items in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Maximum number of items to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single item by slug
    Show {
        /// Slug (or part of a file name) to resolve
        slug: String,

        /// Content kind (searches all kinds if not specified)
        #[arg(short, long)]
        kind: Option<String>,

        /// Category to try first
        #[arg(short, long)]
        category: Option<String>,

        /// Print metadata and content as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the most recent item
    Featured {
        /// Content kind (all kinds if not specified)
        #[arg(short, long)]
        kind: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search titles, descriptions, authors and keywords
    Search {
        /// Search query
        query: String,

        /// Content kind (all kinds if not specified)
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let resolver = build_resolver(self.root)?;

        match self.command {
            Commands::List {
                kind,
                category,
                limit,
                json,
            } => list_items(&resolver, kind.as_deref(), category.as_deref(), limit, json).await,
            Commands::Show {
                slug,
                kind,
                category,
                json,
            } => show_item(&resolver, &slug, kind.as_deref(), category.as_deref(), json).await,
            Commands::Featured { kind, json } => {
                show_featured(&resolver, kind.as_deref(), json).await
            }
            Commands::Search { query, kind } => {
                search_items(&resolver, &query, kind.as_deref()).await
            }
            Commands::Config => show_config(&resolver),
        }
    }
}

/// Build a resolver from configuration, honoring a root override
fn build_resolver(root: Option<PathBuf>) -> Result<Resolver> {
    let cfg = config::config()?;
    Ok(match root {
        Some(root) => Resolver::new(root, cfg.kinds.clone()),
        None => Resolver::from_config(cfg),
    })
}

/// Load the catalog for one kind, or all kinds
async fn load_catalog(resolver: &Resolver, kind: Option<&str>) -> Result<Catalog> {
    match kind {
        Some(kind) => Ok(resolver.catalog(kind).await?),
        None => Ok(resolver.catalog_all().await),
    }
}

/// Report skipped paths on stderr
fn print_warnings(catalog: &Catalog) {
    for warning in &catalog.warnings {
        eprintln!("warning: {}", warning);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

fn print_table(items: &[&ContentItem]) {
    println!("{:<32} {:<14} {:<18} {:<40}", "SLUG", "CATEGORY", "DATE", "TITLE");
    println!("{}", "-".repeat(106));

    for item in items {
        println!(
            "{:<32} {:<14} {:<18} {:<40}",
            truncate(&item.slug, 32),
            truncate(&item.category, 14),
            truncate(&item.date, 18),
            truncate(&item.title, 40)
        );
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

/// List items in the catalog
async fn list_items(
    resolver: &Resolver,
    kind: Option<&str>,
    category: Option<&str>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let catalog = load_catalog(resolver, kind).await?;
    print_warnings(&catalog);

    let mut items: Vec<&ContentItem> = match category {
        Some(category) => catalog.filter_by_category(category),
        None => catalog.list(None),
    };
    items.truncate(limit);

    if json {
        let listing = serde_json::json!({
            "featured": catalog.featured,
            "items": items,
        });
        println!("{}", to_json(&listing)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No content found under {}", resolver.root().display());
        return Ok(());
    }

    print_table(&items);
    println!("\nTotal: {} items", catalog.len());

    Ok(())
}

/// Show a single item
async fn show_item(
    resolver: &Resolver,
    slug: &str,
    kind: Option<&str>,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    let result = match kind {
        Some(kind) => resolver.resolve(kind, slug, category).await,
        None => resolver.resolve_any(slug, category).await,
    };

    let resolved = match result {
        Ok(resolved) => resolved,
        Err(e) if e.is_not_found() => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", to_json(&resolved)?);
        return Ok(());
    }

    let item = &resolved.metadata;
    println!("  Slug:       {}", item.slug);
    println!("  Title:      {}", item.title);
    println!("  Author:     {}", item.author);
    println!("  Kind:       {}", item.kind);
    println!("  Category:   {}", item.category);
    println!("  Date:       {}", item.date);
    println!("  Difficulty: {}", item.difficulty_level);
    println!("  Time:       {}", item.estimated_time);
    if !item.keywords.is_empty() {
        println!("  Keywords:   {}", item.keywords.join(", "));
    }
    if let Some(journal) = &item.journal {
        println!("  Journal:    {}", journal);
    }
    if let Some(doi) = &item.doi {
        println!("  DOI:        {}", doi);
    }
    println!();
    println!("{}", resolved.content);

    Ok(())
}

/// Show the featured (most recent) item
async fn show_featured(resolver: &Resolver, kind: Option<&str>, json: bool) -> Result<()> {
    let catalog = load_catalog(resolver, kind).await?;
    print_warnings(&catalog);

    if json {
        println!("{}", to_json(&catalog.featured)?);
        return Ok(());
    }

    match &catalog.featured {
        Some(item) => {
            println!("{} ({})", item.title, item.date);
            println!("  {} / {} / {}", item.kind, item.category, item.slug);
            if !item.description.is_empty() {
                println!("  {}", item.description);
            }
        }
        None => println!("No content found under {}", resolver.root().display()),
    }

    Ok(())
}

/// Search the catalog
async fn search_items(resolver: &Resolver, query: &str, kind: Option<&str>) -> Result<()> {
    let catalog = load_catalog(resolver, kind).await?;
    print_warnings(&catalog);

    let results = catalog.search(query);

    if results.is_empty() {
        println!("No results found for: {}", query);
        return Ok(());
    }

    println!("Found {} result(s) for \"{}\":\n", results.len(), query);
    print_table(&results);

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config(resolver: &Resolver) -> Result<()> {
    let cfg = config::config()?;

    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!("Content root: {}", resolver.root().display());
    println!();
    println!("Kinds:");
    for kind in resolver.kinds() {
        let tiers = if kind.difficulty_tiers {
            " (difficulty tiers)"
        } else {
            ""
        };
        println!("  {}{}: {}", kind.name, tiers, kind.kind_dir(resolver.root()).display());
        for category in &kind.categories {
            println!(
                "    {:<14} {}",
                category.label,
                kind.category_dir(resolver.root(), category).display()
            );
        }
    }

    Ok(())
}
