//! blueprint CLI - turn a YAML draft into application source files

use blueprint::{Action, Blueprint, Config, DiskFilesystem, Filesystem, GenerateOptions, Ledger};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "blueprint")]
#[command(version, about = "Generate application source files from a YAML draft", long_about = None)]
struct Cli {
    /// Project root the draft, ledger and generated files are relative to
    #[arg(short, long, global = true, default_value = ".")]
    path: PathBuf,

    /// Configuration file, relative to the project root
    #[arg(short, long, global = true, default_value = "blueprint.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter draft when none exists
    Init {
        /// Draft file to create
        #[arg(short, long, default_value = "draft.yaml")]
        draft: String,
    },

    /// Build application files from a draft
    Build {
        /// Draft file to build
        #[arg(default_value = "draft.yaml")]
        draft: String,

        /// Only run generators of these types (comma separated)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        /// Skip generators of these types (comma separated)
        #[arg(long, value_delimiter = ',')]
        skip: Vec<String>,

        /// Rewrite migrations for tables that already have one
        #[arg(long)]
        overwrite_migrations: bool,

        /// Print the ledger as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Delete the files created by the last build
    Erase,
}

fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = load_config(&cli).and_then(|config| {
        let mut fs = DiskFilesystem::new(&cli.path).with_stubs_path(config.stubs_path.clone());
        let blueprint = Blueprint::new(config);

        match cli.command {
            Commands::Init { draft } => init(&mut fs, &draft),
            Commands::Build {
                draft,
                only,
                skip,
                overwrite_migrations,
                json,
            } => build(&blueprint, &mut fs, &draft, &only, &skip, overwrite_migrations, json),
            Commands::Erase => erase(&blueprint, &mut fs),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Defaults, then the config file, then `BLUEPRINT_*` variables
fn load_config(cli: &Cli) -> blueprint::Result<Config> {
    Config::load_or_default(cli.path.join(&cli.config))?.with_env()
}

fn init(fs: &mut DiskFilesystem, draft: &str) -> blueprint::Result<()> {
    if fs.exists(draft) {
        println!("  ℹ {} already exists", draft);
        return Ok(());
    }
    let starter = fs.stub("draft.stub")?;
    fs.put(draft, &starter)?;
    println!("✨ Created {}", draft);
    Ok(())
}

fn build(
    blueprint: &Blueprint,
    fs: &mut DiskFilesystem,
    draft: &str,
    only: &[String],
    skip: &[String],
    overwrite_migrations: bool,
    json: bool,
) -> blueprint::Result<()> {
    let options = GenerateOptions {
        overwrite_migrations,
        ..GenerateOptions::default()
    };
    if !json {
        println!("🔧 Building {}...", draft);
    }
    let ledger = blueprint.execute(fs, draft, only, skip, &options)?;

    if json {
        match serde_json::to_string_pretty(&ledger) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Error: {}", e),
        }
        return Ok(());
    }

    print_ledger(&ledger);
    println!("\n✨ Build complete!");
    Ok(())
}

fn erase(blueprint: &Blueprint, fs: &mut DiskFilesystem) -> blueprint::Result<()> {
    println!("🧹 Erasing previous build...");
    let ledger = blueprint.erase(fs)?;
    print_ledger(&ledger);
    if !ledger.updated.is_empty() {
        println!("\n  ℹ Updated files were left in place; review them manually");
    }
    println!("\n✨ Erase complete!");
    Ok(())
}

fn print_ledger(ledger: &Ledger) {
    if ledger.is_empty() {
        println!("  ℹ Nothing to do");
        return;
    }
    for (action, paths) in ledger.entries() {
        let marker = match action {
            Action::Created => "✓",
            Action::Updated => "✎",
            Action::Deleted => "✗",
            Action::Skipped => "·",
        };
        println!("\n  {}:", capitalize(action.as_str()));
        for path in paths {
            println!("    {} {}", marker, path);
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
