//! Devkit - batch chores across a list of projects
//!
//! Usage:
//!   devkit list -k keyring          # Show selected projects
//!   devkit resolve keyring          # Show a project's repository URL
//!   devkit checkout --root ~/code   # Clone everything missing
//!   devkit run -t lifted -- tox     # Run a command in each project
//!   devkit update --dry-run         # Merge the skeleton into each project
//!   devkit add "widget [lifted]"    # Add a project to the list and clone it

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devkit_core::commands::{
    AddCommand, AddOptions, CheckoutCommand, CheckoutOptions, ProjectsRepo, ReleaseCommand,
    RunCommand, RunOptions, TopicsCommand, UpdateCommand, UpdateOptions, UpdateOutcome,
    UpdateReport,
};
use devkit_core::context::{AppContext, block_on};
use devkit_core::filter::SelectorGroup;
use devkit_core::locator::{Locator, SchemeRule};
use devkit_core::project::{ProjectList, ProjectSpec};

#[derive(Parser)]
#[command(name = "devkit")]
#[command(about = "Batch chores across a list of projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List selected projects
    List {
        #[command(flatten)]
        select: SelectArgs,

        /// Print the full project line (tags and topics)
        #[arg(long)]
        spec: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Resolve project names to repository URLs
    Resolve {
        /// Project names (`keyring`, `pypa/setuptools`)
        #[arg(required = true)]
        names: Vec<String>,

        /// Print the fully expanded URL instead of the short scheme form
        #[arg(long)]
        full: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show URL scheme rules from git configuration
    Schemes {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Clone selected projects that are not yet checked out
    Checkout {
        #[command(flatten)]
        select: SelectArgs,

        /// Directory receiving `<owner>/<repo>` checkouts
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Run a command in a fresh checkout of each selected project
    Run {
        #[command(flatten)]
        select: SelectArgs,

        /// Command and arguments
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },

    /// Merge a base repository into each selected project
    Update {
        #[command(flatten)]
        select: SelectArgs,

        /// Repository to merge from
        #[arg(long, default_value = devkit_core::commands::DEFAULT_BASE)]
        base: String,

        /// Branch of the base repository
        #[arg(long)]
        branch: Option<String>,

        /// Merge without pushing
        #[arg(long)]
        dry_run: bool,
    },

    /// Add a project to the project list and clone it
    Add {
        /// Project line, e.g. "widget [lifted] (tools, python)"
        spec: String,

        /// Directory receiving `<owner>/<repo>` checkouts
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Add each selected project's listed topics to its hosted repository
    Topics {
        #[command(flatten)]
        select: SelectArgs,
    },

    /// Create a release for a project
    Release {
        /// Project name
        project: String,

        /// Tag to release
        #[arg(long)]
        tag: String,
    },
}

/// Keyword and tag selectors; prefix a value with `not ` to exclude.
#[derive(Args, Debug, Default)]
struct SelectArgs {
    /// Select projects whose name contains KEYWORD
    #[arg(short, long = "keyword", value_name = "KEYWORD")]
    keywords: Vec<String>,

    /// Select projects carrying TAG
    #[arg(short, long = "tag", value_name = "TAG")]
    tags: Vec<String>,
}

impl SelectArgs {
    fn group(&self) -> SelectorGroup {
        SelectorGroup::from_raw(&self.keywords, &self.tags)
    }
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devkit=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::with_defaults()?;
    run_cli(&ctx, cli.command)
}

fn run_cli(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::List {
            select,
            spec,
            format,
        } => run_list(ctx, &select, spec, format),
        Commands::Resolve {
            names,
            full,
            format,
        } => run_resolve(ctx, &names, full, format),
        Commands::Schemes { format } => run_schemes(ctx, format),
        Commands::Checkout { select, root } => run_checkout(ctx, &select, root),
        Commands::Run { select, command } => run_command(ctx, &select, command),
        Commands::Update {
            select,
            base,
            branch,
            dry_run,
        } => {
            let mut options = UpdateOptions::new().with_base(base).with_dry_run(dry_run);
            if let Some(branch) = branch {
                options = options.with_branch(branch);
            }
            run_update(ctx, &select, &options)
        }
        Commands::Add { spec, root } => run_add(ctx, &spec, root),
        Commands::Topics { select } => run_topics(ctx, &select),
        Commands::Release { project, tag } => run_release(ctx, &project, &tag),
    }
}

fn selected<'a>(projects: &'a ProjectList, select: &SelectArgs) -> Vec<&'a ProjectSpec> {
    let group = select.group();
    group.filter(projects.iter()).collect()
}

fn run_list(
    ctx: &AppContext,
    select: &SelectArgs,
    spec: bool,
    format: OutputFormat,
) -> Result<()> {
    let projects = ctx.projects()?;
    let chosen = selected(&projects, select);

    match format {
        OutputFormat::Table => {
            for project in &chosen {
                if spec {
                    println!("{}", project.spec());
                } else {
                    println!("{}", project);
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&chosen)?);
        }
    }
    Ok(())
}

fn run_resolve(
    ctx: &AppContext,
    names: &[String],
    full: bool,
    format: OutputFormat,
) -> Result<()> {
    let resolver = ctx.name_resolver()?;
    let mut resolved: Vec<(String, Locator)> = Vec::with_capacity(names.len());
    for name in names {
        let locator = if full {
            resolver.resolve_full(name)?
        } else {
            resolver.resolve(name)?
        };
        resolved.push((name.clone(), locator));
    }

    match format {
        OutputFormat::Table => {
            for (_, locator) in &resolved {
                println!("{}", locator);
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = resolved
                .iter()
                .map(|(name, locator)| {
                    serde_json::json!({
                        "name": name,
                        "url": locator,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn run_schemes(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let registry = ctx.scheme_registry();
    let rules = registry.rules()?;

    match format {
        OutputFormat::Table => print_schemes_table(rules),
        OutputFormat::Json => {
            let output: Vec<_> = rules
                .iter()
                .map(|rule| {
                    serde_json::json!({
                        "prefix": rule.prefix,
                        "value": rule.value,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn print_schemes_table(rules: &[SchemeRule]) {
    if rules.is_empty() {
        println!("No URL schemes configured.");
        println!("Add one with: git config --global url.https://github.com/.insteadOf gh://");
        return;
    }

    println!("{:<20} Expands to", "Prefix");
    println!("{}", "-".repeat(60));
    for rule in rules {
        println!("{:<20} {}", rule.prefix, rule.value);
    }
}

fn run_checkout(ctx: &AppContext, select: &SelectArgs, root: PathBuf) -> Result<()> {
    let projects = ctx.projects()?;
    let resolver = ctx.name_resolver()?;
    let options = CheckoutOptions::new(root);

    let report = CheckoutCommand::new(&resolver).execute(selected(&projects, select), &options)?;

    for repo in &report.cloned {
        println!("{} Cloned {}", style("✓").green(), repo.display());
    }
    println!(
        "{} cloned, {} already present",
        report.cloned.len(),
        report.present.len()
    );
    Ok(())
}

fn run_command(ctx: &AppContext, select: &SelectArgs, command: Vec<String>) -> Result<()> {
    let projects = ctx.projects()?;
    let resolver = ctx.name_resolver()?;
    let options = RunOptions::new(command);

    let report = RunCommand::new(&resolver).execute(selected(&projects, select), &options)?;
    println!(
        "{} Ran in {} projects",
        style("✓").green(),
        report.completed.len()
    );
    Ok(())
}

fn run_update(ctx: &AppContext, select: &SelectArgs, options: &UpdateOptions) -> Result<()> {
    let projects = ctx.projects()?;
    let resolver = ctx.name_resolver()?;

    let report = UpdateCommand::new(&resolver).execute(selected(&projects, select), options)?;
    print_update_report(&report);
    Ok(())
}

fn print_update_report(report: &UpdateReport) {
    for update in &report.projects {
        let (marker, label) = match update.outcome {
            UpdateOutcome::Merged => (style("✓").green(), "merged"),
            UpdateOutcome::Resolved => (style("✓").green(), "merged with conflicts resolved"),
            UpdateOutcome::Unrelated => (style("⚠").yellow(), "unrelated histories, skipped"),
            UpdateOutcome::Skipped => (style("•").dim(), "skipped by tag"),
        };
        println!("{} {} ({})", marker, update.project, label);
    }
    if report.dry_run {
        println!("Dry run: nothing was pushed.");
    }
    println!("Updated {} projects.", report.updated());
}

fn run_add(ctx: &AppContext, spec: &str, root: PathBuf) -> Result<()> {
    let project = ProjectSpec::parse(spec)?;
    let list_repo = ProjectsRepo::from_list_url(&ctx.projects_url()?)?;
    let resolver = ctx.name_resolver()?;

    let report = AddCommand::new(&resolver).execute(&project, &list_repo, &AddOptions::new(root))?;

    if report.listed {
        println!("{} Added {} to the project list", style("✓").green(), report.project);
    } else {
        println!("{} {} is already listed", style("•").dim(), report.project);
    }
    if let Some(ref repo) = report.checkout {
        println!("{} Cloned {}", style("✓").green(), repo.display());
    }
    Ok(())
}

fn run_topics(ctx: &AppContext, select: &SelectArgs) -> Result<()> {
    let projects = ctx.projects()?;
    let resolver = ctx.name_resolver()?;
    let client = ctx.github_client()?;
    let command = TopicsCommand::new(&resolver, &client);

    let report = block_on(command.execute(selected(&projects, select)))??;
    for update in &report.updated {
        println!(
            "{} {}: {}",
            style("✓").green(),
            update.repo,
            update.topics.join(", ")
        );
    }
    println!(
        "{} updated, {} without topics",
        report.updated.len(),
        report.skipped.len()
    );
    Ok(())
}

fn run_release(ctx: &AppContext, project: &str, tag: &str) -> Result<()> {
    let resolver = ctx.name_resolver()?;
    let client = ctx.github_client()?;
    let command = ReleaseCommand::new(&resolver, &client);

    let release = block_on(command.execute(project, tag))??;
    println!(
        "{} Released {} for {}",
        style("✓").green(),
        release.tag_name,
        command.repo_for(project)?
    );
    if !release.html_url.is_empty() {
        println!("  {}", release.html_url);
    }
    Ok(())
}
