//! CLI binary for taxomap: map fraud ontologies onto taxonomies, search fraud
//! resources, and inspect ontology hierarchies.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use taxomap_core::config::TaxomapConfig;
use taxomap_core::graph::RdfGraph;
use taxomap_core::loader::RdfFormat;
use taxomap_core::report::MappingReport;
use taxomap_core::{loader, vocab};
use taxomap_nav::activities;
use taxomap_nav::resources::{ResourceCategory, ResourceGroup, ResourceHit};

#[derive(Parser)]
#[command(name = "taxomap", about = "Fraud ontology to taxonomy mapper and resource browser")]
struct Cli {
    /// Project root directory holding .taxomap/ (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// RDF syntax of input files: turtle, ntriples, rdfxml (defaults to the file extension)
    #[arg(long, global = true)]
    input_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a source ontology onto a target SKOS taxonomy
    Map {
        /// Source ontology (owl:Class concepts)
        source: PathBuf,

        /// Target taxonomy (skos:Concept concepts)
        target: PathBuf,

        /// File name prefix for the CSV tables (defaults to output.prefix)
        output_prefix: Option<String>,

        /// Minimum similarity score (0.0-1.0)
        #[arg(long)]
        threshold: Option<f64>,

        /// Candidate matches kept per source concept
        #[arg(long)]
        top_n: Option<usize>,

        /// Similarity scorer: ratio, jaro_winkler, levenshtein, sorensen_dice
        #[arg(long)]
        scorer: Option<String>,

        /// Directory for the CSV tables (defaults to current directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Show the summary of the last saved mapping report
    Summary,

    /// Show triple, namespace, class and concept counts for an ontology file
    Info {
        /// Ontology file
        file: PathBuf,
    },

    /// List the fraud activities available for resource search
    Activities,

    /// Find reports, schemes and guidance that address a fraud activity
    Resources {
        /// Ontology file
        file: PathBuf,

        /// Fraud activity label or class local name, e.g. "Grant fraud"
        #[arg(short, long)]
        activity: Option<String>,

        /// Namespace of the fraud model (defaults to search.namespace)
        #[arg(long)]
        namespace: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search class and concept labels
    Search {
        /// Ontology or taxonomy file
        file: PathBuf,

        /// Search query
        query: String,

        /// Restrict results: class, concept
        #[arg(short, long)]
        kind: Option<String>,

        /// Maximum number of results (defaults to search.result_limit)
        #[arg(long)]
        limit: Option<usize>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Explore the class or concept hierarchy from a node
    Explore {
        /// Ontology or taxonomy file
        file: PathBuf,

        /// Starting IRI
        iri: String,

        /// Direction: up, down, both
        #[arg(short, long, default_value = "down")]
        direction: String,

        /// Maximum traversal depth
        #[arg(long, default_value = "2")]
        depth: usize,
    },

    /// Export the class hierarchy as DOT (Graphviz) or Mermaid flowchart
    Export {
        /// Ontology file
        file: PathBuf,

        /// Output format: dot, mermaid
        #[arg(short, long, default_value = "dot")]
        format: String,

        /// Only export classes in this namespace
        #[arg(long)]
        namespace: Option<String>,
    },

    /// Check ontology integrity (dangling parents, unlabeled classes, cycles)
    Validate {
        /// Ontology file
        file: PathBuf,

        /// Print the issues as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Flags of the `map` command.
struct MapArgs {
    source: PathBuf,
    target: PathBuf,
    output_prefix: Option<String>,
    threshold: Option<f64>,
    top_n: Option<usize>,
    scorer: Option<String>,
    out_dir: Option<PathBuf>,
}

/// How input files are parsed.
#[derive(Clone, Copy)]
struct Input {
    /// Explicit syntax; `None` picks the parser from the file extension.
    format: Option<RdfFormat>,
}

impl Input {
    fn load(self, path: &Path) -> Result<RdfGraph> {
        let progress = spinner(format!("Loading {}...", path.display()));
        let graph = match self.format {
            Some(format) => loader::load_as(path, format),
            None => loader::load(path),
        };
        progress.finish_and_clear();
        let graph = graph.with_context(|| format!("failed to load {}", path.display()))?;
        eprintln!("Loaded {} triples from {}", graph.len(), path.display());
        Ok(graph)
    }
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn get_input_format(cli: &Cli) -> Result<Option<RdfFormat>> {
    cli.input_format
        .as_deref()
        .map(|name| {
            RdfFormat::from_name(name).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown input format: {}. Use turtle, ntriples or rdfxml.",
                    name
                )
            })
        })
        .transpose()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;
    let input = Input {
        format: get_input_format(&cli)?,
    };

    match cli.command {
        Commands::Map {
            source,
            target,
            output_prefix,
            threshold,
            top_n,
            scorer,
            out_dir,
        } => cmd_map(
            &project_root,
            input,
            MapArgs {
                source,
                target,
                output_prefix,
                threshold,
                top_n,
                scorer,
                out_dir,
            },
        ),
        Commands::Summary => cmd_summary(&project_root),
        Commands::Info { file } => cmd_info(input, &file),
        Commands::Activities => {
            cmd_activities();
            Ok(())
        }
        Commands::Resources {
            file,
            activity,
            namespace,
            json,
        } => cmd_resources(
            &project_root,
            input,
            &file,
            activity.as_deref(),
            namespace,
            json,
        ),
        Commands::Search {
            file,
            query,
            kind,
            limit,
            json,
        } => cmd_search(
            &project_root,
            input,
            &file,
            &query,
            kind.as_deref(),
            limit,
            json,
        ),
        Commands::Explore {
            file,
            iri,
            direction,
            depth,
        } => cmd_explore(input, &file, &iri, &direction, depth),
        Commands::Export {
            file,
            format,
            namespace,
        } => cmd_export(input, &file, &format, namespace.as_deref()),
        Commands::Validate { file, json } => cmd_validate(input, &file, json),
    }
}

fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn cmd_map(project_root: &Path, input: Input, args: MapArgs) -> Result<()> {
    let mut config = TaxomapConfig::load(project_root)?;
    if let Some(threshold) = args.threshold {
        config.matching.threshold = threshold;
    }
    if let Some(top_n) = args.top_n {
        config.matching.top_n = top_n;
    }
    if let Some(scorer) = args.scorer {
        config.matching.scorer = scorer;
    }
    config.validate()?;
    tracing::info!(
        threshold = config.matching.threshold,
        top_n = config.matching.top_n,
        scorer = %config.matching.scorer,
        "matching configuration"
    );

    let source_graph = input.load(&args.source)?;
    let target_graph = input.load(&args.target)?;

    let progress = spinner(format!(
        "Matching concepts (threshold={}, scorer={})...",
        config.matching.threshold, config.matching.scorer
    ));
    let report = taxomap_align::map_graphs(&source_graph, &target_graph, &config);
    progress.finish_and_clear();
    let mut report = report.with_context(|| {
        format!(
            "failed to map {} onto {}",
            args.source.display(),
            args.target.display()
        )
    })?;
    report.source_file = args.source.display().to_string();
    report.target_file = args.target.display().to_string();
    eprintln!("Source namespace: {}", report.source_namespace);

    let out_dir = match args.out_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to get current directory")?,
    };
    let prefix = args.output_prefix.unwrap_or_else(|| config.output.prefix.clone());
    let written = taxomap_align::report::write_csv(&report, &out_dir, &prefix)?;

    eprintln!("\nSaving results...");
    if report.mappings.is_empty() {
        eprintln!("  No mappings found above threshold");
    }
    for path in &written {
        eprintln!("  Wrote {}", path.display());
    }
    let saved = taxomap_core::storage::save_report(project_root, &report)?;
    tracing::info!(path = %saved.display(), "report saved");
    eprintln!("  Report saved to {}", saved.display());

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &MappingReport) {
    let summary = &report.summary;
    println!("\n{}", "=".repeat(60));
    println!("SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Source concepts: {}", summary.source_concepts);
    println!("Target concepts: {}", summary.target_concepts);
    println!("Mappings found: {}", summary.mappings);
    println!("Source concepts mapped: {}", summary.source_mapped);
    println!("Target concepts mapped: {}", summary.target_mapped);
    println!("Unmapped source concepts: {}", summary.unmapped_source);
    println!("Unmapped target concepts: {}", summary.unmapped_target);
    if let (Some(mean), Some(median)) = (summary.mean_similarity, summary.median_similarity) {
        println!("\nAverage similarity score: {:.3}", mean);
        println!("Median similarity score: {:.3}", median);
    }
}

fn cmd_summary(project_root: &Path) -> Result<()> {
    if !taxomap_core::storage::report_exists(project_root) {
        anyhow::bail!("No mapping report found. Run `taxomap map` first.");
    }
    let report = taxomap_core::storage::load_report(project_root)?;

    println!("Report v{}", report.version);
    println!(
        "Created: {}",
        report
            .created_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
    );
    println!("Source: {}", report.source_file);
    println!("Target: {}", report.target_file);
    println!("Source namespace: {}", report.source_namespace);
    println!(
        "Scorer: {} (threshold={}, top_n={})",
        report.scorer, report.threshold, report.top_n
    );
    print_summary(&report);
    Ok(())
}

fn cmd_info(input: Input, file: &Path) -> Result<()> {
    let graph = input.load(file)?;

    let classes = graph
        .instances_of(vocab::OWL_CLASS)
        .into_iter()
        .filter(|t| t.as_iri().is_some())
        .count();
    let concepts = graph.instances_of(vocab::SKOS_CONCEPT).len();

    println!("File: {}", file.display());
    println!("Triples: {}", graph.len());
    println!("Classes (owl:Class): {}", classes);
    println!("Concepts (skos:Concept): {}", concepts);
    if !graph.namespaces().is_empty() {
        println!("\nNamespaces:");
        for (prefix, iri) in graph.namespaces() {
            println!("  {}: {}", prefix, iri);
        }
    }
    Ok(())
}

fn cmd_activities() {
    println!("Fraud activities ({}):", activities::CATALOG.len());
    for activity in &activities::CATALOG {
        println!("  {:<40} {}", activity.label, activity.local_name);
    }
}

fn catalog_listing() -> String {
    activities::CATALOG
        .iter()
        .map(|a| format!("  {}", a.label))
        .collect::<Vec<_>>()
        .join("\n")
}

fn cmd_resources(
    project_root: &Path,
    input: Input,
    file: &Path,
    activity: Option<&str>,
    namespace: Option<String>,
    json: bool,
) -> Result<()> {
    let Some(query) = activity else {
        anyhow::bail!(
            "Please select a fraud activity with --activity. Available activities:\n{}",
            catalog_listing()
        );
    };
    let Some(activity) = activities::find(query) else {
        anyhow::bail!(
            "Unknown fraud activity: {}. Available activities:\n{}",
            query,
            catalog_listing()
        );
    };

    let config = TaxomapConfig::load(project_root)?;
    let namespace = namespace.unwrap_or(config.search.namespace);
    let graph = input.load(file)?;

    let search =
        taxomap_nav::resources::search_resources(&graph, &activity.iri(&namespace), &namespace);

    if json {
        println!("{}", serde_json::to_string_pretty(&search)?);
        return Ok(());
    }

    let total = search.total();
    if total == 0 {
        println!("No resources found for {}", activity.label);
        return Ok(());
    }
    println!("Found {} total resources related to {}", total, activity.label);

    for group in &search.groups {
        // GAO reports are only shown when present; other sections always are.
        if group.category == ResourceCategory::GaoReport && group.hits.is_empty() {
            continue;
        }
        print_group(group, activity.label);
    }
    Ok(())
}

fn empty_group_text(category: ResourceCategory) -> &'static str {
    match category {
        ResourceCategory::GaoReport => "No GAO reports found",
        ResourceCategory::FraudScheme => "No fraud scheme examples found",
        ResourceCategory::PreventionGuidance => "No prevention & detection guidance found",
        ResourceCategory::Awareness => "No fraud awareness resources found",
        ResourceCategory::RiskManagement => "No fraud risk management principles found",
    }
}

fn print_group(group: &ResourceGroup, activity_label: &str) {
    println!("\n{}", "-".repeat(60));
    println!("{} ({})", group.category.title(), group.hits.len());
    if group.hits.is_empty() {
        println!("  {}", empty_group_text(group.category));
        return;
    }
    for (i, hit) in group.hits.iter().enumerate() {
        println!("\n  {}. {}", i + 1, hit.label);
        print_hit(group.category, hit, activity_label);
    }
}

fn print_hit(category: ResourceCategory, hit: &ResourceHit, activity_label: &str) {
    if category == ResourceCategory::FraudScheme {
        println!(
            "     Fraud Description: {}",
            hit.description.as_deref().unwrap_or("No description available")
        );
        println!(
            "     Fraud Narrative: {}",
            hit.fraud_narrative
                .as_deref()
                .unwrap_or("No fraud narrative available")
        );
    } else {
        println!(
            "     Definition: {}",
            hit.definition.as_deref().unwrap_or("No definition available")
        );
        if let Some(website) = &hit.website {
            println!("     Website: {}", website);
        }
    }
    println!("     Related to: {}", activity_label);
    println!(
        "     Source: {}",
        hit.is_defined_by
            .as_deref()
            .unwrap_or("No definition source available")
    );
}

fn cmd_search(
    project_root: &Path,
    input: Input,
    file: &Path,
    query: &str,
    kind: Option<&str>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let config = TaxomapConfig::load(project_root)?;
    let kind = kind
        .map(str::parse::<taxomap_nav::search::ConceptKind>)
        .transpose()
        .map_err(anyhow::Error::msg)?;
    let limit = limit.unwrap_or(config.search.result_limit);

    let graph = input.load(file)?;
    let results = taxomap_nav::search::search_concepts(&graph, query, kind, limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }
    if results.is_empty() {
        eprintln!("No results found for: {}", query);
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        println!(
            "{}. {} <{}> (score: {:.2})",
            i + 1,
            result.label,
            result.iri,
            result.score
        );
        if result.matched_label != result.label {
            println!("   matched: {}", result.matched_label);
        }
    }
    Ok(())
}

fn cmd_explore(input: Input, file: &Path, iri: &str, direction: &str, depth: usize) -> Result<()> {
    let dir: taxomap_nav::explore::Direction = direction.parse().map_err(anyhow::Error::msg)?;
    let graph = input.load(file)?;

    let Some(tree) = taxomap_nav::explore::explore(&graph, iri, dir, depth) else {
        anyhow::bail!("Node not found: {}", iri);
    };
    print!("{}", taxomap_nav::explore::format_tree(&tree));
    Ok(())
}

fn cmd_export(input: Input, file: &Path, format: &str, namespace: Option<&str>) -> Result<()> {
    let export_format: taxomap_nav::export::ExportFormat =
        format.parse().map_err(anyhow::Error::msg)?;
    let graph = input.load(file)?;

    let output = taxomap_nav::export::export(&graph, export_format, namespace);
    print!("{}", output);
    Ok(())
}

fn cmd_validate(input: Input, file: &Path, json: bool) -> Result<()> {
    let graph = input.load(file)?;
    let issues = taxomap_nav::validate::validate(&graph);

    if json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
        return Ok(());
    }

    for issue in &issues {
        println!("WARN: {}", issue);
    }
    if issues.is_empty() {
        eprintln!("Ontology is valid. No integrity issues found.");
        eprintln!(
            "  {} triples, {} classes",
            graph.len(),
            graph.instances_of(vocab::OWL_CLASS).len()
        );
    } else {
        eprintln!("\nFound {} integrity issue(s).", issues.len());
    }
    Ok(())
}
