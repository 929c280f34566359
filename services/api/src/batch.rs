use crate::infra::{load_classifier, with_rules_override};
use clap::Args;
use role_classifier::classification::{
    ClassificationReport, Explanation, FieldTrace, Phase, RoleClassifier, RuleList,
};
use role_classifier::config::{AppConfig, ClassifierConfig};
use role_classifier::dataset::{write_labels, LabelOutput, PostingImporter};
use role_classifier::error::AppError;
use role_classifier::telemetry;
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// CSV file of job postings
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Where to write the labelled CSV (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Rule book JSON file (defaults to ROLE_RULES_PATH or the built-in rules)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Column holding the job title
    #[arg(long)]
    pub(crate) title_column: Option<String>,
    /// Column holding the skills text
    #[arg(long)]
    pub(crate) skills_column: Option<String>,
    /// Column holding a record identifier (defaults to the row position)
    #[arg(long)]
    pub(crate) id_column: Option<String>,
    /// Name of the appended label column
    #[arg(long)]
    pub(crate) label_column: Option<String>,
    /// Write only the label column instead of the full rows
    #[arg(long)]
    pub(crate) labels_only: bool,
    /// Log per-phase counts while classifying
    #[arg(long)]
    pub(crate) verbose: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RulesArgs {
    /// Rule book JSON file (defaults to ROLE_RULES_PATH or the built-in rules)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Print the rule book as JSON, suitable as a starting point for a custom file
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExplainArgs {
    /// Job title to evaluate
    #[arg(long)]
    pub(crate) title: Option<String>,
    /// Skills text to evaluate
    #[arg(long)]
    pub(crate) skills: Option<String>,
    /// Rule book JSON file (defaults to ROLE_RULES_PATH or the built-in rules)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Print the trace as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

fn classifier_config(
    rules: Option<PathBuf>,
    verbose: bool,
) -> Result<(AppConfig, ClassifierConfig), AppError> {
    let config = AppConfig::load()?;
    let mut classifier = with_rules_override(config.classifier.clone(), rules);
    classifier.verbose |= verbose;
    Ok((config, classifier))
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let ClassifyArgs {
        input,
        output,
        rules,
        title_column,
        skills_column,
        id_column,
        label_column,
        labels_only,
        verbose,
    } = args;

    let (config, mut settings) = classifier_config(rules, verbose)?;
    if let Some(column) = title_column {
        settings.title_column = column;
    }
    if let Some(column) = skills_column {
        settings.skills_column = column;
    }
    if let Some(column) = label_column {
        settings.label_column = column;
    }
    telemetry::init(&config.telemetry, settings.verbose)?;

    let classifier = load_classifier(&settings)?;
    let mut columns = settings.columns();
    columns.id = id_column;
    let table = PostingImporter::from_path(&input, &columns)?;
    info!(path = %input.display(), rows = table.len(), "imported postings");

    let report = classifier.classify(table.postings(), settings.verbose);
    let mode = if labels_only {
        LabelOutput::LabelsOnly
    } else {
        LabelOutput::AppendColumn
    };

    // Rendered in full before anything touches the destination.
    let mut rendered = Vec::new();
    write_labels(
        &mut rendered,
        &table,
        &report.labels(),
        &settings.label_column,
        mode,
    )?;

    let summary = render_summary(&report);
    match output {
        Some(path) => {
            fs::write(&path, &rendered)?;
            println!("Wrote {} labelled rows to {}", table.len(), path.display());
            print!("{summary}");
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&rendered)?;
            handle.flush()?;
            eprint!("{summary}");
        }
    }
    Ok(())
}

pub(crate) fn run_rules(args: RulesArgs) -> Result<(), AppError> {
    let (_, settings) = classifier_config(args.rules, false)?;
    let classifier = load_classifier(&settings)?;

    if args.json {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        serde_json::to_writer_pretty(&mut handle, classifier.rule_book()).map_err(io::Error::from)?;
        writeln!(handle)?;
    } else {
        print!("{}", render_rules(&classifier));
    }
    Ok(())
}

pub(crate) fn run_explain(args: ExplainArgs) -> Result<(), AppError> {
    let (_, settings) = classifier_config(args.rules, false)?;
    let classifier = load_classifier(&settings)?;
    let explanation = classifier.explain(args.title.as_deref(), args.skills.as_deref());

    if args.json {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        serde_json::to_writer_pretty(&mut handle, &explanation).map_err(io::Error::from)?;
        writeln!(handle)?;
    } else {
        print!("{}", render_explanation(&explanation));
    }
    Ok(())
}

pub(crate) fn render_summary(report: &ClassificationReport) -> String {
    let mut out = String::new();
    let total = report.assignments.len();
    let _ = writeln!(out, "Classified {total} postings");
    for phase in &report.phases {
        let _ = writeln!(
            out,
            "  {:<7} phase: {:>5} claimed, {:>5}/{} assigned",
            phase.phase.label(),
            phase.claimed,
            phase.assigned,
            phase.total
        );
    }
    let _ = writeln!(out, "Label counts:");
    for entry in &report.tally {
        let _ = writeln!(out, "  {:<20} {:>5}", entry.label.as_str(), entry.count);
    }
    out
}

pub(crate) fn render_rules(classifier: &RoleClassifier) -> String {
    let mut out = String::new();
    let book = classifier.rule_book();
    let _ = writeln!(out, "Priority order ({} categories):", classifier.priority().len());
    for (rank, id) in classifier.priority().iter().enumerate() {
        let Some(rules) = book.categories.get(id) else {
            continue;
        };
        let _ = writeln!(out, "{:>2}. {}", rank + 1, id);
        for phase in Phase::ORDERED {
            let (include, exclude) = RuleList::for_phase(phase);
            let _ = writeln!(
                out,
                "      {:<6} include {:>2}, exclude {:>2}",
                phase.label(),
                rules.list(include).len(),
                rules.list(exclude).len()
            );
        }
    }

    let skipped: Vec<&str> = book
        .categories
        .keys()
        .filter(|id| classifier.priority().position(id).is_none())
        .map(|id| id.as_str())
        .collect();
    if !skipped.is_empty() {
        let _ = writeln!(out, "Not in priority (never assigned): {}", skipped.join(", "));
    }
    out
}

pub(crate) fn render_explanation(explanation: &Explanation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Normalized title : '{}'", explanation.normalized_title);
    let _ = writeln!(out, "Normalized skills: '{}'", explanation.normalized_skills);
    match explanation.phase {
        Some(phase) => {
            let _ = writeln!(out, "Label: {} ({} phase)", explanation.label, phase.label());
        }
        None => {
            let _ = writeln!(out, "Label: {}", explanation.label);
        }
    }

    for trace in &explanation.categories {
        let _ = writeln!(out, "- {}", trace.category);
        render_field(&mut out, Phase::Title, &trace.title);
        render_field(&mut out, Phase::Skills, &trace.skills);
    }
    out
}

fn render_field(out: &mut String, phase: Phase, trace: &FieldTrace) {
    if trace.included_by.is_empty() && trace.excluded_by.is_empty() {
        return;
    }
    let verdict = if trace.matched { "match" } else { "no match" };
    let _ = writeln!(out, "    {}: {verdict}", phase.label());
    for pattern in &trace.included_by {
        let _ = writeln!(out, "      + {pattern}");
    }
    for pattern in &trace.excluded_by {
        let _ = writeln!(out, "      - {pattern}");
    }
}
