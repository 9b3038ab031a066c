//! Shared output formatting for reeltrack CLI commands.
//!
//! Every command renders through here: JSON envelopes with `--json`,
//! otherwise a header, a summary block and optional sections.

use serde::Serialize;

use crate::error::Result;

pub const SCHEMA_VERSION: &str = "reeltrack.v1";

/// Width of the text progress bars in human output
const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    sections: Vec<(String, Vec<String>)>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            sections: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    /// Append a line to the default "Details" section
    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.push_line("Details", value);
    }

    /// Append a line to a named section, creating it on first use
    pub fn push_line(&mut self, section: &str, value: impl Into<String>) {
        match self.sections.iter_mut().find(|(title, _)| title == section) {
            Some((_, lines)) => lines.push(value.into()),
            None => self.sections.push((section.to_string(), vec![value.into()])),
        }
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

/// Top-level JSON document shared by success and error output.
#[derive(Serialize)]
struct Envelope<'a, B: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    #[serde(flatten)]
    body: B,
    #[serde(skip_serializing_if = "no_items")]
    warnings: &'a [String],
    #[serde(skip_serializing_if = "no_items")]
    next_steps: &'a [String],
}

#[derive(Serialize)]
struct Data<'a, T: Serialize> {
    data: &'a T,
}

#[derive(Serialize)]
struct Failure<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    code: i32,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

fn no_items(items: &&[String]) -> bool {
    items.is_empty()
}

fn print_envelope<B: Serialize>(envelope: &Envelope<'_, B>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(())
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        return print_envelope(&Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            body: Data { data },
            warnings: human.map(|h| h.warnings.as_slice()).unwrap_or_default(),
            next_steps: human.map(|h| h.next_steps.as_slice()).unwrap_or_default(),
        });
    }

    match human {
        Some(human) if !options.quiet => println!("{}", format_human(human)),
        _ => {}
    }
    Ok(())
}

pub fn emit_error(command: &str, err: &crate::error::Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    if json {
        let message = err.to_string();
        return print_envelope(&Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            body: Failure {
                error: ErrorBody {
                    message: &message,
                    code: err.exit_code(),
                    kind: error_kind(err),
                    details: err.details(),
                },
            },
            warnings: &[],
            next_steps: &next_steps,
        });
    }

    eprintln!("error: {err}");
    if let Some(hint) = next_steps.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::new();
    lines.push(output.header.clone());

    push_summary(&mut lines, &output.summary);
    for (title, items) in &output.sections {
        push_section(&mut lines, title, items);
    }
    push_section(&mut lines, "Warnings", &output.warnings);
    push_section(&mut lines, "Next steps", &output.next_steps);

    lines.join("\n")
}

/// `[#####...............]  25%`
pub fn progress_bar(pct: u8) -> String {
    let pct = pct.min(100) as usize;
    let filled = (pct * BAR_WIDTH + 50) / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        pct
    )
}

pub fn infer_command_name_from_args() -> String {
    command_name(std::env::args().skip(1))
}

fn command_name(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter().filter(|arg| !arg.starts_with('-'));

    let command = match args.next() {
        Some(cmd) => cmd,
        None => return "reeltrack".to_string(),
    };

    if matches!(command.as_str(), "task" | "project") {
        if let Some(sub) = args.next() {
            return format!("{command} {sub}");
        }
    }
    command
}

fn error_kind(err: &crate::error::Error) -> &'static str {
    match err.exit_code() {
        2 => "user_error",
        _ => "operation_failed",
    }
}

fn error_next_steps(err: &crate::error::Error) -> Vec<String> {
    use crate::error::Error;

    match err {
        Error::UnknownField { entity: "task", .. } => vec![format!(
            "task fields: {}",
            crate::fields::TASK_FIELDS.join(", ")
        )],
        Error::UnknownField { .. } => vec![format!(
            "project fields: {}",
            crate::fields::PROJECT_FIELDS.join(", ")
        )],
        Error::InvalidConfig(_) => vec!["fix reeltrack.toml then retry".to_string()],
        Error::LockFailed(_) => vec!["retry once the other reeltrack process finishes".to_string()],
        _ => Vec::new(),
    }
}

fn push_summary(lines: &mut Vec<String>, summary: &[(String, String)]) {
    if summary.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());
    for (key, value) in summary {
        if value.is_empty() {
            lines.push(format!("- {key}"));
        } else {
            lines.push(format!("- {key}: {value}"));
        }
    }
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(format!("{title}:"));
    for item in items {
        lines.push(format!("- {item}"));
    }
}
