//! Diagnostic report

use crate::scan::ModuleId;
use crate::source::SourceAnalysis;
use std::fmt::Write as _;
use std::path::PathBuf;

const RULE: &str =
    "================================================================================";

/// Analysis of one scanned file
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Path relative to the scanned root
    pub path: PathBuf,
    pub module: Option<ModuleId>,
    pub analysis: SourceAnalysis,
}

/// Which runtime artifact was checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeCheckKind {
    ModelArtifacts,
    ReferenceData,
}

/// Outcome of loading one runtime artifact
#[derive(Debug, Clone)]
pub struct RuntimeCheck {
    pub kind: RuntimeCheckKind,
    pub path: PathBuf,
    /// Summary on success, error message on failure
    pub outcome: Result<String, String>,
}

impl RuntimeCheck {
    pub fn label(&self) -> &'static str {
        match self.kind {
            RuntimeCheckKind::ModelArtifacts => "model artifacts",
            RuntimeCheckKind::ReferenceData => "reference data",
        }
    }
}

/// Full diagnostic report
#[derive(Debug, Clone)]
pub struct Report {
    pub root: PathBuf,
    pub files: Vec<FileReport>,
    pub module_edges: usize,
    pub cycles: Vec<Vec<String>>,
    pub runtime: Vec<RuntimeCheck>,
}

impl Report {
    pub fn entry_points(&self) -> impl Iterator<Item = (&FileReport, &String)> {
        self.files
            .iter()
            .flat_map(|file| file.analysis.entry_points.iter().map(move |e| (file, e)))
    }

    pub fn parse_problems(&self) -> impl Iterator<Item = (&FileReport, &String)> {
        self.files
            .iter()
            .filter_map(|file| file.analysis.parse_problem.as_ref().map(|p| (file, p)))
    }

    fn failed_check(&self, kind: RuntimeCheckKind) -> bool {
        self.runtime
            .iter()
            .any(|check| check.kind == kind && check.outcome.is_err())
    }

    /// Any parse problem, cycle or failed runtime check
    pub fn has_problems(&self) -> bool {
        self.parse_problems().next().is_some()
            || !self.cycles.is_empty()
            || self.runtime.iter().any(|check| check.outcome.is_err())
    }

    pub fn suggestions(&self) -> Vec<String> {
        let mut suggestions = Vec::new();

        if self.entry_points().next().is_none() {
            suggestions.push(
                "No server entry point found; run the doctor from the workspace root or pass --root."
                    .to_string(),
            );
        }

        if self.parse_problems().next().is_some() {
            suggestions.push(
                "Fix unbalanced delimiters and unterminated literals first; nothing builds until they are resolved."
                    .to_string(),
            );
        }

        if !self.cycles.is_empty() {
            suggestions.push(
                "Break circular module references by moving the shared items into a module both sides can import."
                    .to_string(),
            );
        }

        if self.failed_check(RuntimeCheckKind::ModelArtifacts) {
            suggestions.push(
                "Train the model with `fixthegap-train --output <dir>` or point FIXTHEGAP_MODEL_DIR at the artifact directory."
                    .to_string(),
            );
        }

        if self.failed_check(RuntimeCheckKind::ReferenceData) {
            suggestions.push(
                "Ship the reference CSV (job_title, employee_residence, salary_in_usd) with the deployment or set FIXTHEGAP_REFERENCE_DATA."
                    .to_string(),
            );
        }

        suggestions.push(
            "Make sure model and data paths resolve from the deployment working directory, not just the repository root."
                .to_string(),
        );
        suggestions.push(
            "Smoke test locally with the deployment settings: `FIXTHEGAP_PORT=8000 fixthegap-service`."
                .to_string(),
        );

        suggestions
    }

    /// Render the human-readable report
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{RULE}")?;
        writeln!(out, "FIXTHEGAP STARTUP DIAGNOSTIC REPORT")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "Project root: {}", self.root.display())?;
        writeln!(out, "Rust files scanned: {}", self.files.len())?;
        writeln!(out, "Module references: {}", self.module_edges)?;
        writeln!(out)?;

        writeln!(out, "[1] Server entry points")?;
        let mut any = false;
        for (file, entry) in self.entry_points() {
            any = true;
            writeln!(out, " - {}: {}", file.path.display(), entry)?;
        }
        if !any {
            writeln!(out, " - None found (no `warp::serve(` or `#[tokio::main]`).")?;
        }
        writeln!(out)?;

        writeln!(out, "[2] Parse problems")?;
        let mut any = false;
        for (file, problem) in self.parse_problems() {
            any = true;
            writeln!(out, " - {}", file.path.display())?;
            writeln!(out, "    {}", problem)?;
        }
        if !any {
            writeln!(out, " - None")?;
        }
        writeln!(out)?;

        writeln!(out, "[3] Circular module references")?;
        if self.cycles.is_empty() {
            writeln!(out, " - None detected")?;
        }
        for cycle in &self.cycles {
            writeln!(out, " - {}", cycle.join(" -> "))?;
        }
        writeln!(out)?;

        writeln!(out, "[4] Runtime artifact checks")?;
        for check in &self.runtime {
            match &check.outcome {
                Ok(summary) => writeln!(
                    out,
                    " - {} ({}): OK, {}",
                    check.label(),
                    check.path.display(),
                    summary
                )?,
                Err(message) => {
                    writeln!(out, " - {} ({}): FAILED", check.label(), check.path.display())?;
                    writeln!(out, "    {}", message)?;
                }
            }
        }
        writeln!(out)?;

        writeln!(out, "[5] Suggestions")?;
        for suggestion in self.suggestions() {
            writeln!(out, " - {}", suggestion)?;
        }
        writeln!(out)?;
        writeln!(out, "Done.")
    }
}
