//! FixTheGap startup diagnostics
//!
//! Static checks over the workspace sources (server entry points, delimiter
//! balance, circular module references) plus runtime loading of the model
//! artifacts and reference dataset the service needs at startup.

pub mod graph;
pub mod report;
pub mod scan;
pub mod source;

use anyhow::{Context, Result};
use fixthegap_model::{ModelArtifacts, ReferenceDataset};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub use graph::{detect_cycles, ModuleGraph};
pub use report::{FileReport, Report, RuntimeCheck, RuntimeCheckKind};
pub use scan::{collect_rust_files, module_id, ModuleId};
pub use source::{analyze, SourceAnalysis};

/// What to diagnose
#[derive(Debug, Clone)]
pub struct DoctorOptions {
    pub root: PathBuf,
    /// Model artifact directory; relative paths are taken from `root`
    pub model_dir: PathBuf,
    /// Reference CSV; relative paths are taken from `root`
    pub reference_data: PathBuf,
}

impl Default for DoctorOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            model_dir: PathBuf::from("models"),
            reference_data: PathBuf::from("data/ds_salaries.csv"),
        }
    }
}

/// Run every check and collect the report
pub fn run(options: &DoctorOptions) -> Result<Report> {
    let root = options
        .root
        .canonicalize()
        .with_context(|| format!("Project root {} not found", options.root.display()))?;

    let mut files = Vec::new();
    for path in collect_rust_files(&root)? {
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                warn!("Skipping unreadable file {}: {}", path.display(), e);
                continue;
            }
        };
        let module = module_id(&path);
        debug!(
            "Scanned {} as {}",
            path.display(),
            module
                .as_ref()
                .map_or_else(|| "<no module>".to_string(), ToString::to_string)
        );

        files.push(FileReport {
            path: path.strip_prefix(&root).unwrap_or(&path).to_path_buf(),
            module,
            analysis: analyze(&source),
        });
    }

    let graph = ModuleGraph::build(files.iter().filter_map(|file| {
        file.module
            .as_ref()
            .map(|module| (module, file.analysis.references.as_slice()))
    }));

    let runtime = vec![
        check_model(&root.join(&options.model_dir)),
        check_reference(&root.join(&options.reference_data)),
    ];

    Ok(Report {
        root,
        files,
        module_edges: graph.edge_count(),
        cycles: graph.cycles(),
        runtime,
    })
}

fn check_model(dir: &Path) -> RuntimeCheck {
    let outcome = ModelArtifacts::load(dir)
        .map(|model| {
            format!(
                "{} features, {} genders, {} roles",
                model.params.feature_count(),
                model.gender.len(),
                model.role.len()
            )
        })
        .map_err(|e| e.to_string());

    RuntimeCheck {
        kind: RuntimeCheckKind::ModelArtifacts,
        path: dir.to_path_buf(),
        outcome,
    }
}

fn check_reference(path: &Path) -> RuntimeCheck {
    let outcome = ReferenceDataset::from_csv(path)
        .map(|dataset| format!("{} rows", dataset.len()))
        .map_err(|e| e.to_string());

    RuntimeCheck {
        kind: RuntimeCheckKind::ReferenceData,
        path: path.to_path_buf(),
        outcome,
    }
}
