//! Shared helpers for CLI commands: configuration, logging, module loading
//! and diagnostic rendering.

use std::error::Error;
use std::path::{Path, PathBuf};

use tandem_config::TandemConfig;
use tandem_diagnostics::{DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer};
use tandem_harness::HarnessOptions;
use tandem_source::SourceDb;
use tandem_verilog::{extract, extract_interface, rename_module, InterfaceDescriptor};
use tracing_subscriber::EnvFilter;

use crate::{GlobalArgs, StimulusArgs};

/// A module read from disk together with its extracted interface.
#[derive(Debug)]
pub struct LoadedModule {
    /// Where the module was read from.
    pub path: PathBuf,
    /// Its source text.
    pub source: String,
    /// Its port interface.
    pub interface: InterfaceDescriptor,
}

/// Installs the `tracing` subscriber on stderr.
///
/// `RUST_LOG` wins; otherwise `--verbose` selects `debug`, `--quiet`
/// selects `error` and the default is `warn`.
pub fn init_tracing(global: &GlobalArgs) {
    let default = if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .try_init();
}

/// Loads `--config` if given, otherwise `tandem.toml` in the working
/// directory, otherwise the defaults.
pub fn load_config(global: &GlobalArgs) -> Result<TandemConfig, Box<dyn Error>> {
    let config = match &global.config {
        Some(path) => tandem_config::load_config(path)
            .map_err(|e| format!("{}: {e}", path.display()))?,
        None => tandem_config::load_or_default(&std::env::current_dir()?)?,
    };
    Ok(config)
}

/// Harness options from configuration with command-line overrides applied.
pub fn harness_options(config: &TandemConfig, stimulus: &StimulusArgs) -> HarnessOptions {
    let mut options = HarnessOptions::from_config(&config.harness);
    if let Some(seed) = stimulus.seed {
        options = options.with_seed(seed);
    }
    if let Some(trials) = stimulus.trials {
        options = options.with_trials(trials);
    }
    options
}

/// Reads `path` and extracts its interface.
///
/// Extraction warnings and errors go to `sink`; `Ok(None)` means the module
/// was unusable and an error diagnostic was emitted.
pub fn load_module(
    path: &Path,
    db: &mut SourceDb,
    sink: &DiagnosticSink,
) -> Result<Option<LoadedModule>, Box<dyn Error>> {
    let file = db
        .load_file(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    match extract_interface(file, db, sink) {
        Ok(interface) => Ok(Some(LoadedModule {
            path: path.to_path_buf(),
            source: db.get_file(file).content.clone(),
            interface,
        })),
        Err(e) => {
            sink.emit(e.to_diagnostic());
            Ok(None)
        }
    }
}

/// Renames `candidate` when it declares the same module name as `golden`,
/// so the two can be compiled together.
pub fn separate_names(
    golden: &LoadedModule,
    candidate: LoadedModule,
) -> Result<LoadedModule, Box<dyn Error>> {
    if golden.interface.module_name() != candidate.interface.module_name() {
        return Ok(candidate);
    }
    let renamed = format!("{}_candidate", candidate.interface.module_name());
    tracing::info!(module = %renamed, "renaming candidate module");
    let source = rename_module(&candidate.source, &renamed)?;
    let interface = extract(&source)?;
    Ok(LoadedModule {
        path: candidate.path,
        source,
        interface,
    })
}

/// Prints every diagnostic collected so far to stderr.
pub fn render_diagnostics(sink: &DiagnosticSink, db: &SourceDb, global: &GlobalArgs) {
    let renderer = TerminalRenderer::new(global.color);
    for diag in sink.take_all() {
        if global.quiet && diag.severity != Severity::Error {
            continue;
        }
        eprintln!("{}", renderer.render(&diag, db));
    }
}

/// Writes `text` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<(), Box<dyn Error>> {
    match path {
        Some(path) => std::fs::write(path, text)
            .map_err(|e| format!("cannot write {}: {e}", path.display()).into()),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

/// A multi-threaded runtime for the async commands.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread().enable_all().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn global() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: None,
        }
    }

    #[test]
    fn load_module_extracts_interface() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inv.v");
        fs::write(&path, "module inv(input a, output y); assign y = ~a; endmodule\n").unwrap();

        let mut db = SourceDb::new();
        let sink = DiagnosticSink::new();
        let module = load_module(&path, &mut db, &sink).unwrap().unwrap();
        assert_eq!(module.interface.module_name(), "inv");
        assert!(module.source.contains("assign y = ~a;"));
        assert!(!sink.has_errors());
    }

    #[test]
    fn load_module_reports_malformed_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.v");
        fs::write(&path, "this is not verilog").unwrap();

        let mut db = SourceDb::new();
        let sink = DiagnosticSink::new();
        assert!(load_module(&path, &mut db, &sink).unwrap().is_none());
        assert!(sink.has_errors());
    }

    #[test]
    fn load_module_missing_file_is_error() {
        let mut db = SourceDb::new();
        let sink = DiagnosticSink::new();
        let err = load_module(Path::new("/nonexistent/x.v"), &mut db, &sink).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn colliding_candidate_is_renamed() {
        let load = |src: &str| LoadedModule {
            path: PathBuf::from("m.v"),
            source: src.to_string(),
            interface: extract(src).unwrap(),
        };
        let golden = load("module m(input a, output y); endmodule");
        let candidate = separate_names(&golden, load("module m(input a, output y); endmodule"))
            .unwrap();
        assert_eq!(candidate.interface.module_name(), "m_candidate");
        assert!(candidate.source.starts_with("module m_candidate("));

        let other = separate_names(&golden, load("module n(input a, output y); endmodule"))
            .unwrap();
        assert_eq!(other.interface.module_name(), "n");
    }

    #[test]
    fn stimulus_overrides_config() {
        let config = TandemConfig::default();
        let options = harness_options(
            &config,
            &StimulusArgs {
                seed: Some(3),
                trials: Some(4),
            },
        );
        assert_eq!((options.seed, options.trials), (3, 4));
    }

    #[test]
    fn explicit_config_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[harness]\ntrials = 25\n").unwrap();
        let config = load_config(&GlobalArgs {
            config: Some(path),
            ..global()
        })
        .unwrap();
        assert_eq!(config.harness.trials, 25);
    }
}
