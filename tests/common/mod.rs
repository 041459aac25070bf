// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed workspace holding a host project and
// any number of module checkouts, plus a fluent builder so each integration
// test can set up an isolated environment without repeating filesystem
// boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use modlink_cli::config::Project;
use modlink_cli::deploy::Context;
use modlink_cli::exec::{ExecResult, Executor};
use modlink_cli::logging::MemoryLog;
use modlink_cli::manifest::MANIFEST_FILE;
use modlink_cli::registry::ModuleRegistry;

/// An [`Executor`] that records hook command strings instead of running
/// them. Commands starting with `fail` report a non-zero exit.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub commands: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    /// Commands seen so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().expect("executor lock").clone()
    }
}

impl Executor for RecordingExecutor {
    fn run_unchecked_in(
        &self,
        _dir: &Path,
        _program: &str,
        args: &[&str],
    ) -> anyhow::Result<ExecResult> {
        let command = args.last().map(ToString::to_string).unwrap_or_default();
        let success = !command.starts_with("fail");
        self.commands.lock().expect("executor lock").push(command);
        Ok(ExecResult {
            stdout: String::new(),
            stderr: if success { String::new() } else { "failed".into() },
            success,
            code: Some(i32::from(!success)),
        })
    }
}

/// An isolated workspace backed by a [`tempfile::TempDir`].
///
/// Layout:
/// - `site/`          host project, with an initialized `.modman/` registry
/// - `vendor/<name>/` module checkouts
pub struct Workspace {
    /// Temporary directory owning everything below.
    pub tmp: tempfile::TempDir,
    /// Canonical path of the temp directory.
    pub base: PathBuf,
}

impl Workspace {
    /// Path of the host project.
    pub fn site(&self) -> PathBuf {
        self.base.join("site")
    }

    /// Path of a module checkout.
    pub fn module(&self, name: &str) -> PathBuf {
        self.base.join("vendor").join(name)
    }

    /// Path of `rel` inside the host project.
    pub fn target(&self, rel: &str) -> PathBuf {
        self.site().join(rel)
    }

    /// Open the host project as the engine sees it.
    pub fn project(&self) -> Project {
        Project::open(&self.site()).expect("open project")
    }

    /// Registry of the host project.
    pub fn registry(&self) -> ModuleRegistry {
        ModuleRegistry::new(&self.project())
    }

    /// Register the checkout `vendor/<name>` in the project's registry.
    pub fn register(&self, name: &str) {
        self.registry()
            .link(&self.module(name))
            .expect("register module");
    }

    /// Build an engine context with an in-memory log and a recording
    /// executor.
    pub fn context(&self) -> (Context, Arc<MemoryLog>, Arc<RecordingExecutor>) {
        let log = Arc::new(MemoryLog::new());
        let exec = Arc::new(RecordingExecutor::default());
        let ctx = Context::new(self.project(), log.clone()).with_executor(exec.clone());
        (ctx, log, exec)
    }

    /// Write `content` to `rel` inside the host project.
    pub fn write_target(&self, rel: &str, content: &str) {
        write_file(&self.target(rel), content);
    }
}

/// Fluent builder for [`Workspace`].
pub struct WorkspaceBuilder {
    ws: Workspace,
}

impl WorkspaceBuilder {
    /// Begin building a workspace with an initialized project registry.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let base = dunce::canonicalize(tmp.path()).expect("canonical temp dir");
        let ws = Workspace { tmp, base };
        std::fs::create_dir_all(ws.site()).expect("create site");
        ws.registry().init(None).expect("init registry");
        Self { ws }
    }

    /// Create `vendor/<name>` with a `modman` manifest and the given files.
    /// Each file's content is its own relative path.
    pub fn with_module(self, name: &str, manifest: &str, files: &[&str]) -> Self {
        let root = self.ws.module(name);
        std::fs::create_dir_all(&root).expect("create module dir");
        write_file(&root.join(MANIFEST_FILE), manifest);
        for file in files {
            write_file(&root.join(file), file);
        }
        self
    }

    /// Create a module and register it.
    pub fn with_registered_module(self, name: &str, manifest: &str, files: &[&str]) -> Self {
        let this = self.with_module(name, manifest, files);
        this.ws.register(name);
        this
    }

    /// Write `.modman/settings.toml`.
    pub fn with_settings(self, content: &str) -> Self {
        write_file(&self.ws.site().join(".modman/settings.toml"), content);
        self
    }

    /// Finish building and return the workspace.
    pub fn build(self) -> Workspace {
        self.ws
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}
