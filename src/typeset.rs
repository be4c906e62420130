//! Bridge to the external math typesetting engine.
//!
//! The engine is an external command (resolved with `which`) that reads an
//! HTML fragment on stdin and writes the typeset fragment to stdout. The
//! bridge only runs it when the raw article source contains `$`, resolves
//! it at most once per process (concurrent callers share the one
//! resolution), and treats every failure as non-fatal: the fragment is
//! returned as-is with the delimiter markup still visible.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use anyhow::{Context, Result, bail};
use which::which;

use crate::config::TypesetSection;
use crate::{debug, log};

/// Resolved engine command.
struct TypesetEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl TypesetEngine {
    /// Pipe the fragment through the engine.
    fn run(&self, fragment: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        let mut stdin = child.stdin.take().context("engine stdin unavailable")?;
        stdin.write_all(fragment.as_bytes())?;
        drop(stdin);

        let output = child.wait_with_output()?;
        if !output.status.success() {
            bail!(
                "engine exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        String::from_utf8(output.stdout).context("engine emitted non-UTF-8 output")
    }
}

/// Singleton handle owning the once-per-process engine resolution.
///
/// Owned by whoever drives rendering and passed down, never ambient
/// global state, so it can be constructed per test.
pub struct TypesetBridge {
    config: TypesetSection,
    engine: OnceLock<Option<TypesetEngine>>,
}

impl TypesetBridge {
    pub fn new(config: TypesetSection) -> Self {
        Self {
            config,
            engine: OnceLock::new(),
        }
    }

    /// Typeset the fragment if the raw source contains math syntax.
    ///
    /// Returns the fragment unchanged when the source has no `$`, when no
    /// engine is configured or resolvable, or when the engine fails.
    pub fn typeset(&self, fragment: &str, source: &str) -> String {
        if !source.contains('$') {
            return fragment.to_string();
        }
        let Some(engine) = self.engine() else {
            return fragment.to_string();
        };
        match engine.run(fragment) {
            Ok(typeset) => typeset,
            Err(e) => {
                log!("typeset"; "equations left unrendered: {e}");
                fragment.to_string()
            }
        }
    }

    /// Resolve the engine command, once. `OnceLock` makes concurrent first
    /// callers block on the same resolution instead of racing their own.
    fn engine(&self) -> Option<&TypesetEngine> {
        self.engine
            .get_or_init(|| {
                if !self.config.enable || self.config.command.is_empty() {
                    debug!("typeset"; "no engine configured, skipping");
                    return None;
                }
                match which(&self.config.command) {
                    Ok(program) => {
                        debug!("typeset"; "engine resolved at {}", program.display());
                        Some(TypesetEngine {
                            program,
                            args: self.config.args.clone(),
                        })
                    }
                    Err(e) => {
                        log!("typeset"; "`{}` not found, equations left unrendered: {e}",
                            self.config.command);
                        None
                    }
                }
            })
            .as_ref()
    }
}
