// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Process-backed client driving the `accurev` command-line tool

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use crate::client::AccurevClient;
use crate::error::{ClientError, ClientResult};
use crate::model::{Credentials, Depot, Element, Stream, Transaction};
use crate::paths::depot_path;
use crate::xml;

/// stderr fragments the tool prints when a depot, stream or element is unknown
const NOT_FOUND_MARKERS: &[&str] = &[
    "unknown depot",
    "unknown stream",
    "no such elem",
    "element not found",
    "does not exist",
    "not in a directory",
];

/// stderr fragments that indicate a credential problem
const AUTH_MARKERS: &[&str] = &[
    "not authenticated",
    "invalid username or password",
    "bad password",
];

/// AccuRev client that runs one `accurev` process per request
#[derive(Debug, Clone)]
pub struct CliAccurevClient {
    tool: PathBuf,
    server: String,
    env: Vec<(String, String)>,
    working_dir: Option<PathBuf>,
}

impl CliAccurevClient {
    /// Create a client for `server` (`host:port`) using the executable at `tool`
    pub fn new(tool: impl Into<PathBuf>, server: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            server: server.into(),
            env: Vec::new(),
            working_dir: None,
        }
    }

    /// Resolve the executable: an explicitly configured path wins, otherwise
    /// `accurev` is searched on `PATH`.
    pub fn locate_tool(configured: Option<&Path>) -> ClientResult<PathBuf> {
        match configured {
            Some(path) if path.is_file() => Ok(path.to_path_buf()),
            Some(path) => which::which(path).map_err(|_| ClientError::ToolNotFound(path.to_path_buf())),
            None => which::which("accurev")
                .map_err(|_| ClientError::ToolNotFound(PathBuf::from("accurev"))),
        }
    }

    /// Add an environment variable for every spawned process
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Run processes from `dir` (AccuRev keeps session files relative to it)
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn tool(&self) -> &Path {
        &self.tool
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    fn command(&self, subcommand: &str) -> Command {
        let mut cmd = Command::new(&self.tool);
        cmd.arg(subcommand).arg("-H").arg(&self.server);
        cmd.envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd
    }

    /// Run `accurev <subcommand> -H <server> <args...>` and return its stdout
    fn run(&self, subcommand: &str, args: &[&str]) -> ClientResult<Vec<u8>> {
        let mut cmd = self.command(subcommand);
        cmd.args(args);
        debug!(tool = %self.tool.display(), subcommand, ?args, "running accurev");

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ClientError::ToolNotFound(self.tool.clone())
            } else {
                ClientError::Io(e)
            }
        })?;

        if output.status.success() {
            trace!(subcommand, bytes = output.stdout.len(), "accurev succeeded");
            Ok(output.stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(classify_failure(subcommand, &output.status.to_string(), stderr))
        }
    }

    fn run_xml(&self, subcommand: &str, args: &[&str]) -> ClientResult<String> {
        let stdout = self.run(subcommand, args)?;
        String::from_utf8(stdout)
            .map_err(|e| ClientError::Parse(format!("accurev {} output is not UTF-8: {}", subcommand, e)))
    }

    fn show_streams(&self, depot: &str) -> ClientResult<Vec<Stream>> {
        let out = self.run_xml("show", &["-fx", "-p", depot, "streams"])?;
        xml::parse_streams(&out, depot)
    }

    fn stat(&self, depot: &str, stream: &str, target: &str, at: Option<u64>) -> ClientResult<Vec<Element>> {
        let at = at.map(|t| t.to_string());
        let mut args = vec!["-fx", "-s", stream, "-p", depot];
        if let Some(at) = at.as_deref() {
            args.extend_from_slice(&["-t", at]);
        }
        args.push(target);
        let out = self.run_xml("stat", &args)?;
        let mut elements = Vec::new();
        xml::parse_files(&out, Some(&mut elements))?;
        Ok(elements)
    }
}

fn classify_failure(subcommand: &str, status: &str, stderr: String) -> ClientError {
    let lowered = stderr.to_ascii_lowercase();
    if NOT_FOUND_MARKERS.iter().any(|m| lowered.contains(m)) {
        ClientError::NotFound(stderr)
    } else if AUTH_MARKERS.iter().any(|m| lowered.contains(m)) {
        ClientError::Configuration(stderr)
    } else {
        ClientError::CommandFailed {
            command: subcommand.to_string(),
            status: status.to_string(),
            stderr,
        }
    }
}

impl AccurevClient for CliAccurevClient {
    fn fetch_depot(&self, name: &str) -> ClientResult<Option<Depot>> {
        let out = self.run_xml("show", &["-fx", "depots"])?;
        Ok(xml::parse_depots(&out)?.into_iter().find(|d| d.name == name))
    }

    fn list_streams(&self, depot: &str) -> ClientResult<Vec<Stream>> {
        let mut streams = self.show_streams(depot)?;
        streams.retain(|s| s.kind.is_stream_head());
        Ok(streams)
    }

    fn list_snapshots(&self, depot: &str) -> ClientResult<Vec<Stream>> {
        let mut streams = self.show_streams(depot)?;
        streams.retain(|s| s.kind.is_snapshot());
        Ok(streams)
    }

    fn fetch_transaction(&self, depot: &str, stream: &str) -> ClientResult<Transaction> {
        let out = self.run_xml("hist", &["-fx", "-p", depot, "-s", stream, "-t", "now.1"])?;
        xml::parse_history(&out)?
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::NotFound(format!("no transaction in stream {}", stream)))
    }

    fn stat_element(
        &self,
        depot: &str,
        stream: &str,
        path: &str,
        at: Option<u64>,
    ) -> ClientResult<Option<Element>> {
        let wanted = crate::paths::clean_path(&depot_path(path));
        match self.stat(depot, stream, &depot_path(path), at) {
            Ok(elements) => Ok(elements.into_iter().find(|e| e.location == wanted)),
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn list_children(
        &self,
        depot: &str,
        stream: &str,
        dir: &str,
        at: Option<u64>,
    ) -> ClientResult<Vec<Element>> {
        let target = format!("{}/*", depot_path(dir));
        let parent = crate::paths::clean_path(&depot_path(dir));
        let parent = if parent == "/." { String::new() } else { parent };
        let mut elements = self.stat(depot, stream, &target, at)?;
        elements.retain(|e| e.parent() == parent && !e.location.is_empty() && e.location != parent);
        Ok(elements)
    }

    fn cat_file(
        &self,
        depot: &str,
        stream: &str,
        path: &str,
        at: Option<u64>,
    ) -> ClientResult<Vec<u8>> {
        let at = at.map(|t| t.to_string());
        let target = depot_path(path);
        let mut args = vec!["-p", depot, "-v", stream];
        if let Some(at) = at.as_deref() {
            args.extend_from_slice(&["-t", at]);
        }
        args.push(&target);
        self.run("cat", &args)
    }

    fn login(&self, credentials: &Credentials) -> ClientResult<()> {
        debug!(
            username = %credentials.username,
            password = "[REDACTED]",
            server = %self.server,
            "logging in"
        );
        // The password travels on stdin so it never shows up in process listings.
        let mut cmd = self.command("login");
        cmd.arg(&credentials.username).stdin(Stdio::piped());
        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ClientError::ToolNotFound(self.tool.clone())
            } else {
                ClientError::Io(e)
            }
        })?;
        if let Some(mut stdin) = child.stdin.take() {
            writeln!(stdin, "{}", credentials.password)?;
        }
        let output = child.wait_with_output()?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(match classify_failure("login", &output.status.to_string(), stderr) {
                ClientError::CommandFailed { stderr, .. } => ClientError::Configuration(stderr),
                other => other,
            })
        }
    }
}
