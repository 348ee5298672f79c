// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only
#![allow(clippy::disallowed_methods)] // CLI commands intentionally print to stdout/stderr

//! `arscm probe`

use anyhow::Result;
use ar_scm::{FileType, Probe, ScmFile};
use std::fmt::Write;

use crate::settings::Settings;
use crate::HeadArgs;

#[derive(clap::Args, Clone, Debug)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub head: HeadArgs,
    /// Path inside the head (default: the root)
    #[arg(default_value = "")]
    pub path: String,
    /// Print file content
    #[arg(long)]
    pub content: bool,
}

impl ProbeArgs {
    pub fn run(&self, settings: &Settings) -> Result<()> {
        let client = settings.client()?;
        let probe = settings.source().create_probe(&client, self.head.head(), None);
        print!("{}", self.describe(&probe)?);
        Ok(())
    }

    /// Text report for the requested path
    pub fn describe(&self, probe: &dyn Probe) -> Result<String> {
        let file = ScmFile::root(probe).child(&self.path);
        let shown = if file.is_root() { "/" } else { file.path() };
        let mut out = String::new();
        match file.file_type()? {
            FileType::NonExistent => writeln!(out, "{shown}: does not exist")?,
            FileType::RegularFile => {
                writeln!(out, "{shown}: file")?;
                if self.content {
                    out.push_str(&file.content_as_string()?);
                }
            }
            FileType::Directory => {
                writeln!(out, "{shown}: directory")?;
                for child in file.children().iter()? {
                    let marker = if child.is_directory()? { "/" } else { "" };
                    writeln!(out, "  {}{marker}", child.name())?;
                }
            }
        }
        Ok(out)
    }
}
