// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use crate::error::ScmResult;
use crate::head::Head;
use crate::listener::TaskListener;
use crate::probe::LazyProbe;
use crate::revision::Revision;

/// Decides whether a resolved head is buildable.
///
/// The probe is only created if the criteria actually asks for it.
pub trait SourceCriteria {
    fn is_head(
        &self,
        head: &Head,
        revision: &Revision,
        probe: &LazyProbe<'_>,
        listener: &mut dyn TaskListener,
    ) -> ScmResult<bool>;
}

/// Accepts heads that contain a marker file
#[derive(Debug, Clone)]
pub struct FileExistsCriteria {
    path: String,
}

impl FileExistsCriteria {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl SourceCriteria for FileExistsCriteria {
    fn is_head(
        &self,
        _head: &Head,
        _revision: &Revision,
        probe: &LazyProbe<'_>,
        listener: &mut dyn TaskListener,
    ) -> ScmResult<bool> {
        if probe.get()?.is_file(&self.path)? {
            listener.line(&format!("      '{}' found", self.path));
            Ok(true)
        } else {
            listener.line(&format!("      '{}' not found", self.path));
            Ok(false)
        }
    }
}
