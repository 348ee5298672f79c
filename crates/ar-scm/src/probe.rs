// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Lazy, read-only views of a head's file tree.
//!
//! Nothing is materialized up front: each path is looked up on first use and
//! cached for the lifetime of the view. Snapshots are immutable, so their
//! lookups are never pinned to a transaction; streams are pinned to the
//! revision they were resolved at.

use ar_client::{clean_path, AccurevClient, Element};
use chrono::{DateTime, Utc};
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use tracing::debug;

use crate::error::{ScmError, ScmResult};
use crate::head::Head;
use crate::revision::Revision;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    NonExistent,
    RegularFile,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    pub name: String,
    pub path: String,
    pub file_type: FileType,
}

pub trait Probe {
    /// Name of the head being probed
    fn name(&self) -> &str;

    fn last_modified(&self) -> ScmResult<DateTime<Utc>>;

    fn stat(&self, path: &str) -> ScmResult<FileType>;

    fn exists(&self, path: &str) -> ScmResult<bool> {
        Ok(self.stat(path)? != FileType::NonExistent)
    }

    fn is_file(&self, path: &str) -> ScmResult<bool> {
        Ok(self.stat(path)? == FileType::RegularFile)
    }

    fn is_directory(&self, path: &str) -> ScmResult<bool> {
        Ok(self.stat(path)? == FileType::Directory)
    }

    fn open(&self, path: &str) -> ScmResult<Box<dyn Read + '_>>;

    /// Immediate children of a directory; empty for anything else
    fn list_children(&self, path: &str) -> ScmResult<Vec<ChildEntry>>;
}

/// Relative, forward-slash path without leading or trailing separators
fn normalize(path: &str) -> String {
    clean_path(path).trim_matches('/').to_string()
}

fn file_type_of(element: &Element) -> FileType {
    if element.status.contains("defunct") {
        FileType::NonExistent
    } else if element.is_dir {
        FileType::Directory
    } else {
        FileType::RegularFile
    }
}

/// [`Probe`] backed by on-demand client calls
pub struct ScmFileSystem<'c> {
    client: &'c dyn AccurevClient,
    depot: String,
    head: Head,
    revision: Option<Revision>,
    elements: RefCell<HashMap<String, Option<Element>>>,
    children: RefCell<HashMap<String, Vec<ChildEntry>>>,
}

impl<'c> ScmFileSystem<'c> {
    pub fn new(
        client: &'c dyn AccurevClient,
        depot: impl Into<String>,
        head: Head,
        revision: Option<Revision>,
    ) -> Self {
        Self {
            client,
            depot: depot.into(),
            head,
            revision,
            elements: RefCell::new(HashMap::new()),
            children: RefCell::new(HashMap::new()),
        }
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    pub fn revision(&self) -> Option<&Revision> {
        self.revision.as_ref()
    }

    pub fn root(&self) -> ScmFile<'_> {
        ScmFile::root(self)
    }

    /// Transaction that lookups are pinned to
    fn at(&self) -> Option<u64> {
        if self.head.is_snapshot() {
            None
        } else {
            self.revision.as_ref().map(Revision::transaction)
        }
    }

    fn element(&self, path: &str) -> ScmResult<Option<Element>> {
        if let Some(cached) = self.elements.borrow().get(path) {
            return Ok(cached.clone());
        }
        debug!(depot = %self.depot, head = %self.head, path, "Stat element");
        let element = self
            .client
            .stat_element(&self.depot, self.head.name(), path, self.at())?;
        self.elements
            .borrow_mut()
            .insert(path.to_string(), element.clone());
        Ok(element)
    }
}

impl Probe for ScmFileSystem<'_> {
    fn name(&self) -> &str {
        self.head.name()
    }

    fn last_modified(&self) -> ScmResult<DateTime<Utc>> {
        match &self.revision {
            Some(revision) => Ok(revision.last_modified()),
            None => Ok(self
                .client
                .fetch_transaction(&self.depot, self.head.name())?
                .time),
        }
    }

    fn stat(&self, path: &str) -> ScmResult<FileType> {
        let path = normalize(path);
        if path.is_empty() {
            return Ok(FileType::Directory);
        }
        Ok(self
            .element(&path)?
            .as_ref()
            .map_or(FileType::NonExistent, file_type_of))
    }

    fn open(&self, path: &str) -> ScmResult<Box<dyn Read + '_>> {
        let path = normalize(path);
        match self.stat(&path)? {
            FileType::RegularFile => {}
            FileType::Directory => {
                return Err(ScmError::Unsupported(format!("{path} is a directory")))
            }
            FileType::NonExistent => {
                return Err(ScmError::NotFound(format!(
                    "{path} in {} {}",
                    self.head.pronoun(),
                    self.head
                )))
            }
        }
        let content = self
            .client
            .cat_file(&self.depot, self.head.name(), &path, self.at())?;
        Ok(Box::new(Cursor::new(content)))
    }

    fn list_children(&self, path: &str) -> ScmResult<Vec<ChildEntry>> {
        let path = normalize(path);
        if let Some(cached) = self.children.borrow().get(&path) {
            return Ok(cached.clone());
        }
        if self.stat(&path)? != FileType::Directory {
            return Ok(Vec::new());
        }
        let elements = self
            .client
            .list_children(&self.depot, self.head.name(), &path, self.at())?;
        let mut entries = Vec::with_capacity(elements.len());
        {
            let mut cache = self.elements.borrow_mut();
            for element in elements {
                let file_type = file_type_of(&element);
                entries.push(ChildEntry {
                    name: element.file_name().to_string(),
                    path: element.location.clone(),
                    file_type,
                });
                cache.insert(element.location.clone(), Some(element));
            }
        }
        self.children.borrow_mut().insert(path, entries.clone());
        Ok(entries)
    }
}

/// Children of one directory.
///
/// Nothing is fetched until [`Children::iter`] is called, and every call
/// starts over from the first entry.
pub struct Children<'p> {
    probe: &'p dyn Probe,
    path: String,
}

impl<'p> Children<'p> {
    pub fn iter(&self) -> ScmResult<impl Iterator<Item = ScmFile<'p>>> {
        let probe = self.probe;
        Ok(self
            .probe
            .list_children(&self.path)?
            .into_iter()
            .map(move |entry| ScmFile::at(probe, entry.path)))
    }
}

/// A path within a [`Probe`]
#[derive(Clone)]
pub struct ScmFile<'p> {
    probe: &'p dyn Probe,
    path: String,
}

impl<'p> ScmFile<'p> {
    pub fn root(probe: &'p dyn Probe) -> Self {
        Self::at(probe, String::new())
    }

    fn at(probe: &'p dyn Probe, path: impl Into<String>) -> Self {
        Self {
            probe,
            path: normalize(&path.into()),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path component; empty for the root
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    pub fn child(&self, name: &str) -> ScmFile<'p> {
        if self.is_root() {
            Self::at(self.probe, name)
        } else {
            Self::at(self.probe, format!("{}/{}", self.path, name))
        }
    }

    pub fn parent(&self) -> Option<ScmFile<'p>> {
        if self.is_root() {
            return None;
        }
        let parent = self.path.rsplit_once('/').map_or("", |(parent, _)| parent);
        Some(Self::at(self.probe, parent))
    }

    pub fn file_type(&self) -> ScmResult<FileType> {
        self.probe.stat(&self.path)
    }

    pub fn exists(&self) -> ScmResult<bool> {
        self.probe.exists(&self.path)
    }

    pub fn is_file(&self) -> ScmResult<bool> {
        self.probe.is_file(&self.path)
    }

    pub fn is_directory(&self) -> ScmResult<bool> {
        self.probe.is_directory(&self.path)
    }

    pub fn last_modified(&self) -> ScmResult<DateTime<Utc>> {
        self.probe.last_modified()
    }

    pub fn content(&self) -> ScmResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.probe
            .open(&self.path)?
            .read_to_end(&mut buf)
            .map_err(ar_client::ClientError::from)?;
        Ok(buf)
    }

    pub fn content_as_string(&self) -> ScmResult<String> {
        Ok(String::from_utf8_lossy(&self.content()?).into_owned())
    }

    pub fn children(&self) -> Children<'p> {
        Children {
            probe: self.probe,
            path: self.path.clone(),
        }
    }
}

/// Builds its probe on first use.
///
/// Criteria that never look at content never cause a probe to be created.
pub struct LazyProbe<'p> {
    factory: Box<dyn Fn() -> ScmResult<Box<dyn Probe + 'p>> + 'p>,
    probe: OnceCell<Box<dyn Probe + 'p>>,
}

impl<'p> LazyProbe<'p> {
    pub fn new(factory: impl Fn() -> ScmResult<Box<dyn Probe + 'p>> + 'p) -> Self {
        Self {
            factory: Box::new(factory),
            probe: OnceCell::new(),
        }
    }

    pub fn get(&self) -> ScmResult<&(dyn Probe + 'p)> {
        if let Some(probe) = self.probe.get() {
            return Ok(probe.as_ref());
        }
        let created = (self.factory)()?;
        Ok(self.probe.get_or_init(|| created).as_ref())
    }

    pub fn is_created(&self) -> bool {
        self.probe.get().is_some()
    }
}
