// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The configured branch source and its entry points

use ar_client::AccurevClient;
use ar_config_types::{SourceSection, TraitRule};
use tracing::{info, warn};
use url::Url;

use crate::builder::{ScmBuilder, ScmConfig};
use crate::context::DiscoveryContext;
use crate::criteria::SourceCriteria;
use crate::discovery_traits::{traits_from_rules, SourceTrait};
use crate::error::{ScmError, ScmResult};
use crate::event::HeadEvent;
use crate::head::{CategoryDescriptor, Head, CATEGORY_DESCRIPTORS};
use crate::listener::TaskListener;
use crate::observer::HeadObserver;
use crate::probe::ScmFileSystem;
use crate::resolver::ClientRevisionResolver;
use crate::revision::Revision;

const URL_SCHEME: &str = "accurev://";

/// Split a server URL into host and optional port.
///
/// Accepts `host`, `host:port` and the same prefixed with `accurev://`.
pub fn parse_server_url(raw: &str) -> ScmResult<(String, Option<u16>)> {
    let trimmed = raw.trim();
    let rest = trimmed.strip_prefix(URL_SCHEME).unwrap_or(trimmed);
    if rest.is_empty() {
        return Err(ScmError::Configuration("server URL is not set".to_string()));
    }
    let invalid = || ScmError::Configuration(format!("invalid server URL '{raw}'"));
    let url = Url::parse(&format!("{URL_SCHEME}{rest}")).map_err(|_| invalid())?;
    let host = url.host_str().filter(|h| !h.is_empty()).ok_or_else(invalid)?;
    if !matches!(url.path(), "" | "/") || url.query().is_some() || !url.username().is_empty() {
        return Err(invalid());
    }
    Ok((host.to_string(), url.port()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccurevSource {
    server_url: String,
    depot: String,
    credentials_id: Option<String>,
    traits: Vec<TraitRule>,
}

impl AccurevSource {
    pub fn new(server_url: impl Into<String>, depot: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            depot: depot.into(),
            credentials_id: None,
            traits: SourceSection::default().effective_traits(),
        }
    }

    pub fn from_config(section: &SourceSection) -> ScmResult<Self> {
        let server_url = section
            .server_url
            .clone()
            .ok_or_else(|| ScmError::Configuration("server URL is not set".to_string()))?;
        let depot = section
            .depot
            .clone()
            .ok_or_else(|| ScmError::Configuration("depot is not set".to_string()))?;
        let source = Self {
            server_url,
            depot,
            credentials_id: section.credentials_id.clone(),
            traits: section.effective_traits(),
        };
        source.validate()?;
        Ok(source)
    }

    pub fn with_traits(mut self, traits: Vec<TraitRule>) -> Self {
        self.traits = traits;
        self
    }

    pub fn with_credentials_id(mut self, id: impl Into<String>) -> Self {
        self.credentials_id = Some(id.into());
        self
    }

    pub fn with_depot(&self, depot: impl Into<String>) -> Self {
        Self {
            depot: depot.into(),
            ..self.clone()
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn depot(&self) -> &str {
        &self.depot
    }

    pub fn credentials_id(&self) -> Option<&str> {
        self.credentials_id.as_deref()
    }

    pub fn trait_rules(&self) -> &[TraitRule] {
        &self.traits
    }

    pub fn traits(&self) -> Vec<Box<dyn SourceTrait>> {
        traits_from_rules(&self.traits)
    }

    /// `host[:port]` as passed to the command line client
    pub fn server_address(&self) -> ScmResult<String> {
        let (host, port) = parse_server_url(&self.server_url)?;
        Ok(match port {
            Some(port) => format!("{host}:{port}"),
            None => host,
        })
    }

    pub fn validate(&self) -> ScmResult<()> {
        parse_server_url(&self.server_url)?;
        if self.depot.trim().is_empty() {
            return Err(ScmError::Configuration("depot is not set".to_string()));
        }
        Ok(())
    }

    /// Descriptors for the categories some enabled rule accepts
    pub fn categories(&self) -> Vec<CategoryDescriptor> {
        let traits = self.traits();
        CATEGORY_DESCRIPTORS
            .iter()
            .filter(|d| traits.iter().any(|t| t.include_category(d.category)))
            .copied()
            .collect()
    }

    /// Run one discovery pass over the depot.
    ///
    /// Configuration problems and failures listing the depot abort the pass.
    /// A depot the server does not know ends it quietly.
    pub fn retrieve(
        &self,
        client: &dyn AccurevClient,
        criteria: Option<&dyn SourceCriteria>,
        observer: &mut dyn HeadObserver,
        event: Option<&HeadEvent>,
        listener: &mut dyn TaskListener,
    ) -> ScmResult<()> {
        self.validate()?;

        info!(depot = %self.depot, "Looking up depot");
        listener.line(&format!("Looking up depot: {}", self.depot));
        let depot = match client.fetch_depot(&self.depot)? {
            Some(depot) => depot,
            None => {
                warn!(depot = %self.depot, "Could not find depot");
                listener.line(&format!("Could not find Depot: {}", self.depot));
                return Ok(());
            }
        };

        let traits = self.traits();
        let mut context = DiscoveryContext::new(criteria, observer);
        context.with_traits(traits.iter().map(|t| t.as_ref()));
        if let Some(event) = event {
            context.with_event(event);
        }

        let resolver = ClientRevisionResolver::new(client, &depot.name);
        let mut request = context.new_request(self, client, listener);
        request.run(&resolver)
    }

    /// Lazy view of a head's files; a missing revision means "latest"
    pub fn create_probe<'c>(
        &'c self,
        client: &'c dyn AccurevClient,
        head: Head,
        revision: Option<Revision>,
    ) -> ScmFileSystem<'c> {
        ScmFileSystem::new(client, self.depot.as_str(), head, revision)
    }

    pub fn build(&self, head: Head, revision: Option<Revision>) -> ScmResult<ScmConfig> {
        ScmBuilder::new(self, head, revision).build()
    }
}
