// Pi-hole Client
//
// Typed access to a Pi-hole appliance's management API.
//
// The credential in `ClientConfig` picks the API generation:
//
// - `Credential::Password`: current API (`/api/...`), session-authenticated.
//   Local DNS, local CNAME and session operations.
// - `Credential::ApiToken`: legacy API (`api.php`), token-authenticated.
//   Custom DNS, domain lists, blocking status and versions.
//
// Calling an operation of the other generation fails with
// `Error::ClientValidation` before any request is sent.

pub mod ad_blocker;
pub mod custom_dns;
pub mod domains;
pub mod local_cname;
pub mod local_dns;
pub mod record;
mod response;
pub mod sessions;
pub mod version;

pub use ad_blocker::{AdBlocker, AdBlockerStatus};
pub use custom_dns::CustomDns;
pub use domains::{DomainEntry, Domains, ListType};
pub use local_cname::LocalCname;
pub use local_dns::LocalDns;
pub use record::{CnameRecord, DnsRecord};
pub use sessions::Sessions;
pub use version::{ComponentVersions, Version};

pub use pihole_core::{
    ApiGeneration, AuthFailure, ClientConfig, Credential, EntityKind, Error, Result, Session,
};
pub use pihole_http::{HttpTransport, HttpTransportConfig};

use pihole_core::Dispatcher;
use pihole_core::traits::Transport;
use std::fmt;
use std::sync::Arc;

/// Pi-hole API client
///
/// Cheap to clone; clones share the transport and the session.
#[derive(Debug, Clone)]
pub struct Client {
    dispatcher: Arc<Dispatcher>,
}

impl Client {
    /// Client with the default HTTP transport
    ///
    /// No network activity happens here; the first authenticated call logs
    /// in.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder::new(config)
    }

    /// API generation this client speaks
    pub fn generation(&self) -> ApiGeneration {
        self.dispatcher.generation()
    }

    pub fn local_dns(&self) -> LocalDns<'_> {
        LocalDns::new(&self.dispatcher)
    }

    pub fn local_cname(&self) -> LocalCname<'_> {
        LocalCname::new(&self.dispatcher)
    }

    pub fn sessions(&self) -> Sessions<'_> {
        Sessions::new(&self.dispatcher)
    }

    pub fn custom_dns(&self) -> CustomDns<'_> {
        CustomDns::new(&self.dispatcher)
    }

    pub fn domains(&self) -> Domains<'_> {
        Domains::new(&self.dispatcher)
    }

    pub fn ad_blocker(&self) -> AdBlocker<'_> {
        AdBlocker::new(&self.dispatcher)
    }

    pub fn version(&self) -> Version<'_> {
        Version::new(&self.dispatcher)
    }

    /// Whether a valid session is currently held
    pub async fn has_session(&self) -> bool {
        self.dispatcher.has_session().await
    }

    /// End the current session, if any
    ///
    /// A no-op when no session is held, including on legacy clients.
    pub async fn logout(&self) -> Result<()> {
        match self.dispatcher.session_id().await {
            Some(sid) => {
                self.dispatcher.logout(&sid).await?;
                tracing::info!("Logged out");
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Underlying dispatcher, for endpoints without a typed collaborator
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

/// Builder for [`Client`]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    transport_config: HttpTransportConfig,
}

impl ClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
            transport_config: HttpTransportConfig::default(),
        }
    }

    /// Use a custom transport instead of [`HttpTransport`]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Settings for the default transport (ignored with a custom transport)
    pub fn transport_config(mut self, config: HttpTransportConfig) -> Self {
        self.transport_config = config;
        self
    }

    /// Validate the configuration and build the client
    ///
    /// # Errors
    ///
    /// [`Error::ClientValidation`] for an invalid configuration.
    pub fn build(self) -> Result<Client> {
        self.config.validate()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::from_config(&self.transport_config)?),
        };

        let dispatcher = Dispatcher::new(&self.config, transport)?;
        Ok(Client {
            dispatcher: Arc::new(dispatcher),
        })
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("custom_transport", &self.transport.is_some())
            .field("transport_config", &self.transport_config)
            .finish()
    }
}
