// # pihole-core
//
// Session handling and request dispatch for the Pi-hole management API.
//
// ## Architecture Overview
//
// - **Transport**: Trait for performing HTTP exchanges (pluggable)
// - **WireAdapter**: Trait shaping requests for one API generation
//   (current REST API or legacy `api.php` query API)
// - **RequestBuilder**: Base URL + static headers + adapter -> request
// - **SessionStore**: Lock-guarded cache of the current session
// - **Authenticator**: Login / logout exchanges
// - **Dispatcher**: Lazy login, credential attachment, delegation to Transport
//
// Entity operations (DNS, CNAME, domains, ...) live in `pihole-client` and
// only ever talk to the appliance through the `Dispatcher`.
//
// ## Design Principles
//
// 1. **One generation per client**: the credential picks the wire adapter
// 2. **Single-flight login**: concurrent first use triggers one login exchange
// 3. **No hidden retries**: transport errors surface with call context
// 4. **Fail fast**: configuration errors are reported before any I/O

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod request;
pub mod session;
pub mod traits;
pub mod wire;

// Re-export core types for convenience
pub use auth::Authenticator;
pub use config::{ApiGeneration, ClientConfig, Credential};
pub use dispatch::Dispatcher;
pub use error::{AuthFailure, EntityKind, Error, Result};
pub use request::RequestBuilder;
pub use session::{Session, SessionStore};
pub use traits::{HttpRequest, HttpResponse, Method, Target, Transport, WireAdapter};
