//! # Config Module
//!
//! Route configuration: naming settings, the alias table, ordered regex routes and
//! declaratively served handlers. Loaded once at startup from YAML, TOML or JSON and
//! treated as immutable afterwards.
//!
//! ## Example
//!
//! ```yaml
//! settings:
//!   handler_suffix: Service
//!   method_prefix: do
//!   regex_arguments: verbatim
//!
//! aliases:
//!   news:
//!     0: ArticleService          # target (positional key or `target`)
//!     methodFilter: audit        # registered post-bind hook
//!     methods:
//!       latest: doListLatest     # /news/latest -> ArticleService::doListLatest
//!   about: PageService
//!
//! regex_routes:
//!   - pattern: '^/(\d{4})/(\d{2})$'
//!     target: ArchiveService
//!     method: doMonth
//!
//! handlers:
//!   - name: ArticleService
//!     protocol: site
//!     methods:
//!       - name: doListLatest
//!         params: [{ name: limit, default: 10 }]
//! ```

mod load;
mod types;
mod validate;

pub use load::{load_route_config, parse_route_config, ConfigFormat};
pub use types::{
    AliasConfig, AliasSpec, DispatchSettings, RegexArgumentPolicy, RegexRouteConfig, RouteConfig,
};
