pub mod config;
pub mod data;
pub mod error;
pub mod map;
pub mod rng;
pub mod route;

pub use config::GeneratorConfig;
pub use data::{Song, SongCatalog};
pub use error::{CatalogError, ConfigError};
pub use map::{Act, Node, NodeKind, Run, RunGenerator, build_run};
pub use route::{RouteCommand, RouteCursor};
