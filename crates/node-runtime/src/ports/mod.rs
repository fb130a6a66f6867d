//! # Ports
//!
//! Outbound (driven) ports: the interfaces the node runtime requires from the
//! collaborators it owns. Default implementations live in `crate::adapters`.

pub mod errors;
pub mod outbound;

pub use errors::{BlockStoreError, ExchangeError, RepoError, RoutingError, StoreError};
pub use outbound::{
    BlockExchange, BlockStore, Exchange, NodeView, PeerStore, ProviderStore, Repository, Routing,
    SubsystemFactory,
};
