//! # Adapter Implementations
//!
//! Concrete implementations of the outbound ports, plus the factory that
//! hands them to the composer.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  OUTER LAYER (Adapters)                                      │
//! │  FsRepo, MemoryPeerStore, MemoryProviderStore, FsBlockStore, │
//! │  OnlineRouting, Bitswap, DefaultSubsystems                   │
//! ├──────────────────────────────────────────────────────────────┤
//! │                      ↑ implements ↑                          │
//! │  MIDDLE LAYER (Ports)                                        │
//! │  trait Repository, trait PeerStore, ..., SubsystemFactory    │
//! ├──────────────────────────────────────────────────────────────┤
//! │                        ↑ uses ↑                              │
//! │  INNER LAYER (Container)                                     │
//! │  Node record, composer, dismantler                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod blockstore;
pub mod exchange;
pub mod factory;
pub mod peerstore;
pub mod providerstore;
pub mod repo;
pub mod routing;

pub use blockstore::FsBlockStore;
pub use exchange::Bitswap;
pub use factory::{DefaultSubsystems, DEFAULT_LOCK_TIMEOUT};
pub use peerstore::MemoryPeerStore;
pub use providerstore::MemoryProviderStore;
pub use repo::{FsRepo, RepoLock};
pub use routing::OnlineRouting;
