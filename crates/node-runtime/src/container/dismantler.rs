//! # Node Dismantler
//!
//! Releases a node's subsystems in an order that is safe for any subset of
//! them being absent.
//!
//! ## Release Order
//!
//! ```text
//! 1. providerstore
//! 2. peerstore
//! 3. repo            (the borrowed identity goes with it)
//! 4. routing         only if mode == Online
//! 5. blockstore
//! 6. exchange        close(), then drop
//! 7. the record
//! ```
//!
//! Each step is guarded by presence and `take()`s its field, so running the
//! dismantler again finds nothing left to release. Routing lives inside
//! `Network::Online`, so it is released exactly when the node is `Online`;
//! an `Offline` record has no routing slot to leak.
//!
//! Collaborators absorb and log their own release failures; the dismantler
//! has no error channel.

use tracing::{debug, info, instrument};

use crate::container::node::{Network, Node};

/// Tear down a node. An absent node is a no-op.
pub fn destroy(node: Option<Node>) {
    match node {
        Some(node) => node.destroy(),
        None => debug!("destroy called on absent node"),
    }
}

impl Node {
    /// Release every subsystem and the record itself.
    pub fn destroy(mut self) {
        self.dismantle();
        info!(instance = %self.instance_id, "Node destroyed");
    }

    /// Release whatever is present, in teardown order.
    #[instrument(name = "node_dismantle", skip_all, fields(instance = %self.instance_id, mode = %self.mode()))]
    pub(crate) fn dismantle(&mut self) {
        if let Some(providerstore) = self.providerstore.take() {
            drop(providerstore);
            debug!("  [providerstore] released");
        }

        if let Some(peerstore) = self.peerstore.take() {
            drop(peerstore);
            debug!("  [peerstore] released");
        }

        if let Some(repo) = self.repo.take() {
            drop(repo);
            debug!("  [repo] released");
        }

        if let Network::Online(slot) = &mut self.network {
            if let Some(routing) = slot.take() {
                drop(routing);
                debug!("  [routing] released");
            }
        }

        if let Some(blockstore) = self.blockstore.take() {
            drop(blockstore);
            debug!("  [blockstore] released");
        }

        if let Some(mut exchange) = self.exchange.take() {
            exchange.close();
            drop(exchange);
            debug!("  [exchange] closed");
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        self.dismantle();
    }
}
