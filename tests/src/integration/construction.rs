//! # Construction Flow Tests
//!
//! Drives the composer through a [`RecordingFactory`] and checks, for a
//! failure at every step, that no node is returned and that exactly the
//! subsystems built before the failure were released.

#[cfg(test)]
mod tests {
    use node_runtime::container::SubsystemId::{
        self, Blockstore, Exchange, Peerstore, Providerstore, Repo, Routing,
    };
    use node_runtime::ports::errors::RepoError;
    use node_runtime::{construct_with, ConstructionError, Mode, NodeOptions};

    use crate::doubles::{Event, FailAt, RecordingFactory};

    const REPO: &str = "/srv/content-node";

    fn build(factory: &RecordingFactory, options: NodeOptions) -> Result<(), ConstructionError> {
        construct_with(REPO, options, factory).map(drop)
    }

    // =============================================================================
    // SUCCESS
    // =============================================================================

    #[test]
    fn test_online_construction_acquires_in_dependency_order() {
        let factory = RecordingFactory::new();

        let node = construct_with(REPO, NodeOptions::default(), &factory).unwrap();

        assert_eq!(
            factory.acquisitions(),
            vec![Repo, Peerstore, Providerstore, Blockstore, Routing, Exchange]
        );
        assert!(factory.releases().is_empty());
        assert_eq!(node.mode(), Mode::Online);
        assert_eq!(node.peer_id(), Some(factory.identity().peer_id));
        assert!(node.is_complete());
    }

    #[test]
    fn test_offline_construction_never_touches_routing() {
        let factory = RecordingFactory::new();

        let node = construct_with(REPO, NodeOptions::offline(), &factory).unwrap();

        assert_eq!(
            factory.acquisitions(),
            vec![Repo, Peerstore, Providerstore, Blockstore, Exchange]
        );
        assert_eq!(node.mode(), Mode::Offline);
        assert!(node.routing().is_none());
        assert!(factory.observed_routing_key_owner().is_none());
    }

    #[test]
    fn test_routing_receives_the_node_private_key() {
        let factory = RecordingFactory::new();
        let _node = construct_with(REPO, NodeOptions::default(), &factory).unwrap();

        assert_eq!(
            factory.observed_routing_key_owner(),
            Some(factory.identity().peer_id)
        );
    }

    #[test]
    fn test_exchange_sees_online_mode_after_routing() {
        let factory = RecordingFactory::new();
        let _node = construct_with(REPO, NodeOptions::default(), &factory).unwrap();
        assert_eq!(factory.observed_exchange_mode(), Some(Mode::Online));
    }

    #[test]
    fn test_exchange_sees_offline_mode_without_routing() {
        let factory = RecordingFactory::new();
        let _node = construct_with(REPO, NodeOptions::offline(), &factory).unwrap();
        assert_eq!(factory.observed_exchange_mode(), Some(Mode::Offline));
    }

    // =============================================================================
    // FAILURE AT EACH STEP
    // =============================================================================

    #[test]
    fn test_repo_creation_failure_builds_nothing() {
        let factory = RecordingFactory::failing_at(FailAt::CreateRepo);

        let err = build(&factory, NodeOptions::default()).unwrap_err();

        assert!(matches!(
            err,
            ConstructionError::RepoCreateFailed {
                source: RepoError::InvalidPath(_),
                ..
            }
        ));
        assert!(factory.events().is_empty());
    }

    #[test]
    fn test_repo_open_failure_releases_nothing() {
        let factory = RecordingFactory::failing_at(FailAt::OpenRepo);

        let err = build(&factory, NodeOptions::default()).unwrap_err();

        assert!(matches!(
            err,
            ConstructionError::RepoOpenFailed {
                source: RepoError::NotInitialized(_),
                ..
            }
        ));
        assert!(factory.events().is_empty());
    }

    #[test]
    fn test_peerstore_failure_releases_repo() {
        let factory = RecordingFactory::failing_at(FailAt::Peerstore);

        let err = build(&factory, NodeOptions::default()).unwrap_err();

        assert_eq!(err.subsystem(), SubsystemId::Peerstore);
        assert_eq!(factory.acquisitions(), vec![Repo]);
        assert_eq!(factory.releases(), vec![Repo]);
    }

    #[test]
    fn test_providerstore_failure_releases_peerstore_then_repo() {
        let factory = RecordingFactory::failing_at(FailAt::Providerstore);

        let err = build(&factory, NodeOptions::default()).unwrap_err();

        assert_eq!(err.subsystem(), SubsystemId::Providerstore);
        assert_eq!(factory.releases(), vec![Peerstore, Repo]);
    }

    #[test]
    fn test_blockstore_failure_releases_stores_then_repo() {
        let factory = RecordingFactory::failing_at(FailAt::Blockstore);

        let err = build(&factory, NodeOptions::default()).unwrap_err();

        assert!(matches!(err, ConstructionError::BlockstoreFailed(_)));
        assert_eq!(factory.releases(), vec![Providerstore, Peerstore, Repo]);
    }

    #[test]
    fn test_routing_failure_releases_everything_built_except_routing() {
        let factory = RecordingFactory::failing_at(FailAt::Routing);

        let err = build(&factory, NodeOptions::default()).unwrap_err();

        assert!(matches!(err, ConstructionError::RoutingFailed(_)));
        assert_eq!(
            factory.acquisitions(),
            vec![Repo, Peerstore, Providerstore, Blockstore]
        );
        assert_eq!(
            factory.releases(),
            vec![Providerstore, Peerstore, Repo, Blockstore]
        );
        assert!(factory.observed_exchange_mode().is_none());
    }

    #[test]
    fn test_exchange_failure_online_releases_routing_but_closes_nothing() {
        let factory = RecordingFactory::failing_at(FailAt::Exchange);

        let err = build(&factory, NodeOptions::default()).unwrap_err();

        assert!(matches!(err, ConstructionError::ExchangeFailed(_)));
        assert_eq!(
            factory.releases(),
            vec![Providerstore, Peerstore, Repo, Routing, Blockstore]
        );
        assert!(!factory.events().contains(&Event::ExchangeClosed));
    }

    #[test]
    fn test_exchange_failure_offline_releases_stores_and_repo() {
        let factory = RecordingFactory::failing_at(FailAt::Exchange);

        let err = build(&factory, NodeOptions::offline()).unwrap_err();

        assert!(matches!(err, ConstructionError::ExchangeFailed(_)));
        assert_eq!(
            factory.releases(),
            vec![Providerstore, Peerstore, Repo, Blockstore]
        );
    }

    #[test]
    fn test_every_acquired_subsystem_is_released_exactly_once_on_failure() {
        for step in [
            FailAt::Peerstore,
            FailAt::Providerstore,
            FailAt::Blockstore,
            FailAt::Routing,
            FailAt::Exchange,
        ] {
            let factory = RecordingFactory::failing_at(step);
            assert!(build(&factory, NodeOptions::default()).is_err());

            let mut acquired = factory.acquisitions();
            let mut released = factory.releases();
            acquired.sort_by_key(|id| id.name());
            released.sort_by_key(|id| id.name());
            assert_eq!(acquired, released, "failure at {:?}", step);
        }
    }
}
