mod clock;

pub use clock::MonotonicClock;

#[cfg(feature = "sha2")]
use crate::{
    config::StrategyConfig,
    metrics::InertMetrics,
    platform::sha::Sha256Hasher,
    store::ReferenceContentStore,
    strategy::HandoverStrategy,
    tables::reference::ReferencePit,
};

#[cfg(feature = "sha2")]
pub type DefaultStrategy =
    HandoverStrategy<MonotonicClock, ReferencePit, ReferenceContentStore<Sha256Hasher>, InertMetrics>;

#[cfg(feature = "sha2")]
impl DefaultStrategy {
    pub fn from_config(config: &StrategyConfig) -> Self {
        let pit = ReferencePit::new(
            config.tables.pit_capacity,
            config.tables.pit_erased_retention_ms,
        );
        let content_store =
            ReferenceContentStore::new(config.tables.content_store_capacity, Sha256Hasher::new());
        HandoverStrategy::new(config, MonotonicClock::new(), pit, content_store, InertMetrics {})
    }
}

#[cfg(feature = "sha2")]
impl Default for DefaultStrategy {
    fn default() -> Self {
        Self::from_config(&StrategyConfig::default())
    }
}

#[cfg(all(test, feature = "sha2"))]
mod tests {
    use alloc::rc::Rc;

    use super::DefaultStrategy;
    use crate::{
        clock::Timestamp,
        config::StrategyConfig,
        face::local::local_face,
        name::Name,
        packet::Data,
        strategy::DataOutcome,
    };

    #[test]
    fn test_default_strategy_pass_through() {
        let mut strategy = DefaultStrategy::from_config(&StrategyConfig::edge(true));
        let (sender, mut receiver) = local_face(4);
        let face = strategy.add_face(sender).unwrap();
        assert!(strategy.enable_data_redirect(face, Timestamp::ZERO));

        let data = Rc::new(Data::new(Name::from_uri("/a").unwrap(), b"x"));
        assert!(matches!(
            strategy.on_data(None, data),
            DataOutcome::Redirected { sent: 1, .. }
        ));
        assert!(receiver.try_recv().is_some());
    }
}
