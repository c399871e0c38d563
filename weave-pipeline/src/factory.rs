//! [`PipelineFactory`]: name -> stage-constructor registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::stage::PipelineStage;

/// Registers named constructors for [`PipelineStage`]s and builds them on
/// demand. Constructors close over whatever capability the stage they
/// build needs (a chunker, a file reader, a memory writer), mirroring how
/// the original's `PipelineFactory::register_stage<Stage, Args...>`
/// captures its constructor arguments in a closure.
#[derive(Default)]
pub struct PipelineFactory {
    creators: HashMap<String, Arc<dyn Fn() -> Arc<dyn PipelineStage> + Send + Sync>>,
}

impl PipelineFactory {
    /// An empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `name`, replacing any existing one.
    pub fn register_stage(
        &mut self,
        name: impl Into<String>,
        creator: impl Fn() -> Arc<dyn PipelineStage> + Send + Sync + 'static,
    ) {
        self.creators.insert(name.into(), Arc::new(creator));
    }

    /// Build a fresh stage instance for `name`, or `None` if unregistered.
    pub fn create_stage(&self, name: &str) -> Option<Arc<dyn PipelineStage>> {
        self.creators.get(name).map(|creator| creator())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PipelineValue;
    use async_trait::async_trait;
    use weave_core::error::PipelineError;

    struct NoopStage;

    #[async_trait]
    impl PipelineStage for NoopStage {
        fn input_tag(&self) -> &'static str {
            "text"
        }
        fn output_tag(&self) -> &'static str {
            "text"
        }
        async fn process_one(&self, input: PipelineValue) -> Result<PipelineValue, PipelineError> {
            Ok(input)
        }
    }

    #[test]
    fn create_stage_returns_none_for_unregistered_name() {
        let factory = PipelineFactory::new();
        assert!(factory.create_stage("nope").is_none());
    }

    #[test]
    fn register_and_create_stage() {
        let mut factory = PipelineFactory::new();
        factory.register_stage("noop", || Arc::new(NoopStage));
        let stage = factory.create_stage("noop").unwrap();
        assert_eq!(stage.input_tag(), "text");
    }

    #[test]
    fn create_stage_builds_a_fresh_instance_each_time() {
        let mut factory = PipelineFactory::new();
        let count = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let count_clone = count.clone();
        factory.register_stage("noop", move || {
            count_clone.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Arc::new(NoopStage)
        });
        factory.create_stage("noop");
        factory.create_stage("noop");
        assert_eq!(count.load(std::sync::atomic::Ordering::SeqCst), 2);
    }
}
