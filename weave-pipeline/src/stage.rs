//! [`PipelineStage`]: a single named arrow `In -> Out` over [`PipelineValue`].

use async_trait::async_trait;
use weave_core::error::PipelineError;

use crate::value::PipelineValue;

/// A single pipeline stage. Stateless beyond whatever capability it closed
/// over at construction time (a chunker, a file reader, a memory writer).
#[async_trait]
pub trait PipelineStage: Send + Sync {
    /// Tag of the [`PipelineValue`] variant this stage accepts, used for
    /// the runtime's type check before every call (and before every
    /// fanned-out element call).
    fn input_tag(&self) -> &'static str;

    /// Tag of the [`PipelineValue`] variant this stage produces.
    fn output_tag(&self) -> &'static str;

    /// Process a single input value. Called once per element during
    /// fan-out, or once against the whole value otherwise.
    async fn process_one(&self, input: PipelineValue) -> Result<PipelineValue, PipelineError>;
}
