//! # weave-pipeline — linked-list data pipelines
//!
//! A [`Pipeline`] resolves a sequence of named stages through a
//! [`PipelineFactory`] and runs them in order. A [`PipelineValue::Sequence`]
//! intermediate fans a non-tail stage out across its elements, concurrently,
//! gathering results back in input order.

#![deny(missing_docs)]

mod factory;
mod pipeline;
mod stage;
mod stages;
mod value;

pub use factory::PipelineFactory;
pub use pipeline::{Pipeline, ResultHandler};
pub use stage::PipelineStage;
pub use stages::{FileReaderToText, TextToChunks};
pub use value::PipelineValue;
