//! [`Pipeline`]: a named-stage linked list built through a [`PipelineFactory`].

use std::sync::Arc;

use tracing::{debug, warn};
use weave_core::error::PipelineError;

use crate::factory::PipelineFactory;
use crate::stage::PipelineStage;
use crate::value::PipelineValue;

/// Callback invoked by `execute_async` with `(original_input, result)`.
pub type ResultHandler = Arc<dyn Fn(PipelineValue, Result<PipelineValue, PipelineError>) + Send + Sync>;

/// A linear chain of named stages resolved through a [`PipelineFactory`].
pub struct Pipeline {
    factory: Arc<PipelineFactory>,
    stage_names: Vec<String>,
    result_handler: Option<ResultHandler>,
}

impl Pipeline {
    /// An empty pipeline resolved against `factory`.
    pub fn new(factory: Arc<PipelineFactory>) -> Self {
        Self {
            factory,
            stage_names: Vec::new(),
            result_handler: None,
        }
    }

    /// Append a stage by name. Stage order is declared order.
    pub fn stage(mut self, name: impl Into<String>) -> Self {
        self.stage_names.push(name.into());
        self
    }

    /// Register the callback `execute_async` invokes on completion.
    pub fn result_handler_async(mut self, handler: ResultHandler) -> Self {
        self.result_handler = Some(handler);
        self
    }

    /// Run every stage in declared order. A `Sequence` intermediate fans
    /// out across a non-tail stage, one task per element, gathered back
    /// in input order; the tail stage always receives the whole value.
    pub async fn execute(&self, input: PipelineValue) -> Result<PipelineValue, PipelineError> {
        let mut intermediate = input;
        let last_index = self.stage_names.len().saturating_sub(1);

        for (index, name) in self.stage_names.iter().enumerate() {
            let stage = self
                .factory
                .create_stage(name)
                .ok_or_else(|| PipelineError::UnknownStage(name.clone()))?;
            let is_tail = index == last_index;

            intermediate = match intermediate {
                PipelineValue::Sequence(items) if !is_tail => {
                    debug!(stage = %name, count = items.len(), "fanning out over sequence");
                    run_fan_out(name, stage, items).await?
                }
                other => {
                    check_tag(name, &stage, &other)?;
                    stage.process_one(other).await?
                }
            };
        }
        Ok(intermediate)
    }

    /// Run `execute` on a background task, invoking the registered result
    /// handler (if any) with `(input, result)` on completion.
    pub fn execute_async(
        self: Arc<Self>,
        input: PipelineValue,
    ) -> tokio::task::JoinHandle<Result<PipelineValue, PipelineError>> {
        tokio::spawn(async move {
            let result = self.execute(input.clone()).await;
            if let Some(handler) = &self.result_handler {
                handler(input, result.clone());
            }
            result
        })
    }
}

fn check_tag(
    stage_name: &str,
    stage: &Arc<dyn PipelineStage>,
    value: &PipelineValue,
) -> Result<(), PipelineError> {
    if value.tag() != stage.input_tag() {
        warn!(stage = %stage_name, expected = stage.input_tag(), actual = value.tag(), "pipeline type mismatch");
        return Err(PipelineError::TypeMismatch {
            stage: stage_name.to_string(),
            expected: stage.input_tag().to_string(),
            actual: value.tag().to_string(),
        });
    }
    Ok(())
}

async fn run_fan_out(
    stage_name: &str,
    stage: Arc<dyn PipelineStage>,
    items: Vec<PipelineValue>,
) -> Result<PipelineValue, PipelineError> {
    let mut handles = Vec::with_capacity(items.len());
    for item in items {
        check_tag(stage_name, &stage, &item)?;
        let stage = stage.clone();
        handles.push(tokio::spawn(async move { stage.process_one(item).await }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle
            .await
            .map_err(|err| PipelineError::Other(Box::new(std::io::Error::other(err.to_string()))))??;
        results.push(result);
    }
    Ok(PipelineValue::Sequence(results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::{FileReaderToText, TextToChunks};
    use weave_chunker::SentenceChunker;
    use weave_core::test_utils::InMemoryFileReader;

    async fn seeded_reader(files: &[(&str, &str)]) -> Arc<InMemoryFileReader> {
        let reader = Arc::new(InMemoryFileReader::new());
        for (path, content) in files.iter().copied() {
            reader.write(path, content).await.unwrap();
        }
        reader
    }

    fn factory(reader: Arc<InMemoryFileReader>) -> Arc<PipelineFactory> {
        let mut factory = PipelineFactory::new();
        factory.register_stage("file_reader_to_text", move || {
            Arc::new(FileReaderToText::new(reader.clone())) as Arc<dyn PipelineStage>
        });
        factory.register_stage("text_to_chunks", || {
            Arc::new(TextToChunks::new(Arc::new(SentenceChunker::new(1)))) as Arc<dyn PipelineStage>
        });
        Arc::new(factory)
    }

    // S5: a sequence of file paths fanned out across both stages comes
    // back as a sequence of chunk buffers in the same order as the input.
    #[tokio::test]
    async fn fan_out_preserves_input_order_across_chained_stages() {
        let files = [
            ("a.txt", "Alpha one. Alpha two."),
            ("b.txt", "Bravo one."),
            ("c.txt", "Charlie one. Charlie two."),
            ("d.txt", "Delta one."),
        ];
        let reader = seeded_reader(&files).await;
        let pipeline = Pipeline::new(factory(reader))
            .stage("file_reader_to_text")
            .stage("text_to_chunks");

        let input = PipelineValue::Sequence(
            files.iter().map(|(path, _)| PipelineValue::Path(path.to_string())).collect(),
        );
        let result = pipeline.execute(input).await.unwrap();

        let PipelineValue::Sequence(items) = result else {
            panic!("expected a sequence");
        };
        assert_eq!(
            items,
            vec![
                PipelineValue::Chunks(vec!["Alpha one.".to_string(), "Alpha two.".to_string()]),
                PipelineValue::Chunks(vec!["Bravo one.".to_string()]),
                PipelineValue::Chunks(vec!["Charlie one.".to_string(), "Charlie two.".to_string()]),
                PipelineValue::Chunks(vec!["Delta one.".to_string()]),
            ]
        );
    }

    // The tail stage never fans out, even over a Sequence — it receives
    // the whole value and is responsible for handling it.
    #[tokio::test]
    async fn unknown_stage_name_is_an_error() {
        let reader = Arc::new(InMemoryFileReader::new());
        let pipeline = Pipeline::new(factory(reader)).stage("does_not_exist");
        let err = pipeline.execute(PipelineValue::Unit).await.unwrap_err();
        assert!(matches!(err, PipelineError::UnknownStage(name) if name == "does_not_exist"));
    }

    #[tokio::test]
    async fn execute_async_invokes_result_handler_with_input_and_result() {
        let reader = Arc::new(InMemoryFileReader::new());
        reader.write("a.txt", "Hi.").await.unwrap();
        let seen = Arc::new(std::sync::Mutex::new(None));
        let seen_clone = seen.clone();
        let pipeline = Arc::new(
            Pipeline::new(factory(reader))
                .stage("file_reader_to_text")
                .result_handler_async(Arc::new(move |input, result| {
                    *seen_clone.lock().unwrap() = Some((input, result));
                })),
        );

        let input = PipelineValue::Path("a.txt".to_string());
        pipeline.execute_async(input.clone()).await.unwrap().unwrap();

        let (seen_input, seen_result) = seen.lock().unwrap().take().unwrap();
        assert_eq!(seen_input, input);
        assert_eq!(seen_result.unwrap(), PipelineValue::Text("Hi.".to_string()));
    }
}
