//! Concrete stages shipped with this workspace.

use std::sync::Arc;

use async_trait::async_trait;
use weave_chunker::Chunker;
use weave_core::error::PipelineError;
use weave_core::file::FileReader;

use crate::stage::PipelineStage;
use crate::value::PipelineValue;

/// `Path -> Text`: decode a file's contents through a [`FileReader`].
pub struct FileReaderToText {
    reader: Arc<dyn FileReader>,
}

impl FileReaderToText {
    /// Build a stage backed by `reader`.
    pub fn new(reader: Arc<dyn FileReader>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl PipelineStage for FileReaderToText {
    fn input_tag(&self) -> &'static str {
        "path"
    }
    fn output_tag(&self) -> &'static str {
        "text"
    }

    async fn process_one(&self, input: PipelineValue) -> Result<PipelineValue, PipelineError> {
        let path = match input {
            PipelineValue::Path(path) => path,
            other => return unexpected(self, &other),
        };
        let text = self
            .reader
            .read(&path)
            .await
            .map_err(|err| PipelineError::Other(Box::new(err)))?;
        Ok(PipelineValue::Text(text))
    }
}

/// `Text -> Chunks`: split text through a [`Chunker`] policy.
pub struct TextToChunks {
    chunker: Arc<dyn Chunker>,
}

impl TextToChunks {
    /// Build a stage backed by `chunker`.
    pub fn new(chunker: Arc<dyn Chunker>) -> Self {
        Self { chunker }
    }
}

#[async_trait]
impl PipelineStage for TextToChunks {
    fn input_tag(&self) -> &'static str {
        "text"
    }
    fn output_tag(&self) -> &'static str {
        "chunks"
    }

    async fn process_one(&self, input: PipelineValue) -> Result<PipelineValue, PipelineError> {
        let text = match input {
            PipelineValue::Text(text) => text,
            other => return unexpected(self, &other),
        };
        let chunks = self
            .chunker
            .process(&text)
            .map_err(|err| PipelineError::Other(Box::new(err)))?;
        Ok(PipelineValue::Chunks(chunks))
    }
}

fn unexpected(
    stage: &dyn PipelineStage,
    value: &PipelineValue,
) -> Result<PipelineValue, PipelineError> {
    Err(PipelineError::TypeMismatch {
        stage: stage.input_tag().to_string(),
        expected: stage.input_tag().to_string(),
        actual: value.tag().to_string(),
    })
}
