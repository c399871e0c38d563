//! Cross-crate integration tests, composed entirely through `weave`'s
//! public surface rather than any single component's internals.

use std::collections::HashMap;
use std::sync::Arc;

use weave::prelude::*;
use weave_core::test_utils::{text_response, InMemoryFileReader, InMemoryVectorStore, MockCodeExecutor, MockLlmClient, MockUserIo};

fn test_tools() -> ToolContext {
    ToolContext::new(
        Arc::new(InMemoryFileReader::new()),
        Arc::new(MockCodeExecutor::new("", "")),
        Arc::new(MockUserIo::new(vec![])),
    )
}

fn registry_with_builtins() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry);
    registry
}

// A root instruction delegates to the memory tool, then returns. The note
// it files is visible through the tool context's shared short-term memory
// after the run completes, and the rendered system prompt along the way
// reflects it.
#[tokio::test]
async fn agent_run_files_a_memory_note_through_a_native_tool() {
    let llm = Arc::new(MockLlmClient::new(
        vec![
            text_response(
                "Filing a note.\n```json\n{\"name\": \"memory\", \"keyword\": \"greeting\", \
                 \"content\": \"hello world\", \"description\": \"first greeting seen\"}\n```",
            ),
            text_response("Noted.<<RETURN>>"),
        ],
        vec![],
    ));

    let tool_ctx = test_tools();
    let mut exec = AgentExecutor::new(llm, tool_ctx.clone(), RunConfig::default());
    exec.init_native_tools(registry_with_builtins());

    let mut root = Instruction::new("root", "Remember greetings the user sends.");
    root.use_labels = vec!["memory".to_string()];
    let mut instructions = HashMap::new();
    instructions.insert("root".to_string(), root);
    exec.init_agent(instructions).await.unwrap();

    let output = exec.run("root", "hi there").await.unwrap();

    assert_eq!(output, "Noted.");
    assert_eq!(exec.call_stack(), &["root".to_string()]);

    let memory = tool_ctx.short_term_memory.lock().unwrap();
    let notes = memory.notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].keyword, "greeting");
    assert_eq!(notes[0].content, "hello world");
}

// A source file is read by a pipeline's first stage, chunked by the second,
// then embedded and written through a Memory Controller — the same chunk
// sequence a chunker produces standalone round-trips into retrievable rows.
#[tokio::test]
async fn pipeline_output_feeds_directly_into_the_memory_controller() {
    let reader = Arc::new(InMemoryFileReader::new());
    reader.write("note.txt", "Alpha one. Alpha two. Alpha three.").await.unwrap();

    let mut factory = PipelineFactory::new();
    let reader_for_stage = reader.clone();
    factory.register_stage("file_reader_to_text", move || {
        Arc::new(FileReaderToText::new(reader_for_stage.clone())) as Arc<dyn PipelineStage>
    });
    factory.register_stage("text_to_chunks", || {
        Arc::new(TextToChunks::new(Arc::new(SentenceChunker::new(2)))) as Arc<dyn PipelineStage>
    });

    let pipeline = Pipeline::new(Arc::new(factory))
        .stage("file_reader_to_text")
        .stage("text_to_chunks");

    let result = pipeline
        .execute(PipelineValue::Path("note.txt".to_string()))
        .await
        .unwrap();
    let PipelineValue::Chunks(chunks) = result else {
        panic!("expected chunked output");
    };
    assert_eq!(chunks, vec!["Alpha one.Alpha two.", "Alpha three."]);

    let llm = Arc::new(MockLlmClient::new(vec![], vec![1.0; EmbeddingModel::Small.dimension()]));
    let store = Arc::new(InMemoryVectorStore::new());
    store.create_collection("notes", EmbeddingModel::Small).await.unwrap();
    let memory = MemoryController::new(llm, store.clone(), EmbeddingModel::Small);

    memory.process_chunks(chunks, Some("note.txt".to_string()), None);
    let failed = memory.write_chunks("notes", None).await.unwrap();

    assert!(failed.is_empty());
    assert_eq!(store.rows_in("notes").len(), 2);
}

// Parsing an agent file end to end: directives resolve, `use` labels
// resolve against the native tool catalogue, and the run reaches the
// return token without the caller ever touching a private field.
#[tokio::test]
async fn parsed_agent_file_drives_a_tool_call_to_completion() {
    let source = "\
# root
## use: read_file
Read whatever file the user names and report its contents.
";
    let parsed = parse_str(source).unwrap();
    assert!(parsed.instructions.contains_key("root"));
    assert_eq!(parsed.instructions["root"].use_labels, vec!["read_file".to_string()]);

    let reader = Arc::new(InMemoryFileReader::new());
    reader.write("greeting.txt", "hello from disk").await.unwrap();
    let tool_ctx = ToolContext::new(reader, Arc::new(MockCodeExecutor::new("", "")), Arc::new(MockUserIo::new(vec![])));

    let llm = Arc::new(MockLlmClient::new(
        vec![
            text_response("```json\n{\"name\": \"read_file\", \"file_path\": \"greeting.txt\"}\n```"),
            text_response("The file says: hello from disk<<RETURN>>"),
        ],
        vec![],
    ));

    let mut exec = AgentExecutor::new(llm, tool_ctx, RunConfig::default());
    exec.init_native_tools(registry_with_builtins());
    exec.init_agent(parsed.instructions).await.unwrap();

    let output = exec.run("root", "read greeting.txt").await.unwrap();
    assert_eq!(output, "The file says: hello from disk");
}
