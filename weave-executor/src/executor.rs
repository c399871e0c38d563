//! The Agent Executor: Update-State, the main loop, JSON-call dispatch,
//! and the stop/return protocol.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use weave_core::config::RunConfig;
use weave_core::context::{Context, Role};
use weave_core::error::ExecutorError;
use weave_core::instruction::{Instruction, DEFAULT_TEMPERATURE};
use weave_core::llm::{ChatOptions, LlmClient};
use weave_core::state::{CatalogueEntry, ExecutorState};
use weave_tool::context::ToolContext;
use weave_tool::registry::ToolRegistry;

use crate::parse::{extract_named_call, strip_return_token};

/// Token accounting for a run, accumulated across every chat-completion
/// call the executor makes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    /// Sum of `completion_tokens` across every call.
    pub completion_tokens: u64,
    /// Sum of `total_tokens` across every call.
    pub total_tokens: u64,
}

/// The loop-based instruction interpreter. Holds the parsed instruction
/// table, the native tool registry, an explicit call stack of instruction
/// labels (replacing the recursive self-call this is modeled on), and one
/// working `Context` per still-live call frame.
pub struct AgentExecutor {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    tool_ctx: ToolContext,
    config: RunConfig,
    instructions: HashMap<String, Instruction>,
    native_instructions: Vec<CatalogueEntry>,
    agent_instructions: Vec<CatalogueEntry>,
    working_contexts: HashMap<String, Context>,
    current_context: Context,
    call_stack: Vec<String>,
    state: ExecutorState,
    usage: Usage,
    nlop: u64,
}

impl AgentExecutor {
    /// Build an executor with an empty instruction table and no registered
    /// tools. Call [`AgentExecutor::init_native_tools`] and
    /// [`AgentExecutor::init_agent`] before [`AgentExecutor::run`].
    pub fn new(llm: Arc<dyn LlmClient>, tool_ctx: ToolContext, config: RunConfig) -> Self {
        Self {
            llm,
            tools: ToolRegistry::new(),
            tool_ctx,
            config,
            instructions: HashMap::new(),
            native_instructions: Vec::new(),
            agent_instructions: Vec::new(),
            working_contexts: HashMap::new(),
            current_context: Context::new(),
            call_stack: Vec::new(),
            state: ExecutorState::default(),
            usage: Usage::default(),
            nlop: 0,
        }
    }

    /// Register `tools` and snapshot their catalogue entries, for `use`
    /// resolution and few-shot rendering.
    pub fn init_native_tools(&mut self, tools: ToolRegistry) {
        self.native_instructions = tools.catalogue();
        self.tools = tools;
    }

    /// Load `instructions` into the instruction table and snapshot their
    /// catalogue entries, summarizing any over-long prompt via the
    /// few-shot summarizer.
    pub async fn init_agent(&mut self, instructions: HashMap<String, Instruction>) -> Result<(), ExecutorError> {
        let mut agent_instructions = Vec::with_capacity(instructions.len());
        for instr in instructions.values() {
            let description = crate::summarizer::summarize(
                self.llm.as_ref(),
                &instr.prompt,
                self.config.few_shot_word_limit,
            )
            .await?;
            agent_instructions.push(CatalogueEntry {
                name: instr.label.clone(),
                description,
                parameters: vec![("input".to_string(), instr.input_prompt.clone())],
            });
        }
        agent_instructions.sort_by(|a, b| a.name.cmp(&b.name));

        self.agent_instructions = agent_instructions;
        self.instructions = instructions;
        Ok(())
    }

    /// Current token accounting for the run so far.
    pub fn usage(&self) -> Usage {
        self.usage
    }

    /// Number of completed loop iterations ("ops") the executor has run.
    pub fn nlop(&self) -> u64 {
        self.nlop
    }

    /// Labels of every still-live call frame, outermost first.
    pub fn call_stack(&self) -> &[String] {
        &self.call_stack
    }

    /// The saved working context for `label`, if one has been created.
    pub fn working_context(&self, label: &str) -> Option<&Context> {
        self.working_contexts.get(label)
    }

    /// The executor's current per-run state.
    pub fn state(&self) -> &ExecutorState {
        &self.state
    }

    /// Run `entry` to completion against `input`, returning the final
    /// output recorded in the executor's state.
    ///
    /// Pushes `entry` as the sole call stack frame, primes its working
    /// context with `input` as the first user message, and drives
    /// [`AgentExecutor::execute`] until the stack unwinds.
    pub async fn run(&mut self, entry: &str, input: &str) -> Result<String, ExecutorError> {
        let instr = self
            .instructions
            .get(entry)
            .cloned()
            .ok_or_else(|| ExecutorError::UnknownInstruction(entry.to_string()))?;

        self.call_stack.clear();
        self.call_stack.push(instr.label.clone());
        self.current_context = Context::new();
        self.state = ExecutorState::default();

        self.update_state(&instr)?;
        if !input.is_empty() {
            self.current_context.add_message("user", Role::User, input);
        }
        self.working_contexts.insert(instr.label.clone(), self.current_context.clone());

        self.execute().await?;
        Ok(self.state.output.clone())
    }

    /// Drive instruction steps until [`ExecutorState::should_return`] is
    /// set. An explicit loop over the call stack, standing in for the
    /// recursive self-call this is modeled on.
    async fn execute(&mut self) -> Result<(), ExecutorError> {
        loop {
            if self.state.should_return {
                return Ok(());
            }

            let label = self.state.instruction_name.clone();
            let instr = self
                .instructions
                .get(&label)
                .cloned()
                .ok_or_else(|| ExecutorError::UnknownInstruction(label.clone()))?;

            if instr.max_context > 0 {
                self.current_context.truncate_to(instr.max_context);
            }

            debug!(instruction = %instr.label, nlop = self.nlop, "executor step");

            let response = self
                .llm
                .chat_completion(&self.current_context, instr.temperature, ChatOptions::default())
                .await?;

            if let Some(usage) = &response.usage {
                self.usage.completion_tokens += usage.completion_tokens;
                self.usage.total_tokens += usage.total_tokens;
            }

            for choice in &response.choices {
                if !choice.content.is_empty() {
                    self.parse_content(choice.content.clone()).await?;
                }
            }
            self.nlop += 1;
        }
    }

    /// Extract a JSON call (if any) from `content`, dispatch it to a
    /// native tool, a nested instruction, or treat it as a plain
    /// reasoning step, then check the result for the `<<RETURN>>` token.
    async fn parse_content(&mut self, content: String) -> Result<(), ExecutorError> {
        let curr_label = self.state.instruction_name.clone();
        let curr_instr = self
            .instructions
            .get(&curr_label)
            .cloned()
            .ok_or_else(|| ExecutorError::UnknownInstruction(curr_label.clone()))?;

        let (call, truncated) = match extract_named_call(&content) {
            Some((value, truncated)) => (Some(value), truncated),
            None => (None, content.clone()),
        };
        self.state.output = truncated.clone();

        match call {
            Some(call_value) => {
                let name = call_value
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();

                if self.tools.is_registered(&name) {
                    let params = call_value.clone();
                    let tool_call = self.tools.next_call(name.clone(), params);
                    let result = self
                        .tools
                        .call(&self.tool_ctx, &tool_call)
                        .await?
                        .expect("is_registered was just checked");
                    let message = format!("Return from instruction: '{name}' with response: {result}");
                    self.current_context
                        .add_message("assistant", Role::Assistant, format!("{truncated}\n\n{message}"));
                    self.update_state(&curr_instr)?;
                } else if let Some(next_instr) = self.instructions.get(&name).cloned() {
                    if curr_instr.label != next_instr.label {
                        self.call_stack.push(next_instr.label.clone());
                    }
                    self.current_context.add_message("assistant", Role::Assistant, truncated.clone());
                    // The caller's working context is about to be swapped out from
                    // under it — persist the call marker just appended before losing
                    // the only handle to it.
                    self.working_contexts
                        .insert(curr_instr.label.clone(), self.current_context.clone());

                    self.current_context = self
                        .working_contexts
                        .get(&next_instr.label)
                        .cloned()
                        .unwrap_or_default();

                    self.update_state(&next_instr)?;

                    if let Some(input) = call_value.get("input").and_then(Value::as_str) {
                        if input != "null" && !input.is_empty() {
                            self.current_context.add_message("user", Role::User, input);
                        }
                    }
                } else {
                    let enriched = self.enrich_json_answer(&truncated).await?;
                    self.current_context
                        .add_message("assistant", Role::Assistant, enriched.clone());
                    self.state.output = enriched;
                }
            }
            None => {
                self.current_context.add_message("assistant", Role::Assistant, truncated.clone());
            }
        }

        // Whoever owns `self.current_context` at this point (the current
        // instruction for every branch but a nested-instruction switch,
        // which already updated `state.instruction_name` to the callee) is
        // named by `state.instruction_name` — persist it so a later switch
        // away, or `stop()` unwinding back to it, sees these mutations.
        self.working_contexts
            .insert(self.state.instruction_name.clone(), self.current_context.clone());

        // Strip the stop token from the externally-visible output (not the
        // stored transcript, which keeps the raw content) so a caller never
        // sees the internal control marker.
        let (stripped, found_return) = strip_return_token(&self.state.output);
        self.state.output = stripped.clone();
        if found_return {
            self.stop(&stripped)?;
        }

        Ok(())
    }

    /// Unwind one call frame: pop the current instruction, discard its
    /// working context unless `keep_context` is set, append a "return
    /// from" message onto the caller's working context (restoring its
    /// call marker first), and refresh the caller's system prompt. With
    /// only one frame left, sets [`ExecutorState::should_return`] instead.
    fn stop(&mut self, content: &str) -> Result<(), ExecutorError> {
        if self.call_stack.len() <= 1 {
            self.state.should_return = true;
            return Ok(());
        }

        let curr_label = self.call_stack.pop().ok_or(ExecutorError::EmptyCallStack)?;
        let curr_instr = self
            .instructions
            .get(&curr_label)
            .cloned()
            .ok_or_else(|| ExecutorError::UnknownInstruction(curr_label.clone()))?;
        if !curr_instr.keep_context {
            self.working_contexts.remove(&curr_label);
        }

        let prev_label = self.call_stack.last().cloned().ok_or(ExecutorError::EmptyCallStack)?;
        let prev_instr = self
            .instructions
            .get(&prev_label)
            .cloned()
            .ok_or_else(|| ExecutorError::UnknownInstruction(prev_label.clone()))?;

        if let Some(mut prev_context) = self.working_contexts.get(&prev_label).cloned() {
            let call_marker = prev_context.pop().map(|m| m.content).unwrap_or_default();
            let message = format!("Return from instruction: '{curr_label}' with response: {content}");
            prev_context.add_message("assistant", Role::Assistant, format!("{call_marker}\n\n{message}"));
            self.current_context = prev_context;
        }

        self.update_state(&prev_instr)?;
        self.working_contexts.insert(prev_label, self.current_context.clone());
        Ok(())
    }

    /// Refresh `self.state` for `instr` and re-render the system prompt
    /// into `self.current_context`. Resolves every `use` label against
    /// the native tool and agent-instruction catalogues, erroring if one
    /// names neither.
    fn update_state(&mut self, instr: &Instruction) -> Result<(), ExecutorError> {
        self.state.instruction_name = instr.label.clone();
        self.state.instruction = instr.prompt.clone();
        self.state.short_term_memory = self
            .tool_ctx
            .short_term_memory
            .lock()
            .expect("short_term_memory mutex poisoned")
            .serialize();

        let mut active = Vec::with_capacity(instr.use_labels.len());
        for label in &instr.use_labels {
            let entry = self
                .agent_instructions
                .iter()
                .chain(self.native_instructions.iter())
                .find(|entry| &entry.name == label)
                .cloned()
                .ok_or_else(|| ExecutorError::UnresolvedUse(label.clone()))?;
            active.push(entry);
        }

        let few_shot = active.iter().map(render_few_shot_block).collect::<String>();

        self.state.instruction_call_few_shot = few_shot;
        self.state.instructions = active;

        let system = weave_parser::interpolate(&self.config.system_prompt_template, &self.state.to_template_map(), "");
        self.current_context.set_system_message(system);
        Ok(())
    }

    /// Rewrite a JSON object that matched neither a tool nor an
    /// instruction name into a short plain-language answer, via a single
    /// dedicated LLM call.
    async fn enrich_json_answer(&self, content: &str) -> Result<String, ExecutorError> {
        let mut ctx = Context::new();
        ctx.add_message(
            "executor",
            Role::System,
            "The following text contains a JSON object that does not match any known \
             instruction or tool. Rewrite it as a short, plain-language answer for the user.",
        );
        ctx.add_message("executor", Role::User, content);
        let response = self
            .llm
            .chat_completion(&ctx, DEFAULT_TEMPERATURE, ChatOptions::default())
            .await?;
        Ok(response.first_content().unwrap_or_default().to_string())
    }
}

fn render_few_shot_block(entry: &CatalogueEntry) -> String {
    let mut block = format!("```json\n{{\n\t\"name\" : \"{}\"", entry.name);
    for (pname, pdesc) in &entry.parameters {
        block.push_str(&format!(",\n\t\"{pname}\" : \"{pdesc}\","));
    }
    block.push_str("\n}\n```<<CALL>>\n\n");
    block
}
