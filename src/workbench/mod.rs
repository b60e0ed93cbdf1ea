// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Orchestration layer
//!
//! Binds each user-facing operation to the sequence: credential lookup,
//! adapter selection, stream consumption, and either incremental display
//! (submit) or buffered parse-and-replace (meta-operations). The workbench
//! is the sole writer of the block list during meta-operations; manual
//! edits patch single fields by id.
//!
//! At most one operation runs at a time. The busy flag is checked at the
//! start of every operation and cleared on every exit path - success,
//! parse failure, or error - and each invocation sets at most one
//! user-visible error message, overwriting any stale one.

pub mod prompts;

use tracing::{debug, error};

use futures_util::StreamExt;

use crate::blocks::{format, parser, serialize_blocks, PromptBlock};
use crate::config::{Limits, ModelConfig};
use crate::error::{PrompterError, Result};
use crate::llm::provider::{missing_api_key_error, Provider, StreamAdapter};
use crate::llm::providers::{GeminiAdapter, OpenAiAdapter, OpenRouterAdapter};
use crate::llm::validator::KeyValidator;
use crate::session::{ApiKeys, KeyTestStatus, KeyTestStatuses, MemoryStorage, SessionStorage};

use prompts::TranslateTarget;

const IMPROVE_PARSE_FAILURE: &str =
    "The AI returned an empty suggestion or an invalid format. Please try again.";
const CREATE_AGENT_PARSE_FAILURE: &str =
    "The AI could not generate the agent or returned an invalid format. Try describing your idea differently.";
const REFINE_PARSE_FAILURE: &str =
    "The AI could not refine the agent or returned an invalid format. Try describing your observation differently.";
const TRANSLATE_PARSE_FAILURE: &str =
    "The AI could not translate the prompt or returned an invalid format.";

/// The user-triggered operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Submit,
    Improve,
    CreateAgent,
    RefineAgent,
    Translate,
    Reformat,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Submit => "submit",
            Operation::Improve => "suggest improvement",
            Operation::CreateAgent => "create agent",
            Operation::RefineAgent => "refine agent",
            Operation::Translate => "translate",
            Operation::Reformat => "reformat",
        };
        f.write_str(name)
    }
}

/// How a meta-operation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaOutcome {
    /// The response parsed; the block list was replaced wholesale
    Replaced,
    /// The response had no block boundaries; existing blocks are untouched
    ParseFailed,
}

/// Which block field a manual edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockField {
    Title,
    Content,
}

/// Direction for manual block reordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// The prompt-engineering workbench session
pub struct Workbench {
    config: ModelConfig,
    use_custom_model: bool,
    blocks: Vec<PromptBlock>,
    user_prompt: String,
    output: String,
    last_error: Option<String>,
    busy: Option<Operation>,
    keys: ApiKeys,
    storage: Box<dyn SessionStorage>,
    key_tests: KeyTestStatuses,
    limits: Limits,
    gemini: GeminiAdapter,
    openai: OpenAiAdapter,
    openrouter: OpenRouterAdapter,
    validator: KeyValidator,
}

impl Workbench {
    /// Workbench backed by in-memory session storage
    pub fn new() -> Self {
        Self::with_storage(Box::new(MemoryStorage::new()))
    }

    /// Workbench over explicit session storage; loads saved credentials
    pub fn with_storage(storage: Box<dyn SessionStorage>) -> Self {
        let keys = ApiKeys::load(storage.as_ref());
        Self {
            config: ModelConfig::default(),
            use_custom_model: false,
            blocks: Vec::new(),
            user_prompt: String::new(),
            output: String::new(),
            last_error: None,
            busy: None,
            keys,
            storage,
            key_tests: KeyTestStatuses::default(),
            limits: Limits::from_env(),
            gemini: GeminiAdapter::new(),
            openai: OpenAiAdapter::new(),
            openrouter: OpenRouterAdapter::new(),
            validator: KeyValidator::new(),
        }
    }

    // ---- State accessors ----

    pub fn blocks(&self) -> &[PromptBlock] {
        &self.blocks
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_some()
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn key_test_status(&self, provider: Provider) -> &KeyTestStatus {
        self.key_tests.get(provider)
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    // ---- Configuration ----

    /// Switch provider. Resets the model to the provider's first default
    /// unless the user opted into a free-text custom model name.
    pub fn set_provider(&mut self, provider: Provider) {
        self.config.provider = provider;
        if !self.use_custom_model {
            self.config.model = provider.default_model().to_string();
        }
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.config.model = model.into();
    }

    /// Opt in or out of keeping a custom model name across provider changes
    pub fn set_use_custom_model(&mut self, enabled: bool) {
        self.use_custom_model = enabled;
        if !enabled {
            self.config.model = self.config.provider.default_model().to_string();
        }
    }

    pub fn set_temperature(&mut self, temperature: f32) {
        self.config.temperature = temperature;
    }

    pub fn set_top_p(&mut self, top_p: f32) {
        self.config.top_p = top_p;
    }

    pub fn set_user_prompt(&mut self, prompt: impl Into<String>) {
        self.user_prompt = prompt.into();
    }

    // ---- Credentials ----

    /// Save a credential and write the set back to session storage
    pub fn save_api_key(&mut self, provider: Provider, key: impl Into<String>) -> Result<()> {
        self.keys.set(provider, key);
        self.keys.save(self.storage.as_mut())
    }

    /// Test a credential. Independent of other providers' test status and
    /// of any running operation; an empty key fails without a network call.
    pub async fn test_key(&mut self, provider: Provider, key: &str) {
        if key.trim().is_empty() {
            self.key_tests
                .set(provider, KeyTestStatus::error("The key cannot be empty."));
            return;
        }
        self.key_tests.set(provider, KeyTestStatus::testing());
        let status = self.validator.validate(provider, key.trim()).await;
        self.key_tests.set(provider, status);
    }

    // ---- Manual block editing ----

    /// Append an empty block, enforcing the configured block cap
    pub fn add_block(&mut self) -> Result<()> {
        if self.blocks.len() >= self.limits.max_blocks {
            return Err(PrompterError::Config(format!(
                "Cannot add more than {} blocks",
                self.limits.max_blocks
            )));
        }
        self.blocks.push(PromptBlock::new("# NEW_BLOCK", ""));
        Ok(())
    }

    /// Replace the whole block list (editor import, external load)
    pub fn set_blocks(&mut self, blocks: Vec<PromptBlock>) {
        self.blocks = blocks;
    }

    /// Patch a single field of one block by id
    pub fn update_block(&mut self, id: &str, field: BlockField, value: impl Into<String>) {
        if let Some(block) = self.blocks.iter_mut().find(|b| b.id == id) {
            match field {
                BlockField::Title => block.title = value.into(),
                BlockField::Content => block.content = value.into(),
            }
        }
    }

    pub fn remove_block(&mut self, id: &str) {
        self.blocks.retain(|b| b.id != id);
    }

    /// Move a block one position up or down; a move past either end is a no-op
    pub fn move_block(&mut self, id: &str, direction: MoveDirection) {
        let Some(index) = self.blocks.iter().position(|b| b.id == id) else {
            return;
        };
        match direction {
            MoveDirection::Up if index > 0 => self.blocks.swap(index, index - 1),
            MoveDirection::Down if index + 1 < self.blocks.len() => {
                self.blocks.swap(index, index + 1)
            }
            _ => {}
        }
    }

    // ---- Format-only operations (pure, synchronous, no network) ----

    pub fn convert_to_markdown(&mut self) -> Result<()> {
        self.begin(Operation::Reformat)?;
        self.blocks = format::to_markdown(&self.blocks);
        self.busy = None;
        Ok(())
    }

    pub fn convert_to_xml(&mut self) -> Result<()> {
        self.begin(Operation::Reformat)?;
        self.blocks = format::to_xml(&self.blocks);
        self.busy = None;
        Ok(())
    }

    // ---- LLM operations ----

    /// Stream a completion for the composed prompt, appending each fragment
    /// to the visible output and the caller's sink as it arrives.
    pub async fn submit(&mut self, mut on_fragment: impl FnMut(&str) + Send) -> Result<()> {
        self.begin(Operation::Submit)?;
        self.output.clear();

        let result = self.run_submit(&mut on_fragment).await;

        self.busy = None;
        if let Err(e) = &result {
            error!(operation = %Operation::Submit, "operation failed: {e}");
            self.last_error = Some(e.to_string());
        }
        result
    }

    async fn run_submit(&mut self, on_fragment: &mut (impl FnMut(&str) + Send)) -> Result<()> {
        let system_instruction = serialize_blocks(&self.blocks);
        if system_instruction.len() > self.limits.max_prompt_length {
            return Err(PrompterError::Config(format!(
                "System prompt exceeds the maximum length of {} characters",
                self.limits.max_prompt_length
            )));
        }
        self.config.validate()?;

        let api_key = self.resolve_api_key()?;
        let user_prompt = self.user_prompt.clone();

        let mut stream = self
            .adapter(self.config.provider)
            .stream(&system_instruction, &user_prompt, &self.config, &api_key)
            .await?;

        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            self.output.push_str(&fragment);
            on_fragment(&fragment);
        }
        Ok(())
    }

    /// Ask the model for an improved version of the current system prompt
    pub async fn suggest_improvement(&mut self) -> Result<MetaOutcome> {
        self.begin(Operation::Improve)?;

        let system_instruction = prompts::IMPROVE_SYSTEM_INSTRUCTION.to_string();
        let user_prompt =
            prompts::improve_user_prompt(&serialize_blocks(&self.blocks), &self.user_prompt);
        let config = ModelConfig::meta(self.config.provider, 0.5);

        let result = self
            .run_meta(Operation::Improve, system_instruction, user_prompt, config)
            .await;
        self.finish_meta(result, IMPROVE_PARSE_FAILURE)
    }

    /// Build a brand-new agent from a free-form description
    pub async fn create_agent(&mut self, description: &str) -> Result<MetaOutcome> {
        self.begin(Operation::CreateAgent)?;

        let system_instruction = prompts::META_SYSTEM_INSTRUCTION.to_string();
        let user_prompt = prompts::create_agent_user_prompt(description);
        let config = ModelConfig::meta(self.config.provider, 0.6);

        let result = self
            .run_meta(
                Operation::CreateAgent,
                system_instruction,
                user_prompt,
                config,
            )
            .await;
        self.finish_meta(result, CREATE_AGENT_PARSE_FAILURE)
    }

    /// Refine the current agent based on a user observation
    pub async fn refine_agent(&mut self, observation: &str) -> Result<MetaOutcome> {
        self.begin(Operation::RefineAgent)?;

        let system_instruction = prompts::META_SYSTEM_INSTRUCTION.to_string();
        let user_prompt =
            prompts::refine_agent_user_prompt(&serialize_blocks(&self.blocks), observation);
        let config = ModelConfig::meta(self.config.provider, 0.6);

        let result = self
            .run_meta(
                Operation::RefineAgent,
                system_instruction,
                user_prompt,
                config,
            )
            .await;
        self.finish_meta(result, REFINE_PARSE_FAILURE)
    }

    /// Translate the current system prompt, keeping the block structure.
    /// Uses the currently configured model and sampling unchanged.
    pub async fn translate(&mut self, target: TranslateTarget) -> Result<MetaOutcome> {
        self.begin(Operation::Translate)?;

        let system_instruction = target.instruction().to_string();
        let user_prompt = target.user_prompt(&serialize_blocks(&self.blocks));
        let config = self.config.clone();

        let result = self
            .run_meta(Operation::Translate, system_instruction, user_prompt, config)
            .await;
        self.finish_meta(result, TRANSLATE_PARSE_FAILURE)
    }

    // ---- Shared operation plumbing ----

    /// Reject a second operation while one is in flight, then mark busy.
    /// A rejection leaves all state untouched, including the running
    /// operation's error slot.
    fn begin(&mut self, operation: Operation) -> Result<()> {
        if let Some(running) = self.busy {
            return Err(PrompterError::Session(format!(
                "Cannot start {operation}: {running} is still running"
            )));
        }
        self.busy = Some(operation);
        self.last_error = None;
        Ok(())
    }

    fn finish_meta(
        &mut self,
        result: Result<MetaOutcome>,
        parse_failure_message: &str,
    ) -> Result<MetaOutcome> {
        self.busy = None;
        match &result {
            Ok(MetaOutcome::Replaced) => {}
            Ok(MetaOutcome::ParseFailed) => {
                self.last_error = Some(parse_failure_message.to_string());
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
            }
        }
        result
    }

    /// Common meta-operation body: resolve credential, stream, drain,
    /// reconcile. The accumulated text is parsed only once complete.
    async fn run_meta(
        &mut self,
        operation: Operation,
        system_instruction: String,
        user_prompt: String,
        config: ModelConfig,
    ) -> Result<MetaOutcome> {
        let api_key = self.resolve_api_key()?;

        debug!(operation = %operation, provider = %config.provider, model = %config.model,
               "starting meta-operation");

        let mut stream = self
            .adapter(config.provider)
            .stream(&system_instruction, &user_prompt, &config, &api_key)
            .await?;

        let mut accumulated = String::new();
        while let Some(fragment) = stream.next().await {
            accumulated.push_str(&fragment?);
        }

        match parser::parse_blocks(&accumulated) {
            Some(new_blocks) => {
                debug!(operation = %operation, blocks = new_blocks.len(),
                       "meta-operation replaced block list");
                self.blocks = new_blocks;
                Ok(MetaOutcome::Replaced)
            }
            None => Ok(MetaOutcome::ParseFailed),
        }
    }

    fn resolve_api_key(&self) -> Result<String> {
        match self.keys.get(self.config.provider) {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => Err(missing_api_key_error(self.config.provider)),
        }
    }

    /// Adapter for a provider. The match is exhaustive over the enum, so a
    /// provider with no adapter cannot exist at runtime.
    fn adapter(&self, provider: Provider) -> &dyn StreamAdapter {
        match provider {
            Provider::GoogleGemini => &self.gemini,
            Provider::OpenAI => &self.openai,
            Provider::OpenRouter => &self.openrouter,
        }
    }
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bench_with_blocks() -> Workbench {
        let mut bench = Workbench::new();
        bench.set_blocks(vec![
            PromptBlock::new("# ROLE", "Be helpful."),
            PromptBlock::new("# RULES", "Be brief."),
        ]);
        bench
    }

    #[test]
    fn test_set_provider_resets_model() {
        let mut bench = Workbench::new();
        bench.set_provider(Provider::OpenAI);
        assert_eq!(bench.config().model, "gpt-4o");

        bench.set_provider(Provider::OpenRouter);
        assert_eq!(bench.config().model, "anthropic/claude-3-opus");
    }

    #[test]
    fn test_custom_model_survives_provider_change() {
        let mut bench = Workbench::new();
        bench.set_use_custom_model(true);
        bench.set_model("my/fine-tune");
        bench.set_provider(Provider::OpenAI);
        assert_eq!(bench.config().model, "my/fine-tune");

        bench.set_use_custom_model(false);
        assert_eq!(bench.config().model, "gpt-4o");
    }

    #[test]
    fn test_add_block_respects_cap() {
        let mut bench = Workbench::new();
        for _ in 0..bench.limits().max_blocks {
            bench.add_block().unwrap();
        }
        assert!(bench.add_block().is_err());
        assert_eq!(bench.blocks().len(), bench.limits().max_blocks);
    }

    #[test]
    fn test_update_block_patches_single_field() {
        let mut bench = bench_with_blocks();
        let id = bench.blocks()[0].id.clone();

        bench.update_block(&id, BlockField::Title, "# PERSONA");
        assert_eq!(bench.blocks()[0].title, "# PERSONA");
        assert_eq!(bench.blocks()[0].content, "Be helpful.");

        bench.update_block(&id, BlockField::Content, "Be kind.");
        assert_eq!(bench.blocks()[0].content, "Be kind.");
    }

    #[test]
    fn test_remove_block() {
        let mut bench = bench_with_blocks();
        let id = bench.blocks()[0].id.clone();
        bench.remove_block(&id);
        assert_eq!(bench.blocks().len(), 1);
        assert_eq!(bench.blocks()[0].title, "# RULES");
    }

    #[test]
    fn test_move_block_up_and_down() {
        let mut bench = bench_with_blocks();
        let second = bench.blocks()[1].id.clone();

        bench.move_block(&second, MoveDirection::Up);
        assert_eq!(bench.blocks()[0].id, second);

        // Already at the top: no-op
        bench.move_block(&second, MoveDirection::Up);
        assert_eq!(bench.blocks()[0].id, second);

        bench.move_block(&second, MoveDirection::Down);
        assert_eq!(bench.blocks()[1].id, second);
    }

    #[test]
    fn test_format_conversions_clear_busy() {
        let mut bench = bench_with_blocks();
        bench.convert_to_markdown().unwrap();
        assert!(!bench.is_busy());
        assert_eq!(bench.blocks()[0].title, "## ROLE");

        bench.convert_to_xml().unwrap();
        assert!(!bench.is_busy());
        assert_eq!(bench.blocks()[0].title, "<title>ROLE</title>");
    }

    #[tokio::test]
    async fn test_missing_credential_fails_submit_immediately() {
        let mut bench = bench_with_blocks();
        let err = bench.submit(|_| {}).await.unwrap_err();

        assert!(matches!(err, PrompterError::Config(_)));
        assert!(!bench.is_busy());
        let message = bench.last_error().unwrap();
        assert!(message.contains("Google Gemini"));
    }

    #[tokio::test]
    async fn test_missing_credential_fails_meta_operation() {
        let mut bench = bench_with_blocks();
        let err = bench.create_agent("a pirate chatbot").await.unwrap_err();

        assert!(matches!(err, PrompterError::Config(_)));
        assert!(!bench.is_busy());
        // Blocks untouched on failure
        assert_eq!(bench.blocks().len(), 2);
    }

    #[tokio::test]
    async fn test_error_message_is_overwritten_per_invocation() {
        let mut bench = Workbench::new();
        let huge = "x".repeat(bench.limits().max_prompt_length + 1);
        bench.set_blocks(vec![PromptBlock::new("# ROLE", huge)]);
        bench.submit(|_| {}).await.unwrap_err();
        let first = bench.last_error().unwrap().to_string();
        assert!(first.contains("maximum length"));

        bench.set_blocks(vec![PromptBlock::new("# ROLE", "short")]);
        bench.submit(|_| {}).await.unwrap_err();
        let second = bench.last_error().unwrap();
        assert!(second.contains("not configured"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_save_api_key_persists_to_storage() {
        let mut storage = MemoryStorage::new();
        let mut keys = ApiKeys::default();
        keys.set(Provider::OpenAI, "sk-persisted");
        keys.save(&mut storage).unwrap();

        let bench = Workbench::with_storage(Box::new(storage));
        assert_eq!(bench.keys.get(Provider::OpenAI), Some("sk-persisted"));
    }

    #[tokio::test]
    async fn test_empty_key_test_fails_without_network() {
        let mut bench = Workbench::new();
        bench.test_key(Provider::OpenRouter, "   ").await;

        let status = bench.key_test_status(Provider::OpenRouter);
        assert_eq!(status.state, crate::session::KeyTestState::Error);
        assert_eq!(status.message, "The key cannot be empty.");
    }

    #[test]
    fn test_busy_check_rejects_second_operation() {
        let mut bench = Workbench::new();
        bench.begin(Operation::Improve).unwrap();

        let err = bench.begin(Operation::CreateAgent).unwrap_err();
        assert!(matches!(err, PrompterError::Session(_)));
        // Rejection leaves the running operation's state alone
        assert!(bench.is_busy());
    }

    #[test]
    fn test_reformat_rejected_while_busy() {
        let mut bench = bench_with_blocks();
        bench.begin(Operation::Improve).unwrap();

        assert!(bench.convert_to_markdown().is_err());
        assert_eq!(bench.blocks()[0].title, "# ROLE");
    }
}
