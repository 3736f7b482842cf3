//! The assistant gateway: one Converse call per chat turn.
//!
//! The conversation is replayed as plain role/content turns, the context
//! bundle becomes the system instruction, and the tool catalog travels as
//! the tool configuration. The model's reply is normalized into an
//! [`AssistantEnvelope`]. There are no retries; any failure fails the turn.

use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message as ConverseMessage,
    SystemContentBlock, Tool, ToolConfiguration, ToolInputSchema, ToolSpecification,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use coffeechat_core::directory::BoxFuture;
use coffeechat_core::models::context::ContextBundle;
use coffeechat_core::models::envelope::AssistantEnvelope;
use coffeechat_core::models::message::{Message, Role};

use crate::context::system_prompt;
use crate::document::{document_to_json, json_to_document};
use crate::error::BedrockError;
use crate::tools::{ToolInvocation, catalog};

/// Reply text used when the model produced neither text nor a tool call.
pub const FILLER: &str = "I'm ready to help with your essay!";

pub const DEFAULT_MAX_TOKENS: i32 = 1000;

/// Anything that can answer a chat turn.
///
/// Methods return boxed futures for dyn compatibility.
pub trait Assistant: Send + Sync {
    fn converse<'a>(
        &'a self,
        history: &'a [Message],
        context: &'a ContextBundle,
    ) -> BoxFuture<'a, Result<AssistantEnvelope, BedrockError>>;
}

/// One block of model output, independent of the SDK types.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationBlock {
    Text(String),
    ToolUse { name: String, input: Value },
}

/// A role/content pair as sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Flatten chat history into turns the Converse API accepts.
///
/// The conversation must open with a user turn and alternate roles, so
/// leading assistant turns are dropped, blank messages are skipped, and
/// consecutive turns from the same role are merged. Message text is sent
/// unchanged and attachments are never replayed.
pub fn serialize_history(history: &[Message]) -> Vec<Turn> {
    let mut turns: Vec<Turn> = Vec::new();
    for message in history {
        let content = message.content.as_str();
        if content.trim().is_empty() {
            continue;
        }
        if turns.is_empty() && message.role == Role::Assistant {
            continue;
        }
        match turns.last_mut() {
            Some(last) if last.role == message.role => {
                last.content.push_str("\n\n");
                last.content.push_str(content);
            }
            _ => turns.push(Turn {
                role: message.role,
                content: content.to_string(),
            }),
        }
    }
    turns
}

fn append_sentence(text: &mut String, sentence: &str) {
    if !text.is_empty() && !text.ends_with(char::is_whitespace) {
        text.push(' ');
    }
    text.push_str(sentence);
}

/// Fold model output into an envelope.
///
/// Text blocks are concatenated in order. Each tool call is validated and
/// fills its attachment slot, later calls of the same kind replacing
/// earlier ones, and appends its confirmation sentence to the text.
pub fn normalize(
    blocks: Vec<GenerationBlock>,
    context: &ContextBundle,
) -> Result<AssistantEnvelope, BedrockError> {
    let mut envelope = AssistantEnvelope::default();

    for block in blocks {
        match block {
            GenerationBlock::Text(text) => envelope.response_text.push_str(&text),
            GenerationBlock::ToolUse { name, input } => {
                let call = ToolInvocation::parse(&name, input)?;
                debug!(tool = call.name(), "tool call");
                append_sentence(&mut envelope.response_text, &call.confirmation());
                envelope.set_attachment(call.into_attachment(context));
            }
        }
    }

    if envelope.response_text.is_empty() {
        envelope.response_text = FILLER.to_string();
    }
    Ok(envelope)
}

/// Bedrock Converse implementation of [`Assistant`].
#[derive(Clone)]
pub struct BedrockGateway {
    client: aws_sdk_bedrockruntime::Client,
    model_id: String,
    max_tokens: i32,
}

impl BedrockGateway {
    pub fn new(client: aws_sdk_bedrockruntime::Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: i32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn invoke(
        &self,
        history: &[Message],
        context: &ContextBundle,
    ) -> Result<AssistantEnvelope, BedrockError> {
        let turns = serialize_history(history);
        if turns.is_empty() {
            return Err(BedrockError::Invocation(
                "conversation has no user turn".to_string(),
            ));
        }

        let messages = turns
            .into_iter()
            .map(|turn| {
                let role = match turn.role {
                    Role::User => ConversationRole::User,
                    Role::Assistant => ConversationRole::Assistant,
                };
                ConverseMessage::builder()
                    .role(role)
                    .content(ContentBlock::Text(turn.content))
                    .build()
                    .map_err(|e| BedrockError::Invocation(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            model_id = %self.model_id,
            turns = messages.len(),
            "invoking assistant"
        );

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(system_prompt(context)))
            .set_messages(Some(messages))
            .tool_config(tool_configuration()?)
            .inference_config(
                InferenceConfiguration::builder()
                    .max_tokens(self.max_tokens)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let blocks: Vec<GenerationBlock> = output_message
            .content()
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text(text) => Some(GenerationBlock::Text(text.clone())),
                ContentBlock::ToolUse(tool_use) => Some(GenerationBlock::ToolUse {
                    name: tool_use.name().to_string(),
                    input: document_to_json(tool_use.input()),
                }),
                _ => {
                    warn!("ignoring unsupported content block");
                    None
                }
            })
            .collect();

        info!(
            model_id = %self.model_id,
            stop_reason = response.stop_reason().as_str(),
            blocks = blocks.len(),
            "assistant replied"
        );

        normalize(blocks, context)
    }
}

impl Assistant for BedrockGateway {
    fn converse<'a>(
        &'a self,
        history: &'a [Message],
        context: &'a ContextBundle,
    ) -> BoxFuture<'a, Result<AssistantEnvelope, BedrockError>> {
        Box::pin(self.invoke(history, context))
    }
}

/// The tool catalog in Converse form.
pub fn tool_configuration() -> Result<ToolConfiguration, BedrockError> {
    let mut config = ToolConfiguration::builder();
    for tool in catalog() {
        let spec = ToolSpecification::builder()
            .name(tool.name)
            .description(tool.description)
            .input_schema(ToolInputSchema::Json(json_to_document(&tool.input_schema)))
            .build()
            .map_err(|e| BedrockError::Config(e.to_string()))?;
        config = config.tools(Tool::ToolSpec(spec));
    }
    config
        .build()
        .map_err(|e| BedrockError::Config(e.to_string()))
}
