//! Runs one flow invocation against the model.
//!
//! Every invocation walks `Validating -> Invoking -> ValidatingOutput -> Done`
//! and leaves through `Failed` on the first error. There are no retries: each
//! model round trip happens exactly once, and tool-free flows make exactly one
//! model call.

use crate::flow::{Flow, FlowPlan, OutputMode, RawOutput, ToolTrace};
use campus_core::{
    CampusError, Content, DEFAULT_MAX_TURNS, Llm, LlmRequest, LlmResponse, Part, Result, Role,
    trim_turns,
};
use campus_tool::ToolRegistry;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span, warn};

pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Validating,
    Invoking,
    ValidatingOutput,
    Done,
    Failed,
}

impl std::fmt::Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FlowState::Validating => "validating",
            FlowState::Invoking => "invoking",
            FlowState::ValidatingOutput => "validating_output",
            FlowState::Done => "done",
            FlowState::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Clone)]
pub struct FlowExecutor {
    model: Arc<dyn Llm>,
    tools: Arc<ToolRegistry>,
    max_tool_rounds: usize,
    history_limit: usize,
}

impl FlowExecutor {
    pub fn new(model: Arc<dyn Llm>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            model,
            tools,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            history_limit: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn with_history_limit(mut self, turns: usize) -> Self {
        self.history_limit = turns.max(1);
        self
    }

    pub fn max_tool_rounds(&self) -> usize {
        self.max_tool_rounds
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Validate `input`, call the model, and return the validated output.
    pub async fn run(&self, flow: &dyn Flow, input: Value) -> Result<Value> {
        let span = info_span!("flow", flow.name = %flow.name());
        async move {
            info!("flow started");
            match self.run_inner(flow, input).await {
                Ok(output) => {
                    debug!(state = %FlowState::Done, "state transition");
                    info!("flow finished");
                    Ok(output)
                }
                Err(e) => {
                    debug!(state = %FlowState::Failed, "state transition");
                    warn!(kind = %e.kind(), error = %e, "flow failed");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run_inner(&self, flow: &dyn Flow, input: Value) -> Result<Value> {
        debug!(state = %FlowState::Validating, "state transition");
        let input = flow.input_schema().validate(&input).map_err(CampusError::InvalidInput)?;

        debug!(state = %FlowState::Invoking, "state transition");
        let plan = flow.plan(&input)?;
        let mode = plan.output.clone();
        let allowed_tools = plan.tools.clone();
        let (request, contents) = self.build_request(flow, plan)?;
        let mut trace = ToolTrace::default();
        let response = self.invoke(request, contents, &allowed_tools, &mut trace).await?;

        debug!(state = %FlowState::ValidatingOutput, "state transition");
        let raw = extract_output(&mode, &response)?;
        let output = flow.finalize(&input, raw, &trace)?;
        flow.output_schema().validate(&output).map_err(|violations| {
            warn!(?violations, "model output violates output schema");
            CampusError::MalformedModelOutput {
                message: "model output does not match the output schema".to_string(),
                violations,
            }
        })
    }

    fn build_request(&self, flow: &dyn Flow, plan: FlowPlan) -> Result<(LlmRequest, Vec<Content>)> {
        let FlowPlan { system_instruction, prompt, mut history, tools, output, model } = plan;

        trim_turns(&mut history, self.history_limit);
        let mut contents: Vec<Content> = history.iter().map(Content::from).collect();
        contents.push(Content::user(prompt));

        let declarations = self.tools.declarations(tools.as_slice())?;
        let mut system_instruction = system_instruction;
        let mut request = LlmRequest::default().with_tools(declarations);

        match output {
            OutputMode::Structured if tools.is_empty() => {
                request = request.with_response_schema(flow.output_schema().to_model_schema());
            }
            OutputMode::Structured => {
                // JSON mode cannot be combined with function calling; ask in the prompt instead.
                let schema = flow.output_schema().to_model_schema();
                let note = format!("Respond only with a JSON object matching this schema: {schema}");
                system_instruction = Some(match system_instruction {
                    Some(s) => format!("{s}\n\n{note}"),
                    None => note,
                });
            }
            OutputMode::Audio { voice } => request = request.with_audio_response(voice),
            OutputMode::Text { .. } => {}
        }

        if let Some(s) = system_instruction {
            request = request.with_system_instruction(s);
        }
        if let Some(m) = model {
            request = request.with_model(m);
        }
        Ok((request, contents))
    }

    async fn invoke(
        &self,
        request: LlmRequest,
        mut contents: Vec<Content>,
        allowed_tools: &[String],
        trace: &mut ToolTrace,
    ) -> Result<LlmResponse> {
        let mut round = 0;
        loop {
            let req = LlmRequest { contents: contents.clone(), ..request.clone() };
            let response = self.model.generate_content(req).await?;

            let calls: Vec<(String, Value)> = response
                .function_calls()
                .into_iter()
                .map(|(name, args)| (name.to_string(), args.clone()))
                .collect();
            if calls.is_empty() {
                return Ok(response);
            }
            if round == self.max_tool_rounds {
                return Err(CampusError::ToolRoundsExceeded(self.max_tool_rounds));
            }
            round += 1;
            debug!(round, calls = calls.len(), "dispatching tool calls");

            if let Some(content) = response.content {
                contents.push(content);
            }

            let mut replies = Content::new(Role::User);
            for (name, args) in calls {
                if !allowed_tools.iter().any(|t| *t == name) {
                    return Err(CampusError::malformed(format!("model called undeclared tool '{name}'")));
                }
                let outcome = self.tools.invoke(&name, &args).await.map_err(|e| match e {
                    CampusError::InvalidInput(violations) => CampusError::MalformedModelOutput {
                        message: format!("model sent invalid arguments to '{name}'"),
                        violations,
                    },
                    other => other,
                })?;
                debug!(tool = %name, found = outcome.found().is_some(), "tool call finished");
                replies = replies.with_part(Part::function_response(&name, outcome.to_response()));
                trace.record(name, args, outcome);
            }
            contents.push(replies);
        }
    }
}

fn extract_output(mode: &OutputMode, response: &LlmResponse) -> Result<RawOutput> {
    match mode {
        OutputMode::Text { field } => {
            let text = non_empty_text(response)?;
            let mut object = Map::new();
            object.insert(field.to_string(), Value::String(text));
            Ok(RawOutput::Json(Value::Object(object)))
        }
        OutputMode::Structured => {
            let text = non_empty_text(response)?;
            let value: Value = serde_json::from_str(strip_code_fence(&text))
                .map_err(|e| CampusError::malformed(format!("model output is not valid JSON: {e}")))?;
            Ok(RawOutput::Json(value))
        }
        OutputMode::Audio { .. } => response
            .inline_data()
            .map(|(mime_type, data)| RawOutput::Audio {
                mime_type: mime_type.to_string(),
                data: data.to_vec(),
            })
            .ok_or_else(|| CampusError::malformed("model returned no audio")),
    }
}

fn non_empty_text(response: &LlmResponse) -> Result<String> {
    response
        .text()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| CampusError::malformed("model returned no text"))
}

/// Models sometimes wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}
