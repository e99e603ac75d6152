//! # Coach Chat
//!
//! The exchange state machine behind the AI coach, the request body sent to
//! the coach endpoint, and the system prompt the proxy puts in front of it.
//!
//! ## Exchange Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │            begin(text)          start_streaming()       complete()      │
//! │   Idle ───────────────► Sending ─────────────────► Streaming ──────► Done│
//! │    ▲                       │                          │   ▲          │  │
//! │    │                       │ fail()                   │   │ apply_   │  │
//! │    │                       ▼                  fail()  │   │ snapshot │  │
//! │    │                    Failed ◄──────────────────────┘   └──────────┘  │
//! │    │                       │                                         │  │
//! │    └───────────────────────┴──── begin(next) ◄───────────────────────┘  │
//! │                                                                         │
//! │  Committed history only ever holds COMPLETED exchanges. A failure      │
//! │  discards the pending user message and the partial assistant draft.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::summary::FinancialSummary;
use crate::types::{ChatMessage, ChatRole};
use crate::validation::validate_chat_message;

// =============================================================================
// Wire Types
// =============================================================================

/// A message as sent to the coach endpoint and the upstream model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WireMessage {
    pub role: ChatRole,
    pub content: String,
}

impl WireMessage {
    pub fn user(content: impl Into<String>) -> Self {
        WireMessage {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        WireMessage {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        WireMessage {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        WireMessage {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Aggregate snapshot the coach sees. Never individual transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialContext {
    pub monthly_income: Money,
    pub total_expenses: Money,
    pub total_savings: Money,
    pub health_score: u32,
    pub active_goals: usize,
    pub budget_categories: Vec<String>,
}

impl From<&FinancialSummary> for FinancialContext {
    fn from(summary: &FinancialSummary) -> Self {
        FinancialContext {
            monthly_income: summary.monthly_income,
            total_expenses: summary.total_expenses,
            total_savings: summary.total_savings,
            health_score: summary.health_score,
            active_goals: summary.active_goal_count,
            budget_categories: summary.budget_categories.clone(),
        }
    }
}

/// Body of `POST /api/coach`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CoachRequest {
    pub messages: Vec<WireMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_context: Option<FinancialContext>,
}

impl CoachRequest {
    /// Only user and assistant turns may come from the client. The system
    /// prompt is always the server's own.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.messages.iter().any(|m| m.role == ChatRole::System) {
            return Err(ValidationError::InvalidFormat {
                field: "messages".to_string(),
                reason: "role must be user or assistant".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// System Prompt
// =============================================================================

const PROMPT_INTRO: &str = "You are FinSense AI Coach, an expert financial advisor specializing in helping gig workers, freelancers, and people with irregular income manage their finances better.

Your role is to:
- Provide personalized, actionable financial advice
- Help users understand their spending patterns
- Suggest ways to save money and build emergency funds
- Offer budgeting strategies for irregular income
- Explain financial concepts in simple terms
- Be encouraging and supportive while being realistic
- Use Indian Rupee (₹) as the default currency unless specified otherwise
";

const PROMPT_OUTRO: &str = "Keep responses concise, friendly, and actionable. Use emojis sparingly to make the conversation engaging. Always provide specific, practical advice tailored to the user's situation.";

/// Builds the system prompt, with the user's context block when present.
///
/// Zero income and a zero score read as "not specified" / "not calculated"
/// rather than misleading zeros.
pub fn system_prompt(context: Option<&FinancialContext>) -> String {
    let mut prompt = String::from(PROMPT_INTRO);

    if let Some(ctx) = context {
        let income = if ctx.monthly_income.is_zero() {
            "Not specified".to_string()
        } else {
            ctx.monthly_income.to_string()
        };
        let score = if ctx.health_score == 0 {
            "Not calculated".to_string()
        } else {
            ctx.health_score.to_string()
        };
        let categories = if ctx.budget_categories.is_empty() {
            "None set".to_string()
        } else {
            ctx.budget_categories.join(", ")
        };

        prompt.push_str(&format!(
            "\nUser's Financial Context:\n\
             - Monthly Income: {income}\n\
             - Total Expenses (This Month): {}\n\
             - Total Savings: {}\n\
             - Financial Health Score: {score}\n\
             - Active Goals: {}\n\
             - Budget Categories: {categories}\n",
            ctx.total_expenses, ctx.total_savings, ctx.active_goals,
        ));
    }

    prompt.push('\n');
    prompt.push_str(PROMPT_OUTRO);
    prompt
}

// =============================================================================
// Exchange State Machine
// =============================================================================

/// Phase of the current exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExchangeState {
    #[default]
    Idle,
    Sending,
    Streaming,
    Done,
    Failed,
}

impl ExchangeState {
    /// A new message may be sent.
    pub fn accepts_input(&self) -> bool {
        matches!(self, ExchangeState::Idle | ExchangeState::Done | ExchangeState::Failed)
    }
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExchangeState::Idle => "idle",
            ExchangeState::Sending => "sending",
            ExchangeState::Streaming => "streaming",
            ExchangeState::Done => "done",
            ExchangeState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The pair persisted after a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedExchange {
    pub user: String,
    pub assistant: String,
}

/// Conversation with the coach: committed history plus at most one
/// in-flight exchange.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    committed: Vec<WireMessage>,
    pending_user: Option<String>,
    draft: Option<String>,
    state: ExchangeState,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a previously stored transcript.
    pub fn with_history(history: Vec<WireMessage>) -> Self {
        Conversation {
            committed: history,
            ..Self::default()
        }
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Completed messages only.
    pub fn history(&self) -> &[WireMessage] {
        &self.committed
    }

    /// Starts an exchange.
    ///
    /// Returns the messages to send: the committed history followed by the
    /// new user message.
    ///
    /// ## Errors
    /// - `Validation` if the text is blank
    /// - `InvalidExchangeState` if an exchange is already running
    pub fn begin(&mut self, text: &str) -> CoreResult<Vec<WireMessage>> {
        self.ensure(self.state.accepts_input(), "begin")?;
        let text = validate_chat_message(text)?;

        let mut outgoing = self.committed.clone();
        outgoing.push(WireMessage::user(text.clone()));

        self.pending_user = Some(text);
        self.draft = None;
        self.state = ExchangeState::Sending;
        Ok(outgoing)
    }

    /// The endpoint accepted the request; an empty assistant draft appears.
    pub fn start_streaming(&mut self) -> CoreResult<()> {
        self.ensure(self.state == ExchangeState::Sending, "start streaming")?;
        self.draft = Some(String::new());
        self.state = ExchangeState::Streaming;
        Ok(())
    }

    /// Replaces the draft with the latest accumulated text.
    pub fn apply_snapshot(&mut self, text: &str) -> CoreResult<()> {
        self.ensure(self.state == ExchangeState::Streaming, "apply snapshot")?;
        self.draft = Some(text.to_string());
        Ok(())
    }

    /// Commits the user message and the final draft.
    pub fn complete(&mut self) -> CoreResult<CompletedExchange> {
        self.ensure(self.state == ExchangeState::Streaming, "complete")?;

        let user = self.pending_user.take().unwrap_or_default();
        let assistant = self.draft.take().unwrap_or_default();

        self.committed.push(WireMessage::user(user.clone()));
        self.committed.push(WireMessage::assistant(assistant.clone()));
        self.state = ExchangeState::Done;

        Ok(CompletedExchange { user, assistant })
    }

    /// Aborts the exchange and rolls back to the committed history.
    pub fn fail(&mut self) -> CoreResult<()> {
        self.ensure(
            matches!(self.state, ExchangeState::Sending | ExchangeState::Streaming),
            "fail",
        )?;
        self.pending_user = None;
        self.draft = None;
        self.state = ExchangeState::Failed;
        Ok(())
    }

    /// Messages to render: committed history plus the in-flight exchange.
    pub fn visible_messages(&self) -> Vec<WireMessage> {
        let mut messages = self.committed.clone();
        if let Some(user) = &self.pending_user {
            messages.push(WireMessage::user(user.clone()));
        }
        if let Some(draft) = &self.draft {
            messages.push(WireMessage::assistant(draft.clone()));
        }
        messages
    }

    fn ensure(&self, allowed: bool, operation: &'static str) -> CoreResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(CoreError::InvalidExchangeState {
                operation,
                state: self.state.to_string(),
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
