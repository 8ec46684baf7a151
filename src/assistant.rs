//! Chat orchestration: routes classified utterances to store operations or
//! the conversational fallback.
//!
//! The assistant is the impure shell around the pure NLU core: it reads the
//! wall clock once per request, talks to the task store, and keeps a
//! bounded conversation memory for the LLM fallback.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::Error;
use crate::llm::{ChatMessage, LlmClient};
use crate::nlu::{resolve_task_reference, Intent, IntentClassifier, TaskParser};
use crate::store::{NewTask, TaskRecord, TaskStatus, TaskStore, TaskSummary, TaskUpdate};

const SYSTEM_PROMPT: &str = "You are a helpful personal assistant that manages daily tasks. \
You help users create tasks from natural language, review their task list, mark tasks as \
complete, and delete tasks. Be helpful, concise, and friendly.";

/// Keep this many recent messages as LLM context.
const MAX_HISTORY: usize = 40;

/// What a reply represents, mirrored into the HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyAction {
    TaskCreated,
    TasksDisplayed,
    TaskCompleted,
    TaskDeleted,
    GeneralResponse,
    Error,
}

/// Structured reply for one chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantReply {
    pub action: ReplyAction,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<TaskSummary>,
}

impl AssistantReply {
    fn new(action: ReplyAction, message: impl Into<String>) -> Self {
        Self {
            action,
            message: message.into(),
            task_id: None,
            task: None,
            summary: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self::new(ReplyAction::Error, message)
    }
}

/// The chat-facing orchestrator.
pub struct Assistant {
    store: Arc<TaskStore>,
    llm: Option<Arc<dyn LlmClient>>,
    model: String,
    classifier: IntentClassifier,
    parser: TaskParser,
    history: RwLock<Vec<ChatMessage>>,
}

impl Assistant {
    pub fn new(store: Arc<TaskStore>, llm: Option<Arc<dyn LlmClient>>, model: String) -> Self {
        Self {
            store,
            llm,
            model,
            classifier: IntentClassifier::new(),
            parser: TaskParser::new(),
            history: RwLock::new(Vec::new()),
        }
    }

    /// Process one utterance against the local clock.
    pub async fn process(&self, utterance: &str) -> Result<AssistantReply, Error> {
        self.process_at(utterance, Local::now().naive_local()).await
    }

    /// Process one utterance against an explicit reference time. Split out
    /// so tests control the clock.
    pub async fn process_at(
        &self,
        utterance: &str,
        now: NaiveDateTime,
    ) -> Result<AssistantReply, Error> {
        let intent = self.classifier.classify(utterance);
        tracing::debug!(intent = %intent, "classified utterance");

        match intent {
            Intent::CreateTask => self.handle_create(utterance, now).await,
            Intent::ViewTasks => self.handle_view(now),
            Intent::CompleteTask => self.handle_complete(utterance),
            Intent::DeleteTask => self.handle_delete(utterance),
            Intent::GeneralChat => self.handle_chat(utterance).await,
        }
    }

    async fn handle_create(
        &self,
        utterance: &str,
        now: NaiveDateTime,
    ) -> Result<AssistantReply, Error> {
        let parsed = self.parser.parse(utterance, now)?;

        let id = self.store.create(&NewTask {
            title: parsed.title,
            description: parsed.description,
            due_date: parsed.due_date,
            priority: parsed.priority,
        })?;
        let task = self.store.get(id)?;

        let canned = match task.as_ref().and_then(|t| t.due_date) {
            Some(due) => format!(
                "Task #{} created, due {}.",
                id,
                due.format("%Y-%m-%d %H:%M")
            ),
            None => format!("Task #{} created.", id),
        };
        let message = self
            .flavored_reply(utterance, &format!("Task created successfully with ID {}", id))
            .await
            .unwrap_or(canned);

        Ok(AssistantReply {
            task_id: Some(id),
            task,
            ..AssistantReply::new(ReplyAction::TaskCreated, message)
        })
    }

    fn handle_view(&self, now: NaiveDateTime) -> Result<AssistantReply, Error> {
        let summary = self.store.summary(now)?;

        let message = if summary.total == 0 {
            "You don't have any tasks yet. Would you like to create one?".to_string()
        } else if summary.pending == 0 {
            "Great! You've completed all your tasks. You're all caught up!".to_string()
        } else {
            let mut msg = format!("You have {} pending tasks. ", summary.pending);
            if summary.overdue > 0 {
                msg.push_str(&format!("{} are overdue. ", summary.overdue));
            }
            if summary.due_today > 0 {
                msg.push_str(&format!("{} are due today.", summary.due_today));
            }
            msg.trim_end().to_string()
        };

        Ok(AssistantReply {
            summary: Some(summary),
            ..AssistantReply::new(ReplyAction::TasksDisplayed, message)
        })
    }

    fn handle_complete(&self, utterance: &str) -> Result<AssistantReply, Error> {
        let Some(id) = resolve_task_reference(utterance) else {
            return Ok(AssistantReply::error(
                "I couldn't identify which task you want to complete. \
                 Please specify the task ID.",
            ));
        };

        if self
            .store
            .update(id, &TaskUpdate::status(TaskStatus::Completed))?
        {
            Ok(AssistantReply {
                task_id: Some(id),
                ..AssistantReply::new(
                    ReplyAction::TaskCompleted,
                    format!("Great! Task {} has been marked as completed. Well done!", id),
                )
            })
        } else {
            Ok(AssistantReply::error(format!(
                "Sorry, I couldn't find task {} to mark as complete.",
                id
            )))
        }
    }

    fn handle_delete(&self, utterance: &str) -> Result<AssistantReply, Error> {
        let Some(id) = resolve_task_reference(utterance) else {
            return Ok(AssistantReply::error(
                "I couldn't identify which task you want to delete. \
                 Please specify the task ID.",
            ));
        };

        if self.store.delete(id)? {
            Ok(AssistantReply {
                task_id: Some(id),
                ..AssistantReply::new(
                    ReplyAction::TaskDeleted,
                    format!("Task {} has been deleted successfully.", id),
                )
            })
        } else {
            Ok(AssistantReply::error(format!(
                "Sorry, I couldn't find task {} to delete.",
                id
            )))
        }
    }

    async fn handle_chat(&self, utterance: &str) -> Result<AssistantReply, Error> {
        let reply = match &self.llm {
            Some(llm) => {
                let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT)];
                messages.extend(self.history.read().await.iter().cloned());
                messages.push(ChatMessage::user(utterance));

                match llm.chat_completion(&self.model, &messages).await {
                    Ok(response) => response.content,
                    Err(e) => {
                        tracing::warn!("conversational fallback failed: {}", e);
                        "I'm having trouble processing your request right now. \
                         Please try again later."
                            .to_string()
                    }
                }
            }
            None => "I can help you manage tasks: try \"Remind me to call mom at 3 PM\", \
                     \"show my tasks\", \"mark task 1 as done\", or \"delete task 2\"."
                .to_string(),
        };

        self.remember(utterance, &reply).await;

        Ok(AssistantReply::new(ReplyAction::GeneralResponse, reply))
    }

    /// Ask the LLM to phrase a confirmation; `None` when no client is
    /// configured or the call fails (the caller supplies canned text).
    async fn flavored_reply(&self, user_input: &str, context: &str) -> Option<String> {
        let llm = self.llm.as_ref()?;
        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!("User: {}\nContext: {}", user_input, context)),
        ];
        match llm.chat_completion(&self.model, &messages).await {
            Ok(response) => Some(response.content),
            Err(e) => {
                tracing::warn!("flavored reply failed, using canned text: {}", e);
                None
            }
        }
    }

    /// Append a turn to the bounded conversation memory.
    async fn remember(&self, user: &str, assistant: &str) {
        let mut history = self.history.write().await;
        history.push(ChatMessage::user(user));
        history.push(ChatMessage::assistant(assistant));
        let len = history.len();
        if len > MAX_HISTORY {
            history.drain(..len - MAX_HISTORY);
        }
    }

    /// Snapshot of the conversation memory.
    pub async fn history(&self) -> Vec<ChatMessage> {
        self.history.read().await.clone()
    }

    /// Clear the conversation memory.
    pub async fn clear_history(&self) {
        self.history.write().await.clear();
    }

    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }
}
