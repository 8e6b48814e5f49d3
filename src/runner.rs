//! Command runner: executes controller IO against a CouncilClient
//!
//! The controller emits [`AppCommand`]s; the runner performs them and turns
//! each outcome back into an [`AppEvent`] carrying the original ticket.
//! Errors cross back as strings, the way the controller tracks task results.

use std::sync::Arc;

use council_client::CouncilClient;
use council_ui::{AppCommand, AppEvent, CouncilApp, Millis};
use futures::future::join_all;

#[derive(Clone)]
pub struct CommandRunner {
    client: Arc<dyn CouncilClient>,
}

impl CommandRunner {
    pub fn new(client: Arc<dyn CouncilClient>) -> Self {
        Self { client }
    }

    pub async fn execute(&self, command: AppCommand) -> AppEvent {
        match command {
            AppCommand::RequestAnalysis { ticket, request } => {
                tracing::debug!(%ticket, "running analysis");
                let result = self
                    .client
                    .analyze(request)
                    .await
                    .map_err(|e| e.to_string());
                AppEvent::AnalysisCompleted { ticket, result }
            }
            AppCommand::InjectDebate { ticket, request } => {
                tracing::debug!(%ticket, "running debate injection");
                let result = self
                    .client
                    .inject_debate(request)
                    .await
                    .map_err(|e| e.to_string());
                AppEvent::DebateReplyReceived { ticket, result }
            }
        }
    }

    /// Run a batch concurrently; events come back in command order
    pub async fn execute_all(&self, commands: Vec<AppCommand>) -> Vec<AppEvent> {
        join_all(commands.into_iter().map(|c| self.execute(c))).await
    }

    /// Drain and execute commands until the controller stops asking for IO.
    /// Returns how many commands ran.
    pub async fn settle(&self, app: &mut CouncilApp, now: impl Fn() -> Millis) -> usize {
        let mut executed = 0;
        loop {
            let commands = app.take_commands();
            if commands.is_empty() {
                return executed;
            }
            executed += commands.len();
            for event in self.execute_all(commands).await {
                app.handle_event(event, now());
            }
        }
    }
}
