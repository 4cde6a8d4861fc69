//! Thin wrapper around the kubectl binary

use std::sync::Arc;

use crate::command::{CommandError, CommandRunner, run_out};

/// kubectl invocation bound to an optional kube context
#[derive(Clone)]
pub struct KubectlCli {
    runner: Arc<dyn CommandRunner>,
    binary: String,
    kube_context: Option<String>,
}

impl KubectlCli {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            binary: "kubectl".to_string(),
            kube_context: None,
        }
    }

    pub fn binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn kube_context(mut self, context: Option<String>) -> Self {
        self.kube_context = context;
        self
    }

    /// Full argument list, with `--context` first when set
    pub fn args(&self, args: &[&str]) -> Vec<String> {
        let mut full = Vec::with_capacity(args.len() + 2);
        if let Some(context) = &self.kube_context {
            full.push("--context".to_string());
            full.push(context.clone());
        }
        full.extend(args.iter().map(|a| a.to_string()));
        full
    }

    /// Run kubectl and return stdout
    pub async fn run_out(&self, args: &[&str]) -> Result<String, CommandError> {
        run_out(self.runner.as_ref(), &self.binary, &self.args(args)).await
    }

    /// Name of the current kube context
    pub async fn current_context(&self) -> Result<String, CommandError> {
        let out = self.run_out(&["config", "current-context"]).await?;
        Ok(out.trim().to_string())
    }
}
