//! Image transfer into cluster nodes via `kind load docker-image`

use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::command::{CommandError, CommandRunner, run_out};

/// Copies a local image into every node of a cluster
#[async_trait]
pub trait ImageTransfer: Send + Sync {
    async fn load(&self, cluster_name: &str, tag: &str) -> Result<(), CommandError>;
}

/// kind binary wrapper
#[derive(Clone)]
pub struct KindCli {
    runner: Arc<dyn CommandRunner>,
    binary: String,
}

impl KindCli {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            binary: "kind".to_string(),
        }
    }

    pub fn binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn load_args(cluster_name: &str, tag: &str) -> Vec<String> {
        ["load", "docker-image", "--name", cluster_name, tag]
            .iter()
            .map(|a| a.to_string())
            .collect()
    }
}

#[async_trait]
impl ImageTransfer for KindCli {
    async fn load(&self, cluster_name: &str, tag: &str) -> Result<(), CommandError> {
        info!("Loading {} into kind cluster {}", tag, cluster_name);
        run_out(
            self.runner.as_ref(),
            &self.binary,
            &Self::load_args(cluster_name, tag),
        )
        .await?;
        Ok(())
    }
}
