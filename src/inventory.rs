//! Node image inventory: which images the cluster nodes already hold.
//!
//! The inventory is a snapshot taken with a single `kubectl get nodes`
//! query. It is never refreshed while a load is in progress, so images that
//! appear on the nodes afterwards are simply transferred again.

use async_trait::async_trait;
use log::{debug, info};
use std::collections::HashSet;

use crate::error::{KindLoadError, Result};
use crate::kubectl::KubectlCli;

/// jsonpath selecting every image name of every node
pub const NODE_IMAGES_JSONPATH: &str = "jsonpath={.items[*].status.images[*].names[*]}";

/// Characters the query syntax may leave around a token
const TOKEN_NOISE: &[char] = &['\'', '"', '[', ']', '{', '}'];

/// Set of image references present on any node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeInventory {
    images: HashSet<String>,
}

impl NodeInventory {
    /// Parse whitespace-delimited query output into a sanitized set
    pub fn parse(text: &str) -> Self {
        text.split_whitespace()
            .map(|token| token.trim_matches(TOKEN_NOISE))
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.images.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Image references in sorted order
    pub fn sorted(&self) -> Vec<&str> {
        let mut images: Vec<&str> = self.images.iter().map(String::as_str).collect();
        images.sort_unstable();
        images
    }
}

impl FromIterator<String> for NodeInventory {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            images: iter.into_iter().collect(),
        }
    }
}

/// Source of the node image inventory
#[async_trait]
pub trait InventoryResolver: Send + Sync {
    /// Query the cluster once; failures are `InventoryQueryFailed`
    async fn resolve(&self) -> Result<NodeInventory>;
}

#[async_trait]
impl InventoryResolver for KubectlCli {
    async fn resolve(&self) -> Result<NodeInventory> {
        let out = self
            .run_out(&["get", "nodes", "-o", NODE_IMAGES_JSONPATH])
            .await
            .map_err(KindLoadError::InventoryQueryFailed)?;

        let inventory = NodeInventory::parse(&out);
        info!("Nodes report {} cached images", inventory.len());
        Ok(inventory)
    }
}

/// Resolves the inventory on first use and keeps it for the rest of a call
pub struct LazyInventory<'a> {
    resolver: &'a dyn InventoryResolver,
    inventory: Option<NodeInventory>,
    queries: usize,
}

impl<'a> LazyInventory<'a> {
    pub fn new(resolver: &'a dyn InventoryResolver) -> Self {
        Self {
            resolver,
            inventory: None,
            queries: 0,
        }
    }

    /// The inventory, querying the cluster only if not done yet
    pub async fn get(&mut self) -> Result<&NodeInventory> {
        if self.inventory.is_none() {
            debug!("Querying node image inventory");
            self.queries += 1;
            self.inventory = Some(self.resolver.resolve().await?);
        }
        Ok(self.inventory.get_or_insert_with(NodeInventory::default))
    }

    /// Number of queries issued so far
    pub fn queries(&self) -> usize {
        self.queries
    }

    pub fn is_resolved(&self) -> bool {
        self.inventory.is_some()
    }
}
