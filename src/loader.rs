//! Selective image loader.
//!
//! Walks the artifact list in order and transfers into the cluster only the
//! images this run built and the nodes do not already hold. The node
//! inventory is queried at most once per call, and only when some artifact
//! actually needs a presence check. The first failure ends the call.

use log::{debug, info, warn};
use std::io::Write;
use std::time::Instant;

use crate::domain::{Artifact, BuiltTags, LoadOutcome, LoadReport};
use crate::error::{KindLoadError, Result};
use crate::inventory::{InventoryResolver, LazyInventory};
use crate::transfer::ImageTransfer;

/// Loads build output into kind cluster nodes
pub struct ImageLoader<R, T> {
    resolver: R,
    transfer: T,
}

impl<R: InventoryResolver, T: ImageTransfer> ImageLoader<R, T> {
    pub fn new(resolver: R, transfer: T) -> Self {
        Self { resolver, transfer }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn transfer(&self) -> &T {
        &self.transfer
    }

    /// Load every built, not yet present artifact into `cluster_name`.
    ///
    /// Writes one status line per built artifact and a final elapsed-time
    /// line to `out`. The elapsed-time line is written even when the call
    /// fails.
    pub async fn load_images(
        &self,
        artifacts: &[Artifact],
        built: &BuiltTags,
        cluster_name: &str,
        out: &mut (dyn Write + Send),
    ) -> Result<LoadReport> {
        let start = Instant::now();
        let mut inventory = LazyInventory::new(&self.resolver);
        let mut entries = Vec::with_capacity(artifacts.len());

        let result = self
            .load_each(artifacts, built, cluster_name, &mut inventory, &mut entries, out)
            .await;

        let elapsed = start.elapsed();
        let summary = writeln!(out, "Images loaded in {:?}", elapsed);
        result?;
        summary?;

        info!(
            "Processed {} artifacts in {:?} ({} inventory queries)",
            entries.len(),
            elapsed,
            inventory.queries()
        );

        Ok(LoadReport {
            entries,
            elapsed,
            inventory_queries: inventory.queries(),
        })
    }

    async fn load_each(
        &self,
        artifacts: &[Artifact],
        built: &BuiltTags,
        cluster_name: &str,
        inventory: &mut LazyInventory<'_>,
        entries: &mut Vec<(String, LoadOutcome)>,
        out: &mut (dyn Write + Send),
    ) -> Result<()> {
        for artifact in artifacts {
            let tag = artifact.tag.as_str();

            if !built.contains(tag) {
                debug!("Skipping {}: not built by this run", tag);
                entries.push((tag.to_string(), LoadOutcome::SkippedNotBuilt));
                continue;
            }

            write!(out, " - {} -> ", tag)?;
            out.flush()?;

            let present = match inventory.get().await {
                Ok(inventory) => inventory.contains(tag),
                Err(err) => {
                    warn!("Inventory query failed while checking {}: {}", tag, err);
                    report(out, tag, LoadOutcome::Failed, entries)?;
                    return Err(err);
                }
            };

            if present {
                debug!("{} already present on the nodes", tag);
                report(out, tag, LoadOutcome::SkippedAlreadyPresent, entries)?;
                continue;
            }

            if let Err(source) = self.transfer.load(cluster_name, tag).await {
                warn!("Loading {} failed: {}", tag, source);
                report(out, tag, LoadOutcome::Failed, entries)?;
                let output = source.output().to_string();
                return Err(KindLoadError::TransferFailed {
                    tag: tag.to_string(),
                    source,
                    output,
                });
            }

            report(out, tag, LoadOutcome::Loaded, entries)?;
        }
        Ok(())
    }
}

fn report(
    out: &mut (dyn Write + Send),
    tag: &str,
    outcome: LoadOutcome,
    entries: &mut Vec<(String, LoadOutcome)>,
) -> Result<()> {
    if let Some(word) = outcome.colored() {
        writeln!(out, "{}", word)?;
    }
    entries.push((tag.to_string(), outcome));
    Ok(())
}
