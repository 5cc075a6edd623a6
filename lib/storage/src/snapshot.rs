// JSON snapshots of a MemoryStore
use crate::graph::{EntityId, StoredNode, StoredRelationship};
use crate::store::{MemoryStore, StoreState};
use anyhow::{bail, Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Full contents of a store at one point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u32,
    pub created_at: u64,
    pub next_node_id: EntityId,
    pub next_relationship_id: EntityId,
    pub nodes: Vec<StoredNode>,
    pub relationships: Vec<StoredRelationship>,
}

impl MemoryStore {
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state_snapshot();
        StoreSnapshot {
            version: SNAPSHOT_VERSION,
            created_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            next_node_id: state.next_node_id,
            next_relationship_id: state.next_relationship_id,
            nodes: state.nodes.into_values().collect(),
            relationships: state.relationships.into_values().collect(),
        }
    }

    /// Rebuild a store. Ids are preserved and new ids continue after the
    /// highest one seen.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            bail!("unsupported snapshot version {}", snapshot.version);
        }
        let mut state = StoreState {
            next_node_id: snapshot.next_node_id,
            next_relationship_id: snapshot.next_relationship_id,
            ..StoreState::default()
        };
        for node in snapshot.nodes {
            state.next_node_id = state.next_node_id.max(node.id + 1);
            state.nodes.insert(node.id, node);
        }
        for rel in snapshot.relationships {
            if !state.nodes.contains_key(&rel.start) || !state.nodes.contains_key(&rel.end) {
                bail!("relationship {} references a missing node", rel.id);
            }
            state.next_relationship_id = state.next_relationship_id.max(rel.id + 1);
            state.relationships.insert(rel.id, rel);
        }
        Ok(Self::from_state(state))
    }
}

/// Write the store to `path`, replacing any previous snapshot atomically
pub fn save_snapshot<P: AsRef<Path>>(store: &MemoryStore, path: P) -> Result<()> {
    let path = path.as_ref();
    let snapshot = store.snapshot();
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| {
            let mut writer = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut writer, &snapshot).map_err(std::io::Error::from)?;
            writer.flush()
        })
        .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    info!(
        path = %path.display(),
        nodes = snapshot.nodes.len(),
        relationships = snapshot.relationships.len(),
        "Saved snapshot"
    );
    Ok(())
}

pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<MemoryStore> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open snapshot {}", path.display()))?;
    let snapshot: StoreSnapshot = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
    info!(
        path = %path.display(),
        nodes = snapshot.nodes.len(),
        relationships = snapshot.relationships.len(),
        "Loaded snapshot"
    );
    MemoryStore::from_snapshot(snapshot)
}

/// Load `path` if it exists, otherwise start from an empty store
pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<MemoryStore> {
    let path = path.as_ref();
    if path.exists() {
        load_snapshot(path)
    } else {
        info!(path = %path.display(), "No snapshot found, starting empty");
        Ok(MemoryStore::new())
    }
}
