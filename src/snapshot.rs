//! JSON snapshots of a graph for visualisation.
//!
//! ```json
//! { "nodes": [{ "name": "A", "state": 0 }],
//!   "links": [{ "source": "A", "target": "B", "portIn": 0, "portOut": 1 }] }
//! ```
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::{Graph, Port, State};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub state: State,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    #[serde(rename = "portIn")]
    pub port_in: Port,
    #[serde(rename = "portOut")]
    pub port_out: Port,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot encode snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

impl Snapshot {
    /// Nodes in name order, links in edge order. Each link runs from the edge's first end to its
    /// second end.
    pub fn of(graph: &Graph) -> Self {
        let nodes = graph
            .vertices()
            .map(|v| Node {
                name: v.name.to_string(),
                state: v.state,
            })
            .collect();
        let links = graph
            .edges()
            .iter()
            .map(|e| Link {
                source: e.first().name.to_string(),
                target: e.second().name.to_string(),
                port_in: e.first().port,
                port_out: e.second().port,
            })
            .collect();
        Snapshot { nodes, links }
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<(), serde_json::Error> {
        serde_json::to_writer_pretty(writer, self)
    }

    /// Write to `path`, creating or truncating the file.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let io_error = |source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        self.write(&mut writer)?;
        writer.flush().map_err(io_error)?;
        Ok(())
    }
}

/// Write the snapshot of `graph` to `writer`.
pub fn write_json<W: Write>(graph: &Graph, writer: W) -> Result<(), serde_json::Error> {
    Snapshot::of(graph).write(writer)
}
