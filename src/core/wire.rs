use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::core::{IssError, Row, Table};

/// One ISS data block: `{"columns": [...], "data": [[...], ...]}`.
/// Other members (e.g. `metadata`) are ignored.
#[derive(Deserialize, Debug)]
pub(crate) struct Block {
    pub(crate) columns: Vec<String>,
    pub(crate) data: Vec<Row>,
}

impl From<Block> for Table {
    fn from(b: Block) -> Self {
        Table::new(b.columns, b.data)
    }
}

fn parse_root(body: &str) -> Result<Map<String, Value>, IssError> {
    serde_json::from_str(body).map_err(IssError::Json)
}

fn block_from(envelope: &str, node: Value) -> Result<Block, IssError> {
    serde_json::from_value(node)
        .map_err(|e| IssError::Data(format!("malformed `{envelope}` block: {e}")))
}

/// Decodes the block stored under `envelope` in a response body.
pub(crate) fn extract_block(body: &str, envelope: &str) -> Result<Block, IssError> {
    let mut root = parse_root(body)?;
    let node = root
        .remove(envelope)
        .ok_or_else(|| IssError::Data(format!("missing envelope `{envelope}`")))?;
    block_from(envelope, node)
}

/// Decodes every top-level member of a response body as a block.
pub(crate) fn extract_all_blocks(body: &str) -> Result<BTreeMap<String, Block>, IssError> {
    parse_root(body)?
        .into_iter()
        .map(|(key, node)| {
            let block = block_from(&key, node)?;
            Ok((key, block))
        })
        .collect()
}
