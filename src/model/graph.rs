//! External-data references inside an ONNX graph.
//!
//! Initializers stored outside the graph carry `external_data` entries, each a
//! protobuf `StringStringEntryProto`. The `location` entry names the file ONNX
//! Runtime will open relative to the graph's directory.

use std::fs;

use crate::error::{Error, Result};

use super::artifacts::ModelArtifacts;

/// `StringStringEntryProto.key = "location"` followed by the tag of `value`.
const LOCATION_ENTRY: &[u8] = b"\x0a\x08location\x12";

/// Collect the distinct external-data locations referenced by a serialized
/// graph, in order of first appearance.
#[must_use]
pub fn external_data_locations(graph: &[u8]) -> Vec<String> {
    let mut locations: Vec<String> = Vec::new();
    let mut rest = graph;

    while let Some(start) = find(rest, LOCATION_ENTRY) {
        rest = &rest[start + LOCATION_ENTRY.len()..];
        let Some((len, width)) = read_varint(rest) else {
            break;
        };
        let Some(value) = usize::try_from(len)
            .ok()
            .and_then(|len| rest.get(width..width.checked_add(len)?))
        else {
            break;
        };

        if let Ok(location) = std::str::from_utf8(value) {
            if !locations.iter().any(|seen| seen == location) {
                locations.push(location.to_string());
            }
        }
        rest = &rest[width + value.len()..];
    }

    locations
}

/// Check that the topology reads its weights from `artifacts.weights` and
/// from nothing else.
///
/// # Errors
///
/// Returns [`Error::WeightsMismatch`] if the graph references no external
/// data, or any file other than the weights, and [`Error::Io`] if the graph
/// cannot be read.
pub fn verify_weights_reference(artifacts: &ModelArtifacts) -> Result<()> {
    let graph = fs::read(&artifacts.topology)?;
    let referenced = external_data_locations(&graph);
    let expected = artifacts.weights.file_name();

    let matches = !referenced.is_empty()
        && referenced
            .iter()
            .all(|location| Some(std::path::Path::new(location).as_os_str()) == expected);

    if !matches {
        return Err(Error::WeightsMismatch {
            weights: artifacts.weights.clone(),
            topology: artifacts.topology.clone(),
            referenced,
        });
    }

    tracing::debug!("Graph reads external data from {}", referenced.join(", "));
    Ok(())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Decode a protobuf varint, returning the value and its encoded width.
fn read_varint(bytes: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for (i, &byte) in bytes.iter().take(10).enumerate() {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}
