//! Hand-authored shape overrides.
//!
//! The override document maps either an exact pattern key to a complete
//! replacement shape, or an `a|...|b` template to a coordinate segment that
//! replaces the path between those two stops in every pattern that visits
//! them in order.

use crate::{shape::Shape, shared::LngLat};
use rayon::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

pub const TEMPLATE_SEPARATOR: &str = "|...|";

#[derive(Error, Debug)]
pub enum OverrideError {
    #[error("Template {key} expects {expected} stop_indices breakpoints, found {found}")]
    BadTemplate {
        key: String,
        expected: usize,
        found: usize,
    },
    #[error("Template {key} has breakpoints out of order or out of bounds")]
    BadBreakpoints { key: String },
    #[error("Overlapping segment overrides {first} and {second} both apply to pattern {pattern}")]
    Overlapping {
        pattern: String,
        first: String,
        second: String,
    },
}

/// A coordinate replacement for the path between two named stops. Applies
/// to any pattern containing both stops with `start_stop` first, not just
/// the pattern it was authored against.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOverride {
    pub start_stop: String,
    pub end_stop: String,
    pub coordinates: Vec<LngLat>,
}

impl SegmentOverride {
    fn key(&self) -> String {
        format!("{}|{}", self.start_stop, self.end_stop)
    }
}

#[derive(Debug, Default, Clone)]
pub struct OverrideTable {
    full: BTreeMap<String, Shape>,
    segments: Vec<SegmentOverride>,
}

impl OverrideTable {
    /// Splits a raw override document into full-pattern replacements and
    /// segment overrides, decomposing multi-stop `a|...|b|...|c` templates
    /// into one segment per consecutive stop pair.
    pub fn parse(raw: BTreeMap<String, Shape>) -> Result<Self, OverrideError> {
        let mut table = Self::default();
        for (key, shape) in raw {
            if key.contains(TEMPLATE_SEPARATOR) {
                table.parse_template(&key, shape)?;
            } else {
                table.full.insert(key, shape);
            }
        }
        debug!(
            "Parsed {} full overrides and {} segment overrides",
            table.full.len(),
            table.segments.len()
        );
        Ok(table)
    }

    fn parse_template(&mut self, key: &str, shape: Shape) -> Result<(), OverrideError> {
        let chain: Vec<&str> = key.split(TEMPLATE_SEPARATOR).collect();
        if chain.len() == 2 && shape.stop_indices.is_empty() {
            // The common hand-authored form: two stops and the whole
            // coordinate list is the segment.
            self.segments.push(SegmentOverride {
                start_stop: chain[0].to_string(),
                end_stop: chain[1].to_string(),
                coordinates: shape.coordinates,
            });
            return Ok(());
        }
        if shape.stop_indices.len() != chain.len() {
            return Err(OverrideError::BadTemplate {
                key: key.to_string(),
                expected: chain.len(),
                found: shape.stop_indices.len(),
            });
        }
        let ordered = shape.stop_indices.windows(2).all(|pair| pair[0] <= pair[1]);
        let in_bounds = shape
            .stop_indices
            .last()
            .is_none_or(|last| *last < shape.coordinates.len());
        if !ordered || !in_bounds {
            return Err(OverrideError::BadBreakpoints {
                key: key.to_string(),
            });
        }
        for (stops, indices) in chain.windows(2).zip(shape.stop_indices.windows(2)) {
            self.segments.push(SegmentOverride {
                start_stop: stops[0].to_string(),
                end_stop: stops[1].to_string(),
                coordinates: shape.coordinates[indices[0]..=indices[1]].to_vec(),
            });
        }
        Ok(())
    }

    pub fn full(&self, key: &str) -> Option<&Shape> {
        self.full.get(key)
    }

    pub fn segments(&self) -> &[SegmentOverride] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty() && self.segments.is_empty()
    }

    /// Applies the table to a baseline shape mapping and returns a new
    /// mapping, never mutating in place. Always splice from the generator's
    /// raw output: the pattern key names stops, not coordinates, so a
    /// previously spliced document cannot be spliced again.
    pub fn splice(
        &self,
        baseline: &BTreeMap<String, Shape>,
    ) -> Result<BTreeMap<String, Shape>, OverrideError> {
        baseline
            .par_iter()
            .map(|(key, shape)| Ok((key.clone(), self.splice_one(key, shape)?)))
            .collect()
    }

    fn splice_one(&self, key: &str, shape: &Shape) -> Result<Shape, OverrideError> {
        if let Some(replacement) = self.full.get(key) {
            debug!("Replacing {key} wholesale");
            return Ok(replacement.clone());
        }

        let stop_ids: Vec<&str> = key.split('|').collect();
        if shape.stop_indices.len() != stop_ids.len() {
            warn!(
                "Shape for {key} has {} stop_indices for {} stops, leaving untouched",
                shape.stop_indices.len(),
                stop_ids.len()
            );
            return Ok(shape.clone());
        }

        // Segments that match this pattern, ordered by where they start.
        let mut applicable: Vec<(usize, usize, &SegmentOverride)> = self
            .segments
            .iter()
            .filter_map(|segment| {
                let start = stop_ids.iter().position(|id| *id == segment.start_stop)?;
                let end = stop_ids.iter().position(|id| *id == segment.end_stop)?;
                (start < end).then_some((start, end, segment))
            })
            .collect();
        applicable.sort_by_key(|(start, ..)| *start);

        for pair in applicable.windows(2) {
            let (_, first_end, first) = &pair[0];
            let (second_start, _, second) = &pair[1];
            if second_start < first_end {
                return Err(OverrideError::Overlapping {
                    pattern: key.to_string(),
                    first: first.key(),
                    second: second.key(),
                });
            }
        }

        let mut result = shape.clone();
        // Right-to-left so earlier coordinate indices stay valid while
        // splicing. Equivalent to ascending order for non-overlapping
        // ranges, which is all that passes the check above.
        for (start_pos, end_pos, segment) in applicable.into_iter().rev() {
            apply_segment(&mut result, start_pos, end_pos, &segment.coordinates, key);
        }
        Ok(result)
    }
}

/// Replaces `coordinates[idx[start_pos] ..= idx[end_pos]]` with the
/// override slice and shifts every stop index at or after `end_pos` by the
/// length delta. Indices strictly between the endpoints are not recomputed;
/// only the endpoints are contractually aligned after a splice.
fn apply_segment(
    shape: &mut Shape,
    start_pos: usize,
    end_pos: usize,
    coords: &[LngLat],
    key: &str,
) {
    let start_idx = shape.stop_indices[start_pos];
    let end_idx = shape.stop_indices[end_pos];
    if start_idx > end_idx || end_idx >= shape.coordinates.len() {
        warn!("Skipping segment override on {key}: stop_indices out of range");
        return;
    }
    debug!("Splicing stops {start_pos}..{end_pos} of {key}");
    shape
        .coordinates
        .splice(start_idx..=end_idx, coords.iter().copied());
    let delta = coords.len() as isize - (end_idx - start_idx + 1) as isize;
    for idx in shape.stop_indices[end_pos..].iter_mut() {
        *idx = (*idx as isize + delta) as usize;
    }
}
