//! Pipeline controller: bounded iteration over listing blocks, one record per
//! block, a single filter pass, and a run outcome carrying observability
//! counters. Sequential by design — the listing session is the only shared
//! resource, so one block is fully processed (detail navigation and its
//! guaranteed return included) before the next begins.

use serde::Serialize;

use crate::assemble;
use crate::config::{ExtractConfig, FilterSpec};
use crate::error::{Result, ScanError};
use crate::filter;
use crate::record::{DiagnosticEvent, Record};
use crate::source::ListingSource;

/// Pipeline progression. `Failed` is reachable only from `Extracting`, on a
/// collaborator fault — never on a single-field or single-record failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Init,
    Extracting,
    Filtering,
    Done,
    Failed,
}

impl PipelineState {
    fn can_advance_to(self, next: PipelineState) -> bool {
        matches!(
            (self, next),
            (PipelineState::Init, PipelineState::Extracting)
                | (PipelineState::Extracting, PipelineState::Filtering)
                | (PipelineState::Extracting, PipelineState::Failed)
                | (PipelineState::Filtering, PipelineState::Done)
        )
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.can_advance_to(next),
            "illegal pipeline transition {:?} -> {:?}",
            self,
            next
        );
        *self = next;
    }
}

/// What a completed run hands back to the caller.
#[derive(Debug, Serialize)]
pub struct RunOutcome {
    pub records: Vec<Record>,
    /// Listing blocks actually processed (bounded by `max_results`)
    pub blocks_seen: usize,
    /// Assembly diagnostics per block in order, then filter diagnostics
    pub diagnostics: Vec<DiagnosticEvent>,
    pub state: PipelineState,
}

/// Run the extraction and filtering pipeline against `source`.
///
/// Processes at most `max_results` blocks. Always terminates with either a
/// (possibly empty) filtered collection plus diagnostics, or a single
/// run-level failure when the listing source is unavailable or empty before
/// any block could be read. No retries anywhere: resilience lives in the
/// extractors' fallback chains.
pub fn run(
    source: &dyn ListingSource,
    filter_spec: &FilterSpec,
    max_results: usize,
    config: &ExtractConfig,
) -> Result<RunOutcome> {
    let mut state = PipelineState::Init;
    state.advance(PipelineState::Extracting);

    let blocks = match source.list_blocks(max_results) {
        Ok(blocks) => blocks,
        Err(e) => {
            state.advance(PipelineState::Failed);
            return Err(e);
        }
    };
    if blocks.is_empty() {
        state.advance(PipelineState::Failed);
        return Err(ScanError::SourceUnavailable(
            "listing source yielded no blocks".to_string(),
        ));
    }

    let mut records = Vec::new();
    let mut diagnostics = Vec::new();
    let mut blocks_seen = 0;

    for (index, block) in blocks.iter().take(max_results).enumerate() {
        let (record, events) = assemble::assemble(block.as_ref(), index, config);
        records.push(record);
        diagnostics.extend(events);
        blocks_seen += 1;
    }

    state.advance(PipelineState::Filtering);
    let (records, filter_events) = filter::apply(&records, filter_spec);
    diagnostics.extend(filter_events);
    state.advance(PipelineState::Done);

    Ok(RunOutcome {
        records,
        blocks_seen,
        diagnostics,
        state,
    })
}
