//! Chains and the segment combinator.

use crate::stage::{BoxedStage, Stage, StageError, StageResult, Timing};
use tether_core::Value;

/// An ordered sequence of stages, itself a stage.
///
/// A value threads through `apply`; once a stage fails, the error threads
/// through `recover` until some stage turns it back into a value.
#[derive(Debug)]
pub struct Chain {
    stages: Vec<BoxedStage>,
}

impl Chain {
    /// Build a chain from an ordered stage list.
    pub fn new(stages: Vec<BoxedStage>) -> Self {
        Self { stages }
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True when the chain holds no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The stages, in order.
    pub fn stages(&self) -> &[BoxedStage] {
        &self.stages
    }

    fn thread(&self, start: StageResult) -> StageResult {
        let mut state = start;
        for stage in &self.stages {
            state = match state {
                Ok(value) => stage.apply(value),
                Err(error) => stage.recover(error),
            };
        }
        state
    }
}

impl Stage for Chain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn apply(&self, input: Value) -> StageResult {
        self.thread(Ok(input))
    }

    fn recover(&self, error: StageError) -> StageResult {
        self.thread(Err(error))
    }
}

/// One argument of a combinator call: a bare stage, a stage sequence, or an
/// absent optional slot.
pub enum Segment {
    /// A single stage.
    Stage(BoxedStage),
    /// A stage sequence, kept as a sequence even when it has one element.
    Seq(Vec<BoxedStage>),
    /// Nothing; silently dropped during flattening.
    Skip,
}

impl Segment {
    /// Wrap a single stage.
    pub fn stage(stage: impl Stage + 'static) -> Self {
        Segment::Stage(Box::new(stage))
    }

    /// Wrap a stage sequence.
    pub fn seq(stages: Vec<BoxedStage>) -> Self {
        Segment::Seq(stages)
    }

    /// Wrap an optional stage; `None` becomes `Skip`.
    pub fn opt(stage: Option<BoxedStage>) -> Self {
        match stage {
            Some(stage) => Segment::Stage(stage),
            None => Segment::Skip,
        }
    }
}

impl From<BoxedStage> for Segment {
    fn from(stage: BoxedStage) -> Self {
        Segment::Stage(stage)
    }
}

impl From<Vec<BoxedStage>> for Segment {
    fn from(stages: Vec<BoxedStage>) -> Self {
        Segment::Seq(stages)
    }
}

impl From<Option<BoxedStage>> for Segment {
    fn from(stage: Option<BoxedStage>) -> Self {
        Segment::opt(stage)
    }
}

/// The combinator's result: a bare stage passed through unchanged, or a
/// composed sequence.
#[derive(Debug)]
pub enum Composed {
    /// The single stage of a one-segment call, not wrapped.
    Single(BoxedStage),
    /// A composed sequence.
    Sequence(Chain),
}

impl Composed {
    /// True when the result is a sequence rather than a bare stage.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Composed::Sequence(_))
    }
}

impl Stage for Composed {
    fn name(&self) -> &'static str {
        match self {
            Composed::Single(stage) => stage.name(),
            Composed::Sequence(_) => "chain",
        }
    }

    fn apply(&self, input: Value) -> StageResult {
        match self {
            Composed::Single(stage) => stage.apply(input),
            Composed::Sequence(chain) => chain.apply(input),
        }
    }

    fn recover(&self, error: StageError) -> StageResult {
        match self {
            Composed::Single(stage) => stage.recover(error),
            Composed::Sequence(chain) => chain.recover(error),
        }
    }

    fn timing(&self) -> Option<Timing> {
        match self {
            Composed::Single(stage) => stage.timing(),
            Composed::Sequence(_) => None,
        }
    }
}

/// Combine segments into one stage.
///
/// - no segments: no stage (absence, not an error)
/// - one bare stage: that stage unchanged
/// - one sequence: a composed sequence, even for a single element —
///   composition rules downstream distinguish a stage from a one-element
///   sequence
/// - several segments: flattened in order, skips dropped; an all-skip list
///   is absence, not an empty sequence
pub fn chain(segments: impl IntoIterator<Item = Segment>) -> Option<Composed> {
    let mut segments: Vec<Segment> = segments.into_iter().collect();

    match segments.len() {
        0 => None,
        1 => match segments.remove(0) {
            Segment::Stage(stage) => Some(Composed::Single(stage)),
            Segment::Seq(stages) => Some(Composed::Sequence(Chain::new(stages))),
            Segment::Skip => None,
        },
        _ => {
            let mut flat = Vec::new();
            for segment in segments {
                match segment {
                    Segment::Stage(stage) => flat.push(stage),
                    Segment::Seq(stages) => flat.extend(stages),
                    Segment::Skip => {}
                }
            }
            if flat.is_empty() {
                None
            } else {
                Some(Composed::Sequence(Chain::new(flat)))
            }
        }
    }
}
