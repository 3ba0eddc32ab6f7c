/// Why a suspected crossing could not be turned into a crossing instant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpolationError {
    #[error("only {available} buffered fix(es), need at least two")]
    NotEnoughSamples { available: usize },
    #[error("no consecutive fixes on opposite sides of the line among {scanned} buffered")]
    NoBracketingPair { scanned: usize },
    #[error("bracketing pair at buffer position {index} lacks a neighbour fix for the spline")]
    MissingControlPoints { index: usize },
}
