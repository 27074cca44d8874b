/// Minimum-volume check consulted by the liquidity guardrail.
///
/// The production implementation is an external collaborator; the engine
/// only needs the verdict. Kept pluggable so calibration runs can swap in
/// historical volume data.
pub trait LiquidityFilter: Send + Sync {
    fn has_min_volume(&self, asset: &str) -> bool;
}

/// Reference stub: every asset passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysPass;

impl LiquidityFilter for AlwaysPass {
    fn has_min_volume(&self, _asset: &str) -> bool {
        true
    }
}
