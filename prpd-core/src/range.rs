use prpd_config::DisplayRange;

/// Source of the amplitude window the chart is currently displaying.
///
/// The engine never picks a range itself; it polls a provider through
/// [`PrpdEngine::sync_range`](crate::PrpdEngine::sync_range) or is told
/// directly through `set_display_range`.
pub trait AmplitudeRangeProvider {
    fn current_range(&self) -> DisplayRange;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRange(pub DisplayRange);

impl AmplitudeRangeProvider for FixedRange {
    fn current_range(&self) -> DisplayRange {
        self.0
    }
}

impl<F> AmplitudeRangeProvider for F
where
    F: Fn() -> DisplayRange,
{
    fn current_range(&self) -> DisplayRange {
        self()
    }
}
