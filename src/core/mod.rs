mod allocation;
mod chart;
mod engine;
mod parse;
mod types;

pub use allocation::{
    build_arcs, normalize_allocation, slice_path, AllocationInput, ArcSlice, DonutGeometry,
    NormalizedAllocation,
};
pub use chart::{
    fallback_container_width, layout, scroll_hint_opacity, scroll_hint_visible, ChartGeometry,
    ChartLayout, ChartPoint, XAxisLabel, MAX_STEP_X, MIN_STEP_X, SCROLL_HINT_FADE_DISTANCE,
    SCROLL_HINT_MIN_VISIBLE_OPACITY,
};
pub use engine::{monthly_periodic_rate, project, resolved_months, summarize};
pub use parse::parse_amount;
pub use types::{RateBasis, SeriesPoint, SimulationConfig, Summary, TermBasis};
