use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllocationInput {
    pub equities: Option<f64>,
    pub fixed_income: Option<f64>,
    pub real_estate: Option<f64>,
    pub liquidity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAllocation {
    pub equities: f64,
    pub fixed_income: f64,
    pub real_estate: f64,
    pub liquidity: f64,
    pub total: f64,
}

impl NormalizedAllocation {
    pub fn has_data(&self) -> bool {
        self.total > 0.0
    }

    /// Category values in their fixed display order.
    pub fn values(&self) -> [f64; 4] {
        [self.equities, self.fixed_income, self.real_estate, self.liquidity]
    }

    pub fn share_percent(&self, value: f64) -> f64 {
        if self.total > 0.0 {
            value / self.total * 100.0
        } else {
            0.0
        }
    }
}

pub fn normalize_allocation(input: &AllocationInput) -> NormalizedAllocation {
    let equities = sanitize(input.equities);
    let fixed_income = sanitize(input.fixed_income);
    let real_estate = sanitize(input.real_estate);
    let liquidity = sanitize(input.liquidity);

    NormalizedAllocation {
        equities,
        fixed_income,
        real_estate,
        liquidity,
        total: equities + fixed_income + real_estate + liquidity,
    }
}

fn sanitize(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcSlice {
    pub start_deg: f64,
    pub end_deg: f64,
    /// Positional palette index. Skipped categories keep their slot so a
    /// category's color never depends on which others are active.
    pub color_index: usize,
}

impl ArcSlice {
    pub fn sweep_deg(&self) -> f64 {
        self.end_deg - self.start_deg
    }
}

/// One slice per active category, accumulated clockwise from 12 o'clock.
/// Active sweeps always close the full circle; a zero-total allocation
/// emits no slices and the caller renders a placeholder ring instead.
pub fn build_arcs(allocation: &NormalizedAllocation) -> Vec<ArcSlice> {
    if allocation.total <= 0.0 {
        return Vec::new();
    }

    let mut start = 0.0;
    let mut slices = Vec::new();
    for (color_index, value) in allocation.values().into_iter().enumerate() {
        if value <= 0.0 {
            continue;
        }
        let sweep = value / allocation.total * 360.0;
        slices.push(ArcSlice {
            start_deg: start,
            end_deg: start + sweep,
            color_index,
        });
        start += sweep;
    }
    slices
}

#[derive(Debug, Clone, Copy)]
pub struct DonutGeometry {
    pub size: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
}

impl Default for DonutGeometry {
    fn default() -> Self {
        Self {
            size: 220.0,
            outer_radius: 100.0,
            inner_radius: 58.0,
        }
    }
}

impl DonutGeometry {
    fn center(&self) -> (f64, f64) {
        (self.size / 2.0, self.size / 2.0)
    }
}

// 0° sits at 12 o'clock and angles grow clockwise.
fn polar(cx: f64, cy: f64, radius: f64, deg: f64) -> (f64, f64) {
    let rad = (deg - 90.0) * PI / 180.0;
    (cx + radius * rad.cos(), cy + radius * rad.sin())
}

/// SVG path data for one filled ring sector: outer arc forward, straight
/// edge inward, inner arc back, closed.
pub fn slice_path(geometry: &DonutGeometry, slice: &ArcSlice) -> String {
    let (cx, cy) = geometry.center();
    let large = if slice.sweep_deg() > 180.0 { 1 } else { 0 };

    let (outer_start_x, outer_start_y) = polar(cx, cy, geometry.outer_radius, slice.start_deg);
    let (outer_end_x, outer_end_y) = polar(cx, cy, geometry.outer_radius, slice.end_deg);
    let (inner_end_x, inner_end_y) = polar(cx, cy, geometry.inner_radius, slice.end_deg);
    let (inner_start_x, inner_start_y) = polar(cx, cy, geometry.inner_radius, slice.start_deg);

    let outer = geometry.outer_radius;
    let inner = geometry.inner_radius;
    format!(
        "M {outer_start_x} {outer_start_y} \
         A {outer} {outer} 0 {large} 1 {outer_end_x} {outer_end_y} \
         L {inner_end_x} {inner_end_y} \
         A {inner} {inner} 0 {large} 0 {inner_start_x} {inner_start_y} Z"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn inactive_categories_are_skipped_but_keep_their_color_slot() {
        let allocation = normalize_allocation(&AllocationInput {
            equities: Some(50.0),
            fixed_income: Some(30.0),
            real_estate: Some(0.0),
            liquidity: Some(20.0),
        });
        assert_approx(allocation.total, 100.0);

        let slices = build_arcs(&allocation);
        assert_eq!(slices.len(), 3);

        assert_approx(slices[0].start_deg, 0.0);
        assert_approx(slices[0].sweep_deg(), 180.0);
        assert_eq!(slices[0].color_index, 0);

        assert_approx(slices[1].start_deg, 180.0);
        assert_approx(slices[1].sweep_deg(), 108.0);
        assert_eq!(slices[1].color_index, 1);

        assert_approx(slices[2].start_deg, 288.0);
        assert_approx(slices[2].sweep_deg(), 72.0);
        assert_eq!(slices[2].color_index, 3);

        assert_approx(slices[2].end_deg, 360.0);
    }

    #[test]
    fn zero_total_emits_no_slices() {
        let empty = normalize_allocation(&AllocationInput::default());
        assert!(!empty.has_data());
        assert!(build_arcs(&empty).is_empty());
        assert_approx(empty.share_percent(0.0), 0.0);
    }

    #[test]
    fn missing_and_invalid_values_coerce_to_zero() {
        let allocation = normalize_allocation(&AllocationInput {
            equities: Some(f64::NAN),
            fixed_income: Some(-10.0),
            real_estate: None,
            liquidity: Some(40.0),
        });
        assert_approx(allocation.equities, 0.0);
        assert_approx(allocation.fixed_income, 0.0);
        assert_approx(allocation.real_estate, 0.0);
        assert_approx(allocation.liquidity, 40.0);
        assert_approx(allocation.total, 40.0);

        let slices = build_arcs(&allocation);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].color_index, 3);
        assert_approx(slices[0].sweep_deg(), 360.0);
    }

    #[test]
    fn shares_report_each_category_fraction_of_total() {
        let allocation = normalize_allocation(&AllocationInput {
            equities: Some(25.0),
            fixed_income: Some(75.0),
            real_estate: None,
            liquidity: None,
        });
        assert_approx(allocation.share_percent(allocation.equities), 25.0);
        assert_approx(allocation.share_percent(allocation.fixed_income), 75.0);
    }

    #[test]
    fn slice_path_traces_a_closed_ring_sector() {
        let geometry = DonutGeometry::default();
        let slice = ArcSlice {
            start_deg: 0.0,
            end_deg: 90.0,
            color_index: 0,
        };
        let path = slice_path(&geometry, &slice);

        // Starts at 12 o'clock on the outer radius (110, 10), sweeps to
        // 3 o'clock (210, 110), cuts in to the inner radius, returns, closes.
        assert!(path.starts_with("M 110 10 "), "path was {path}");
        assert!(path.contains("A 100 100 0 0 1 210 110"), "path was {path}");
        assert!(path.contains("L 168 110"), "path was {path}");
        assert!(path.contains("A 58 58 0 0 0"), "path was {path}");
        assert!(path.ends_with('Z'), "path was {path}");
    }

    #[test]
    fn wide_slices_set_the_large_arc_flag() {
        let geometry = DonutGeometry::default();
        let slice = ArcSlice {
            start_deg: 0.0,
            end_deg: 270.0,
            color_index: 1,
        };
        let path = slice_path(&geometry, &slice);
        assert!(path.contains("A 100 100 0 1 1"), "path was {path}");
        assert!(path.contains("A 58 58 0 1 0"), "path was {path}");
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_active_sweeps_close_the_circle(
            equities in 0u32..10_000,
            fixed_income in 0u32..10_000,
            real_estate in 0u32..10_000,
            liquidity in 0u32..10_000
        ) {
            let allocation = normalize_allocation(&AllocationInput {
                equities: Some(equities as f64),
                fixed_income: Some(fixed_income as f64),
                real_estate: Some(real_estate as f64),
                liquidity: Some(liquidity as f64),
            });
            let slices = build_arcs(&allocation);

            if allocation.total <= 0.0 {
                prop_assert!(slices.is_empty());
            } else {
                let swept: f64 = slices.iter().map(ArcSlice::sweep_deg).sum();
                prop_assert!((swept - 360.0).abs() <= 1e-9);

                // Contiguous, ordered, non-overlapping.
                let mut cursor = 0.0;
                for slice in &slices {
                    prop_assert!((slice.start_deg - cursor).abs() <= 1e-9);
                    prop_assert!(slice.sweep_deg() > 0.0);
                    cursor = slice.end_deg;
                }
            }
        }
    }
}
