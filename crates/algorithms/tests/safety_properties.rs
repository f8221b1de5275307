//! Navigational safety properties checked across every transform.
//!
//! Surfaces are synthetic: a sloping seabed with a deterministic jitter,
//! a few pits and a scattering of holes. Depths are negative with larger
//! values shoaler, so "safe" means every output is >= its input.

use bathysmooth_algorithms::morphology::{rolling_coin, shoal_buffer, StructuringElement};
use bathysmooth_algorithms::pipeline::{Pipeline, Step};
use bathysmooth_algorithms::smoothing::{interpolated_depth, laplacian_smooth, AxisWeights};
use bathysmooth_algorithms::surface::vertical_offset;
use bathysmooth_core::io::{read_geotiff, write_geotiff};
use bathysmooth_core::DepthGrid;

const NODATA: f32 = -9999.0;

/// Sloping seabed between roughly -80 and -20 with jitter, pits and holes
fn seabed(rows: usize, cols: usize, with_holes: bool) -> DepthGrid {
    let cells = (0..rows * cols)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            let hash = (row * 73 + col * 151 + row * col * 7) % 101;
            if with_holes && hash % 17 == 3 {
                NODATA
            } else if hash % 13 == 0 {
                -80.0 + row as f32 * 0.5
            } else {
                -60.0 + row as f32 * 0.8 + col as f32 * 0.3 - (hash % 9) as f32 * 0.75
            }
        })
        .collect();
    DepthGrid::from_samples(rows, cols, cells, NODATA, 2.0, 1.5).unwrap()
}

fn assert_holes_preserved(before: &DepthGrid, after: &DepthGrid) {
    assert_eq!(before.shape(), after.shape());
    assert_eq!(before.nodata(), after.nodata());
    for (i, (&a, &b)) in before.cells().iter().zip(after.cells()).enumerate() {
        if before.is_nodata(a) {
            assert_eq!(b, NODATA, "hole at index {} was overwritten with {}", i, b);
        } else {
            assert!(!after.is_nodata(b), "data at index {} became a hole", i);
        }
    }
}

fn assert_never_deeper(before: &DepthGrid, after: &DepthGrid) {
    for (i, (&a, &b)) in before.cells().iter().zip(after.cells()).enumerate() {
        if !before.is_nodata(a) {
            assert!(b >= a, "index {} deepened from {} to {}", i, a, b);
        }
    }
}

// ---------------------------------------------------------------------------
// No-data preservation
// ---------------------------------------------------------------------------

#[test]
fn shoal_buffer_preserves_holes() {
    let before = seabed(23, 31, true);
    let mut after = before.clone();
    shoal_buffer(&mut after).unwrap();
    assert_holes_preserved(&before, &after);
}

#[test]
fn rolling_coin_preserves_holes() {
    let before = seabed(23, 31, true);
    for (radius, trim) in [(1, false), (2, true), (3, false), (4, true), (6, false)] {
        let coin = StructuringElement::build(radius, trim).unwrap();
        let mut after = before.clone();
        rolling_coin(&mut after, &coin).unwrap();
        assert_holes_preserved(&before, &after);
    }
}

#[test]
fn laplacian_preserves_holes() {
    let before = seabed(23, 31, true);
    for iterations in [1, 2, 5, 12] {
        let mut after = before.clone();
        laplacian_smooth(&mut after, iterations).unwrap();
        assert_holes_preserved(&before, &after);
    }
}

#[test]
fn offset_preserves_holes() {
    let before = seabed(23, 31, true);
    let mut after = before.clone();
    vertical_offset(&mut after, 1.25).unwrap();
    assert_holes_preserved(&before, &after);
}

// ---------------------------------------------------------------------------
// Never deeper
// ---------------------------------------------------------------------------

#[test]
fn shoal_buffer_never_deepens() {
    let before = seabed(19, 27, true);
    let mut after = before.clone();
    shoal_buffer(&mut after).unwrap();
    assert_never_deeper(&before, &after);
}

#[test]
fn rolling_coin_never_deepens() {
    let before = seabed(19, 27, true);
    for radius in 1..=5 {
        let coin = StructuringElement::disk(radius).unwrap();
        let mut after = before.clone();
        rolling_coin(&mut after, &coin).unwrap();
        assert_never_deeper(&before, &after);
    }
}

#[test]
fn laplacian_never_deepens_negative_surface() {
    let before = seabed(19, 27, true);
    let mut after = before.clone();
    laplacian_smooth(&mut after, 8).unwrap();
    assert_never_deeper(&before, &after);
}

#[test]
fn full_chain_never_deepens() {
    let before = seabed(21, 21, true);
    let mut after = before.clone();
    shoal_buffer(&mut after).unwrap();
    rolling_coin(&mut after, &StructuringElement::build(3, true).unwrap()).unwrap();
    laplacian_smooth(&mut after, 3).unwrap();
    assert_holes_preserved(&before, &after);
    assert_never_deeper(&before, &after);
}

// ---------------------------------------------------------------------------
// Laplacian selection
// ---------------------------------------------------------------------------

#[test]
fn laplacian_picks_original_or_estimate() {
    let before = seabed(17, 13, true);
    let mut after = before.clone();
    laplacian_smooth(&mut after, 1).unwrap();

    let weights = AxisWeights::from_resolution(before.x_res(), before.y_res());
    let view = before.view();
    for row in 0..before.rows() {
        for col in 0..before.cols() {
            let z = before.get(row, col).unwrap();
            let out = after.get(row, col).unwrap();
            if before.is_nodata(z) {
                continue;
            }
            match interpolated_depth(&view, row, col, NODATA, weights) {
                Some(est) => {
                    assert!(out == z || out == est, "({row}, {col}): {out} is neither {z} nor {est}");
                    assert!(out.abs() <= z.abs());
                    assert!(out.abs() <= z.abs().max(est.abs()));
                }
                None => assert_eq!(out, z),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Repeated application
// ---------------------------------------------------------------------------

#[test]
fn repeated_rolling_coin_only_shoals() {
    let coin = StructuringElement::disk(3).unwrap();
    let original = seabed(25, 25, true);
    let mut previous = original.clone();
    for _ in 0..3 {
        let mut next = previous.clone();
        rolling_coin(&mut next, &coin).unwrap();
        assert_holes_preserved(&original, &next);
        assert_never_deeper(&previous, &next);
        previous = next;
    }
}

#[test]
fn repeated_laplacian_only_shoals() {
    let original = seabed(15, 18, true);
    let mut previous = original.clone();
    for _ in 0..4 {
        let mut next = previous.clone();
        laplacian_smooth(&mut next, 1).unwrap();
        assert_never_deeper(&previous, &next);
        previous = next;
    }
    let mut batched = original.clone();
    laplacian_smooth(&mut batched, 4).unwrap();
    assert_eq!(batched.cells(), previous.cells());
}

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn spike_grid_buffer_scenario() {
    let mut cells = vec![10.0_f32; 25];
    cells[12] = 5.0;
    let mut grid = DepthGrid::from_samples(5, 5, cells, NODATA, 1.0, 1.0).unwrap();
    shoal_buffer(&mut grid).unwrap();
    assert!(grid.cells().iter().all(|&v| v == 10.0));
}

#[test]
fn radius_three_coin_scenario() {
    let coin = StructuringElement::build(3, false).unwrap();
    let mask = coin.mask();
    assert_eq!(mask.dim(), (7, 7));
    assert!(mask[[3, 3]]);
    assert!(!mask[[0, 0]]);
    assert!(mask[[0, 3]]);
}

// ---------------------------------------------------------------------------
// Holes near a zero sentinel
// ---------------------------------------------------------------------------

/// 5x5 at -10 with a -30 pit and three holes around sentinel 0.0, two of
/// them perturbed within the no-data tolerance
fn zero_sentinel_grid() -> DepthGrid {
    let mut cells = vec![-10.0_f32; 25];
    cells[12] = -30.0;
    cells[0] = 3e-6;
    cells[24] = -3e-6;
    cells[4] = 0.0;
    DepthGrid::from_samples(5, 5, cells, 0.0, 1.0, 1.0).unwrap()
}

const ZERO_SENTINEL_HOLES: [usize; 3] = [0, 4, 24];

#[test]
fn rolling_coin_writes_exact_zero_sentinel() {
    let mut grid = zero_sentinel_grid();
    rolling_coin(&mut grid, &StructuringElement::disk(1).unwrap()).unwrap();
    for i in ZERO_SENTINEL_HOLES {
        assert_eq!(grid.cells()[i].to_bits(), 0.0_f32.to_bits(), "index {}", i);
    }
    assert_eq!(grid.get(2, 2).unwrap(), -10.0);
    assert_eq!(grid.get(0, 1).unwrap(), -10.0);
}

#[test]
fn laplacian_writes_exact_zero_sentinel() {
    let mut grid = zero_sentinel_grid();
    laplacian_smooth(&mut grid, 2).unwrap();
    for i in ZERO_SENTINEL_HOLES {
        assert_eq!(grid.cells()[i].to_bits(), 0.0_f32.to_bits(), "index {}", i);
    }
    // Holes are missing neighbours, not near-zero soundings
    assert_eq!(grid.get(0, 1).unwrap(), -10.0);
    assert_eq!(grid.get(4, 3).unwrap(), -10.0);
    assert_eq!(grid.get(2, 2).unwrap(), -10.0);
}

#[test]
fn shoal_buffer_keeps_perturbed_holes() {
    let before = zero_sentinel_grid();
    let mut after = before.clone();
    shoal_buffer(&mut after).unwrap();
    for i in ZERO_SENTINEL_HOLES {
        assert!(after.is_nodata(after.cells()[i]), "index {}", i);
    }
    // A hole dominates the window of (0,1), so it keeps its value
    assert_eq!(after.get(0, 1).unwrap(), -10.0);
}

// ---------------------------------------------------------------------------
// GeoTIFF through a pipeline
// ---------------------------------------------------------------------------

#[test]
fn pipeline_roundtrip_through_geotiff() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("survey.tif");
    let output = dir.path().join("survey_smoothed_surface.tif");

    let before = seabed(16, 20, true);
    write_geotiff(&before, &input).unwrap();

    let pipeline = Pipeline::from_json(
        r#"{"steps": [
            {"op": "buffer"},
            {"op": "rolling_coin", "radius": 2},
            {"op": "laplacian", "iterations": 2}
        ]}"#,
    )
    .unwrap();

    let mut grid = read_geotiff(&input).unwrap();
    pipeline.run(&mut grid).unwrap();
    write_geotiff(&grid, &output).unwrap();

    let after = read_geotiff(&output).unwrap();
    assert_eq!(after.cells(), grid.cells());
    assert_holes_preserved(&before, &after);
    assert_never_deeper(&before, &after);

    let mut direct = before.clone();
    for step in [
        Step::Buffer,
        Step::RollingCoin { radius: 2, trim: false },
        Step::Laplacian { iterations: 2 },
    ] {
        step.apply(&mut direct).unwrap();
    }
    assert_eq!(direct.cells(), after.cells());
}
