//! Validates render-pass behavior over the public API: grid derivation,
//! placement records, reproducibility, base layers, and hover magnification

use image::{Rgba, RgbaImage};
use mosaicker::MosaicError;
use mosaicker::io::image::SampleSet;
use mosaicker::render::blend::CompositeMode;
use mosaicker::render::renderer::{MosaicRenderer, RenderConfig};
use mosaicker::render::sampler::ColorGrid;
use mosaicker::spatial::TileGrid;

fn gradient_source(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            90,
            255,
        ])
    })
}

fn solid_samples(colors: &[[u8; 4]]) -> SampleSet {
    SampleSet::from_images(
        colors
            .iter()
            .map(|&c| RgbaImage::from_pixel(16, 16, Rgba(c)))
            .collect(),
    )
}

fn completed_renderer(
    source: &RgbaImage,
    samples: &SampleSet,
    config: RenderConfig,
    seed: u64,
) -> MosaicRenderer {
    let mut renderer = MosaicRenderer::new(source, samples, config, Some(seed))
        .unwrap_or_else(|e| unreachable!("render pass failed to start: {e}"));
    renderer.run();
    assert!(renderer.is_complete());
    renderer
}

#[test]
fn test_color_grid_size_for_all_column_counts() {
    let source = gradient_source(400, 200);
    for columns in 2..=200u32 {
        let grid = TileGrid::derive(400, 200, columns, 1000);
        let colors = ColorGrid::sample(&source, &grid);
        let expected = columns as usize * (f64::from(columns) * 0.5).floor() as usize;
        assert_eq!(colors.len(), expected, "columns={columns}");
    }
}

#[test]
fn test_reference_scenario_surface_dimensions() {
    let source = gradient_source(1000, 500);
    let samples = solid_samples(&[[255, 0, 0, 255]]);
    let config = RenderConfig {
        tile_columns: 50,
        ..RenderConfig::default()
    };
    let renderer = MosaicRenderer::new(&source, &samples, config, Some(1))
        .unwrap_or_else(|e| unreachable!("render pass failed to start: {e}"));

    assert_eq!(renderer.grid().rows(), 25);
    assert_eq!(renderer.grid().tile_size(), 20);
    assert_eq!(renderer.surface_pixels().width(), 1000);
    assert_eq!(renderer.surface_pixels().height(), 500);
    assert_eq!(renderer.tiles_total(), 1250);
}

#[test]
fn test_empty_sample_set_fails_fast() {
    let source = gradient_source(100, 100);
    let samples = SampleSet::from_images(Vec::new());
    let result = MosaicRenderer::new(&source, &samples, RenderConfig::default(), Some(1));
    assert!(matches!(result, Err(MosaicError::EmptySampleSet)));
}

#[test]
fn test_full_pass_fills_placements_and_takes_snapshot() {
    let source = gradient_source(128, 128);
    let samples = solid_samples(&[[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]]);
    let config = RenderConfig {
        tile_columns: 8,
        max_width: 256,
        ..RenderConfig::default()
    };
    let renderer = completed_renderer(&source, &samples, config, 5);

    assert!(renderer.placements().is_complete());
    assert_eq!(renderer.placements().len(), renderer.tiles_total());
    let snapshot = renderer
        .snapshot()
        .unwrap_or_else(|| unreachable!("completed pass must install a snapshot"));
    assert_eq!(snapshot.as_raw(), renderer.surface_pixels().as_raw());
}

#[test]
fn test_incremental_stepping_matches_budgets() {
    let source = gradient_source(128, 128);
    let samples = solid_samples(&[[10, 10, 10, 255]]);
    let config = RenderConfig {
        tile_columns: 10,
        max_width: 200,
        ..RenderConfig::default()
    };
    let mut renderer = MosaicRenderer::new(&source, &samples, config, Some(2))
        .unwrap_or_else(|e| unreachable!("render pass failed to start: {e}"));

    assert_eq!(renderer.tiles_drawn(), 0);
    assert!(renderer.step(7));
    assert_eq!(renderer.tiles_drawn(), 7);
    assert!(renderer.snapshot().is_none(), "snapshot must wait for the last tile");
    renderer.run();
    assert_eq!(renderer.tiles_drawn(), renderer.tiles_total());
    assert!(!renderer.step(1), "a drained queue reports no more work");
}

#[test]
fn test_same_seed_reproduces_identical_surfaces() {
    let source = gradient_source(200, 120);
    let samples = solid_samples(&[[250, 20, 20, 255], [20, 20, 250, 255], [20, 250, 20, 255]]);
    let config = RenderConfig {
        tile_columns: 12,
        max_width: 300,
        composite: CompositeMode::SourceOver,
        ..RenderConfig::default()
    };

    let a = completed_renderer(&source, &samples, config, 99);
    let b = completed_renderer(&source, &samples, config, 99);
    assert_eq!(a.surface_pixels().as_raw(), b.surface_pixels().as_raw());

    let c = completed_renderer(&source, &samples, config, 100);
    assert_ne!(
        a.surface_pixels().as_raw(),
        c.surface_pixels().as_raw(),
        "different seeds should place different samples"
    );
}

#[test]
fn test_non_pixelated_zero_alpha_keeps_base_image() {
    // With compositing fully transparent and fills skipped, the surface is
    // exactly the source scaled to surface dimensions
    let source = gradient_source(300, 150);
    let samples = solid_samples(&[[255, 255, 255, 255]]);
    let config = RenderConfig {
        tile_columns: 10,
        tile_alpha: 0.0,
        composite: CompositeMode::SourceOver,
        pixelated: false,
        max_width: 500,
        ..RenderConfig::default()
    };
    let renderer = completed_renderer(&source, &samples, config, 3);

    let expected = image::imageops::resize(
        &source,
        renderer.surface_pixels().width(),
        renderer.surface_pixels().height(),
        image::imageops::FilterType::Triangle,
    );
    assert_eq!(renderer.surface_pixels().as_raw(), expected.as_raw());
}

#[test]
fn test_pixelated_zero_alpha_shows_fill_colors() {
    let source = gradient_source(300, 150);
    let samples = solid_samples(&[[255, 255, 255, 255]]);
    let config = RenderConfig {
        tile_columns: 10,
        tile_alpha: 0.0,
        composite: CompositeMode::SourceOver,
        pixelated: true,
        max_width: 500,
        ..RenderConfig::default()
    };
    let renderer = completed_renderer(&source, &samples, config, 3);

    let tile = renderer.grid().tile_size();
    for (col, row) in [(0u32, 0u32), (4, 2), (9, 4)] {
        let expected = renderer
            .colors()
            .get(col, row)
            .unwrap_or_else(|| unreachable!("tile ({col}, {row}) has no fill color"));
        let (x, y) = (col * tile, row * tile);
        assert_eq!(
            *renderer.surface_pixels().get_pixel(x + 1, y + 1),
            expected,
            "tile ({col}, {row})"
        );
    }
}

#[test]
fn test_magnifier_is_idempotent_at_one_position() {
    let source = gradient_source(1000, 500);
    let samples = solid_samples(&[[200, 40, 40, 255], [40, 200, 40, 255]]);
    let config = RenderConfig {
        tile_columns: 50,
        ..RenderConfig::default()
    };
    let mut renderer = completed_renderer(&source, &samples, config, 11);

    assert!(renderer.magnify_at(&samples, (310.0, 140.0)));
    let once = renderer.surface_pixels().as_raw().clone();
    assert!(renderer.magnify_at(&samples, (310.0, 140.0)));
    assert_eq!(*renderer.surface_pixels().as_raw(), once);
}

#[test]
fn test_magnifier_corner_clamp_draws_recorded_sample_at_origin() {
    let source = gradient_source(1000, 500);
    let samples = solid_samples(&[[200, 40, 40, 255], [40, 200, 40, 255]]);
    let config = RenderConfig {
        tile_columns: 50,
        composite: CompositeMode::SourceOver,
        ..RenderConfig::default()
    };
    let mut renderer = completed_renderer(&source, &samples, config, 17);

    // hover 200 over 20px tiles at tile (0, 0): offset clamps to 0 on both
    // axes, so the magnified sample covers the surface's top-left corner
    assert!(renderer.magnify_at(&samples, (3.0, 7.0)));
    let placed = renderer
        .placements()
        .get(0, 0)
        .unwrap_or_else(|| unreachable!("tile (0, 0) has no recorded sample"));
    let sample_color = samples
        .get(placed)
        .map(|img| *img.get_pixel(0, 0))
        .unwrap_or_else(|| unreachable!("recorded sample index is out of range"));
    assert_eq!(*renderer.surface_pixels().get_pixel(0, 0), sample_color);
    assert_eq!(*renderer.surface_pixels().get_pixel(199, 199), sample_color);

    // One pixel past the magnified rect the baseline shows through
    let snapshot = renderer
        .snapshot()
        .unwrap_or_else(|| unreachable!("completed pass must install a snapshot"));
    assert_eq!(
        *renderer.surface_pixels().get_pixel(200, 200),
        *snapshot.get_pixel(200, 200)
    );
}

#[test]
fn test_magnifier_restores_baseline_between_positions() {
    let source = gradient_source(1000, 500);
    let samples = solid_samples(&[[200, 40, 40, 255], [40, 200, 40, 255], [40, 40, 200, 255]]);
    let config = RenderConfig {
        tile_columns: 50,
        ..RenderConfig::default()
    };

    let mut moved = completed_renderer(&source, &samples, config, 23);
    assert!(moved.magnify_at(&samples, (100.0, 100.0)));
    assert!(moved.magnify_at(&samples, (700.0, 300.0)));

    let mut direct = completed_renderer(&source, &samples, config, 23);
    assert!(direct.magnify_at(&samples, (700.0, 300.0)));

    assert_eq!(
        moved.surface_pixels().as_raw(),
        direct.surface_pixels().as_raw(),
        "a previous overlay must be fully undone by the baseline restore"
    );
}

#[test]
fn test_magnifier_is_a_noop_before_completion() {
    let source = gradient_source(200, 200);
    let samples = solid_samples(&[[1, 2, 3, 255]]);
    let config = RenderConfig {
        tile_columns: 10,
        max_width: 200,
        ..RenderConfig::default()
    };
    let mut renderer = MosaicRenderer::new(&source, &samples, config, Some(4))
        .unwrap_or_else(|e| unreachable!("render pass failed to start: {e}"));
    renderer.step(5);

    let before = renderer.surface_pixels().as_raw().clone();
    assert!(!renderer.magnify_at(&samples, (50.0, 50.0)));
    assert_eq!(*renderer.surface_pixels().as_raw(), before);
}

#[test]
fn test_zero_row_grid_is_rejected() {
    let source = gradient_source(2000, 100);
    let samples = solid_samples(&[[9, 9, 9, 255]]);
    let config = RenderConfig {
        tile_columns: 2,
        ..RenderConfig::default()
    };
    let result = MosaicRenderer::new(&source, &samples, config, Some(1));
    assert!(matches!(
        result,
        Err(MosaicError::InvalidParameter { parameter: "tile_columns", .. })
    ));
}
