use leopard::geometry::{Point, Polygon, CANVAS_SIZE};
use leopard::params::{map_parameters, Quality, SliderState, HIGH_QUALITY_MAX_SITES, LOW_QUALITY_MAX_SITES};
use leopard::path::{rounded_path, PathCommand};
use leopard::render::{gap_inset_ratio, inner_inset_ratio, render_sites, render_with, MAX_INNER_INSET, OUTER_INSET};
use leopard::rng::Lcg;
use leopard::svg::scene_paths;
use proptest::prelude::*;

fn slider_strategy() -> impl Strategy<Value = SliderState> {
    (
        0.0..=100.0f64,
        0.0..=100.0f64,
        0.0..=100.0f64,
        0.0..=100.0f64,
        0.0..=100.0f64,
        0.0..=100.0f64,
    )
        .prop_map(|(complexity, softness, display, chaos, quirk, rest)| SliderState {
            complexity,
            softness,
            display,
            chaos,
            quirk,
            rest,
        })
}

fn quality_strategy() -> impl Strategy<Value = Quality> {
    prop_oneof![Just(Quality::Low), Just(Quality::High)]
}

fn command_points(commands: &[PathCommand]) -> Vec<Point> {
    let mut points = Vec::new();
    for cmd in commands {
        match *cmd {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => points.push(p),
            PathCommand::QuadTo { ctrl, to } => {
                points.push(ctrl);
                points.push(to);
            }
            PathCommand::Close => {}
        }
    }
    points
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn site_count_respects_tier_cap(sliders in slider_strategy(), quality in quality_strategy()) {
        let p = map_parameters(&sliders, quality);
        let cap = match quality {
            Quality::Low => LOW_QUALITY_MAX_SITES,
            Quality::High => HIGH_QUALITY_MAX_SITES,
        };
        prop_assert!(p.count <= cap);
    }

    #[test]
    fn mapping_is_pure(sliders in slider_strategy(), quality in quality_strategy()) {
        prop_assert_eq!(map_parameters(&sliders, quality), map_parameters(&sliders, quality));
    }

    #[test]
    fn inner_ratio_stays_in_range(sliders in slider_strategy()) {
        let p = map_parameters(&sliders, Quality::High);
        let ratio = inner_inset_ratio(p.band);
        prop_assert!((OUTER_INSET..=MAX_INNER_INSET).contains(&ratio));
    }

    #[test]
    fn ring_vertices_stay_near_canvas(
        sliders in slider_strategy(),
        quality in quality_strategy(),
        seed in any::<u64>(),
    ) {
        // Canvas extended by the largest inset magnitude
        let margin = gap_inset_ratio(20.0).abs().max(MAX_INNER_INSET) * CANVAS_SIZE;
        let scene = render_with(&sliders, quality, &mut Lcg::new(seed));

        prop_assert_eq!(scene.params, map_parameters(&sliders, quality));
        prop_assert!(scene.len() <= scene.params.count);
        prop_assert!(scene.len() <= quality.max_sites());
        for shape in &scene.shapes {
            prop_assert!(shape.path.is_closed());
            prop_assert_eq!(shape.path.subpath_count(), 2);
            for p in command_points(shape.path.commands()) {
                prop_assert!(p.x.is_finite() && p.y.is_finite());
                prop_assert!(p.x >= -margin && p.x <= CANVAS_SIZE + margin);
                prop_assert!(p.y >= -margin && p.y <= CANVAS_SIZE + margin);
            }
        }
    }

    #[test]
    fn corner_radius_never_exceeds_half_edge(
        coords in prop::collection::vec((0.0..520.0f64, 0.0..520.0f64), 3..12),
        radius in 0.0..60.0f64,
    ) {
        let points: Vec<Point> = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
        let n = points.len();
        let path = rounded_path(&points, radius);
        let commands = path.commands();

        for i in 0..n {
            let prev = points[(i + n - 1) % n];
            let vertex = points[i];
            let next = points[(i + 1) % n];

            let entry = match commands[2 * i] {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p,
                ref other => panic!("unexpected command {:?}", other),
            };
            let PathCommand::QuadTo { ctrl, to } = commands[2 * i + 1] else {
                panic!("expected a quadratic segment");
            };

            prop_assert_eq!(ctrl, vertex);
            prop_assert!(entry.distance(vertex) <= prev.distance(vertex) / 2.0 + 1e-9);
            prop_assert!(to.distance(vertex) <= vertex.distance(next) / 2.0 + 1e-9);
            prop_assert!(entry.distance(vertex) <= radius + 1e-9);
        }
    }
}

#[test]
fn scenario_all_zero_low_quality() {
    let sliders = SliderState::uniform(0.0);
    let params = map_parameters(&sliders, Quality::Low);
    assert_eq!(params.count, 5);

    let scene = render_with(&sliders, Quality::Low, &mut Lcg::new(1));
    assert!(scene.len() <= 5);

    let svg = scene.to_svg();
    let paths = scene_paths(&svg).unwrap();
    assert_eq!(paths.len(), scene.len());
    for path in paths {
        assert!(path.is_closed());
    }
}

#[test]
fn scenario_full_complexity_high_quality() {
    let sliders = SliderState { complexity: 100.0, ..SliderState::default() };
    // round((10 + 110) * 1.0) = 120, capped
    assert_eq!(map_parameters(&sliders, Quality::High).count, 80);
}

#[test]
fn scenario_zero_gap_keeps_cell() {
    let sliders = SliderState { rest: 100.0 / 3.0, ..SliderState::default() };
    let params = map_parameters(&sliders, Quality::High);
    let ratio = gap_inset_ratio(params.gap);
    assert!(ratio.abs() < 1e-12);

    let cell = Polygon::rect(40.0, 40.0, 200.0, 120.0);
    let inset = cell.inset(ratio);
    for (a, b) in cell.vertices.iter().zip(&inset.vertices) {
        assert!(a.distance(*b) < 1e-9);
    }
}

#[test]
fn scenario_two_sites_split_canvas() {
    let sites = [Point::new(100.0, 260.0), Point::new(420.0, 260.0)];
    let left = leopard::render::voronoi_cell(&sites, 0).unwrap();
    let right = leopard::render::voronoi_cell(&sites, 1).unwrap();

    assert_eq!(left.len(), 4);
    assert_eq!(right.len(), 4);
    assert_eq!(left.bounding_box(), Some((0.0, 0.0, 260.0, CANVAS_SIZE)));
    assert_eq!(right.bounding_box(), Some((260.0, 0.0, CANVAS_SIZE, CANVAS_SIZE)));

    let sliders = SliderState::uniform(50.0);
    let params = map_parameters(&sliders, Quality::High);
    let scene = render_sites(&sites, &sliders, &params, &mut Lcg::new(3));
    assert_eq!(scene.len(), 2);
}
