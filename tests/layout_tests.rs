//! Layout-variant indexing contracts and construction invariants.

use gridflow::{
    Axis, Column, Complex, ExtrudedLaneInner, ExtrudedLaneOuter, Field, Layout, LayoutError,
    Plane, SizeSpec,
};

#[test]
fn size_spec_builds_every_variant() {
    let spec = SizeSpec {
        elements: 4,
        nodes: 3,
        levels: 10,
    };
    assert_eq!(spec.column().expect("layout").points(), 10);
    assert_eq!(spec.plane().expect("layout").points(), 36);
    assert_eq!(spec.extruded_lane_inner().expect("layout").points(), 360);
    assert_eq!(spec.extruded_lane_outer().expect("layout").points(), 360);
}

#[test]
fn zero_extents_never_construct() {
    assert!(Column::new(0).is_err());
    assert!(Plane::new(0, 4).is_err());
    assert!(Plane::new(4, 0).is_err());
    assert!(ExtrudedLaneInner::new(4, 4, 0).is_err());
    assert!(ExtrudedLaneOuter::new(0, 4, 4).is_err());
}

#[test]
fn backing_length_must_equal_points_times_lanes() {
    let layout = Plane::new(2, 2).expect("layout");
    // 8 points x 2 lanes = 16 scalars; one short must fail.
    let short = Field::<Complex<f64>, _>::from_raw(layout, vec![0.0; 15]);
    assert!(matches!(short, Err(LayoutError::Construction { .. })));
    let long = Field::<Complex<f64>, _>::from_raw(layout, vec![0.0; 17]);
    assert!(matches!(long, Err(LayoutError::Construction { .. })));
    let exact = Field::<Complex<f64>, _>::from_raw(layout, vec![0.0; 16]);
    assert!(exact.is_ok());
}

#[test]
fn adoption_is_zero_copy_and_lane_faithful() {
    let layout = Column::new(2).expect("layout");
    // Column is lane-innermost: [re0, im0, re1, im1].
    let field =
        Field::<Complex<f64>, _>::from_raw(layout, vec![1.0, 2.0, 3.0, 4.0]).expect("length");
    assert_eq!(field.get(0).expect("in range"), Complex::new(1.0, 2.0));
    assert_eq!(field.get(1).expect("in range"), Complex::new(3.0, 4.0));
}

#[test]
fn plane_lane_slabs_are_raw_contiguous_slices() {
    // 2x2 nodes, 2 elements, element type (Complex, f64): summing a lane
    // over all points equals summing the matching raw slices.
    let layout = Plane::new(2, 2).expect("layout");
    let field = Field::<(Complex<f64>, f64), _>::from_fn(layout, |p| {
        (Complex::new(p as f64, 100.0 + p as f64), -(p as f64))
    });

    for lane in 0..3 {
        let from_view: f64 = field
            .lane(lane)
            .expect("lane in range")
            .iter()
            .sum();
        let from_slabs: f64 = (0..2)
            .map(|e| {
                field
                    .lane_slab(e, lane)
                    .expect("in range")
                    .iter()
                    .sum::<f64>()
            })
            .sum();
        assert_eq!(from_view, from_slabs);
    }

    // And the real-lane sum is the sum of the canonical point indices.
    let re_sum: f64 = field.lane(0).expect("lane").iter().sum();
    assert_eq!(re_sum, (0..8).sum::<usize>() as f64);
}

#[test]
fn extruded_lane_outer_keeps_each_lane_contiguous() {
    let layout = ExtrudedLaneOuter::new(2, 2, 3).expect("layout");
    let field = Field::<Complex<f64>, _>::from_fn(layout, |p| {
        Complex::new(p as f64, -(p as f64))
    });
    let re_plane = field.lane_plane(0).expect("in range");
    let im_plane = field.lane_plane(1).expect("in range");
    assert_eq!(re_plane.len(), layout.points());
    for p in 0..layout.points() {
        assert_eq!(re_plane[p], p as f64);
        assert_eq!(im_plane[p], -(p as f64));
    }
}

#[test]
fn lane_inner_memory_interleaves_lanes() {
    let layout = ExtrudedLaneInner::new(1, 1, 3).expect("layout");
    let field = Field::<Complex<f64>, _>::from_fn(layout, |p| {
        Complex::new(p as f64, 0.5 + p as f64)
    });
    assert_eq!(field.as_slice(), &[0.0, 0.5, 1.0, 1.5, 2.0, 2.5]);
}

#[test]
fn coordinate_indexing_agrees_with_point_order() {
    let layout = ExtrudedLaneInner::new(2, 3, 4).expect("layout");
    let mut expected = 0usize;
    for element in 0..2 {
        for node_j in 0..3 {
            for node_i in 0..3 {
                for level in 0..4 {
                    let p = layout
                        .point_index(element, node_j, node_i, level)
                        .expect("in range");
                    assert_eq!(p, expected);
                    expected += 1;
                }
            }
        }
    }
    assert_eq!(expected, layout.points());
}

#[test]
fn out_of_range_coordinates_fail_with_index_errors() {
    let plane = Plane::new(2, 2).expect("layout");
    assert!(matches!(
        plane.point_index(2, 0, 0),
        Err(LayoutError::IndexOutOfRange {
            axis: Axis::Element,
            index: 2,
            extent: 2,
        })
    ));
    assert!(matches!(
        plane.point_index(0, 0, 5),
        Err(LayoutError::IndexOutOfRange {
            axis: Axis::NodeI,
            ..
        })
    ));
}

#[test]
fn axis_order_distinguishes_the_lane_placements() {
    // Fastest-varying last: lanes innermost vs outermost.
    assert_eq!(ExtrudedLaneInner::AXES.last(), Some(&Axis::Lane));
    assert_eq!(ExtrudedLaneOuter::AXES.first(), Some(&Axis::Lane));
    assert_eq!(Column::AXES, &[Axis::Level, Axis::Lane]);
}

#[test]
fn extent_queries_report_axes_per_variant() {
    let inner = ExtrudedLaneInner::new(2, 3, 4).expect("layout");
    assert_eq!(inner.extent(Axis::Element), Some(2));
    assert_eq!(inner.extent(Axis::NodeI), Some(3));
    assert_eq!(inner.extent(Axis::Level), Some(4));
    assert_eq!(inner.extent(Axis::Point), Some(36));

    let column = Column::new(7).expect("layout");
    assert_eq!(column.extent(Axis::Level), Some(7));
    assert_eq!(column.extent(Axis::Element), None);
}
