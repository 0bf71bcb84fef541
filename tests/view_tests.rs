//! Sub-structuring: slabs, columns, projections, reinterpretation.

use gridflow::{
    soa_element, Axis, Column, Complex, Element, ExtrudedLaneInner, ExtrudedLaneOuter, Field,
    LayoutError, Plane,
};

soa_element! {
    /// Horizontal wind components.
    pub struct Wind<F> {
        pub u: F,
        pub v: F,
    }
}

soa_element! {
    /// Same memory size as [`Wind`], different names.
    pub struct Stress<F> {
        pub tau_x: F,
        pub tau_y: F,
    }
}

#[test]
fn slab_shares_the_parent_storage() {
    let layout = Plane::new(3, 2).expect("layout");
    let mut field = Field::<Wind<f64>, _>::zeroed(layout);

    // Mutate through the slab, observe through the parent.
    {
        let mut slab = field.slab_mut(1).expect("in range");
        slab.set(0, Wind { u: 5.0, v: -5.0 }).expect("in range");
    }
    let p = layout.point_index(1, 0, 0).expect("in range");
    assert_eq!(field.get(p).expect("in range"), Wind { u: 5.0, v: -5.0 });

    // Mutate through the parent, observe through a fresh slab.
    field.set(p, Wind { u: 9.0, v: 0.0 }).expect("in range");
    let slab = field.slab(1).expect("in range");
    assert_eq!(slab.get(0).expect("in range"), Wind { u: 9.0, v: 0.0 });
}

#[test]
fn slab_bounds_are_checked_eagerly() {
    let layout = Plane::new(2, 2).expect("layout");
    let field = Field::<f64, _>::zeroed(layout);
    // elementCount and beyond are rejected up front.
    assert!(matches!(
        field.slab(2),
        Err(LayoutError::IndexOutOfRange {
            axis: Axis::Element,
            ..
        })
    ));
    assert!(matches!(
        field.slab(3),
        Err(LayoutError::IndexOutOfRange {
            axis: Axis::Element,
            ..
        })
    ));
}

#[test]
fn slab_range_spans_multiple_elements() {
    let layout = Plane::new(4, 2).expect("layout");
    let field = Field::<f64, _>::from_fn(layout, |p| p as f64);
    let pair = field.slab_range(1..3).expect("in range");
    assert_eq!(pair.points(), 8);
    // First point of the range is element 1's first point.
    let first = layout.point_index(1, 0, 0).expect("in range");
    assert_eq!(pair.get(0).expect("in range"), first as f64);
}

#[test]
fn column_view_walks_one_vertical_column() {
    let layout = ExtrudedLaneInner::new(2, 2, 5).expect("layout");
    let mut field = Field::<Complex<f64>, _>::from_fn(layout, |p| Complex::new(p as f64, 0.0));

    let column = field.column(1, 1, 0).expect("in range");
    assert_eq!(column.points(), 5);
    for level in 0..5 {
        let p = layout.point_index(1, 1, 0, level).expect("in range");
        assert_eq!(column.get(level).expect("in range"), Complex::new(p as f64, 0.0));
    }

    // Mutation through a column is visible in the parent.
    {
        let mut column = field.column_mut(1, 1, 0).expect("in range");
        column.set(2, Complex::new(-1.0, -2.0)).expect("in range");
    }
    let p = layout.point_index(1, 1, 0, 2).expect("in range");
    assert_eq!(field.get(p).expect("in range"), Complex::new(-1.0, -2.0));
}

#[test]
fn lane_outer_slab_strides_through_the_parent() {
    let layout = ExtrudedLaneOuter::new(3, 2, 2).expect("layout");
    let mut field = Field::<Wind<f64>, _>::zeroed(layout);

    // Mutate through the slab, observe through the parent.
    {
        let mut slab = field.slab_mut(1).expect("in range");
        assert_eq!(slab.points(), 8);
        slab.set(0, Wind { u: 5.0, v: -5.0 }).expect("in range");
    }
    let p = layout.point_index(1, 0, 0, 0).expect("in range");
    assert_eq!(field.get(p).expect("in range"), Wind { u: 5.0, v: -5.0 });

    // Mutate through the parent, observe through a fresh slab.
    field.set(p, Wind { u: 9.0, v: 0.0 }).expect("in range");
    let slab = field.slab(1).expect("in range");
    assert_eq!(slab.get(0).expect("in range"), Wind { u: 9.0, v: 0.0 });

    // The element index is checked eagerly, not on first access.
    assert!(matches!(
        field.slab(3),
        Err(LayoutError::IndexOutOfRange {
            axis: Axis::Element,
            ..
        })
    ));
}

#[test]
fn lane_outer_column_follows_the_canonical_point_order() {
    let layout = ExtrudedLaneOuter::new(2, 2, 4).expect("layout");
    let mut field = Field::<Complex<f64>, _>::from_fn(layout, |p| Complex::new(p as f64, 0.0));

    let column = field.column(1, 0, 1).expect("in range");
    assert_eq!(column.points(), 4);
    for level in 0..4 {
        let p = layout.point_index(1, 0, 1, level).expect("in range");
        assert_eq!(
            column.get(level).expect("in range"),
            Complex::new(p as f64, 0.0)
        );
    }

    // Mutation through a column is visible in the parent.
    {
        let mut column = field.column_mut(1, 0, 1).expect("in range");
        column.set(3, Complex::new(-2.0, 1.0)).expect("in range");
    }
    let p = layout.point_index(1, 0, 1, 3).expect("in range");
    assert_eq!(field.get(p).expect("in range"), Complex::new(-2.0, 1.0));
}

#[test]
fn typed_projection_reads_a_sub_record() {
    let layout = Column::new(3).expect("layout");
    let field = Field::<(Complex<f64>, f64), _>::from_fn(layout, |p| {
        (Complex::new(p as f64, 10.0 + p as f64), -(p as f64))
    });

    let complexes = field
        .project::<Complex<f64>>(0..2)
        .expect("width matches");
    for p in 0..3 {
        assert_eq!(
            complexes.get(p).expect("in range"),
            Complex::new(p as f64, 10.0 + p as f64)
        );
    }

    let reals = field.project::<f64>(2..3).expect("width matches");
    assert_eq!(reals.get(1).expect("in range"), -1.0);
}

#[test]
fn projection_by_record_field_name() {
    let layout = Column::new(4).expect("layout");
    let mut field = Field::<Wind<f64>, _>::zeroed(layout);
    field.set(2, Wind { u: 3.0, v: 4.0 }).expect("in range");

    let v_lane = Wind::<f64>::lanes_of("v").expect("known field");
    let v = field.project::<f64>(v_lane).expect("width matches");
    assert_eq!(v.get(2).expect("in range"), 4.0);
    assert_eq!(v.get(0).expect("in range"), 0.0);
}

#[test]
fn projection_mutation_is_visible_through_the_parent() {
    let layout = Column::new(2).expect("layout");
    let mut field = Field::<Wind<f64>, _>::zeroed(layout);
    {
        let mut u = field
            .project_mut::<f64>(Wind::<f64>::lanes_of("u").expect("known field"))
            .expect("width matches");
        u.fill(7.0);
    }
    assert_eq!(field.get(0).expect("in range"), Wind { u: 7.0, v: 0.0 });
    assert_eq!(field.get(1).expect("in range"), Wind { u: 7.0, v: 0.0 });
}

#[test]
fn projection_width_mismatch_is_a_type_error() {
    let layout = Column::new(2).expect("layout");
    let field = Field::<(Complex<f64>, f64), _>::zeroed(layout);
    // One lane cannot be read as a two-lane complex.
    assert!(matches!(
        field.project::<Complex<f64>>(2..3),
        Err(LayoutError::TypeMismatch { .. })
    ));
    // Ranges beyond the lane count are index errors.
    assert!(matches!(
        field.project::<f64>(3..4),
        Err(LayoutError::IndexOutOfRange {
            axis: Axis::Lane,
            ..
        })
    ));
}

#[test]
fn inverted_projection_range_is_a_construction_error() {
    let layout = Column::new(2).expect("layout");
    let field = Field::<(Complex<f64>, f64), _>::zeroed(layout);
    assert!(matches!(
        field.project::<f64>(2..1),
        Err(LayoutError::Construction { .. })
    ));
}

#[test]
fn identically_sized_records_do_not_reinterpret() {
    let layout = Column::new(2).expect("layout");
    let wind = Field::<Wind<f64>, _>::zeroed(layout);
    // Same lane count, different field names: structurally distinct.
    assert_eq!(Wind::<f64>::LANES, Stress::<f64>::LANES);
    assert!(matches!(
        wind.reinterpret::<Stress<f64>>(),
        Err(LayoutError::TypeMismatch { .. })
    ));
}

#[test]
fn structurally_identical_types_reinterpret_in_place() {
    let layout = Column::new(2).expect("layout");
    let mut field = Field::<(f64, f64), _>::zeroed(layout);
    field.set(1, (1.0, 2.0)).expect("in range");
    let same = field.reinterpret::<(f64, f64)>().expect("same shape");
    assert_eq!(same.get(1).expect("in range"), (1.0, 2.0));
}
