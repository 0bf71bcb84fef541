//! # Structural Type Descriptors
//!
//! [`TypeShape`] is the runtime mirror of the compile-time decomposition an
//! [`Element`](crate::Element) impl performs. It is pure metadata recomputed
//! from the type, never stored as container state, and exists so that
//! type-erased boundaries (buffer reinterpretation, diagnostics) can compare
//! element types *structurally*: two records with identical lane counts but
//! different field names are distinct shapes.

use crate::scalar::ScalarKind;

/// Recursive structural description of an element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// One numeric lane of the base scalar type.
    Leaf(ScalarKind),
    /// A zero-lane placeholder (e.g. `PhantomData`). Contributes an offset
    /// entry but no lanes and does not shift subsequent offsets.
    Unit,
    /// An anonymous fixed-arity aggregate.
    Tuple(Vec<TypeShape>),
    /// A fixed-length homogeneous aggregate.
    Array {
        /// Number of repetitions.
        len: usize,
        /// Shape of one repetition.
        elem: Box<TypeShape>,
    },
    /// A named record with named members, in declaration order.
    Record {
        /// The record's type name.
        name: &'static str,
        /// Member names and shapes, in declaration order.
        fields: Vec<(&'static str, TypeShape)>,
    },
}

impl TypeShape {
    /// Total number of numeric lanes this shape occupies.
    pub fn lanes(&self) -> usize {
        match self {
            TypeShape::Leaf(_) => 1,
            TypeShape::Unit => 0,
            TypeShape::Tuple(children) => children.iter().map(TypeShape::lanes).sum(),
            TypeShape::Array { len, elem } => len * elem.lanes(),
            TypeShape::Record { fields, .. } => fields.iter().map(|(_, s)| s.lanes()).sum(),
        }
    }

    /// The base scalar kind of the first leaf, if any leaf exists.
    ///
    /// All leaves share one kind; mixed-kind shapes cannot be constructed
    /// through the [`Element`](crate::Element) machinery.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            TypeShape::Leaf(kind) => Some(*kind),
            TypeShape::Unit => None,
            TypeShape::Tuple(children) => children.iter().find_map(TypeShape::scalar_kind),
            TypeShape::Array { elem, .. } => elem.scalar_kind(),
            TypeShape::Record { fields, .. } => {
                fields.iter().find_map(|(_, s)| s.scalar_kind())
            }
        }
    }

    /// Flat offset table: for every leaf, in declaration order, its lane
    /// offset from the start of one packed instance.
    ///
    /// The offset of member `k` of an aggregate equals the offset of member
    /// `k - 1` plus that member's lane count (offset additivity).
    pub fn leaf_offsets(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.lanes());
        self.collect_offsets(0, &mut out);
        out
    }

    fn collect_offsets(&self, base: usize, out: &mut Vec<usize>) {
        match self {
            TypeShape::Leaf(_) => out.push(base),
            TypeShape::Unit => {}
            TypeShape::Tuple(children) => {
                let mut off = base;
                for child in children {
                    child.collect_offsets(off, out);
                    off += child.lanes();
                }
            }
            TypeShape::Array { len, elem } => {
                let mut off = base;
                for _ in 0..*len {
                    elem.collect_offsets(off, out);
                    off += elem.lanes();
                }
            }
            TypeShape::Record { fields, .. } => {
                let mut off = base;
                for (_, child) in fields {
                    child.collect_offsets(off, out);
                    off += child.lanes();
                }
            }
        }
    }
}

impl core::fmt::Display for TypeShape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TypeShape::Leaf(kind) => write!(f, "{kind}"),
            TypeShape::Unit => write!(f, "()"),
            TypeShape::Tuple(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
            TypeShape::Array { len, elem } => write!(f, "[{elem}; {len}]"),
            TypeShape::Record { name, fields } => {
                write!(f, "{name} {{ ")?;
                for (i, (fname, child)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{fname}: {child}")?;
                }
                write!(f, " }}")
            }
        }
    }
}
