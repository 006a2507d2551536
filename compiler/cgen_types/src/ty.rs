//! Resolved field types.

use cgen_ir::{EnumId, ScalarKind, StructId};

/// A resolved type. Unlike [`cgen_ir::SchemaNode`] it has no unresolved names.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Ty {
    Scalar(ScalarKind),
    Str,
    Enum(EnumId),
    List(Box<Ty>),
    Map(Box<Ty>, Box<Ty>),
    Struct(StructId),
    Optional(Box<Ty>),
}

/// How the traversal treats a value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Shape {
    /// Scalar, string, bool, or enum.
    Leaf,
    /// A list or map with no struct anywhere inside. Visited as one leaf.
    LeafCollection,
    /// A struct, or a collection that contains one. Walked into.
    Container,
}

impl Ty {
    pub fn shape(&self) -> Shape {
        match self {
            Ty::Scalar(_) | Ty::Str | Ty::Enum(_) => Shape::Leaf,
            Ty::Struct(_) => Shape::Container,
            Ty::List(_) | Ty::Map(..) if self.contains_struct() => Shape::Container,
            Ty::List(_) | Ty::Map(..) => Shape::LeafCollection,
            Ty::Optional(inner) => inner.shape(),
        }
    }

    pub fn contains_struct(&self) -> bool {
        match self {
            Ty::Struct(_) => true,
            Ty::Scalar(_) | Ty::Str | Ty::Enum(_) => false,
            Ty::List(inner) | Ty::Optional(inner) => inner.contains_struct(),
            Ty::Map(key, value) => key.contains_struct() || value.contains_struct(),
        }
    }

    /// The scalar kind, looking through one level of `Optional`.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Ty::Scalar(kind) => Some(*kind),
            Ty::Optional(inner) => match **inner {
                Ty::Scalar(kind) => Some(kind),
                _ => None,
            },
            _ => None,
        }
    }

    /// This type with any outer `Optional`s removed.
    pub fn strip_optional(&self) -> &Ty {
        match self {
            Ty::Optional(inner) => inner.strip_optional(),
            other => other,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Ty::Optional(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(inner: Ty) -> Ty {
        Ty::List(Box::new(inner))
    }

    #[test]
    fn test_shapes() {
        let sub = Ty::Struct(StructId::new(0));
        assert_eq!(Ty::Scalar(ScalarKind::I32).shape(), Shape::Leaf);
        assert_eq!(Ty::Enum(EnumId::new(0)).shape(), Shape::Leaf);
        assert_eq!(list(Ty::Str).shape(), Shape::LeafCollection);
        assert_eq!(
            Ty::Map(Box::new(Ty::Str), Box::new(list(Ty::Str))).shape(),
            Shape::LeafCollection
        );
        assert_eq!(sub.shape(), Shape::Container);
        assert_eq!(list(Ty::Optional(Box::new(sub.clone()))).shape(), Shape::Container);
        assert_eq!(Ty::Optional(Box::new(Ty::Str)).shape(), Shape::Leaf);
        assert_eq!(Ty::Optional(Box::new(sub)).shape(), Shape::Container);
    }

    #[test]
    fn test_scalar_kind_through_optional() {
        let opt = Ty::Optional(Box::new(Ty::Scalar(ScalarKind::U16)));
        assert_eq!(opt.scalar_kind(), Some(ScalarKind::U16));
        assert_eq!(list(Ty::Scalar(ScalarKind::U16)).scalar_kind(), None);
        assert_eq!(opt.strip_optional(), &Ty::Scalar(ScalarKind::U16));
    }
}
