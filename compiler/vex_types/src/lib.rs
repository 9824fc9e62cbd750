//! Vex Types - inhabitants of the source language's type universe.
//!
//! The interesting equalities live in [`Type::same`]:
//! - `Array(Array(T))` equals `Mat(T)` (matrices interoperate with 2-D
//!   arrays at type-check time)
//! - `Generic` equality is by name only
//! - `Symbolic` (the type of the `_` wildcard) equals every type
//!
//! The relations of the typing judgements ([`is_assignable_to`],
//! [`is_comparable_to`], [`is_array_like_comparable_to`],
//! [`common_supertype`]) live here too, so both the analyzer and the
//! interpreter agree on them.

mod display;

pub use display::TypeDisplay;

use vex_ir::{Name, NodeId};

/// A type of the source language.
///
/// Types are immutable; generic resolution state is *not* stored here.
/// The interpreter threads a per-call binding table keyed by the generic's
/// `(owner, name)` instead.
#[derive(Clone, Debug)]
pub enum Type {
    Int,
    Float,
    Bool,
    String,
    Void,
    /// The type of the `null` literal.
    Null,
    /// The type of type values (`var t: Type = Int`).
    Type,
    /// Ordered sequence with component type `T`.
    Array(Box<Type>),
    /// Two-dimensional matrix with (non-array-like) component type `T`.
    Mat(Box<Type>),
    /// Named record; identified by its declaration node.
    Struct(NodeId),
    /// Function signature.
    Fun {
        ret: Box<Type>,
        params: Box<[Type]>,
    },
    /// A type variable, bound at call time. `owner` is the declaring
    /// function; equality ignores it (by-name, like the source language).
    Generic { name: Name, owner: NodeId },
    /// Sentinel for "could not resolve" (e.g. `T + U` with `T != U`).
    Unknown,
    /// The type of the pattern wildcard `_`; equal to every type.
    Symbolic,
}

impl Type {
    /// Build an array type.
    pub fn array(component: Type) -> Type {
        Type::Array(Box::new(component))
    }

    /// Build a matrix type.
    pub fn mat(component: Type) -> Type {
        Type::Mat(Box::new(component))
    }

    /// Build a function type.
    pub fn fun(ret: Type, params: Vec<Type>) -> Type {
        Type::Fun {
            ret: Box::new(ret),
            params: params.into_boxed_slice(),
        }
    }

    /// `Array(T)` or `Mat(T)`.
    pub fn is_array_like(&self) -> bool {
        matches!(self, Type::Array(_) | Type::Mat(_))
    }

    /// Primitive types compare structurally at runtime.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Type::Int | Type::Float | Type::Bool | Type::String | Type::Symbolic
        )
    }

    /// Reference types compare by identity and accept `null`.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Type::String
                | Type::Array(_)
                | Type::Mat(_)
                | Type::Struct(_)
                | Type::Fun { .. }
                | Type::Type
                | Type::Null
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// Component type of an array-like.
    pub fn component(&self) -> Option<&Type> {
        match self {
            Type::Array(c) | Type::Mat(c) => Some(c),
            _ => None,
        }
    }

    /// Type equality.
    ///
    /// `Symbolic` equals everything; `Generic` equality is by name; a
    /// matrix equals a two-dimensional array with the same leaf component.
    pub fn same(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Symbolic, _) | (_, Type::Symbolic) => true,
            (Type::Int, Type::Int)
            | (Type::Float, Type::Float)
            | (Type::Bool, Type::Bool)
            | (Type::String, Type::String)
            | (Type::Void, Type::Void)
            | (Type::Null, Type::Null)
            | (Type::Type, Type::Type)
            | (Type::Unknown, Type::Unknown) => true,
            (Type::Array(a), Type::Array(b)) => a.same(b),
            (Type::Mat(a), Type::Mat(b)) => a.same(b),
            // Mat(T) = Array(Array(T))
            (Type::Mat(m), Type::Array(outer)) | (Type::Array(outer), Type::Mat(m)) => {
                matches!(outer.as_ref(), Type::Array(inner) if inner.same(m))
            }
            (Type::Struct(a), Type::Struct(b)) => a == b,
            (
                Type::Fun { ret: r1, params: p1 },
                Type::Fun { ret: r2, params: p2 },
            ) => {
                r1.same(r2)
                    && p1.len() == p2.len()
                    && p1.iter().zip(p2.iter()).all(|(a, b)| a.same(b))
            }
            (Type::Generic { name: a, .. }, Type::Generic { name: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

/// Whether a value of type `a` can be assigned to a location of type `b`.
pub fn is_assignable_to(a: &Type, b: &Type) -> bool {
    if matches!(a, Type::Unknown) || matches!(b, Type::Unknown) {
        return true;
    }
    if matches!(a, Type::Symbolic) {
        return true;
    }
    // Only the wildcard side is assignable: a location can never demand it.
    if matches!(b, Type::Symbolic) {
        return false;
    }
    if matches!(a, Type::Void) || matches!(b, Type::Void) {
        return false;
    }
    if matches!(a, Type::Int) && matches!(b, Type::Float) {
        return true;
    }
    match (a, b) {
        (Type::Array(ac), Type::Array(bc)) => is_assignable_to(ac, bc),
        (Type::Array(_), _) => false,
        (Type::Mat(ac), Type::Mat(bc)) => is_assignable_to(ac, bc),
        (Type::Mat(_), _) => false,
        _ => matches!(a, Type::Null) && b.is_reference() || a.same(b),
    }
}

/// Whether `==` / `!=` accept the operand pair. Never true for
/// array-likes (those use the dedicated operator family).
pub fn is_comparable_to(a: &Type, b: &Type) -> bool {
    if matches!(a, Type::Void) || matches!(b, Type::Void) {
        return false;
    }
    !a.is_array_like()
        && !b.is_array_like()
        && (a.is_reference() && b.is_reference()
            || a.same(b)
            || matches!(a, Type::Int) && matches!(b, Type::Float)
            || matches!(a, Type::Float) && matches!(b, Type::Int))
}

/// Whether the array-like operator family accepts the operand pair:
/// two array-likes with comparable components, or an array-like against a
/// numeric or string scalar (which broadcasts).
pub fn is_array_like_comparable_to(a: &Type, b: &Type) -> bool {
    if matches!(a, Type::Void) || matches!(b, Type::Void) {
        return false;
    }
    if a.is_array_like() && b.is_array_like() {
        return match (a.component(), b.component()) {
            (Some(ac), Some(bc)) => is_comparable_to(ac, bc),
            _ => false,
        };
    }
    (a.is_array_like() || b.is_array_like())
        && (matches!(a, Type::Int | Type::Float | Type::String)
            || matches!(b, Type::Int | Type::Float | Type::String))
}

/// The common supertype of both types, or `None` if there is none.
pub fn common_supertype(a: &Type, b: &Type) -> Option<Type> {
    if matches!(a, Type::Void) || matches!(b, Type::Void) {
        return None;
    }
    if is_assignable_to(a, b) {
        Some(b.clone())
    } else if is_assignable_to(b, a) {
        Some(a.clone())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_promotion() {
        assert!(is_assignable_to(&Type::Int, &Type::Float));
        assert!(!is_assignable_to(&Type::Float, &Type::Int));
    }

    #[test]
    fn test_null_assignable_to_references() {
        assert!(is_assignable_to(&Type::Null, &Type::String));
        assert!(is_assignable_to(&Type::Null, &Type::Struct(NodeId::from_raw(3))));
        assert!(!is_assignable_to(&Type::Null, &Type::Int));
    }

    #[test]
    fn test_array_covariance() {
        let int_arr = Type::array(Type::Int);
        let float_arr = Type::array(Type::Float);
        assert!(is_assignable_to(&int_arr, &float_arr));
        assert!(!is_assignable_to(&float_arr, &int_arr));
        assert!(is_assignable_to(
            &Type::mat(Type::Int),
            &Type::mat(Type::Float)
        ));
    }

    #[test]
    fn test_mat_equals_2d_array() {
        let mat = Type::mat(Type::Int);
        let arr2 = Type::array(Type::array(Type::Int));
        assert!(mat.same(&arr2));
        assert!(arr2.same(&mat));
        assert!(!mat.same(&Type::array(Type::Int)));
        assert!(!Type::mat(Type::Float).same(&arr2));
    }

    #[test]
    fn test_symbolic_equals_everything() {
        assert!(Type::Symbolic.same(&Type::Int));
        assert!(Type::mat(Type::Float).same(&Type::Symbolic));
        assert!(is_assignable_to(&Type::Symbolic, &Type::Struct(NodeId::from_raw(0))));
    }

    #[test]
    fn test_generic_by_name() {
        use vex_ir::Name;
        let t1 = Type::Generic {
            name: Name::from_raw(1),
            owner: NodeId::from_raw(10),
        };
        let t2 = Type::Generic {
            name: Name::from_raw(1),
            owner: NodeId::from_raw(20),
        };
        let u = Type::Generic {
            name: Name::from_raw(2),
            owner: NodeId::from_raw(10),
        };
        assert!(t1.same(&t2));
        assert!(!t1.same(&u));
        assert!(!t1.same(&Type::Int));
    }

    #[test]
    fn test_supertype_consistent_with_assignability() {
        // isAssignableTo(a, b) implies commonSupertype(a, b) == b
        let pairs = [
            (Type::Int, Type::Float),
            (Type::array(Type::Int), Type::array(Type::Float)),
            (Type::Null, Type::String),
        ];
        for (a, b) in pairs {
            assert!(is_assignable_to(&a, &b));
            assert_eq!(common_supertype(&a, &b), Some(b.clone()));
        }
        assert_eq!(common_supertype(&Type::Int, &Type::Bool), None);
        assert_eq!(common_supertype(&Type::Void, &Type::Void), None);
    }

    #[test]
    fn test_comparability() {
        assert!(is_comparable_to(&Type::Int, &Type::Float));
        assert!(is_comparable_to(&Type::Bool, &Type::Bool));
        assert!(is_comparable_to(&Type::String, &Type::Null));
        assert!(!is_comparable_to(
            &Type::array(Type::Int),
            &Type::array(Type::Int)
        ));

        assert!(is_array_like_comparable_to(
            &Type::array(Type::Int),
            &Type::mat(Type::Float)
        ));
        assert!(is_array_like_comparable_to(&Type::mat(Type::Int), &Type::Int));
        assert!(!is_array_like_comparable_to(&Type::Int, &Type::Int));
        assert!(!is_array_like_comparable_to(
            &Type::array(Type::Bool),
            &Type::array(Type::Bool)
        ));
    }
}
