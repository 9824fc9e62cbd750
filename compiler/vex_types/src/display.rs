//! Interner-aware type formatting for error messages.

use std::fmt;

use vex_ir::{Ast, StringInterner};

use crate::Type;

/// Borrowed display adapter: `ty.display(ast, interner)` renders the type
/// the way it is written in source (`Int[]`, `Mat#Float`, struct names).
#[derive(Clone, Copy)]
pub struct TypeDisplay<'a> {
    ty: &'a Type,
    ast: &'a Ast,
    interner: &'a StringInterner,
}

impl Type {
    /// Render this type for diagnostics.
    pub fn display<'a>(&'a self, ast: &'a Ast, interner: &'a StringInterner) -> TypeDisplay<'a> {
        TypeDisplay {
            ty: self,
            ast,
            interner,
        }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let TypeDisplay { ty, ast, interner } = *self;
        match ty {
            Type::Int => f.write_str("Int"),
            Type::Float => f.write_str("Float"),
            Type::Bool => f.write_str("Bool"),
            Type::String => f.write_str("String"),
            Type::Void => f.write_str("Void"),
            Type::Null => f.write_str("Null"),
            Type::Type => f.write_str("Type"),
            Type::Array(c) => write!(f, "{}[]", c.display(ast, interner)),
            Type::Mat(c) => write!(f, "Mat#{}", c.display(ast, interner)),
            Type::Struct(decl) => match ast.decl_name(*decl) {
                Some(name) => f.write_str(interner.lookup(name)),
                None => f.write_str("<struct>"),
            },
            Type::Fun { ret, params } => {
                f.write_str("(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", p.display(ast, interner))?;
                }
                write!(f, ") -> {}", ret.display(ast, interner))
            }
            Type::Generic { name, .. } => f.write_str(interner.lookup(*name)),
            Type::Unknown => f.write_str("<unknown>"),
            Type::Symbolic => f.write_str("Sym"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_compound() {
        let ast = Ast::new();
        let interner = StringInterner::new();
        let ty = Type::mat(Type::Float);
        assert_eq!(ty.display(&ast, &interner).to_string(), "Mat#Float");
        let arr = Type::array(Type::array(Type::Int));
        assert_eq!(arr.display(&ast, &interner).to_string(), "Int[][]");
        let fun = Type::fun(Type::Void, vec![Type::Int, Type::String]);
        assert_eq!(fun.display(&ast, &interner).to_string(), "(Int, String) -> Void");
    }
}
