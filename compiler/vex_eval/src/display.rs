//! Value-to-string conversion, shared by `print` and string concatenation.

use vex_ir::{Ast, NodeKind, StringInterner};

use crate::value::Value;

/// Render a value the way `print` shows it.
///
/// Floats always show a decimal point (`1.0`, not `1`); arrays render
/// nested bracket lists; functions and types render their names;
/// constructors render as `$Name`; the wildcard renders as its in-band
/// character.
pub fn render(value: &Value, ast: &Ast, interner: &StringInterner) -> String {
    match value {
        Value::Int(v) => v.to_string(),
        Value::Float(v) => format_float(*v),
        Value::Bool(v) => v.to_string(),
        Value::Str(s) => s.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(cells) => {
            let cells = cells.borrow();
            let mut out = String::from("[");
            for (i, cell) in cells.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&render(cell, ast, interner));
            }
            out.push(']');
            out
        }
        Value::Struct(sv) => {
            let NodeKind::StructDecl { fields, .. } = ast.kind(sv.decl) else {
                return "<struct>".to_string();
            };
            let slots = sv.fields.borrow();
            let mut out = String::from("{");
            for (i, &field) in ast.list(fields).iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if let Some(name) = ast.decl_name(field) {
                    out.push_str(interner.lookup(name));
                    out.push('=');
                }
                if let Some(v) = slots.get(i) {
                    out.push_str(&render(v, ast, interner));
                }
            }
            out.push('}');
            out
        }
        Value::Function(decl) => decl_display_name(*decl, ast, interner),
        Value::Constructor(decl) => format!("${}", decl_display_name(*decl, ast, interner)),
        Value::TypeRef(decl) => decl_display_name(*decl, ast, interner),
        Value::Wildcard => '\u{c}'.to_string(),
    }
}

fn decl_display_name(decl: vex_ir::NodeId, ast: &Ast, interner: &StringInterner) -> String {
    if let NodeKind::BuiltinDecl(b) = ast.kind(decl) {
        return b.name().to_string();
    }
    match ast.decl_name(decl) {
        Some(name) => interner.lookup(name).to_string(),
        None => "<decl>".to_string(),
    }
}

/// Integral floats keep a trailing `.0`.
fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_rendering() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(2.5), "2.5");
        assert_eq!(format_float(-3.0), "-3.0");
        assert_eq!(format_float(2.0 / 3.0), "0.6666666666666666");
    }

    #[test]
    fn test_array_rendering() {
        let ast = Ast::new();
        let interner = StringInterner::new();
        let value = Value::array(vec![
            Value::array(vec![Value::Int(1), Value::Int(2)]),
            Value::array(vec![Value::Int(3), Value::Int(4)]),
        ]);
        assert_eq!(render(&value, &ast, &interner), "[[1, 2], [3, 4]]");
    }
}
