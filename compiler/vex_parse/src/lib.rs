//! Parser for Vex: tokens to the flat AST arena.
//!
//! The entry point is [`parse()`]. Parse errors are accumulated as
//! diagnostics with spans; the parser synchronizes at statement
//! boundaries and keeps going so one bad statement does not hide the
//! rest of the file.

mod cursor;
mod grammar;

pub use grammar::{parse, ParseResult};

#[cfg(test)]
mod tests {
    use super::*;
    use vex_ir::{NodeKind, StringInterner};

    fn parse_source(source: &str) -> (ParseResult, StringInterner) {
        let mut interner = StringInterner::new();
        let tokens = vex_lexer::lex(source, &mut interner);
        (parse(&tokens, &mut interner), interner)
    }

    fn root_stmts(result: &ParseResult) -> Vec<NodeKind> {
        match result.ast.kind(result.root) {
            NodeKind::Root(range) => result
                .ast
                .list(range)
                .iter()
                .map(|&id| result.ast.kind(id))
                .collect(),
            other => panic!("root is not Root: {other:?}"),
        }
    }

    #[test]
    fn test_var_decl_and_return() {
        let (result, _) = parse_source("var x: Int = 1; return x");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let stmts = root_stmts(&result);
        assert!(matches!(stmts[0], NodeKind::VarDecl { .. }));
        assert!(matches!(stmts[1], NodeKind::Return { .. }));
    }

    #[test]
    fn test_juxtaposed_statements() {
        // Statements are self-delimiting; no separator needed.
        let (result, _) =
            parse_source("var a: Int[] = [1, 2, 3]var b: Int[] = a[1:]return b");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(root_stmts(&result).len(), 3);
    }

    #[test]
    fn test_matrix_literal_vs_array_literal() {
        let (result, _) = parse_source("return [[1, 2], [3, 4]]");
        assert!(result.diagnostics.is_empty());
        let ret = match root_stmts(&result)[0] {
            NodeKind::Return { expr } => expr,
            other => panic!("{other:?}"),
        };
        assert!(matches!(result.ast.kind(ret), NodeKind::MatrixLit(_)));

        let (result, _) = parse_source("return [1, [2]]");
        let ret = match root_stmts(&result)[0] {
            NodeKind::Return { expr } => expr,
            other => panic!("{other:?}"),
        };
        assert!(matches!(result.ast.kind(ret), NodeKind::ArrayLit(_)));
    }

    #[test]
    fn test_matrix_generator_one_dim_normalized() {
        let (result, _) = parse_source("return [0](3)");
        assert!(result.diagnostics.is_empty());
        let ret = match root_stmts(&result)[0] {
            NodeKind::Return { expr } => expr,
            other => panic!("{other:?}"),
        };
        match result.ast.kind(ret) {
            NodeKind::MatrixGen { shape, .. } => {
                assert_eq!(shape.len(), 2);
                let dims = result.ast.list(shape);
                assert!(matches!(result.ast.kind(dims[0]), NodeKind::IntLit(1)));
                assert!(matches!(result.ast.kind(dims[1]), NodeKind::IntLit(3)));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_slice_defaults() {
        for (source, start, end) in [
            ("return a[:]", 0, -1),
            ("return a[1:]", 1, -1),
            ("return a[:2]", 0, 2),
            ("return a[1:3]", 1, 3),
        ] {
            let (result, _) = parse_source(source);
            assert!(result.diagnostics.is_empty(), "{source}: {:?}", result.diagnostics);
            let ret = match root_stmts(&result)[0] {
                NodeKind::Return { expr } => expr,
                other => panic!("{other:?}"),
            };
            match result.ast.kind(ret) {
                NodeKind::SliceAccess { start: s, end: e, .. } => {
                    assert!(matches!(result.ast.kind(s), NodeKind::IntLit(v) if v == start));
                    assert!(matches!(result.ast.kind(e), NodeKind::IntLit(v) if v == end));
                }
                other => panic!("{source}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_case_synthesizes_default_and_wildcard() {
        let (result, _) = parse_source("case x { 1 : {return 1}, 2 : {return 2} }");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        match root_stmts(&result)[0] {
            NodeKind::Case {
                bodies,
                default,
                wildcard,
                ..
            } => {
                assert_eq!(bodies.len(), 2);
                assert!(matches!(result.ast.kind(default), NodeKind::Block(r) if r.is_empty()));
                assert!(matches!(result.ast.kind(wildcard), NodeKind::WildcardDecl));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_fun_decl_defaults_to_void() {
        let (result, mut interner) = parse_source("fun f (x: Int) { return }");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        match root_stmts(&result)[0] {
            NodeKind::FunDecl { return_type, .. } => match result.ast.kind(return_type) {
                NodeKind::SimpleType(name) => {
                    assert_eq!(interner.intern("Void"), name);
                }
                other => panic!("{other:?}"),
            },
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_mat_type() {
        let (result, _) = parse_source("var m: Mat#Float = [[1.0]] return m");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        match root_stmts(&result)[0] {
            NodeKind::VarDecl { ty, .. } => {
                assert!(matches!(result.ast.kind(ty), NodeKind::MatType { .. }));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let (result, _) = parse_source("return 1 + 2 * 3");
        let ret = match root_stmts(&result)[0] {
            NodeKind::Return { expr } => expr,
            other => panic!("{other:?}"),
        };
        match result.ast.kind(ret) {
            NodeKind::Binary {
                op: vex_ir::BinaryOp::Add,
                right,
                ..
            } => {
                assert!(matches!(
                    result.ast.kind(right),
                    NodeKind::Binary {
                        op: vex_ir::BinaryOp::Mul,
                        ..
                    }
                ));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_bare_expression_statement_rejected() {
        let (result, _) = parse_source("[[1, 2, 3]] >> [[1, 2]]");
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn test_negated_literal() {
        let (result, _) = parse_source("return [[-1, -2]]");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_error_recovery_continues() {
        let (result, _) = parse_source("var : = ;\nreturn 1");
        assert!(!result.diagnostics.is_empty());
        // The return statement after the bad declaration still parses.
        assert!(root_stmts(&result)
            .iter()
            .any(|k| matches!(k, NodeKind::Return { .. })));
    }
}
