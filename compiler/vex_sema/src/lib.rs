//! Vex Sema - scopes, the attribute reactor, and semantic analysis.
//!
//! Analysis attaches attributes to AST nodes through a write-once dataflow
//! engine (the [`Reactor`]): the walk registers rules, the reactor fires
//! them to fixpoint, and the result is an [`Analysis`] the interpreter
//! consults for types, resolved declarations and scopes. Semantic errors
//! accumulate; execution must only proceed when [`Analysis::is_clean`].

mod analysis;
mod reactor;
mod scope;

pub use analysis::{analyze, Analysis};
pub use reactor::{Attr, AttrKey, AttrValue, Attrs, Reactor, RuleCx, RuleFn};
pub use scope::{ScopeId, ScopeTable};

#[cfg(test)]
mod tests {
    use super::*;
    use vex_ir::{NodeKind, StringInterner};
    use vex_types::Type;

    struct Checked {
        analysis: Analysis,
        ast: vex_ir::Ast,
        root: vex_ir::NodeId,
    }

    fn check(source: &str) -> Checked {
        let mut interner = StringInterner::new();
        let tokens = vex_lexer::lex(source, &mut interner);
        let result = vex_parse::parse(&tokens, &mut interner);
        assert!(
            result.diagnostics.is_empty(),
            "parse errors: {:?}",
            result.diagnostics
        );
        let mut ast = result.ast;
        let analysis = analyze(&mut ast, &mut interner, result.root);
        Checked {
            analysis,
            ast,
            root: result.root,
        }
    }

    fn errors(source: &str) -> Vec<String> {
        check(source)
            .analysis
            .diagnostics
            .iter()
            .map(|d| d.message.clone())
            .collect()
    }

    fn assert_clean(source: &str) {
        let checked = check(source);
        assert!(
            checked.analysis.is_clean(),
            "expected clean analysis for {source:?}, got {:?}",
            checked.analysis.diagnostics
        );
    }

    fn assert_error(source: &str, fragment: &str) {
        let messages = errors(source);
        assert!(
            messages.iter().any(|m| m.contains(fragment)),
            "expected an error containing {fragment:?} for {source:?}, got {messages:?}"
        );
    }

    #[test]
    fn test_literals_and_operators_are_clean() {
        assert_clean("return 1 + 2");
        assert_clean("return 1 + 2.0");
        assert_clean("return \"a\" + 1");
        assert_clean("return true && false || true");
        assert_clean("return 1 == 1.0");
        assert_clean("return !true");
        assert_clean("return [1, 2] + [3, 4]");
        assert_clean("return [[1, 2], [3, 4]] @ [[5, 6], [7, 8]]");
        assert_clean("return [1](2, 2) >? [[2, 2], [0, 0]]");
        assert_clean("return [1, 2] <=> 2");
    }

    #[test]
    fn test_operator_errors() {
        assert_error("return 1 + true", "Trying to add");
        assert_error("return [1, 2] > 2", "non-numeric");
        assert_error("return 1 && 2", "non-boolean");
        assert_error("return !1", "Trying to negate");
        assert_error("return [1, 2] == [1, 2]", "incomparable");
        assert_error("return [\"a\"] << [\"b\"]", "non-arraylike");
    }

    #[test]
    fn test_name_resolution() {
        assert_clean("var x: Int = 1 return x");
        assert_error("return y", "Could not resolve: y");
        assert_error("fun f(): Int { return x } var x: Int = 1 return f()",
            "Variable used before declaration: x");
        // Functions may be referenced before their declaration.
        assert_clean("fun g(): Int { return f() } fun f(): Int { return 1 } return g()");
    }

    #[test]
    fn test_var_decl_typing() {
        assert_clean("var x: Float = 1");
        assert_error("var x: Int = 1.5", "incompatible initializer type");
        assert_error("var x: Int = null", "incompatible initializer type");
        assert_clean("var s: String = null");
        assert_clean("var a: Int[] = []");
        assert_clean("var m: Mat#Int = [[1, 2], [3, 4]]");
        assert_error("var m: Mat#Int[] = [[1]]", "Cannot declare a matrix of type");
    }

    #[test]
    fn test_conditions_must_be_bool() {
        assert_clean("if (true) return 1 else return 2");
        assert_error("if (1) return 1", "non-boolean condition");
        assert_error("while (1 + 2) { print(\"x\") }", "non-boolean condition");
    }

    #[test]
    fn test_calls() {
        assert_clean("fun add(a: Int, b: Int): Int { return a + b } return add(1, 2)");
        assert_error(
            "fun add(a: Int, b: Int): Int { return a + b } return add(1)",
            "wrong number of arguments, expected 2 but got 1",
        );
        assert_error(
            "fun add(a: Int, b: Int): Int { return a + b } return add(1, \"x\")",
            "incompatible argument provided for argument 1",
        );
        assert_error("var x: Int = 1 return x(2)", "non-function");
    }

    #[test]
    fn test_vectorized_call_type_lifts_to_matrix() {
        let checked = check(
            "fun inc(a: Int): Int { return a + 1 } var r: Mat#Int = inc([1, 2, 3]) return r",
        );
        assert!(checked.analysis.is_clean(), "{:?}", checked.analysis.diagnostics);
    }

    #[test]
    fn test_missing_return() {
        assert_error("fun f(): Int { print(\"x\") }", "Missing return in function.");
        assert_clean("fun f(): Int { if (true) return 1 else return 2 }");
        assert_error(
            "fun f(): Int { if (true) return 1 }",
            "Missing return in function.",
        );
        assert_clean("fun f(x: Int) { print(\"\" + x) }");
        assert_error("fun f() { return 1 }", "Return with value in a Void function.");
        assert_error("fun f(): Int { return }", "Return without value");
    }

    #[test]
    fn test_struct_typing() {
        assert_clean(
            "struct P { var x: Int; var y: Int } var p: P = $P(1, 2) return p.y",
        );
        assert_error(
            "struct P { var x: Int } return $P(1).z",
            "Trying to access missing field z on struct P",
        );
        assert_error("var x: Int = 1 return $x(1)", "non-struct reference");
        assert_clean("struct S{} var t: Type = S return \"\" + t");
    }

    #[test]
    fn test_array_field_access() {
        assert_clean("return [1, 2].length");
        assert_error("return [1, 2].size", "non-length field on an array");
        assert_clean("var m: Mat#Int = [[1]] return m.shape");
        assert_error("var m: Mat#Int = [[1]] return m.length", "unknown field on a matrix");
    }

    #[test]
    fn test_indexing_and_slicing() {
        assert_clean("return [1, 2][0]");
        assert_error("return [1, 2][\"x\"]", "non-Int-valued expression");
        assert_clean("return [1, 2, 3][1:2]");
        assert_error("return 5[0]", "Trying to index a non-array expression");
        assert_error("return 5[0:1]", "Trying to slice an invalid type");
        let checked = check("var m: Mat#Int = [[1], [2]] return m[0]");
        assert!(checked.analysis.is_clean());
    }

    #[test]
    fn test_generic_declaration_and_return_check() {
        assert_clean("fun id(x: T): T { return x } return id(1)");
        assert_clean("fun pick(a: T, b: U): U { return b } return pick(1, \"s\")");
        assert_error(
            "fun bad(x: Int): T { return x }",
            "Generic return Type should be declared in parameters",
        );
        // Generic locals resolve through the parameter's declaration.
        assert_clean("fun f(a: T, b: U): T { var c: T = a + b return c } return f(1, 2)");
    }

    #[test]
    fn test_case_typing() {
        assert_clean("case 2 { 1 : {return 1}, 2 : {return 2}, default : {return 3} }");
        assert_clean("case [1, 2, 3] { [1, _] : {return 1}, default : {return 2} }");
        assert_clean("case [1](2, 2) { [_, [1, 1]] : {return 1}, default : {return 2} }");
        assert_error("case 2 { \"x\" : {return 1}, default : {return 2} }", "Cannot compare");
        assert_error("case _ { 1 : {return 1} }", "Cannot use case on variable named '_'");
        assert_error(
            "case [1, 2] { [_, _] : {return 1}, default : {return 2} }",
            "Consecutive wildcards",
        );
    }

    #[test]
    fn test_empty_array_inference_contexts() {
        assert_clean("var a: Int[] = []");
        assert_clean("fun use_array(a: Int[]) {} use_array([])");
        assert_clean("case [1, 2] { [] : {return 1}, default : {return 2} }");
    }

    #[test]
    fn test_matrix_literal_row_lengths() {
        assert_error(
            "return [[1, 2], [3]]",
            "Matrices must have constant line lengths",
        );
    }

    #[test]
    fn test_matrix_generator_typing() {
        assert_clean("return [0](2, 4)");
        assert_clean("return [1.5](3)");
        assert_error("return [0](1.5, 2)", "Invalid shape type");
        assert_error("return [[1]](2, 2)", "Invalid filler type");
        assert_error("return [0](1, 2, 3)", "Too many arguments for matrix generator");
    }

    #[test]
    fn test_assignment_targets() {
        assert_clean("var x: Int = 0 x = 3 return x");
        assert_clean("var a: Int[] = [1, 2] a[0] = 5 return a");
        assert_clean("var a: Int[] = [1, 2, 3, 4] a[1:3] = [9, 9] return a");
        assert_error("1 = 2", "non-lvalue");
        assert_error("var x: Int = 0 x = \"s\"", "non-compatible lvalue");
    }

    #[test]
    fn test_attribute_types_are_concrete() {
        let checked = check("var x: Float = 1 return x + 2");
        assert!(checked.analysis.is_clean());
        // Every statement expression carries a type attribute.
        let NodeKind::Root(stmts) = checked.ast.kind(checked.root) else {
            panic!("no root");
        };
        let ids = checked.ast.list(stmts);
        let var_decl = ids[0];
        assert_eq!(checked.analysis.attrs.ty(var_decl), Some(&Type::Float));
    }

    #[test]
    fn test_shadowing_resolves_innermost() {
        assert_clean(
            "var x: Int = 1 { print(\"\" + x) var x: Int = 2 print(\"\" + x) } print(\"\" + x)",
        );
    }

    #[test]
    fn test_type_as_value() {
        assert_clean("var t: Type = Int return \"\" + t");
        assert_error("var x: Qq = 1", "could not resolve: Qq");
        assert_error("var y: Int = 2 var x: y = 1", "did not resolve to a type declaration");
    }
}
