//! End-to-end interpreter tests: source text through the whole pipeline.

use vex_eval::{structural_eq, BufferPrintHandler, EvalError, Interpreter, PrintHandler, Value};
use vex_ir::StringInterner;

fn eval_source(source: &str) -> (Result<Value, EvalError>, String) {
    let mut interner = StringInterner::new();
    let tokens = vex_lexer::lex(source, &mut interner);
    let parsed = vex_parse::parse(&tokens, &mut interner);
    assert!(
        parsed.diagnostics.is_empty(),
        "parse errors for {source:?}: {:?}",
        parsed.diagnostics
    );
    let mut ast = parsed.ast;
    let analysis = vex_sema::analyze(&mut ast, &mut interner, parsed.root);
    assert!(
        analysis.is_clean(),
        "semantic errors for {source:?}: {:?}",
        analysis.diagnostics
    );
    let buffer = BufferPrintHandler::new();
    let mut interpreter = Interpreter::with_print_handler(
        &ast,
        &analysis,
        &interner,
        PrintHandler::Buffer(buffer.clone()),
    );
    let result = interpreter.interpret(parsed.root);
    (result, buffer.output())
}

fn check(source: &str, expected: Value) {
    let (result, _) = eval_source(source);
    let value = result.unwrap_or_else(|e| panic!("runtime fault for {source:?}: {e:?}"));
    assert!(
        structural_eq(&value, &expected),
        "for {source:?}: expected {expected:?}, got {value:?}"
    );
}

fn check_expr(expr: &str, expected: Value) {
    check(&format!("return {expr}"), expected);
}

fn check_output(source: &str, expected: Value, expected_output: &str) {
    let (result, output) = eval_source(source);
    let value = result.unwrap_or_else(|e| panic!("runtime fault for {source:?}: {e:?}"));
    assert!(
        structural_eq(&value, &expected),
        "for {source:?}: expected {expected:?}, got {value:?}"
    );
    assert_eq!(output, expected_output, "output of {source:?}");
}

fn check_fault(source: &str) -> EvalError {
    let (result, _) = eval_source(source);
    match result {
        Err(error) => error,
        Ok(value) => panic!("expected a runtime fault for {source:?}, got {value:?}"),
    }
}

fn i(v: i64) -> Value {
    Value::Int(v)
}

fn f(v: f64) -> Value {
    Value::Float(v)
}

fn s(v: &str) -> Value {
    Value::string(v)
}

fn arr(values: Vec<Value>) -> Value {
    Value::array(values)
}

fn ints(values: &[i64]) -> Value {
    arr(values.iter().map(|&v| i(v)).collect())
}

fn floats(values: &[f64]) -> Value {
    arr(values.iter().map(|&v| f(v)).collect())
}

fn int_mat(rows: &[&[i64]]) -> Value {
    arr(rows.iter().map(|row| ints(row)).collect())
}

fn float_mat(rows: &[&[f64]]) -> Value {
    arr(rows.iter().map(|row| floats(row)).collect())
}

#[test]
fn literals_and_unary() {
    check_expr("42", i(42));
    check_expr("42.0", f(42.0));
    check_expr("\"hello\"", s("hello"));
    check_expr("(42)", i(42));
    check_expr("[1, 2, 3]", ints(&[1, 2, 3]));
    check_expr("[[1, 2, 3], [4, 5, 6]]", int_mat(&[&[1, 2, 3], &[4, 5, 6]]));
    check_expr("[0](3)", int_mat(&[&[0, 0, 0]]));
    check_expr("[0](2, 4)", int_mat(&[&[0, 0, 0, 0], &[0, 0, 0, 0]]));
    check_expr("true", Value::Bool(true));
    check_expr("false", Value::Bool(false));
    check_expr("null", Value::Null);
    check_expr("!false", Value::Bool(true));
    check_expr("!true", Value::Bool(false));
    check_expr("!!true", Value::Bool(true));
}

#[test]
fn numeric_binary() {
    check_expr("1 + 2", i(3));
    check_expr("2 - 1", i(1));
    check_expr("2 * 3", i(6));
    check_expr("2 / 3", i(0));
    check_expr("3 / 2", i(1));
    check_expr("2 % 3", i(2));
    check_expr("3 % 2", i(1));

    check_expr("1.0 + 2.0", f(3.0));
    check_expr("2.0 - 1.0", f(1.0));
    check_expr("2.0 * 3.0", f(6.0));
    check_expr("2.0 / 3.0", f(2.0 / 3.0));
    check_expr("2.0 % 3.0", f(2.0));

    check_expr("1 + 2.0", f(3.0));
    check_expr("2 / 3.0", f(2.0 / 3.0));
    check_expr("2.0 * 3", f(6.0));
    check_expr("3.0 % 2", f(1.0));

    check_expr("2 * (4-1) * 4.0 / 6 % (2+1)", f(1.0));
}

#[test]
fn logic_equality_and_concatenation() {
    check_expr("true && true", Value::Bool(true));
    check_expr("false || true", Value::Bool(true));
    check_expr("true && false", Value::Bool(false));
    check_expr("false || false", Value::Bool(false));

    check_expr("1 + \"a\"", s("1a"));
    check_expr("\"a\" + 1", s("a1"));
    check_expr("\"a\" + true", s("atrue"));

    check_expr("1 == 1", Value::Bool(true));
    check_expr("1 == 2", Value::Bool(false));
    check_expr("1.0 == 1.0", Value::Bool(true));
    check_expr("true == true", Value::Bool(true));
    check_expr("true == false", Value::Bool(false));
    check_expr("1 == 1.0", Value::Bool(true));
    check_expr("1 != 1", Value::Bool(false));
    check_expr("1 != 1.0", Value::Bool(false));
    check_expr("\"hi\" != \"hi2\"", Value::Bool(true));
}

#[test]
fn short_circuit_skips_the_right_side() {
    check_output(
        "return true || print(\"x\") == \"y\"",
        Value::Bool(true),
        "",
    );
    check_output(
        "return false && print(\"x\") == \"y\"",
        Value::Bool(false),
        "",
    );
}

#[test]
fn var_declarations_and_assignment() {
    check("var x: Int = 1; return x", i(1));
    check("var x: Float = 2.0; return x", f(2.0));
    check("var x: Int = 0; return x = 3", i(3));
    check("var x: String = \"0\"; return x = \"S\"", s("S"));
    // Int-to-Float promotion on assignment.
    check("var x: Float = 1; x = 2; return x", f(2.0));
}

#[test]
fn root_blocks_and_print() {
    check("return", Value::Null);
    check("return 1; return 2", i(1));
    check_output("print(\"a\")", Value::Null, "a\n");
    check_output("print(\"a\" + 1)", Value::Null, "a1\n");
    check_output("print(\"a\"); print(\"b\")", Value::Null, "a\nb\n");
    check_output("{ print(\"a\"); print(\"b\") }", Value::Null, "a\nb\n");
    check_output(
        "var x: Int = 1 { print(\"\" + x) var x: Int = 2 print(\"\" + x) } print(\"\" + x)",
        Value::Null,
        "1\n2\n1\n",
    );
}

#[test]
fn function_calls() {
    check(
        "fun add (a: Int, b: Int): Int { return a + b } return add(4, 7)",
        i(11),
    );
    check(
        "struct Point { var x: Int; var y: Int } return $Point(1, 2).x",
        i(1),
    );
    check_output(
        "var str: String = null; return print(str + 1)",
        s("null1"),
        "null1\n",
    );
}

#[test]
fn array_and_struct_access() {
    check_expr("[1][0]", i(1));
    check_expr("[1.0][0]", f(1.0));
    check_expr("[1, 2][1]", i(2));
    check_expr("[[1]][0]", ints(&[1]));
    check_expr("[[1, 2], [3, 4]][1]", ints(&[3, 4]));
    check_expr("[1].length", i(1));
    check_expr("[1, 2].length", i(2));

    check_fault("var array: Int[] = null; return array[0]");
    check_fault("var array: Int[] = null; return array.length");
    check("var x: Int[] = [0, 1]; x[0] = 3; return x[0]", i(3));
    check_fault("var x: Int[] = []; x[0] = 3; return x[0]");
    check_fault("var x: Int[] = null; x[0] = 3");

    check(
        "struct P { var x: Int; var y: Int } return $P(1, 2).y",
        i(2),
    );
    check_fault("struct P { var x: Int; var y: Int } var p: P = null; return p.y");
    check(
        "struct P { var x: Int; var y: Int } var p: P = $P(1, 2); p.y = 42; return p.y",
        i(42),
    );
    check_fault("struct P { var x: Int; var y: Int } var p: P = null; p.y = 42");
}

#[test]
fn array_slicing() {
    check_expr("[1, 2, 3, 4, 5, 6][:]", ints(&[1, 2, 3, 4, 5, 6]));
    check_expr("[1, 2, 3, 4, 5, 6][:2]", ints(&[1, 2]));
    check_expr("[1, 2, 3, 4, 5, 6][1:]", ints(&[2, 3, 4, 5, 6]));
    check_expr("[1, 2, 3, 4, 5, 6][1:2]", ints(&[2]));

    check(
        "var array: Int[] = [1, 2, 3, 4] var arr: Int[] = array[:] return arr",
        ints(&[1, 2, 3, 4]),
    );
    check(
        "var array: Int[] = [1, 2, 3, 4] var arr: Int[] = array[1:] return arr",
        ints(&[2, 3, 4]),
    );
    check(
        "var array: Int[] = [1, 2, 3, 4] var arr: Int[] = array[:2] return arr",
        ints(&[1, 2]),
    );
    check(
        "var array: Int[] = [1, 2, 3, 4] var arr: Int[] = array[1:3] return arr",
        ints(&[2, 3]),
    );
}

#[test]
fn matrix_slicing() {
    check_expr(
        "[[1, 2, 3], [4, 5, 6], [7, 8, 9]][:]",
        int_mat(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]),
    );
    check_expr(
        "[[1, 2, 3], [4, 5, 6], [7, 8, 9]][:2]",
        int_mat(&[&[1, 2, 3], &[4, 5, 6]]),
    );
    check_expr(
        "[[1, 2, 3], [4, 5, 6], [7, 8, 9]][1:]",
        int_mat(&[&[4, 5, 6], &[7, 8, 9]]),
    );
    check_expr("[[1, 2, 3], [4, 5, 6], [7, 8, 9]][1:2]", int_mat(&[&[4, 5, 6]]));

    check(
        "var matrix: Mat#Int = [[1, 2, 3], [4, 5, 6], [7, 8, 9], [10, 11, 12]] \
         var mat: Mat#Int = matrix[1:3] return mat",
        int_mat(&[&[4, 5, 6], &[7, 8, 9]]),
    );
}

#[test]
fn slicing_faults() {
    check_fault("return [1](2, 2)[1000]");
    check_fault("return [1](2, 2)[:1000]");
    check_fault("return [1](2, 2)[1000:]");
    check_fault("return [1, 2, 3][2:1]");
}

#[test]
fn slice_assignment_overwrites_in_place() {
    check(
        "var a: Int[] = [1, 2, 3, 4]; a[1:3] = [9, 9]; return a",
        ints(&[1, 9, 9, 4]),
    );
    check(
        "var a: Int[] = [1, 2, 3, 4]; a[:] = [5, 6, 7, 8]; return a",
        ints(&[5, 6, 7, 8]),
    );
    // The overwritten range must be filled exactly.
    check_fault("var a: Int[] = [1, 2, 3, 4]; a[1:3] = [9]; return a");
    check_fault("var a: Int[] = [1, 2, 3, 4]; a[1:3] = [9, 9, 9]; return a");
}

#[test]
fn if_and_while() {
    check("if (true) return 1 else return 2", i(1));
    check("if (false) return 1 else return 2", i(2));
    check("if (false) return 1 else if (true) return 2 else return 3", i(2));
    check("if (false) return 1 else if (false) return 2 else return 3", i(3));
    check_output(
        "var i: Int = 0; while (i < 3) { print(\"\" + i); i = i + 1 }",
        Value::Null,
        "0\n1\n2\n",
    );
}

#[test]
fn empty_array_inference() {
    check("var array: Int[] = [] return array.length", i(0));
    check("var array: String[] = [] return array", arr(vec![]));
    check("fun use_array (array: Int[]) {} ; use_array([])", Value::Null);
    check("var matrix: Mat#Int = [[1]] return matrix", int_mat(&[&[1]]));
}

#[test]
fn types_as_values() {
    check("struct S{} ; return \"\" + S", s("S"));
    check("struct S{} ; var type: Type = S ; return \"\" + type", s("S"));
}

#[test]
fn unconditional_return() {
    check(
        "fun f(): Int { if (true) return 1 else return 2 } ; return f()",
        i(1),
    );
}

#[test]
fn matrix_arithmetic() {
    check_expr("[[1]] + [[2]]", int_mat(&[&[3]]));
    check_expr("[[1]] - [[2]]", int_mat(&[&[-1]]));
    check_expr("[[1]] / [[2]]", int_mat(&[&[0]]));
    check_expr("[[1]] * [[2]]", int_mat(&[&[2]]));
    check_expr("[[1]] @ [[2]]", int_mat(&[&[2]]));

    check_expr("[[1.0]] + [[2.0]]", float_mat(&[&[3.0]]));
    check_expr("[[1.0]] / [[2.0]]", float_mat(&[&[0.5]]));
    check_expr("[[1.0]] @ [[2.0]]", float_mat(&[&[2.0]]));

    check_expr("[[1]] + [[2.0]]", float_mat(&[&[3.0]]));
    check_expr("[[1]] / [[2.0]]", float_mat(&[&[0.5]]));
    check_expr("[[1]] @ [[2.0]]", float_mat(&[&[2.0]]));

    check_expr(
        "[[1, 2], [3, 4]] + [[1, 2], [3, 4]]",
        int_mat(&[&[2, 4], &[6, 8]]),
    );
}

#[test]
fn one_dimensional_arrays_lift_to_single_row_matrices() {
    check_expr("[1] + [2]", int_mat(&[&[3]]));
    check_expr("[1] - [2]", int_mat(&[&[-1]]));
    check_expr("[1] / [2]", int_mat(&[&[0]]));
    check_expr("[1] * [2]", int_mat(&[&[2]]));
    check_expr("[1] @ [2]", int_mat(&[&[2]]));
    check_expr("[1.0] + [2.0]", float_mat(&[&[3.0]]));
    check_expr("[1] + [2.0]", float_mat(&[&[3.0]]));
}

#[test]
fn dot_product() {
    check_expr(
        "[[1, 2], [3, 4]] @ [[5, 6], [7, 8]]",
        int_mat(&[&[19, 22], &[43, 50]]),
    );
    check_fault("return [[1, 2, 3]] @ [[1, 2, 3]]");
}

#[test]
fn broadcasting_scalars() {
    check_expr("[[1, 2], [3, 4]] + 1", int_mat(&[&[2, 3], &[4, 5]]));
    check_expr("1 + [[1, 2], [3, 4]]", int_mat(&[&[2, 3], &[4, 5]]));
    check_expr("[1, 2] * 2", int_mat(&[&[2, 4]]));
    check_expr("[[2, 4]] / 2.0", float_mat(&[&[1.0, 2.0]]));
}

#[test]
fn matrix_operators() {
    let cases: &[(&str, bool)] = &[
        ("[[1], [2]] =? [[1], [3]]", true),
        ("[[1], [2]] =? [[3], [4]]", false),
        ("[[1], [2]] !=? [[3], [4]]", true),
        ("[[1], [2]] !=? [[1], [2]]", false),
        ("[[1], [2]] <=> [[1], [2]]", true),
        ("[[1], [2]] <=> [[1], [3]]", false),
        ("[[1], [2]] !<=> [[4], [3]]", true),
        ("[[1], [2]] !<=> [[1], [2]]", false),
        ("[[1], [2]] <=? [[1], [1]]", true),
        ("[[3], [2]] <=? [[1], [1]]", false),
        ("[[1], [2]] <<= [[2], [4]]", true),
        ("[[5], [6]] <<= [[1], [2]]", false),
        ("[[5], [1]] >=? [[1], [5]]", true),
        ("[[1], [2]] >=? [[5], [6]]", false),
        ("[[1], [2]] >>= [[0], [2]]", true),
        ("[[1], [2]] >>= [[2], [3]]", false),
        ("[[1], [2]] << [[2], [3]]", true),
        ("[[2], [3]] << [[1], [2]]", false),
        ("[[1], [2]] <? [[2], [1]]", true),
        ("[[1], [2]] <? [[1], [2]]", false),
        ("[[1], [2]] >> [[0], [1]]", true),
        ("[[1], [2]] >> [[1], [3]]", false),
        ("[[1], [2]] >? [[0], [3]]", true),
        ("[[1], [2]] >? [[2], [2]]", false),
    ];
    for &(expr, expected) in cases {
        check_expr(expr, Value::Bool(expected));
    }
    check_fault("return [[1, 2, 3]] >> [[1, 2]]");
}

#[test]
fn array_operators() {
    let cases: &[(&str, bool)] = &[
        ("[1, 2] =? [1, 3]", true),
        ("[1, 2] =? [3, 4]", false),
        ("[1, 2] !=? [3, 4]", true),
        ("[1, 2] !=? [1, 2]", false),
        ("[1, 2] <=> [1, 2]", true),
        ("[1, 2] <=> [1, 3]", false),
        ("[1, 2] !<=> [4, 3]", true),
        ("[1, 2] !<=> [1, 2]", false),
        ("[1, 2] <=? [1, 1]", true),
        ("[3, 2] <=? [1, 1]", false),
        ("[1, 2] <<= [2, 4]", true),
        ("[5, 6] <<= [1, 2]", false),
        ("[5, 1] >=? [1, 5]", true),
        ("[1, 2] >=? [5, 6]", false),
        ("[1, 2] >>= [0, 2]", true),
        ("[1, 2] >>= [2, 3]", false),
        ("[1, 2] << [2, 3]", true),
        ("[2, 3] << [1, 2]", false),
        ("[1, 2] <? [2, 1]", true),
        ("[1, 2] <? [1, 2]", false),
        ("[1, 2] >> [0, 1]", true),
        ("[1, 2] >> [1, 3]", false),
        ("[1, 2] >? [0, 3]", true),
        ("[1, 2] >? [2, 2]", false),
    ];
    for &(expr, expected) in cases {
        check_expr(expr, Value::Bool(expected));
    }
    check_fault("return [1] >? [1, 2]");
}

#[test]
fn mixed_shape_comparison() {
    check_expr("[1](2, 2) >? [[2, 2], [0, 0]]", Value::Bool(true));
    check_expr("[1](2, 2) >? [[2, 2], [2, 2]]", Value::Bool(false));
    check_expr("[1, 2] <=> 2", Value::Bool(false));
    check_expr("[2, 2] <=> 2", Value::Bool(true));
}

#[test]
fn vectorized_function_calls() {
    check(
        "fun bigTester (a : Int, b: Int, c: Float): Float {\
             if (a > b && a > c)\
                 return a\
             else if (b > a && b > c)\
                 return b\
             else\
                 return c\
         }\
         var mat1: Mat#Int = [[6, 7, 8], [0, 0, 0], [-1, -2, -3]]\
         var mat2: Mat#Int = [[0, 0, 0], [3, 4, 5], [-1, -2, -3]]\
         var mat3: Mat#Int = [[1, 2, 3], [2, 3, 4], [1, 2, 3]]\
         return bigTester(mat1, mat2, mat3)",
        int_mat(&[&[6, 7, 8], &[3, 4, 5], &[1, 2, 3]]),
    );

    check_fault(
        "fun fail(a : Int, b : Int) : Int { return a + b } \
         return fail([1](2, 2), [3](5, 5))",
    );
}

#[test]
fn vectorization_broadcasts_scalar_arguments() {
    check(
        "fun add(a: Int, b: Int): Int { return a + b } return add([1, 2, 3], 10)",
        int_mat(&[&[11, 12, 13]]),
    );
}

#[test]
fn case_statements() {
    check(
        "case 2 { 1 : {return 1}, 2 : {return 2}, default : {return -1}}",
        i(2),
    );
    check(
        "case 2.5 { 1.2 : {return 1}, 3.1 : {return 2}, _ : {return 3}}",
        i(3),
    );
    check(
        "case [1, 2, 3] { [1, 2] : {return 1}, [1] : {return 2}, [1, 2, 3] : {return 3}, default : {return 4}}",
        i(3),
    );
    check(
        "case [1, 2, 3, 4, 5] { [1, 2] : {return 1}, [1, _] : {return 2}, default : {return 3}}",
        i(2),
    );
    check(
        "case [1, 2, 3, 4, 5] { [1, 2, _, 5] : {return 1}, [1, 2, 3, 4, 5] : {return 2}, default : {return 3}}",
        i(1),
    );
    check(
        "case [1, 2, 3, 4, 5] { [_, 9] : {return 1}, [_, 1] : {return 2}, [_, 5] : {return 3}, default : {return 4}}",
        i(3),
    );
    check(
        "case [1](2, 2) { [[1, 2], [1, 2]] : {return 1}, [[1, 1], [1, 1]] : {return 2}, default : {return 3}}",
        i(2),
    );
    check(
        "case [1](2, 2) { [[2, 2], _] : {return 1}, [[1, 1], _] : {return 2}, default : {return 3}}",
        i(2),
    );
    check(
        "case [2](2, 2) { [_, [1, 1]] : {return 1}, [[2, _], [2, 1]] : {return 2}, [[2, _], _] : {return 3}, default : {return 4}}",
        i(3),
    );
    check(
        "case [1](2, 2) { [_, [1, 1]] : {return 1}, [[1, 1, 1], [1, 1, 1], [1, 1, 1]] : {return 2}, default : {return 3}}",
        i(1),
    );
    check(
        "case [2](2, 3).shape { [1, 1] : {return 1}, [2, 2] : {return 2}, [3, 3] : {return 3}, [2, 3] : {return 4}, default : {return 5}}",
        i(4),
    );
    check(
        "case [1](2, 2) { [_, [1, _]] : {return 1}, default : {return 2} }",
        i(1),
    );
}

#[test]
fn case_without_default_falls_through() {
    check(
        "case 3 { 1 : {return 1}, 2 : {return 2} } return 9",
        i(9),
    );
}

#[test]
fn case_on_strings_with_wildcard() {
    check(
        "case \"hello\" { \"he\\fo\" : {return 1}, default : {return 2} }",
        i(1),
    );
    check(
        "case \"help\" { \"he\\fo\" : {return 1}, default : {return 2} }",
        i(2),
    );
    check(
        "case \"abc\" { \"abc\" : {return 1}, default : {return 2} }",
        i(1),
    );
}

#[test]
fn generic_functions() {
    check(
        "fun test1(a : T) : T { return a + 1 } var i : Int = 3 return test1(i)",
        i(4),
    );
    check(
        "fun test1(a : T) : T { return a + 1 } var i : Float = 3.5 return test1(i)",
        f(4.5),
    );
    check(
        "fun test1(a : T) : T { return a + 1 } var i : Int[] = [1, 2] return test1(i)",
        int_mat(&[&[2, 3]]),
    );
    check(
        "fun test1(a : T) : T { return a + 1 } var i : Float[] = [1.5, 2.5] return test1(i)",
        float_mat(&[&[2.5, 3.5]]),
    );
    check(
        "fun test1(a : T) : T { return a + 1 } var i : Mat#Int = [1](2, 2) return test1(i)",
        int_mat(&[&[2, 2], &[2, 2]]),
    );
    check(
        "fun test1(a : T) : T { return a + 1 } var i : Mat#Float = [1.5](2, 2) return test1(i)",
        float_mat(&[&[2.5, 2.5], &[2.5, 2.5]]),
    );
}

#[test]
fn generic_functions_with_two_parameters() {
    check(
        "fun test2(a : T, b : U) : T { return a + b } \
         var i : Int[] = [1, 2, 3] var j : Int = 2 return test2(i, j)",
        int_mat(&[&[3, 4, 5]]),
    );
    check(
        "fun test2(a : T, b : U) : T { return a + b } \
         var i : Int = 4 var j : Int = 2 return test2(i, j)",
        i(6),
    );
    check(
        "fun test2(a : T, b : U) : T { return a + b } \
         var i : Mat#Int = [0](2, 2) var j : Int = 2 return test2(i, j)",
        int_mat(&[&[2, 2], &[2, 2]]),
    );
}

#[test]
fn generic_locals() {
    check(
        "fun test3(a : T, b : U) : T { var c : T = a + b return c } \
         var i : Int = 1 var j : Int = 2 return test3(i, j)",
        i(3),
    );
    check(
        "fun test3(a : T, b : U) : T { var c : T = a + b return c } \
         var i : Int[] = [1, 2] var j : Int = 2 return test3(i, j)",
        int_mat(&[&[3, 4]]),
    );
    check(
        "fun test3(a : T, b : U) : T { var c : T = a + b return c } \
         var i : Mat#Int = [1](2, 2) var j : Int = 2 return test3(i, j)",
        int_mat(&[&[3, 3], &[3, 3]]),
    );
    check(
        "fun test3(a : T, b : U) : T { var c : T = a + b return c } \
         var i : Mat#Int = [1](2, 2) var j : Mat#Int = [[1, 2], [3, 4]] return test3(i, j)",
        int_mat(&[&[2, 3], &[4, 5]]),
    );
}

#[test]
fn generic_return_in_second_position() {
    check(
        "fun test4(a : T, b : U) : U { var c : U = b return c } \
         var i : Int = 1 var j : Int = 2 return test4(i, j)",
        i(2),
    );
    check(
        "fun test4(a : T, b : U) : U { var c : U = b return c } \
         var i : Int = 1 var j : Int[] = [1, 2] return test4(i, j)",
        ints(&[1, 2]),
    );
    check(
        "fun test4(a : T, b : U) : U { var c : U = b return c } \
         var i : Int = 1 var j : Mat#Int = [1](2, 2) return test4(i, j)",
        int_mat(&[&[1, 1], &[1, 1]]),
    );
}

#[test]
fn generics_used_together() {
    check(
        "fun test5(a : T, b : U) : U { var c : T = a + 1 var d : U = b + c return d } \
         var i : Int = 1 var j : Int = 2 return test5(i, j)",
        i(4),
    );
    check(
        "fun test5(a : T, b : U) : U { var c : T = a + 1 var d : U = b + c return d } \
         var i : Int = 1 var j : Float = 2.5 return test5(i, j)",
        f(4.5),
    );
}

#[test]
fn generic_conflict_faults() {
    let error = check_fault(
        "fun same(a : T, b : T) : T { return a } var i : Int = 1 var s : String = \"x\" \
         return same(i, s)",
    );
    assert!(error.message.contains("generic type conflict"), "{error:?}");
}

#[test]
fn generic_vectorization_over_one_dimensional_array() {
    check(
        "fun f(x: T): T { return x + 1 } return f([1, 2])",
        int_mat(&[&[2, 3]]),
    );
}

#[test]
fn matrix_float_promotion_on_assignment() {
    check(
        "var m: Mat#Float = [[1, 2], [3, 4]]; return m",
        float_mat(&[&[1.0, 2.0], &[3.0, 4.0]]),
    );
    check(
        "var a: Float[] = [1, 2]; return a",
        floats(&[1.0, 2.0]),
    );
}

#[test]
fn matrix_generator_faults() {
    check_fault("return [1](0, 2)");
    check_fault("var n: Int = 0 - 2 return [1](n, 2)");
}

#[test]
fn division_by_zero_faults() {
    check_fault("return 1 / 0");
    check_fault("return 1 % 0");
    check_fault("return [1, 2] / [1, 0]");
}

#[test]
fn matrix_shape_field() {
    check("var m: Mat#Int = [[1, 2, 3], [4, 5, 6]] return m.shape", ints(&[2, 3]));
    check_expr("[7](4, 2).shape", ints(&[4, 2]));
}

#[test]
fn null_function_call_faults() {
    check_fault("struct P { var x: Int } var p: P = null return $P(p.x)");
}

#[test]
fn nested_and_recursive_calls() {
    check(
        "fun fib(n: Int): Int { if (n < 2) return n return fib(n - 1) + fib(n - 2) } \
         return fib(10)",
        i(55),
    );
    check(
        "fun twice(x: Int): Int { return x * 2 } \
         fun inc(x: Int): Int { return x + 1 } \
         return twice(inc(3))",
        i(8),
    );
}
