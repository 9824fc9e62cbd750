//! The Vex grammar: recursive descent with precedence climbing.
//!
//! Precedence, loosest first:
//!
//! ```text
//! assignment                =            (right associative)
//! or                        ||
//! and                       &&
//! equality                  == != <=> !<=> =? !=?
//! comparison                < <= > >= <? <=? >? >=? << <<= >> >>=
//! additive                  + -
//! multiplicative            * / % @
//! unary                     !  (and numeric literal negation)
//! postfix                   call, [index], [s:e], .field
//! ```
//!
//! The parser materializes what later phases expect: slice endpoint
//! defaults (`0` / `-1`), a synthesized `1` for one-dimensional matrix
//! generators, an empty `default` block for `case` statements without one,
//! and one `WildcardDecl` node per `case`.

use vex_diagnostic::{Diagnostic, ErrorCode};
use vex_ir::{
    Ast, BinaryOp, Name, NodeId, NodeKind, NodeRange, Span, StringInterner, TokenKind, TokenList,
    UnaryOp,
};

use crate::cursor::Cursor;

/// Parser outcome: the arena, the root node, and any parse diagnostics.
///
/// `root` is valid even when diagnostics are present (statements that
/// failed to parse are dropped); callers must not run later phases if
/// `diagnostics` contains errors.
pub struct ParseResult {
    pub ast: Ast,
    pub root: NodeId,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a token list into an AST.
pub fn parse(tokens: &TokenList, interner: &mut StringInterner) -> ParseResult {
    let mut parser = Parser {
        cursor: Cursor::new(tokens),
        ast: Ast::new(),
        diagnostics: Vec::new(),
        interner,
    };
    let root = parser.parse_root();
    ParseResult {
        ast: parser.ast,
        root,
        diagnostics: parser.diagnostics,
    }
}

/// Marker for an abandoned production; the diagnostic is already recorded.
type PResult<T> = Result<T, ()>;

struct Parser<'a> {
    cursor: Cursor<'a>,
    ast: Ast,
    diagnostics: Vec<Diagnostic>,
    interner: &'a mut StringInterner,
}

impl Parser<'_> {
    // Error helpers

    fn error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        self.diagnostics
            .push(Diagnostic::error(code).with_message(message).with_label(span, "here"));
    }

    fn unexpected(&mut self, expected: &str) {
        let found = self.cursor.kind().describe();
        let span = self.cursor.span();
        self.error(
            ErrorCode::E1001,
            format!("expected {expected}, found {found}"),
            span,
        );
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<Span> {
        if self.cursor.at(kind) {
            Ok(self.cursor.bump().span)
        } else {
            self.unexpected(kind.describe());
            Err(())
        }
    }

    fn expect_ident(&mut self) -> PResult<(Name, Span)> {
        match self.cursor.eat_ident() {
            Some(pair) => Ok(pair),
            None => {
                self.unexpected("identifier");
                Err(())
            }
        }
    }

    /// Skip tokens until something that can start a statement.
    fn sync(&mut self) {
        if !self.cursor.at_eof() {
            self.cursor.bump();
        }
        while !self.cursor.at_eof() {
            match self.cursor.kind() {
                TokenKind::Var
                | TokenKind::Fun
                | TokenKind::Struct
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Return
                | TokenKind::Case
                | TokenKind::RBrace
                | TokenKind::Semi => return,
                _ => {
                    self.cursor.bump();
                }
            }
        }
    }

    // Root & statements

    fn parse_root(&mut self) -> NodeId {
        let start = self.cursor.span();
        let mut stmts = Vec::new();
        while !self.cursor.at_eof() {
            if self.cursor.eat(TokenKind::Semi) {
                continue;
            }
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(()) => self.sync(),
            }
        }
        let span = start.merge(self.cursor.span());
        let list = self.ast.alloc_list(&stmts);
        self.ast.alloc(NodeKind::Root(list), span)
    }

    fn parse_stmt(&mut self) -> PResult<NodeId> {
        match self.cursor.kind() {
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Var => self.parse_var_decl(),
            TokenKind::Fun => self.parse_fun_decl(),
            TokenKind::Struct => self.parse_struct_decl(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Case => self.parse_case(),
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_block(&mut self) -> PResult<NodeId> {
        let start = self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.cursor.at(TokenKind::RBrace) && !self.cursor.at_eof() {
            if self.cursor.eat(TokenKind::Semi) {
                continue;
            }
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(()) => self.sync(),
            }
        }
        let end = self.expect(TokenKind::RBrace)?;
        let list = self.ast.alloc_list(&stmts);
        Ok(self.ast.alloc(NodeKind::Block(list), start.merge(end)))
    }

    fn parse_var_decl(&mut self) -> PResult<NodeId> {
        let start = self.expect(TokenKind::Var)?;
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        self.expect(TokenKind::Eq)?;
        let init = self.parse_expr()?;
        self.cursor.eat(TokenKind::Semi);
        let span = start.merge(self.ast.span(init));
        Ok(self.ast.alloc(NodeKind::VarDecl { name, ty, init }, span))
    }

    fn parse_fun_decl(&mut self) -> PResult<NodeId> {
        let start = self.expect(TokenKind::Fun)?;
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.cursor.at(TokenKind::RParen) {
            let (pname, pspan) = self.expect_ident()?;
            self.expect(TokenKind::Colon)?;
            let pty = self.parse_type()?;
            let span = pspan.merge(self.ast.span(pty));
            params.push(self.ast.alloc(NodeKind::Param { name: pname, ty: pty }, span));
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        let return_type = if self.cursor.eat(TokenKind::Colon) {
            self.parse_type()?
        } else {
            // Absent return type means Void.
            let void = self.interner.intern("Void");
            self.ast.alloc(NodeKind::SimpleType(void), Span::DUMMY)
        };
        let body = self.parse_block()?;
        let span = start.merge(self.ast.span(body));
        let params = self.ast.alloc_list(&params);
        Ok(self.ast.alloc(
            NodeKind::FunDecl {
                name,
                params,
                return_type,
                body,
            },
            span,
        ))
    }

    fn parse_struct_decl(&mut self) -> PResult<NodeId> {
        let start = self.expect(TokenKind::Struct)?;
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.cursor.at(TokenKind::RBrace) && !self.cursor.at_eof() {
            if self.cursor.eat(TokenKind::Semi) {
                continue;
            }
            let fstart = self.expect(TokenKind::Var)?;
            let (fname, _) = self.expect_ident()?;
            self.expect(TokenKind::Colon)?;
            let fty = self.parse_type()?;
            let span = fstart.merge(self.ast.span(fty));
            fields.push(self.ast.alloc(NodeKind::FieldDecl { name: fname, ty: fty }, span));
        }
        let end = self.expect(TokenKind::RBrace)?;
        let fields = self.ast.alloc_list(&fields);
        Ok(self
            .ast
            .alloc(NodeKind::StructDecl { name, fields }, start.merge(end)))
    }

    fn parse_if(&mut self) -> PResult<NodeId> {
        let start = self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let then_branch = self.parse_stmt()?;
        let mut span = start.merge(self.ast.span(then_branch));
        let else_branch = if self.cursor.eat(TokenKind::Else) {
            let els = self.parse_stmt()?;
            span = span.merge(self.ast.span(els));
            els
        } else {
            NodeId::INVALID
        };
        Ok(self.ast.alloc(
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    fn parse_while(&mut self) -> PResult<NodeId> {
        let start = self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_stmt()?;
        let span = start.merge(self.ast.span(body));
        Ok(self.ast.alloc(NodeKind::While { cond, body }, span))
    }

    fn parse_return(&mut self) -> PResult<NodeId> {
        let start = self.expect(TokenKind::Return)?;
        let expr = if self.can_start_expr() {
            self.parse_expr()?
        } else {
            NodeId::INVALID
        };
        self.cursor.eat(TokenKind::Semi);
        let span = if expr.is_valid() {
            start.merge(self.ast.span(expr))
        } else {
            start
        };
        Ok(self.ast.alloc(NodeKind::Return { expr }, span))
    }

    fn parse_case(&mut self) -> PResult<NodeId> {
        let start = self.expect(TokenKind::Case)?;
        let subject = self.parse_expr()?;
        self.expect(TokenKind::LBrace)?;
        let mut bodies = Vec::new();
        let mut default = NodeId::INVALID;
        while !self.cursor.at(TokenKind::RBrace) && !self.cursor.at_eof() {
            if self.cursor.eat(TokenKind::Default) {
                self.expect(TokenKind::Colon)?;
                default = self.parse_block()?;
                self.cursor.eat(TokenKind::Comma);
                break;
            }
            let pattern = self.parse_expr()?;
            self.expect(TokenKind::Colon)?;
            let body = self.parse_block()?;
            let span = self.ast.span(pattern).merge(self.ast.span(body));
            bodies.push(self.ast.alloc(NodeKind::CaseBody { pattern, body }, span));
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(TokenKind::RBrace)?;
        let span = start.merge(end);
        if !default.is_valid() {
            // A case without a default falls through to an empty block.
            let empty = self.ast.alloc_list(&[]);
            default = self.ast.alloc(NodeKind::Block(empty), span);
        }
        let wildcard = self.ast.alloc(NodeKind::WildcardDecl, span);
        let bodies = self.ast.alloc_list(&bodies);
        Ok(self.ast.alloc(
            NodeKind::Case {
                subject,
                bodies,
                default,
                wildcard,
            },
            span,
        ))
    }

    fn parse_expr_stmt(&mut self) -> PResult<NodeId> {
        if !self.can_start_expr() {
            self.unexpected("statement");
            return Err(());
        }
        let expr = self.parse_expr()?;
        if !matches!(
            self.ast.kind(expr),
            NodeKind::Call { .. } | NodeKind::Assign { .. }
        ) {
            self.error(
                ErrorCode::E1001,
                "only calls and assignments can be used as statements",
                self.ast.span(expr),
            );
            return Err(());
        }
        self.cursor.eat(TokenKind::Semi);
        let span = self.ast.span(expr);
        Ok(self.ast.alloc(NodeKind::ExprStmt(expr), span))
    }

    fn can_start_expr(&self) -> bool {
        matches!(
            self.cursor.kind(),
            TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Str(_)
                | TokenKind::Ident(_)
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Dollar
                | TokenKind::Bang
                | TokenKind::Minus
        )
    }

    // Expressions

    fn parse_expr(&mut self) -> PResult<NodeId> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> PResult<NodeId> {
        let target = self.parse_or()?;
        if self.cursor.eat(TokenKind::Eq) {
            let value = self.parse_assignment()?;
            let span = self.ast.span(target).merge(self.ast.span(value));
            return Ok(self.ast.alloc(NodeKind::Assign { target, value }, span));
        }
        Ok(target)
    }

    fn parse_or(&mut self) -> PResult<NodeId> {
        let mut left = self.parse_and()?;
        while self.cursor.eat(TokenKind::PipePipe) {
            let right = self.parse_and()?;
            left = self.binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> PResult<NodeId> {
        let mut left = self.parse_equality()?;
        while self.cursor.eat(TokenKind::AmpAmp) {
            let right = self.parse_equality()?;
            left = self.binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> PResult<NodeId> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.cursor.kind() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::BangEq => BinaryOp::NotEq,
                TokenKind::AllEq => BinaryOp::AllEq,
                TokenKind::AllNotEq => BinaryOp::AllNotEq,
                TokenKind::OneEq => BinaryOp::OneEq,
                TokenKind::OneNotEq => BinaryOp::OneNotEq,
                _ => return Ok(left),
            };
            self.cursor.bump();
            let right = self.parse_comparison()?;
            left = self.binary(op, left, right);
        }
    }

    fn parse_comparison(&mut self) -> PResult<NodeId> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.cursor.kind() {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::GtEq,
                TokenKind::OneLt => BinaryOp::OneLt,
                TokenKind::OneLtEq => BinaryOp::OneLtEq,
                TokenKind::OneGt => BinaryOp::OneGt,
                TokenKind::OneGtEq => BinaryOp::OneGtEq,
                TokenKind::AllLt => BinaryOp::AllLt,
                TokenKind::AllLtEq => BinaryOp::AllLtEq,
                TokenKind::AllGt => BinaryOp::AllGt,
                TokenKind::AllGtEq => BinaryOp::AllGtEq,
                _ => return Ok(left),
            };
            self.cursor.bump();
            let right = self.parse_additive()?;
            left = self.binary(op, left, right);
        }
    }

    fn parse_additive(&mut self) -> PResult<NodeId> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.cursor.kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.cursor.bump();
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> PResult<NodeId> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.cursor.kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                TokenKind::At => BinaryOp::MatMul,
                _ => return Ok(left),
            };
            self.cursor.bump();
            let right = self.parse_unary()?;
            left = self.binary(op, left, right);
        }
    }

    fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        let span = self.ast.span(left).merge(self.ast.span(right));
        self.ast.alloc(NodeKind::Binary { op, left, right }, span)
    }

    fn parse_unary(&mut self) -> PResult<NodeId> {
        if self.cursor.at(TokenKind::Bang) {
            let start = self.cursor.bump().span;
            let operand = self.parse_unary()?;
            let span = start.merge(self.ast.span(operand));
            return Ok(self.ast.alloc(
                NodeKind::Unary {
                    op: UnaryOp::Not,
                    operand,
                },
                span,
            ));
        }
        // Negative numbers are negated literals, not a unary operator.
        if self.cursor.at(TokenKind::Minus) {
            let start = self.cursor.span();
            self.cursor.bump();
            match self.cursor.kind() {
                TokenKind::Int(value) => {
                    let span = start.merge(self.cursor.bump().span);
                    return Ok(self.ast.alloc(NodeKind::IntLit(value.wrapping_neg()), span));
                }
                TokenKind::Float(bits) => {
                    let span = start.merge(self.cursor.bump().span);
                    let value = -f64::from_bits(bits);
                    return Ok(self.ast.alloc(NodeKind::FloatLit(value.to_bits()), span));
                }
                _ => {
                    self.unexpected("numeric literal after `-`");
                    return Err(());
                }
            }
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> PResult<NodeId> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.cursor.kind() {
                TokenKind::LParen => {
                    self.cursor.bump();
                    let mut args = Vec::new();
                    while !self.cursor.at(TokenKind::RParen) {
                        args.push(self.parse_expr()?);
                        if !self.cursor.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                    let end = self.expect(TokenKind::RParen)?;
                    let span = self.ast.span(expr).merge(end);
                    let args = self.ast.alloc_list(&args);
                    expr = self.ast.alloc(
                        NodeKind::Call {
                            function: expr,
                            args,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    expr = self.parse_index_or_slice(expr)?;
                }
                TokenKind::Dot => {
                    self.cursor.bump();
                    let (field, fspan) = self.expect_ident()?;
                    let span = self.ast.span(expr).merge(fspan);
                    expr = self.ast.alloc(NodeKind::FieldAccess { stem: expr, field }, span);
                }
                _ => return Ok(expr),
            }
        }
    }

    /// `a[i]`, `a[:]`, `a[s:]`, `a[:e]`, `a[s:e]`.
    fn parse_index_or_slice(&mut self, array: NodeId) -> PResult<NodeId> {
        let open = self.expect(TokenKind::LBracket)?;
        if self.cursor.eat(TokenKind::Colon) {
            // a[:] or a[:e]
            let end_expr = if self.cursor.at(TokenKind::RBracket) {
                self.ast.alloc(NodeKind::IntLit(-1), open)
            } else {
                self.parse_expr()?
            };
            let close = self.expect(TokenKind::RBracket)?;
            let start_expr = self.ast.alloc(NodeKind::IntLit(0), open);
            let span = self.ast.span(array).merge(close);
            return Ok(self.ast.alloc(
                NodeKind::SliceAccess {
                    array,
                    start: start_expr,
                    end: end_expr,
                },
                span,
            ));
        }
        let index = self.parse_expr()?;
        if self.cursor.eat(TokenKind::Colon) {
            // a[s:] or a[s:e]
            let end_expr = if self.cursor.at(TokenKind::RBracket) {
                self.ast.alloc(NodeKind::IntLit(-1), open)
            } else {
                self.parse_expr()?
            };
            let close = self.expect(TokenKind::RBracket)?;
            let span = self.ast.span(array).merge(close);
            return Ok(self.ast.alloc(
                NodeKind::SliceAccess {
                    array,
                    start: index,
                    end: end_expr,
                },
                span,
            ));
        }
        let close = self.expect(TokenKind::RBracket)?;
        let span = self.ast.span(array).merge(close);
        Ok(self.ast.alloc(NodeKind::IndexAccess { array, index }, span))
    }

    fn parse_primary(&mut self) -> PResult<NodeId> {
        match self.cursor.kind() {
            TokenKind::Int(value) => {
                let span = self.cursor.bump().span;
                Ok(self.ast.alloc(NodeKind::IntLit(value), span))
            }
            TokenKind::Float(bits) => {
                let span = self.cursor.bump().span;
                Ok(self.ast.alloc(NodeKind::FloatLit(bits), span))
            }
            TokenKind::Str(name) => {
                let span = self.cursor.bump().span;
                Ok(self.ast.alloc(NodeKind::StrLit(name), span))
            }
            TokenKind::Ident(name) => {
                let span = self.cursor.bump().span;
                Ok(self.ast.alloc(NodeKind::Ref(name), span))
            }
            TokenKind::LParen => {
                let start = self.cursor.bump().span;
                let inner = self.parse_expr()?;
                let end = self.expect(TokenKind::RParen)?;
                Ok(self.ast.alloc(NodeKind::Paren(inner), start.merge(end)))
            }
            TokenKind::Dollar => {
                let start = self.cursor.bump().span;
                let (name, nspan) = self.expect_ident()?;
                let target = self.ast.alloc(NodeKind::Ref(name), nspan);
                Ok(self
                    .ast
                    .alloc(NodeKind::Constructor { target }, start.merge(nspan)))
            }
            TokenKind::LBracket => self.parse_bracket(),
            _ => {
                self.unexpected("expression");
                Err(())
            }
        }
    }

    /// Array literal, matrix literal, or matrix generator.
    fn parse_bracket(&mut self) -> PResult<NodeId> {
        let start = self.expect(TokenKind::LBracket)?;
        let mut elements = Vec::new();
        while !self.cursor.at(TokenKind::RBracket) {
            elements.push(self.parse_expr()?);
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(TokenKind::RBracket)?;
        let span = start.merge(end);

        // `[filler](rows, cols)` - a bracketed filler followed by a shape.
        if elements.len() == 1 && self.cursor.at(TokenKind::LParen) {
            self.cursor.bump();
            let mut shape = Vec::new();
            while !self.cursor.at(TokenKind::RParen) {
                shape.push(self.parse_expr()?);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
            let close = self.expect(TokenKind::RParen)?;
            if shape.is_empty() {
                self.error(ErrorCode::E1002, "matrix generator needs a shape", close);
                return Err(());
            }
            if shape.len() == 1 {
                // A single dimension means one row: [f](n) is [f](1, n).
                let one = self.ast.alloc(NodeKind::IntLit(1), span);
                shape.insert(0, one);
            }
            let shape = self.ast.alloc_list(&shape);
            return Ok(self.ast.alloc(
                NodeKind::MatrixGen {
                    filler: elements[0],
                    shape,
                },
                span.merge(close),
            ));
        }

        // A non-empty bracket list whose every element is an array literal
        // is a matrix literal.
        let is_matrix = !elements.is_empty()
            && elements
                .iter()
                .all(|&e| matches!(self.ast.kind(e), NodeKind::ArrayLit(_)));
        let list = self.ast.alloc_list(&elements);
        if is_matrix {
            Ok(self.ast.alloc(NodeKind::MatrixLit(list), span))
        } else {
            Ok(self.ast.alloc(NodeKind::ArrayLit(list), span))
        }
    }

    // Types

    fn parse_type(&mut self) -> PResult<NodeId> {
        let mut ty = if self.cursor.at(TokenKind::Mat) {
            let start = self.cursor.bump().span;
            self.expect(TokenKind::Hash)?;
            let component = self.parse_type()?;
            let span = start.merge(self.ast.span(component));
            self.ast.alloc(NodeKind::MatType { component }, span)
        } else if self.cursor.at_ident() {
            let (name, span) = self.expect_ident()?;
            self.ast.alloc(NodeKind::SimpleType(name), span)
        } else {
            self.unexpected("type");
            return Err(());
        };
        while self.cursor.at(TokenKind::LBracket) && self.cursor.peek() == TokenKind::RBracket {
            let open = self.cursor.bump().span;
            let close = self.cursor.bump().span;
            let span = self.ast.span(ty).merge(open.merge(close));
            ty = self.ast.alloc(NodeKind::ArrayType { component: ty }, span);
        }
        Ok(ty)
    }
}
