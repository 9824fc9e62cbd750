//! Binary and unary operators.

/// Binary operators.
///
/// The `M`-prefixed names of the array-like family follow the surface
/// syntax split: `One*` operators succeed when *some* element-wise pair
/// satisfies the relation, `All*` operators when *every* pair does.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    /// `@` - dot product (matrix-by-matrix)
    MatMul,

    // Scalar comparison
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Equality
    Eq,
    NotEq,

    // Logic (short-circuit)
    And,
    Or,

    // Array-like equality
    /// `=?` - some element-wise pair is equal
    OneEq,
    /// `!=?` - some element-wise pair is unequal
    OneNotEq,
    /// `<=>` - all element-wise pairs are equal
    AllEq,
    /// `!<=>` - all element-wise pairs are unequal
    AllNotEq,

    // Array-like comparison
    /// `<?`
    OneLt,
    /// `<=?`
    OneLtEq,
    /// `>?`
    OneGt,
    /// `>=?`
    OneGtEq,
    /// `<<`
    AllLt,
    /// `<<=`
    AllLtEq,
    /// `>>`
    AllGt,
    /// `>>=`
    AllGtEq,
}

impl BinaryOp {
    /// Source-level symbol, for error messages.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::MatMul => "@",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::And => "&&",
            Self::Or => "||",
            Self::OneEq => "=?",
            Self::OneNotEq => "!=?",
            Self::AllEq => "<=>",
            Self::AllNotEq => "!<=>",
            Self::OneLt => "<?",
            Self::OneLtEq => "<=?",
            Self::OneGt => ">?",
            Self::OneGtEq => ">=?",
            Self::AllLt => "<<",
            Self::AllLtEq => "<<=",
            Self::AllGt => ">>",
            Self::AllGtEq => ">>=",
        }
    }

    /// `+ - * / % @`
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Rem | Self::MatMul
        )
    }

    /// `< <= > >=`
    pub const fn is_comparison(self) -> bool {
        matches!(self, Self::Lt | Self::LtEq | Self::Gt | Self::GtEq)
    }

    /// `== !=`
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::NotEq)
    }

    /// `&& ||`
    pub const fn is_logic(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// The eight ordering operators of the array-like family.
    pub const fn is_array_like_comparison(self) -> bool {
        matches!(
            self,
            Self::OneEq
                | Self::OneNotEq
                | Self::OneLt
                | Self::OneLtEq
                | Self::OneGt
                | Self::OneGtEq
                | Self::AllLt
                | Self::AllLtEq
                | Self::AllGt
                | Self::AllGtEq
        )
    }

    /// `<=>` and `!<=>`.
    pub const fn is_array_like_equality(self) -> bool {
        matches!(self, Self::AllEq | Self::AllNotEq)
    }

    /// Whether this is a short-circuiting success ("one") predicate.
    pub const fn is_one_predicate(self) -> bool {
        matches!(
            self,
            Self::OneEq | Self::OneNotEq | Self::OneLt | Self::OneLtEq | Self::OneGt | Self::OneGtEq
        )
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// `!` - boolean negation
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Not => "!",
        }
    }
}
