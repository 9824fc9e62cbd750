//! Error codes for all compiler diagnostics.
//!
//! Format: E#### where the first digit indicates the phase:
//! - E1xxx: Parser errors
//! - E2xxx: Semantic errors
//! - E6xxx: Runtime faults

use std::fmt;

use crate::Phase;

/// Error codes for all compiler diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Expected type annotation
    E1005,
    /// Invalid literal
    E1006,

    // Semantic Errors (E2xxx)
    /// Could not resolve a name
    E2001,
    /// Variable used before declaration
    E2002,
    /// Name did not resolve to a type declaration
    E2003,
    /// Incompatible types (assignment, initializer, return, argument)
    E2004,
    /// Wrong number of arguments
    E2005,
    /// Calling a non-function expression
    E2006,
    /// Invalid operand for an operator
    E2007,
    /// Non-boolean condition
    E2008,
    /// Non-Int index or slice bound
    E2009,
    /// Matrix row lengths differ
    E2010,
    /// Invalid matrix component or filler type
    E2011,
    /// Matrix generator shape error
    E2012,
    /// Field access error
    E2013,
    /// Not an lvalue
    E2014,
    /// Missing return in non-Void function
    E2015,
    /// Return/Void mismatch
    E2016,
    /// Generic return type not declared in parameters
    E2017,
    /// Invalid case subject or pattern type mismatch
    E2018,
    /// Array/matrix literal has no common supertype
    E2019,
    /// Adjacent wildcards in a pattern
    E2020,

    // Runtime Faults (E6xxx)
    /// Null dereference (field access, indexing, call)
    E6001,
    /// Index out of bounds
    E6002,
    /// Invalid slice bounds
    E6003,
    /// Shape mismatch (element-wise op, dot product, vectorized call)
    E6004,
    /// Invalid operator for operand kind
    E6005,
    /// Generic type conflict
    E6006,
    /// Matrix generator non-positive shape
    E6007,
    /// Division or remainder by zero
    E6008,
    /// Invalid pattern for subject
    E6009,
}

impl ErrorCode {
    /// The compiler phase this code belongs to.
    pub const fn phase(self) -> Phase {
        let code = self.as_str().as_bytes();
        match code[1] {
            b'1' => Phase::Parse,
            b'2' => Phase::Sema,
            _ => Phase::Runtime,
        }
    }

    /// Code as it appears in output, e.g. `"E2004"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E2013 => "E2013",
            ErrorCode::E2014 => "E2014",
            ErrorCode::E2015 => "E2015",
            ErrorCode::E2016 => "E2016",
            ErrorCode::E2017 => "E2017",
            ErrorCode::E2018 => "E2018",
            ErrorCode::E2019 => "E2019",
            ErrorCode::E2020 => "E2020",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6005 => "E6005",
            ErrorCode::E6006 => "E6006",
            ErrorCode::E6007 => "E6007",
            ErrorCode::E6008 => "E6008",
            ErrorCode::E6009 => "E6009",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_from_code() {
        assert_eq!(ErrorCode::E1001.phase(), Phase::Parse);
        assert_eq!(ErrorCode::E2004.phase(), Phase::Sema);
        assert_eq!(ErrorCode::E6001.phase(), Phase::Runtime);
    }
}
