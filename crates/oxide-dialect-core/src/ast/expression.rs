//! Expression tree types.

use super::statement::{OrderBy, SelectStatement};
use crate::boolean::BooleanRepr;
use crate::builder::SqlValue;
use crate::dialect::TypeCode;

/// A literal value written into the SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    /// Quoted with doubled single quotes.
    String(String),
    /// Boolean literal, rendered in the dialect's boolean representation.
    Boolean(bool),
    Null,
}

/// Infix operators understood by every dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Like,
}

impl BinaryOp {
    /// Operator token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Like => "LIKE",
        }
    }

    /// Binding strength; the translator parenthesizes a weaker child.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 3,
            Self::Like => 4,
            Self::Add | Self::Sub => 8,
            Self::Mul | Self::Div | Self::Mod => 9,
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    /// Operator token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "NOT",
        }
    }
}

macro_rules! binary_shorthands {
    ($($(#[$doc:meta])* $method:ident => $op:ident;)+) => {
        impl Expr {
            $(
                $(#[$doc])*
                #[must_use]
                pub fn $method(self, right: Self) -> Self {
                    self.binary(BinaryOp::$op, right)
                }
            )+
        }
    };
}

binary_shorthands! {
    /// `self = right`
    eq => Eq;
    /// `self <> right`
    not_eq => NotEq;
    /// `self < right`
    lt => Lt;
    /// `self <= right`
    lt_eq => LtEq;
    /// `self > right`
    gt => Gt;
    /// `self >= right`
    gt_eq => GtEq;
    /// `self AND right`
    and => And;
    /// `self OR right`
    or => Or;
    /// `self LIKE right`
    like => Like;
}

/// A function call.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Portable name, looked up in the dialect function templates.
    pub name: String,
    /// Arguments.
    pub args: Vec<Expr>,
    /// `name(DISTINCT ...)`.
    pub distinct: bool,
}

/// A database-agnostic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),

    /// Column, optionally qualified.
    Column {
        /// Qualifying table or alias.
        table: Option<String>,
        /// Column name.
        name: String,
    },

    /// A bound parameter. Rendered as `?`.
    Param(SqlValue),

    /// `left op right`.
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// `op operand`.
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Portable names with a dialect template are rewritten; any other
    /// name is written as called.
    Function(FunctionCall),

    /// A scalar subquery.
    Subquery(Box<SelectStatement>),

    /// `expr IS [NOT] NULL`.
    IsNull {
        /// Tested expression.
        expr: Box<Expr>,
        /// `IS NOT NULL`.
        negated: bool,
    },

    /// `expr [NOT] IN (list)`.
    In {
        /// Tested expression.
        expr: Box<Expr>,
        /// Candidates.
        list: Vec<Expr>,
        /// `NOT IN`.
        negated: bool,
    },

    /// `expr [NOT] BETWEEN low AND high`.
    Between {
        /// Tested expression.
        expr: Box<Expr>,
        /// Lower bound.
        low: Box<Expr>,
        /// Upper bound.
        high: Box<Expr>,
        /// `NOT BETWEEN`.
        negated: bool,
    },

    /// Simple or searched CASE.
    Case {
        /// `CASE operand WHEN ...` form when present.
        operand: Option<Box<Expr>>,
        /// `(WHEN, THEN)` pairs.
        when_clauses: Vec<(Expr, Expr)>,
        /// ELSE result.
        else_clause: Option<Box<Expr>>,
    },

    /// CAST to an abstract column type.
    Cast {
        /// Converted expression.
        expr: Box<Expr>,
        /// Target type code.
        code: TypeCode,
        /// Length, for character and binary types.
        length: Option<u32>,
    },

    /// String concatenation in the dialect's syntax.
    Concat(Vec<Expr>),

    /// A truth value stored in a non-native representation, converted to
    /// the dialect's boolean representation.
    Boolean {
        /// The stored value.
        expr: Box<Expr>,
        /// How the value is stored.
        stored_as: BooleanRepr,
    },

    /// The next value of a sequence.
    NextValue(String),

    /// `row_number() over (order by ...)`.
    RowNumber {
        /// Window ordering. Empty uses the dialect's fallback ordering.
        order_by: Vec<OrderBy>,
    },

    /// Reference to a select item by one-based position, for GROUP BY
    /// and ORDER BY.
    SelectItem(usize),

    /// Explicit parentheses.
    Paren(Box<Expr>),

    /// `*` or `table.*`.
    Wildcard {
        /// Qualifying table.
        table: Option<String>,
    },
}

impl Expr {
    /// Unqualified column.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            table: None,
            name: name.into(),
        }
    }

    /// `table.name`
    #[must_use]
    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Column {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    /// A value bound through a `?` marker.
    #[must_use]
    pub fn param(value: impl crate::builder::ToSqlValue) -> Self {
        Self::Param(value.to_sql_value())
    }

    #[must_use]
    pub const fn integer(value: i64) -> Self {
        Self::Literal(Literal::Integer(value))
    }

    /// A quoted string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// A truth value, written in the dialect's boolean literal form.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Boolean(value))
    }

    #[must_use]
    pub const fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    /// `name(args)`
    #[must_use]
    pub fn function(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Function(FunctionCall {
            name: name.into(),
            args,
            distinct: false,
        })
    }

    /// `self <op> right`.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    /// `self IS NULL`
    #[must_use]
    pub fn is_null(self) -> Self {
        Self::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    /// `self IS NOT NULL`
    #[must_use]
    pub fn is_not_null(self) -> Self {
        Self::IsNull {
            expr: Box::new(self),
            negated: true,
        }
    }

    /// `self IN (list)`. An empty list is rendered as a false predicate.
    #[must_use]
    pub fn in_list(self, list: Vec<Self>) -> Self {
        Self::In {
            expr: Box::new(self),
            list,
            negated: false,
        }
    }

    /// `self BETWEEN low AND high`
    #[must_use]
    pub fn between(self, low: Self, high: Self) -> Self {
        Self::Between {
            expr: Box::new(self),
            low: Box::new(low),
            high: Box::new(high),
            negated: false,
        }
    }

    /// Marks a stored truth value.
    #[must_use]
    pub fn stored_as(self, repr: BooleanRepr) -> Self {
        Self::Boolean {
            expr: Box::new(self),
            stored_as: repr,
        }
    }

    /// Returns the integer value of an integer literal or parameter.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Literal(Literal::Integer(n)) | Self::Param(SqlValue::Int(n)) => Some(*n),
            _ => None,
        }
    }
}
