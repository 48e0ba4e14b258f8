//! Abstract Syntax Tree types
//!
//! Closed sum types for statements and expressions. Identifier and
//! scope-introducing nodes carry arena handles (`SymbolId`, `ScopeId`) that
//! the scope analyzer fills in; they are `None` on a freshly parsed tree.

use std::collections::BTreeMap;

use crate::frontend::core::lexer::tokens::Comment;
use crate::middle::scope::{ScopeId, ScopeTree, SymbolId};
use crate::util::span::Span;

/// Leading comments of a token, keyed in [`Program::comments`] by token offset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadingComments {
    pub comments: Vec<Comment>,
    /// The owning token started a new line
    pub nlb: bool,
}

/// A parsed program
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
    /// Name recorded in source maps
    pub source_name: Option<String>,
    /// Comments preceding a token, keyed by the token's start offset
    pub comments: BTreeMap<usize, LeadingComments>,
    /// Comments between the last token and the end of input
    pub trailing_comments: Vec<Comment>,
    /// Scope arena; empty until `resolve_scopes` runs
    pub scopes: ScopeTree,
}

/// An identifier, either a declaration or a reference
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub def: Option<SymbolId>,
    pub span: Span,
}

impl Ident {
    pub fn new(
        name: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            def: None,
            span,
        }
    }
}

/// A statement label, or the target of `break`/`continue`
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub name: String,
    pub span: Span,
}

/// Function declaration, expression, getter or setter
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<Ident>,
    pub params: Vec<Ident>,
    pub body: Vec<Stmt>,
    pub scope: Option<ScopeId>,
    pub span: Span,
}

/// `var` or `const`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Const,
}

impl VarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Const => "const",
        }
    }
}

/// A declaration statement: `var a = 1, b`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub kind: VarKind,
    pub defs: Vec<VarDef>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDef {
    pub name: Ident,
    pub value: Option<Expr>,
    pub span: Span,
}

/// `case test:` or `default:` (when `test` is `None`)
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub test: Option<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `catch (param) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct Catch {
    pub param: Ident,
    pub body: Vec<Stmt>,
    pub scope: Option<ScopeId>,
    pub span: Span,
}

/// Initializer clause of a `for` loop
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Var(VarDecl),
    Expr(Expr),
}

/// Left side of a `for-in` loop
#[derive(Debug, Clone, PartialEq)]
pub enum ForInLeft {
    Var(VarDecl),
    Expr(Expr),
}

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Directive prologue entry such as `"use strict"`
    Directive { value: String, span: Span },
    Expr { expr: Expr, span: Span },
    Block { body: Vec<Stmt>, span: Span },
    Empty(Span),
    Debugger(Span),
    Labeled {
        label: Label,
        body: Box<Stmt>,
        span: Span,
    },
    If {
        test: Expr,
        cons: Box<Stmt>,
        alt: Option<Box<Stmt>>,
        span: Span,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    DoWhile {
        body: Box<Stmt>,
        test: Expr,
        span: Span,
    },
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
        span: Span,
    },
    ForIn {
        left: ForInLeft,
        object: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    With {
        object: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
        span: Span,
    },
    Return { value: Option<Expr>, span: Span },
    Throw { value: Expr, span: Span },
    Break { label: Option<Label>, span: Span },
    Continue { label: Option<Label>, span: Span },
    Try {
        block: Vec<Stmt>,
        handler: Option<Catch>,
        finalizer: Option<Vec<Stmt>>,
        span: Span,
    },
    Var(VarDecl),
    /// Function declaration; the name is always present
    Function(Function),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Directive { span, .. }
            | Stmt::Expr { span, .. }
            | Stmt::Block { span, .. }
            | Stmt::Labeled { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::DoWhile { span, .. }
            | Stmt::For { span, .. }
            | Stmt::ForIn { span, .. }
            | Stmt::With { span, .. }
            | Stmt::Switch { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::Throw { span, .. }
            | Stmt::Break { span, .. }
            | Stmt::Continue { span, .. }
            | Stmt::Try { span, .. } => *span,
            Stmt::Empty(span) | Stmt::Debugger(span) => *span,
            Stmt::Var(decl) => decl.span,
            Stmt::Function(func) => func.span,
        }
    }

    /// Expression statement with the expression's span
    pub fn expr(expr: Expr) -> Stmt {
        let span = expr.span();
        Stmt::Expr { expr, span }
    }

    /// Block statement, or `Empty` when `body` is empty
    pub fn block(
        body: Vec<Stmt>,
        span: Span,
    ) -> Stmt {
        if body.is_empty() {
            Stmt::Empty(span)
        } else {
            Stmt::Block { body, span }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Stmt::Empty(_) => true,
            Stmt::Block { body, .. } => body.iter().all(Stmt::is_empty),
            _ => false,
        }
    }

    /// Statements of a block, or the statement itself
    pub fn into_body(self) -> Vec<Stmt> {
        match self {
            Stmt::Block { body, .. } => body,
            Stmt::Empty(_) => Vec::new(),
            other => vec![other],
        }
    }
}

/// Binary operators, including the logical ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Gt,
    LtE,
    GtE,
    In,
    InstanceOf,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtE => "<=",
            BinaryOp::GtE => ">=",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }

    pub fn from_str(op: &str) -> Option<BinaryOp> {
        Some(match op {
            "||" => BinaryOp::Or,
            "&&" => BinaryOp::And,
            "|" => BinaryOp::BitOr,
            "^" => BinaryOp::BitXor,
            "&" => BinaryOp::BitAnd,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::NotEq,
            "===" => BinaryOp::StrictEq,
            "!==" => BinaryOp::StrictNotEq,
            "<" => BinaryOp::Lt,
            ">" => BinaryOp::Gt,
            "<=" => BinaryOp::LtE,
            ">=" => BinaryOp::GtE,
            "in" => BinaryOp::In,
            "instanceof" => BinaryOp::InstanceOf,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::Shr,
            ">>>" => BinaryOp::UShr,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            _ => return None,
        })
    }

    /// Operators that may appear before `=` in a compound assignment
    pub fn is_assignable(&self) -> bool {
        !matches!(
            self,
            BinaryOp::Or
                | BinaryOp::And
                | BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::StrictEq
                | BinaryOp::StrictNotEq
                | BinaryOp::Lt
                | BinaryOp::Gt
                | BinaryOp::LtE
                | BinaryOp::GtE
                | BinaryOp::In
                | BinaryOp::InstanceOf
        )
    }

    /// Swapping the operands does not change the result
    pub fn is_commutative(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::StrictEq
                | BinaryOp::StrictNotEq
                | BinaryOp::Mul
                | BinaryOp::BitAnd
                | BinaryOp::BitOr
                | BinaryOp::BitXor
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::Or | BinaryOp::And)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::StrictEq
                | BinaryOp::StrictNotEq
                | BinaryOp::Lt
                | BinaryOp::Gt
                | BinaryOp::LtE
                | BinaryOp::GtE
        )
    }
}

/// Unary operators; `Inc`/`Dec` may be prefix or postfix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Typeof,
    Void,
    Delete,
    Inc,
    Dec,
    Not,
    BitNot,
    Neg,
    Plus,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Typeof => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
            UnaryOp::Inc => "++",
            UnaryOp::Dec => "--",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
        }
    }

    pub fn from_prefix(op: &str) -> Option<UnaryOp> {
        Some(match op {
            "typeof" => UnaryOp::Typeof,
            "void" => UnaryOp::Void,
            "delete" => UnaryOp::Delete,
            "++" => UnaryOp::Inc,
            "--" => UnaryOp::Dec,
            "!" => UnaryOp::Not,
            "~" => UnaryOp::BitNot,
            "-" => UnaryOp::Neg,
            "+" => UnaryOp::Plus,
            _ => return None,
        })
    }

    pub fn is_update(&self) -> bool {
        matches!(self, UnaryOp::Inc | UnaryOp::Dec)
    }
}

/// Object literal property
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    /// Property name as a string; numeric keys keep their source text value
    pub key: String,
    /// The key was written as a string literal
    pub quoted: bool,
    pub kind: PropKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropKind {
    Init(Expr),
    Get(Function),
    Set(Function),
}

/// Expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num { value: f64, span: Span },
    Str { value: String, span: Span },
    Regexp {
        pattern: String,
        flags: String,
        span: Span,
    },
    Bool { value: bool, span: Span },
    Null(Span),
    This(Span),
    /// Elision inside an array literal
    Hole(Span),
    Ident(Ident),
    Array { elements: Vec<Expr>, span: Span },
    Object { props: Vec<Prop>, span: Span },
    Function(Box<Function>),
    Unary {
        op: UnaryOp,
        prefix: bool,
        expr: Box<Expr>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    /// `target = value`, or `target op= value` when `op` is set
    Assign {
        op: Option<BinaryOp>,
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },
    Conditional {
        test: Box<Expr>,
        cons: Box<Expr>,
        alt: Box<Expr>,
        span: Span,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
    Dot {
        object: Box<Expr>,
        prop: String,
        span: Span,
    },
    Sub {
        object: Box<Expr>,
        prop: Box<Expr>,
        span: Span,
    },
    /// Comma operator; always holds at least two expressions
    Seq { exprs: Vec<Expr>, span: Span },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Num { span, .. }
            | Expr::Str { span, .. }
            | Expr::Regexp { span, .. }
            | Expr::Bool { span, .. }
            | Expr::Array { span, .. }
            | Expr::Object { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Assign { span, .. }
            | Expr::Conditional { span, .. }
            | Expr::Call { span, .. }
            | Expr::New { span, .. }
            | Expr::Dot { span, .. }
            | Expr::Sub { span, .. }
            | Expr::Seq { span, .. } => *span,
            Expr::Null(span) | Expr::This(span) | Expr::Hole(span) => *span,
            Expr::Ident(ident) => ident.span,
            Expr::Function(func) => func.span,
        }
    }

    pub fn num(
        value: f64,
        span: Span,
    ) -> Expr {
        Expr::Num { value, span }
    }

    pub fn str(
        value: impl Into<String>,
        span: Span,
    ) -> Expr {
        Expr::Str {
            value: value.into(),
            span,
        }
    }

    pub fn unary(
        op: UnaryOp,
        expr: Expr,
        span: Span,
    ) -> Expr {
        Expr::Unary {
            op,
            prefix: true,
            expr: Box::new(expr),
            span,
        }
    }

    pub fn binary(
        op: BinaryOp,
        left: Expr,
        right: Expr,
        span: Span,
    ) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }
    }

    /// `!expr`
    pub fn not(expr: Expr) -> Expr {
        let span = expr.span();
        Expr::unary(UnaryOp::Not, expr, span)
    }

    /// `void 0`
    pub fn undefined(span: Span) -> Expr {
        Expr::unary(UnaryOp::Void, Expr::num(0.0, span), span)
    }

    /// Comma expression, flattening nested sequences; a single element is returned as is
    pub fn seq(
        exprs: Vec<Expr>,
        span: Span,
    ) -> Expr {
        let mut flat = Vec::with_capacity(exprs.len());
        for expr in exprs {
            match expr {
                Expr::Seq { exprs, .. } => flat.extend(exprs),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Expr::Seq { exprs: flat, span }
        }
    }

    /// Whether the expression may be the target of an assignment
    pub fn is_assignable(&self) -> bool {
        matches!(self, Expr::Ident(_) | Expr::Dot { .. } | Expr::Sub { .. })
    }

    /// Literal constant, including `void 0` and negated numbers
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Num { .. }
            | Expr::Str { .. }
            | Expr::Bool { .. }
            | Expr::Null(_)
            | Expr::Regexp { .. } => true,
            Expr::Unary { op, expr, .. } => {
                matches!(op, UnaryOp::Not | UnaryOp::Neg | UnaryOp::Void)
                    && matches!(**expr, Expr::Num { .. } | Expr::Str { .. } | Expr::Bool { .. })
            }
            _ => false,
        }
    }

    /// The identifier name when this is a plain reference
    pub fn ident_name(&self) -> Option<&str> {
        match self {
            Expr::Ident(ident) => Some(&ident.name),
            _ => None,
        }
    }
}
