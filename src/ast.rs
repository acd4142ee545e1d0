use std::fmt;

use crate::position::Position;

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Number {
        position: Position,
        value: f64,
    },
    Variable {
        position: Position,
        name: String,
    },
    /// `op` is always one of the parser's binary operators.
    Binary {
        position: Position,
        op: char,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Call {
        position: Position,
        callee: String,
        args: Vec<Expression>,
    },
}

impl Expression {
    pub fn position(&self) -> &Position {
        match self {
            Expression::Number { position, .. }
            | Expression::Variable { position, .. }
            | Expression::Binary { position, .. }
            | Expression::Call { position, .. } => position,
        }
    }
}

/// Fully parenthesised infix, e.g. `(x + (2 * foo(y)))`.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Number { value, .. } => write!(f, "{}", value),
            Expression::Variable { name, .. } => f.write_str(name),
            Expression::Binary { op, lhs, rhs, .. } => write!(f, "({} {} {})", lhs, op, rhs),
            Expression::Call { callee, args, .. } => {
                write!(f, "{}(", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Name and parameter names of a function.
///
/// An empty name marks the anonymous prototype wrapped around a top-level
/// expression.
#[derive(Debug, PartialEq, Clone)]
pub struct Prototype {
    pub position: Position,
    pub name: String,
    pub args: Vec<String>,
}

impl Prototype {
    pub fn anonymous(position: Position) -> Self {
        Self {
            position,
            name: String::new(),
            args: Vec::new(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.args.join(", "))
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Function {
    pub prototype: Prototype,
    pub body: Expression,
}

impl Function {
    pub fn position(&self) -> &Position {
        &self.prototype.position
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prototype.is_anonymous() {
            write!(f, "{}", self.body)
        } else {
            write!(f, "def {} {}", self.prototype, self.body)
        }
    }
}

/// A completed top-level construct, handed to whatever consumes the AST.
#[derive(Debug, PartialEq, Clone)]
pub enum ASTNode {
    Extern(Prototype),
    Function(Function),
}

impl ASTNode {
    pub fn position(&self) -> &Position {
        match self {
            ASTNode::Extern(proto) => &proto.position,
            ASTNode::Function(func) => func.position(),
        }
    }
}

impl fmt::Display for ASTNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ASTNode::Extern(proto) => write!(f, "extern {}", proto),
            ASTNode::Function(func) => func.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(column: usize) -> Position {
        Position::new("test", 1, column)
    }

    fn num(value: f64) -> Expression {
        Expression::Number {
            position: pos(1),
            value,
        }
    }

    #[test]
    fn expression_display_works() {
        let expr = Expression::Binary {
            position: pos(3),
            op: '+',
            lhs: Box::new(Expression::Variable {
                position: pos(1),
                name: "x".to_string(),
            }),
            rhs: Box::new(Expression::Call {
                position: pos(5),
                callee: "foo".to_string(),
                args: vec![num(1.5), num(2.0)],
            }),
        };
        assert_eq!(expr.to_string(), "(x + foo(1.5, 2))");
        assert_eq!(expr.position(), &pos(3));
    }

    #[test]
    fn node_display_works() {
        let proto = Prototype {
            position: pos(8),
            name: "sin".to_string(),
            args: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(ASTNode::Extern(proto.clone()).to_string(), "extern sin(a, b)");

        let def = Function {
            prototype: proto,
            body: num(0.0),
        };
        assert_eq!(ASTNode::Function(def).to_string(), "def sin(a, b) 0");

        let anon = Function {
            prototype: Prototype::anonymous(pos(1)),
            body: num(4.0),
        };
        assert!(anon.prototype.is_anonymous());
        assert_eq!(anon.to_string(), "4");
    }
}
