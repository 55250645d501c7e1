//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens elsewhere.

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(Body, Body);
ast_node!(Attribute, Attribute);
ast_node!(Block, Block);
ast_node!(Conditional, Conditional);
ast_node!(BinaryOp, BinaryOp);
ast_node!(UnaryOp, UnaryOp);
ast_node!(ParenExpr, ParenExpr);
ast_node!(Tuple, Tuple);
ast_node!(Object, Object);
ast_node!(ObjectElem, ObjectElem);
ast_node!(FunctionCall, FunctionCall);
ast_node!(IndexExpr, IndexExpr);
ast_node!(GetAttr, GetAttr);
ast_node!(AttrSplat, AttrSplat);
ast_node!(FullSplat, FullSplat);
ast_node!(ForTupleExpr, ForTupleExpr);
ast_node!(ForObjectExpr, ForObjectExpr);
ast_node!(Literal, Literal);
ast_node!(Variable, Variable);

/// Expression: anything that can appear on the right of `=`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(Literal),
    Variable(Variable),
    Paren(ParenExpr),
    Unary(UnaryOp),
    Binary(BinaryOp),
    Conditional(Conditional),
    Tuple(Tuple),
    Object(Object),
    FunctionCall(FunctionCall),
    Index(IndexExpr),
    GetAttr(GetAttr),
    AttrSplat(AttrSplat),
    FullSplat(FullSplat),
    ForTuple(ForTupleExpr),
    ForObject(ForObjectExpr),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Literal => Literal::cast(node).map(Expr::Literal),
            SyntaxKind::Variable => Variable::cast(node).map(Expr::Variable),
            SyntaxKind::ParenExpr => ParenExpr::cast(node).map(Expr::Paren),
            SyntaxKind::UnaryOp => UnaryOp::cast(node).map(Expr::Unary),
            SyntaxKind::BinaryOp => BinaryOp::cast(node).map(Expr::Binary),
            SyntaxKind::Conditional => Conditional::cast(node).map(Expr::Conditional),
            SyntaxKind::Tuple => Tuple::cast(node).map(Expr::Tuple),
            SyntaxKind::Object => Object::cast(node).map(Expr::Object),
            SyntaxKind::FunctionCall => FunctionCall::cast(node).map(Expr::FunctionCall),
            SyntaxKind::IndexExpr => IndexExpr::cast(node).map(Expr::Index),
            SyntaxKind::GetAttr => GetAttr::cast(node).map(Expr::GetAttr),
            SyntaxKind::AttrSplat => AttrSplat::cast(node).map(Expr::AttrSplat),
            SyntaxKind::FullSplat => FullSplat::cast(node).map(Expr::FullSplat),
            SyntaxKind::ForTupleExpr => ForTupleExpr::cast(node).map(Expr::ForTuple),
            SyntaxKind::ForObjectExpr => ForObjectExpr::cast(node).map(Expr::ForObject),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Expr::Literal(n) => n.as_cst(),
            Expr::Variable(n) => n.as_cst(),
            Expr::Paren(n) => n.as_cst(),
            Expr::Unary(n) => n.as_cst(),
            Expr::Binary(n) => n.as_cst(),
            Expr::Conditional(n) => n.as_cst(),
            Expr::Tuple(n) => n.as_cst(),
            Expr::Object(n) => n.as_cst(),
            Expr::FunctionCall(n) => n.as_cst(),
            Expr::Index(n) => n.as_cst(),
            Expr::GetAttr(n) => n.as_cst(),
            Expr::AttrSplat(n) => n.as_cst(),
            Expr::FullSplat(n) => n.as_cst(),
            Expr::ForTuple(n) => n.as_cst(),
            Expr::ForObject(n) => n.as_cst(),
        }
    }
}

/// A statement inside a body.
#[derive(Debug, Clone)]
pub enum BodyItem {
    Attribute(Attribute),
    Block(Block),
}

impl Root {
    pub fn body(&self) -> Option<Body> {
        self.0.children().find_map(Body::cast)
    }

    /// The single expression of a tree built by `parse_expression_only`.
    pub fn expr(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl Body {
    pub fn items(&self) -> impl Iterator<Item = BodyItem> + '_ {
        self.0.children().filter_map(|node| match node.kind() {
            SyntaxKind::Attribute => Attribute::cast(node).map(BodyItem::Attribute),
            SyntaxKind::Block => Block::cast(node).map(BodyItem::Block),
            _ => None,
        })
    }
}

fn first_ident(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == SyntaxKind::Ident)
}

impl Attribute {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_ident(&self.0)
    }

    pub fn value(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl Block {
    pub fn type_token(&self) -> Option<SyntaxToken> {
        first_ident(&self.0)
    }

    /// Labels between the type identifier and the opening brace.
    pub fn labels(&self) -> Vec<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .take_while(|t| t.kind() != SyntaxKind::LBrace)
            .filter(|t| matches!(t.kind(), SyntaxKind::Ident | SyntaxKind::StringLit))
            .skip(1)
            .collect()
    }

    pub fn body(&self) -> Option<Body> {
        self.0.children().find_map(Body::cast)
    }
}

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| !t.kind().is_trivia())
    }
}

impl Variable {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_ident(&self.0)
    }
}

impl ParenExpr {
    pub fn inner(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl UnaryOp {
    pub fn operator(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::Minus | SyntaxKind::Bang))
    }

    pub fn operand(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl Tuple {
    pub fn elements(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl Object {
    pub fn elems(&self) -> impl Iterator<Item = ObjectElem> + '_ {
        self.0.children().filter_map(ObjectElem::cast)
    }
}

impl ObjectElem {
    /// Key tokens for identifier / dotted-path / string / number keys.
    /// Empty when the key is a parenthesised expression.
    pub fn key_tokens(&self) -> Vec<SyntaxToken> {
        self.0
            .children_with_tokens()
            .take_while(|it| {
                !matches!(
                    it.as_token().map(|t| t.kind()),
                    Some(SyntaxKind::Eq) | Some(SyntaxKind::Colon)
                )
            })
            .filter_map(|it| it.into_token())
            .filter(|t| !t.kind().is_trivia())
            .collect()
    }

    /// The key when it is a parenthesised expression.
    pub fn key_expr(&self) -> Option<ParenExpr> {
        let mut exprs = self.0.children().filter_map(Expr::cast);
        match (exprs.next(), exprs.next()) {
            (Some(Expr::Paren(key)), Some(_)) => Some(key),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).last()
    }
}
