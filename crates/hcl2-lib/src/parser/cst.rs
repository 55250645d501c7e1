//! Syntax kinds for HCL2.
//!
//! `SyntaxKind` serves dual roles: token kinds (from lexer) and node kinds (from parser).
//! Logos derives token recognition; node kinds lack token/regex attributes.
//! `HclLang` implements Rowan's `Language` trait for tree construction.
//!
//! Keywords (`for`, `in`, `if`, `true`, `false`, `null`) are not token kinds:
//! HCL2 only treats them as keywords in expression positions, so they lex as
//! `Ident` and the parser checks token text where it matters.

use logos::Logos;
use rowan::Language;

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("{")]
    LBrace = 0,

    #[token("}")]
    RBrace,

    /// `[*]` full splat. Defined before `LBrack` so the longer form wins.
    #[token("[*]")]
    BracketSplat,

    #[token("[")]
    LBrack,

    #[token("]")]
    RBrack,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    /// `.*` attribute splat.
    #[token(".*")]
    DotStar,

    #[token("...")]
    Ellipsis,

    #[token(".")]
    Dot,

    /// `::` in namespaced function calls. Defined before `Colon` for correct precedence.
    #[token("::")]
    DoubleColon,

    #[token(":")]
    Colon,

    #[token("?")]
    Question,

    #[token("=>")]
    FatArrow,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("=")]
    Eq,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("&&")]
    AndAnd,

    #[token("||")]
    OrOr,

    #[token("!")]
    Bang,

    /// Identifier. HCL2 allows dashes and digits after the first character.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    #[regex(r"[0-9]+")]
    IntLit,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    FloatLit,

    /// Quoted template, including both quotes and any `${…}` interpolations.
    /// The callback tracks interpolation brace depth so a `}` inside a nested
    /// object closes the correct brace, and honours `$${` escapes.
    #[token("\"", super::lexer::lex_string)]
    StringLit,

    /// `<<TAG … TAG` or `<<-TAG … TAG`, lexed as one atomic token up to and
    /// including the terminator tag. An unterminated heredoc consumes the rest
    /// of the input; the parser reports it.
    #[token("<<", super::lexer::lex_heredoc)]
    #[token("<<-", super::lexer::lex_heredoc)]
    HeredocLit,

    /// Horizontal whitespace. Discarded by the reconstructor.
    #[regex(r"[ \t]+")]
    Whitespace,

    /// One or more newlines plus the indent of the following line. Statement
    /// separator in bodies; emitted verbatim by the reconstructor.
    #[regex(r"(\r?\n[ \t]*)+")]
    Newline,

    #[regex(r"#[^\n]*", allow_greedy = true)]
    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*[^/])*\*/")]
    BlockComment,

    /// Coalesced unrecognized characters
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    Root,
    Body,
    Attribute,
    Block,
    Conditional,
    BinaryOp,
    UnaryOp,
    ParenExpr,
    Tuple,
    Object,
    ObjectElem,
    FunctionCall,
    Arguments,
    IndexExpr,
    GetAttr,
    AttrSplat,
    FullSplat,
    ForTupleExpr,
    ForObjectExpr,
    ForIntro,
    ForCond,
    Literal,
    Variable,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    /// Trivia the parser buffers implicitly. Newlines are not trivia: they
    /// separate statements and the grammar consumes them explicitly.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | LineComment | BlockComment)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HclLang {}

impl Language for HclLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<HclLang>;
pub type SyntaxToken = rowan::SyntaxToken<HclLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// 64-bit bitset of token `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    /// Panics at compile time if any kind's discriminant >= 64. Node kinds sit
    /// above the token range, so only token kinds fit; that is the point.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 64, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 64 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }
}

/// Pre-defined token sets for the parser.
pub mod token_sets {
    use super::*;

    /// FIRST set of an expression term.
    pub const EXPR_FIRST: TokenSet = TokenSet::new(&[
        LParen, LBrack, LBrace, Ident, IntLit, FloatLit, StringLit, HeredocLit, Minus, Bang,
    ]);

    /// Tokens that may appear as a block label.
    pub const LABEL: TokenSet = TokenSet::new(&[Ident, StringLit]);

    /// Tokens that may start an object element key.
    pub const OBJECT_KEY_FIRST: TokenSet =
        TokenSet::new(&[Ident, StringLit, IntLit, FloatLit, LParen]);
}
