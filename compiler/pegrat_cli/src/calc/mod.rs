//! Integer calculator grammar.
//!
//! ```text
//! expression ← ws level(0) ws EOI
//! level(n)   ← level(n) ws op(n) ws level(n + 1) / level(n + 1)
//! level(2)   ← factor
//! factor     ← '-' ws factor / number / '(' ws level(0) ws ')'
//! op(0)      ← '+' / '-'
//! op(1)      ← '*' / '/' / '%'
//! ```
//!
//! Both operator levels are one left-recursive rule parameterized by the
//! level, so associativity comes from seed growing rather than from a
//! loop.

mod ast;

pub use ast::{BinOp, EvalError, Expr};

use pegrat::{first_of, rule_args, Failure, PResult, ParseContext, Rule, RuleArgs};

const LEVEL: Rule = Rule::new("calc", "level");
const FACTOR: Rule = Rule::new("calc", "factor");

const LEVELS: &[&[(&str, BinOp)]] = &[
    &[("+", BinOp::Add), ("-", BinOp::Sub)],
    &[("*", BinOp::Mul), ("/", BinOp::Div), ("%", BinOp::Rem)],
];

/// Parse a complete expression, surrounding white space allowed.
pub fn expression(ctx: &mut ParseContext<'_>) -> PResult<Expr> {
    whitespace(ctx)?;
    let expr = level(ctx, 0)?;
    whitespace(ctx)?;
    ctx.eoi()?;
    Ok(expr)
}

fn level(ctx: &mut ParseContext<'_>, n: usize) -> PResult<Expr> {
    let Some(&operators) = LEVELS.get(n) else {
        return factor(ctx);
    };
    ctx.invoke(&LEVEL, rule_args![n], |ctx| {
        first_of!(ctx;
            |ctx| {
                let left = level(ctx, n)?;
                whitespace(ctx)?;
                let op = operator(ctx, operators)?;
                whitespace(ctx)?;
                let right = level(ctx, n + 1)?;
                Ok(Expr::binary(op, left, right))
            },
            |ctx| level(ctx, n + 1),
        )
    })
}

fn operator(ctx: &mut ParseContext<'_>, operators: &[(&'static str, BinOp)]) -> PResult<BinOp> {
    ctx.first_of_all(
        operators
            .iter()
            .map(|&(symbol, op)| move |ctx: &mut ParseContext<'_>| ctx.str(symbol).map(|_| op)),
    )
}

fn factor(ctx: &mut ParseContext<'_>) -> PResult<Expr> {
    ctx.invoke(&FACTOR, RuleArgs::new(), |ctx| {
        first_of!(ctx;
            |ctx| {
                ctx.str("-")?;
                whitespace(ctx)?;
                Ok(Expr::Neg(Box::new(factor(ctx)?)))
            },
            number,
            |ctx| {
                ctx.str("(")?;
                whitespace(ctx)?;
                let inner = level(ctx, 0)?;
                whitespace(ctx)?;
                ctx.str(")")?;
                Ok(inner)
            },
        )
    })
}

fn number(ctx: &mut ParseContext<'_>) -> PResult<Expr> {
    ctx.atomic("number", |ctx| {
        let digits = ctx.one_or_more_chars(|c| c.is_ascii_digit(), "digit")?;
        digits.parse().map(Expr::Number).map_err(|_| Failure::NoMatch)
    })
}

fn whitespace(ctx: &mut ParseContext<'_>) -> PResult<()> {
    ctx.zero_or_more_chars(char::is_whitespace, "white space")
        .map(|_| ())
}
