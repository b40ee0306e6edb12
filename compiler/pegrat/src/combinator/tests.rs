use super::*;
use pretty_assertions::assert_eq;

fn expected(ctx: &ParseContext<'_>) -> (usize, Vec<String>) {
    let frame = ctx.expectations();
    (frame.position(), frame.expectations().to_vec())
}

fn labels(position: usize, labels: &[&str]) -> (usize, Vec<String>) {
    (position, labels.iter().map(|l| (*l).to_owned()).collect())
}

#[test]
fn first_of_takes_first_success_in_order() {
    let mut ctx = ParseContext::new("ab");
    let result = first_of!(&mut ctx;
        |ctx| ctx.str("a").map(|_| 1),
        |ctx| ctx.str("ab").map(|_| 2),
    );
    assert_eq!(result, Ok(1));
    assert_eq!(ctx.index(), 1);
}

#[test]
fn first_of_backtracks_failed_alternatives() {
    let mut ctx = ParseContext::new("ac");
    let result = first_of!(&mut ctx;
        |ctx| {
            ctx.str("a")?;
            ctx.str("b")
        },
        |ctx| ctx.str("ac"),
    );
    assert_eq!(result, Ok("ac"));
    assert_eq!(ctx.index(), 2);
}

#[test]
fn first_of_reports_all_alternatives() {
    let mut ctx = ParseContext::new("x");
    let result = first_of!(&mut ctx;
        |ctx| ctx.str("a"),
        |ctx| ctx.str("b"),
    );
    assert_eq!(result, Err(Failure::NoMatch));
    assert_eq!(ctx.index(), 0);
    assert_eq!(expected(&ctx), labels(0, &["a", "b"]));
}

#[test]
fn first_of_propagates_fatal_failures() {
    let mut ctx = ParseContext::new("a");
    let result: PResult<&str> = first_of!(&mut ctx;
        |_| Err(Failure::InvalidSnapshotReuse),
        |ctx| ctx.str("a"),
    );
    assert_eq!(result, Err(Failure::InvalidSnapshotReuse));
}

#[test]
fn first_of_all_over_runtime_alternatives() {
    let keywords = ["if", "in", "int"];
    let mut ctx = ParseContext::new("int");
    let result = ctx.first_of_all(keywords.iter().rev().map(|kw| {
        move |ctx: &mut ParseContext<'_>| ctx.str(kw).map(|_| *kw)
    }));
    assert_eq!(result, Ok("int"));

    let mut ctx = ParseContext::new("x");
    let result = ctx.first_of_all(keywords.iter().map(|kw| {
        move |ctx: &mut ParseContext<'_>| ctx.str(kw).map(|_| *kw)
    }));
    assert_eq!(result, Err(Failure::NoMatch));
    assert_eq!(expected(&ctx), labels(0, &["if", "in", "int"]));
}

#[test]
fn zero_or_more_collects_until_failure() {
    let mut ctx = ParseContext::new("aaab");
    assert_eq!(ctx.zero_or_more(|ctx| ctx.str("a")), Ok(vec!["a", "a", "a"]));
    assert_eq!(ctx.index(), 3);
    assert_eq!(ctx.zero_or_more(|ctx| ctx.str("a")), Ok(vec![]));
    assert_eq!(ctx.index(), 3);
}

#[test]
fn zero_or_more_backtracks_partial_match() {
    let mut ctx = ParseContext::new("ababa");
    let pairs = ctx.zero_or_more(|ctx| {
        ctx.str("a")?;
        ctx.str("b")
    });
    assert_eq!(pairs.map(|p| p.len()), Ok(2));
    assert_eq!(ctx.index(), 4);
}

#[test]
fn zero_or_more_stops_on_empty_match() {
    let mut ctx = ParseContext::new("b");
    let items = ctx.zero_or_more(|ctx| ctx.optional(|ctx| ctx.str("a")));
    assert_eq!(items, Ok(vec![None]));
    assert_eq!(ctx.index(), 0);
}

#[test]
fn one_or_more_needs_a_match() {
    let mut ctx = ParseContext::new("bb");
    assert_eq!(ctx.one_or_more(|ctx| ctx.str("a")), Err(Failure::NoMatch));
    assert_eq!(ctx.one_or_more(|ctx| ctx.str("b")), Ok(vec!["b", "b"]));
}

#[test]
fn separated_repetition() {
    let mut ctx = ParseContext::new("1,2,3,");
    let digits = ctx.one_or_more_sep(|ctx| ctx.char_range('0', '9'), |ctx| ctx.str(","));
    assert_eq!(digits, Ok(vec!['1', '2', '3']));
    assert_eq!(ctx.index(), 5);

    let mut ctx = ParseContext::new("x");
    let digits = ctx.zero_or_more_sep(|ctx| ctx.char_range('0', '9'), |ctx| ctx.str(","));
    assert_eq!(digits, Ok(vec![]));
    assert_eq!(ctx.index(), 0);

    let mut ctx = ParseContext::new("x");
    let digits = ctx.one_or_more_sep(|ctx| ctx.char_range('0', '9'), |ctx| ctx.str(","));
    assert_eq!(digits, Err(Failure::NoMatch));
}

#[test]
fn optional_never_fails_on_mismatch() {
    let mut ctx = ParseContext::new("ab");
    assert_eq!(ctx.optional(|ctx| ctx.str("b")), Ok(None));
    assert_eq!(ctx.optional(|ctx| ctx.str("a")), Ok(Some("a")));
    assert_eq!(ctx.index(), 1);
}

#[test]
fn not_succeeds_without_consuming() {
    let mut ctx = ParseContext::new("b");
    assert_eq!(ctx.not("no a", |ctx| ctx.str("a")), Ok(()));
    assert_eq!(ctx.index(), 0);
    assert!(ctx.expectations().is_empty());
}

#[test]
fn not_fails_with_label_when_term_matches() {
    let mut ctx = ParseContext::new("a");
    assert_eq!(ctx.not("anything but a", |ctx| ctx.str("a")), Err(Failure::NoMatch));
    assert_eq!(ctx.index(), 0);
    assert_eq!(expected(&ctx), labels(0, &["anything but a"]));
}

#[test]
fn test_returns_value_without_consuming() {
    let mut ctx = ParseContext::new("ab");
    assert_eq!(ctx.test(|ctx| ctx.str("ab")), Ok("ab"));
    assert_eq!(ctx.index(), 0);
    assert_eq!(ctx.test(|ctx| ctx.str("b")), Err(Failure::NoMatch));
    assert_eq!(ctx.index(), 0);
}

#[test]
fn test_undoes_partial_consumption_on_failure() {
    let mut ctx = ParseContext::new("abc");
    let result = ctx.test(|ctx| {
        ctx.str("a")?;
        ctx.str("b")?;
        ctx.str("x")
    });
    assert_eq!(result, Err(Failure::NoMatch));
    assert_eq!(ctx.index(), 0);
    assert_eq!(expected(&ctx), labels(2, &["x"]));
}

#[test]
fn not_undoes_partial_consumption_on_failure() {
    let mut ctx = ParseContext::new("abc");
    let result = ctx.not("no abx", |ctx| {
        ctx.str("ab")?;
        ctx.str("x")
    });
    assert_eq!(result, Ok(()));
    assert_eq!(ctx.index(), 0);
}

#[test]
fn atomic_reports_only_its_label_at_start() {
    let mut ctx = ParseContext::new("abx");
    let result = ctx.atomic("keyword", |ctx| ctx.str("abc"));
    assert_eq!(result, Err(Failure::NoMatch));
    assert_eq!(ctx.index(), 0);
    assert_eq!(expected(&ctx), labels(0, &["keyword"]));

    let mut ctx = ParseContext::new("abx");
    let result = ctx.atomic("keyword", |ctx| {
        ctx.str("a")?;
        ctx.str("b")?;
        ctx.str("c")
    });
    assert_eq!(result, Err(Failure::NoMatch));
    assert_eq!(expected(&ctx), labels(0, &["keyword"]));
}

#[test]
fn atomic_drops_expectations_on_success() {
    let mut ctx = ParseContext::new("ab");
    let result = ctx.atomic("pair", |ctx| {
        ctx.optional(|ctx| ctx.str("x"))?;
        ctx.str("ab")
    });
    assert_eq!(result, Ok("ab"));
    assert!(ctx.expectations().is_empty());
}

#[test]
fn expect_reports_label_at_farthest_position() {
    let mut ctx = ParseContext::new("abx");
    let result = ctx.expect("word", |ctx| {
        ctx.str("a")?;
        ctx.str("b")?;
        ctx.str("c")
    });
    assert_eq!(result, Err(Failure::NoMatch));
    assert_eq!(ctx.index(), 0);
    assert_eq!(expected(&ctx), labels(2, &["word"]));
}

#[test]
fn precedence_rejects_lower_levels() {
    let mut ctx = ParseContext::new("x");
    let result = ctx.precedence(5, |ctx| ctx.precedence(3, |ctx| ctx.any_char()));
    assert_eq!(result, Err(Failure::NoMatch));
    assert_eq!(
        expected(&ctx),
        labels(0, &["term of precedence above or equal 5"])
    );
    assert_eq!(ctx.min_precedence(), 0);

    let result = ctx.precedence(3, |ctx| ctx.precedence(5, |ctx| Ok(ctx.min_precedence())));
    assert_eq!(result, Ok(5));
    assert_eq!(ctx.min_precedence(), 0);
}

#[test]
fn str_matches_whole_literal_or_nothing() {
    let mut ctx = ParseContext::new("fo");
    assert_eq!(ctx.str("foo"), Err(Failure::NoMatch));
    assert_eq!(ctx.index(), 0);
    assert_eq!(expected(&ctx), labels(0, &["foo"]));

    let mut ctx = ParseContext::new("foa ");
    assert_eq!(ctx.str("foo"), Err(Failure::NoMatch));
    assert_eq!(expected(&ctx), labels(0, &["foo"]));

    let mut ctx = ParseContext::new("foo bar");
    assert_eq!(ctx.str("foo"), Ok("foo"));
    assert_eq!(ctx.index(), 3);
}

#[test]
fn any_char_at_end_of_input() {
    let mut ctx = ParseContext::new("a");
    let result = ctx.str("a").and_then(|_| ctx.any_char());
    assert_eq!(result, Err(Failure::NoMatch));
    assert_eq!(expected(&ctx), labels(1, &["any character"]));
}

#[test]
fn char_matching_reports_label() {
    for input in ["1", ""] {
        let mut ctx = ParseContext::new(input);
        assert_eq!(
            ctx.char_matching(char::is_alphabetic, "letter"),
            Err(Failure::NoMatch)
        );
        assert_eq!(expected(&ctx), labels(0, &["letter"]));
    }

    let mut ctx = ParseContext::new("ß");
    assert_eq!(ctx.char_matching(char::is_alphabetic, "letter"), Ok('ß'));
    assert_eq!(ctx.index(), 2);
}

#[test]
fn char_range_reports_bounds() {
    for input in ["c", ""] {
        let mut ctx = ParseContext::new(input);
        assert_eq!(ctx.char_range('a', 'b'), Err(Failure::NoMatch));
        assert_eq!(expected(&ctx), labels(0, &["character between a and b"]));
    }
    let mut ctx = ParseContext::new("b");
    assert_eq!(ctx.char_range('a', 'b'), Ok('b'));
}

#[test]
fn none_of_excludes_listed_chars() {
    let mut ctx = ParseContext::new("x\"");
    assert_eq!(ctx.none_of("\"\\"), Ok('x'));
    assert_eq!(ctx.none_of("\"\\"), Err(Failure::NoMatch));
    assert_eq!(ctx.index(), 1);
    assert_eq!(expected(&ctx), labels(1, &["any char except \"\\"]));
}

#[test]
fn eoi_only_at_end() {
    let mut ctx = ParseContext::new("a");
    assert_eq!(ctx.eoi(), Err(Failure::NoMatch));
    assert_eq!(expected(&ctx), labels(0, &["End Of Input"]));
    ctx.any_char().ok();
    assert_eq!(ctx.eoi(), Ok(()));
}

#[test]
fn char_runs_register_stop_position() {
    let mut ctx = ParseContext::new("  x");
    assert_eq!(ctx.zero_or_more_chars(char::is_whitespace, "white space"), Ok("  "));
    assert_eq!(ctx.index(), 2);
    assert_eq!(expected(&ctx), labels(2, &["white space"]));

    assert_eq!(ctx.zero_or_more_chars(char::is_whitespace, "white space"), Ok(""));
    assert_eq!(
        ctx.one_or_more_chars(|c| c.is_ascii_digit(), "digit"),
        Err(Failure::NoMatch)
    );
    assert_eq!(expected(&ctx), labels(2, &["white space", "digit"]));
    assert_eq!(ctx.index(), 2);
}

#[test]
fn char_runs_handle_multibyte_input() {
    let mut ctx = ParseContext::new("äöü1");
    assert_eq!(ctx.one_or_more_chars(char::is_alphabetic, "letter"), Ok("äöü"));
    assert_eq!(ctx.index(), 6);
    assert_eq!(ctx.one_or_more_chars(char::is_alphabetic, "letter"), Err(Failure::NoMatch));
}
