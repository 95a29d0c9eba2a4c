//! Pair matching
//!
//! Openers carry a positive pair value and closers the negated value of
//! the same family. Matching walks the index from the token toward its
//! partner, summing the pair values of same-family tokens until the
//! running weight returns to zero.

use crate::index::TokenIndex;
use crate::syntax::Token;

/// Find the token paired with `token`.
///
/// Returns `None` for unpaired tokens, tokens not in `index`, and
/// unbalanced pairs.
pub fn pair_for<'a>(index: &'a TokenIndex, token: &Token) -> Option<&'a Token> {
    if !token.is_paired() {
        return None;
    }
    let family = token.pair_value.abs();
    let forward = token.pair_value > 0;
    let mut ndx = index.index_of(token)?;
    let mut weight = token.pair_value;

    loop {
        ndx = if forward {
            ndx.checked_add(1)?
        } else {
            ndx.checked_sub(1)?
        };
        let current = index.get(ndx)?;
        if current.pair_value.abs() != family {
            continue;
        }
        weight += current.pair_value;
        if weight == 0 {
            return Some(current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::TokenType;

    /// One token per bracket char; parens are family 1, braces family 2
    fn brackets(text: &str) -> TokenIndex {
        let tokens = text
            .char_indices()
            .filter_map(|(i, c)| {
                let pv = match c {
                    '(' => 1,
                    ')' => -1,
                    '{' => 2,
                    '}' => -2,
                    'x' => 0,
                    _ => return None,
                };
                Some(Token::paired(TokenType::Operator, i, 1, pv))
            })
            .collect();
        TokenIndex::from_tokens(tokens)
    }

    fn partner(index: &TokenIndex, start: usize) -> Option<usize> {
        let token = *index.token_at(start)?;
        pair_for(index, &token).map(|t| t.start)
    }

    #[test]
    fn test_nested_same_family() {
        let index = brackets("(()( ))");
        assert_eq!(partner(&index, 0), Some(6));
        assert_eq!(partner(&index, 1), Some(2));
        assert_eq!(partner(&index, 3), Some(5));
        assert_eq!(partner(&index, 6), Some(0));
        assert_eq!(partner(&index, 2), Some(1));
        assert_eq!(partner(&index, 5), Some(3));
    }

    #[test]
    fn test_other_families_are_skipped() {
        let index = brackets("({)}");
        assert_eq!(partner(&index, 0), Some(2));
        assert_eq!(partner(&index, 1), Some(3));
        assert_eq!(partner(&index, 3), Some(1));
    }

    #[test]
    fn test_unbalanced() {
        let index = brackets("(( )");
        assert_eq!(partner(&index, 0), None);
        assert_eq!(partner(&index, 1), Some(3));

        let index = brackets(")");
        assert_eq!(partner(&index, 0), None);
    }

    #[test]
    fn test_unpaired_token() {
        let index = brackets("x()");
        assert_eq!(partner(&index, 0), None);
    }

    #[test]
    fn test_token_not_in_index() {
        let index = brackets("()");
        let stray = Token::paired(TokenType::Operator, 9, 1, 1);
        assert_eq!(pair_for(&index, &stray), None);
        assert_eq!(pair_for(&TokenIndex::absent(), &stray), None);
    }
}
