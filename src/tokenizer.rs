use chumsky::prelude::*;

type Extra<'a> = extra::Err<Simple<'a, char>>;

const OPERATORS: [&str; 3] = ["AND", "OR", "NOT"];

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn word<'a>() -> impl Parser<'a, &'a str, &'a str, Extra<'a>> {
    any()
        .filter(|c: &char| is_word_char(*c))
        .repeated()
        .at_least(1)
        .to_slice()
}

fn separator<'a>() -> impl Parser<'a, &'a str, (), Extra<'a>> {
    any().filter(|c: &char| !is_word_char(*c)).repeated()
}

/// Split text into its word tokens, dropping everything between them.
pub fn words<'a>() -> impl Parser<'a, &'a str, Vec<&'a str>, Extra<'a>> {
    separator()
        .ignore_then(
            word()
                .then_ignore(separator())
                .repeated()
                .collect::<Vec<_>>(),
        )
        .then_ignore(end())
}

/// Check if a search fragment uses one of the bare boolean operators as a whole word.
pub fn has_operators(fragment: &str) -> bool {
    words()
        .parse(fragment)
        .into_output()
        .unwrap_or_default()
        .into_iter()
        .any(|word| OPERATORS.contains(&word))
}

pub fn ident<'a>() -> impl Parser<'a, &'a str, &'a str, Extra<'a>> {
    any()
        .filter(|c: &char| c.is_ascii_alphanumeric())
        .repeated()
        .at_least(1)
        .to_slice()
}

pub fn number<'a>() -> impl Parser<'a, &'a str, &'a str, Extra<'a>> {
    any()
        .filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .to_slice()
}

/// Textual facet key: `group[.topic[.subtopic[.subsubtopic]]]`.
pub fn facet_key<'a>() -> impl Parser<'a, &'a str, (&'a str, Vec<&'a str>), Extra<'a>> {
    ident()
        .then(
            just('.')
                .ignore_then(number())
                .repeated()
                .at_most(3)
                .collect::<Vec<_>>(),
        )
        .then_ignore(end())
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_words(text: &str, expected: &[&str]) {
        let result = words().parse(text).into_output().unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_words_empty() {
        assert_words("", &[]);
        assert_words(" ( ) ", &[]);
    }

    #[test]
    fn test_words() {
        assert_words(
            r#""heart failure"[mh] OR hf[tiab]"#,
            &["heart", "failure", "mh", "OR", "hf", "tiab"],
        );
    }

    #[test]
    fn test_operators() {
        assert!(has_operators("a[ti] OR b[ti]"));
        assert!(has_operators("(a[ti])AND(b[ti])"));
        assert!(has_operators("NOT animals[mh]"));
    }

    #[test]
    fn test_no_operators() {
        assert!(!has_operators("a[ti]"));
        assert!(!has_operators("ANDROGENS[mh]"));
        assert!(!has_operators("cancer and tumor"));
        assert!(!has_operators("ORAL[tiab] NOTCH[tiab]"));
    }

    #[test]
    fn test_facet_key() {
        assert_eq!(
            facet_key().parse("onc.1.12.3").into_output(),
            Some(("onc", vec!["1", "12", "3"]))
        );
        assert_eq!(facet_key().parse("onc").into_output(), Some(("onc", vec![])));
    }

    #[test]
    fn test_facet_key_invalid() {
        assert!(facet_key().parse("").has_errors());
        assert!(facet_key().parse("onc.").has_errors());
        assert!(facet_key().parse("onc.a").has_errors());
        assert!(facet_key().parse("onc.1.2.3.4").has_errors());
        assert!(facet_key().parse("on c").has_errors());
    }
}
