use modconfigobj::config::runtime::LexicalPreferences;
use modconfigobj::file_processor::FileProcessor;
use modconfigobj::lexical::{self, LexerError};
use modconfigobj::{tokenize_str, Lexer, Token, TokenKind};
use std::io::Write;
use tempfile::Builder;

const CORPUS: &[&str] = &[
    "",
    "\n\n\t \n",
    "[section]\nkey = value\n",
    "key=value",
    "=oops\n",
    "[[sub]]\n",
    "key = '''multi\nline'''\n",
    "key = 'abc\n",
    "a=''\nb=\"\"\"x\n\"\"y\"\"\"\nc='q'\n",
    "[a\n[b]]\n[[c]\nk\n=\n",
    "# only a comment",
    "[ü]\nschlüssel = wert € \n# ñ\n",
    "key=\"unterminated",
    "[[[deep]]]\n  indented = yes\n\tk2\t=\t'v'\n",
    "k='''\n''\n'''",
    "x = [not a section]\ny = # not a comment\n",
];

fn assert_stream_properties(source: &str, tokens: &[Token]) {
    let ends = tokens.iter().filter(|t| t.is_end()).count();
    assert_eq!(ends, 1, "{:?}: expected one EndOfStream", source);
    assert!(tokens.last().unwrap().is_end(), "{:?}: EndOfStream not last", source);

    for pair in tokens.windows(2) {
        assert!(
            pair[0].position <= pair[1].position,
            "{:?}: positions decrease at {} -> {}",
            source,
            pair[0],
            pair[1]
        );
        if pair[0].kind == TokenKind::Key {
            assert!(
                matches!(pair[1].kind, TokenKind::Value | TokenKind::Error),
                "{:?}: key followed by {}",
                source,
                pair[1]
            );
        }
    }

    for token in tokens {
        let start = token.position as usize;
        let end = start + token.len();
        assert_eq!(
            &source[start..end],
            token.text,
            "{:?}: text mismatch for {}",
            source,
            token
        );
    }
}

#[test]
fn corpus_satisfies_stream_properties() {
    for source in CORPUS {
        let tokens = tokenize_str(source).unwrap();
        assert_stream_properties(source, &tokens);
    }
}

#[test]
fn newline_inside_single_quotes_is_an_error() {
    for quote in ['\'', '"'] {
        let source = format!("k = {q}a\nb{q}\n", q = quote);
        let tokens = tokenize_str(&source).unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Error, "{}", source);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Value));
    }
}

#[test]
fn pulling_past_end_is_rejected() {
    let mut lexer = Lexer::from_text("k=v\n");
    while !lexer.next_token().unwrap().is_end() {}
    let err = lexer.next_token().unwrap_err();
    assert!(matches!(err, LexerError::StreamExhausted));
}

#[test]
fn streams_file_larger_than_read_buffer() {
    let mut file = Builder::new().suffix(".cfg").tempfile().unwrap();
    let mut expected_pairs = 0;
    for section in 0..50 {
        writeln!(file, "[section{}]", section).unwrap();
        for key in 0..40 {
            writeln!(file, "key{} = value {} ünïcödé", key, section * key).unwrap();
            expected_pairs += 1;
        }
        writeln!(file, "text = '''line one\nline two'''").unwrap();
        expected_pairs += 1;
    }
    file.flush().unwrap();

    let processor = FileProcessor::new().with_performance_logging(false);
    let source = processor.open(file.path()).unwrap();
    let size = source.metadata.size;

    let preferences = LexicalPreferences {
        collect_detailed_metrics: true,
        log_lexical_errors: false,
        log_completion_summary: false,
    };
    let mut lexer = lexical::create_lexer_with_preferences(source.reader, preferences);

    let mut last = None;
    for token in lexer.by_ref() {
        last = Some(token.unwrap());
    }
    let end = last.unwrap();
    assert!(end.is_end());
    assert_eq!(end.position, size);

    let metrics = lexer.metrics();
    assert_eq!(metrics.key_tokens, expected_pairs);
    assert_eq!(metrics.value_tokens, expected_pairs);
    assert_eq!(metrics.section_tokens, 50);
    assert_eq!(metrics.triple_quoted_values, 50);
    assert_eq!(metrics.error_tokens, 0);
}
