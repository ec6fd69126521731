//! The dataset CSV format (§6): comma-delimited, `#`-prefixed comments
//! dropped to end of line, quoted strings dropped entirely, no header row,
//! the final column of every row is the label.
//!
//! Grounded on the hand-rolled tokenizer in `original_source/lib/vote_dataset.c`
//! (`csv_tokenizer_*`/`csv_parser_on_token`). The row width is taken from the
//! first row that contains any numbers, exactly as the original does; every
//! later row failing to match that width is a [`IoError::RaggedCsv`].

use std::path::Path;

use vote_core::Real;

use crate::error::{IoError, IoResult};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Real),
    Delimiter,
    Linebreak,
}

fn is_delimiter(ch: char) -> bool {
    ch == ','
}

fn is_linebreak(ch: char) -> bool {
    ch == '\n'
}

fn is_space(ch: char) -> bool {
    ch == ' ' || (ch >= '\t' && ch <= '\r' && ch != '\n')
}

fn is_number_char(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '.' | '-' | 'e' | 'E')
}

/// Tokenize the file contents, yielding only [`Token`]s the row-builder
/// cares about; comments and quoted strings are consumed and dropped here.
fn tokenize(text: &str) -> IoResult<Vec<Token>> {
    let mut chars = text.chars().peekable();
    let mut tokens = Vec::new();

    while let Some(&ch) = chars.peek() {
        if is_space(ch) {
            chars.next();
            continue;
        }

        if ch == '#' {
            while let Some(&c) = chars.peek() {
                if c == '\n' || c == '\r' {
                    break;
                }
                chars.next();
            }
            continue;
        }

        if ch == '"' {
            chars.next();
            loop {
                match chars.next() {
                    None => break,
                    Some('"') => {
                        if chars.peek() == Some(&'"') {
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    Some(_) => {}
                }
            }
            continue;
        }

        if is_delimiter(ch) {
            chars.next();
            tokens.push(Token::Delimiter);
            continue;
        }

        if is_linebreak(ch) {
            chars.next();
            tokens.push(Token::Linebreak);
            continue;
        }

        if ch.is_ascii_digit() || ch == '-' {
            let mut buf = String::new();
            while let Some(&c) = chars.peek() {
                if is_number_char(c) {
                    buf.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            let value: Real = buf
                .parse()
                .map_err(|_| IoError::Binary(format!("malformed number token {buf:?}")))?;
            tokens.push(Token::Number(value));
            continue;
        }

        // Any other character (e.g. a bare unquoted word) is dropped, like
        // the original's TOK_STRING arm for anything csv_tokenizer_accept_string
        // didn't claim.
        chars.next();
    }

    Ok(tokens)
}

/// A flat, row-major dataset: `nb_rows` rows of `nb_cols` numbers each, the
/// last column being the label.
pub struct Dataset {
    data: Vec<Real>,
    nb_cols: usize,
    nb_rows: usize,
}

impl Dataset {
    pub fn nb_cols(&self) -> usize {
        self.nb_cols
    }

    pub fn nb_rows(&self) -> usize {
        self.nb_rows
    }

    /// All columns but the last.
    pub fn features(&self, row: usize) -> &[Real] {
        &self.row(row)[..self.nb_cols - 1]
    }

    pub fn label(&self, row: usize) -> Real {
        self.row(row)[self.nb_cols - 1]
    }

    fn row(&self, row: usize) -> &[Real] {
        &self.data[row * self.nb_cols..(row + 1) * self.nb_cols]
    }
}

fn flush_row(
    curr_row: &mut Vec<Real>,
    data: &mut Vec<Real>,
    nb_cols: &mut usize,
    nb_rows: &mut usize,
    row_number: usize,
) -> IoResult<()> {
    if curr_row.is_empty() {
        return Ok(());
    }
    if *nb_rows == 0 {
        *nb_cols = curr_row.len();
    } else if curr_row.len() != *nb_cols {
        return Err(IoError::RaggedCsv {
            row: row_number,
            got: curr_row.len(),
            expected: *nb_cols,
        });
    }
    data.append(curr_row);
    *nb_rows += 1;
    Ok(())
}

fn build(tokens: Vec<Token>) -> IoResult<Dataset> {
    let mut data = Vec::new();
    let mut nb_cols = 0usize;
    let mut nb_rows = 0usize;
    let mut curr_row = Vec::new();
    let mut row_number = 0usize;

    for tok in tokens {
        match tok {
            Token::Number(v) => curr_row.push(v),
            Token::Delimiter => {}
            Token::Linebreak => {
                flush_row(&mut curr_row, &mut data, &mut nb_cols, &mut nb_rows, row_number)?;
                row_number += 1;
            }
        }
    }
    flush_row(&mut curr_row, &mut data, &mut nb_cols, &mut nb_rows, row_number)?;

    if nb_rows == 0 {
        return Err(IoError::EmptyDataset);
    }

    Ok(Dataset {
        data,
        nb_cols,
        nb_rows,
    })
}

/// Parse a dataset from an already-read CSV string.
pub fn load_str(text: &str) -> IoResult<Dataset> {
    build(tokenize(text)?)
}

/// Load a dataset from a CSV file on disk.
pub fn load_file(path: &Path) -> IoResult<Dataset> {
    let text = std::fs::read_to_string(path)?;
    load_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_matrix() {
        let ds = load_str("1,2,0\n3,4,1\n").unwrap();
        assert_eq!(ds.nb_rows(), 2);
        assert_eq!(ds.nb_cols(), 3);
        assert_eq!(ds.features(0), &[1.0, 2.0]);
        assert_eq!(ds.label(0), 0.0);
        assert_eq!(ds.features(1), &[3.0, 4.0]);
        assert_eq!(ds.label(1), 1.0);
    }

    #[test]
    fn drops_comment_lines() {
        let ds = load_str("# a header comment\n1,2,0\n# trailing\n3,4,1\n").unwrap();
        assert_eq!(ds.nb_rows(), 2);
    }

    #[test]
    fn drops_quoted_strings() {
        let ds = load_str("\"sepal_len\",\"sepal_wid\",\"label\"\n1,2,0\n").unwrap();
        assert_eq!(ds.nb_rows(), 1);
        assert_eq!(ds.nb_cols(), 3);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = load_str("1,2,0\n3,4\n").unwrap_err();
        assert!(matches!(err, IoError::RaggedCsv { .. }));
    }

    #[test]
    fn rejects_an_empty_dataset() {
        let err = load_str("# nothing but comments\n").unwrap_err();
        assert!(matches!(err, IoError::EmptyDataset));
    }

    #[test]
    fn parses_negative_and_exponential_numbers() {
        let ds = load_str("-1.5,2e3,-4.2E-1\n").unwrap();
        assert_eq!(ds.nb_cols(), 3);
        assert_eq!(ds.features(0), &[-1.5, 2000.0]);
        assert_eq!(ds.label(0), -0.42);
    }
}
