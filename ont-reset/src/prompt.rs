//! Yes/no confirmation read from the operator.

use anyhow::Result;
use std::io::{self, BufRead, Write};

/// `y`, `yes` and `ya` (any case, surrounding blanks ignored).
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "ya")
}

/// Asks `question` on `output` and reads one line from `input`.
///
/// Anything but an affirmative answer, including end of input, is a no.
pub fn confirm_with<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<bool> {
    write!(output, "❓ {} (y/n): ", question)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

pub fn confirm(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    confirm_with(&mut input, &mut io::stdout(), question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn accepts_affirmative_tokens() {
        for answer in ["y", "Y", "yes", " YES \n", "ya", "Ya"] {
            assert!(is_affirmative(answer), "{answer:?}");
        }
        for answer in ["", "n", "no", "yess", "ok", "tidak"] {
            assert!(!is_affirmative(answer), "{answer:?}");
        }
    }

    #[test]
    fn reads_one_line_and_prints_question() {
        let mut input = Cursor::new("ya\nleftover\n");
        let mut output = Vec::new();
        assert!(confirm_with(&mut input, &mut output, "Reset all?").unwrap());
        assert_eq!(String::from_utf8(output).unwrap(), "❓ Reset all? (y/n): ");
    }

    #[test]
    fn end_of_input_is_a_no() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(!confirm_with(&mut input, &mut output, "Reset all?").unwrap());
    }
}
