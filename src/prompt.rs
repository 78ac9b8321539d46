use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};

/// Prompt user with a message and return their trimmed input.
pub fn prompt(message: &str) -> Result<String> {
    prompt_from(&mut std::io::stdin().lock(), message)
}

/// Like [`prompt`], reading the answer from `reader`.
pub fn prompt_from(reader: &mut impl BufRead, message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    read_answer(reader)
}

/// Read one answer line. End of input is an error, never an empty answer.
fn read_answer(reader: &mut impl BufRead) -> Result<String> {
    let mut input = String::new();
    let read = reader
        .read_line(&mut input)
        .context("Failed to read input")?;
    if read == 0 {
        bail!("unexpected end of input");
    }
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
pub fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
pub fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    prompt_yes_no_from(&mut std::io::stdin().lock(), message, default_yes)
}

pub fn prompt_yes_no_from(reader: &mut impl BufRead, message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt_from(reader, &format!("{} [{}]: ", message, hint))?;
    Ok(parse_yes_no(&input, default_yes))
}

fn parse_yes_no(input: &str, default_yes: bool) -> bool {
    let input = input.to_lowercase();
    if input.is_empty() {
        default_yes
    } else {
        input == "y" || input == "yes"
    }
}
