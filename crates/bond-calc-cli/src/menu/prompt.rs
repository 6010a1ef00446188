use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::str::FromStr;

use super::MenuError;

/// Line-oriented prompting over any reader/writer pair.
///
/// Bad text never reaches the caller: it is reported and the question is
/// asked again. Only a closed input stream or an I/O failure is an error.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, MenuError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(MenuError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Read a decimal number, re-prompting until it parses and falls within
    /// the optional inclusive bounds.
    pub fn decimal(
        &mut self,
        prompt: &str,
        min: Option<Decimal>,
        max: Option<Decimal>,
    ) -> Result<Decimal, MenuError> {
        loop {
            let text = self.read_line(prompt)?;
            let value = match parse_decimal(&text) {
                Some(v) => v,
                None => {
                    tracing::debug!(input = %text, "rejected non-numeric input");
                    writeln!(self.output, "Invalid input. Enter a number.")?;
                    continue;
                }
            };
            if let Some(min) = min {
                if value < min {
                    writeln!(self.output, "Value must be >= {}", min)?;
                    continue;
                }
            }
            if let Some(max) = max {
                if value > max {
                    writeln!(self.output, "Value must be <= {}", max)?;
                    continue;
                }
            }
            return Ok(value);
        }
    }

    /// Read a percentage and return it as a decimal rate (5 -> 0.05).
    pub fn percent(&mut self, prompt: &str) -> Result<Decimal, MenuError> {
        Ok(self.decimal(prompt, None, None)? / Decimal::ONE_HUNDRED)
    }

    /// Read a whole number within the optional inclusive bounds.
    pub fn integer(
        &mut self,
        prompt: &str,
        min: Option<i64>,
        max: Option<i64>,
    ) -> Result<i64, MenuError> {
        loop {
            let text = self.read_line(prompt)?;
            let value = match text.parse::<i64>() {
                Ok(v) => v,
                Err(_) => {
                    tracing::debug!(input = %text, "rejected non-integer input");
                    writeln!(self.output, "Invalid input. Enter an integer.")?;
                    continue;
                }
            };
            if let Some(min) = min {
                if value < min {
                    writeln!(self.output, "Value must be >= {}", min)?;
                    continue;
                }
            }
            if let Some(max) = max {
                if value > max {
                    writeln!(self.output, "Value must be <= {}", max)?;
                    continue;
                }
            }
            return Ok(value);
        }
    }

    pub fn pause(&mut self) -> Result<(), MenuError> {
        self.read_line("\nPress ENTER to continue...")?;
        Ok(())
    }

    pub fn heading(&mut self, title: &str) -> Result<(), MenuError> {
        writeln!(self.output, "\n{}", title)?;
        writeln!(self.output, "{}", "=".repeat(title.len()))?;
        Ok(())
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
