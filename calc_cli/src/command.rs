// REPL command parsing
//
// One input line maps to one Command. Operand text is passed through
// untouched; the calculator validates it.

use std::str::FromStr;

use calc_core::{CalcError, CalcResult, OperationKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Calculate {
        operation: OperationKind,
        operand1: String,
        operand2: String,
    },
    History,
    Clear,
    Undo,
    Redo,
    Save,
    Load,
    Help,
    Exit,
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// `UnknownOperation` for an unrecognized command word, `Validation` when
    /// an arithmetic command does not get exactly two operands or a control
    /// command gets any.
    pub fn parse(line: &str) -> CalcResult<Option<Command>> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();
        let keyword = name.to_lowercase();

        let command = match keyword.as_str() {
            "history" => Command::History,
            "clear" => Command::Clear,
            "undo" => Command::Undo,
            "redo" => Command::Redo,
            "save" => Command::Save,
            "load" => Command::Load,
            "help" => Command::Help,
            "exit" | "quit" => Command::Exit,
            _ => {
                let operation = OperationKind::from_str(&keyword)
                    .map_err(|_| CalcError::unknown_operation(name))?;
                return match args.as_slice() {
                    [a, b] => Ok(Some(Command::Calculate {
                        operation,
                        operand1: (*a).to_string(),
                        operand2: (*b).to_string(),
                    })),
                    _ => Err(CalcError::validation(format!(
                        "Usage: {} <number> <number>",
                        operation.as_str()
                    ))),
                };
            }
        };

        if !args.is_empty() {
            return Err(CalcError::validation(format!(
                "'{}' takes no arguments",
                keyword
            )));
        }
        Ok(Some(command))
    }
}

/// Text printed for `help`.
pub fn help_text() -> String {
    let mut text = String::from("Available commands:\n");
    for kind in OperationKind::ALL {
        text.push_str(&format!(
            "  {:<9} <a> <b>  {}\n",
            kind.as_str(),
            kind.description()
        ));
    }
    for (name, description) in [
        ("history", "Show calculation history"),
        ("clear", "Clear calculation history"),
        ("undo", "Undo the last calculation"),
        ("redo", "Redo the last undone calculation"),
        ("save", "Save history to file"),
        ("load", "Load history from file"),
        ("help", "Show this help"),
        ("exit", "Save history and exit"),
    ] {
        text.push_str(&format!("  {:<16}  {}\n", name, description));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculate(operation: OperationKind, a: &str, b: &str) -> Command {
        Command::Calculate {
            operation,
            operand1: a.to_string(),
            operand2: b.to_string(),
        }
    }

    #[test]
    fn test_parse_arithmetic() {
        assert_eq!(
            Command::parse("add 2 3").unwrap(),
            Some(calculate(OperationKind::Add, "2", "3"))
        );
        assert_eq!(
            Command::parse("  ROOT   4   2 ").unwrap(),
            Some(calculate(OperationKind::Root, "4", "2"))
        );
        assert_eq!(
            Command::parse("divide 1e3 -0.5").unwrap(),
            Some(calculate(OperationKind::Divide, "1e3", "-0.5"))
        );
    }

    #[test]
    fn test_operands_are_not_validated_here() {
        assert_eq!(
            Command::parse("add abc 3").unwrap(),
            Some(calculate(OperationKind::Add, "abc", "3"))
        );
    }

    #[test]
    fn test_parse_control_commands() {
        assert_eq!(Command::parse("history").unwrap(), Some(Command::History));
        assert_eq!(Command::parse("clear").unwrap(), Some(Command::Clear));
        assert_eq!(Command::parse("undo").unwrap(), Some(Command::Undo));
        assert_eq!(Command::parse("redo").unwrap(), Some(Command::Redo));
        assert_eq!(Command::parse("save").unwrap(), Some(Command::Save));
        assert_eq!(Command::parse("load").unwrap(), Some(Command::Load));
        assert_eq!(Command::parse("help").unwrap(), Some(Command::Help));
        assert_eq!(Command::parse("exit").unwrap(), Some(Command::Exit));
        assert_eq!(Command::parse("Quit").unwrap(), Some(Command::Exit));
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   \t").unwrap(), None);
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            Command::parse("modulo 5 2").unwrap_err(),
            CalcError::unknown_operation("modulo")
        );
    }

    #[test]
    fn test_wrong_operand_count() {
        let err = Command::parse("add 2").unwrap_err();
        assert_eq!(err, CalcError::validation("Usage: add <number> <number>"));
        assert!(Command::parse("multiply 1 2 3").is_err());
    }

    #[test]
    fn test_control_command_with_arguments() {
        assert!(matches!(
            Command::parse("undo 2"),
            Err(CalcError::Validation { .. })
        ));
    }

    #[test]
    fn test_help_lists_every_command() {
        let text = help_text();
        for kind in OperationKind::ALL {
            assert!(text.contains(kind.as_str()));
        }
        for name in ["history", "clear", "undo", "redo", "save", "load", "help", "exit"] {
            assert!(text.contains(name));
        }
    }
}
