/// One stdin line, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    /// `:start <text>`
    Start(String),
    /// `:reset`
    Reset,
    /// `:quit`
    Quit,
    /// Anything else: text for the input box, submitted at once.
    Submit(String),
    /// An unknown `:` command.
    Unknown(String),
}

pub fn parse_line(line: &str) -> OperatorCommand {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return OperatorCommand::Submit(line.to_string());
    };
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .unwrap_or((command, ""));
    match name {
        "start" => OperatorCommand::Start(rest.trim().to_string()),
        "reset" => OperatorCommand::Reset,
        "quit" | "q" => OperatorCommand::Quit,
        other => OperatorCommand::Unknown(other.to_string()),
    }
}
