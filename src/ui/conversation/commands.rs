use std::str::FromStr;

use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Commands that can be invoked by starting a message with a leading slash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SlashCommand {
    /// Show help
    Help,
    /// Show the model and endpoint in use
    Info,
    /// Exit the application
    Bye,
}

impl SlashCommand {
    /// User-visible description shown in help.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::Help => "show available commands",
            SlashCommand::Info => "show the model in use and requests in flight",
            SlashCommand::Bye => "exit the application",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }
}

/// Parse a slash command from user input. Anything after the command word is
/// ignored; unknown commands are not commands and get sent as chat text.
pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let rest = input.trim().strip_prefix('/')?;
    let head = rest.split_whitespace().next()?.to_lowercase();

    SlashCommand::from_str(&head).ok().or_else(|| match head.as_str() {
        "q" | "quit" | "exit" => Some(SlashCommand::Bye),
        "?" | "h" => Some(SlashCommand::Help),
        _ => None,
    })
}

/// Complete a partially typed command, if exactly one matches
pub fn complete_command(input: &str) -> Option<SlashCommand> {
    let prefix = input.trim_start().strip_prefix('/')?.to_lowercase();
    let mut matches = SlashCommand::iter().filter(|c| c.command().starts_with(&prefix));
    let first = matches.next()?;
    matches.next().is_none().then_some(first)
}

/// Get help text for all available commands
pub fn get_help_text() -> String {
    let commands: Vec<String> = SlashCommand::iter()
        .map(|c| format!("/{} {}", c.command(), c.description()))
        .collect();

    format!(
        "{}. Enter sends, PgUp/PgDn scroll, Esc quits.",
        commands.join(" · ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(parse_slash_command("/help"), Some(SlashCommand::Help));
        assert_eq!(parse_slash_command("  /INFO please"), Some(SlashCommand::Info));
        assert_eq!(parse_slash_command("/q"), Some(SlashCommand::Bye));
        assert_eq!(parse_slash_command("/exit"), Some(SlashCommand::Bye));
    }

    #[test]
    fn non_commands_are_chat_text() {
        assert_eq!(parse_slash_command("hello /help"), None);
        assert_eq!(parse_slash_command("/"), None);
        assert_eq!(parse_slash_command("/unknown"), None);
        assert_eq!(parse_slash_command("and/or"), None);
    }

    #[test]
    fn completes_unique_prefix_only() {
        assert_eq!(complete_command("/he"), Some(SlashCommand::Help));
        assert_eq!(complete_command("/b"), Some(SlashCommand::Bye));
        assert_eq!(complete_command("/x"), None);
        assert_eq!(complete_command("/"), None);
        assert_eq!(complete_command("help"), None);
    }

    #[test]
    fn help_lists_every_command() {
        let help = get_help_text();
        for command in SlashCommand::iter() {
            assert!(help.contains(&format!("/{}", command.command())));
        }
    }
}
