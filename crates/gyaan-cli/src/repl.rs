//! In-chat slash commands.

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Chat,
    Dashboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    Mode(Mode),
    ExportTranscript(PathBuf),
    ExportAnalytics(PathBuf),
    Words(u32),
    /// Anything that is not a slash command goes to the model.
    Message(String),
    Invalid(String),
}

pub const HELP: &str = "\
/mode chat|dashboard        switch between chatting and the dashboard
/export transcript <path>   save this session as CSV
/export analytics <path>    save the raw analytics log
/words <n>                  set the answer length target (120-400, step 10)
/help                       show this help
/quit                       leave";

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return ReplCommand::Message(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match (command, args.as_slice()) {
            ("quit" | "exit" | "q", []) => ReplCommand::Quit,
            ("help" | "?", []) => ReplCommand::Help,
            ("mode", ["chat"]) => ReplCommand::Mode(Mode::Chat),
            ("mode", ["dashboard" | "dash"]) => ReplCommand::Mode(Mode::Dashboard),
            ("export", ["transcript", path @ ..]) if !path.is_empty() => {
                ReplCommand::ExportTranscript(PathBuf::from(path.join(" ")))
            }
            ("export", ["analytics", path @ ..]) if !path.is_empty() => {
                ReplCommand::ExportAnalytics(PathBuf::from(path.join(" ")))
            }
            ("words", [n]) => match n.parse() {
                Ok(words) => ReplCommand::Words(words),
                Err(_) => ReplCommand::Invalid(format!("Not a number: {}", n)),
            },
            _ => ReplCommand::Invalid(format!("Unknown command: /{}", rest)),
        }
    }
}
