/// A chat line the bingo gateway acts on.
///
/// The surface mirrors the chat bot it grew out of: slash commands drive the
/// game lifecycle and a bare number is a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    StartGame,
    Join,
    Lock,
    Reset,
    Call(u32),
}

/// Parse one inbound chat line. Returns None for ordinary chatter, which the
/// gateway ignores.
pub fn parse_command(text: &str) -> Option<ChatCommand> {
    let text = text.trim();
    match text {
        "/startgame" => Some(ChatCommand::StartGame),
        "/join" => Some(ChatCommand::Join),
        "/lock" => Some(ChatCommand::Lock),
        "/reset" => Some(ChatCommand::Reset),
        _ => {
            if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
                // all-digit strings wider than u32 are treated as chatter
                text.parse::<u32>().ok().map(ChatCommand::Call)
            } else {
                None
            }
        }
    }
}
