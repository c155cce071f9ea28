//! Console command table.

use crate::handlers::{self, Console, Reply};
use crate::models::{EventDraft, Language};
use crate::services::ModerationAction;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Events,
    Create(Box<EventDraftInput>),
    Select(String),
    Deselect,
    Questions,
    Moderate { id: String, action: ModerationAction },
    Link(String),
    Lang(Language),
    Help,
    Quit,
}

/// `create` arguments as typed, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDraftInput {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub organizer_name: String,
    pub organizer_email: String,
    pub max_participants: Option<String>,
}

impl EventDraftInput {
    pub fn into_draft(self, language: Language) -> EventDraft {
        EventDraft {
            code: self.code,
            title: self.title,
            description: self.description,
            organizer_name: self.organizer_name,
            organizer_email: self.organizer_email,
            language,
            max_participants: self.max_participants,
        }
    }
}

pub async fn dispatch(console: &mut Console, command: Command) -> Reply {
    match command {
        Command::Events => handlers::list_events(console).await,
        Command::Create(input) => handlers::create_event(console, *input).await,
        Command::Select(code) => handlers::select_event(console, &code).await,
        Command::Deselect => handlers::deselect_event(console),
        Command::Questions => handlers::list_questions(console).await,
        Command::Moderate { id, action } => handlers::moderate(console, &id, action).await,
        Command::Link(code) => handlers::join_link(console, &code).await,
        Command::Lang(language) => handlers::set_language(console, language),
        Command::Help => handlers::help(),
        Command::Quit => Reply::Quit,
    }
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let args = split_args(line)?;
    let Some((name, rest)) = args.split_first() else {
        return Err("empty command".to_string());
    };

    let single = |what: &str| -> Result<String, String> {
        match rest {
            [value] => Ok(value.clone()),
            _ => Err(format!("usage: {} <{}>", name, what)),
        }
    };

    match name.to_lowercase().as_str() {
        "events" => Ok(Command::Events),
        "create" => parse_create(rest).map(|input| Command::Create(Box::new(input))),
        "select" => single("code").map(Command::Select),
        "deselect" => Ok(Command::Deselect),
        "questions" => Ok(Command::Questions),
        "approve" => single("question id").map(|id| Command::Moderate {
            id,
            action: ModerationAction::Approve,
        }),
        "decline" => single("question id").map(|id| Command::Moderate {
            id,
            action: ModerationAction::Decline,
        }),
        "answer" | "answered" => single("question id").map(|id| Command::Moderate {
            id,
            action: ModerationAction::MarkAnswered,
        }),
        "link" => single("code").map(Command::Link),
        "lang" => {
            let raw = single("en|pl")?;
            Language::parse(&raw)
                .map(Command::Lang)
                .ok_or_else(|| format!("unknown language '{}'", raw))
        }
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command '{}', try 'help'", other)),
    }
}

fn parse_create(args: &[String]) -> Result<EventDraftInput, String> {
    let mut input = EventDraftInput::default();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{}'", arg))?;
        let value = value.to_string();
        match key {
            "code" => input.code = value,
            "title" => input.title = value,
            "description" => input.description = Some(value),
            "name" | "organizer_name" => input.organizer_name = value,
            "email" | "organizer_email" => input.organizer_email = value,
            "max" | "max_participants" => input.max_participants = Some(value),
            other => return Err(format!("unknown field '{}'", other)),
        }
    }
    Ok(input)
}

/// Whitespace-separated words; double quotes group words, including inside
/// `key="a value"`.
fn split_args(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        args.push(current);
    }
    Ok(args)
}
