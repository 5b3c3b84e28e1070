use std::collections::BTreeMap;

use serde_json::Value;

use super::command_registry::{
    CommandSpec, NO_ARG_COMMANDS, SINGLE_PATH_COMMANDS, TEXT_ARG_COMMANDS,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Intent {
    pub action: String,
    pub raw: String,
    pub text: Option<String>,
    pub command_args: BTreeMap<String, Value>,
}

impl Intent {
    fn new(action: &str, raw: &str) -> Self {
        Self {
            action: action.to_string(),
            raw: raw.to_string(),
            text: None,
            command_args: BTreeMap::new(),
        }
    }

    pub fn arg(&self, key: &str) -> Option<&str> {
        self.command_args
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

fn find_action(command: &str, specs: &[CommandSpec]) -> Option<&'static str> {
    specs
        .iter()
        .find(|spec| spec.command == command)
        .map(|spec| spec.action)
}

fn parse_path_args(arg: &str) -> Vec<String> {
    if arg.trim().is_empty() {
        return Vec::new();
    }
    match shell_words::split(arg) {
        Ok(parts) => parts
            .into_iter()
            .filter(|value| !value.is_empty())
            .collect(),
        Err(_) => arg
            .split_whitespace()
            .map(str::to_string)
            .filter(|value| !value.is_empty())
            .collect(),
    }
}

fn parse_single_path_arg(arg: &str) -> String {
    parse_path_args(arg).join(" ")
}

/// Parses one line of wizard input.
///
/// Slash commands map to actions; any other non-empty line becomes a `text`
/// intent that the front end interprets by stage.
pub fn parse_intent(text: &str) -> Intent {
    let raw_trimmed = text.trim();
    if raw_trimmed.is_empty() {
        return Intent::new("noop", text);
    }

    if let Some(slash_tail) = raw_trimmed.strip_prefix('/') {
        let command_len = slash_tail
            .chars()
            .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
            .count();
        if command_len > 0 {
            let command = slash_tail[..command_len].to_ascii_lowercase();
            let arg = slash_tail[command_len..].trim();

            if let Some(action) = find_action(&command, TEXT_ARG_COMMANDS) {
                let mut intent = Intent::new(action, text);
                intent
                    .command_args
                    .insert("text".to_string(), Value::String(arg.to_string()));
                return intent;
            }

            if let Some(action) = find_action(&command, SINGLE_PATH_COMMANDS) {
                let mut intent = Intent::new(action, text);
                intent.command_args.insert(
                    "path".to_string(),
                    Value::String(parse_single_path_arg(arg)),
                );
                return intent;
            }

            if let Some(action) = find_action(&command, NO_ARG_COMMANDS) {
                return Intent::new(action, text);
            }

            let mut intent = Intent::new("unknown", text);
            intent
                .command_args
                .insert("command".to_string(), Value::String(command));
            intent
                .command_args
                .insert("arg".to_string(), Value::String(arg.to_string()));
            return intent;
        }
    }

    let mut intent = Intent::new("text", text);
    intent.text = Some(raw_trimmed.to_string());
    intent
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::parse_intent;

    #[test]
    fn blank_lines_are_noops() {
        assert_eq!(parse_intent("   ").action, "noop");
        assert_eq!(parse_intent("").action, "noop");
    }

    #[test]
    fn navigation_commands_take_no_args() {
        assert_eq!(parse_intent("/next").action, "advance");
        assert_eq!(parse_intent("/BACK").action, "go_back");
        assert_eq!(parse_intent("/dismiss").action, "dismiss_error");
        assert_eq!(parse_intent("/exit").action, "quit");
    }

    #[test]
    fn text_commands_keep_remainder_verbatim() {
        let generate = parse_intent("/generate  a vintage red leather jacket ");
        assert_eq!(generate.action, "generate_outfit");
        assert_eq!(generate.arg("text"), Some("a vintage red leather jacket"));

        let select = parse_intent("/select 2");
        assert_eq!(select.action, "select");
        assert_eq!(select.arg("text"), Some("2"));

        let bare = parse_intent("/generate");
        assert_eq!(bare.action, "generate_outfit");
        assert_eq!(bare.arg("text"), None);
    }

    #[test]
    fn path_commands_unquote_paths() {
        let upload = parse_intent("/upload \"/tmp/my photos/me.png\"");
        assert_eq!(upload.action, "upload");
        assert_eq!(upload.command_args["path"], json!("/tmp/my photos/me.png"));

        let save = parse_intent("/save");
        assert_eq!(save.action, "save_result");
        assert_eq!(save.arg("path"), None);
    }

    #[test]
    fn plain_text_becomes_text_intent() {
        let intent = parse_intent("  denim overalls ");
        assert_eq!(intent.action, "text");
        assert_eq!(intent.text.as_deref(), Some("denim overalls"));
    }

    #[test]
    fn unknown_commands_keep_name_and_arg() {
        let intent = parse_intent("/magic foo bar");
        assert_eq!(intent.action, "unknown");
        assert_eq!(intent.command_args["command"], json!("magic"));
        assert_eq!(intent.command_args["arg"], json!("foo bar"));
    }
}
