#[derive(Clone, Copy, Debug)]
pub(crate) struct CommandSpec {
    pub command: &'static str,
    pub action: &'static str,
}

/// Commands whose whole remainder is kept verbatim.
pub(crate) const TEXT_ARG_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "select",
        action: "select",
    },
    CommandSpec {
        command: "prompt",
        action: "set_prompt",
    },
    CommandSpec {
        command: "generate",
        action: "generate_outfit",
    },
];

/// Commands taking one (possibly quoted) filesystem path.
pub(crate) const SINGLE_PATH_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "upload",
        action: "upload",
    },
    CommandSpec {
        command: "save",
        action: "save_result",
    },
];

pub(crate) const NO_ARG_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "next",
        action: "advance",
    },
    CommandSpec {
        command: "back",
        action: "go_back",
    },
    CommandSpec {
        command: "dismiss",
        action: "dismiss_error",
    },
    CommandSpec {
        command: "show",
        action: "show",
    },
    CommandSpec {
        command: "help",
        action: "help",
    },
    CommandSpec {
        command: "quit",
        action: "quit",
    },
    CommandSpec {
        command: "exit",
        action: "quit",
    },
];

pub const WIZARD_HELP_COMMANDS: &[&str] = &[
    "/select <n|id>",
    "/upload <path>",
    "/prompt <text>",
    "/generate [text]",
    "/next",
    "/back",
    "/save [path]",
    "/dismiss",
    "/show",
    "/help",
    "/quit",
];
