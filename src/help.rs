// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use crate::actions::{dashed, Action};
use crate::printer::Chunk;
use crate::translator::{Lng, Translator};

const HELP_NAMES: &str = "-h, --help";
const HELP_USAGE: &str = " [-h]";

/// Name of the action as shown in the usage line: the first alias and the
/// value placeholder, or the meta name for a positional.
fn usage_name(action: &Action, tr: &dyn Translator) -> String {
    let name = match action.names().first() {
        Some(name) => dashed(name),
        None => return action.meta(tr),
    };

    if action.needs_arg() {
        format!("{} {}", name, action.meta(tr))
    } else {
        name
    }
}

/// Usage line fragment for an action (with a leading space).
///
/// A required action is listed bare, a multiple one as `[NAME ...]` and
/// one that is neither as `[NAME]`. A required multiple action gets both.
pub(crate) fn usage_token(action: &Action, tr: &dyn Translator) -> String {
    let name = usage_name(action, tr);
    let mut token = String::new();

    if action.required() {
        token.push(' ');
        token.push_str(&name);
    }

    if action.multiple() {
        token.push_str(&format!(" [{} ...]", name));
    }

    if !action.required() && !action.multiple() {
        token.push_str(&format!(" [{}]", name));
    }

    token
}

/// Name column of the help statement: all aliases followed by the value
/// placeholder.
pub(crate) fn help_name(action: &Action, tr: &dyn Translator) -> String {
    if action.is_positional() {
        return action.meta(tr);
    }

    let names = action
        .names()
        .iter()
        .map(|n| dashed(n))
        .collect::<Vec<String>>()
        .join(", ");

    if action.needs_arg() {
        format!("{} {}", names, action.meta(tr))
    } else {
        names
    }
}

/// Usage line without the translated "usage: " prefix.
pub(crate) fn usage_line(
    program: &str,
    usage: &str,
    provide_help: bool,
    actions: &[Action],
    tr: &dyn Translator,
) -> String {
    let mut line = program.to_string();

    if !usage.is_empty() {
        line.push(' ');
        line.push_str(usage);

        return line;
    }

    if provide_help {
        line.push_str(HELP_USAGE);
    }

    for action in actions {
        line.push_str(&usage_token(action, tr));
    }

    line
}

/// Sections of the help statement: positional arguments (if any declared)
/// followed by optional arguments.
pub(crate) fn arguments(provide_help: bool, actions: &[Action], tr: &dyn Translator) -> Vec<Chunk> {
    let mut positionals = Chunk {
        title: tr.translate(Lng::Positionals, "", ""),
        items: Vec::new(),
    };

    let mut optionals = Chunk {
        title: tr.translate(Lng::Optionals, "", ""),
        items: Vec::new(),
    };

    if provide_help {
        optionals.items.push((
            HELP_NAMES.into(),
            tr.translate(Lng::HelpDescription, "", ""),
        ));
    }

    for action in actions {
        let item = (help_name(action, tr), action.help().to_string());

        if action.is_positional() {
            positionals.items.push(item);
        } else {
            optionals.items.push(item);
        }
    }

    vec![positionals, optionals]
        .into_iter()
        .filter(|chunk| !chunk.items.is_empty())
        .collect()
}
