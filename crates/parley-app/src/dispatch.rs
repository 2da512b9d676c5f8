//! Keystroke to action dispatch.
//!
//! Dispatch is an ordered list of rules evaluated top-down; the first rule
//! whose predicate matches produces the action. Order is the contract:
//!
//! 1. Ctrl+C exits
//! 2. Ctrl+A toggles help mode
//! 3. help mode swallows every other key
//! 4. `return` submits
//! 5. `backspace` deletes backward
//! 6. Ctrl+U clears the buffer
//! 7. `left`/`right` move the cursor
//! 8. a single unmodified character is inserted
//! 9. anything else is ignored
//!
//! Control rules sit above editing rules so an editing rule can never fire
//! for a control chord.

use crate::{Action, Direction, KeyEvent, Mode};

/// Inputs a rule may inspect.
#[derive(Debug, Clone, Copy)]
struct DispatchContext<'a> {
    key: &'a KeyEvent,
    mode: Mode,
}

/// A named `(predicate, action)` pair.
struct Rule {
    name: &'static str,
    matches: fn(&DispatchContext<'_>) -> bool,
    action: fn(&DispatchContext<'_>) -> Action,
}

const RULES: &[Rule] = &[
    Rule {
        name: "ctrl-c",
        matches: |cx| cx.key.ctrl && cx.key.name == "c",
        action: |_| Action::Exit,
    },
    Rule {
        name: "ctrl-a",
        matches: |cx| cx.key.ctrl && cx.key.name == "a",
        action: |_| Action::ToggleMode,
    },
    Rule { name: "help-mode", matches: |cx| cx.mode == Mode::Help, action: |_| Action::Noop },
    Rule { name: "return", matches: |cx| cx.key.name == "return", action: |_| Action::Submit },
    Rule {
        name: "backspace",
        matches: |cx| cx.key.name == "backspace",
        action: |_| Action::DeleteBackward,
    },
    Rule {
        name: "ctrl-u",
        matches: |cx| cx.key.ctrl && cx.key.name == "u",
        action: |_| Action::ClearBuffer,
    },
    Rule {
        name: "arrow",
        matches: |cx| arrow_direction(cx.key).is_some(),
        action: |cx| arrow_direction(cx.key).map_or(Action::Noop, Action::MoveCursor),
    },
    Rule {
        name: "printable",
        matches: |cx| !cx.key.ctrl && !cx.key.meta && cx.key.single_char().is_some(),
        action: |cx| cx.key.single_char().map_or(Action::Noop, Action::InsertChar),
    },
];

fn arrow_direction(key: &KeyEvent) -> Option<Direction> {
    match key.name.as_str() {
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        _ => None,
    }
}

/// Name of the rule that matched, or `"fallthrough"` when none did.
pub fn matching_rule(key: &KeyEvent, mode: Mode) -> &'static str {
    let cx = DispatchContext { key, mode };
    RULES.iter().find(|rule| (rule.matches)(&cx)).map_or("fallthrough", |rule| rule.name)
}

/// Map a keystroke to an action.
///
/// Pure and total. `buffer_is_empty` does not change the result: `return`
/// yields [`Action::Submit`] even for a blank buffer, and the caller decides
/// whether to act on it.
pub fn dispatch(key: &KeyEvent, mode: Mode, buffer_is_empty: bool) -> Action {
    let cx = DispatchContext { key, mode };
    let action =
        RULES.iter().find(|rule| (rule.matches)(&cx)).map_or(Action::Noop, |rule| (rule.action)(&cx));

    tracing::trace!(
        key = %key.name,
        ?mode,
        buffer_is_empty,
        action = action.name(),
        "dispatched key"
    );
    action
}
