//! The command vocabulary and its line-oriented grammar.
//!
//! Both the command channel and the protocol event stream reduce to values of
//! [`Command`]; every verb has typed, validated arguments. Unknown verbs and
//! wrong arity parse to [`WmError::MalformedCommand`], never a silent drop.
use crate::errors::{Result, WmError};
use crate::models::{BorderKind, WindowHandle};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl FromStr for Direction {
    type Err = WmError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(WmError::MalformedCommand(format!(
                "unknown direction '{s}'"
            ))),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub enum Command {
    Spawn(String),
    View(usize),
    ToggleBar,
    SetBorder(BorderKind, i32),
    SetColor(BorderKind, String),
    ReloadConfig,
    Quit,
    Focus(Direction),
    Move(Direction),
    Resize { dx: i32, dy: i32 },
    ToggleFloat(WindowHandle),
    ToggleFullscreen(WindowHandle),
    Promote(WindowHandle),
    Swap(WindowHandle, WindowHandle),
    SendToWorkspace {
        window: WindowHandle,
        workspace: usize,
        follow: bool,
    },
    ScratchToggle(String),
}

/// Parse one wire line into a command.
///
/// # Errors
///
/// `MalformedCommand` on an unknown verb, wrong arity, or an argument that
/// fails validation.
pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    match head {
        "spawn" => build_spawn(rest),
        "view" => Ok(Command::View(parse_arg(rest, "workspace-index")?)),
        "togglebar" => expect_no_args(rest, Command::ToggleBar),
        "set-border" => build_set_border(rest),
        "set-color" => build_set_color(rest),
        "reload-config" => expect_no_args(rest, Command::ReloadConfig),
        "quit" => expect_no_args(rest, Command::Quit),
        "focus" => Ok(Command::Focus(rest.parse()?)),
        "move" => Ok(Command::Move(rest.parse()?)),
        "resize" => build_resize(rest),
        "toggle-float" => Ok(Command::ToggleFloat(parse_handle(rest)?)),
        "toggle-fullscreen" => Ok(Command::ToggleFullscreen(parse_handle(rest)?)),
        "promote" => Ok(Command::Promote(parse_handle(rest)?)),
        "swap" => build_swap(rest),
        "send-to-ws" => build_send_to_ws(rest),
        "scratch-toggle" => build_scratch_toggle(rest),
        "" => Err(WmError::MalformedCommand("empty command".to_string())),
        other => Err(WmError::MalformedCommand(format!("unknown verb '{other}'"))),
    }
}

fn expect_no_args(rest: &str, cmd: Command) -> Result<Command> {
    if rest.is_empty() {
        Ok(cmd)
    } else {
        Err(WmError::MalformedCommand(format!(
            "unexpected argument '{rest}'"
        )))
    }
}

fn parse_arg<T: FromStr>(raw: &str, name: &str) -> Result<T> {
    if raw.is_empty() {
        return Err(WmError::MalformedCommand(format!("missing argument {name}")));
    }
    raw.parse()
        .map_err(|_| WmError::MalformedCommand(format!("invalid {name} '{raw}'")))
}

fn parse_handle(raw: &str) -> Result<WindowHandle> {
    Ok(WindowHandle(parse_arg(raw, "window-id")?))
}

fn build_spawn(rest: &str) -> Result<Command> {
    if rest.is_empty() {
        return Err(WmError::MalformedCommand(
            "missing argument cmdline".to_string(),
        ));
    }
    Ok(Command::Spawn(rest.to_string()))
}

fn parse_border_kind(raw: &str) -> Result<BorderKind> {
    match raw {
        "inner" => Ok(BorderKind::Inner),
        "outer" => Ok(BorderKind::Outer),
        _ => Err(WmError::MalformedCommand(format!(
            "expected 'inner' or 'outer', got '{raw}'"
        ))),
    }
}

fn build_set_border(rest: &str) -> Result<Command> {
    let (kind, width) = rest
        .split_once(' ')
        .ok_or_else(|| WmError::MalformedCommand("usage: set-border <inner|outer> <width-px>".to_string()))?;
    let width: i32 = parse_arg(width.trim(), "width-px")?;
    if width < 0 {
        return Err(WmError::MalformedCommand(format!(
            "negative border width {width}"
        )));
    }
    Ok(Command::SetBorder(parse_border_kind(kind)?, width))
}

fn build_set_color(rest: &str) -> Result<Command> {
    let (kind, color) = rest
        .split_once(' ')
        .ok_or_else(|| WmError::MalformedCommand("usage: set-color <inner|outer> <#rrggbb>".to_string()))?;
    let color = color.trim();
    if !is_hex_color(color) {
        return Err(WmError::MalformedCommand(format!(
            "invalid color '{color}', expected #rrggbb"
        )));
    }
    Ok(Command::SetColor(
        parse_border_kind(kind)?,
        color.to_lowercase(),
    ))
}

fn is_hex_color(raw: &str) -> bool {
    raw.len() == 7
        && raw.starts_with('#')
        && raw.chars().skip(1).all(|c| c.is_ascii_hexdigit())
}

fn build_resize(rest: &str) -> Result<Command> {
    let (dx, dy) = rest
        .split_once(' ')
        .ok_or_else(|| WmError::MalformedCommand("usage: resize <dx> <dy>".to_string()))?;
    Ok(Command::Resize {
        dx: parse_arg(dx, "dx")?,
        dy: parse_arg(dy.trim(), "dy")?,
    })
}

fn build_swap(rest: &str) -> Result<Command> {
    let (a, b) = rest
        .split_once(' ')
        .ok_or_else(|| WmError::MalformedCommand("usage: swap <id-a> <id-b>".to_string()))?;
    Ok(Command::Swap(parse_handle(a)?, parse_handle(b.trim())?))
}

fn build_send_to_ws(rest: &str) -> Result<Command> {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    let [window, workspace, follow] = parts.as_slice() else {
        return Err(WmError::MalformedCommand(
            "usage: send-to-ws <window-id> <ws> <follow:0|1>".to_string(),
        ));
    };
    let follow = match *follow {
        "0" => false,
        "1" => true,
        other => {
            return Err(WmError::MalformedCommand(format!(
                "invalid follow flag '{other}'"
            )))
        }
    };
    Ok(Command::SendToWorkspace {
        window: parse_handle(window)?,
        workspace: parse_arg(workspace, "ws")?,
        follow,
    })
}

fn build_scratch_toggle(rest: &str) -> Result<Command> {
    if rest.is_empty() {
        return Err(WmError::MalformedCommand(
            "missing argument scratchpad name".to_string(),
        ));
    }
    Ok(Command::ScratchToggle(rest.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_verb() {
        assert_eq!(
            parse_command("spawn st -e htop").expect("spawn"),
            Command::Spawn("st -e htop".to_string())
        );
        assert_eq!(parse_command("view 2").expect("view"), Command::View(2));
        assert_eq!(parse_command("togglebar").expect("togglebar"), Command::ToggleBar);
        assert_eq!(
            parse_command("set-border inner 3").expect("set-border"),
            Command::SetBorder(BorderKind::Inner, 3)
        );
        assert_eq!(
            parse_command("set-color outer #A0B1C2").expect("set-color"),
            Command::SetColor(BorderKind::Outer, "#a0b1c2".to_string())
        );
        assert_eq!(parse_command("reload-config").expect("reload"), Command::ReloadConfig);
        assert_eq!(parse_command("quit").expect("quit"), Command::Quit);
        assert_eq!(parse_command("focus left").expect("focus"), Command::Focus(Direction::Left));
        assert_eq!(parse_command("move up").expect("move"), Command::Move(Direction::Up));
        assert_eq!(
            parse_command("resize 10 -20").expect("resize"),
            Command::Resize { dx: 10, dy: -20 }
        );
        assert_eq!(
            parse_command("toggle-float 7").expect("toggle-float"),
            Command::ToggleFloat(WindowHandle(7))
        );
        assert_eq!(
            parse_command("toggle-fullscreen 4").expect("toggle-fullscreen"),
            Command::ToggleFullscreen(WindowHandle(4))
        );
        assert_eq!(
            parse_command("promote 4").expect("promote"),
            Command::Promote(WindowHandle(4))
        );
        assert_eq!(
            parse_command("swap 1 2").expect("swap"),
            Command::Swap(WindowHandle(1), WindowHandle(2))
        );
        assert_eq!(
            parse_command("send-to-ws 5 3 1").expect("send-to-ws"),
            Command::SendToWorkspace {
                window: WindowHandle(5),
                workspace: 3,
                follow: true,
            }
        );
        assert_eq!(
            parse_command("scratch-toggle term").expect("scratch-toggle"),
            Command::ScratchToggle("term".to_string())
        );
    }

    #[test]
    fn unknown_verb_is_malformed() {
        assert!(matches!(
            parse_command("explode"),
            Err(WmError::MalformedCommand(_))
        ));
    }

    #[test]
    fn wrong_arity_is_malformed() {
        assert!(parse_command("view").is_err());
        assert!(parse_command("swap 1").is_err());
        assert!(parse_command("send-to-ws 5 3").is_err());
        assert!(parse_command("quit now").is_err());
        assert!(parse_command("resize 10").is_err());
    }

    #[test]
    fn argument_validation() {
        assert!(parse_command("view two").is_err());
        assert!(parse_command("set-border middle 2").is_err());
        assert!(parse_command("set-border inner -1").is_err());
        assert!(parse_command("set-color inner red").is_err());
        assert!(parse_command("set-color inner #12345g").is_err());
        assert!(parse_command("send-to-ws 5 3 2").is_err());
        assert!(parse_command("focus sideways").is_err());
    }
}
