//! Performer console on stdin. Lines are parsed on a reader thread and
//! queued, so the tick loop handles them between ticks.
//!
//! ```text
//! key KeyW                  press (and hold) a key
//! key Equal ctrl            press with modifiers
//! up KeyW                   release
//! midi nanoKONTROL2 176 0 64
//! status
//! quit
//! ```

use anyhow::{anyhow, bail, Context};
use pulse_core::Modifiers;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver};
use std::thread;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Key { code: String, modifiers: Modifiers },
    Up { code: String },
    Midi { device: String, status: u8, data1: u8, data2: u8 },
    Status,
    Quit,
}

fn parse_byte(token: &str) -> anyhow::Result<u8> {
    let parsed = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => token.parse::<u8>(),
    };
    parsed.with_context(|| format!("bad byte {token:?}"))
}

pub fn parse_line(line: &str) -> anyhow::Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let command = match verb {
        "key" => {
            let code = words.next().ok_or_else(|| anyhow!("key needs a code"))?;
            let mut modifiers = Modifiers::NONE;
            for m in words {
                match m {
                    "ctrl" => modifiers.ctrl = true,
                    "shift" => modifiers.shift = true,
                    "alt" => modifiers.alt = true,
                    "meta" => modifiers.meta = true,
                    other => bail!("unknown modifier {other:?}"),
                }
            }
            Command::Key {
                code: code.to_string(),
                modifiers,
            }
        }
        "up" => Command::Up {
            code: words
                .next()
                .ok_or_else(|| anyhow!("up needs a code"))?
                .to_string(),
        },
        "midi" => {
            let rest: Vec<&str> = words.collect();
            let [device, status, d1, d2] = rest.as_slice() else {
                bail!("midi needs <device> <status> <data1> <data2>");
            };
            Command::Midi {
                device: device.to_string(),
                status: parse_byte(status)?,
                data1: parse_byte(d1)?,
                data2: parse_byte(d2)?,
            }
        }
        "status" => Command::Status,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command {other:?}"),
    };
    Ok(Some(command))
}

/// Start the stdin reader. EOF on stdin queues a `Quit`.
pub fn spawn() -> anyhow::Result<Receiver<Command>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("console".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match parse_line(&line) {
                    Ok(Some(cmd)) => {
                        if tx.send(cmd).is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => log::warn!("[console] {:#}", e),
                }
            }
            _ = tx.send(Command::Quit);
        })
        .context("spawning console thread")?;
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_with_modifiers() {
        assert_eq!(
            parse_line("key Equal ctrl shift").unwrap(),
            Some(Command::Key {
                code: "Equal".into(),
                modifiers: Modifiers {
                    ctrl: true,
                    shift: true,
                    ..Modifiers::NONE
                },
            })
        );
    }

    #[test]
    fn parses_midi_in_decimal_and_hex() {
        assert_eq!(
            parse_line("midi nanoKONTROL2 0xB0 19 127").unwrap(),
            Some(Command::Midi {
                device: "nanoKONTROL2".into(),
                status: 0xB0,
                data1: 19,
                data2: 127,
            })
        );
        assert!(parse_line("midi nanoKONTROL2 176 19").is_err());
        assert!(parse_line("midi nanoKONTROL2 300 19 1").is_err());
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert!(parse_line("dance").is_err());
    }
}
