use std::collections::VecDeque;
use std::io::BufRead;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use anyhow::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Play if paused, pause if playing
    Toggle,
    Play,
    Pause,
    Reset,
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        Ok(match input.trim().to_lowercase().as_str() {
            "toggle" | "space" | "t" | "" => Command::Toggle,
            "play" | "p" => Command::Play,
            "pause" => Command::Pause,
            "reset" | "x" => Command::Reset,
            "quit" | "q" | "exit" => Command::Quit,
            x => bail!("Unknown command {x}"),
        })
    }
}

/// Parses comma-separated commands
pub fn parse_script(script: &str) -> Result<Vec<Command>> {
    script.split(',').map(|x| x.parse()).collect()
}

pub enum Input {
    Command(Command),
    /// Nothing happened before the timeout
    Idle,
    /// No more input will ever arrive
    Closed,
}

pub trait ControlSource {
    /// Waits up to `timeout` for the next command.
    fn next_command(&mut self, timeout: Duration) -> Input;
}

/// Reads one command per line from stdin. An empty line toggles play/pause.
pub struct StdinControls {
    rx: Receiver<String>,
}

impl StdinControls {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        // Only this thread touches stdin; the replay itself stays on the caller's thread
        std::thread::spawn(move || forward_lines(std::io::stdin().lock(), tx));
        Self { rx }
    }
}

// Stops at EOF, on a read error, or once nobody is listening. Lines that aren't UTF-8 are skipped.
fn forward_lines<R: BufRead>(mut reader: R, tx: Sender<String>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                error!("Couldn't read stdin: {err}");
                break;
            }
        }
        while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
            buf.pop();
        }
        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.to_string(),
            Err(_) => {
                warn!(
                    "Ignoring input that isn't UTF-8: {}",
                    String::from_utf8_lossy(&buf)
                );
                continue;
            }
        };
        if tx.send(line).is_err() {
            break;
        }
    }
}

impl ControlSource for StdinControls {
    fn next_command(&mut self, timeout: Duration) -> Input {
        match self.rx.recv_timeout(timeout) {
            Ok(line) => match line.parse() {
                Ok(cmd) => Input::Command(cmd),
                Err(err) => {
                    warn!("Ignoring input: {err}");
                    Input::Idle
                }
            },
            Err(RecvTimeoutError::Timeout) => Input::Idle,
            Err(RecvTimeoutError::Disconnected) => Input::Closed,
        }
    }
}

/// Plays back a fixed list of commands, one every `gap`.
pub struct ScriptedControls {
    commands: VecDeque<Command>,
    gap: Duration,
    next_at: Instant,
}

impl ScriptedControls {
    pub fn new(commands: Vec<Command>, gap: Duration) -> Self {
        Self {
            commands: commands.into_iter().collect(),
            gap,
            next_at: Instant::now(),
        }
    }
}

impl ControlSource for ScriptedControls {
    fn next_command(&mut self, timeout: Duration) -> Input {
        if self.commands.is_empty() {
            return Input::Closed;
        }
        let now = Instant::now();
        if now < self.next_at {
            let wait = self.next_at - now;
            if wait > timeout {
                std::thread::sleep(timeout);
                return Input::Idle;
            }
            std::thread::sleep(wait);
        }
        self.next_at = Instant::now() + self.gap;
        match self.commands.pop_front() {
            Some(cmd) => Input::Command(cmd),
            None => Input::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_commands() {
        assert_eq!("play".parse::<Command>().unwrap(), Command::Play);
        assert_eq!(" Pause ".parse::<Command>().unwrap(), Command::Pause);
        assert_eq!("".parse::<Command>().unwrap(), Command::Toggle);
        assert_eq!("x".parse::<Command>().unwrap(), Command::Reset);
        assert_eq!("q".parse::<Command>().unwrap(), Command::Quit);
        assert!("rewind".parse::<Command>().is_err());
    }

    #[test]
    fn bad_bytes_dont_stop_input() {
        let input: &[u8] = b"play\n\xff\xfe\r\npause\r\n\nreset";
        let (tx, rx) = mpsc::channel();
        forward_lines(input, tx);
        let lines: Vec<String> = rx.iter().collect();
        assert_eq!(lines, vec!["play", "pause", "", "reset"]);
    }

    #[test]
    fn script() {
        assert_eq!(
            parse_script("play,pause, reset,quit").unwrap(),
            vec![
                Command::Play,
                Command::Pause,
                Command::Reset,
                Command::Quit
            ]
        );
        assert!(parse_script("play,seek").is_err());
    }

    #[test]
    fn scripted_controls_run_out() {
        let mut controls = ScriptedControls::new(
            vec![Command::Play, Command::Reset],
            Duration::ZERO,
        );
        let timeout = Duration::from_millis(10);
        assert!(matches!(
            controls.next_command(timeout),
            Input::Command(Command::Play)
        ));
        assert!(matches!(
            controls.next_command(timeout),
            Input::Command(Command::Reset)
        ));
        assert!(matches!(controls.next_command(timeout), Input::Closed));
    }

    #[test]
    fn scripted_controls_wait_for_gap() {
        let mut controls =
            ScriptedControls::new(vec![Command::Play, Command::Pause], Duration::from_secs(60));
        assert!(matches!(
            controls.next_command(Duration::ZERO),
            Input::Command(Command::Play)
        ));
        assert!(matches!(
            controls.next_command(Duration::from_millis(1)),
            Input::Idle
        ));
    }
}
