use std::fmt;

use chrono::TimeZone;

use model::ReplayController;

/// What the status panel shows for the current state of a replay.
pub struct StatusPanel {
    lines: Vec<String>,
    button: &'static str,
}

impl StatusPanel {
    /// Times are shown in the given timezone.
    pub fn new<Tz: TimeZone>(replay: &ReplayController, tz: &Tz) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        let mut lines = Vec::new();
        match replay.current() {
            Some(sample) => {
                lines.push(format!(
                    "Coordinates: {:.6}, {:.6}",
                    sample.lat, sample.lng
                ));
                lines.push(format!(
                    "Timestamp: {}",
                    sample.timestamp.with_timezone(tz).format("%-I:%M:%S %p")
                ));
                if let Some(speed) = replay.current_speed() {
                    lines.push(format!("Speed: {:.2} km/h", speed));
                }
            }
            None => {
                lines.push("No route loaded".to_string());
            }
        }

        Self {
            lines,
            button: if replay.is_running() { "Pause" } else { "Play" },
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The label of the play/pause button
    pub fn button(&self) -> &'static str {
        self.button
    }
}

impl fmt::Display for StatusPanel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Vehicle Status")?;
        for line in &self.lines {
            writeln!(f, "  {line}")?;
        }
        write!(f, "  [{}] [Reset]", self.button)
    }
}
