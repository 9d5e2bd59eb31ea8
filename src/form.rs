/// Input field of the creator form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Message,
    Duration,
}

/// Text buffers behind the creator form. Duration stays digits-only and within bounds.
#[derive(Debug, Clone)]
pub struct Form {
    pub message: String,
    duration: String,
    pub focus: Field,
    max_duration_secs: u32,
}

impl Form {
    pub fn new(message: impl Into<String>, duration_secs: u32, max_duration_secs: u32) -> Self {
        let max_duration_secs = max_duration_secs.max(1);
        let duration = if duration_secs == 0 {
            String::new()
        } else {
            duration_secs.min(max_duration_secs).to_string()
        };
        Self {
            message: message.into(),
            duration,
            focus: Field::Message,
            max_duration_secs,
        }
    }

    pub fn duration_text(&self) -> &str {
        &self.duration
    }

    /// Entered duration, 0 when the field is empty
    pub fn duration_secs(&self) -> u32 {
        self.duration.parse().unwrap_or(0)
    }

    pub fn max_duration_secs(&self) -> u32 {
        self.max_duration_secs
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Field::Message => Field::Duration,
            Field::Duration => Field::Message,
        };
    }

    pub fn insert_char(&mut self, c: char) {
        match self.focus {
            Field::Message => {
                if c == '\n' || !c.is_control() {
                    self.message.push(c);
                }
            }
            Field::Duration => {
                if !c.is_ascii_digit() {
                    return;
                }
                let mut candidate = self.duration.clone();
                candidate.push(c);
                let candidate = candidate.trim_start_matches('0');
                match candidate.parse::<u32>() {
                    Ok(secs) if secs <= self.max_duration_secs => self.duration = secs.to_string(),
                    // leading zeros collapse to nothing
                    _ if candidate.is_empty() => self.duration.clear(),
                    _ => {}
                }
            }
        }
    }

    /// Inserts pasted text. Line breaks (`\r\n`, `\r`) become `\n` in the message.
    pub fn insert_str(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        for c in text.chars() {
            self.insert_char(c);
        }
    }

    pub fn newline(&mut self) {
        if self.focus == Field::Message {
            self.message.push('\n');
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            Field::Message => {
                self.message.pop();
            }
            Field::Duration => {
                self.duration.pop();
            }
        }
    }

    /// Nudges the duration by `delta` seconds, clamped to `1..=max`
    pub fn adjust_duration(&mut self, delta: i64) {
        let next = (self.duration_secs() as i64 + delta).clamp(1, self.max_duration_secs as i64);
        self.duration = next.to_string();
    }
}
