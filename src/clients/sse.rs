use crate::models::SseFrame;

/// Incremental `text/event-stream` decoder; chunks may split frames anywhere.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend(chunk.iter().copied().filter(|b| *b != b'\r'));
    }

    pub fn next_frame(&mut self) -> Option<SseFrame> {
        loop {
            let end = self.buffer.windows(2).position(|w| w == b"\n\n")?;
            let block: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(frame) = parse_block(&String::from_utf8_lossy(&block[..end])) {
                return Some(frame);
            }
        }
    }

    /// Flushes a trailing frame that was not terminated by a blank line.
    pub fn finish(&mut self) -> Option<SseFrame> {
        if let Some(frame) = self.next_frame() {
            return Some(frame);
        }
        let rest = std::mem::take(&mut self.buffer);
        parse_block(&String::from_utf8_lossy(&rest))
    }
}

fn parse_block(text: &str) -> Option<SseFrame> {
    let mut frame = SseFrame::default();
    let mut data = Vec::new();
    let mut seen = false;

    for line in text.lines() {
        // comment / keep-alive
        if line.is_empty() || line.starts_with(':') {
            continue;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => frame.event = Some(value.to_string()),
            "data" => data.push(value),
            "id" => frame.id = Some(value.to_string()),
            _ => continue,
        }
        seen = true;
    }

    if !seen {
        return None;
    }
    frame.data = data.join("\n");
    Some(frame)
}
