//! Serial console output
//!
//! Every line is `<tag> <event>`, e.g. `T3>> Received from intsQueue: 42`.
//! Events are structured so tests can match on them, and render to the exact
//! text the board prints.

use core::fmt;

/// Which task wrote a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskTag {
    /// Detector
    T1,
    /// Producer
    T2,
    /// Drain
    T3,
}

impl fmt::Display for TaskTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskTag::T1 => f.write_str("T1>>"),
            TaskTag::T2 => f.write_str("T2>>"),
            TaskTag::T3 => f.write_str("T3>>"),
        }
    }
}

/// One console message
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    ChangeReceived,
    Count(u32),
    Random(i32),
    Division(f32),
    RandomSent,
    DataSent,
    Received(i32),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::ChangeReceived => f.write_str("Change received from mailboxQueue"),
            Event::Count(count) => write!(f, "count: {}", count),
            Event::Random(random) => write!(f, "random: {}", random),
            Event::Division(ratio) => write!(f, "division: {:.2}", ratio),
            Event::RandomSent => f.write_str("random value sent to intsQueue"),
            Event::DataSent => f.write_str("Data sent to mailboxQueue"),
            Event::Received(value) => write!(f, "Received from intsQueue: {}", value),
        }
    }
}

/// Sink for task output
pub trait Console {
    fn write_line(&mut self, tag: TaskTag, event: Event) -> fmt::Result;
}

impl<C: Console + ?Sized> Console for &mut C {
    fn write_line(&mut self, tag: TaskTag, event: Event) -> fmt::Result {
        (**self).write_line(tag, event)
    }
}

/// Console rendering lines as text into any `fmt::Write`
///
/// Lines end in `\r\n` like a serial terminal expects.
pub struct SerialConsole<W> {
    out: W,
}

impl<W: fmt::Write> SerialConsole<W> {
    pub fn new(out: W) -> Self {
        SerialConsole { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: fmt::Write> Console for SerialConsole<W> {
    fn write_line(&mut self, tag: TaskTag, event: Event) -> fmt::Result {
        write!(self.out, "{} {}\r\n", tag, event)
    }
}
