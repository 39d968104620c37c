//! The lex pass narrates every classification decision to a [Trace] sink,
//! one line per decision. The sink is write-only plumbing: wired to stderr,
//! a buffer, or nothing at all, the emitted lexemes are the same.

use std::fmt;
use std::io::Write;

pub struct Trace<'w> {
    sink: Option<&'w mut dyn Write>,
}

impl<'w> Trace<'w> {
    /// A sink that drops every line
    pub fn off() -> Trace<'w> {
        Trace { sink: None }
    }
    /// Send each decision line to `sink`
    pub fn to(sink: &'w mut dyn Write) -> Trace<'w> {
        Trace { sink: Some(sink) }
    }
    /// Write one decision line. Write errors are swallowed: tracing may
    /// never alter the result of the pass.
    pub fn line(&mut self, args: fmt::Arguments) {
        if let Some(sink) = self.sink.as_mut() {
            let _ = writeln!(sink, "{}", args);
        }
    }
}

#[cfg(test)]
mod test {
    use super::Trace;
    #[test]
    fn lines_reach_the_sink() {
        let mut buffer = Vec::new();
        let mut trace = Trace::to(&mut buffer);
        trace.line(format_args!("lex: integer {}", 5));
        trace.line(format_args!("lex: statement end"));
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "lex: integer 5\nlex: statement end\n"
        );
    }
    #[test]
    fn off_drops_lines() {
        let mut trace = Trace::off();
        // nothing to assert beyond "does not panic"
        trace.line(format_args!("lex: comma"));
    }
}
