//! Human readable batch report

use std::io::{self, Write};

use crate::batch::Tally;

/// ANSI control sequences, empty when colors are disabled
struct Palette {
    red_background: &'static str,
    green_background: &'static str,
    magenta_background: &'static str,
    red: &'static str,
    green: &'static str,
    blue: &'static str,
    magenta: &'static str,
    reset: &'static str,
}

impl Palette {
    fn new(colors: bool) -> Self {
        if !colors {
            return Self {
                red_background: "",
                green_background: "",
                magenta_background: "",
                red: "",
                green: "",
                blue: "",
                magenta: "",
                reset: "",
            };
        }
        Self {
            red_background: "\x1b[41m",
            green_background: "\x1b[42m",
            magenta_background: "\x1b[45m",
            red: "\x1b[31m",
            green: "\x1b[32m",
            blue: "\x1b[34m",
            magenta: "\x1b[35m",
            reset: "\x1b[0m",
        }
    }
}

/// Overall verdict printed in the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ok,
    Warn,
    Fail,
}

impl Verdict {
    pub fn of(tally: &Tally) -> Self {
        if tally.error > 0 {
            Verdict::Fail
        } else if tally.processed == tally.valid {
            Verdict::Ok
        } else {
            Verdict::Warn
        }
    }
}

/// Write the status and summary blocks for `tally`
pub fn render_report(tally: &Tally, colors: bool, out: &mut impl Write) -> io::Result<()> {
    let p = Palette::new(colors);

    writeln!(out, "\nStatus:")?;
    writeln!(out, "Processed messages: {}{}{}", p.blue, tally.processed, p.reset)?;
    writeln!(out)?;
    writeln!(out, "Valid messages:     {}{}{}", p.green, tally.valid, p.reset)?;
    writeln!(out, "Invalid messages:   {}{}{}", p.magenta, tally.invalid, p.reset)?;
    writeln!(out, "Errors detected:    {}{}{}", p.red, tally.error, p.reset)?;
    writeln!(out, "\nSummary:")?;

    match Verdict::of(tally) {
        Verdict::Ok => writeln!(
            out,
            "{}[OK]{}: all messages have proper format",
            p.green_background, p.reset
        ),
        Verdict::Warn => writeln!(
            out,
            "{}[WARN]{}: invalid messages detected",
            p.magenta_background, p.reset
        ),
        Verdict::Fail => writeln!(
            out,
            "{}[FAIL]{}: invalid JSON(s) detected",
            p.red_background, p.reset
        ),
    }
}
