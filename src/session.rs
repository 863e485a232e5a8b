use std::io::{BufRead, Write};

use anyhow::Context;
use serde_json::json;

use super::config::Config;
use super::fragment::Location;
use super::gateway::{self, Text};
use super::inspector::{DisplayFormat, Inspector};

/// Drive one inspector session.
///
/// The analysis module is loaded first; if that fails nothing is rendered.
/// Once it is ready, the inspector is seeded from the configured address
/// and every line of `input` is handled as an edit, in order.
pub fn run<R, W>(config: &Config, mut input: R, out: &mut W) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    let gateway = gateway::load(config.engine).context("cannot start the inspector")?;

    let mut location = config.address.clone();
    let mut inspector = Inspector::from_fragment(gateway, location.fragment());
    show(&inspector, &location, config.format, out)?;

    if config.once {
        return Ok(());
    }

    // Lines are taken as raw bytes: a line that is not UTF-8 is a bad
    // pattern, not a broken session.
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = input
            .read_until(b'\n', &mut line)
            .context("failed to read the next pattern")?;
        if read == 0 {
            break;
        }

        let value = strip_line_ending(&line).to_vec();
        inspector.on_edit(Text::from_raw(value), &mut location);
        tracing::info!(address = %location, state = ?inspector.state(), "edited");
        show(&inspector, &location, config.format, out)?;
    }

    Ok(())
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Print the address bar, then the page.
fn show<W: Write>(
    inspector: &Inspector,
    location: &Location,
    format: DisplayFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    match format {
        DisplayFormat::Text { .. } => writeln!(out, "address: {}", location)?,
        DisplayFormat::Json => {
            serde_json::to_writer(&mut *out, &json!({ "address": location.href() }))?;
            writeln!(out)?;
        }
    }

    inspector.render(format, out)?;

    if let DisplayFormat::Text { .. } = format {
        writeln!(out)?;
    }
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(args: &[&str], input: &[u8]) -> String {
        let config = Config::from_args(args).unwrap();
        let mut out = Vec::new();
        run(&config, input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_startup_from_fragment() {
        let out = session(&["re-inspect", "--color", "never", "--once", "#a%2Bb"], b"ignored\n");

        assert!(out.starts_with("address: #a%2Bb\ninput: [a+b]\npattern: a+b\n"));
        assert!(out.contains("num_captures: 0\n"));
        assert!(!out.contains("ignored"));
    }

    #[test]
    fn test_edits_in_order() {
        let out = session(&["re-inspect", "--color", "never"], b"a(\r\na+\n\n");
        let frames: Vec<&str> = out.split("address: ").skip(1).collect();

        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0], "#\ninput: []\n\n");
        assert!(frames[1].starts_with("#a(\ninput: [a(]\npattern: a(\nerror: failed to parse pattern"));
        assert!(frames[2].starts_with("#a%2B\ninput: [a+]\npattern: a+\nprefix: "));
        assert_eq!(frames[3], "#\ninput: []\n\n");
    }

    #[test]
    fn test_line_that_is_not_utf8() {
        let out = session(&["re-inspect", "--color", "never"], b"a+\n\xff(\nb\n");
        let frames: Vec<&str> = out.split("address: ").skip(1).collect();

        assert_eq!(frames.len(), 4);
        assert!(frames[1].starts_with("#a%2B\ninput: [a+]\npattern: a+\nprefix: "));
        assert!(frames[2].starts_with(
            "#%FF(\ninput: [\u{fffd}(]\npattern: \u{fffd}(\n\
             error: failed to parse pattern: pattern is not valid UTF-8\n"
        ));
        assert!(frames[3].starts_with("#b\ninput: [b]\npattern: b\nprefix: "));
    }

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending(b"a+\r\n"), b"a+");
        assert_eq!(strip_line_ending(b"a+\n"), b"a+");
        assert_eq!(strip_line_ending(b"a+"), b"a+");
        assert_eq!(strip_line_ending(b"\r"), b"");
    }

    #[test]
    fn test_json_stream() {
        let out = session(&["re-inspect", "--format", "json", "https://example.com/#x"], b"y+\n");
        let records: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0]["address"], "https://example.com/#x");
        assert_eq!(records[1]["state"], "success");
        assert_eq!(records[2]["address"], "https://example.com/#y%2B");
        assert_eq!(records[3]["pattern"], "y+");
    }
}
