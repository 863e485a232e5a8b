use std::io::{self, Write};

use ansi_term::{Colour, Style};
use serde_json::json;

use super::{DisplayState, Inspector};
use crate::gateway::{Descriptor, Text};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DisplayFormat {
    /// Human-readable, optionally with ANSI colours
    Text { color: bool },
    /// One JSON object per render
    Json,
}

pub fn render<W: Write>(view: &Inspector, format: DisplayFormat, out: &mut W) -> io::Result<()> {
    match format {
        DisplayFormat::Text { color } => render_text(view, &Painter { color }, out),
        DisplayFormat::Json => render_json(view, out),
    }
}

struct Painter {
    color: bool,
}

impl Painter {
    fn info(&self, text: &Text) -> String {
        self.paint(Colour::Green.bold(), &text.to_str_lossy())
    }

    fn flag(&self, flag: bool) -> String {
        self.paint(Colour::Green.bold(), &flag.to_string())
    }

    fn error(&self, text: &Text) -> String {
        self.paint(Colour::Red.bold(), &text.to_str_lossy())
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.color {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

fn render_text<W: Write>(view: &Inspector, painter: &Painter, out: &mut W) -> io::Result<()> {
    writeln!(out, "input: [{}]", view.pattern())?;

    let info = match (view.state(), view.descriptor()) {
        (DisplayState::Empty, _) | (_, None) => return Ok(()),
        (_, Some(info)) => info,
    };

    writeln!(out, "pattern: {}", painter.info(&info.pattern))?;

    if view.state() == DisplayState::Error {
        return writeln!(out, "error: {}", painter.error(&info.error));
    }

    writeln!(
        out,
        "prefix: {} _foldcase: {}",
        painter.info(&info.prefix),
        painter.flag(info.prefix_foldcase)
    )?;
    writeln!(
        out,
        "accel_prefix: {} _foldcase: {}",
        painter.info(&info.accel_prefix),
        painter.flag(info.accel_prefix_foldcase)
    )?;
    writeln!(out, "num_captures: {}", painter.paint(Colour::Green.bold(), &info.num_captures.to_string()))?;
    writeln!(out, "is_one_pass: {}", painter.flag(info.is_one_pass))?;
    writeln!(out, "can_bit_state: {}", painter.flag(info.can_bit_state))?;
    writeln!(out, "bytecode:\n{}", painter.info(&info.bytecode))?;
    writeln!(out, "bytemap:\n{}", painter.info(&info.bytemap))
}

fn render_json<W: Write>(view: &Inspector, out: &mut W) -> io::Result<()> {
    let value = match (view.state(), view.descriptor()) {
        (DisplayState::Empty, _) | (_, None) => json!({
            "state": DisplayState::Empty,
            "input": view.pattern(),
        }),
        (DisplayState::Error, Some(info)) => json!({
            "state": DisplayState::Error,
            "input": view.pattern(),
            "pattern": info.pattern,
            "error": info.error,
        }),
        (DisplayState::Success, Some(info)) => success_json(view.pattern(), info),
    };

    serde_json::to_writer(&mut *out, &value)?;
    writeln!(out)
}

fn success_json(input: &Text, info: &Descriptor) -> serde_json::Value {
    json!({
        "state": DisplayState::Success,
        "input": input,
        "pattern": info.pattern,
        "prefix": info.prefix,
        "prefix_foldcase": info.prefix_foldcase,
        "accel_prefix": info.accel_prefix,
        "accel_prefix_foldcase": info.accel_prefix_foldcase,
        "num_captures": info.num_captures,
        "is_one_pass": info.is_one_pass,
        "can_bit_state": info.can_bit_state,
        "bytecode": info.bytecode,
        "bytemap": info.bytemap,
    })
}
