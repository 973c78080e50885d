use std::io::Write;

use crossterm::{queue, style};

/// One menu entry: the key in brackets, then what it does.
pub type MenuItem<'a> = (&'a str, &'a str);

/// Print menu entries on the current line: bold `[key]`, dim label.
pub fn print_menu(out: &mut impl Write, items: &[MenuItem<'_>]) -> anyhow::Result<()> {
    queue!(out, style::Print(" "))?;
    for (i, (key, label)) in items.iter().enumerate() {
        if i > 0 {
            queue!(out, style::Print("  "))?;
        }
        queue!(
            out,
            style::SetAttribute(style::Attribute::Bold),
            style::Print(format!("[{key}]")),
            style::SetAttribute(style::Attribute::Reset),
            style::SetAttribute(style::Attribute::Dim),
            style::Print(format!(" {label}")),
            style::SetAttribute(style::Attribute::Reset),
        )?;
    }
    Ok(())
}
