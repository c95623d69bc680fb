use anyhow::Context;
use serde::Serialize;
use std::io::{BufRead, Write};

/// Write `text` to stdout, returning broken pipes and other write errors
/// instead of panicking the way `print!` does.
pub fn write_stdout(text: &str) -> anyhow::Result<()> {
    write_text(&mut std::io::stdout().lock(), text)
}

fn write_text(out: &mut impl Write, text: &str) -> anyhow::Result<()> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .context("failed to write to stdout")
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    write_stdout(&json)
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) -> anyhow::Result<()> {
    write_stdout(&render_table(headers, rows))
}

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header. Cells beyond the header count are dropped.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .fold(h.chars().count(), usize::max)
        })
        .collect();

    let mut out = String::new();
    push_row(&mut out, headers.iter(), &widths);
    push_row(&mut out, widths.iter().map(|w| "-".repeat(*w)), &widths);
    for row in rows {
        push_row(&mut out, row.iter(), &widths);
    }
    out
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: impl Iterator<Item = S>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{:width$}", cell.as_ref()))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Ask a yes/no question on stdin; anything but an answer starting with `y`
/// (including EOF) is a no.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush().context("failed to flush stdout")?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation from stdin")?;
    Ok(answer.trim().to_ascii_lowercase().starts_with('y'))
}
