//! Plain-text info panel for the selected component

use crate::domain::ComponentInfo;

/// Column at which the description is wrapped
pub const WRAP_WIDTH: usize = 72;
const BULLET: &str = "›";

/// Format the info panel: header, title, wrapped description, spec bullets
pub fn render_panel(info: &ComponentInfo, width: usize) -> String {
    let mut out = format!("[{}] {}\n{}\n", info.reference, info.value, info.title);
    if !info.description.is_empty() {
        out.push('\n');
        for line in wrap(&info.description, width) {
            out.push_str(&line);
            out.push('\n');
        }
    }
    if !info.specs.is_empty() {
        out.push('\n');
        for spec in &info.specs {
            out.push_str(&format!("  {BULLET} {spec}\n"));
        }
    }
    out
}

/// Greedy word wrap; words longer than `width` get a line of their own
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut len = 0;
    for word in text.split_whitespace() {
        let wlen = word.chars().count();
        if len > 0 && len + 1 + wlen > width {
            lines.push(std::mem::take(&mut line));
            len = 0;
        }
        if len > 0 {
            line.push(' ');
            len += 1;
        }
        line.push_str(word);
        len += wlen;
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
