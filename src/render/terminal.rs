use super::{ DisplaySegment, RenderedMessage };

const CODE_INDENT: &str = "    ";

/// Plain-text layout of one message for a terminal.
pub fn format_message(message: &RenderedMessage) -> String {
    let mut out = format!("{}: ", message.sender);

    for segment in &message.segments {
        match segment {
            DisplaySegment::PlainText(text) => out.push_str(text),
            DisplaySegment::CodeBlock(block) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                match block.language() {
                    Some(lang) => out.push_str(&format!("{}[{}]\n", CODE_INDENT, lang)),
                    None => out.push_str(&format!("{}[code]\n", CODE_INDENT)),
                }
                for line in block.content().lines() {
                    out.push_str(CODE_INDENT);
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
    }

    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

pub fn format_messages(messages: &[RenderedMessage]) -> String {
    messages.iter().map(format_message).collect::<Vec<_>>().join("\n")
}
