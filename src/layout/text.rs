use crate::config::NodeSizeConfig;
use crate::model::{Node, Size};

/// Estimated rendered box of a node: wrapped label plus padding, floored at
/// the minimum size for its level.
pub fn measure_node(node: &Node, config: &NodeSizeConfig) -> Size {
    let min = if node.is_root() {
        config.root_min
    } else {
        config.child_min
    };
    if node.text.trim().is_empty() {
        return Size::new(min, min);
    }
    let lines = label_lines(&node.text, config);
    let text_width = lines
        .iter()
        .map(|line| text_width(line, config.font_size))
        .fold(0.0, f64::max);
    let text_height = lines.len() as f64 * config.font_size * config.line_height;
    Size::new(
        (text_width + config.padding_x * 2.0).max(min),
        (text_height + config.padding_y * 2.0).max(min),
    )
}

pub fn label_lines(text: &str, config: &NodeSizeConfig) -> Vec<String> {
    let mut lines = Vec::new();
    for line in split_lines(text) {
        lines.extend(wrap_line(&line, config.max_label_width, config.font_size));
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

pub(crate) fn wrap_line(line: &str, max_width: f64, font_size: f64) -> Vec<String> {
    if text_width(line, font_size) <= max_width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(&candidate, font_size) > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push_str(word);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub(crate) fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().map(char_width_factor).sum::<f64>() * font_size
}

fn char_width_factor(ch: char) -> f64 {
    match ch {
        ' ' => 0.306,
        '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | 'i' | 'j' | 'l' => 0.3,
        'f' | 'r' | 't' | 'I' => 0.35,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.9,
        'A'..='Z' | '0'..='9' => 0.66,
        'a'..='z' => 0.56,
        // CJK and other wide glyphs take roughly a full em.
        c if (c as u32) >= 0x2E80 => 1.0,
        _ => 0.6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeId;

    fn node(text: &str, level: u32) -> Node {
        Node {
            id: NodeId(0),
            parent_id: None,
            text: text.to_string(),
            x: 0.0,
            y: 0.0,
            level,
        }
    }

    #[test]
    fn empty_labels_use_level_minimum() {
        let config = NodeSizeConfig::default();
        assert_eq!(measure_node(&node("", 0), &config), Size::new(40.0, 40.0));
        assert_eq!(measure_node(&node("", 2), &config), Size::new(26.0, 26.0));
        assert_eq!(measure_node(&node("   ", 1), &config), Size::new(26.0, 26.0));
    }

    #[test]
    fn long_labels_wrap_and_grow_height() {
        let config = NodeSizeConfig::default();
        let short = measure_node(&node("Idea", 1), &config);
        let long = measure_node(
            &node("a rather long label that will not fit on a single line", 1),
            &config,
        );
        assert!(long.height > short.height);
        assert!(long.width <= config.max_label_width + config.padding_x * 2.0 + 1.0);
    }

    #[test]
    fn wide_glyphs_measure_wider() {
        assert!(text_width("\u{4e2d}\u{6587}", 14.0) > text_width("ab", 14.0));
    }

    #[test]
    fn wrap_keeps_short_text() {
        assert_eq!(wrap_line("short", 1000.0, 14.0), vec!["short"]);
    }
}
