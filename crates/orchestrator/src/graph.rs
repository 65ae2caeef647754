//! ASCII rendering of the stage graph.

const GAP: &str = "   ";

/// Draw each row of stage names as boxes, rows joined by arrows.
pub fn render(layers: &[Vec<String>]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for (i, row) in layers.iter().enumerate() {
        let widths: Vec<usize> = row.iter().map(|name| name.chars().count() + 4).collect();

        if i > 0 {
            lines.push(join(widths.iter().map(|&w| {
                let center = w / 2;
                format!("{}v{}", " ".repeat(center), " ".repeat(w - center - 1))
            })));
        }

        let border = || join(widths.iter().map(|&w| format!("+{}+", "-".repeat(w - 2))));
        lines.push(border());
        lines.push(join(row.iter().map(|name| format!("| {name} |"))));
        lines.push(border());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn join(cells: impl Iterator<Item = String>) -> String {
    cells.collect::<Vec<_>>().join(GAP).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_single_column() {
        let graph = render(&[row(&["a"]), row(&["b"])]);
        assert_eq!(graph, "+---+\n| a |\n+---+\n  v\n+---+\n| b |\n+---+\n");
    }

    #[test]
    fn test_side_by_side_row() {
        let graph = render(&[row(&["a"]), row(&["bb", "c"])]);
        let lines: Vec<&str> = graph.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[3], "   v       v");
        assert_eq!(lines[5], "| bb |   | c |");
    }

    #[test]
    fn test_empty_graph() {
        assert_eq!(render(&[]), "\n");
    }
}
